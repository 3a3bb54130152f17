use async_trait::async_trait;

/// Sequence-to-sequence text generation from a single prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GeneratorError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Prompts longer than this many tokens are truncated before encoding.
    pub max_input_tokens: usize,
    /// Upper bound on the decoder sequence length. The decoder start token
    /// counts toward it, so at most `max_output_tokens - 1` tokens are
    /// generated.
    pub max_output_tokens: usize,
    pub decoding: DecodingStrategy,
}

impl GenerationParams {
    /// Tokens the decoder may emit after its start token.
    pub fn max_new_tokens(&self) -> usize {
        self.max_output_tokens.saturating_sub(1)
    }
}

/// How the next token is chosen. Beam search and sampling are never mixed.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodingStrategy {
    Greedy,
    BeamSearch {
        num_beams: usize,
        early_stopping: bool,
        length_penalty: f32,
    },
    Sampling {
        temperature: f64,
        seed: u64,
    },
}

impl DecodingStrategy {
    pub fn beam(num_beams: usize) -> Self {
        Self::BeamSearch {
            num_beams,
            early_stopping: true,
            length_penalty: 1.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("tokenization failed: {0}")]
    TokenizationFailed(String),
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}
