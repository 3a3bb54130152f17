use serde::Deserialize;

use crate::application::ports::{DecodingStrategy, GenerationParams};
use crate::application::services::{FlashcardGeneratorConfig, QuestionGeneratorConfig};

use super::Environment;

const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

/// Service settings. Every field has a default, so an empty configuration
/// is valid; `appsettings.{env}.toml` and `APP__SECTION__KEY` variables
/// override it in that order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub models: ModelSettings,
    pub generation: GenerationSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn load(environment: Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(&environment.config_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_mb: 25,
        }
    }
}

impl ServerSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub embedding_model: String,
    pub question_model: String,
    pub flashcard_model: String,
    /// Load every model at startup instead of on first use.
    pub preload: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            embedding_model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            question_model: "google-t5/t5-small".to_string(),
            flashcard_model: "google-t5/t5-small".to_string(),
            preload: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub questions: QuestionSettings,
    pub flashcards: FlashcardSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuestionSettings {
    pub chunk_size: usize,
    pub max_chunks: usize,
    pub max_input_tokens: usize,
    pub max_output_tokens: usize,
    pub num_beams: usize,
}

impl Default for QuestionSettings {
    fn default() -> Self {
        Self {
            chunk_size: 400,
            max_chunks: 6,
            max_input_tokens: 512,
            max_output_tokens: 64,
            num_beams: 4,
        }
    }
}

impl QuestionSettings {
    pub fn generator_config(&self) -> QuestionGeneratorConfig {
        QuestionGeneratorConfig {
            chunk_size: self.chunk_size,
            max_chunks: self.max_chunks,
            params: GenerationParams {
                max_input_tokens: self.max_input_tokens,
                max_output_tokens: self.max_output_tokens,
                decoding: DecodingStrategy::beam(self.num_beams),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlashcardSettings {
    pub top_phrases: usize,
    pub max_input_tokens: usize,
    pub max_output_tokens: usize,
    pub min_score: f32,
    pub decoding: DecodingSettings,
}

impl Default for FlashcardSettings {
    fn default() -> Self {
        Self {
            top_phrases: 8,
            max_input_tokens: 1024,
            max_output_tokens: 256,
            min_score: 0.10,
            decoding: DecodingSettings::default(),
        }
    }
}

impl FlashcardSettings {
    pub fn generator_config(&self) -> FlashcardGeneratorConfig {
        FlashcardGeneratorConfig {
            top_phrases: self.top_phrases,
            min_score: self.min_score,
            params: GenerationParams {
                max_input_tokens: self.max_input_tokens,
                max_output_tokens: self.max_output_tokens,
                decoding: self.decoding.strategy(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodingKind {
    Beam,
    Sampling,
    Greedy,
}

/// Flashcard decoding. `beam` ignores `temperature`; `sampling` ignores
/// `num_beams`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecodingSettings {
    pub strategy: DecodingKind,
    pub num_beams: usize,
    pub temperature: f64,
    pub seed: u64,
}

impl Default for DecodingSettings {
    fn default() -> Self {
        Self {
            strategy: DecodingKind::Beam,
            num_beams: 4,
            temperature: 0.7,
            seed: 42,
        }
    }
}

impl DecodingSettings {
    pub fn strategy(&self) -> DecodingStrategy {
        match self.strategy {
            DecodingKind::Beam => DecodingStrategy::beam(self.num_beams),
            DecodingKind::Sampling => DecodingStrategy::Sampling {
                temperature: self.temperature,
                seed: self.seed,
            },
            DecodingKind::Greedy => DecodingStrategy::Greedy,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
