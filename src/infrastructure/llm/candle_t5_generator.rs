use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{D, DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5::{self, T5ForConditionalGeneration};
use tokenizers::Tokenizer;

use crate::application::ports::{DecodingStrategy, GenerationParams, GeneratorError, TextGenerator};
use crate::infrastructure::observability::preview_for_log;

use super::beam_search::{BeamSearchConfig, beam_search};
use super::hub::ModelFiles;

/// T5 encoder-decoder running on candle.
///
/// The loaded model is never mutated. Each call works on its own clone of
/// the model handle (weights are reference-counted tensors), so concurrent
/// requests do not serialize on a lock.
pub struct CandleT5Generator {
    model: T5ForConditionalGeneration,
    tokenizer: Arc<Tokenizer>,
    config: t5::Config,
    device: Device,
}

impl CandleT5Generator {
    pub fn new(model_id: &str) -> Result<Self, GeneratorError> {
        let device = Device::Cpu;

        tracing::info!(
            device = ?device,
            model = model_id,
            "Initializing Candle T5 generation model"
        );

        let files = ModelFiles::fetch(model_id).map_err(GeneratorError::ModelLoadFailed)?;
        let mut config: t5::Config = files.read_config().map_err(GeneratorError::ModelLoadFailed)?;
        // Every decoding step feeds the full prefix, so the KV cache stays off
        // and per-call clones carry no state.
        config.use_cache = false;

        let tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| GeneratorError::ModelLoadFailed(format!("tokenizer: {}", e)))?;

        // SAFETY: the safetensors file is mapped read-only and outlives the model.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[&files.weights], DType::F32, &device) }
            .map_err(|e| GeneratorError::ModelLoadFailed(format!("weights: {e}")))?;

        let model = T5ForConditionalGeneration::load(vb, &config)
            .map_err(|e| GeneratorError::ModelLoadFailed(format!("model: {}", e)))?;

        tracing::info!("Candle T5 generation model loaded successfully");

        Ok(Self {
            model,
            tokenizer: Arc::new(tokenizer),
            config,
            device,
        })
    }

    fn session(&self) -> DecodeSession {
        DecodeSession {
            model: self.model.clone(),
            tokenizer: Arc::clone(&self.tokenizer),
            device: self.device.clone(),
            start_token: self
                .config
                .decoder_start_token_id
                .unwrap_or(self.config.pad_token_id) as u32,
            eos_token: self.config.eos_token_id as u32,
        }
    }
}

#[async_trait]
impl TextGenerator for CandleT5Generator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GeneratorError> {
        tracing::debug!(prompt = %preview_for_log(prompt, 120), "Generating");

        let session = self.session();
        let prompt = prompt.to_string();
        let params = params.clone();

        tokio::task::spawn_blocking(move || session.run(&prompt, &params))
            .await
            .map_err(|e| GeneratorError::GenerationFailed(format!("task join error: {e}")))?
    }
}

struct DecodeSession {
    model: T5ForConditionalGeneration,
    tokenizer: Arc<Tokenizer>,
    device: Device,
    start_token: u32,
    eos_token: u32,
}

impl DecodeSession {
    fn run(mut self, prompt: &str, params: &GenerationParams) -> Result<String, GeneratorError> {
        let input_ids = self.encode_prompt(prompt, params.max_input_tokens)?;
        let input = Tensor::new(input_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(generation_failed)?;
        let encoder_output = self.model.encode(&input).map_err(generation_failed)?;

        let output_ids = match &params.decoding {
            DecodingStrategy::BeamSearch {
                num_beams,
                early_stopping,
                length_penalty,
            } => {
                let config = BeamSearchConfig {
                    num_beams: *num_beams,
                    max_new_tokens: params.max_new_tokens(),
                    early_stopping: *early_stopping,
                    length_penalty: *length_penalty,
                };
                let (start, eos) = (self.start_token, self.eos_token);
                beam_search(&config, start, eos, |beams| {
                    self.beam_log_probs(beams, &encoder_output)
                })?
            }
            DecodingStrategy::Greedy => {
                let processor = LogitsProcessor::new(0, None, None);
                self.sample(processor, &encoder_output, params.max_new_tokens())?
            }
            DecodingStrategy::Sampling { temperature, seed } => {
                let processor = LogitsProcessor::new(*seed, Some(*temperature), None);
                self.sample(processor, &encoder_output, params.max_new_tokens())?
            }
        };

        let text = self
            .tokenizer
            .decode(&output_ids, true)
            .map_err(|e| GeneratorError::TokenizationFailed(format!("decode: {}", e)))?;

        tracing::debug!(
            input_tokens = input_ids.len(),
            output_tokens = output_ids.len(),
            "Decoding complete"
        );

        Ok(text.trim().to_string())
    }

    /// Tokenizes with special tokens and truncates to `max_tokens`, keeping
    /// the trailing end-of-sequence marker.
    fn encode_prompt(&self, prompt: &str, max_tokens: usize) -> Result<Vec<u32>, GeneratorError> {
        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| GeneratorError::TokenizationFailed(format!("encode: {}", e)))?;

        let mut ids = encoding.get_ids().to_vec();
        if max_tokens > 0 && ids.len() > max_tokens {
            ids.truncate(max_tokens - 1);
            ids.push(self.eos_token);
        }
        Ok(ids)
    }

    fn beam_log_probs(
        &mut self,
        beams: &[Vec<u32>],
        encoder_output: &Tensor,
    ) -> Result<Vec<Vec<f32>>, GeneratorError> {
        let batch = beams.len();
        let seq_len = beams.first().map(Vec::len).unwrap_or(0);
        let flat: Vec<u32> = beams.iter().flatten().copied().collect();

        let decoder_ids =
            Tensor::from_vec(flat, (batch, seq_len), &self.device).map_err(generation_failed)?;
        let encoder_batch = encoder_output
            .repeat((batch, 1, 1))
            .map_err(generation_failed)?;

        let logits = self
            .model
            .decode(&decoder_ids, &encoder_batch)
            .and_then(|t| t.to_dtype(DType::F32))
            .map_err(generation_failed)?;

        candle_nn::ops::log_softmax(&logits, D::Minus1)
            .and_then(|t| t.to_vec2::<f32>())
            .map_err(generation_failed)
    }

    fn sample(
        &mut self,
        mut processor: LogitsProcessor,
        encoder_output: &Tensor,
        max_new_tokens: usize,
    ) -> Result<Vec<u32>, GeneratorError> {
        let mut tokens = vec![self.start_token];

        for _ in 0..max_new_tokens {
            let decoder_ids = Tensor::new(tokens.as_slice(), &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(generation_failed)?;

            let logits = self
                .model
                .decode(&decoder_ids, encoder_output)
                .and_then(|t| t.squeeze(0))
                .and_then(|t| t.to_dtype(DType::F32))
                .map_err(generation_failed)?;

            let next_token = processor.sample(&logits).map_err(generation_failed)?;
            if next_token == self.eos_token {
                break;
            }
            tokens.push(next_token);
        }

        Ok(tokens.split_off(1))
    }
}

fn generation_failed(e: candle_core::Error) -> GeneratorError {
    GeneratorError::GenerationFailed(e.to_string())
}
