use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::{Encoding, Tokenizer, TruncationParams};

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

use super::hub::ModelFiles;

const ENCODE_BATCH_SIZE: usize = 16;

/// Sentence-transformer style embedder: BERT forward pass, attention-masked
/// mean pooling, L2 normalisation. Used for key-phrase ranking and flashcard
/// scoring.
pub struct LocalCandleEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl LocalCandleEmbedder {
    pub fn new(model_id: &str) -> Result<Self, EmbedderError> {
        let device = Device::new_metal(0).unwrap_or(Device::Cpu);
        tracing::info!(device = ?device, model = model_id, "Initializing sentence embedder");

        let files = ModelFiles::fetch(model_id).map_err(EmbedderError::ModelLoadFailed)?;
        let config: BertConfig = files.read_config().map_err(EmbedderError::ModelLoadFailed)?;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("tokenizer: {e}")))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("truncation: {e}")))?;

        let dtype = if device.is_cpu() { DType::F32 } else { DType::F16 };

        // SAFETY: the safetensors file is mapped read-only and outlives the model.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[&files.weights], dtype, &device) }
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("weights: {e}")))?;
        let model = BertModel::load(vb, &config)
            .map_err(|e| EmbedderError::ModelLoadFailed(format!("model: {e}")))?;

        tracing::info!(model = model_id, "Sentence embedder ready");

        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    /// Encodes `texts` in fixed-size batches. Output order follows input order.
    pub fn encode_all(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(ENCODE_BATCH_SIZE) {
            embeddings.extend(self.encode_batch(batch)?);
        }
        Ok(embeddings)
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbedderError::InferenceFailed(format!("tokenization: {e}")))?;

        let batch = PaddedBatch::from_encodings(&encodings);
        let shape = (batch.rows, batch.width);
        let input_ids =
            Tensor::from_vec(batch.ids, shape, &self.device).map_err(inference_failed)?;
        let type_ids =
            Tensor::from_vec(batch.type_ids, shape, &self.device).map_err(inference_failed)?;
        let mask = Tensor::from_vec(batch.mask, shape, &self.device).map_err(inference_failed)?;

        let pooled = self
            .model
            .forward(&input_ids, &type_ids, Some(&mask))
            .and_then(|hidden| hidden.to_dtype(DType::F32))
            .and_then(|hidden| mean_pool(&hidden, &mask))
            .and_then(|pooled| pooled.to_vec2::<f32>())
            .map_err(inference_failed)?;

        Ok(pooled
            .into_iter()
            .map(|mut values| {
                l2_normalize(&mut values);
                Embedding::new(values)
            })
            .collect())
    }
}

/// Row-major token ids, type ids and attention mask, right-padded with zeros
/// to the longest encoding in the batch.
struct PaddedBatch {
    rows: usize,
    width: usize,
    ids: Vec<u32>,
    type_ids: Vec<u32>,
    mask: Vec<u32>,
}

impl PaddedBatch {
    fn from_encodings(encodings: &[Encoding]) -> Self {
        let width = encodings.iter().map(Encoding::len).max().unwrap_or(0);
        let capacity = encodings.len() * width;
        let mut batch = Self {
            rows: encodings.len(),
            width,
            ids: Vec::with_capacity(capacity),
            type_ids: Vec::with_capacity(capacity),
            mask: Vec::with_capacity(capacity),
        };

        for encoding in encodings {
            let padding = width - encoding.len();
            pad_into(&mut batch.ids, encoding.get_ids(), padding);
            pad_into(&mut batch.type_ids, encoding.get_type_ids(), padding);
            pad_into(&mut batch.mask, encoding.get_attention_mask(), padding);
        }

        batch
    }
}

fn pad_into(target: &mut Vec<u32>, values: &[u32], padding: usize) {
    target.extend_from_slice(values);
    target.extend(std::iter::repeat_n(0, padding));
}

/// Averages token vectors over unmasked positions only.
fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
    let mask = attention_mask.to_dtype(DType::F32)?;
    let summed = hidden.broadcast_mul(&mask.unsqueeze(2)?)?.sum(1)?;
    let counts = mask.sum(1)?.unsqueeze(1)?;
    summed.broadcast_div(&counts)
}

fn l2_normalize(values: &mut [f32]) {
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        values.iter_mut().for_each(|v| *v /= norm);
    }
}

fn inference_failed(e: candle_core::Error) -> EmbedderError {
    EmbedderError::InferenceFailed(e.to_string())
}

#[async_trait]
impl Embedder for LocalCandleEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        self.encode_all(&[text])?
            .pop()
            .ok_or_else(|| EmbedderError::InferenceFailed("empty result".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.encode_all(texts)
    }
}
