#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use docquiz::application::ports::{
    Embedder, EmbedderError, GenerationParams, GeneratorError, TextGenerator,
};
use docquiz::domain::Embedding;

/// Returns a configured vector per exact text and `default` for the rest.
pub struct FixedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
}

impl FixedEmbedder {
    pub fn uniform() -> Self {
        Self {
            vectors: HashMap::new(),
            default: vec![0.1; 8],
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn with_default(mut self, vector: Vec<f32>) -> Self {
        self.default = vector;
        self
    }

    fn vector_for(&self, text: &str) -> Embedding {
        Embedding::new(
            self.vectors
                .get(text)
                .cloned()
                .unwrap_or_else(|| self.default.clone()),
        )
    }
}

#[async_trait::async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}

pub struct FailingEmbedder;

#[async_trait::async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbedderError> {
        Err(EmbedderError::InferenceFailed("embedder offline".to_string()))
    }

    async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        Err(EmbedderError::InferenceFailed("embedder offline".to_string()))
    }
}

/// Replays queued outputs, then repeats `fallback`. Records every call.
pub struct ScriptedGenerator {
    outputs: Mutex<VecDeque<String>>,
    fallback: String,
    calls: Mutex<Vec<(String, GenerationParams)>>,
}

impl ScriptedGenerator {
    pub fn always(output: &str) -> Self {
        Self {
            outputs: Mutex::new(VecDeque::new()),
            fallback: output.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn sequence(outputs: &[&str], fallback: &str) -> Self {
        Self {
            outputs: Mutex::new(outputs.iter().map(|s| s.to_string()).collect()),
            fallback: fallback.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    pub fn params(&self) -> Vec<GenerationParams> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GeneratorError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), params.clone()));
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

pub struct FailingGenerator;

#[async_trait::async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, GeneratorError> {
        Err(GeneratorError::GenerationFailed("out of memory".to_string()))
    }
}
