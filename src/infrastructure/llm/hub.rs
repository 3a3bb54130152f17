use std::path::PathBuf;

use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};

/// Local paths of the three artifacts every candle model here needs.
pub(crate) struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

impl ModelFiles {
    /// Resolves the files through the Hugging Face cache, downloading what
    /// is missing.
    pub(crate) fn fetch(model_id: &str) -> Result<Self, String> {
        let api = Api::new().map_err(|e| format!("hub client: {e}"))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));
        let get = |name: &str| repo.get(name).map_err(|e| format!("{name}: {e}"));

        Ok(Self {
            config: get("config.json")?,
            tokenizer: get("tokenizer.json")?,
            weights: get("model.safetensors")?,
        })
    }

    pub(crate) fn read_config<C: serde::de::DeserializeOwned>(&self) -> Result<C, String> {
        let raw = std::fs::read_to_string(&self.config).map_err(|e| format!("read config: {e}"))?;
        serde_json::from_str(&raw).map_err(|e| format!("parse config: {e}"))
    }
}
