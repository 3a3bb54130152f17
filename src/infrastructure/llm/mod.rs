mod beam_search;
mod candle_t5_generator;
mod hub;
mod lazy_model;
mod local_candle_embedder;
mod model_factory;

pub use beam_search::{BeamSearchConfig, beam_search, top_k};
pub use candle_t5_generator::CandleT5Generator;
pub use lazy_model::{LazyModel, ModelLoadError};
pub use local_candle_embedder::LocalCandleEmbedder;
pub use model_factory::{ModelFactory, ModelRegistry};
