mod embedder;
mod file_loader;
mod text_generator;

pub use embedder::{Embedder, EmbedderError};
pub use file_loader::{FileLoader, FileLoaderError};
pub use text_generator::{DecodingStrategy, GenerationParams, GeneratorError, TextGenerator};
