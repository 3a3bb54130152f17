mod document;
mod embedding;
mod flashcard;

pub use document::{ContentType, Document};
pub use embedding::Embedding;
pub use flashcard::Flashcard;
