mod analysis_service;
mod flashcard_generator;
mod key_phrase_extractor;
mod question_generator;
mod sentence_splitter;

pub use analysis_service::{AnalysisError, AnalysisReport, AnalysisService};
pub use flashcard_generator::{
    DEFAULT_MIN_SCORE, FlashcardError, FlashcardGenerator, FlashcardGeneratorConfig,
    build_flashcard_prompt, parse_qa_pairs,
};
pub use key_phrase_extractor::{
    DEFAULT_TOP_PHRASES, KeyPhraseError, KeyPhraseExtractor, candidate_phrases,
};
pub use question_generator::{
    QuestionGenerationError, QuestionGenerator, QuestionGeneratorConfig, chunk_words,
};
pub use sentence_splitter::split_sentences;
