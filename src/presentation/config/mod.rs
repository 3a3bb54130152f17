mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DecodingKind, DecodingSettings, FlashcardSettings, GenerationSettings, LoggingSettings,
    ModelSettings, QuestionSettings, ServerSettings, Settings,
};
