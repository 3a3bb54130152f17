mod analyze;
mod health;

pub use analyze::{AnalyzeResponse, analyze_handler};
pub use health::health_handler;
