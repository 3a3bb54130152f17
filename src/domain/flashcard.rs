use serde::Serialize;

/// A question/answer pair scored by how semantically close the two sides are.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
    pub score: f32,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, score: f32) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            score,
        }
    }
}
