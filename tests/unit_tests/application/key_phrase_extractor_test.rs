use std::sync::Arc;

use docquiz::application::ports::Embedder;
use docquiz::application::services::{KeyPhraseError, KeyPhraseExtractor, candidate_phrases};

use crate::helpers::{FailingEmbedder, FixedEmbedder};

const DOCUMENT: &str = "Alice went to Paris. The Eiffel Tower is tall.";

#[test]
fn given_capitalised_runs_when_collecting_candidates_then_returns_sorted_unique_phrases() {
    let phrases = candidate_phrases(DOCUMENT);

    assert_eq!(phrases, vec!["Alice", "Paris.", "The Eiffel Tower"]);
}

#[test]
fn given_long_lowercase_words_when_collecting_candidates_then_they_count_as_notable() {
    let phrases = candidate_phrases("the implementation was remarkably small");

    assert_eq!(phrases, vec!["implementation", "remarkably"]);
}

#[test]
fn given_repeated_phrase_when_collecting_candidates_then_it_appears_once() {
    let phrases = candidate_phrases("Rust is fast. Rust is safe.");

    assert_eq!(phrases, vec!["Rust"]);
}

#[test]
fn given_out_of_bounds_runs_when_collecting_candidates_then_they_are_dropped() {
    let long_run = "Alpha Bravo Charlie Delta Echo Foxtrot Golf Hotel India";
    let text = format!("Hi there. {long_run} here. Ok then.");

    let phrases = candidate_phrases(&text);

    assert!(phrases.is_empty(), "unexpected phrases: {phrases:?}");
}

#[test]
fn given_any_text_when_collecting_candidates_then_lengths_stay_in_bounds() {
    let text = "Quantum Electrodynamics describes interactions. \
                The Feynman diagrams visualise everything. A B C.";

    for phrase in candidate_phrases(text) {
        let chars = phrase.chars().count();
        assert!((3..=50).contains(&chars), "{phrase} has {chars} chars");
    }
}

#[tokio::test]
async fn given_no_candidates_when_extracting_then_falls_back_to_leading_sentences() {
    let embedder: Arc<dyn Embedder> = Arc::new(FailingEmbedder);
    let extractor = KeyPhraseExtractor::new(embedder, 8);

    let phrases = extractor.extract("the cat sat. a dog ran.").await.unwrap();

    assert_eq!(phrases, vec!["the cat sat.", "a dog ran."]);
}

#[tokio::test]
async fn given_more_sentences_than_top_n_when_falling_back_then_truncates() {
    let embedder: Arc<dyn Embedder> = Arc::new(FailingEmbedder);
    let extractor = KeyPhraseExtractor::new(embedder, 2);

    let phrases = extractor.extract("one. two. three.").await.unwrap();

    assert_eq!(phrases, vec!["one.", "two."]);
}

#[tokio::test]
async fn given_candidates_when_extracting_then_ranks_by_document_similarity() {
    let embedder: Arc<dyn Embedder> = Arc::new(
        FixedEmbedder::uniform()
            .with(DOCUMENT, vec![1.0, 0.0])
            .with("Alice", vec![0.2, 1.0])
            .with("Paris.", vec![1.0, 0.1])
            .with("The Eiffel Tower", vec![1.0, 0.5]),
    );
    let extractor = KeyPhraseExtractor::new(embedder, 2);

    let phrases = extractor.extract(DOCUMENT).await.unwrap();

    assert_eq!(phrases, vec!["Paris.", "The Eiffel Tower"]);
}

#[tokio::test]
async fn given_equal_scores_when_extracting_then_order_is_deterministic() {
    let embedder: Arc<dyn Embedder> = Arc::new(FixedEmbedder::uniform());
    let extractor = KeyPhraseExtractor::new(embedder, 8);

    let first = extractor.extract(DOCUMENT).await.unwrap();
    let second = extractor.extract(DOCUMENT).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn given_failing_embedder_when_candidates_exist_then_returns_embedding_error() {
    let embedder: Arc<dyn Embedder> = Arc::new(FailingEmbedder);
    let extractor = KeyPhraseExtractor::new(embedder, 8);

    let result = extractor.extract(DOCUMENT).await;

    assert!(matches!(result, Err(KeyPhraseError::Embedding(_))));
}
