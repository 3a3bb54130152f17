use std::convert::Infallible;

use docquiz::infrastructure::llm::{BeamSearchConfig, beam_search, top_k};

const START: u32 = 0;
const EOS: u32 = 1;
const A: u32 = 2;
const B: u32 = 3;

fn row(probabilities: [f32; 4]) -> Vec<f32> {
    probabilities.iter().map(|p| p.ln()).collect()
}

/// After START: A is likelier than B. After A the model is unsure, after B
/// it almost surely stops, so `B EOS` beats `A EOS` overall.
fn garden_path(beams: &[Vec<u32>]) -> Result<Vec<Vec<f32>>, Infallible> {
    Ok(beams
        .iter()
        .map(|beam| match beam.last().copied() {
            Some(A) => row([0.0, 0.4, 0.3, 0.3]),
            Some(B) => row([0.0, 0.9, 0.05, 0.05]),
            _ => row([0.0, 0.05, 0.6, 0.35]),
        })
        .collect())
}

fn config(num_beams: usize, max_new_tokens: usize) -> BeamSearchConfig {
    BeamSearchConfig {
        num_beams,
        max_new_tokens,
        early_stopping: true,
        length_penalty: 1.0,
    }
}

#[test]
fn given_single_beam_when_searching_then_behaves_greedily() {
    let tokens = beam_search(&config(1, 10), START, EOS, garden_path).unwrap();

    assert_eq!(tokens, vec![A]);
}

#[test]
fn given_multiple_beams_when_searching_then_finds_higher_probability_sequence() {
    let tokens = beam_search(&config(2, 10), START, EOS, garden_path).unwrap();

    assert_eq!(tokens, vec![B]);
}

#[test]
fn given_model_that_never_stops_when_searching_then_returns_max_length_sequence() {
    let never_stop = |beams: &[Vec<u32>]| -> Result<Vec<Vec<f32>>, Infallible> {
        Ok(beams.iter().map(|_| row([0.0, 0.0, 0.9, 0.1])).collect())
    };

    let tokens = beam_search(&config(2, 3), START, EOS, never_stop).unwrap();

    assert_eq!(tokens, vec![A, A, A]);
}

#[test]
fn given_zero_new_tokens_when_searching_then_returns_empty_without_stepping() {
    let mut steps = 0;
    let tokens = beam_search(&config(4, 0), START, EOS, |beams| {
        steps += 1;
        garden_path(beams)
    })
    .unwrap();

    assert!(tokens.is_empty());
    assert_eq!(steps, 0);
}

#[test]
fn given_failing_step_when_searching_then_propagates_error() {
    let result = beam_search(&config(2, 5), START, EOS, |_beams| {
        Err::<Vec<Vec<f32>>, _>("decoder failed")
    });

    assert_eq!(result, Err("decoder failed"));
}

#[test]
fn given_row_when_taking_top_k_then_returns_best_first() {
    let best = top_k(&[0.1, 0.7, 0.2, 0.5], 2);

    assert_eq!(best, vec![(1, 0.7), (3, 0.5)]);
}

#[test]
fn given_non_finite_values_when_taking_top_k_then_they_are_skipped() {
    let best = top_k(&[f32::NEG_INFINITY, f32::NAN, -1.0], 3);

    assert_eq!(best, vec![(2, -1.0)]);
}

#[test]
fn given_k_larger_than_row_when_taking_top_k_then_returns_whole_row() {
    assert_eq!(top_k(&[0.2, 0.3], 10).len(), 2);
    assert!(top_k(&[0.2, 0.3], 0).is_empty());
}
