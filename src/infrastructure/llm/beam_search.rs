#[derive(Debug, Clone, PartialEq)]
pub struct BeamSearchConfig {
    pub num_beams: usize,
    pub max_new_tokens: usize,
    /// Stop as soon as `num_beams` hypotheses have finished.
    pub early_stopping: bool,
    pub length_penalty: f32,
}

struct Finished {
    score: f32,
    tokens: Vec<u32>,
}

/// Beam search over an arbitrary next-token scorer.
///
/// `step` receives every live sequence (each starting with `start_token`)
/// and must return one log-probability row per sequence. The returned tokens
/// exclude `start_token` and the end-of-sequence token.
pub fn beam_search<E, F>(
    config: &BeamSearchConfig,
    start_token: u32,
    eos_token: u32,
    mut step: F,
) -> Result<Vec<u32>, E>
where
    F: FnMut(&[Vec<u32>]) -> Result<Vec<Vec<f32>>, E>,
{
    let num_beams = config.num_beams.max(1);
    let mut beams: Vec<Vec<u32>> = vec![vec![start_token]];
    let mut beam_scores: Vec<f32> = vec![0.0];
    let mut finished: Vec<Finished> = Vec::new();

    for _ in 0..config.max_new_tokens {
        let log_probs = step(&beams)?;

        let mut candidates: Vec<(f32, usize, u32)> =
            Vec::with_capacity(beams.len() * num_beams * 2);
        for (beam_index, row) in log_probs.iter().enumerate().take(beams.len()) {
            for (token, log_prob) in top_k(row, num_beams * 2) {
                candidates.push((beam_scores[beam_index] + log_prob, beam_index, token));
            }
        }
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut next_beams = Vec::with_capacity(num_beams);
        let mut next_scores = Vec::with_capacity(num_beams);

        for (rank, (score, beam_index, token)) in candidates.into_iter().enumerate() {
            if token == eos_token {
                if rank < num_beams {
                    let tokens = beams[beam_index][1..].to_vec();
                    let score = normalize(score, tokens.len() + 1, config.length_penalty);
                    finished.push(Finished { score, tokens });
                }
                continue;
            }

            let mut sequence = beams[beam_index].clone();
            sequence.push(token);
            next_beams.push(sequence);
            next_scores.push(score);

            if next_beams.len() == num_beams {
                break;
            }
        }

        let done = next_beams.is_empty()
            || is_done(config, num_beams, &finished, &next_scores, &next_beams);
        beams = next_beams;
        beam_scores = next_scores;

        if done {
            break;
        }
    }

    if finished.len() < num_beams {
        for (sequence, score) in beams.into_iter().zip(beam_scores) {
            let tokens = sequence[1..].to_vec();
            let score = normalize(score, tokens.len(), config.length_penalty);
            finished.push(Finished { score, tokens });
        }
    }

    Ok(finished
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|best| best.tokens)
        .unwrap_or_default())
}

fn is_done(
    config: &BeamSearchConfig,
    num_beams: usize,
    finished: &[Finished],
    live_scores: &[f32],
    live_beams: &[Vec<u32>],
) -> bool {
    if finished.len() < num_beams {
        return false;
    }
    if config.early_stopping {
        return true;
    }

    // Without early stopping, continue while a live beam could still beat the
    // worst finished hypothesis.
    let worst_finished = finished
        .iter()
        .map(|f| f.score)
        .fold(f32::INFINITY, f32::min);
    let best_live = live_scores
        .iter()
        .zip(live_beams)
        .map(|(score, beam)| {
            normalize(*score, beam.len().saturating_sub(1), config.length_penalty)
        })
        .fold(f32::NEG_INFINITY, f32::max);

    best_live <= worst_finished
}

fn normalize(score: f32, generated_len: usize, length_penalty: f32) -> f32 {
    let len = generated_len.max(1) as f32;
    score / len.powf(length_penalty)
}

/// Indices and values of the `k` largest finite entries, best first.
pub fn top_k(row: &[f32], k: usize) -> Vec<(u32, f32)> {
    let mut indexed: Vec<(u32, f32)> = row
        .iter()
        .enumerate()
        .filter(|(_, value)| value.is_finite())
        .map(|(index, value)| (index as u32, *value))
        .collect();

    let k = k.min(indexed.len());
    if k == 0 {
        return Vec::new();
    }

    indexed.select_nth_unstable_by(k - 1, |a, b| b.1.total_cmp(&a.1));
    indexed.truncate(k);
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed
}
