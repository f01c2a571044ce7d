// ============================================================
// Layer 4 — Train/Evaluation Splitter
// ============================================================
// Randomly shuffles samples and splits them into a training
// set and a held-out evaluation set. The aspect corpus carries
// no predefined split, so one is made here; shuffling first
// keeps both sets representative even when the corpus file is
// grouped by label or by aspect.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `samples` and split into (train, eval).
///
/// `train_fraction` is the proportion kept for training,
/// e.g. 0.8 keeps 80% for training and holds out 20%.
pub fn split_train_eval<T, R: Rng>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<T>, Vec<T>) {
    samples.shuffle(rng);

    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] and returns them
    let held_out = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} train, {} held out",
        samples.len(),
        held_out.len(),
    );

    (samples, held_out)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_correct_split_sizes() {
        let mut rng = StdRng::seed_from_u64(3);
        let items: Vec<usize> = (0..100).collect();
        let (train, eval) = split_train_eval(items, 0.8, &mut rng);
        assert_eq!(train.len(), 80);
        assert_eq!(eval.len(), 20);
    }

    #[test]
    fn test_all_items_preserved() {
        let mut rng = StdRng::seed_from_u64(3);
        let items: Vec<usize> = (0..50).collect();
        let (mut train, eval) = split_train_eval(items, 0.7, &mut rng);
        train.extend(eval);
        train.sort_unstable();
        assert_eq!(train, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_dataset() {
        let mut rng = StdRng::seed_from_u64(3);
        let (train, eval) = split_train_eval(Vec::<usize>::new(), 0.8, &mut rng);
        assert!(train.is_empty());
        assert!(eval.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        let mut rng = StdRng::seed_from_u64(3);
        let items: Vec<usize> = (0..10).collect();
        let (train, eval) = split_train_eval(items, 1.0, &mut rng);
        assert_eq!(train.len(), 10);
        assert!(eval.is_empty());
    }
}
