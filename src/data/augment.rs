// ============================================================
// Layer 4 — Aspect Sample Augmentation
// ============================================================
// The aspect corpus is small, so each annotated review is
// expanded into exactly three synthetic training samples:
//
//   (a) the unmodified text with all-neutral soft targets,
//       teaching the model that unmarked text is uninformative
//       about the aspect slots;
//
//   (b) the text with its aspect term substituted by the first
//       placeholder marker, with hard targets for slot A
//       derived from the row's polarity;
//
//   (c) a concatenation of this review and a distinct partner
//       review, each with its aspect substituted by a distinct
//       marker, in randomly chosen order. Slot A and slot B
//       targets are derived independently from whichever review
//       received that marker.
//
// The partner for (c) is drawn at random; a draw equal to the
// current index wraps to the last index.
//
// Output size is exactly 3x the input size.
//
// Reference: rand crate documentation

use rand::Rng;

use crate::domain::label::AspectTargets;
use crate::domain::review::AspectReview;

/// Marker substituted for the first aspect term
pub const MARKER_A: &str = "[ASPECT-A]";

/// Marker substituted for the second aspect term
pub const MARKER_B: &str = "[ASPECT-B]";

/// One synthetic training sample: marker-substituted text plus
/// soft targets for the two aspect slots.
#[derive(Debug, Clone)]
pub struct AugmentedReview {
    pub text:    String,
    pub targets: AspectTargets,
}

/// Expand each aspect review into its three synthetic samples.
pub fn augment_reviews<R: Rng>(reviews: &[AspectReview], rng: &mut R) -> Vec<AugmentedReview> {
    let mut samples = Vec::with_capacity(reviews.len() * 3);

    for (index, review) in reviews.iter().enumerate() {
        // (a) unmodified copy, neutral targets
        samples.push(AugmentedReview {
            text:    review.text.clone(),
            targets: AspectTargets::neutral(),
        });

        // (b) single substitution, hard slot A
        samples.push(AugmentedReview {
            text:    review.substituted(MARKER_A),
            targets: AspectTargets::single(review.label),
        });

        // (c) two-aspect concatenation with a distinct partner
        let partner = &reviews[partner_index(index, rng.gen_range(0..reviews.len()), reviews.len())];
        let (first, second) = if rng.gen::<bool>() {
            (review, partner)
        } else {
            (partner, review)
        };
        samples.push(AugmentedReview {
            text: format!(
                "{} {}",
                first.substituted(MARKER_A),
                second.substituted(MARKER_B)
            ),
            targets: AspectTargets::pair(first.label, second.label),
        });
    }

    samples
}

/// Resolve the partner draw for sample (c): a draw equal to the
/// current index wraps to the last index.
fn partner_index(current: usize, drawn: usize, len: usize) -> usize {
    if drawn == current {
        len - 1
    } else {
        drawn
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::label::Polarity;
    use rand::{rngs::StdRng, SeedableRng};

    fn corpus() -> Vec<AspectReview> {
        vec![
            AspectReview::new("the acting was superb", "acting", Polarity::Positive),
            AspectReview::new("the plot fell apart", "plot", Polarity::Negative),
            AspectReview::new("the score soared", "score", Polarity::Positive),
        ]
    }

    #[test]
    fn test_output_is_exactly_three_times_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples = augment_reviews(&corpus(), &mut rng);
        assert_eq!(samples.len(), 9);
    }

    #[test]
    fn test_first_sample_is_unmodified_and_neutral() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples = augment_reviews(&corpus(), &mut rng);
        assert_eq!(samples[0].text, "the acting was superb");
        assert_eq!(samples[0].targets, AspectTargets::neutral());
    }

    #[test]
    fn test_second_sample_derives_hard_slot_a() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples = augment_reviews(&corpus(), &mut rng);

        // Positive review: slot A = (0, 1)
        assert_eq!(samples[1].text, "the [ASPECT-A] was superb");
        assert_eq!(samples[1].targets.slot_a(), (0.0, 1.0));
        assert_eq!(samples[1].targets.slot_b(), (0.5, 0.5));

        // Negative review: slot A = (1, 0)
        assert_eq!(samples[4].targets.slot_a(), (1.0, 0.0));
    }

    #[test]
    fn test_third_sample_carries_both_markers_and_hard_slots() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples = augment_reviews(&corpus(), &mut rng);

        for pair_sample in [&samples[2], &samples[5], &samples[8]] {
            assert!(pair_sample.text.contains(MARKER_A));
            assert!(pair_sample.text.contains(MARKER_B));
            assert!(pair_sample.targets.slot_a_is_hard());
            assert!(pair_sample.targets.slot_b_is_hard());
        }
    }

    #[test]
    fn test_self_pairing_wraps_to_last_index() {
        assert_eq!(partner_index(1, 1, 5), 4);
        assert_eq!(partner_index(1, 3, 5), 3);
        assert_eq!(partner_index(0, 0, 5), 4);
    }
}
