// ============================================================
// Layer 5 — Learning-Rate Schedule
// ============================================================
// Linear warmup followed by linear decay, stepped once per
// optimiser step:
//
//   lr
//   │      /\
//   │     /  \
//   │    /    \
//   │   /      \
//   └──┴────────┴──── step
//      warmup   total
//
// During the first `warmup` steps the rate climbs from 0 to the
// base rate; afterwards it decays linearly, reaching 0 at
// `total` steps. total = batches_per_epoch * num_epochs and
// warmup = total * warmup_ratio.
//
// Reference: Devlin et al. (2019) BERT, Appendix A.3

/// Per-step learning rate with linear warmup and linear decay.
pub struct LinearWarmupSchedule {
    base_lr:      f64,
    warmup_steps: usize,
    total_steps:  usize,
    current:      usize,
}

impl LinearWarmupSchedule {
    pub fn new(base_lr: f64, total_steps: usize, warmup_ratio: f64) -> Self {
        let warmup_steps = ((total_steps as f64) * warmup_ratio) as usize;
        Self {
            base_lr,
            warmup_steps,
            total_steps,
            current: 0,
        }
    }

    /// Advance one optimiser step and return the rate to use for it.
    pub fn step(&mut self) -> f64 {
        self.current += 1;

        if self.current <= self.warmup_steps {
            return self.base_lr * self.current as f64 / self.warmup_steps.max(1) as f64;
        }

        let remaining = self.total_steps.saturating_sub(self.current) as f64;
        let decay_span = self.total_steps.saturating_sub(self.warmup_steps).max(1) as f64;
        self.base_lr * (remaining / decay_span).max(0.0)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warmup_climbs_to_base_rate() {
        let mut s = LinearWarmupSchedule::new(1.0, 100, 0.1);
        let first = s.step();
        assert!(first > 0.0 && first < 1.0);

        // 9 more steps finish the warmup at exactly the base rate
        let mut last = first;
        for _ in 0..9 {
            last = s.step();
        }
        assert!((last - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_decay_reaches_zero_at_total() {
        let mut s = LinearWarmupSchedule::new(1.0, 100, 0.1);
        let mut last = 0.0;
        for _ in 0..100 {
            last = s.step();
        }
        assert!(last.abs() < 1e-9);
    }

    #[test]
    fn test_decay_is_monotonic_after_warmup() {
        let mut s = LinearWarmupSchedule::new(5e-5, 50, 0.2);
        for _ in 0..10 {
            s.step();
        }
        let mut prev = f64::MAX;
        for _ in 10..50 {
            let lr = s.step();
            assert!(lr < prev);
            prev = lr;
        }
    }

    #[test]
    fn test_rate_stays_zero_past_total() {
        let mut s = LinearWarmupSchedule::new(1.0, 10, 0.0);
        for _ in 0..10 {
            s.step();
        }
        assert_eq!(s.step(), 0.0);
        assert_eq!(s.step(), 0.0);
    }

    #[test]
    fn test_zero_warmup_starts_near_base_rate() {
        let mut s = LinearWarmupSchedule::new(1.0, 10, 0.0);
        let first = s.step();
        assert!(first > 0.8);
    }
}
