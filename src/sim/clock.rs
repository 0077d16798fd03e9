//! Fixed timestep accumulator
//!
//! Converts wall-clock frame deltas into a whole number of simulation ticks.
//! The fractional remainder carries over to the next frame, so any sequence of
//! deltas with the same total produces the same number of ticks.

use crate::consts::TICK_RATE;
use crate::ticks_to_millis;

/// Tolerance absorbing float error when a total lands exactly on a tick boundary
const STEP_EPSILON: f64 = 1e-9;

/// Simulated time, counted in fixed ticks since a state was activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    #[inline]
    pub fn ticks(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn millis(self) -> f64 {
        ticks_to_millis(self.0)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.0 += 1;
    }
}

#[derive(Debug, Clone)]
pub struct Clock {
    step: f64,
    accumulator: f64,
    /// Optional cap on ticks per call (spiral-of-death guard)
    max_steps: Option<u32>,
    total_ticks: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Unclamped clock at the simulation tick rate
    pub fn new() -> Self {
        Self {
            step: 1.0 / TICK_RATE as f64,
            accumulator: 0.0,
            max_steps: None,
            total_ticks: 0,
        }
    }

    /// Clock that never reports more than `max_steps` ticks per call.
    ///
    /// Whole steps beyond the cap are discarded; the fractional remainder is kept.
    pub fn with_max_steps(max_steps: u32) -> Self {
        Self {
            max_steps: Some(max_steps),
            ..Self::new()
        }
    }

    /// Feed elapsed wall-clock seconds, get the number of ticks to run
    pub fn tick(&mut self, elapsed_seconds: f64) -> u32 {
        if elapsed_seconds.is_finite() && elapsed_seconds > 0.0 {
            self.accumulator += elapsed_seconds;
        }

        let mut steps: u32 = 0;
        while self.accumulator + STEP_EPSILON >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        if self.accumulator < 0.0 {
            self.accumulator = 0.0;
        }

        if let Some(max) = self.max_steps {
            if steps > max {
                log::warn!("Frame stalled: dropping {} of {} ticks", steps - max, steps);
                steps = max;
            }
        }

        self.total_ticks += steps as u64;
        steps
    }

    /// Ticks produced since creation
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Seconds waiting in the accumulator (always less than one step)
    pub fn remainder(&self) -> f64 {
        self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(deltas: &[f64]) -> u64 {
        let mut clock = Clock::new();
        for &dt in deltas {
            clock.tick(dt);
        }
        clock.total_ticks()
    }

    #[test]
    fn test_same_total_same_ticks() {
        assert_eq!(run(&[0.033, 0.033, 0.034]), 6);
        assert_eq!(run(&[0.05, 0.05]), 6);
        assert_eq!(run(&[0.1]), 6);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut clock = Clock::new();
        assert_eq!(clock.tick(0.01), 0);
        assert_eq!(clock.tick(0.01), 1);
        assert!(clock.remainder() < 1.0 / 60.0);
    }

    #[test]
    fn test_ignores_bad_deltas() {
        let mut clock = Clock::new();
        assert_eq!(clock.tick(-1.0), 0);
        assert_eq!(clock.tick(f64::NAN), 0);
        assert_eq!(clock.tick(f64::INFINITY), 0);
        assert_eq!(clock.total_ticks(), 0);
    }

    #[test]
    fn test_clamped_clock() {
        let mut clock = Clock::with_max_steps(8);
        assert_eq!(clock.tick(1.0), 8);
        // Stall is not paid back on the next frame
        assert_eq!(clock.tick(1.0 / 60.0), 1);
    }

    #[test]
    fn test_sim_time_millis() {
        let mut t = SimTime::ZERO;
        for _ in 0..120 {
            t.advance();
        }
        assert_eq!(t.ticks(), 120);
        assert_eq!(t.millis(), 2000.0);
    }

    proptest! {
        #[test]
        fn prop_tick_count_depends_only_on_total(
            micros in prop::collection::vec(0u32..100_000, 1..40)
        ) {
            let deltas: Vec<f64> = micros.iter().map(|&m| m as f64 / 1_000_000.0).collect();
            let total_micros: u64 = micros.iter().map(|&m| m as u64).sum();
            let total = total_micros as f64 / 1_000_000.0;

            let expected = total_micros * TICK_RATE as u64 / 1_000_000;
            prop_assert_eq!(run(&deltas), expected);
            prop_assert_eq!(run(&[total]), expected);
        }
    }
}
