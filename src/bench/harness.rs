//! Adaptive timing harness
//!
//! A case is timed over `loops` back-to-back calls after an untimed warm-up
//! of `loops / 10` calls. If the timed pass is shorter than the floor, the
//! loop count doubles and the whole pass is repeated until the floor is
//! cleared or the ceiling is reached. Only the last pass is reported.

use std::time::{Duration, Instant};
use tracing::trace;

use crate::core::BenchConfig;

/// Loop-count and duration limits for one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingPolicy {
    pub initial_loops: u64,
    pub max_loops: u64,
    pub min_duration: Duration,
    pub pause: Duration,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self::from(&BenchConfig::default())
    }
}

impl From<&BenchConfig> for TimingPolicy {
    fn from(config: &BenchConfig) -> Self {
        Self {
            initial_loops: config.initial_loops,
            max_loops: config.max_loops,
            min_duration: config.min_duration(),
            pause: config.pause(),
        }
    }
}

/// Result of the final timed pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub loops: u64,
    pub elapsed: Duration,
    /// Number of timed passes it took to settle on `loops`
    pub passes: u32,
}

impl Measurement {
    pub fn seconds_per_iteration(&self) -> f64 {
        if self.loops == 0 {
            return 0.0;
        }
        self.elapsed.as_secs_f64() / self.loops as f64
    }

    pub fn reached_ceiling(&self, policy: &TimingPolicy) -> bool {
        self.loops >= policy.max_loops
    }
}

pub struct TimingHarness {
    policy: TimingPolicy,
}

impl TimingHarness {
    pub fn new(policy: TimingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &TimingPolicy {
        &self.policy
    }

    /// Time `op` adaptively.
    pub fn measure<F: FnMut()>(&self, mut op: F) -> Measurement {
        let ceiling = self.policy.max_loops.max(1);
        let mut loops = self.policy.initial_loops.clamp(1, ceiling);
        let mut elapsed = time_pass(&mut op, loops);
        let mut passes = 1;

        while elapsed < self.policy.min_duration && loops < ceiling {
            loops = loops.saturating_mul(2).min(ceiling);
            elapsed = time_pass(&mut op, loops);
            passes += 1;
            trace!(loops, elapsed_ms = elapsed.as_millis() as u64, "Timed pass");
        }

        Measurement { loops, elapsed, passes }
    }

    /// Sleep between cases so the next one starts from a settled power state.
    pub fn settle(&self) {
        if !self.policy.pause.is_zero() {
            std::thread::sleep(self.policy.pause);
        }
    }
}

impl Default for TimingHarness {
    fn default() -> Self {
        Self::new(TimingPolicy::default())
    }
}

fn time_pass<F: FnMut()>(op: &mut F, loops: u64) -> Duration {
    // Warmup
    for _ in 0..loops / 10 {
        op();
    }

    let start = Instant::now();
    for _ in 0..loops {
        op();
    }
    start.elapsed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(initial_loops: u64, max_loops: u64, min_duration: Duration) -> TimingPolicy {
        TimingPolicy {
            initial_loops,
            max_loops,
            min_duration,
            pause: Duration::ZERO,
        }
    }

    #[test]
    fn test_exact_call_count() {
        // 10 timed + 1 warm-up, floor already met after one pass
        let harness = TimingHarness::new(policy(10, 1 << 10, Duration::ZERO));
        let mut calls = 0u64;
        let m = harness.measure(|| calls += 1);
        assert_eq!(m.loops, 10);
        assert_eq!(m.passes, 1);
        assert_eq!(calls, 11);
    }

    #[test]
    fn test_doubles_until_ceiling() {
        let harness = TimingHarness::new(policy(4, 64, Duration::from_secs(3)));
        let mut calls = 0u64;
        let m = harness.measure(|| calls += 1);
        assert_eq!(m.loops, 64);
        assert_eq!(m.passes, 5);
        // timed: 4+8+16+32+64, warm-up: 0+0+1+3+6
        assert_eq!(calls, 124 + 10);
        assert!(m.reached_ceiling(harness.policy()));
    }

    #[test]
    fn test_slow_op_terminates_at_ceiling() {
        let harness = TimingHarness::new(policy(16, 256, Duration::from_secs(3)));
        let m = harness.measure(|| std::thread::sleep(Duration::from_micros(1)));
        assert_eq!(m.loops, 256);
        assert!(m.elapsed < Duration::from_secs(3));
    }

    #[test]
    fn test_floor_or_ceiling_property() {
        let p = policy(1, 1 << 20, Duration::from_millis(5));
        let harness = TimingHarness::new(p);
        let mut acc = 0u64;
        let m = harness.measure(|| {
            for i in 0..64u64 {
                acc = std::hint::black_box(acc.wrapping_add(i));
            }
        });
        assert!(m.elapsed >= p.min_duration || m.loops == p.max_loops);
    }

    #[test]
    fn test_ceiling_clamps_non_power_of_two() {
        let harness = TimingHarness::new(policy(3, 20, Duration::from_secs(3)));
        let m = harness.measure(|| {});
        assert_eq!(m.loops, 20);
    }

    #[test]
    fn test_zero_initial_loops_still_progresses() {
        let harness = TimingHarness::new(policy(0, 8, Duration::from_secs(3)));
        let m = harness.measure(|| {});
        assert_eq!(m.loops, 8);
    }

    #[test]
    fn test_initial_loops_does_not_change_per_call_cost() {
        let op = || std::thread::sleep(Duration::from_micros(200));
        let small = TimingHarness::new(policy(8, 1 << 12, Duration::from_millis(40))).measure(op);
        let large = TimingHarness::new(policy(16, 1 << 12, Duration::from_millis(40))).measure(op);
        let ratio = small.seconds_per_iteration() / large.seconds_per_iteration();
        assert!(ratio > 0.33 && ratio < 3.0, "ratio {}", ratio);
    }

    #[test]
    fn test_seconds_per_iteration() {
        let m = Measurement {
            loops: 4,
            elapsed: Duration::from_secs(2),
            passes: 1,
        };
        assert_eq!(m.seconds_per_iteration(), 0.5);
    }
}
