// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Velocity estimation from timestamped samples.
//!
//! ## Usage
//!
//! 1) Feed samples with [`VelocityTracker1D::add_data_point`] (or
//!    [`VelocityTracker::add_position`] for 2D positions) as input arrives.
//! 2) Ask for [`VelocityTracker1D::velocity`] when the gesture ends.
//! 3) [`VelocityTracker1D::reset`] before reusing the tracker.
//!
//! Only the most recent samples count: at most 20, no older than 100 ms
//! relative to the newest one, and the window stops at the first gap longer
//! than 40 ms (the pointer is assumed to have stopped there). Velocities are
//! reported in units per second; timestamps are milliseconds.
//!
//! ## Minimal example
//!
//! ```
//! use understory_gesture::velocity::VelocityTracker1D;
//!
//! let mut tracker = VelocityTracker1D::new();
//! for i in 0..5_u32 {
//!     // 3 units every 10 ms.
//!     tracker.add_data_point(u64::from(i) * 10, f64::from(i) * 3.0);
//! }
//! assert!((tracker.velocity() - 300.0).abs() < 1e-6);
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `sqrt`
use kurbo::{Point, Vec2};

const HISTORY_SIZE: usize = 20;
const HORIZON_MILLIS: u64 = 100;
const ASSUME_POINTER_MOVE_STOPPED_MILLIS: u64 = 40;

/// How a [`VelocityTracker1D`] turns samples into a velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VelocityStrategy {
    /// Kinetic-energy impulse estimate. Needs at least 2 samples and also
    /// accepts differential data.
    Impulse,
    /// Slope at the newest sample of a second-degree least-squares fit.
    /// Needs at least 3 samples.
    #[default]
    Lsq2,
}

impl VelocityStrategy {
    fn min_sample_size(self) -> usize {
        match self {
            Self::Impulse => 2,
            Self::Lsq2 => 3,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Sample {
    time_ms: u64,
    value: f64,
}

/// Estimates the velocity of a single scalar.
///
/// The tracker either receives absolute values (positions) or, when created
/// with [`VelocityTracker1D::differential`], the change since the previous
/// sample. Differential data always uses [`VelocityStrategy::Impulse`].
#[derive(Clone, Debug)]
pub struct VelocityTracker1D {
    differential: bool,
    strategy: VelocityStrategy,
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl VelocityTracker1D {
    /// Tracker for absolute values using [`VelocityStrategy::Lsq2`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_strategy(VelocityStrategy::Lsq2)
    }

    /// Tracker for absolute values using `strategy`.
    #[must_use]
    pub fn with_strategy(strategy: VelocityStrategy) -> Self {
        Self {
            differential: false,
            strategy,
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Tracker for per-sample deltas (for example a rotation delta per frame).
    #[must_use]
    pub fn differential() -> Self {
        Self {
            differential: true,
            ..Self::with_strategy(VelocityStrategy::Impulse)
        }
    }

    /// Returns `true` if samples are deltas rather than absolute values.
    #[must_use]
    pub fn is_differential(&self) -> bool {
        self.differential
    }

    /// Records `value` at `time_ms`.
    pub fn add_data_point(&mut self, time_ms: u64, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, value });
    }

    /// Forgets every sample.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }

    /// Current velocity estimate in units per second, or `0.0` when there are
    /// too few recent samples.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        // Walk back from the newest sample; collected newest first.
        let mut values = [0.0_f64; HISTORY_SIZE];
        let mut ages = [0.0_f64; HISTORY_SIZE];
        let mut count = 0;
        let mut index = self.index;
        let mut previous = newest;
        while count < HISTORY_SIZE {
            let Some(sample) = self.samples[index] else {
                break;
            };
            let age = newest.time_ms.saturating_sub(sample.time_ms);
            let gap = previous.time_ms.abs_diff(sample.time_ms);
            previous = if self.strategy == VelocityStrategy::Lsq2 || self.differential {
                sample
            } else {
                newest
            };
            if age > HORIZON_MILLIS || gap > ASSUME_POINTER_MOVE_STOPPED_MILLIS {
                break;
            }
            values[count] = sample.value;
            // Bounded by the horizon, so the conversion is exact.
            ages[count] = -(age as f64);
            index = if index == 0 { HISTORY_SIZE - 1 } else { index - 1 };
            count += 1;
        }

        if count < self.strategy.min_sample_size() {
            return 0.0;
        }

        // Chronological order from here on.
        values[..count].reverse();
        ages[..count].reverse();
        let per_ms = match self.strategy {
            VelocityStrategy::Impulse => {
                impulse_velocity(&values[..count], &ages[..count], self.differential)
            }
            VelocityStrategy::Lsq2 => least_squares_velocity(&values[..count], &ages[..count]),
        };
        per_ms * 1000.0
    }
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

/// Estimates the velocity of a 2D position with one tracker per axis.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
}

impl VelocityTracker {
    /// Tracker using [`VelocityStrategy::Lsq2`] on both axes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `position` at `time_ms`.
    pub fn add_position(&mut self, time_ms: u64, position: Point) {
        self.x.add_data_point(time_ms, position.x);
        self.y.add_data_point(time_ms, position.y);
    }

    /// Current velocity in units per second.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.x.velocity(), self.y.velocity())
    }

    /// Forgets every sample.
    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

fn kinetic_energy_to_velocity(kinetic_energy: f64) -> f64 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

/// Impulse estimate over chronological samples; units per millisecond.
///
/// Each segment's velocity adds the kinetic energy needed to move from the
/// velocity accumulated so far to the segment's own velocity. The first
/// segment counts half, as if the pointer started at rest.
fn impulse_velocity(values: &[f64], times: &[f64], differential: bool) -> f64 {
    let mut work = 0.0;
    for i in 1..values.len() {
        let dt = times[i] - times[i - 1];
        if dt == 0.0 {
            continue;
        }
        let delta = if differential {
            values[i]
        } else {
            values[i] - values[i - 1]
        };
        let v_curr = delta / dt;
        let v_prev = kinetic_energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == 1 {
            work *= 0.5;
        }
    }
    kinetic_energy_to_velocity(work)
}

/// Slope at `t = 0` (the newest sample) of the least-squares fit
/// `x(t) = c0 + c1 t + c2 t^2`; units per millisecond.
///
/// Falls back to a straight-line fit when the quadratic system is singular
/// (for example with repeated timestamps), and to zero when that is singular
/// as well.
fn least_squares_velocity(values: &[f64], times: &[f64]) -> f64 {
    let mut s = [0.0_f64; 5];
    let mut r = [0.0_f64; 3];
    for (&x, &t) in values.iter().zip(times) {
        let mut tp = 1.0;
        for (k, sk) in s.iter_mut().enumerate() {
            *sk += tp;
            if k < 3 {
                r[k] += x * tp;
            }
            tp *= t;
        }
    }

    let m = [[s[0], s[1], s[2]], [s[1], s[2], s[3]], [s[2], s[3], s[4]]];
    let det = det3(m);
    if det.abs() > 1e-9 * s[4].max(1.0) {
        let m1 = [[s[0], r[0], s[2]], [s[1], r[1], s[3]], [s[2], r[2], s[4]]];
        return det3(m1) / det;
    }

    let det = s[0] * s[2] - s[1] * s[1];
    if det.abs() > 1e-9 {
        return (s[0] * r[1] - s[1] * r[0]) / det;
    }
    0.0
}

fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::{VelocityStrategy, VelocityTracker, VelocityTracker1D};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    #[test]
    fn empty_tracker_reports_zero() {
        assert_eq!(VelocityTracker1D::new().velocity(), 0.0);
        assert_eq!(VelocityTracker1D::differential().velocity(), 0.0);
        assert_eq!(VelocityTracker::new().velocity(), Vec2::ZERO);
    }

    #[test]
    fn too_few_samples_report_zero() {
        let mut lsq = VelocityTracker1D::new();
        lsq.add_data_point(0, 0.0);
        lsq.add_data_point(10, 5.0);
        assert_eq!(lsq.velocity(), 0.0);

        let mut impulse = VelocityTracker1D::with_strategy(VelocityStrategy::Impulse);
        impulse.add_data_point(0, 0.0);
        assert_eq!(impulse.velocity(), 0.0);
        impulse.add_data_point(10, 5.0);
        assert!(impulse.velocity() > 0.0);
    }

    #[test]
    fn constant_velocity_is_recovered_by_every_strategy() {
        let mut lsq = VelocityTracker1D::new();
        let mut impulse = VelocityTracker1D::with_strategy(VelocityStrategy::Impulse);
        let mut diff = VelocityTracker1D::differential();
        for i in 0..8_u32 {
            let t = u64::from(i) * 8;
            lsq.add_data_point(t, f64::from(i) * -4.0);
            impulse.add_data_point(t, f64::from(i) * -4.0);
            diff.add_data_point(t, -4.0);
        }
        assert_close(lsq.velocity(), -500.0);
        assert_close(impulse.velocity(), -500.0);
        assert_close(diff.velocity(), -500.0);
        assert!(diff.is_differential());
        assert!(!impulse.is_differential());
    }

    #[test]
    fn lsq_reports_slope_at_newest_sample() {
        // x = t^2 / 10 (t in ms): slope 2t/10 at the newest t = 60 is 12 per ms.
        let mut lsq = VelocityTracker1D::new();
        for i in 0..7_u32 {
            let t = f64::from(i * 10);
            lsq.add_data_point(u64::from(i * 10), t * t / 10.0);
        }
        assert!((lsq.velocity() - 12_000.0).abs() < 1e-3);
    }

    #[test]
    fn samples_beyond_horizon_are_ignored() {
        let mut lsq = VelocityTracker1D::new();
        // Old fast motion...
        for i in 0..5_u32 {
            lsq.add_data_point(u64::from(i) * 10, f64::from(i) * 100.0);
        }
        // ...then a slow segment long after, with small gaps.
        for i in 0..12_u32 {
            lsq.add_data_point(200 + u64::from(i) * 10, 1000.0 + f64::from(i));
        }
        assert_close(lsq.velocity(), 100.0);
    }

    #[test]
    fn pause_before_release_means_zero_velocity() {
        let mut lsq = VelocityTracker1D::new();
        for i in 0..5_u32 {
            lsq.add_data_point(u64::from(i) * 10, f64::from(i) * 10.0);
        }
        // A single late sample after a 60 ms pause.
        lsq.add_data_point(100, 40.0);
        assert_eq!(lsq.velocity(), 0.0);
    }

    #[test]
    fn reset_clears_history() {
        let mut tracker = VelocityTracker::new();
        for i in 0..5_u32 {
            tracker.add_position(u64::from(i) * 10, Point::new(f64::from(i), f64::from(i)));
        }
        assert!(tracker.velocity() != Vec2::ZERO);
        tracker.reset();
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let mut tracker = VelocityTracker1D::differential();
        tracker.add_data_point(0, 1.0);
        tracker.add_data_point(10, f64::NAN);
        tracker.add_data_point(20, 1.0);
        assert!(tracker.velocity().is_finite());
    }

    #[test]
    fn two_dimensional_tracker_tracks_axes_independently() {
        let mut tracker = VelocityTracker::new();
        for i in 0..6_u32 {
            let t = u64::from(i) * 10;
            tracker.add_position(t, Point::new(f64::from(i) * 2.0, f64::from(i) * -1.0));
        }
        let v = tracker.velocity();
        assert_close(v.x, 200.0);
        assert_close(v.y, -100.0);
    }
}
