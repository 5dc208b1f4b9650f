// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-form 1D animation curves used by flings and animated pans.
//!
//! Both specs are stateless: they answer "where and how fast is the value
//! after `t` seconds" for a given start value and start velocity. The
//! stepping, bounds and cancellation live in [`crate::motion`].

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `ln`, `powf`, `sqrt`

/// Base friction of the exponential decay curve, per second.
const EXPONENTIAL_DECAY_FRICTION: f64 = -4.2;

/// Exponential velocity decay, used for flings.
///
/// With friction `f = -4.2 * friction_multiplier`, a fling started at `x0`
/// with velocity `v0` follows
///
/// ```text
/// x(t) = x0 + v0 / f * (exp(f * t) - 1)
/// v(t) = v0 * exp(f * t)
/// ```
///
/// and ends once `|v(t)|` falls to `abs_velocity_threshold`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecaySpec {
    friction: f64,
    abs_velocity_threshold: f64,
}

impl DecaySpec {
    /// Creates a decay curve.
    ///
    /// Non-positive or non-finite inputs fall back to the defaults (`1.5` and
    /// `0.1`), so the curve always decays and always terminates.
    #[must_use]
    pub fn exponential(friction_multiplier: f64, abs_velocity_threshold: f64) -> Self {
        let friction_multiplier = if friction_multiplier > 0.0 && friction_multiplier.is_finite() {
            friction_multiplier
        } else {
            1.5
        };
        let abs_velocity_threshold =
            if abs_velocity_threshold > 0.0 && abs_velocity_threshold.is_finite() {
                abs_velocity_threshold
            } else {
                0.1
            };
        Self {
            friction: EXPONENTIAL_DECAY_FRICTION * friction_multiplier,
            abs_velocity_threshold,
        }
    }

    /// Value after `t` seconds.
    #[must_use]
    pub fn value_at(&self, t: f64, initial_value: f64, initial_velocity: f64) -> f64 {
        initial_value + initial_velocity / self.friction * (exp(self.friction * t) - 1.0)
    }

    /// Velocity after `t` seconds.
    #[must_use]
    pub fn velocity_at(&self, t: f64, initial_velocity: f64) -> f64 {
        initial_velocity * exp(self.friction * t)
    }

    /// Seconds until the velocity decays to the threshold.
    #[must_use]
    pub fn duration(&self, initial_velocity: f64) -> f64 {
        let v = initial_velocity.abs();
        if v <= self.abs_velocity_threshold {
            return 0.0;
        }
        (self.abs_velocity_threshold / v).ln() / self.friction
    }

    /// Where an unbounded fling would come to rest.
    #[must_use]
    pub fn target_value(&self, initial_value: f64, initial_velocity: f64) -> f64 {
        initial_value - initial_velocity / self.friction
    }
}

impl Default for DecaySpec {
    fn default() -> Self {
        Self::exponential(1.5, 0.1)
    }
}

/// Damped harmonic spring, used for animated panning.
///
/// The spring has unit mass. A damping ratio of `1.0` is critically damped
/// (fastest approach with no overshoot), below `1.0` it oscillates, above it
/// approaches slowly without overshoot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringSpec {
    /// Damping ratio, `> 0`.
    pub damping_ratio: f64,
    /// Stiffness, `> 0`.
    pub stiffness: f64,
    /// Displacement and speed below which the spring counts as settled.
    pub visibility_threshold: f64,
}

impl SpringSpec {
    /// Creates a spring. Non-positive values are replaced by the defaults.
    #[must_use]
    pub fn new(damping_ratio: f64, stiffness: f64, visibility_threshold: f64) -> Self {
        let d = Self::default();
        let pick = |v: f64, fallback: f64| if v > 0.0 && v.is_finite() { v } else { fallback };
        Self {
            damping_ratio: pick(damping_ratio, d.damping_ratio),
            stiffness: pick(stiffness, d.stiffness),
            visibility_threshold: pick(visibility_threshold, d.visibility_threshold),
        }
    }

    /// Returns `(displacement, velocity)` after `t` seconds for a spring that
    /// starts displaced by `x0` from its rest position with velocity `v0`.
    #[must_use]
    pub fn displacement_at(&self, t: f64, x0: f64, v0: f64) -> (f64, f64) {
        let omega = self.stiffness.sqrt();
        let zeta = self.damping_ratio;
        if (zeta - 1.0).abs() < 1e-9 {
            let c1 = x0;
            let c2 = v0 + omega * x0;
            let e = exp(-omega * t);
            let x = (c1 + c2 * t) * e;
            let v = (c2 - omega * (c1 + c2 * t)) * e;
            (x, v)
        } else if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let a = x0;
            let b = (v0 + zeta * omega * x0) / omega_d;
            let e = exp(-zeta * omega * t);
            let (sin, cos) = (omega_d * t).sin_cos();
            let x = e * (a * cos + b * sin);
            let v = e
                * ((b * omega_d - zeta * omega * a) * cos - (a * omega_d + zeta * omega * b) * sin);
            (x, v)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            let e1 = exp(r1 * t);
            let e2 = exp(r2 * t);
            (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
        }
    }

    /// Returns `true` once both displacement and velocity are within the
    /// visibility threshold.
    #[must_use]
    pub fn is_settled(&self, displacement: f64, velocity: f64) -> bool {
        displacement.abs() <= self.visibility_threshold
            && velocity.abs() <= self.visibility_threshold
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 1500.0,
            visibility_threshold: 0.1,
        }
    }
}

#[cfg(feature = "std")]
#[inline]
fn exp(x: f64) -> f64 {
    x.exp()
}

// Kurbo's `FloatFuncs` has no `exp`.
#[cfg(not(feature = "std"))]
#[inline]
fn exp(x: f64) -> f64 {
    core::f64::consts::E.powf(x)
}
