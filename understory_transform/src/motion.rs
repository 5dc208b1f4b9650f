// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Step-driven motions: per-axis flings and the animated pan.
//!
//! Motions do not own the offset. Each step receives the elapsed time and
//! returns the new value for the axis (or offset) it drives; the owner writes
//! it back. This keeps a single mutator for the transform state while still
//! letting the two fling axes run independently of each other.

use kurbo::Vec2;

use crate::animation::{DecaySpec, SpringSpec};
use crate::geometry::coerce_in;
use crate::modes::Axis;

/// Why a motion stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// The motion ran into a pan bound; it may still carry velocity.
    BoundReached,
    /// The motion ran to completion.
    Finished,
    /// The motion was cancelled by the owner, usually because a new gesture
    /// started.
    Cancelled,
}

/// Reported by [`crate::TransformState::advance`] and
/// [`crate::TransformState::cancel_motion`] when a motion stops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionEvent {
    /// A fling on one axis stopped.
    FlingEnded {
        /// The axis whose fling stopped.
        axis: Axis,
        /// Velocity left over when the fling stopped, in units per second.
        ///
        /// Zero when the fling decayed to rest; the velocity at the moment of
        /// impact when it hit a bound. Overscroll effects can consume this.
        residual_velocity: f64,
        /// Why it stopped.
        reason: EndReason,
    },
    /// The animated pan stopped.
    PanAnimationEnded {
        /// Why it stopped.
        reason: EndReason,
    },
}

/// One step of a 1D motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Step {
    pub(crate) value: f64,
    pub(crate) velocity: f64,
    pub(crate) end: Option<EndReason>,
}

/// Decay animation for a single offset axis.
///
/// The bounds are passed to every step rather than captured at the start, so
/// a viewport change mid-fling is honored.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AxisFling {
    decay: DecaySpec,
    initial_value: f64,
    initial_velocity: f64,
    elapsed: f64,
    velocity: f64,
}

impl AxisFling {
    pub(crate) fn new(decay: DecaySpec, initial_value: f64, initial_velocity: f64) -> Self {
        Self {
            decay,
            initial_value,
            initial_velocity,
            elapsed: 0.0,
            velocity: initial_velocity,
        }
    }

    /// Velocity as of the last step.
    pub(crate) fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Advances by `dt` seconds, stopping at whichever end of `bounds` the
    /// value crosses.
    pub(crate) fn step(&mut self, dt: f64, bounds: (f64, f64)) -> Step {
        self.elapsed += dt.max(0.0);
        let duration = self.decay.duration(self.initial_velocity);
        let t = self.elapsed.min(duration);
        let value = self.decay.value_at(t, self.initial_value, self.initial_velocity);
        let velocity = self.decay.velocity_at(t, self.initial_velocity);
        self.velocity = velocity;

        let clamped = coerce_in(value, bounds.0, bounds.1);
        if clamped != value {
            return Step {
                value: clamped,
                velocity,
                end: Some(EndReason::BoundReached),
            };
        }
        if self.elapsed >= duration {
            self.velocity = 0.0;
            return Step {
                value,
                velocity: 0.0,
                end: Some(EndReason::Finished),
            };
        }
        Step {
            value,
            velocity,
            end: None,
        }
    }
}

/// Spring animation of the whole offset toward a target.
///
/// Both axes share one clock and finish together.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PanAnimation {
    spring: SpringSpec,
    start: Vec2,
    target: Vec2,
    initial_velocity: Vec2,
    elapsed: f64,
    velocity: Vec2,
}

impl PanAnimation {
    pub(crate) fn new(spring: SpringSpec, start: Vec2, target: Vec2, initial_velocity: Vec2) -> Self {
        Self {
            spring,
            start,
            target,
            initial_velocity,
            elapsed: 0.0,
            velocity: initial_velocity,
        }
    }

    pub(crate) fn target(&self) -> Vec2 {
        self.target
    }

    pub(crate) fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Advances the spring; returns the offset to apply and whether it settled.
    pub(crate) fn step(&mut self, dt: f64) -> (Vec2, bool) {
        self.elapsed += dt.max(0.0);
        let d0 = self.start - self.target;
        let (dx, vx) = self
            .spring
            .displacement_at(self.elapsed, d0.x, self.initial_velocity.x);
        let (dy, vy) = self
            .spring
            .displacement_at(self.elapsed, d0.y, self.initial_velocity.y);
        self.velocity = Vec2::new(vx, vy);
        if self.spring.is_settled(dx, vx) && self.spring.is_settled(dy, vy) {
            self.velocity = Vec2::ZERO;
            return (self.target, true);
        }
        (self.target + Vec2::new(dx, dy), false)
    }
}

/// Everything that can be running on a transform state at once.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Motion {
    pub(crate) fling_x: Option<AxisFling>,
    pub(crate) fling_y: Option<AxisFling>,
    pub(crate) pan: Option<PanAnimation>,
}

impl Motion {
    pub(crate) fn fling_mut(&mut self, axis: Axis) -> &mut Option<AxisFling> {
        match axis {
            Axis::X => &mut self.fling_x,
            Axis::Y => &mut self.fling_y,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.fling_x.is_some() || self.fling_y.is_some() || self.pan.is_some()
    }
}
