// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_transform --heading-base-level=0

//! Understory Transform: pan/zoom/rotate state for transformable canvases.
//!
//! This crate owns the affine state of a large 2D layout shown through a
//! smaller viewport: a translation (`offset`), a uniform `scale` and a
//! rotation `angle` in degrees. It focuses on:
//! - Centroid-preserving composition of per-frame gesture deltas.
//! - Scale, rotation and pan bounds, where the pan bounds follow the current
//!   viewport size and scale.
//! - Jumping, spring-animated panning, and per-axis decay flings.
//!
//! It does **not** recognize gestures or render anything. Callers are
//! expected to:
//! - Feed recognized deltas (for example from `understory_gesture`) into
//!   [`TransformState::apply_transform_delta`].
//! - Call [`TransformState::pass_constraints`] on every layout pass.
//! - Drive running animations once per frame with [`TransformState::advance`].
//! - Read one [`Transform`] snapshot per layout pass.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size, Vec2};
//! use understory_transform::TransformState;
//!
//! let mut state = TransformState::builder(Rect::new(0.0, 0.0, 1000.0, 1000.0))
//!     .zoom_bounds(0.5..=3.0)
//!     .build()
//!     .unwrap();
//! state.pass_constraints(Size::new(100.0, 100.0));
//!
//! // Put layout point (50, 50) at the viewport's top-left corner.
//! state.pan_to(Vec2::new(50.0, 50.0));
//! assert_eq!(state.offset(), Vec2::new(-50.0, -50.0));
//!
//! // Pinch-zoom 2x around the viewport origin.
//! let delta = state.apply_transform_delta(2.0, 0.0, Vec2::ZERO, Point::ZERO);
//! assert_eq!(delta, Vec2::new(-50.0, -50.0));
//! assert_eq!(state.scale(), 2.0);
//! ```
//!
//! ## Flings
//!
//! Flings run one decay animation per axis, so reaching the horizontal bound
//! does not stop vertical motion:
//!
//! ```rust
//! use core::time::Duration;
//! use kurbo::{Rect, Size, Vec2};
//! use understory_transform::{MotionEvent, TransformState};
//!
//! let mut state = TransformState::builder(Rect::new(0.0, 0.0, 1000.0, 1000.0))
//!     .build()
//!     .unwrap();
//! state.pass_constraints(Size::new(100.0, 100.0));
//! state.fling(Vec2::new(-800.0, -800.0));
//!
//! while state.is_animating() {
//!     for event in state.advance(Duration::from_millis(16)) {
//!         if let MotionEvent::FlingEnded { axis, residual_velocity, .. } = event {
//!             // Hand `residual_velocity` to an overscroll effect, if any.
//!             let _ = (axis, residual_velocity);
//!         }
//!     }
//! }
//! assert!(state.offset().x < 0.0);
//! ```
//!
//! ## Design notes
//!
//! - Derived state (minimum scale, pan bounds) is recomputed eagerly whenever
//!   the viewport or scale changes; nothing is lazily observed.
//! - Motions are stepped by the owner, never by a background task. There is
//!   exactly one mutator, so no locking is involved.
//! - Whether live gestures respect the bounds is a [`LiveClamp`] choice.
//!
//! This crate is `no_std`. Enable either the `std` (default) or the `libm`
//! feature for the float math.

#![no_std]

mod animation;
mod error;
mod geometry;
mod modes;
mod motion;
mod transform_state;

pub use animation::{DecaySpec, SpringSpec};
pub use error::InvalidConfiguration;
pub use geometry::{OffsetExt, degrees_to_radians, radians_to_degrees};
pub use modes::{Axis, LiveClamp};
pub use motion::{EndReason, MotionEvent};
pub use transform_state::{
    MotionEvents, Transform, TransformDebugInfo, TransformState, TransformStateBuilder,
};
