// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: multi-touch transform gesture recognition.
//!
//! This crate turns batches of touch points into the incremental pan, zoom
//! and rotation a canvas should apply, and into a fling velocity when the
//! fingers lift. It is the input half of a pan/zoom/rotate canvas; the state
//! half lives in `understory_transform`.
//!
//! - [`touch`]: the batch model ([`Touch`], [`PointerId`]) and the centroid,
//!   zoom, pan and rotation measurements taken between two batches.
//! - [`velocity`]: impulse and least-squares velocity trackers.
//! - [`TransformGestureRecognizer`]: the per-session state machine with
//!   touch-slop gating and an optional pan/zoom lock.
//!
//! The recognizer does not read platform events itself. Callers convert
//! their pointer events into [`Touch`] batches with a millisecond timestamp
//! and forward each batch to [`TransformGestureRecognizer::on_batch`].
//!
//! ## Example
//!
//! Two fingers spreading apart zoom around their midpoint:
//!
//! ```rust
//! use kurbo::Point;
//! use understory_gesture::{GestureEvent, Touch, TransformGestureRecognizer};
//!
//! let mut recognizer = TransformGestureRecognizer::default();
//! let batch = |spread: f64| {
//!     [
//!         Touch::down(1, Point::new(100.0 - spread, 100.0)),
//!         Touch::down(2, Point::new(100.0 + spread, 100.0)),
//!     ]
//! };
//!
//! recognizer.on_batch(0, &mut batch(20.0));
//! recognizer.on_batch(16, &mut batch(20.0));
//! let events = recognizer.on_batch(32, &mut batch(40.0));
//!
//! let [GestureEvent::Transform(sample)] = events.as_slice() else {
//!     panic!("expected a transform");
//! };
//! assert_eq!(sample.zoom_factor, 2.0);
//! assert_eq!(sample.centroid, Point::new(100.0, 100.0));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod touch;
pub mod velocity;

mod recognizer;

pub use recognizer::{
    FlingVelocity, GestureConfig, GestureEvent, GestureEvents, GestureSample,
    TransformGestureRecognizer,
};
pub use touch::{PointerId, Touch, TouchChange};
