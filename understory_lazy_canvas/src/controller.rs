// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glue between gesture recognition and transform state.
//!
//! [`CanvasController`] owns a [`TransformGestureRecognizer`] and applies its
//! output to a [`TransformState`]:
//!
//! - a new touch session stops any running fling or animated pan,
//! - each transform sample is applied with
//!   [`TransformState::apply_transform_delta`],
//! - the end-of-gesture velocity starts a per-axis fling.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::time::Duration;
//! use kurbo::{Point, Rect, Size, Vec2};
//! use understory_gesture::Touch;
//! use understory_lazy_canvas::CanvasController;
//! use understory_transform::TransformState;
//!
//! let mut state = TransformState::builder(Rect::new(0.0, 0.0, 1000.0, 1000.0))
//!     .build()
//!     .unwrap();
//! state.pass_constraints(Size::new(100.0, 100.0));
//! state.pan_to(Vec2::new(500.0, 500.0));
//!
//! let mut controller = CanvasController::default();
//! for (i, x) in [0.0, -20.0, -40.0, -60.0].into_iter().enumerate() {
//!     let mut batch = [Touch::down(1, Point::new(50.0 + x, 50.0))];
//!     controller.on_batch(&mut state, 16 * i as u64, &mut batch);
//! }
//! // Dragging left moves the content left.
//! assert_eq!(state.offset().x, -560.0);
//!
//! // Lifting the finger hands the velocity to a fling.
//! let mut up = [Touch::up(1, Point::new(-10.0, 50.0))];
//! controller.on_batch(&mut state, 64, &mut up);
//! assert!(state.is_animating());
//! state.advance(Duration::from_millis(16));
//! assert!(state.offset().x < -560.0);
//! ```

use kurbo::Vec2;
use understory_gesture::{
    GestureConfig, GestureEvent, GestureEvents, Touch, TransformGestureRecognizer,
};
use understory_transform::{MotionEvents, TransformState};

/// What a batch did to the transform state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControllerOutput {
    /// Events from the recognizer, in order.
    pub gestures: GestureEvents,
    /// Motions this batch stopped, either at touch down or by starting a
    /// fling over them.
    pub cancelled: MotionEvents,
    /// Sum of the offset deltas actually applied.
    pub applied: Vec2,
}

/// Drives a [`TransformState`] from touch batches.
#[derive(Clone, Debug, Default)]
pub struct CanvasController {
    recognizer: TransformGestureRecognizer,
}

impl CanvasController {
    /// Creates a controller with the given gesture tuning.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            recognizer: TransformGestureRecognizer::new(config),
        }
    }

    /// The underlying recognizer.
    #[must_use]
    pub fn recognizer(&self) -> &TransformGestureRecognizer {
        &self.recognizer
    }

    /// Processes one batch of touches and applies the result to `state`.
    pub fn on_batch(
        &mut self,
        state: &mut TransformState,
        time_ms: u64,
        touches: &mut [Touch],
    ) -> ControllerOutput {
        let gestures = self.recognizer.on_batch(time_ms, touches);
        let mut output = ControllerOutput::default();
        for event in &gestures {
            Self::apply(state, *event, &mut output);
        }
        output.gestures = gestures;
        output
    }

    /// Ends the current gesture, for example when the input stream was torn
    /// down, and flings with whatever velocity was tracked.
    pub fn cancel(&mut self, state: &mut TransformState) -> Option<GestureEvent> {
        let event = self.recognizer.cancel()?;
        Self::apply(state, event, &mut ControllerOutput::default());
        Some(event)
    }

    fn apply(state: &mut TransformState, event: GestureEvent, output: &mut ControllerOutput) {
        match event {
            GestureEvent::Started => {
                if state.is_animating() {
                    tracing::debug!("touch down stops running motion");
                }
                output.cancelled.extend(state.cancel_motion());
            }
            GestureEvent::Transform(sample) => {
                output.applied += state.apply_transform_delta(
                    sample.zoom_factor,
                    sample.rotation_delta,
                    sample.pan_delta,
                    sample.centroid,
                );
            }
            GestureEvent::Stopped(velocity) => {
                output.cancelled.extend(state.fling(velocity.pan));
            }
        }
    }
}
