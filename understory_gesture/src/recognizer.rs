// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-touch pan/zoom/rotate recognition.
//!
//! ## Usage
//!
//! 1) Create a [`TransformGestureRecognizer`] with a [`GestureConfig`].
//! 2) For every input frame, pass the frame's touches and timestamp to
//!    [`TransformGestureRecognizer::on_batch`] and act on the returned
//!    [`GestureEvent`]s.
//! 3) If the input stream is torn down mid-gesture, call
//!    [`TransformGestureRecognizer::cancel`] to get a final stop event.
//!
//! A session runs from the first finger down to the last finger up. Until the
//! accumulated motion exceeds the touch slop nothing is reported, so a tap or
//! a resting finger never moves the canvas. Past the slop, every batch that
//! changes something yields one [`GestureEvent::Transform`], and the touches
//! that moved are marked consumed so other handlers leave them alone. If a
//! batch arrives with a touch already consumed by someone else, the session
//! ends early.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_gesture::{GestureEvent, Touch, TransformGestureRecognizer};
//!
//! let mut recognizer = TransformGestureRecognizer::default();
//!
//! let mut down = [Touch::down(1, Point::new(0.0, 0.0))];
//! assert_eq!(recognizer.on_batch(0, &mut down).as_slice(), &[GestureEvent::Started]);
//!
//! // Drag 20 units to the right in four frames.
//! let mut moved = 0.0;
//! for (i, x) in [5.0, 10.0, 15.0, 20.0].into_iter().enumerate() {
//!     let mut batch = [Touch::down(1, Point::new(x, 0.0))];
//!     for event in recognizer.on_batch(16 * (i as u64 + 1), &mut batch) {
//!         if let GestureEvent::Transform(sample) = event {
//!             moved += sample.pan_delta.x;
//!         }
//!     }
//! }
//! // The first 5 units stayed under the slop.
//! assert_eq!(moved, 15.0);
//!
//! let mut up = [Touch::up(1, Point::new(20.0, 0.0))];
//! let events = recognizer.on_batch(80, &mut up);
//! assert!(matches!(events.as_slice(), [GestureEvent::Stopped(_)]));
//! assert!(!recognizer.is_active());
//! ```

use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `ln`
use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::touch::{self, PointerId, Touch, TouchChange};
use crate::velocity::{VelocityTracker, VelocityTracker1D};

/// Tuning for [`TransformGestureRecognizer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Distance a gesture must cover before it starts reporting, in the same
    /// units as touch positions.
    pub touch_slop: f64,
    /// When set, a gesture that crosses the slop without meaningful rotation
    /// stays rotation-free until it ends.
    pub pan_zoom_lock: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_slop: 8.0,
            pan_zoom_lock: false,
        }
    }
}

/// Incremental change reported for one batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    /// Multiplicative zoom since the previous batch.
    pub zoom_factor: f64,
    /// Rotation since the previous batch, in degrees.
    pub rotation_delta: f64,
    /// Centroid displacement since the previous batch.
    pub pan_delta: Vec2,
    /// Centroid of the previous batch; the point the zoom and rotation pivot
    /// around.
    pub centroid: Point,
}

/// Velocities at the end of a gesture, per second.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FlingVelocity {
    /// Velocity of `ln(scale)`.
    pub log_zoom: f64,
    /// Rotation velocity in degrees per second.
    pub rotation: f64,
    /// Centroid velocity.
    pub pan: Vec2,
}

impl FlingVelocity {
    /// Returns `true` if every component is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.log_zoom == 0.0 && self.rotation == 0.0 && self.pan == Vec2::ZERO
    }
}

/// Output of [`TransformGestureRecognizer::on_batch`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// A new session began with this batch.
    Started,
    /// The gesture moved.
    Transform(GestureSample),
    /// The session ended with non-zero velocity.
    Stopped(FlingVelocity),
}

/// Events produced by a single batch; never more than two.
pub type GestureEvents = SmallVec<[GestureEvent; 2]>;

#[derive(Clone, Copy, Debug)]
struct TrackedPointer {
    id: PointerId,
    position: Point,
}

#[derive(Clone, Debug)]
struct Session {
    past_slop: bool,
    locked_to_pan_zoom: bool,
    total_zoom: f64,
    total_rotation: f64,
    total_pan: Vec2,
    log_zoom_velocity: VelocityTracker1D,
    rotation_velocity: VelocityTracker1D,
    pan_velocity: VelocityTracker,
}

impl Session {
    fn new() -> Self {
        Self {
            past_slop: false,
            locked_to_pan_zoom: false,
            total_zoom: 1.0,
            total_rotation: 0.0,
            total_pan: Vec2::ZERO,
            log_zoom_velocity: VelocityTracker1D::differential(),
            rotation_velocity: VelocityTracker1D::differential(),
            pan_velocity: VelocityTracker::new(),
        }
    }

    fn velocity(&self) -> FlingVelocity {
        FlingVelocity {
            log_zoom: self.log_zoom_velocity.velocity(),
            rotation: if self.locked_to_pan_zoom {
                0.0
            } else {
                self.rotation_velocity.velocity()
            },
            pan: self.pan_velocity.velocity(),
        }
    }
}

/// Turns a stream of touch batches into pan/zoom/rotate deltas and a final
/// fling velocity.
#[derive(Clone, Debug, Default)]
pub struct TransformGestureRecognizer {
    config: GestureConfig,
    /// Pressed pointers from the previous batch.
    pointers: SmallVec<[TrackedPointer; 4]>,
    session: Option<Session>,
    /// A session ended while fingers were still down; wait for them to lift.
    awaiting_release: bool,
}

impl TransformGestureRecognizer {
    /// Creates an idle recognizer.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    /// Returns `true` between the first finger down and the end of the session.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Returns `true` once the current session has crossed the touch slop.
    #[must_use]
    pub fn is_past_slop(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.past_slop)
    }

    /// Returns `true` if the current session ignores rotation.
    #[must_use]
    pub fn is_locked_to_pan_zoom(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.locked_to_pan_zoom)
    }

    /// Processes one batch of touches received at `time_ms`.
    ///
    /// Touches omitted from the batch that were pressed before count as
    /// lifted. Moved touches are marked consumed once the gesture is past the
    /// slop.
    pub fn on_batch(&mut self, time_ms: u64, touches: &mut [Touch]) -> GestureEvents {
        let changes = self.pair(touches);
        let any_pressed = touches.iter().any(|t| t.pressed);
        self.remember(touches);

        let mut events = GestureEvents::new();
        let Some(session) = self.session.as_mut() else {
            if self.awaiting_release {
                self.awaiting_release = any_pressed;
            } else if any_pressed {
                tracing::debug!(pointers = touches.len(), "transform gesture started");
                self.session = Some(Session::new());
                events.push(GestureEvent::Started);
            }
            return events;
        };

        let canceled = touches.iter().any(|t| t.consumed);
        if !canceled {
            let zoom_factor = touch::zoom(&changes);
            let mut rotation_delta = if session.locked_to_pan_zoom {
                0.0
            } else {
                touch::rotation(&changes)
            };
            let pan_delta = touch::pan(&changes);

            if !session.past_slop {
                session.total_zoom *= zoom_factor;
                session.total_rotation += rotation_delta;
                session.total_pan += pan_delta;

                let slop = self.config.touch_slop;
                let size = touch::centroid_size(&changes, false);
                let zoom_motion = (1.0 - session.total_zoom).abs() * size;
                let rotation_motion = (session.total_rotation * PI * size / 180.0).abs();
                let pan_motion = session.total_pan.hypot();

                if zoom_motion > slop || rotation_motion > slop || pan_motion > slop {
                    session.past_slop = true;
                    session.locked_to_pan_zoom =
                        self.config.pan_zoom_lock && rotation_motion < slop;
                    if session.locked_to_pan_zoom {
                        rotation_delta = 0.0;
                    }
                    tracing::debug!(
                        zoom_motion,
                        rotation_motion,
                        pan_motion,
                        locked = session.locked_to_pan_zoom,
                        "touch slop crossed"
                    );
                }
            }

            if session.past_slop {
                let moved = zoom_factor != 1.0 || rotation_delta != 0.0 || pan_delta != Vec2::ZERO;
                if let Some(centroid) = touch::centroid(&changes, false).filter(|_| moved) {
                    let sample = GestureSample {
                        zoom_factor,
                        rotation_delta,
                        pan_delta,
                        centroid,
                    };
                    tracing::trace!(?sample, "transform");
                    events.push(GestureEvent::Transform(sample));
                }

                for (touch, change) in touches.iter_mut().zip(&changes) {
                    if change.position_changed() {
                        touch.consumed = true;
                    }
                }

                session
                    .log_zoom_velocity
                    .add_data_point(time_ms, zoom_factor.ln());
                session
                    .rotation_velocity
                    .add_data_point(time_ms, rotation_delta);
                if let Some(centroid) = touch::centroid(&changes, true) {
                    session.pan_velocity.add_position(time_ms, centroid);
                }
            }
        }

        if canceled || !any_pressed {
            if canceled {
                tracing::debug!("transform gesture canceled by consumed touch");
            }
            events.extend(self.finish());
            self.awaiting_release = any_pressed;
        }
        events
    }

    /// Ends the current session from the outside, for example when the
    /// input stream was interrupted.
    ///
    /// Returns the stop event the session would have produced, if any. Until
    /// every pointer has been reported as lifted, no new session starts.
    pub fn cancel(&mut self) -> Option<GestureEvent> {
        if self.session.is_none() {
            return None;
        }
        tracing::debug!("transform gesture canceled");
        let event = self.finish();
        self.awaiting_release = !self.pointers.is_empty();
        event
    }

    fn finish(&mut self) -> Option<GestureEvent> {
        let session = self.session.take()?;
        let velocity = session.velocity();
        tracing::debug!(
            log_zoom = velocity.log_zoom,
            rotation = velocity.rotation,
            pan_x = velocity.pan.x,
            pan_y = velocity.pan.y,
            "transform gesture ended"
        );
        (!velocity.is_zero()).then_some(GestureEvent::Stopped(velocity))
    }

    fn pair(&self, touches: &[Touch]) -> SmallVec<[TouchChange; 4]> {
        touches
            .iter()
            .map(|touch| {
                let previous = self.pointers.iter().find(|p| p.id == touch.id);
                TouchChange {
                    position: touch.position,
                    previous_position: previous.map_or(touch.position, |p| p.position),
                    pressed: touch.pressed,
                    previous_pressed: previous.is_some(),
                }
            })
            .collect()
    }

    fn remember(&mut self, touches: &[Touch]) {
        self.pointers.clear();
        self.pointers.extend(
            touches
                .iter()
                .filter(|t| t.pressed)
                .map(|t| TrackedPointer {
                    id: t.id,
                    position: t.position,
                }),
        );
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::{GestureConfig, GestureEvent, TransformGestureRecognizer};
    use crate::touch::Touch;

    fn one(x: f64, y: f64) -> [Touch; 1] {
        [Touch::down(1, Point::new(x, y))]
    }

    fn two(a: (f64, f64), b: (f64, f64)) -> [Touch; 2] {
        [
            Touch::down(1, Point::new(a.0, a.1)),
            Touch::down(2, Point::new(b.0, b.1)),
        ]
    }

    #[test]
    fn tap_produces_nothing_but_start() {
        let mut r = TransformGestureRecognizer::default();
        assert_eq!(
            r.on_batch(0, &mut one(5.0, 5.0)).as_slice(),
            &[GestureEvent::Started]
        );
        assert!(r.on_batch(10, &mut one(5.0, 5.0)).is_empty());
        assert!(
            r.on_batch(20, &mut [Touch::up(1, Point::new(5.0, 5.0))])
                .is_empty()
        );
        assert!(!r.is_active());
    }

    #[test]
    fn motion_under_slop_is_not_reported() {
        let mut r = TransformGestureRecognizer::default();
        r.on_batch(0, &mut one(0.0, 0.0));
        for (i, x) in [2.0, 4.0, 6.0, 8.0].into_iter().enumerate() {
            let mut batch = one(x, 0.0);
            assert!(r.on_batch(10 * (i as u64 + 1), &mut batch).is_empty());
            assert!(!batch[0].consumed);
        }
        assert!(!r.is_past_slop());
    }

    #[test]
    fn crossing_slop_reports_the_whole_batch_delta() {
        let mut r = TransformGestureRecognizer::default();
        r.on_batch(0, &mut one(0.0, 0.0));
        r.on_batch(10, &mut one(6.0, 0.0));
        let mut batch = one(12.0, 0.0);
        let events = r.on_batch(20, &mut batch);
        let [GestureEvent::Transform(sample)] = events.as_slice() else {
            panic!("unexpected events: {events:?}");
        };
        assert_eq!(sample.pan_delta, Vec2::new(6.0, 0.0));
        assert_eq!(sample.zoom_factor, 1.0);
        assert_eq!(sample.centroid, Point::new(6.0, 0.0));
        assert!(batch[0].consumed);
        assert!(r.is_past_slop());
    }

    #[test]
    fn consumed_touch_cancels_and_waits_for_release() {
        let mut r = TransformGestureRecognizer::default();
        r.on_batch(0, &mut one(0.0, 0.0));
        let mut batch = one(20.0, 0.0);
        batch[0].consumed = true;
        let events = r.on_batch(10, &mut batch);
        assert!(events.is_empty(), "no data was tracked: {events:?}");
        assert!(!r.is_active());

        // Still pressed: no new session until everything lifts.
        assert!(r.on_batch(20, &mut one(30.0, 0.0)).is_empty());
        assert!(
            r.on_batch(30, &mut [Touch::up(1, Point::new(30.0, 0.0))])
                .is_empty()
        );
        assert_eq!(
            r.on_batch(40, &mut one(0.0, 0.0)).as_slice(),
            &[GestureEvent::Started]
        );
    }

    #[test]
    fn omitted_touch_counts_as_lifted() {
        let mut r = TransformGestureRecognizer::default();
        r.on_batch(0, &mut one(0.0, 0.0));
        r.on_batch(10, &mut one(0.0, 0.0));
        r.on_batch(20, &mut []);
        assert!(!r.is_active());
    }

    #[test]
    fn pan_zoom_lock_zeroes_rotation() {
        let config = GestureConfig {
            pan_zoom_lock: true,
            ..GestureConfig::default()
        };
        let mut r = TransformGestureRecognizer::new(config);
        r.on_batch(0, &mut two((-50.0, 0.0), (50.0, 0.0)));
        // Pure spread crosses the slop without rotation.
        r.on_batch(10, &mut two((-50.0, 0.0), (50.0, 0.0)));
        r.on_batch(20, &mut two((-70.0, 0.0), (70.0, 0.0)));
        assert!(r.is_locked_to_pan_zoom());

        // Now rotate a quarter turn.
        let events = r.on_batch(30, &mut two((0.0, -70.0), (0.0, 70.0)));
        for event in &events {
            if let GestureEvent::Transform(sample) = event {
                assert_eq!(sample.rotation_delta, 0.0);
            }
        }
    }

    #[test]
    fn rotation_passes_through_without_lock() {
        let mut r = TransformGestureRecognizer::default();
        r.on_batch(0, &mut two((-50.0, 0.0), (50.0, 0.0)));
        r.on_batch(10, &mut two((-50.0, 0.0), (50.0, 0.0)));
        let events = r.on_batch(20, &mut two((0.0, -50.0), (0.0, 50.0)));
        let [GestureEvent::Transform(sample)] = events.as_slice() else {
            panic!("unexpected events: {events:?}");
        };
        assert!((sample.rotation_delta - 90.0).abs() < 1e-9);
        assert!(!r.is_locked_to_pan_zoom());
    }

    #[test]
    fn cancel_returns_stop_with_tracked_velocity() {
        let mut r = TransformGestureRecognizer::default();
        r.on_batch(0, &mut one(0.0, 0.0));
        for i in 1..=5_u32 {
            r.on_batch(u64::from(i) * 10, &mut one(f64::from(i) * 10.0, 0.0));
        }
        let Some(GestureEvent::Stopped(velocity)) = r.cancel() else {
            panic!("expected a stop event");
        };
        assert!((velocity.pan.x - 1000.0).abs() < 1e-6);
        assert_eq!(velocity.pan.y, 0.0);
        assert_eq!(velocity.log_zoom, 0.0);
        assert!(!r.is_active());
        assert!(r.cancel().is_none());

        // The finger is still down; it has to lift before the next session.
        assert!(r.on_batch(60, &mut one(60.0, 0.0)).is_empty());
    }
}
