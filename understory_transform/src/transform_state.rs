// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::RangeInclusive;
use core::time::Duration;

use kurbo::{Affine, Point, Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::animation::{DecaySpec, SpringSpec};
use crate::error::InvalidConfiguration;
use crate::geometry::{OffsetExt, degrees_to_radians};
use crate::modes::{Axis, LiveClamp};
use crate::motion::{AxisFling, EndReason, Motion, MotionEvent, PanAnimation};

/// Events produced by a single [`TransformState::advance`] or
/// [`TransformState::cancel_motion`] call.
///
/// At most one event per fling axis plus one for the animated pan.
pub type MotionEvents = SmallVec<[MotionEvent; 3]>;

/// A consistent snapshot of the pan/zoom/rotate transform.
///
/// A layout point `p` lands in view space at
/// `offset + rotate(angle) * (scale * p)`; see [`Transform::to_affine`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation applied after scaling and rotation.
    pub offset: Vec2,
    /// Uniform scale, always `> 0`.
    pub scale: f64,
    /// Rotation in degrees. Not wrapped into `[0, 360)`.
    pub angle: f64,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        scale: 1.0,
        angle: 0.0,
    };

    /// Layout → view affine: `translate(offset) * rotate(angle) * scale(scale)`.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.offset)
            * Affine::rotate(degrees_to_radians(self.angle))
            * Affine::scale(self.scale)
    }

    /// Maps a layout-space point into view space.
    #[must_use]
    pub fn layout_to_view_point(&self, pt: Point) -> Point {
        self.to_affine() * pt
    }

    /// Maps a view-space point into layout space.
    #[must_use]
    pub fn view_to_layout_point(&self, pt: Point) -> Point {
        self.to_affine().inverse() * pt
    }

    /// Layout-space bounding box of a view-space rectangle.
    ///
    /// With rotation the result is the axis-aligned box around the four
    /// mapped corners, so it can be larger than the rectangle itself.
    #[must_use]
    pub fn view_to_layout_rect(&self, rect: Rect) -> Rect {
        let inv = self.to_affine().inverse();
        let corners = [
            inv * Point::new(rect.x0, rect.y0),
            inv * Point::new(rect.x1, rect.y0),
            inv * Point::new(rect.x0, rect.y1),
            inv * Point::new(rect.x1, rect.y1),
        ];
        let mut out = Rect::from_points(corners[0], corners[1]);
        out = out.union_pt(corners[2]);
        out.union_pt(corners[3])
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Builder for [`TransformState`].
///
/// All parameters are validated together in [`TransformStateBuilder::build`].
#[derive(Clone, Debug)]
pub struct TransformStateBuilder {
    layout_bounds: Rect,
    initial_viewport_offset: Vec2,
    initial_scale: f64,
    zoom_bounds: RangeInclusive<f64>,
    initial_angle: f64,
    rotation_bounds: RangeInclusive<f64>,
    fling_decay: DecaySpec,
    pan_spring: SpringSpec,
    live_clamp: LiveClamp,
}

impl TransformStateBuilder {
    /// Starts a builder for a layout spanning `layout_bounds`.
    #[must_use]
    pub fn new(layout_bounds: Rect) -> Self {
        Self {
            layout_bounds,
            initial_viewport_offset: Vec2::ZERO,
            initial_scale: 1.0,
            zoom_bounds: f64::MIN_POSITIVE..=f64::MAX,
            initial_angle: 0.0,
            rotation_bounds: f64::NEG_INFINITY..=f64::INFINITY,
            fling_decay: DecaySpec::default(),
            pan_spring: SpringSpec::default(),
            live_clamp: LiveClamp::default(),
        }
    }

    /// Point of the layout that starts at the viewport's top-left corner.
    #[must_use]
    pub fn initial_viewport_offset(mut self, offset: Vec2) -> Self {
        self.initial_viewport_offset = offset;
        self
    }

    /// Starting scale; must lie in the zoom bounds.
    #[must_use]
    pub fn initial_scale(mut self, scale: f64) -> Self {
        self.initial_scale = scale;
        self
    }

    /// Minimum and maximum scale.
    #[must_use]
    pub fn zoom_bounds(mut self, bounds: RangeInclusive<f64>) -> Self {
        self.zoom_bounds = bounds;
        self
    }

    /// Starting angle in degrees; must lie in the rotation bounds.
    #[must_use]
    pub fn initial_angle(mut self, angle: f64) -> Self {
        self.initial_angle = angle;
        self
    }

    /// Minimum and maximum angle in degrees.
    #[must_use]
    pub fn rotation_bounds(mut self, bounds: RangeInclusive<f64>) -> Self {
        self.rotation_bounds = bounds;
        self
    }

    /// Decay curve used by flings.
    #[must_use]
    pub fn fling_decay(mut self, decay: DecaySpec) -> Self {
        self.fling_decay = decay;
        self
    }

    /// Spring used by [`TransformState::animate_pan_to`].
    #[must_use]
    pub fn pan_spring(mut self, spring: SpringSpec) -> Self {
        self.pan_spring = spring;
        self
    }

    /// Bounds policy for live gesture updates.
    #[must_use]
    pub fn live_clamp(mut self, mode: LiveClamp) -> Self {
        self.live_clamp = mode;
        self
    }

    /// Validates the configuration and creates the state.
    ///
    /// The viewport size starts at zero; call
    /// [`TransformState::pass_constraints`] before the first layout pass.
    pub fn build(self) -> Result<TransformState, InvalidConfiguration> {
        self.validate()?;
        let mut state = TransformState {
            layout_bounds: self.layout_bounds,
            zoom_bounds: self.zoom_bounds,
            rotation_bounds: self.rotation_bounds,
            fling_decay: self.fling_decay,
            pan_spring: self.pan_spring,
            live_clamp: self.live_clamp,
            viewport: Size::ZERO,
            offset: Vec2::ZERO,
            scale: self.initial_scale,
            angle: self.initial_angle,
            min_scale_bound: 0.0,
            pan_bounds: Rect::ZERO,
            motion: Motion::default(),
        };
        state.refresh_derived();
        state.offset = (-self.initial_viewport_offset).coerce_in_bounds(state.pan_bounds);
        tracing::debug!(
            layout_bounds = ?state.layout_bounds,
            offset = ?state.offset,
            scale = state.scale,
            angle = state.angle,
            "transform state created"
        );
        Ok(state)
    }

    fn validate(&self) -> Result<(), InvalidConfiguration> {
        let layout = self.layout_bounds;
        if layout.is_nan() || layout.x1 < layout.x0 || layout.y1 < layout.y0 {
            return Err(InvalidConfiguration::InvertedLayoutBounds {
                layout_bounds: layout,
            });
        }
        let offset = self.initial_viewport_offset;
        if offset.is_nan()
            || offset.x < layout.x0
            || offset.x > layout.x1
            || offset.y < layout.y0
            || offset.y > layout.y1
        {
            return Err(InvalidConfiguration::ViewportOffsetOutsideLayout {
                offset,
                layout_bounds: layout,
            });
        }

        let (zoom_min, zoom_max) = (*self.zoom_bounds.start(), *self.zoom_bounds.end());
        if zoom_min.is_nan() || zoom_min <= 0.0 {
            return Err(InvalidConfiguration::NonPositiveZoomBound { min: zoom_min });
        }
        if zoom_max.is_nan() || zoom_max < zoom_min {
            return Err(InvalidConfiguration::InvertedZoomBounds {
                min: zoom_min,
                max: zoom_max,
            });
        }
        if !self.zoom_bounds.contains(&self.initial_scale) {
            return Err(InvalidConfiguration::ScaleOutsideZoomBounds {
                scale: self.initial_scale,
                min: zoom_min,
                max: zoom_max,
            });
        }

        let (rot_min, rot_max) = (*self.rotation_bounds.start(), *self.rotation_bounds.end());
        if rot_min.is_nan() || rot_max.is_nan() || rot_max < rot_min {
            return Err(InvalidConfiguration::InvertedRotationBounds {
                min: rot_min,
                max: rot_max,
            });
        }
        if !self.rotation_bounds.contains(&self.initial_angle) {
            return Err(InvalidConfiguration::AngleOutsideRotationBounds {
                angle: self.initial_angle,
                min: rot_min,
                max: rot_max,
            });
        }
        Ok(())
    }
}

/// Pan/zoom/rotate state of a transformable layout.
///
/// `TransformState` is the single owner of the offset, scale and angle. Live
/// gestures feed it deltas through [`TransformState::apply_transform_delta`];
/// direct operations jump ([`TransformState::pan_to`]) or animate
/// ([`TransformState::animate_pan_to`], [`TransformState::fling`]). Animations
/// are advanced by the owner once per frame with [`TransformState::advance`].
///
/// The offset is the translation applied to layout content, so its negation
/// is the layout point at the viewport's top-left corner. Its legal range,
/// [`TransformState::pan_bounds`], depends on the viewport size and scale and
/// is recomputed eagerly whenever either changes.
#[derive(Clone, Debug)]
pub struct TransformState {
    layout_bounds: Rect,
    zoom_bounds: RangeInclusive<f64>,
    rotation_bounds: RangeInclusive<f64>,
    fling_decay: DecaySpec,
    pan_spring: SpringSpec,
    live_clamp: LiveClamp,
    viewport: Size,
    offset: Vec2,
    scale: f64,
    angle: f64,
    min_scale_bound: f64,
    pan_bounds: Rect,
    motion: Motion,
}

impl TransformState {
    /// Starts a [`TransformStateBuilder`] for `layout_bounds`.
    #[must_use]
    pub fn builder(layout_bounds: Rect) -> TransformStateBuilder {
        TransformStateBuilder::new(layout_bounds)
    }

    /// Bounds of the pannable layout.
    #[must_use]
    pub fn layout_bounds(&self) -> Rect {
        self.layout_bounds
    }

    /// Configured zoom bounds.
    #[must_use]
    pub fn zoom_bounds(&self) -> RangeInclusive<f64> {
        self.zoom_bounds.clone()
    }

    /// Configured rotation bounds, in degrees.
    #[must_use]
    pub fn rotation_bounds(&self) -> RangeInclusive<f64> {
        self.rotation_bounds.clone()
    }

    /// Live gesture bounds policy.
    #[must_use]
    pub fn live_clamp(&self) -> LiveClamp {
        self.live_clamp
    }

    /// Viewport size from the most recent [`TransformState::pass_constraints`].
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// Current translation.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Layout point at the viewport's top-left corner (`-offset`).
    #[must_use]
    pub fn viewport_offset(&self) -> Vec2 {
        -self.offset
    }

    /// Current scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current angle in degrees.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Snapshot of offset, scale and angle.
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform {
            offset: self.offset,
            scale: self.scale,
            angle: self.angle,
        }
    }

    /// Smallest scale at which the layout still covers the viewport, and at
    /// least the minimum zoom bound.
    #[must_use]
    pub fn min_scale_bound(&self) -> f64 {
        self.min_scale_bound
    }

    /// Legal range for [`TransformState::offset`] at the current scale.
    ///
    /// Always `x0 <= x1` and `y0 <= y1`; collapses to a point on an axis
    /// where the scaled viewport is at least as large as the layout.
    #[must_use]
    pub fn pan_bounds(&self) -> Rect {
        self.pan_bounds
    }

    /// Returns `true` while a fling or animated pan is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.motion.is_running()
    }

    /// Updates the viewport size and recomputes derived bounds.
    ///
    /// Call this on every layout pass before reading
    /// [`TransformState::pan_bounds`] or [`TransformState::min_scale_bound`].
    ///
    /// The first non-empty viewport also clamps the offset into the new pan
    /// bounds, since the initial offset was only checked against the layout.
    /// Later resizes leave the offset alone; running flings and animated pans
    /// stop at the new bounds.
    pub fn pass_constraints(&mut self, viewport: Size) {
        if self.viewport == viewport {
            return;
        }
        tracing::trace!(?viewport, "viewport constraints changed");
        let first_measure = self.viewport.is_zero_area() && !viewport.is_zero_area();
        self.viewport = viewport;
        self.refresh_derived();
        if first_measure {
            self.offset = self.offset.coerce_in_bounds(self.pan_bounds);
        }
    }

    /// Jumps so that `target` (a layout point) sits at the viewport's
    /// top-left corner, as far as the pan bounds allow.
    ///
    /// Stops any running fling or animated pan and returns their
    /// [`EndReason::Cancelled`] events.
    pub fn pan_to(&mut self, target: Vec2) -> MotionEvents {
        let cancelled = self.cancel_motion();
        self.offset = (-target).coerce_in_bounds(self.pan_bounds);
        tracing::debug!(?target, offset = ?self.offset, "pan to");
        cancelled
    }

    /// Starts a spring animation toward `target`, clamped to the pan bounds.
    ///
    /// Running flings are stopped and their cancellation events returned. A
    /// pan animation already in flight is retargeted and keeps its current
    /// velocity; it reports nothing. Drive it with
    /// [`TransformState::advance`]; [`TransformState::cancel_motion`] leaves
    /// the offset at its last animated value.
    pub fn animate_pan_to(&mut self, target: Vec2) -> MotionEvents {
        let mut cancelled = MotionEvents::new();
        for axis in Axis::ALL {
            cancelled.extend(self.cancel_fling(axis));
        }
        let velocity = self
            .motion
            .pan
            .map(|pan| pan.velocity())
            .unwrap_or(Vec2::ZERO);
        let clamped = (-target).coerce_in_bounds(self.pan_bounds);
        self.motion.pan = Some(PanAnimation::new(
            self.pan_spring,
            self.offset,
            clamped,
            velocity,
        ));
        tracing::debug!(?target, from = ?self.offset, to = ?clamped, "animated pan started");
        cancelled
    }

    /// Applies one frame of gesture input and returns the offset change.
    ///
    /// The scale is multiplied by `zoom_factor` and `rotation_delta` degrees
    /// are added to the angle; the offset is then moved so the layout point
    /// under `centroid` (view space) stays under it, and translated by
    /// `pan_delta`:
    ///
    /// ```text
    /// layout_centroid = centroid - offset
    /// offset += pan_delta + layout_centroid - rotate(layout_centroid * zoom, rotation)
    /// ```
    ///
    /// Under [`LiveClamp::Bounds`] the zoom and rotation actually applied may
    /// be smaller than requested and the offset is clamped into the pan
    /// bounds; the returned delta always reflects what happened. An identity
    /// delta returns zero without touching the state. A non-positive or
    /// non-finite zoom factor is treated as `1.0`.
    pub fn apply_transform_delta(
        &mut self,
        zoom_factor: f64,
        rotation_delta: f64,
        pan_delta: Vec2,
        centroid: Point,
    ) -> Vec2 {
        if zoom_factor == 1.0 && rotation_delta == 0.0 && pan_delta == Vec2::ZERO {
            return Vec2::ZERO;
        }
        let zoom_factor = if zoom_factor > 0.0 && zoom_factor.is_finite() {
            zoom_factor
        } else {
            1.0
        };
        let rotation_delta = if rotation_delta.is_finite() {
            rotation_delta
        } else {
            0.0
        };
        let pan_delta = if pan_delta.is_finite() {
            pan_delta
        } else {
            Vec2::ZERO
        };

        let before = self.offset;
        let (zoom, rotation) = match self.live_clamp {
            LiveClamp::None => {
                self.scale *= zoom_factor;
                self.angle += rotation_delta;
                (zoom_factor, rotation_delta)
            }
            LiveClamp::Bounds => {
                // Limit only the requested change. An out-of-range scale is
                // never pulled in by a pan or pushed further out by a zoom.
                let requested = self.scale * zoom_factor;
                let scale = if zoom_factor > 1.0 {
                    requested.min(self.max_scale_bound().max(self.scale))
                } else if zoom_factor < 1.0 {
                    requested.max(self.min_scale_bound.min(self.scale))
                } else {
                    self.scale
                };
                let angle = (self.angle + rotation_delta)
                    .clamp(*self.rotation_bounds.start(), *self.rotation_bounds.end());
                let applied = (scale / self.scale, angle - self.angle);
                self.scale = scale;
                self.angle = angle;
                applied
            }
        };
        self.refresh_derived();

        let layout_centroid = centroid.to_vec2() - before;
        let mut offset =
            before + pan_delta + layout_centroid - (layout_centroid * zoom).rotate_by(rotation);
        if self.live_clamp == LiveClamp::Bounds {
            offset = offset.coerce_in_bounds(self.pan_bounds);
        }
        self.offset = offset;

        let delta = offset - before;
        tracing::trace!(
            zoom,
            rotation,
            ?pan_delta,
            ?centroid,
            ?delta,
            scale = self.scale,
            angle = self.angle,
            "transform delta applied"
        );
        delta
    }

    /// Starts a decay fling on one axis with `initial_velocity` (units per
    /// second), bounded by that axis of the pan bounds.
    ///
    /// The other axis is unaffected; hitting this axis' bound never stops the
    /// other one. The bounds are read on every [`TransformState::advance`],
    /// so a fling stops at the current pan bounds even if the viewport
    /// changed after it started. The fling's end, with its residual
    /// velocity, is reported by [`TransformState::advance`].
    ///
    /// Any animated pan and any fling already running on `axis` are stopped;
    /// their [`EndReason::Cancelled`] events are returned.
    pub fn fling_axis(&mut self, axis: Axis, initial_velocity: f64) -> MotionEvents {
        let initial_velocity = if initial_velocity.is_finite() {
            initial_velocity
        } else {
            0.0
        };
        let mut cancelled = MotionEvents::new();
        cancelled.extend(self.cancel_pan());
        cancelled.extend(self.cancel_fling(axis));
        let fling = AxisFling::new(self.fling_decay, axis.of(self.offset), initial_velocity);
        *self.motion.fling_mut(axis) = Some(fling);
        tracing::debug!(?axis, initial_velocity, "fling started");
        cancelled
    }

    /// Starts independent flings on both axes and returns the events of the
    /// motions they displaced.
    pub fn fling(&mut self, velocity: Vec2) -> MotionEvents {
        let mut cancelled = MotionEvents::new();
        for axis in Axis::ALL {
            cancelled.extend(self.fling_axis(axis, axis.of(velocity)));
        }
        cancelled
    }

    /// Advances running motions by `dt` and reports those that ended.
    pub fn advance(&mut self, dt: Duration) -> MotionEvents {
        let dt = dt.as_secs_f64();
        let mut events = MotionEvents::new();

        for axis in Axis::ALL {
            let bounds = axis.range_of(self.pan_bounds);
            let slot = self.motion.fling_mut(axis);
            let Some(fling) = slot.as_mut() else {
                continue;
            };
            let step = fling.step(dt, bounds);
            self.offset = axis.with(self.offset, step.value);
            if let Some(reason) = step.end {
                *slot = None;
                tracing::debug!(?axis, ?reason, residual_velocity = step.velocity, "fling ended");
                events.push(MotionEvent::FlingEnded {
                    axis,
                    residual_velocity: step.velocity,
                    reason,
                });
            }
        }

        if let Some(pan) = self.motion.pan.as_mut() {
            let (offset, settled) = pan.step(dt);
            let clamped = offset.coerce_in_bounds(self.pan_bounds);
            let reason = if clamped != offset {
                Some(EndReason::BoundReached)
            } else if settled {
                Some(EndReason::Finished)
            } else {
                None
            };
            self.offset = clamped;
            if let Some(reason) = reason {
                self.motion.pan = None;
                tracing::debug!(?reason, offset = ?self.offset, "animated pan ended");
                events.push(MotionEvent::PanAnimationEnded { reason });
            }
        }

        events
    }

    /// Stops every running motion, leaving the offset where it is.
    ///
    /// Flings report the velocity they had when cancelled.
    pub fn cancel_motion(&mut self) -> MotionEvents {
        let mut events = MotionEvents::new();
        for axis in Axis::ALL {
            events.extend(self.cancel_fling(axis));
        }
        events.extend(self.cancel_pan());
        if !events.is_empty() {
            tracing::debug!(offset = ?self.offset, "motion cancelled");
        }
        events
    }

    fn cancel_fling(&mut self, axis: Axis) -> Option<MotionEvent> {
        let fling = self.motion.fling_mut(axis).take()?;
        Some(MotionEvent::FlingEnded {
            axis,
            residual_velocity: fling.velocity(),
            reason: EndReason::Cancelled,
        })
    }

    fn cancel_pan(&mut self) -> Option<MotionEvent> {
        let pan = self.motion.pan.take()?;
        tracing::trace!(target = ?pan.target(), "animated pan target abandoned");
        Some(MotionEvent::PanAnimationEnded {
            reason: EndReason::Cancelled,
        })
    }

    /// Snapshot of the current state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> TransformDebugInfo {
        TransformDebugInfo {
            layout_bounds: self.layout_bounds,
            viewport: self.viewport,
            transform: self.transform(),
            min_scale_bound: self.min_scale_bound,
            max_scale_bound: self.max_scale_bound(),
            pan_bounds: self.pan_bounds,
            live_clamp: self.live_clamp,
            animating: self.is_animating(),
        }
    }

    fn max_scale_bound(&self) -> f64 {
        self.zoom_bounds.end().max(self.min_scale_bound)
    }

    fn refresh_derived(&mut self) {
        let layout = self.layout_bounds;
        let mut min_scale = *self.zoom_bounds.start();
        if layout.width() > 0.0 {
            min_scale = min_scale.max(self.viewport.width / layout.width());
        }
        if layout.height() > 0.0 {
            min_scale = min_scale.max(self.viewport.height / layout.height());
        }
        self.min_scale_bound = min_scale;

        let upper_x = -layout.x0;
        let upper_y = -layout.y0;
        self.pan_bounds = Rect::new(
            (self.viewport.width / self.scale - layout.x1).min(upper_x),
            (self.viewport.height / self.scale - layout.y1).min(upper_y),
            upper_x,
            upper_y,
        );
    }
}

/// Debug snapshot of a [`TransformState`].
#[derive(Clone, Copy, Debug)]
pub struct TransformDebugInfo {
    /// Bounds of the pannable layout.
    pub layout_bounds: Rect,
    /// Current viewport size.
    pub viewport: Size,
    /// Current transform.
    pub transform: Transform,
    /// Effective minimum scale.
    pub min_scale_bound: f64,
    /// Effective maximum scale.
    pub max_scale_bound: f64,
    /// Legal offset range.
    pub pan_bounds: Rect,
    /// Live gesture bounds policy.
    pub live_clamp: LiveClamp,
    /// Whether a fling or animated pan is running.
    pub animating: bool,
}
