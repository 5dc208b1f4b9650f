// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// How bounds are enforced while a live gesture feeds deltas into
/// [`crate::TransformState::apply_transform_delta`].
///
/// Direct operations (`pan_to`, flings, animated pans) always finish inside
/// the pan bounds regardless of this mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LiveClamp {
    /// Scale, angle and offset are left unclamped during live updates.
    ///
    /// The offset may transiently leave the pan bounds and the scale may
    /// leave the zoom bounds until the next direct operation.
    None,
    /// Clamp scale into `[min_scale_bound, max zoom]` and angle into the
    /// rotation bounds before composing, then clamp the offset into the pan
    /// bounds.
    ///
    /// The composition uses the zoom factor and rotation that were actually
    /// applied, so the content under the gesture centroid stays put even when
    /// a bound is hit.
    #[default]
    Bounds,
}

/// One of the two independently animated offset axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// Both axes, `X` first.
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    /// Returns the component of `v` along this axis.
    #[inline]
    #[must_use]
    pub fn of(self, v: kurbo::Vec2) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }

    /// Returns `v` with this axis' component replaced by `value`.
    #[inline]
    #[must_use]
    pub fn with(self, v: kurbo::Vec2, value: f64) -> kurbo::Vec2 {
        match self {
            Self::X => kurbo::Vec2::new(value, v.y),
            Self::Y => kurbo::Vec2::new(v.x, value),
        }
    }

    /// Returns the `(min, max)` edges of `rect` along this axis.
    #[inline]
    #[must_use]
    pub fn range_of(self, rect: kurbo::Rect) -> (f64, f64) {
        match self {
            Self::X => (rect.x0, rect.x1),
            Self::Y => (rect.y0, rect.y1),
        }
    }
}
