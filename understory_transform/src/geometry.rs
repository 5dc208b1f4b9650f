// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset helpers on top of [`kurbo::Vec2`].
//!
//! Negation and scalar multiplication/division come straight from Kurbo's
//! operator impls. This module adds the two operations the transform math
//! needs on top of that: rotating an offset by an angle in degrees and
//! clamping an offset into a rectangle.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `sin_cos`
use kurbo::{Rect, Vec2};

/// Converts an angle in degrees into radians.
#[inline]
#[must_use]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Converts an angle in radians into degrees.
#[inline]
#[must_use]
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Extension methods for offsets expressed as [`Vec2`].
pub trait OffsetExt: Sized {
    /// Rotates the offset about the origin by `degrees`.
    ///
    /// Positive angles rotate clockwise in a y-down coordinate system. The
    /// angle is not wrapped; `360.0` and `0.0` produce the same result up to
    /// floating point error.
    #[must_use]
    fn rotate_by(self, degrees: f64) -> Self;

    /// Clamps each component independently into `bounds`.
    ///
    /// The bounds are sorted per axis first, so an inverted rectangle
    /// (`x1 < x0` or `y1 < y0`) is treated as the range between its edges
    /// rather than panicking.
    #[must_use]
    fn coerce_in_bounds(self, bounds: Rect) -> Self;
}

impl OffsetExt for Vec2 {
    fn rotate_by(self, degrees: f64) -> Self {
        let (sin, cos) = degrees_to_radians(degrees).sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    fn coerce_in_bounds(self, bounds: Rect) -> Self {
        Self::new(
            coerce_in(self.x, bounds.x0, bounds.x1),
            coerce_in(self.y, bounds.y0, bounds.y1),
        )
    }
}

/// Clamps `value` between `a` and `b` in whichever order they come.
#[inline]
pub(crate) fn coerce_in(value: f64, a: f64, b: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    value.max(lo).min(hi)
}
