// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Rect, Vec2};

/// A [`crate::TransformStateBuilder`] was given parameters that violate a
/// precondition.
///
/// Every variant names the offending parameter and the bound it violated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InvalidConfiguration {
    /// The initial viewport offset is not inside the layout bounds.
    ViewportOffsetOutsideLayout {
        /// Requested top-left corner of the viewport in layout space.
        offset: Vec2,
        /// The layout bounds.
        layout_bounds: Rect,
    },
    /// The layout bounds have a negative width or height.
    InvertedLayoutBounds {
        /// The layout bounds.
        layout_bounds: Rect,
    },
    /// The minimum zoom bound is not strictly positive.
    NonPositiveZoomBound {
        /// The minimum zoom bound.
        min: f64,
    },
    /// The maximum zoom bound is below the minimum.
    InvertedZoomBounds {
        /// The minimum zoom bound.
        min: f64,
        /// The maximum zoom bound.
        max: f64,
    },
    /// The initial scale lies outside the zoom bounds.
    ScaleOutsideZoomBounds {
        /// The initial scale.
        scale: f64,
        /// The minimum zoom bound.
        min: f64,
        /// The maximum zoom bound.
        max: f64,
    },
    /// The maximum rotation bound is below the minimum.
    InvertedRotationBounds {
        /// The minimum rotation bound, in degrees.
        min: f64,
        /// The maximum rotation bound, in degrees.
        max: f64,
    },
    /// The initial angle lies outside the rotation bounds.
    AngleOutsideRotationBounds {
        /// The initial angle, in degrees.
        angle: f64,
        /// The minimum rotation bound, in degrees.
        min: f64,
        /// The maximum rotation bound, in degrees.
        max: f64,
    },
}

impl fmt::Display for InvalidConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ViewportOffsetOutsideLayout {
                offset,
                layout_bounds,
            } => write!(
                f,
                "initial viewport offset ({}, {}) must be within layout bounds {layout_bounds:?}",
                offset.x, offset.y
            ),
            Self::InvertedLayoutBounds { layout_bounds } => write!(
                f,
                "layout bounds {layout_bounds:?} must have non-negative width and height"
            ),
            Self::NonPositiveZoomBound { min } => {
                write!(f, "zoom bounds must be positive, got min zoom {min}")
            }
            Self::InvertedZoomBounds { min, max } => write!(
                f,
                "max zoom bound ({max}) must be greater than or equal to min zoom bound ({min})"
            ),
            Self::ScaleOutsideZoomBounds { scale, min, max } => write!(
                f,
                "initial scale ({scale}) must be within zoom bounds ({min}..={max})"
            ),
            Self::InvertedRotationBounds { min, max } => write!(
                f,
                "max rotation bound ({max}) must be greater than or equal to min rotation bound ({min})"
            ),
            Self::AngleOutsideRotationBounds { angle, min, max } => write!(
                f,
                "initial angle ({angle}) must be within rotation bounds ({min}..={max})"
            ),
        }
    }
}

impl core::error::Error for InvalidConfiguration {}
