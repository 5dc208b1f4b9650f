// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `round`
use kurbo::{Point, Vec2};
use understory_transform::{OffsetExt, Transform};

/// How the renderer should draw one visible item, in device pixels.
///
/// The item is drawn at `position` and then transformed about
/// `transform_origin` (its own top-left corner) by `scale` and `rotation`,
/// and finally moved by `translation`. Together these reproduce
/// [`Transform::to_affine`] applied to the item's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Flattened item index.
    pub index: usize,
    /// Rounded pixel position of the item's top-left corner before
    /// translation.
    pub position: Point,
    /// Stacking order.
    pub z_index: f64,
    /// Pivot for `scale` and `rotation`, relative to the item; always the
    /// top-left corner.
    pub transform_origin: Point,
    /// Pan offset in pixels.
    pub translation: Vec2,
    /// Uniform scale.
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl Placement {
    /// Places the item at `index` whose layout top-left corner is
    /// `top_left`, for display density `density` (pixels per layout unit).
    #[must_use]
    pub fn new(
        index: usize,
        top_left: Point,
        z_index: f64,
        transform: &Transform,
        density: f64,
    ) -> Self {
        let position = (top_left.to_vec2() * transform.scale).rotate_by(transform.angle) * density;
        Self {
            index,
            position: Point::new(position.x.round(), position.y.round()),
            z_index,
            transform_origin: Point::ZERO,
            translation: transform.offset * density,
            scale: transform.scale,
            rotation: transform.angle,
        }
    }

    /// Where the item's top-left corner ends up on screen, in pixels.
    #[must_use]
    pub fn screen_origin(&self) -> Point {
        self.position + self.translation
    }
}
