// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

/// Anything with a fixed place on the canvas.
///
/// `bounds` is in layout coordinates. Its top-left corner is where the item
/// is placed; the right and bottom edges are the largest extent the item
/// can draw into and are what culling tests against, so tight bounds mean
/// fewer items realized.
pub trait Positionable {
    /// Layout-space bounds.
    fn bounds(&self) -> Rect;

    /// Stacking order; higher draws on top.
    fn z_index(&self) -> f64 {
        0.0
    }
}

/// An item's layout bounds and stacking order paired with its payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Positioned<T> {
    /// Layout-space bounds.
    pub bounds: Rect,
    /// Stacking order.
    pub z_index: f64,
    /// What to render.
    pub content: T,
}

impl<T> Positioned<T> {
    /// Creates an item.
    pub fn new(bounds: Rect, z_index: f64, content: T) -> Self {
        Self {
            bounds,
            z_index,
            content,
        }
    }

    /// Creates an item with the payload taken from a [`Positionable`].
    pub fn from_positionable<P: Positionable>(item: &P, content: T) -> Self {
        Self::new(item.bounds(), item.z_index(), content)
    }

    /// The corner the item is placed at.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.bounds.origin()
    }

    /// Replaces the payload, keeping position and stacking order.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Positioned<U> {
        Positioned {
            bounds: self.bounds,
            z_index: self.z_index,
            content: f(self.content),
        }
    }
}

impl<T> Positionable for Positioned<T> {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn z_index(&self) -> f64 {
        self.z_index
    }
}
