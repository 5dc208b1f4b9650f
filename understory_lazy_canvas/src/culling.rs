// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility culling in layout space.
//!
//! A [`Culler`] turns the current [`Transform`] and viewport size into a
//! layout-space region, then keeps the items whose bounds touch it. Edges
//! that merely touch count as visible.

use alloc::vec::Vec;

use kurbo::{Rect, Size};
use understory_transform::Transform;

use crate::content::ContentProvider;
use crate::item::Positioned;

/// How precisely culling follows the transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CullMode {
    /// Treat the offset as a layout-space translation and the scale as a
    /// uniform shrink of the viewport; ignores rotation. Cheap, and exact
    /// whenever scale is 1 and angle is 0.
    #[default]
    Approximate,
    /// Map the viewport through the full inverse transform and test against
    /// its layout-space bounding box. Never drops a visible item, rotated or
    /// not.
    Exact,
    /// Every item is visible.
    Disabled,
}

/// Layout-space visibility test for one transform and viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Culler {
    region: Option<Rect>,
}

impl Culler {
    /// Builds the test for `mode`, widening the region by `overscan` layout
    /// units on every side.
    #[must_use]
    pub fn new(mode: CullMode, transform: &Transform, viewport: Size, overscan: f64) -> Self {
        let overscan = if overscan.is_finite() {
            overscan.max(0.0)
        } else {
            0.0
        };
        let region = match mode {
            CullMode::Disabled => None,
            CullMode::Approximate => {
                let origin = (-transform.offset).to_point();
                Some(Rect::from_origin_size(
                    origin,
                    Size::new(
                        viewport.width / transform.scale,
                        viewport.height / transform.scale,
                    ),
                ))
            }
            CullMode::Exact => Some(transform.view_to_layout_rect(viewport.to_rect())),
        };
        Self {
            region: region.map(|r| r.inflate(overscan, overscan)),
        }
    }

    /// The layout-space region items must touch, or `None` when culling is
    /// disabled.
    #[must_use]
    pub fn region(&self) -> Option<Rect> {
        self.region
    }

    /// Returns `true` if an item with `bounds` should be realized.
    #[must_use]
    pub fn is_visible(&self, bounds: Rect) -> bool {
        let Some(region) = self.region else {
            return true;
        };
        bounds.x1 >= region.x0
            && bounds.y1 >= region.y0
            && bounds.x0 <= region.x1
            && bounds.y0 <= region.y1
    }

    /// The visible items of `content` with their indices, in index order.
    pub fn visible<'a, P: ContentProvider>(
        &'a self,
        content: &'a P,
    ) -> impl Iterator<Item = (usize, &'a Positioned<P::Content>)> {
        content
            .iter()
            .filter(move |(_, item)| self.is_visible(item.bounds))
    }

    /// Indices of the visible items of `content`, in index order.
    pub fn visible_items<P: ContentProvider>(&self, content: &P) -> Vec<usize> {
        self.visible(content).map(|(index, _)| index).collect()
    }
}
