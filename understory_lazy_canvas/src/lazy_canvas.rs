// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::Size;
use understory_transform::{Transform, TransformState};

use crate::content::ContentProvider;
use crate::culling::{CullMode, Culler};
use crate::placement::Placement;

/// Result of one [`LazyCanvas::layout`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPass {
    /// The transform every placement was computed with.
    pub transform: Transform,
    /// Viewport size the pass ran with.
    pub viewport: Size,
    /// One entry per realized item, in index order.
    pub placements: Vec<Placement>,
}

impl LayoutPass {
    /// Indices of the realized items.
    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.placements.iter().map(|p| p.index)
    }
}

/// Lazily lays out a [`ContentProvider`] under a pan/zoom/rotate transform.
///
/// The canvas does not own the [`TransformState`]: gestures and animations
/// mutate it elsewhere, and each layout pass reads it once.
#[derive(Clone, Debug)]
pub struct LazyCanvas<P> {
    content: P,
    cull_mode: CullMode,
    overscan: f64,
    density: f64,
}

impl<P: ContentProvider> LazyCanvas<P> {
    /// Creates a canvas with approximate culling, no overscan and a density
    /// of 1.
    pub fn new(content: P) -> Self {
        Self {
            content,
            cull_mode: CullMode::default(),
            overscan: 0.0,
            density: 1.0,
        }
    }

    /// Sets the culling mode.
    #[must_use]
    pub fn with_cull_mode(mut self, mode: CullMode) -> Self {
        self.cull_mode = mode;
        self
    }

    /// Sets the margin, in layout units, realized beyond the viewport.
    #[must_use]
    pub fn with_overscan(mut self, overscan: f64) -> Self {
        self.overscan = overscan;
        self
    }

    /// Sets the number of device pixels per layout unit.
    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// The content.
    pub fn content(&self) -> &P {
        &self.content
    }

    /// Mutable access to the content; the next layout pass picks up changes.
    pub fn content_mut(&mut self) -> &mut P {
        &mut self.content
    }

    /// Replaces the content.
    pub fn set_content(&mut self, content: P) {
        self.content = content;
    }

    /// The culling mode.
    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    /// Sets the culling mode.
    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    /// Overscan margin in layout units.
    pub fn overscan(&self) -> f64 {
        self.overscan
    }

    /// Sets the overscan margin.
    pub fn set_overscan(&mut self, overscan: f64) {
        self.overscan = overscan;
    }

    /// Device pixels per layout unit.
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Sets the display density.
    pub fn set_density(&mut self, density: f64) {
        self.density = density;
    }

    /// Runs one layout pass for a viewport of `viewport` device-independent
    /// units.
    ///
    /// Feeds the viewport to `state` (refreshing its pan bounds), takes a
    /// single [`Transform`] snapshot and places every item that survives
    /// culling.
    pub fn layout(&self, state: &mut TransformState, viewport: Size) -> LayoutPass {
        state.pass_constraints(viewport);
        let transform = state.transform();
        let culler = Culler::new(self.cull_mode, &transform, viewport, self.overscan);

        let placements: Vec<Placement> = culler
            .visible(&self.content)
            .map(|(index, item)| {
                Placement::new(
                    index,
                    item.origin(),
                    item.z_index,
                    &transform,
                    self.density,
                )
            })
            .collect();

        tracing::trace!(
            total = self.content.item_count(),
            visible = placements.len(),
            mode = ?self.cull_mode,
            "layout pass"
        );

        LayoutPass {
            transform,
            viewport,
            placements,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::{Rect, Size, Vec2};
    use understory_transform::TransformState;

    use super::LazyCanvas;
    use crate::content::LayerContent;
    use crate::culling::CullMode;

    fn grid() -> LayerContent<(u32, u32)> {
        let mut content = LayerContent::new();
        content.items_indexed(0..100_u32, |_, i| {
            let (col, row) = (i % 10, i / 10);
            let x = f64::from(col) * 100.0;
            let y = f64::from(row) * 100.0;
            crate::Positioned::new(Rect::new(x, y, x + 50.0, y + 50.0), 0.0, (col, row))
        });
        content
    }

    fn state() -> TransformState {
        TransformState::builder(Rect::new(0.0, 0.0, 1000.0, 1000.0))
            .build()
            .unwrap()
    }

    #[test]
    fn only_visible_items_are_placed() {
        let canvas = LazyCanvas::new(grid());
        let mut state = state();
        let pass = canvas.layout(&mut state, Size::new(150.0, 150.0));
        let visible: Vec<usize> = pass.visible_indices().collect();
        assert_eq!(visible, vec![0, 1, 10, 11]);
        assert_eq!(state.viewport_size(), Size::new(150.0, 150.0));
    }

    #[test]
    fn panning_changes_the_visible_set() {
        let canvas = LazyCanvas::new(grid());
        let mut state = state();
        state.pass_constraints(Size::new(150.0, 150.0));
        state.pan_to(Vec2::new(420.0, 0.0));
        let pass = canvas.layout(&mut state, Size::new(150.0, 150.0));
        let visible: Vec<usize> = pass.visible_indices().collect();
        // Columns 4 (right edge 450) and 5 (left edge 500 < 570).
        assert_eq!(visible, vec![4, 5, 14, 15]);
        assert_eq!(pass.placements[0].translation, Vec2::new(-420.0, 0.0));
    }

    #[test]
    fn disabled_culling_places_everything() {
        let canvas = LazyCanvas::new(grid()).with_cull_mode(CullMode::Disabled);
        let pass = canvas.layout(&mut state(), Size::new(10.0, 10.0));
        assert_eq!(pass.placements.len(), 100);
    }
}
