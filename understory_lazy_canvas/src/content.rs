// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas content: a flat index space over layers of positioned items.
//!
//! Items are added in layers. Each call to [`LayerContent::item`],
//! [`LayerContent::items`] or [`LayerContent::items_indexed`] appends one
//! layer, and every item gets a global index following all items added
//! before it. [`LayerContent::with_interval`] maps a global index back to
//! its layer and the item's index within that layer.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_lazy_canvas::{ContentProvider, LayerContent, Positioned};
//!
//! let mut content = LayerContent::new();
//! content
//!     .item(Rect::new(0.0, 0.0, 10.0, 10.0), 1.0, "title")
//!     .items_indexed(["a", "b", "c"], |i, label| {
//!         let x = 20.0 * i as f64;
//!         Positioned::new(Rect::new(x, 20.0, x + 10.0, 30.0), 0.0, label)
//!     });
//!
//! assert_eq!(content.item_count(), 4);
//! let found = content.with_interval(2, |local, layer| (local, layer.start_index()));
//! assert_eq!(found, Some((1, 1)));
//! assert_eq!(content.item_at(2).map(|item| item.content), Some("b"));
//! ```

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use kurbo::Rect;

use crate::item::Positioned;

/// Source of the items a lazy canvas may place.
///
/// Indices are dense in `0..item_count()`. Placement only needs
/// [`ContentProvider::item_at`]; culling walks [`ContentProvider::iter`].
pub trait ContentProvider {
    /// Payload type handed to the renderer.
    type Content;

    /// Number of items.
    fn item_count(&self) -> usize;

    /// Item at a flattened index, or `None` if out of range.
    fn item_at(&self, index: usize) -> Option<&Positioned<Self::Content>>;

    /// All items in index order.
    fn iter(&self) -> impl Iterator<Item = (usize, &Positioned<Self::Content>)>;
}

/// A contiguous run of items added together.
#[derive(Clone, Debug)]
pub struct Layer<T> {
    start_index: usize,
    items: Vec<Positioned<T>>,
}

impl<T> Layer<T> {
    /// Global index of this layer's first item.
    #[must_use]
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Number of items in the layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the layer has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The layer's items.
    #[must_use]
    pub fn items(&self) -> &[Positioned<T>] {
        &self.items
    }

    /// Global index range covered by this layer.
    #[must_use]
    pub fn index_range(&self) -> Range<usize> {
        self.start_index..self.start_index + self.items.len()
    }
}

/// Default [`ContentProvider`]: items grouped into layers.
#[derive(Clone, Debug)]
pub struct LayerContent<T> {
    layers: Vec<Layer<T>>,
    item_count: usize,
}

impl<T> Default for LayerContent<T> {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            item_count: 0,
        }
    }
}

impl<T> LayerContent<T> {
    /// Creates empty content.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single-item layer.
    pub fn item(&mut self, bounds: Rect, z_index: f64, content: T) -> &mut Self {
        self.push_layer(vec![Positioned::new(bounds, z_index, content)]);
        self
    }

    /// Adds one layer holding every item of `items`.
    pub fn items<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = Positioned<T>>,
    {
        self.push_layer(items.into_iter().collect());
        self
    }

    /// Adds one layer, building each item from its index within the layer
    /// and the source value.
    pub fn items_indexed<I, F>(&mut self, source: I, mut f: F) -> &mut Self
    where
        I: IntoIterator,
        F: FnMut(usize, I::Item) -> Positioned<T>,
    {
        let items = source
            .into_iter()
            .enumerate()
            .map(|(i, value)| f(i, value))
            .collect();
        self.push_layer(items);
        self
    }

    /// The layers in insertion order.
    #[must_use]
    pub fn layers(&self) -> &[Layer<T>] {
        &self.layers
    }

    /// Removes every layer.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.item_count = 0;
    }

    /// Calls `f` with the item's index inside its layer and the layer that
    /// owns global index `index`. Returns `None` if `index` is out of range.
    pub fn with_interval<R>(
        &self,
        index: usize,
        f: impl FnOnce(usize, &Layer<T>) -> R,
    ) -> Option<R> {
        let (local, layer) = self.locate(index)?;
        Some(f(local, layer))
    }

    fn locate(&self, index: usize) -> Option<(usize, &Layer<T>)> {
        if index >= self.item_count {
            return None;
        }
        // Empty layers share a start index with their successor, so take the
        // last non-empty layer starting at or before `index`.
        let at = self
            .layers
            .partition_point(|layer| layer.start_index <= index);
        let layer = self.layers[..at]
            .iter()
            .rev()
            .find(|layer| !layer.is_empty())?;
        Some((index - layer.start_index, layer))
    }

    fn push_layer(&mut self, items: Vec<Positioned<T>>) {
        let start_index = self.item_count;
        self.item_count += items.len();
        self.layers.push(Layer { start_index, items });
    }
}

impl<T> ContentProvider for LayerContent<T> {
    type Content = T;

    fn item_count(&self) -> usize {
        self.item_count
    }

    fn item_at(&self, index: usize) -> Option<&Positioned<T>> {
        let (local, layer) = self.locate(index)?;
        layer.items.get(local)
    }

    fn iter(&self) -> impl Iterator<Item = (usize, &Positioned<T>)> {
        self.layers.iter().flat_map(|layer| {
            layer
                .items
                .iter()
                .enumerate()
                .map(move |(i, item)| (layer.start_index + i, item))
        })
    }
}
