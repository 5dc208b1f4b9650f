// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_lazy_canvas --heading-base-level=0

//! Understory Lazy Canvas: lazy layout for large, sparse 2D canvases.
//!
//! This crate places only the items of a big canvas that can currently be
//! seen through a pan/zoom/rotate viewport. It sits between
//! `understory_transform` (which owns the transform) and a renderer (which
//! draws whatever it is told to place).
//!
//! The core concepts are:
//!
//! - [`Positioned`] / [`Positionable`]: an item's layout bounds and stacking
//!   order.
//! - [`ContentProvider`]: a dense index space of items. [`LayerContent`] is
//!   the default implementation, built up layer by layer.
//! - [`Culler`] and [`CullMode`]: which items touch the visible region.
//! - [`Placement`]: where and how the renderer draws one item, in pixels.
//! - [`LazyCanvas`]: runs a layout pass and returns a [`LayoutPass`].
//! - [`CanvasController`]: feeds touch batches through
//!   `understory_gesture` into the transform state.
//!
//! This crate deliberately does **not** render, own widgets, or read platform
//! input. Hosts are responsible for:
//!
//! - Converting pointer events into `understory_gesture::Touch` batches.
//! - Calling `TransformState::advance` once per frame while it animates.
//! - Calling [`LazyCanvas::layout`] on every frame or viewport change, and
//!   creating/destroying item views to match the returned placements.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size, Vec2};
//! use understory_lazy_canvas::{LayerContent, LazyCanvas};
//! use understory_transform::TransformState;
//!
//! let mut content = LayerContent::new();
//! content.item(Rect::new(0.0, 0.0, 40.0, 40.0), 0.0, "near");
//! content.item(Rect::new(800.0, 800.0, 840.0, 840.0), 0.0, "far");
//! let canvas = LazyCanvas::new(content).with_density(2.0);
//!
//! let mut state = TransformState::builder(Rect::new(0.0, 0.0, 1000.0, 1000.0))
//!     .build()
//!     .unwrap();
//! let pass = canvas.layout(&mut state, Size::new(200.0, 200.0));
//! assert_eq!(pass.visible_indices().collect::<Vec<_>>(), vec![0]);
//!
//! state.pan_to(Vec2::new(700.0, 700.0));
//! let pass = canvas.layout(&mut state, Size::new(200.0, 200.0));
//! assert_eq!(pass.visible_indices().collect::<Vec<_>>(), vec![1]);
//! // Pixel translation includes the density.
//! assert_eq!(pass.placements[0].translation, Vec2::new(-1400.0, -1400.0));
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod content;
mod controller;
mod culling;
mod item;
mod lazy_canvas;
mod placement;

pub use content::{ContentProvider, Layer, LayerContent};
pub use controller::{CanvasController, ControllerOutput};
pub use culling::{CullMode, Culler};
pub use item::{Positionable, Positioned};
pub use lazy_canvas::{LayoutPass, LazyCanvas};
pub use placement::Placement;
