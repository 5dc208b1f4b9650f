// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests: touches in, placements out.

use core::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};
use understory_gesture::{GestureEvent, Touch};
use understory_lazy_canvas::{
    CanvasController, ContentProvider, CullMode, Culler, LayerContent, LazyCanvas, Positioned,
};
use understory_transform::{EndReason, LiveClamp, MotionEvent, TransformState};

const VIEWPORT: Size = Size::new(200.0, 200.0);

/// A 20x20 grid of 10x10 tiles spaced 50 apart.
fn tiles() -> LayerContent<usize> {
    let mut content = LayerContent::new();
    content.items_indexed(0..400_usize, |_, i| {
        let x = (i % 20) as f64 * 50.0;
        let y = (i / 20) as f64 * 50.0;
        Positioned::new(Rect::new(x, y, x + 10.0, y + 10.0), 0.0, i)
    });
    content
}

fn state() -> TransformState {
    let mut state = TransformState::builder(Rect::new(0.0, 0.0, 1000.0, 1000.0))
        .zoom_bounds(0.5..=4.0)
        .build()
        .unwrap();
    state.pass_constraints(VIEWPORT);
    state
}

fn pinch(controller: &mut CanvasController, state: &mut TransformState, spreads: &[f64]) {
    for (i, spread) in spreads.iter().enumerate() {
        let mut batch = [
            Touch::down(1, Point::new(100.0 - spread, 100.0)),
            Touch::down(2, Point::new(100.0 + spread, 100.0)),
        ];
        controller.on_batch(state, i as u64 * 16, &mut batch);
    }
}

#[test]
fn pinch_zoom_shrinks_the_visible_set() {
    let canvas = LazyCanvas::new(tiles());
    let mut state = state();
    let before = canvas.layout(&mut state, VIEWPORT).placements.len();

    let mut controller = CanvasController::default();
    pinch(&mut controller, &mut state, &[20.0, 20.0, 40.0]);
    assert_eq!(state.scale(), 2.0);
    // Zoomed about the viewport center.
    assert_eq!(state.offset(), Vec2::new(-100.0, -100.0));

    let after = canvas.layout(&mut state, VIEWPORT);
    assert!(after.placements.len() < before);
    assert!(after.placements.iter().all(|p| p.scale == 2.0));
}

#[test]
fn zoom_is_clamped_to_bounds() {
    let mut state = state();
    let mut controller = CanvasController::default();
    pinch(&mut controller, &mut state, &[10.0, 10.0, 40.0, 90.0]);
    assert_eq!(state.scale(), 4.0);
}

#[test]
fn touch_down_stops_a_fling() {
    let mut state = state();
    state.pan_to(Vec2::new(400.0, 400.0));
    state.fling(Vec2::new(-500.0, 300.0));
    state.advance(Duration::from_millis(16));

    let mut controller = CanvasController::default();
    let output = controller.on_batch(&mut state, 0, &mut [Touch::down(9, Point::new(5.0, 5.0))]);
    assert_eq!(output.gestures.as_slice(), &[GestureEvent::Started]);
    assert_eq!(output.cancelled.len(), 2);
    assert!(output.cancelled.iter().all(|event| matches!(
        event,
        MotionEvent::FlingEnded {
            reason: EndReason::Cancelled,
            ..
        }
    )));
    assert!(!state.is_animating());
}

#[test]
fn cancelled_input_still_flings() {
    let mut state = state();
    state.pan_to(Vec2::new(400.0, 400.0));
    let mut controller = CanvasController::default();
    for i in 0..6_u32 {
        let mut batch = [Touch::down(1, Point::new(100.0, 100.0 + f64::from(i) * 12.0))];
        controller.on_batch(&mut state, u64::from(i) * 10, &mut batch);
    }
    let Some(GestureEvent::Stopped(velocity)) = controller.cancel(&mut state) else {
        panic!("expected a stop event");
    };
    assert!(velocity.pan.y > 0.0);
    assert!(state.is_animating());
}

#[test]
fn exact_culling_keeps_rotated_content() {
    let content = tiles();
    let mut state = TransformState::builder(Rect::new(0.0, 0.0, 1000.0, 1000.0))
        .live_clamp(LiveClamp::None)
        .build()
        .unwrap();
    state.pass_constraints(VIEWPORT);
    // Quarter turn about the viewport's top-left corner.
    state.apply_transform_delta(1.0, 90.0, Vec2::new(200.0, 0.0), Point::ZERO);
    let transform = state.transform();

    let exact = Culler::new(CullMode::Exact, &transform, VIEWPORT, 0.0).visible_items(&content);
    let mut shown = 0;
    for (index, item) in content.iter() {
        let corner = transform.layout_to_view_point(item.origin());
        if Rect::new(1.0, 1.0, 199.0, 199.0).contains(corner) {
            shown += 1;
            assert!(exact.contains(&index), "tile {index} is on screen at {corner:?}");
        }
    }
    assert!(shown > 0);
}

#[test]
fn overscan_realizes_neighbors() {
    let content = tiles();
    let canvas = LazyCanvas::new(content.clone());
    let wide = LazyCanvas::new(content).with_overscan(50.0);
    let mut state = state();
    let tight = canvas.layout(&mut state, VIEWPORT).placements.len();
    let loose = wide.layout(&mut state, VIEWPORT).placements.len();
    assert!(loose > tight);
    assert_eq!(canvas.content().item_count(), 400);
}

#[test]
fn builder_and_provider_methods_coexist() {
    // `ContentProvider` is in scope here; the builder still resolves.
    let mut content = LayerContent::new();
    content
        .item(Rect::new(0.0, 0.0, 10.0, 10.0), 1.0, "title")
        .items(core::iter::empty())
        .item(Rect::new(20.0, 0.0, 30.0, 10.0), 0.0, "body");
    assert_eq!(content.item_count(), 2);
    assert_eq!(content.item_at(1).map(|item| item.content), Some("body"));
    assert!(content.item_at(2).is_none());
    assert_eq!(
        content.with_interval(1, |local, layer| (local, layer.start_index())),
        Some((0, 1))
    );
}
