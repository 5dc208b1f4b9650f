// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use understory_gesture::{Touch, TransformGestureRecognizer};
use understory_lazy_canvas::CanvasController;
use understory_transform::TransformState;

/// Two fingers spreading and turning over `frames` batches, then lifting.
fn pinch_rotate(frames: u32) -> Vec<Vec<Touch>> {
    let mut out: Vec<Vec<Touch>> = (0..frames)
        .map(|i| {
            let t = f64::from(i) / f64::from(frames);
            let radius = 40.0 + 80.0 * t;
            let angle = t * core::f64::consts::FRAC_PI_2;
            let (sin, cos) = angle.sin_cos();
            let center = Point::new(300.0, 300.0);
            vec![
                Touch::down(1, center - kurbo::Vec2::new(cos, sin) * radius),
                Touch::down(2, center + kurbo::Vec2::new(cos, sin) * radius),
            ]
        })
        .collect();
    out.push(vec![
        Touch::up(1, Point::new(300.0, 180.0)),
        Touch::up(2, Point::new(300.0, 420.0)),
    ]);
    out
}

fn bench_recognizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture");
    let frames = pinch_rotate(240);

    group.bench_function("recognizer/pinch_rotate(240)", |b| {
        b.iter_batched(
            || (TransformGestureRecognizer::default(), frames.clone()),
            |(mut recognizer, mut frames)| {
                for (i, batch) in frames.iter_mut().enumerate() {
                    black_box(recognizer.on_batch(i as u64 * 8, batch));
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("controller/pinch_rotate(240)", |b| {
        b.iter_batched(
            || {
                let mut state = TransformState::builder(Rect::new(0.0, 0.0, 4000.0, 4000.0))
                    .zoom_bounds(0.25..=8.0)
                    .build()
                    .expect("valid configuration");
                state.pass_constraints(Size::new(600.0, 600.0));
                (CanvasController::default(), state, frames.clone())
            },
            |(mut controller, mut state, mut frames)| {
                for (i, batch) in frames.iter_mut().enumerate() {
                    black_box(controller.on_batch(&mut state, i as u64 * 8, batch));
                }
                black_box(state.transform());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_recognizer);
criterion_main!(benches);
