// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size, Vec2};
use understory_lazy_canvas::{CullMode, Culler, LayerContent, LazyCanvas, Positioned};
use understory_transform::{LiveClamp, TransformState};

const VIEWPORT: Size = Size::new(1280.0, 720.0);

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1_u64 << 53) as f64
    }
}

/// `n` items of up to 200x200 scattered over a `side` x `side` layout.
fn scattered(n: usize, side: f64, seed: u64) -> LayerContent<u32> {
    let mut rng = Lcg(seed);
    let mut content = LayerContent::new();
    content.items_indexed(0..n as u32, |_, i| {
        let x = rng.next_f64() * side;
        let y = rng.next_f64() * side;
        let w = 10.0 + rng.next_f64() * 190.0;
        let h = 10.0 + rng.next_f64() * 190.0;
        Positioned::new(Rect::new(x, y, x + w, y + h), 0.0, i)
    });
    content
}

fn rotated_state(side: f64) -> TransformState {
    let mut state = TransformState::builder(Rect::new(0.0, 0.0, side, side))
        .live_clamp(LiveClamp::None)
        .build()
        .expect("valid configuration");
    state.pass_constraints(VIEWPORT);
    state.pan_to(Vec2::new(side / 2.0, side / 2.0));
    state.apply_transform_delta(1.5, 30.0, Vec2::ZERO, Point::new(640.0, 360.0));
    state
}

fn bench_culling(c: &mut Criterion) {
    let mut group = c.benchmark_group("lazy_canvas/cull");
    group.sample_size(50);

    for &n in &[1_000_usize, 10_000, 100_000] {
        let side = 20_000.0;
        let content = scattered(n, side, 0xC0FF_EE00_0000_0001);
        let transform = rotated_state(side).transform();
        group.throughput(Throughput::Elements(n as u64));

        for (name, mode) in [
            ("approximate", CullMode::Approximate),
            ("exact", CullMode::Exact),
            ("disabled", CullMode::Disabled),
        ] {
            group.bench_with_input(BenchmarkId::new(name, n), &content, |b, content| {
                b.iter(|| {
                    let culler = Culler::new(mode, &transform, VIEWPORT, 64.0);
                    black_box(culler.visible_items(content));
                });
            });
        }
    }
    group.finish();
}

fn bench_layout_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("lazy_canvas/layout");
    group.sample_size(50);

    let side = 20_000.0;
    let canvas = LazyCanvas::new(scattered(10_000, side, 7)).with_density(2.0);
    let mut state = rotated_state(side);
    group.bench_function("layout(n=10000)", |b| {
        b.iter(|| black_box(canvas.layout(&mut state, VIEWPORT)));
    });
    group.finish();
}

criterion_group!(benches, bench_culling, bench_layout_pass);
criterion_main!(benches);
