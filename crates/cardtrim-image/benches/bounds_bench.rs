// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for border detection in the cardtrim-image crate, run
// on a card-sized synthetic grid.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use cardtrim_image::{BoundsOptions, PixelGrid, detect_bounds};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 1024x1536 (the generator's output size) black grid with a textured card
/// inset by 24 pixels on every side.
fn framed_card() -> PixelGrid {
    let (width, height) = (1024u32, 1536u32);
    let mut grid = PixelGrid::filled(width, height, &[0, 0, 0, 255]).expect("grid");
    for y in 24..height - 24 {
        for x in 24..width - 24 {
            let v = if (x / 4 + y / 4) % 2 == 0 { 60 } else { 170 };
            grid.fill_rect(x, y, x + 1, y + 1, &[v, v, v, 255]);
        }
    }
    grid
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_dark_edges(c: &mut Criterion) {
    let grid = framed_card();
    let options = BoundsOptions::dark_edges(30, 5);
    c.bench_function("detect_bounds dark_edges (1024x1536)", |b| {
        b.iter(|| black_box(detect_bounds(black_box(&grid), &options)));
    });
}

fn bench_adaptive(c: &mut Criterion) {
    let grid = framed_card();
    let options = BoundsOptions::adaptive(30, 200, 5);
    c.bench_function("detect_bounds adaptive (1024x1536)", |b| {
        b.iter(|| black_box(detect_bounds(black_box(&grid), &options)));
    });
}

criterion_group!(benches, bench_dark_edges, bench_adaptive);
criterion_main!(benches);
