// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cardtrim-image — Image processing for generated tarot cards.
//
// Provides content-boundary detection over a plain pixel grid, edge-strip
// analysis for spotting border artifacts, and a card processor (crop, resize,
// letterbox, chroma key, border clearing).

pub mod bounds;
pub mod edges;
pub mod grid;
pub mod image;

// Re-export the primary items so callers can use `cardtrim_image::CardProcessor` etc.
pub use crate::bounds::{BoundaryPolicy, BoundsOptions, LineReduce, ScanExtent, detect_bounds};
pub use crate::edges::{Corner, CornerStats, EdgeReport, analyze_edges};
pub use crate::grid::{GrayPlane, PixelGrid};
pub use crate::image::processor::CardProcessor;
