// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Boundary module — locate where a card's uniform border ends and the artwork
// begins.

pub mod detector;

pub use detector::{BoundaryPolicy, BoundsOptions, LineReduce, ScanExtent, detect_bounds};
