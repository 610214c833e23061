// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge analysis — statistics over the outer strips and corners of a card,
// used to decide which images need their borders repaired.

pub mod analysis;

pub use analysis::{Corner, CornerStats, EdgeReport, analyze_edges};
