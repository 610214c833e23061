// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — crop, resize, letterbox, chroma key, and border clearing.

pub mod processor;

pub use processor::{CardProcessor, fit_within, is_chroma_key};
