// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One module per subcommand.

pub mod chroma;
pub mod crop;
pub mod detect;
pub mod fix_dark;
pub mod fix_light;
pub mod info;
pub mod standardize;

/// Visual separator between report sections.
pub(crate) fn rule() -> String {
    "=".repeat(60)
}
