// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Services shared by the subcommands: filesystem layout and batch running.

pub mod batch;
pub mod workspace;
