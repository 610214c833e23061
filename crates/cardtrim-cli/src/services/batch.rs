// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sequential batch runner. One failed image never stops the batch.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::workspace::file_name;

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// "Fixed 3/4 images" style summary line.
    pub fn summary(&self, verb: &str) -> String {
        format!("{verb} {}/{} images", self.succeeded.len(), self.total())
    }

    pub fn failed_names(&self) -> Vec<String> {
        self.failed.iter().map(|(path, _)| file_name(path)).collect()
    }

    /// "Failed: a.png, b.png", or `None` when nothing failed.
    pub fn failure_line(&self) -> Option<String> {
        if self.failed.is_empty() {
            return None;
        }
        Some(format!("Failed: {}", self.failed_names().join(", ")))
    }
}

/// Apply `step` to every path in order, recording failures and carrying on.
pub fn run<F>(paths: &[PathBuf], mut step: F) -> BatchReport
where
    F: FnMut(&Path) -> anyhow::Result<()>,
{
    let mut report = BatchReport::default();
    for path in paths {
        match step(path) {
            Ok(()) => {
                info!(path = %path.display(), "Processed");
                report.succeeded.push(path.clone());
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Processing failed; continuing");
                println!("  ❌ Error processing {}: {err:#}", file_name(path));
                report.failed.push((path.clone(), err.to_string()));
            }
        }
    }
    report
}
