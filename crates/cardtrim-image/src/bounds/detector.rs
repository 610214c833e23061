// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content-boundary detection — scans inward from each edge of a pixel grid
// until a row or column stops looking like uniform border, then backs off by
// a margin so anti-aliased card edges are not clipped.

use std::iter::Rev;
use std::ops::Range;

use cardtrim_core::config::{AdaptiveSettings, DarkEdgeSettings};
use cardtrim_core::types::Bounds;
use tracing::{debug, instrument};

use crate::grid::PixelGrid;

/// How a row or column is collapsed to one brightness value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineReduce {
    /// Brightest pixel on the line. A single bright pixel counts as content.
    Max,
    /// Average brightness of the line.
    Mean,
}

/// Decides whether a scanned line belongs to the card or to its border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryPolicy {
    /// Content once the reduced brightness is strictly above `threshold`.
    /// Removes dark borders.
    Brightness { threshold: f32, reduce: LineReduce },
    /// Content once the line has real contrast (`std_dev > min_std_dev`) and
    /// its mean lies strictly inside `(dark, light)`. Removes borders that
    /// are either black or white.
    Band {
        dark: f32,
        light: f32,
        min_std_dev: f32,
    },
}

impl BoundaryPolicy {
    fn is_content(&self, line: &LineStats) -> bool {
        match *self {
            Self::Brightness { threshold, reduce } => {
                let value = match reduce {
                    LineReduce::Max => line.max,
                    LineReduce::Mean => line.mean,
                };
                value > threshold
            }
            Self::Band {
                dark,
                light,
                min_std_dev,
            } => line.std_dev > min_std_dev && dark < line.mean && line.mean < light,
        }
    }
}

/// How far each side's scan may travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanExtent {
    /// Each side may scan across the whole image.
    #[default]
    Full,
    /// Each side stops at the centre line, so one side's scan never finds
    /// content that belongs to the opposite border.
    ToCenter,
}

impl ScanExtent {
    /// Indices visited from the leading side (top/left) and from the
    /// trailing side (bottom/right) of an axis of length `len`.
    fn ranges(self, len: u32) -> (Range<u32>, Rev<Range<u32>>) {
        match self {
            Self::Full => (0..len, (0..len).rev()),
            Self::ToCenter => {
                let half = len / 2;
                (0..half, (half + 1..len).rev())
            }
        }
    }
}

/// Everything [`detect_bounds`] needs besides the pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsOptions {
    pub policy: BoundaryPolicy,
    /// Lines kept outside the first content line on each side.
    pub margin: u32,
    pub extent: ScanExtent,
}

impl BoundsOptions {
    /// Dark-border detection: a line is content once its brightest pixel
    /// exceeds `threshold`.
    pub fn dark_edges(threshold: u8, margin: u32) -> Self {
        Self {
            policy: BoundaryPolicy::Brightness {
                threshold: threshold as f32,
                reduce: LineReduce::Max,
            },
            margin,
            extent: ScanExtent::Full,
        }
    }

    /// Dark-border detection on line averages, scanning each side only up to
    /// the centre. Used when repairing borders in place.
    pub fn dark_edges_mean(threshold: u8, margin: u32) -> Self {
        Self {
            policy: BoundaryPolicy::Brightness {
                threshold: threshold as f32,
                reduce: LineReduce::Mean,
            },
            margin,
            extent: ScanExtent::ToCenter,
        }
    }

    /// Black-or-white border detection with the default contrast floor.
    pub fn adaptive(dark_threshold: u8, light_threshold: u8, margin: u32) -> Self {
        Self {
            policy: BoundaryPolicy::Band {
                dark: dark_threshold as f32,
                light: light_threshold as f32,
                min_std_dev: 10.0,
            },
            margin,
            extent: ScanExtent::Full,
        }
    }

    pub fn with_extent(mut self, extent: ScanExtent) -> Self {
        self.extent = extent;
        self
    }
}

impl From<&DarkEdgeSettings> for BoundsOptions {
    fn from(settings: &DarkEdgeSettings) -> Self {
        Self::dark_edges(settings.threshold, settings.margin)
    }
}

impl From<&AdaptiveSettings> for BoundsOptions {
    fn from(settings: &AdaptiveSettings) -> Self {
        Self {
            policy: BoundaryPolicy::Band {
                dark: settings.dark_threshold as f32,
                light: settings.light_threshold as f32,
                min_std_dev: settings.min_std_dev,
            },
            margin: settings.margin,
            extent: ScanExtent::Full,
        }
    }
}

/// Locate the content rectangle of `grid`.
///
/// Sides where no line qualifies as content stay at the image edge, so a
/// uniform image yields the full rectangle. The result always satisfies
/// `left <= right` and `top <= bottom`.
#[instrument(skip_all, fields(width = grid.width(), height = grid.height()))]
pub fn detect_bounds(grid: &PixelGrid, options: &BoundsOptions) -> Bounds {
    let (width, height) = (grid.width(), grid.height());
    if grid.is_empty() {
        return Bounds::full(width, height);
    }

    let gray = grid.to_gray();
    let policy = options.policy;
    let margin = options.margin;

    let row_is_content = |y: u32| policy.is_content(&LineStats::of(gray.row(y).iter().copied()));
    let column_is_content = |x: u32| policy.is_content(&LineStats::of(gray.column(x)));

    let (mut leading_rows, mut trailing_rows) = options.extent.ranges(height);
    let (mut leading_cols, mut trailing_cols) = options.extent.ranges(width);

    let top = leading_rows
        .find(|&y| row_is_content(y))
        .map_or(0, |y| y.saturating_sub(margin));
    let bottom = trailing_rows
        .find(|&y| row_is_content(y))
        .map_or(height, |y| y.saturating_add(margin).saturating_add(1).min(height));
    let left = leading_cols
        .find(|&x| column_is_content(x))
        .map_or(0, |x| x.saturating_sub(margin));
    let right = trailing_cols
        .find(|&x| column_is_content(x))
        .map_or(width, |x| x.saturating_add(margin).saturating_add(1).min(width));

    let bounds = Bounds::new(left, top, right, bottom);
    if left > right || top > bottom {
        debug!(%bounds, "Degenerate bounds; using full image");
        return Bounds::full(width, height);
    }

    debug!(%bounds, "Content bounds detected");
    bounds
}

/// Brightness statistics of one row or column.
#[derive(Debug, Clone, Copy)]
struct LineStats {
    max: f32,
    mean: f32,
    /// Population standard deviation.
    std_dev: f32,
}

impl LineStats {
    fn of(values: impl Iterator<Item = f32>) -> Self {
        let mut count = 0u64;
        let mut sum = 0f64;
        let mut sum_sq = 0f64;
        let mut max = f32::MIN;
        for v in values {
            count += 1;
            sum += v as f64;
            sum_sq += (v as f64) * (v as f64);
            max = max.max(v);
        }
        if count == 0 {
            return Self {
                max: 0.0,
                mean: 0.0,
                std_dev: 0.0,
            };
        }
        let mean = sum / count as f64;
        let variance = (sum_sq / count as f64 - mean * mean).max(0.0);
        Self {
            max,
            mean: mean as f32,
            std_dev: variance.sqrt() as f32,
        }
    }
}
