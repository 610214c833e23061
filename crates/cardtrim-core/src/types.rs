// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for cardtrim.

use serde::{Deserialize, Serialize};

/// Content rectangle in pixel coordinates.
///
/// `right` and `bottom` are exclusive, so a full-image rectangle for a
/// `w x h` image is `(0, 0, w, h)`. Producers guarantee `left <= right` and
/// `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Bounds {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The whole image, i.e. "no crop".
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// True when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn is_full(&self, width: u32, height: u32) -> bool {
        *self == Self::full(width, height)
    }

    /// True when the rectangle lies inside a `width x height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.left <= self.right
            && self.top <= self.bottom
            && self.right <= width
            && self.bottom <= height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Pixels removed from each side when cropping a `width x height` image.
    pub fn trimmed(&self, width: u32, height: u32) -> Trim {
        Trim {
            left: self.left,
            top: self.top,
            right: width.saturating_sub(self.right),
            bottom: height.saturating_sub(self.bottom),
        }
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Per-side pixel counts removed by a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Trim {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Trim {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Standard output canvas for finished cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }
}

impl Default for TargetSize {
    /// 600x1000, the traditional 3:5 tarot proportion.
    fn default() -> Self {
        Self::new(600, 1000)
    }
}

impl std::fmt::Display for TargetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
