// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge-strip and corner statistics for spotting black or white border
// artifacts on generated cards.

use cardtrim_core::config::AnalysisSettings;
use tracing::{debug, instrument};

use crate::grid::PixelGrid;

/// One of the four image corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::TopLeft => "top_left",
            Self::TopRight => "top_right",
            Self::BottomLeft => "bottom_left",
            Self::BottomRight => "bottom_right",
        }
    }
}

impl std::fmt::Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Darkness and brightness of one corner square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerStats {
    pub corner: Corner,
    /// Share (0-1) of dark pixels in the square.
    pub dark_ratio: f64,
    pub avg_brightness: f64,
}

/// Result of [`analyze_edges`].
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeReport {
    /// Pixels sampled across the four strips. Corner pixels are counted once
    /// per strip that contains them.
    pub total_pixels: u64,
    pub dark_pixels: u64,
    pub light_pixels: u64,
    /// Dark share of the sampled pixels, in percent.
    pub dark_percentage: f64,
    /// Light share of the sampled pixels, in percent.
    pub light_percentage: f64,
    pub avg_rgb: [f64; 3],
    pub avg_brightness: f64,
    pub corners: [CornerStats; 4],
    pub has_dark_edges: bool,
    /// Not flagged, but dark enough to deserve a look.
    pub is_borderline: bool,
    pub has_light_edges: bool,
}

impl EdgeReport {
    /// Corners that are mostly dark.
    pub fn worst_corners(&self) -> Vec<Corner> {
        self.corners
            .iter()
            .filter(|stats| stats.dark_ratio > 0.5)
            .map(|stats| stats.corner)
            .collect()
    }

    /// True when the image needs no border work at all.
    pub fn is_clean(&self) -> bool {
        !self.has_dark_edges && !self.is_borderline && !self.has_light_edges
    }
}

/// Sample the outer strips and corners of `grid` and classify its borders.
#[instrument(skip_all, fields(width = grid.width(), height = grid.height()))]
pub fn analyze_edges(grid: &PixelGrid, settings: &AnalysisSettings) -> EdgeReport {
    let (w, h) = (grid.width(), grid.height());
    let dark = settings.dark_threshold;
    let light = settings.light_threshold as f64;

    let strip_rows = settings.edge_width.min(h);
    let strip_cols = settings.edge_width.min(w);

    let mut edges = Tally::default();
    edges.add_region(grid, 0, 0, w, strip_rows, dark, light);
    edges.add_region(grid, 0, h - strip_rows, w, h, dark, light);
    edges.add_region(grid, 0, 0, strip_cols, h, dark, light);
    edges.add_region(grid, w - strip_cols, 0, w, h, dark, light);

    let corner_w = settings.corner_size.min(w);
    let corner_h = settings.corner_size.min(h);
    let corners = Corner::ALL.map(|corner| {
        let (x0, y0) = match corner {
            Corner::TopLeft => (0, 0),
            Corner::TopRight => (w - corner_w, 0),
            Corner::BottomLeft => (0, h - corner_h),
            Corner::BottomRight => (w - corner_w, h - corner_h),
        };
        let mut tally = Tally::default();
        tally.add_region(grid, x0, y0, x0 + corner_w, y0 + corner_h, dark, light);
        CornerStats {
            corner,
            dark_ratio: tally.ratio(tally.dark),
            avg_brightness: tally.avg_brightness(),
        }
    });

    let dark_percentage = edges.ratio(edges.dark) * 100.0;
    let light_percentage = edges.ratio(edges.light) * 100.0;
    let has_dark_edges = dark_percentage > settings.dark_ratio * 100.0;
    let report = EdgeReport {
        total_pixels: edges.count,
        dark_pixels: edges.dark,
        light_pixels: edges.light,
        dark_percentage,
        light_percentage,
        avg_rgb: edges.avg_rgb(),
        avg_brightness: edges.avg_brightness(),
        corners,
        has_dark_edges,
        is_borderline: !has_dark_edges && dark_percentage > settings.borderline_ratio * 100.0,
        has_light_edges: light_percentage > settings.light_ratio * 100.0,
    };

    debug!(
        dark_percentage = report.dark_percentage,
        light_percentage = report.light_percentage,
        avg_brightness = report.avg_brightness,
        "Edge analysis complete"
    );
    report
}

/// Running pixel counts over one or more rectangular regions.
#[derive(Debug, Default)]
struct Tally {
    count: u64,
    dark: u64,
    light: u64,
    sum: [u64; 3],
}

impl Tally {
    #[allow(clippy::too_many_arguments)]
    fn add_region(
        &mut self,
        grid: &PixelGrid,
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
        dark_threshold: u8,
        light_threshold: f64,
    ) {
        for y in y0..y1 {
            for x in x0..x1 {
                let rgb = grid.rgb(x, y);
                self.count += 1;
                if rgb.iter().all(|&c| c <= dark_threshold) {
                    self.dark += 1;
                }
                let mean = rgb.iter().map(|&c| c as f64).sum::<f64>() / 3.0;
                if mean > light_threshold {
                    self.light += 1;
                }
                for (acc, c) in self.sum.iter_mut().zip(rgb) {
                    *acc += c as u64;
                }
            }
        }
    }

    fn ratio(&self, part: u64) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        part as f64 / self.count as f64
    }

    fn avg_rgb(&self) -> [f64; 3] {
        if self.count == 0 {
            return [0.0; 3];
        }
        self.sum.map(|s| s as f64 / self.count as f64)
    }

    fn avg_brightness(&self) -> f64 {
        self.avg_rgb().iter().sum::<f64>() / 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AnalysisSettings {
        AnalysisSettings::default()
    }

    #[test]
    fn black_frame_is_flagged() {
        let mut grid = PixelGrid::filled(100, 100, &[0, 0, 0]).expect("grid");
        grid.fill_rect(10, 10, 90, 90, &[180, 120, 90]);

        let report = analyze_edges(&grid, &settings());
        assert!(report.has_dark_edges);
        assert!(!report.is_borderline);
        assert!(!report.has_light_edges);
        assert_eq!(report.dark_percentage, 100.0);
        assert_eq!(report.total_pixels, 4 * 100 * 10);
    }

    #[test]
    fn clean_card_is_not_flagged() {
        let grid = PixelGrid::filled(64, 96, &[140, 90, 60]).expect("grid");
        let report = analyze_edges(&grid, &settings());
        assert!(report.is_clean());
        assert!(report.worst_corners().is_empty());
        assert!((report.avg_brightness - 96.666).abs() < 0.01);
        assert_eq!(report.avg_rgb, [140.0, 90.0, 60.0]);
    }

    #[test]
    fn white_frame_is_light() {
        let mut grid = PixelGrid::filled(100, 100, &[250, 250, 250]).expect("grid");
        grid.fill_rect(10, 10, 90, 90, &[100, 100, 100]);

        let report = analyze_edges(&grid, &settings());
        assert!(report.has_light_edges);
        assert!(!report.has_dark_edges);
        assert_eq!(report.light_percentage, 100.0);
    }

    #[test]
    fn single_dark_strip_is_borderline() {
        // Only the top strip is black: 1000 of 4000 sampled pixels, plus the
        // top rows of the side strips (2 * 10 * 10) = 1200 / 4000 = 30%.
        // That sits exactly on the flag limit, so it is borderline.
        let mut grid = PixelGrid::filled(100, 100, &[120, 120, 120]).expect("grid");
        grid.fill_rect(0, 0, 100, 10, &[0, 0, 0]);

        let report = analyze_edges(&grid, &settings());
        assert_eq!(report.dark_pixels, 1200);
        assert!(!report.has_dark_edges);
        assert!(report.is_borderline);
        // Half of each top corner square is dark, which is not "mostly".
        assert_eq!(report.corners[0].dark_ratio, 0.5);
        assert!(report.worst_corners().is_empty());
    }

    #[test]
    fn corners_reported_in_order() {
        let mut grid = PixelGrid::filled(50, 50, &[200, 200, 200]).expect("grid");
        grid.fill_rect(30, 30, 50, 50, &[0, 0, 0]);

        let report = analyze_edges(&grid, &settings());
        let names: Vec<_> = report.corners.iter().map(|c| c.corner.name()).collect();
        assert_eq!(names, ["top_left", "top_right", "bottom_left", "bottom_right"]);
        assert_eq!(report.corners[3].dark_ratio, 1.0);
        assert_eq!(report.corners[3].avg_brightness, 0.0);
        assert_eq!(report.worst_corners(), vec![Corner::BottomRight]);
    }

    #[test]
    fn tiny_image_clamps_strips() {
        let grid = PixelGrid::filled(4, 3, &[0]).expect("grid");
        let report = analyze_edges(&grid, &settings());
        // Each strip covers the whole image.
        assert_eq!(report.total_pixels, 4 * 12);
        assert!(report.has_dark_edges);
    }

    #[test]
    fn empty_image_reports_nothing() {
        let grid = PixelGrid::new(0, 0, 3, Vec::new()).expect("grid");
        let report = analyze_edges(&grid, &settings());
        assert_eq!(report.total_pixels, 0);
        assert!(report.is_clean());
    }
}
