// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Library-independent pixel storage used by border detection and edge
// analysis, so both can run on in-memory data without any codec involved.

use cardtrim_core::error::{CardtrimError, Result};

/// Row-major grid of 8-bit pixels with 1 (gray), 3 (RGB) or 4 (RGBA)
/// interleaved channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wrap raw interleaved pixel data.
    ///
    /// Fails when `channels` is not 1, 3 or 4, or when `data` does not hold
    /// exactly `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        let channels = channels as usize;
        if !matches!(channels, 1 | 3 | 4) {
            return Err(CardtrimError::InvalidGrid(format!(
                "expected 1, 3 or 4 channels, got {channels}"
            )));
        }
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(CardtrimError::InvalidGrid(format!(
                "{width}x{height}x{channels} grid needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// A grid where every pixel equals `pixel` (whose length sets the
    /// channel count).
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> Result<Self> {
        let count = width as usize * height as usize;
        let data = pixel.repeat(count);
        Self::new(width, height, pixel.len() as u8, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw channel values of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = (y as usize * self.width as usize + x as usize) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Colour of the pixel at `(x, y)`, ignoring alpha. Gray pixels repeat
    /// their single value.
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let p = self.pixel(x, y);
        if self.channels == 1 {
            [p[0], p[0], p[0]]
        } else {
            [p[0], p[1], p[2]]
        }
    }

    /// Brightness of the pixel at `(x, y)`: the mean of its colour channels.
    pub fn brightness(&self, x: u32, y: u32) -> f32 {
        let [r, g, b] = self.rgb(x, y);
        (r as f32 + g as f32 + b as f32) / 3.0
    }

    /// Overwrite every pixel in `[x0, x1) x [y0, y1)` with `pixel`.
    /// The rectangle is clipped to the grid.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, pixel: &[u8]) {
        let channels = self.channels;
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let start = (y as usize * self.width as usize + x as usize) * channels;
                for (c, value) in pixel.iter().take(channels).enumerate() {
                    self.data[start + c] = *value;
                }
            }
        }
    }

    /// Per-pixel brightness plane.
    pub fn to_gray(&self) -> GrayPlane {
        let mut values = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                values.push(self.brightness(x, y));
            }
        }
        GrayPlane {
            width: self.width,
            values,
        }
    }
}

/// Row-major brightness values derived from a [`PixelGrid`].
#[derive(Debug, Clone)]
pub struct GrayPlane {
    width: u32,
    values: Vec<f32>,
}

impl GrayPlane {
    pub fn row(&self, y: u32) -> &[f32] {
        let start = y as usize * self.width as usize;
        &self.values[start..start + self.width as usize]
    }

    pub fn column(&self, x: u32) -> impl Iterator<Item = f32> + '_ {
        self.values
            .iter()
            .skip(x as usize)
            .step_by(self.width.max(1) as usize)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = PixelGrid::new(2, 2, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(err, CardtrimError::InvalidGrid(_)));
    }

    #[test]
    fn rejects_two_channels() {
        assert!(PixelGrid::new(1, 1, 2, vec![0, 0]).is_err());
    }

    #[test]
    fn brightness_ignores_alpha() {
        let grid = PixelGrid::filled(1, 1, &[30, 60, 90, 0]).expect("grid");
        assert_eq!(grid.brightness(0, 0), 60.0);
    }

    #[test]
    fn gray_grid_repeats_value() {
        let grid = PixelGrid::filled(2, 1, &[77]).expect("grid");
        assert_eq!(grid.rgb(1, 0), [77, 77, 77]);
    }

    #[test]
    fn fill_rect_clips_to_grid() {
        let mut grid = PixelGrid::filled(4, 4, &[0, 0, 0]).expect("grid");
        grid.fill_rect(2, 2, 10, 10, &[255, 255, 255]);
        assert_eq!(grid.rgb(3, 3), [255, 255, 255]);
        assert_eq!(grid.rgb(1, 3), [0, 0, 0]);
    }

    #[test]
    fn plane_rows_and_columns() {
        let mut grid = PixelGrid::filled(3, 2, &[0]).expect("grid");
        grid.fill_rect(1, 0, 2, 2, &[9]);
        let plane = grid.to_gray();
        assert_eq!(plane.row(1), &[0.0, 9.0, 0.0]);
        assert_eq!(plane.column(1).collect::<Vec<_>>(), vec![9.0, 9.0]);
    }
}
