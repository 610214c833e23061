// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card image processor — crop to detected bounds, exact and letterboxed
// resizing, chroma keying, and dark-border clearing. Operates on in-memory
// images using the `image` and `imageproc` crates.

use std::path::Path;

use cardtrim_core::config::{AnalysisSettings, ChromaSettings};
use cardtrim_core::error::{CardtrimError, Result};
use cardtrim_core::types::{Bounds, TargetSize};
use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, ImageError, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::map::map_colors;
use imageproc::rect::Rect;
use tracing::{debug, info, instrument, warn};

use crate::bounds::{BoundsOptions, detect_bounds};
use crate::edges::{EdgeReport, analyze_edges};
use crate::grid::PixelGrid;

/// Aspect-ratio difference above which [`CardProcessor::fit_to`] letterboxes
/// instead of stretching.
const ASPECT_TOLERANCE: f64 = 0.1;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const OVERLAY_RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Processing pipeline for a single card image.
///
/// Transformations consume `self` and return a new `CardProcessor`, enabling
/// method chaining.
///
/// ```ignore
/// let card = CardProcessor::open("images/cups_05.png")?;
/// let bounds = card.detect_bounds(&BoundsOptions::dark_edges(30, 5))?;
/// card.crop_to(bounds)?
///     .fit_to(TargetSize::default())
///     .save("images/cropped_resized/cups_05.png")?;
/// ```
pub struct CardProcessor {
    image: DynamicImage,
}

impl CardProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CardtrimError::NotFound(path.to_path_buf()));
        }
        let img = image::open(path).map_err(|err| decode_error(path, err))?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (PNG, JPEG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| CardtrimError::Decode(format!("failed to decode image: {err}")))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Width / height of the current image.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height() == 0 {
            return 1.0;
        }
        self.width() as f64 / self.height() as f64
    }

    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    /// Short colour-mode name ("L", "LA", "RGB", "RGBA", ...).
    pub fn mode(&self) -> &'static str {
        match self.image.color() {
            ColorType::L8 => "L",
            ColorType::La8 => "LA",
            ColorType::Rgb8 => "RGB",
            ColorType::Rgba8 => "RGBA",
            ColorType::L16 => "L16",
            ColorType::La16 => "LA16",
            ColorType::Rgb16 => "RGB16",
            ColorType::Rgba16 => "RGBA16",
            ColorType::Rgb32F => "RGB32F",
            ColorType::Rgba32F => "RGBA32F",
            _ => "unknown",
        }
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// RGBA snapshot of the image for the pure detection routines.
    pub fn pixel_grid(&self) -> Result<PixelGrid> {
        let rgba = self.image.to_rgba8();
        let (width, height) = rgba.dimensions();
        PixelGrid::new(width, height, 4, rgba.into_raw())
    }

    // -- Analysis -------------------------------------------------------------

    /// Locate the card content inside its border.
    pub fn detect_bounds(&self, options: &BoundsOptions) -> Result<Bounds> {
        Ok(detect_bounds(&self.pixel_grid()?, options))
    }

    /// Edge-strip statistics used to flag border artifacts.
    pub fn analyze_edges(&self, settings: &AnalysisSettings) -> Result<EdgeReport> {
        Ok(analyze_edges(&self.pixel_grid()?, settings))
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Crop to `bounds`. Fails when the rectangle is empty or reaches outside
    /// the image.
    #[instrument(skip_all, fields(%bounds))]
    pub fn crop_to(self, bounds: Bounds) -> Result<Self> {
        let (img_w, img_h) = (self.width(), self.height());
        if !bounds.fits_within(img_w, img_h) {
            return Err(CardtrimError::InvalidBounds(format!(
                "{bounds} exceeds {img_w}x{img_h} image"
            )));
        }
        if bounds.is_empty() {
            return Err(CardtrimError::InvalidBounds(format!(
                "{bounds} covers no pixels"
            )));
        }
        if bounds.is_full(img_w, img_h) {
            debug!("Bounds cover the whole image; nothing to crop");
            return Ok(self);
        }

        info!(
            left = bounds.left,
            top = bounds.top,
            width = bounds.width(),
            height = bounds.height(),
            "Cropping image"
        );
        let cropped = self
            .image
            .crop_imm(bounds.left, bounds.top, bounds.width(), bounds.height());
        Ok(Self { image: cropped })
    }

    /// Resize to exactly `width` x `height`, ignoring aspect ratio. Uses
    /// Lanczos3 filtering.
    #[instrument(skip(self))]
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        if (self.width(), self.height()) == (width, height) {
            return self;
        }
        info!(
            from_w = self.width(),
            from_h = self.height(),
            width,
            height,
            "Resizing image"
        );
        let resized = self.image.resize_exact(width, height, FilterType::Lanczos3);
        Self { image: resized }
    }

    /// Shrink to fit inside `target` preserving aspect ratio (never
    /// enlarging), then centre on a transparent canvas of exactly the target
    /// size.
    #[instrument(skip_all, fields(%target))]
    pub fn letterbox(self, target: TargetSize) -> Self {
        let (fit_w, fit_h) = fit_within(self.width(), self.height(), target);
        let rgba = self.image.to_rgba8();
        let fitted = if (fit_w, fit_h) == rgba.dimensions() {
            rgba
        } else {
            imageops::resize(&rgba, fit_w, fit_h, FilterType::Lanczos3)
        };

        let x = (target.width - fit_w) / 2;
        let y = (target.height - fit_h) / 2;
        let mut canvas = RgbaImage::from_pixel(target.width, target.height, TRANSPARENT);
        imageops::replace(&mut canvas, &fitted, x as i64, y as i64);

        info!(fit_w, fit_h, x, y, "Letterboxed onto target canvas");
        Self {
            image: DynamicImage::ImageRgba8(canvas),
        }
    }

    /// Bring the image to exactly `target`: stretch when the aspect ratios
    /// are close, letterbox otherwise.
    pub fn fit_to(self, target: TargetSize) -> Self {
        let difference = (self.aspect_ratio() - target.aspect_ratio()).abs();
        if difference > ASPECT_TOLERANCE {
            debug!(difference, "Aspect ratios differ; letterboxing");
            self.letterbox(target)
        } else {
            self.resize_exact(target.width, target.height)
        }
    }

    /// Replace green-screen pixels with fully transparent black. Every other
    /// pixel keeps its colour.
    #[instrument(skip(self))]
    pub fn chroma_key(self, settings: &ChromaSettings) -> Self {
        let rgba = self.image.to_rgba8();
        let keyed = rgba
            .pixels()
            .filter(|p| is_chroma_key(**p, settings))
            .count();
        let output = map_colors(&rgba, |p| {
            if is_chroma_key(p, settings) {
                TRANSPARENT
            } else {
                p
            }
        });
        info!(keyed, "Chroma key applied");
        Self {
            image: DynamicImage::ImageRgba8(output),
        }
    }

    /// Make dark pixels outside `bounds` transparent. A pixel is dark when
    /// R, G and B are all at or below `threshold`. Pixels inside the bounds
    /// are never touched.
    #[instrument(skip_all, fields(%bounds, threshold))]
    pub fn clear_dark_border(self, bounds: Bounds, threshold: u8) -> Self {
        let mut rgba = self.image.to_rgba8();
        let mut cleared = 0u64;
        for (x, y, pixel) in rgba.enumerate_pixels_mut() {
            if bounds.contains(x, y) {
                continue;
            }
            let Rgba([r, g, b, _]) = *pixel;
            if r <= threshold && g <= threshold && b <= threshold {
                pixel.0[3] = 0;
                cleared += 1;
            }
        }
        info!(cleared, "Dark border cleared");
        Self {
            image: DynamicImage::ImageRgba8(rgba),
        }
    }

    /// Outline `bounds` in red for visual inspection.
    pub fn draw_bounds(self, bounds: Bounds) -> Self {
        let mut rgba = self.image.to_rgba8();
        if bounds.is_empty() {
            warn!(%bounds, "Empty bounds; nothing to draw");
            return Self {
                image: DynamicImage::ImageRgba8(rgba),
            };
        }
        let rect = Rect::at(bounds.left as i32, bounds.top as i32)
            .of_size(bounds.width(), bounds.height());
        draw_hollow_rect_mut(&mut rgba, rect, OVERLAY_RED);
        Self {
            image: DynamicImage::ImageRgba8(rgba),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| CardtrimError::Encode(format!("PNG encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the file
    /// extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image.save(path).map_err(|err| {
            CardtrimError::Encode(format!(
                "failed to save image to {}: {}",
                path.display(),
                err
            ))
        })?;
        debug!(path = %path.display(), "Image saved");
        Ok(())
    }
}

/// True for pixels matching the green-screen key.
pub fn is_chroma_key(pixel: Rgba<u8>, settings: &ChromaSettings) -> bool {
    let Rgba([r, g, b, _]) = pixel;
    g > settings.green_min && r < settings.red_max && b < settings.blue_max
}

/// Largest size with the same aspect ratio as `width x height` that fits in
/// `target`. Images already inside the target keep their size.
pub fn fit_within(width: u32, height: u32, target: TargetSize) -> (u32, u32) {
    if width <= target.width && height <= target.height {
        return (width, height);
    }
    let scale = (target.width as f64 / width as f64).min(target.height as f64 / height as f64);
    let fit_w = ((width as f64 * scale).round() as u32).clamp(1, target.width);
    let fit_h = ((height as f64 * scale).round() as u32).clamp(1, target.height);
    (fit_w, fit_h)
}

fn decode_error(path: &Path, err: ImageError) -> CardtrimError {
    match err {
        ImageError::IoError(io) => CardtrimError::Io(io),
        ImageError::Unsupported(unsupported) => CardtrimError::UnsupportedMode(format!(
            "{}: {}",
            path.display(),
            unsupported
        )),
        other => CardtrimError::Decode(format!("failed to open {}: {}", path.display(), other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use image::RgbImage;

    fn framed(w: u32, h: u32, card: (u32, u32, u32, u32)) -> CardProcessor {
        let (x0, y0, x1, y1) = card;
        let img = RgbImage::from_fn(w, h, |x, y| {
            if x >= x0 && x < x1 && y >= y0 && y < y1 {
                Rgb([200, 150, 100])
            } else {
                Rgb([0, 0, 0])
            }
        });
        CardProcessor::from_dynamic(DynamicImage::ImageRgb8(img))
    }

    #[test]
    fn crop_to_detected_bounds() {
        let card = framed(120, 180, (20, 30, 100, 150));
        let bounds = card
            .detect_bounds(&BoundsOptions::dark_edges(30, 0))
            .expect("bounds");
        assert_eq!(bounds, Bounds::new(20, 30, 100, 150));

        let cropped = card.crop_to(bounds).expect("crop");
        assert_eq!((cropped.width(), cropped.height()), (80, 120));
    }

    #[test]
    fn crop_rejects_out_of_range_bounds() {
        let card = framed(10, 10, (0, 0, 10, 10));
        let err = card.crop_to(Bounds::new(0, 0, 11, 10)).err().expect("error");
        assert!(matches!(err, CardtrimError::InvalidBounds(_)));
    }

    #[test]
    fn crop_rejects_empty_bounds() {
        let card = framed(10, 10, (0, 0, 10, 10));
        assert!(card.crop_to(Bounds::new(4, 4, 4, 8)).is_err());
    }

    #[test]
    fn letterbox_centres_on_transparent_canvas() {
        // 200x100 landscape into 600x1000: fits as 200x100 (no enlarging).
        let card = framed(200, 100, (0, 0, 200, 100));
        let out = card.letterbox(TargetSize::new(600, 1000)).into_dynamic().to_rgba8();

        assert_eq!(out.dimensions(), (600, 1000));
        assert_eq!(out.get_pixel(0, 0).0[3], 0);
        assert_eq!(*out.get_pixel(200, 450), Rgba([200, 150, 100, 255]));
        assert_eq!(out.get_pixel(199, 450).0[3], 0);
        assert_eq!(out.get_pixel(200, 449).0[3], 0);
    }

    #[test]
    fn letterbox_shrinks_large_images() {
        let card = framed(1200, 1200, (0, 0, 1200, 1200));
        let out = card.letterbox(TargetSize::new(600, 1000));
        assert_eq!((out.width(), out.height()), (600, 1000));
    }

    #[test]
    fn fit_to_always_hits_target() {
        let target = TargetSize::new(60, 100);
        for (w, h) in [(60, 100), (64, 96), (300, 100), (10, 90), (1, 1)] {
            let card = framed(w, h, (0, 0, w, h));
            let out = card.fit_to(target);
            assert_eq!((out.width(), out.height()), (60, 100), "input {w}x{h}");
        }
    }

    #[test]
    fn fit_within_preserves_aspect() {
        let target = TargetSize::new(600, 1000);
        assert_eq!(fit_within(1024, 1536, target), (600, 900));
        assert_eq!(fit_within(2000, 1000, target), (600, 300));
        assert_eq!(fit_within(300, 400, target), (300, 400));
    }

    #[test]
    fn chroma_key_clears_only_green_screen() {
        let img = RgbaImage::from_fn(4, 1, |x, _| match x {
            0 => Rgba([20, 200, 30, 255]),  // keyed
            1 => Rgba([120, 200, 30, 255]), // red too high
            2 => Rgba([20, 150, 30, 255]),  // green not above limit
            _ => Rgba([10, 250, 99, 128]),  // keyed
        });
        let out = CardProcessor::from_dynamic(DynamicImage::ImageRgba8(img))
            .chroma_key(&ChromaSettings::default())
            .into_dynamic()
            .to_rgba8();

        assert_eq!(*out.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*out.get_pixel(1, 0), Rgba([120, 200, 30, 255]));
        assert_eq!(*out.get_pixel(2, 0), Rgba([20, 150, 30, 255]));
        assert_eq!(out.get_pixel(3, 0).0[3], 0);
    }

    #[test]
    fn clear_dark_border_spares_the_card() {
        // Dark pixels inside the card must survive.
        let img = RgbImage::from_fn(20, 20, |x, y| {
            if (5..15).contains(&x) && (5..15).contains(&y) && x != 10 {
                Rgb([200, 200, 200])
            } else {
                Rgb([10, 10, 10])
            }
        });
        let out = CardProcessor::from_dynamic(DynamicImage::ImageRgb8(img))
            .clear_dark_border(Bounds::new(5, 5, 15, 15), 50)
            .into_dynamic()
            .to_rgba8();

        assert_eq!(out.get_pixel(0, 0).0[3], 0);
        assert_eq!(out.get_pixel(19, 7).0[3], 0);
        assert_eq!(*out.get_pixel(10, 10), Rgba([10, 10, 10, 255]));
        assert_eq!(*out.get_pixel(7, 7), Rgba([200, 200, 200, 255]));
    }

    #[test]
    fn draw_bounds_outlines_rectangle() {
        let card = framed(30, 30, (0, 0, 0, 0));
        let out = card
            .draw_bounds(Bounds::new(5, 5, 25, 25))
            .into_dynamic()
            .to_rgba8();
        assert_eq!(*out.get_pixel(5, 5), OVERLAY_RED);
        assert_eq!(*out.get_pixel(24, 15), OVERLAY_RED);
        assert_eq!(*out.get_pixel(15, 15), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn mode_and_alpha() {
        let rgb = framed(2, 2, (0, 0, 2, 2));
        assert_eq!(rgb.mode(), "RGB");
        assert!(!rgb.has_alpha());

        let rgba = CardProcessor::from_dynamic(DynamicImage::ImageRgba8(RgbaImage::new(2, 2)));
        assert_eq!(rgba.mode(), "RGBA");
        assert!(rgba.has_alpha());
    }

    #[test]
    fn png_round_trip_keeps_pixels() {
        let card = framed(8, 8, (2, 2, 6, 6));
        let bytes = card.to_png_bytes().expect("encode");
        let decoded = CardProcessor::from_bytes(&bytes).expect("decode");
        assert_eq!(decoded.as_dynamic().to_rgb8(), card.as_dynamic().to_rgb8());
    }

    #[test]
    fn open_missing_file_is_not_found() {
        let err = CardProcessor::open("/nonexistent/card.png").err().expect("error");
        assert!(matches!(err, CardtrimError::NotFound(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = CardProcessor::from_bytes(b"not an image").err().expect("error");
        assert!(matches!(err, CardtrimError::Decode(_)));
    }
}
