// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration. Every field has a default, so a config file only
// needs to name the values it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CardtrimError, Result};
use crate::types::TargetSize;

/// Top-level settings for a cardtrim run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the finished card images.
    pub images_dir: PathBuf,
    /// Directory holding raw generator output (chroma-key sources).
    pub generated_dir: PathBuf,
    /// Canvas every finished card is resized to.
    pub target: TargetSize,
    /// Card used by `fix-dark --test` when no path is given. Relative paths
    /// are resolved against `images_dir`.
    pub sample_card: PathBuf,
    /// Dark-edge detection used before cropping and resizing.
    pub crop: DarkEdgeSettings,
    /// Dark-edge detection used when repairing borders in place.
    pub repair: DarkEdgeSettings,
    /// Band detection for borders that may be black or white.
    pub adaptive: AdaptiveSettings,
    /// Thresholds for flagging images with border artifacts.
    pub analysis: AnalysisSettings,
    /// Green-screen keying thresholds.
    pub chroma: ChromaSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("images"),
            generated_dir: PathBuf::from("generated_images"),
            target: TargetSize::default(),
            sample_card: PathBuf::from("00_the_fool.png"),
            crop: DarkEdgeSettings {
                threshold: 30,
                margin: 5,
            },
            repair: DarkEdgeSettings {
                threshold: 50,
                margin: 2,
            },
            adaptive: AdaptiveSettings::default(),
            analysis: AnalysisSettings::default(),
            chroma: ChromaSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CardtrimError::NotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Location of the sample card, inside `images_dir` unless configured
    /// as an absolute path.
    pub fn sample_card_path(&self) -> PathBuf {
        if self.sample_card.is_absolute() {
            self.sample_card.clone()
        } else {
            self.images_dir.join(&self.sample_card)
        }
    }

    /// Write the settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject settings no command can work with.
    pub fn validate(&self) -> Result<()> {
        if self.target.width == 0 || self.target.height == 0 {
            return Err(CardtrimError::Config(format!(
                "target size must be non-zero, got {}",
                self.target
            )));
        }
        if self.adaptive.dark_threshold >= self.adaptive.light_threshold {
            return Err(CardtrimError::Config(format!(
                "adaptive dark threshold ({}) must be below light threshold ({})",
                self.adaptive.dark_threshold, self.adaptive.light_threshold
            )));
        }
        if self.analysis.edge_width == 0 || self.analysis.corner_size == 0 {
            return Err(CardtrimError::Config(
                "edge width and corner size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Brightness threshold and back-off margin for dark-border detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DarkEdgeSettings {
    /// Lines at or below this brightness are treated as border.
    pub threshold: u8,
    /// Pixels kept beyond the first content line.
    pub margin: u32,
}

/// Settings for the black-or-white border detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveSettings {
    pub dark_threshold: u8,
    pub light_threshold: u8,
    /// Minimum brightness standard deviation for a line to count as content.
    pub min_std_dev: f32,
    pub margin: u32,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self {
            dark_threshold: 30,
            light_threshold: 200,
            min_std_dev: 10.0,
            margin: 5,
        }
    }
}

/// Settings for edge-strip analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Width in pixels of the strip sampled along each side.
    pub edge_width: u32,
    /// A pixel is dark when R, G and B are all at or below this value.
    pub dark_threshold: u8,
    /// A pixel is light when its RGB mean is above this value.
    pub light_threshold: u8,
    /// Side length of the square sampled in each corner.
    pub corner_size: u32,
    /// Dark share (0-1) above which an image is flagged.
    pub dark_ratio: f64,
    /// Dark share (0-1) above which an unflagged image is borderline.
    pub borderline_ratio: f64,
    /// Light share (0-1) above which an image is flagged.
    pub light_ratio: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            edge_width: 10,
            dark_threshold: 50,
            light_threshold: 200,
            corner_size: 20,
            dark_ratio: 0.3,
            borderline_ratio: 0.15,
            light_ratio: 0.3,
        }
    }
}

/// Green-screen keying: a pixel is background when green is above
/// `green_min` and both red and blue are below their limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromaSettings {
    pub green_min: u8,
    pub red_max: u8,
    pub blue_max: u8,
}

impl Default for ChromaSettings {
    fn default() -> Self {
        Self {
            green_min: 150,
            red_max: 100,
            blue_max: 100,
        }
    }
}
