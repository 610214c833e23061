// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `cardtrim fix-dark` — repair black borders in place, either by making them
// transparent or by cropping them away and scaling back up.

use std::path::{Path, PathBuf};

use cardtrim_core::AppConfig;
use cardtrim_image::{BoundsOptions, CardProcessor};

use super::{detect, rule};
use crate::services::batch;
use crate::services::workspace::{DARK_BACKUP_DIR, backup, file_name};

/// Where `--test` writes its result.
const TEST_OUTPUT: &str = "test_transparent.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Dark border pixels become transparent.
    Transparency,
    /// Crop to the card, then resize back to the original dimensions.
    Crop,
    /// Transparency fix of a single image written to a scratch file.
    Test,
}

pub fn run(config: &AppConfig, paths: &[PathBuf], mode: Mode) -> anyhow::Result<()> {
    if mode == Mode::Test {
        let input = paths
            .first()
            .cloned()
            .unwrap_or_else(|| config.sample_card_path());
        println!("Testing transparency fix on {}", input.display());
        make_transparent(config, &input, Path::new(TEST_OUTPUT))?;
        println!("Saved test result to {TEST_OUTPUT}");
        return Ok(());
    }

    let targets = if paths.is_empty() {
        detect::dark_edged(config)?
    } else {
        paths.to_vec()
    };
    let backup_dir = config.images_dir.join(DARK_BACKUP_DIR);
    let method = match mode {
        Mode::Crop => "crop",
        _ => "transparency",
    };

    println!("Processing {} images with {method} method...", targets.len());
    println!("Creating backups in {}/", backup_dir.display());
    println!("{}", rule());

    let report = batch::run(&targets, |path| {
        backup(path, &backup_dir, true)?;
        match mode {
            Mode::Crop => crop_in_place(config, path)?,
            _ => make_transparent(config, path, path)?,
        }
        println!("✅ Fixed: {}", file_name(path));
        Ok(())
    });

    println!();
    println!("{}", rule());
    println!("{}", report.summary("Fixed"));
    if let Some(line) = report.failure_line() {
        println!("{line}");
    }
    println!("Originals backed up in: {}", backup_dir.display());
    Ok(())
}

fn repair_options(config: &AppConfig) -> BoundsOptions {
    BoundsOptions::dark_edges_mean(config.repair.threshold, config.repair.margin)
}

/// Clear the dark frame of `input` to transparency and write to `output`.
fn make_transparent(config: &AppConfig, input: &Path, output: &Path) -> anyhow::Result<()> {
    let card = CardProcessor::open(input)?;
    let bounds = card.detect_bounds(&repair_options(config))?;
    card.clear_dark_border(bounds, config.repair.threshold)
        .save(output)?;
    Ok(())
}

/// Crop the dark frame off `path` and scale back to the original size.
fn crop_in_place(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let card = CardProcessor::open(path)?;
    let (width, height) = (card.width(), card.height());
    let bounds = card.detect_bounds(&repair_options(config))?;
    card.crop_to(bounds)?
        .resize_exact(width, height)
        .save(path)?;
    Ok(())
}
