// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `cardtrim crop` — crop dark borders and fit the card to the target size.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cardtrim_core::AppConfig;
use cardtrim_image::{BoundsOptions, CardProcessor};

use super::{detect, rule};
use crate::services::batch::{self, BatchReport};
use crate::services::workspace::{
    CROPPED_DIR, DARK_BACKUP_DIR, ensure_dir, file_name, list_pngs_containing,
};

fn crop_options(config: &AppConfig) -> BoundsOptions {
    BoundsOptions::from(&config.crop)
}

/// Report the bounds `crop` would use, optionally writing an outlined copy.
pub fn preview(config: &AppConfig, input: &Path, overlay: Option<&Path>) -> anyhow::Result<()> {
    let card = CardProcessor::open(input)?;
    let (width, height) = (card.width(), card.height());
    let bounds = card.detect_bounds(&crop_options(config))?;
    let trim = bounds.trimmed(width, height);

    println!("Image: {}", input.display());
    println!("Original size: {width}x{height}");
    println!("Content bounds: {bounds}");
    println!("Content size: {}x{}", bounds.width(), bounds.height());
    if trim.is_zero() {
        println!("No black borders detected");
    } else {
        println!("Black borders to remove:");
        println!("  Left: {}px", trim.left);
        println!("  Top: {}px", trim.top);
        println!("  Right: {}px", trim.right);
        println!("  Bottom: {}px", trim.bottom);
    }

    if let Some(overlay) = overlay {
        card.draw_bounds(bounds).save(overlay)?;
        println!("Saved visualization to {}", overlay.display());
    }
    Ok(())
}

/// Crop one image and fit it to the target size. Without `output` the input
/// is overwritten.
pub fn run_single(config: &AppConfig, input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let output = output.unwrap_or(input);
    println!("Processing: {}", input.display());
    crop_and_fit(config, input, output)?;
    println!("  Saved to: {}", output.display());
    Ok(())
}

/// Crop every dark-edged image into `<images>/cropped_resized/`. A backup
/// copy of a card, when present, is used as the source since it still has
/// its original pixels.
pub fn run_batch(config: &AppConfig) -> anyhow::Result<()> {
    crop_all(config).map(|_| ())
}

fn crop_all(config: &AppConfig) -> anyhow::Result<BatchReport> {
    let targets = crop_targets(config)?;
    let backup_dir = config.images_dir.join(DARK_BACKUP_DIR);
    let output_dir = ensure_dir(&config.images_dir.join(CROPPED_DIR))?;

    println!("Processing {} images with black edges...", targets.len());
    println!("Output directory: {}/", output_dir.display());
    println!("{}", rule());

    let report = batch::run(&targets, |path| {
        let name = file_name(path);
        let backup = backup_dir.join(&name);
        let source = if backup.exists() {
            println!("\nProcessing backup: {name}");
            backup.as_path()
        } else {
            println!("\nProcessing current: {name}");
            path
        };
        crop_and_fit(config, source, &output_dir.join(&name))?;
        println!("  ✅ Success");
        Ok(())
    });

    println!();
    println!("{}", rule());
    println!("{}", report.summary("Processed"));
    if let Some(line) = report.failure_line() {
        println!("{line}");
    }
    if !report.succeeded.is_empty() {
        println!("\nCropped images saved to: {}/", output_dir.display());
        println!(
            "To replace the originals: cp {}/*.png {}/",
            output_dir.display(),
            config.images_dir.display()
        );
    }
    Ok(report)
}

/// Cards flagged with dark edges plus every card that has a dark-edge
/// backup, keyed by file name. Backed-up cards may already be repaired and no
/// longer flagged.
fn crop_targets(config: &AppConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut targets: BTreeMap<String, PathBuf> = detect::dark_edged(config)?
        .into_iter()
        .map(|path| (file_name(&path), path))
        .collect();
    let backup_dir = config.images_dir.join(DARK_BACKUP_DIR);
    for backup in list_pngs_containing(&backup_dir, "")? {
        let name = file_name(&backup);
        targets
            .entry(name)
            .or_insert_with_key(|name| config.images_dir.join(name));
    }
    Ok(targets.into_values().collect())
}

fn crop_and_fit(config: &AppConfig, input: &Path, output: &Path) -> anyhow::Result<()> {
    let card = CardProcessor::open(input)?;
    println!("  Original size: {}x{}", card.width(), card.height());
    let bounds = card.detect_bounds(&crop_options(config))?;
    println!("  Content bounds: {bounds}");

    let cropped = card.crop_to(bounds)?;
    println!("  Cropped size: {}x{}", cropped.width(), cropped.height());
    let fitted = cropped.fit_to(config.target);
    println!("  Final size: {}x{}", fitted.width(), fitted.height());
    fitted.save(output)?;
    Ok(())
}
