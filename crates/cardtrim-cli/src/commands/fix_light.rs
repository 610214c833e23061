// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `cardtrim fix-light` — cut away black or white borders with the adaptive
// detector and resize to the standard card size.

use std::path::Path;

use cardtrim_core::AppConfig;
use cardtrim_image::{BoundsOptions, CardProcessor};

use super::{detect, rule};
use crate::services::batch;
use crate::services::workspace::{LIGHT_BACKUP_DIR, backup, file_name};

pub fn run(config: &AppConfig, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            println!("Processing: {}", path.display());
            fix_and_resize(config, path)?;
            println!("Done!");
            Ok(())
        }
        None => run_batch(config),
    }
}

fn run_batch(config: &AppConfig) -> anyhow::Result<()> {
    println!("Checking all cards for white/light edges...");
    let targets = detect::light_edged(config)?;
    for path in &targets {
        println!("  Found light edges: {}", file_name(path));
    }

    println!("\nProcessing {} cards with edge issues...", targets.len());
    println!("{}", rule());

    let backup_dir = config.images_dir.join(LIGHT_BACKUP_DIR);
    let report = batch::run(&targets, |path| {
        println!("Processing: {}", file_name(path));
        backup(path, &backup_dir, false)?;
        fix_and_resize(config, path)?;
        println!("  ✅ Fixed and resized to {}\n", config.target);
        Ok(())
    });

    println!("{}", report.summary("Fixed"));
    Ok(())
}

/// Crop `path` to its adaptive bounds and resize it to the target size,
/// overwriting the file.
fn fix_and_resize(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let card = CardProcessor::open(path)?;
    let (width, height) = (card.width(), card.height());
    let bounds = card.detect_bounds(&BoundsOptions::from(&config.adaptive))?;
    let trim = bounds.trimmed(width, height);

    println!("  Detected bounds: {bounds}");
    println!(
        "  Cropping: {}px left, {}px top, {}px right, {}px bottom",
        trim.left, trim.top, trim.right, trim.bottom
    );

    card.crop_to(bounds)?
        .resize_exact(config.target.width, config.target.height)
        .save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn white_framed_card_becomes_target_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let card = dir.path().join("20_judgement.png");
        RgbImage::from_fn(100, 150, |x, y| {
            if (15..85).contains(&x) && (15..135).contains(&y) {
                let v = if (x + y) % 2 == 0 { 60 } else { 160 };
                Rgb([v, v, v])
            } else {
                Rgb([255, 255, 255])
            }
        })
        .save(&card)
        .expect("write card");

        let config = AppConfig {
            images_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        run(&config, None).expect("batch");

        assert!(dir.path().join(LIGHT_BACKUP_DIR).join("20_judgement.png").exists());
        let fixed = image::open(&card).expect("open");
        assert_eq!((fixed.width(), fixed.height()), (600, 1000));
    }

    #[test]
    fn single_missing_image_is_an_error() {
        let config = AppConfig::default();
        assert!(run(&config, Some(Path::new("/nonexistent/card.png"))).is_err());
    }
}
