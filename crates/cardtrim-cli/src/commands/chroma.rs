// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `cardtrim chroma` — key out green-screen backgrounds.

use cardtrim_core::AppConfig;
use cardtrim_image::CardProcessor;

use crate::services::batch;
use crate::services::workspace::{ensure_dir, file_name, list_pngs_containing, transparent_output};

/// Generator output names keyed sources `<card>_chroma_<stamp>.png`.
const GENERATED_MARKER: &str = "_chroma_";
const IMAGES_MARKER: &str = "_chroma";

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let mut sources = list_pngs_containing(&config.generated_dir, GENERATED_MARKER)?;
    sources.extend(list_pngs_containing(&config.images_dir, IMAGES_MARKER)?);
    ensure_dir(&config.images_dir)?;

    let report = batch::run(&sources, |source| {
        let output = transparent_output(source, &config.images_dir);
        CardProcessor::open(source)?
            .chroma_key(&config.chroma)
            .save(&output)?;
        println!("Processed: {} -> {}", file_name(source), file_name(&output));
        Ok(())
    });

    println!("\nProcessed {} images", report.succeeded.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn keyed_copies_land_in_images_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let generated = dir.path().join("generated_images");
        let images = dir.path().join("images");
        std::fs::create_dir(&generated).expect("mkdir");
        RgbImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgb([20, 220, 30])
            } else {
                Rgb([180, 40, 60])
            }
        })
        .save(generated.join("ace_chroma_1.png"))
        .expect("write");
        RgbImage::new(4, 4)
            .save(generated.join("ace_plain.png"))
            .expect("write");
        RgbImage::new(4, 4)
            .save(generated.join("ace_chroma.png"))
            .expect("write");

        let config = AppConfig {
            images_dir: images.clone(),
            generated_dir: generated,
            ..AppConfig::default()
        };
        run(&config).expect("chroma");

        let keyed = image::open(images.join("ace_transparent_1.png"))
            .expect("open")
            .to_rgba8();
        assert_eq!(keyed.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(keyed.get_pixel(7, 7).0, [180, 40, 60, 255]);
        assert!(!images.join("ace_plain.png").exists());
        // Generator output without a stamp after the marker is not a source.
        assert!(!images.join("ace_transparent.png").exists());
    }

    #[test]
    fn nothing_to_do_when_dirs_are_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            images_dir: dir.path().join("images"),
            generated_dir: dir.path().join("nowhere"),
            ..AppConfig::default()
        };
        run(&config).expect("empty run");
        assert!(dir.path().join("images").is_dir());
    }
}
