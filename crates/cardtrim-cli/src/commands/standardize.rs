// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `cardtrim standardize` — letterbox every card to the target size as a
// `_standard.png` sibling.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use cardtrim_core::AppConfig;
use cardtrim_image::CardProcessor;
use tracing::warn;

use crate::services::batch;
use crate::services::workspace::{file_name, list_pngs_containing, with_suffix};

const STANDARD_SUFFIX: &str = "_standard";

pub fn run(config: &AppConfig, yes: bool) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    run_with(config, yes, &mut stdin.lock())
}

fn run_with(config: &AppConfig, yes: bool, input: &mut impl BufRead) -> anyhow::Result<()> {
    let candidates = candidates(config)?;

    println!("Current image dimensions:");
    for path in &candidates {
        match CardProcessor::open(path) {
            Ok(card) => println!("{}: {}x{}", file_name(path), card.width(), card.height()),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Cannot read image");
                println!("{}: unreadable ({err})", file_name(path));
            }
        }
    }
    println!("\nTarget dimensions: {}", config.target);

    if !yes && !confirm(input)? {
        println!("No images changed.");
        return Ok(());
    }

    let target = config.target;
    let mut skipped = 0usize;
    let report = batch::run(&candidates, |path| {
        let card = CardProcessor::open(path)?;
        if (card.width(), card.height()) == (target.width, target.height) {
            skipped += 1;
            return Ok(());
        }
        let output = with_suffix(path, STANDARD_SUFFIX);
        card.letterbox(target).save(&output)?;
        println!("Standardized: {}", file_name(&output));
        Ok(())
    });

    println!(
        "\n{} ({skipped} already {target})",
        report.summary("Checked")
    );
    Ok(())
}

/// PNGs in the images and generated dirs, leaving out keyed copies and
/// earlier `_standard` output.
fn candidates(config: &AppConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = list_pngs_containing(&config.images_dir, "")?;
    paths.extend(list_pngs_containing(&config.generated_dir, "")?);
    paths.retain(|path| {
        let name = file_name(path);
        !name.contains("transparent") && !name.contains(STANDARD_SUFFIX)
    });
    Ok(paths)
}

fn confirm(input: &mut impl BufRead) -> anyhow::Result<bool> {
    print!("\nResize existing images to the standard size? (y/n): ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
