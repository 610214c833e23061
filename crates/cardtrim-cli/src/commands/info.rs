// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `cardtrim info` — basic facts about one image.

use std::path::Path;

use cardtrim_image::CardProcessor;

/// Aspect ratio the generator is asked for (2:3).
const GENERATOR_ASPECT: f64 = 2.0 / 3.0;

pub fn run(path: &Path) -> anyhow::Result<()> {
    let card = CardProcessor::open(path)?;
    println!("Image: {}", path.display());
    println!("Mode: {}", card.mode());
    println!("Size: {}x{}", card.width(), card.height());
    println!("Has alpha: {}", card.has_alpha());
    println!(
        "Aspect ratio: {:.3} (Target: {GENERATOR_ASPECT:.3} for 2:3)",
        card.aspect_ratio()
    );
    Ok(())
}
