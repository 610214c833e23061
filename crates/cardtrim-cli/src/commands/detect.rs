// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `cardtrim detect` — flag images with black or white border artifacts.
// The scan helpers here also pick the inputs for the batch repair commands.

use std::path::{Path, PathBuf};

use cardtrim_core::AppConfig;
use cardtrim_image::{CardProcessor, EdgeReport};
use tracing::warn;

use super::rule;
use crate::services::workspace::{file_name, list_pngs};

pub fn run(config: &AppConfig, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => run_single(config, path),
        None => run_all(config),
    }
}

fn run_single(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let report = CardProcessor::open(path)?.analyze_edges(&config.analysis)?;
    let [r, g, b] = report.avg_rgb;
    println!("Image: {}", path.display());
    println!("Has black edges: {}", report.has_dark_edges);
    println!("Black pixel percentage: {:.2}%", report.dark_percentage);
    println!("Has light edges: {}", report.has_light_edges);
    println!("Light pixel percentage: {:.2}%", report.light_percentage);
    println!("Average edge brightness: {:.2}", report.avg_brightness);
    println!("Average edge RGB: [{r:.1}, {g:.1}, {b:.1}]");
    for corner in &report.corners {
        println!(
            "  {:<13} {:>5.1}% dark, brightness {:.1}",
            corner.corner.name(),
            corner.dark_ratio * 100.0,
            corner.avg_brightness
        );
    }
    Ok(())
}

fn run_all(config: &AppConfig) -> anyhow::Result<()> {
    let paths = list_pngs(&config.images_dir)?;
    println!("Analyzing {} images for black edges...", paths.len());
    println!("{}", rule());

    let mut problematic = Vec::new();
    let mut borderline = Vec::new();
    let mut clean = 0usize;

    for (path, report) in analyze_all(config, &paths) {
        let name = file_name(&path);
        if report.has_dark_edges {
            println!(
                "❌ {name}: {:.1}% black pixels (avg brightness: {:.1})",
                report.dark_percentage, report.avg_brightness
            );
            problematic.push((name, report));
        } else if report.is_borderline {
            println!(
                "⚠️  {name}: {:.1}% black pixels (borderline)",
                report.dark_percentage
            );
            borderline.push((name, report));
        } else {
            clean += 1;
        }
    }

    println!();
    println!("{}", rule());
    println!("SUMMARY");
    println!("{}", rule());
    println!("✅ Clean images: {clean}");
    println!("⚠️  Borderline images: {}", borderline.len());
    println!("❌ Problematic images: {}", problematic.len());

    if !problematic.is_empty() {
        println!("\nImages that need fixing (black edges detected):");
        for (name, report) in &problematic {
            println!("  - {name} ({:.1}% black)", report.dark_percentage);
            let worst = report.worst_corners();
            if !worst.is_empty() {
                let names: Vec<_> = worst.iter().map(|c| c.name()).collect();
                println!("    Worst areas: {}", names.join(", "));
            }
        }
    }
    if !borderline.is_empty() {
        println!("\nBorderline images (may need attention):");
        for (name, report) in &borderline {
            println!("  - {name} ({:.1}% black)", report.dark_percentage);
        }
    }
    Ok(())
}

/// Analyse every path, skipping (and reporting) images that fail to load.
pub fn analyze_all(config: &AppConfig, paths: &[PathBuf]) -> Vec<(PathBuf, EdgeReport)> {
    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        let analysed =
            CardProcessor::open(path).and_then(|card| card.analyze_edges(&config.analysis));
        match analysed {
            Ok(report) => reports.push((path.clone(), report)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Skipping image");
                println!("Error processing {}: {err}", path.display());
            }
        }
    }
    reports
}

/// Images in the images directory flagged with dark edges.
pub fn dark_edged(config: &AppConfig) -> anyhow::Result<Vec<PathBuf>> {
    let paths = list_pngs(&config.images_dir)?;
    Ok(analyze_all(config, &paths)
        .into_iter()
        .filter(|(_, report)| report.has_dark_edges)
        .map(|(path, _)| path)
        .collect())
}

/// Images in the images directory flagged with light edges, ignoring backup
/// and test copies.
pub fn light_edged(config: &AppConfig) -> anyhow::Result<Vec<PathBuf>> {
    let paths: Vec<_> = list_pngs(&config.images_dir)?
        .into_iter()
        .filter(|path| {
            let name = file_name(path);
            !name.contains("backup") && !name.contains("test")
        })
        .collect();
    Ok(analyze_all(config, &paths)
        .into_iter()
        .filter(|(_, report)| report.has_light_edges)
        .map(|(path, _)| path)
        .collect())
}
