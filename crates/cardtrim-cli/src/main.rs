// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// cardtrim — batch clean-up of generated tarot-card images.
//
// Entry point. Initialises logging, loads configuration, and dispatches to the
// subcommand handlers.

mod commands;
mod services;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cardtrim_core::AppConfig;

#[derive(Parser)]
#[command(name = "cardtrim")]
#[command(about = "Remove card borders, key out green screens, and standardise card sizes")]
struct Cli {
    /// JSON configuration file (defaults apply to anything it leaves out)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the card images
    #[arg(long, global = true)]
    images_dir: Option<PathBuf>,

    /// Directory holding raw generator output
    #[arg(long, global = true)]
    generated_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print mode, size, and aspect ratio of an image
    Info {
        /// Image to inspect
        path: PathBuf,
    },
    /// Report black or white border artifacts
    Detect {
        /// Analyse a single image instead of the whole images directory
        path: Option<PathBuf>,
    },
    /// Remove dark borders by making them transparent (or by cropping)
    FixDark {
        /// Images to fix; defaults to every image flagged with dark edges
        paths: Vec<PathBuf>,

        /// Crop to the card and resize back to the original size instead
        #[arg(long)]
        crop: bool,

        /// Write the transparency fix of one image to test_transparent.png
        #[arg(long, conflicts_with = "crop")]
        test: bool,
    },
    /// Remove black or white borders, then resize to the target size
    FixLight {
        /// Fix a single image in place instead of every light-edged image
        path: Option<PathBuf>,
    },
    /// Crop dark borders and fit to the target size
    Crop {
        /// Image to process; defaults to every image flagged with dark edges
        input: Option<PathBuf>,

        /// Where to write the result (defaults to overwriting the input)
        output: Option<PathBuf>,

        /// Only report the bounds that would be used
        #[arg(long, requires = "input")]
        preview: bool,

        /// With --preview, also write a copy with the bounds outlined
        #[arg(long, requires = "preview")]
        overlay: Option<PathBuf>,
    },
    /// Replace green-screen backgrounds with transparency
    Chroma,
    /// Letterbox every image to the target size as a _standard.png copy
    Standardize {
        /// Apply without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(dir) = cli.images_dir {
        config.images_dir = dir;
    }
    if let Some(dir) = cli.generated_dir {
        config.generated_dir = dir;
    }
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Info { path } => commands::info::run(&path),
        Commands::Detect { path } => commands::detect::run(&config, path.as_deref()),
        Commands::FixDark { paths, crop, test } => {
            let mode = if test {
                commands::fix_dark::Mode::Test
            } else if crop {
                commands::fix_dark::Mode::Crop
            } else {
                commands::fix_dark::Mode::Transparency
            };
            commands::fix_dark::run(&config, &paths, mode)
        }
        Commands::FixLight { path } => commands::fix_light::run(&config, path.as_deref()),
        Commands::Crop {
            input,
            output,
            preview,
            overlay,
        } => match (input, preview) {
            (Some(input), true) => commands::crop::preview(&config, &input, overlay.as_deref()),
            (Some(input), false) => commands::crop::run_single(&config, &input, output.as_deref()),
            (None, _) => commands::crop::run_batch(&config),
        },
        Commands::Chroma => commands::chroma::run(&config),
        Commands::Standardize { yes } => commands::standardize::run(&config, yes),
    }
}

/// Install the fmt subscriber. `RUST_LOG` wins; otherwise verbosity flags
/// pick the level, keeping stdout free of log noise by default.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
