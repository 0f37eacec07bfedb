//! PalFix CLI
//!
//! Undo PAL speedup on a Matroska file: video and subtitle tracks are slowed
//! by the multiplexer without re-encoding, chapters are re-timed, and audio
//! is resampled by the transcoder.
//!
//! # Usage
//!
//! ```bash
//! fix-pal movie.mkv movie-fixed.mkv
//! fix-pal --factor 25/24 --overwrite always movie.mkv movie-fixed.mkv
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use palfix::cli::commands::{self, Outcome};
use palfix::cli::Cli;
use palfix::config_initialization::initialize_configuration_hierarchy;

/// Main entry point for the PalFix CLI application
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;
    config.logging.initialize()?;

    info!("Starting PalFix");
    config.log_summary();

    match commands::correct(&cli, &config)? {
        Outcome::Completed(summary) => {
            info!(
                synced = summary.synced_tracks.len(),
                chapters = summary.chapters_corrected,
                "Finished: {}",
                summary.output.display()
            );
        }
        Outcome::Declined => {
            println!("Stopping.");
        }
    }

    Ok(())
}
