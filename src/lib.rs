//! PalFix library
//!
//! Corrects PAL speedup in Matroska files by driving MKVToolNix and ffmpeg.
//! The timing math lives in [`domain`]; everything that touches an external
//! program goes through the [`ports::ToolRunner`] seam.

pub mod adapters;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod planner;
pub mod ports;
pub mod probe;
pub mod streams;
pub mod utils;

// Re-export commonly used types
pub use domain::factor::CorrectionFactor;
pub use domain::model::{SyncPlan, TrackReport};
pub use domain::timecode::correct_timecode;
pub use engine::{CorrectionPipeline, RunSummary};
pub use error::{PalFixError, PalFixResult};
