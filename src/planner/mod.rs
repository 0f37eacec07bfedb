//! Synchronization planning module
//!
//! Decides which correction each track gets: a rate change in the
//! multiplexer for everything but audio, and a re-timed chapter file when the
//! input has chapters.

pub mod chapters;
pub mod sync;

pub use chapters::ChapterCorrector;
pub use sync::{sync_directives, SyncPlanner};
