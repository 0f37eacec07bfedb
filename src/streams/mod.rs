//! Text stream processing (chapter and subtitle markup)

pub mod retimer;

pub use retimer::{RewriteStats, TimecodeRewriter};
