// Domain layer - Pure types and timing math with no process or file access

pub mod factor;
pub mod model;
pub mod timecode;
