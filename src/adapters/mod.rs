// Adapters - External system implementations

pub mod process;
pub mod toml_config;

// Re-export adapters
pub use process::{ProcessRunner, Toolchain};
pub use toml_config::TomlConfigAdapter;
