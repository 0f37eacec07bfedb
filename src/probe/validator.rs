//! Input and output path validation

use std::path::Path;

use crate::error::{PalFixError, PalFixResult};
use crate::utils::path;

/// What is currently at the output location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    /// Nothing there yet
    Vacant,
    /// A file that would be overwritten
    Exists,
}

/// Path checks done before any tool runs
pub struct PathValidator;

impl PathValidator {
    /// Input must exist and be a regular file
    pub fn validate_input(input: &Path) -> PalFixResult<()> {
        if !input.exists() {
            return Err(PalFixError::InputNotFound {
                path: input.to_path_buf(),
            });
        }
        if !input.is_file() {
            return Err(PalFixError::InputNotFile {
                path: input.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Output must differ from the input and must not be a directory
    pub fn validate_output(input: &Path, output: &Path) -> PalFixResult<OutputState> {
        if path::same_location(input, output)? {
            return Err(PalFixError::IdenticalPaths {
                path: path::resolve(output)?,
            });
        }
        if output.is_dir() {
            return Err(PalFixError::OutputIsDirectory {
                path: output.to_path_buf(),
            });
        }
        Ok(if output.exists() {
            OutputState::Exists
        } else {
            OutputState::Vacant
        })
    }
}
