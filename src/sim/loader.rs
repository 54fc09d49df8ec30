//! Program loading.
//!
//! Reads an assembly source file from disk and parses it into the
//! instruction sequence that [`Cpu::load`](crate::core::Cpu::load) places
//! in the code region.

use std::fs;
use std::path::Path;

use log::info;

use crate::common::LoadError;
use crate::isa::{parse_program, Instruction};

/// Reads and parses the program at `path`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read and
/// [`LoadError::Parse`] for the first malformed line.
pub fn load_program(path: impl AsRef<Path>) -> Result<Vec<Instruction>, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let program = parse_program(&text)?;
    info!("[Loader] {} instructions from {}", program.len(), path.display());
    Ok(program)
}
