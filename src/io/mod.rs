pub mod error;

use std::fs;
use std::io::Read;
use std::path::Path;

pub use error::IoError;

/// Reads one input file into a raw blob; splitting and parsing happen later.
pub fn read_file(path: &Path) -> Result<Vec<u8>, IoError> {
    fs::read(path).map_err(|source| IoError::ReadInput {
        path: path.display().to_string(),
        source,
    })
}

/// Drains a stream (normally stdin) into a raw blob.
pub fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>, IoError> {
    let mut blob = Vec::new();
    reader.read_to_end(&mut blob).map_err(IoError::ReadStdin)?;
    Ok(blob)
}
