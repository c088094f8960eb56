//! Destinations for exported files.

use crate::error::ExchangeError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Receives exported files.
pub trait FileSink {
    /// Stores `bytes` under `file_name` and returns where they went.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExchangeError>;
}

/// Writes files into a directory, creating it on first delivery.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink targeting `dir`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExchangeError> {
        validate_file_name(file_name)?;
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        let mut file = fs::File::create(&path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "file delivered");
        Ok(path)
    }
}

/// Keeps delivered files in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliveries in order.
    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }

    /// The most recent delivery with `file_name`.
    pub fn get(&self, file_name: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .rev()
            .find(|(name, _)| name == file_name)
            .map(|(_, bytes)| bytes.as_slice())
    }
}

impl FileSink for MemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExchangeError> {
        validate_file_name(file_name)?;
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

/// Rejects names that are empty, dot entries or contain a path separator.
fn validate_file_name(name: &str) -> Result<(), ExchangeError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        return Err(ExchangeError::InvalidFileName(name.to_string()));
    }
    Ok(())
}
