//! JSON persistence for arrangement documents.

use crate::model::Arrangement;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    /// The file could not be opened, read, or written.
    Io(std::io::Error),
    /// The text is not valid JSON.
    Parse(serde_json::Error),
    /// Valid JSON that does not describe an arrangement (wrong shape, missing `name`, ...).
    Structure(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "file error: {err}"),
            Self::Parse(err) => write!(f, "not valid JSON: {err}"),
            Self::Structure(err) => write!(f, "not an arrangement document: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) | Self::Structure(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => Self::Io(std::io::Error::other(err)),
            serde_json::error::Category::Data => Self::Structure(err),
            serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
                Self::Parse(err)
            }
        }
    }
}

/// Serializes a document as pretty-printed JSON.
///
/// Fails with [`StorageError::Structure`] when a coordinate is not drawable, so nothing is
/// written that could not be loaded back.
pub fn to_json_string(document: &Arrangement) -> StorageResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parses a document from JSON text. Coordinates outside the drawable range are rejected
/// as a structure error.
pub fn from_json_str(text: &str) -> StorageResult<Arrangement> {
    Ok(serde_json::from_str(text)?)
}

/// Writes `document` to `path`, replacing any existing file.
pub fn save_arrangement(document: &Arrangement, path: &Path) -> StorageResult<()> {
    let mut text = to_json_string(document)?;
    text.push('\n');
    fs::write(path, text)?;
    log::info!(
        "Saved {} categories to {}",
        document.len(),
        path.display()
    );
    Ok(())
}

/// Reads a document from `path`.
pub fn load_arrangement(path: &Path) -> StorageResult<Arrangement> {
    let text = fs::read_to_string(path)?;
    let document = from_json_str(&text)?;
    log::info!(
        "Loaded {} categories from {}",
        document.len(),
        path.display()
    );
    Ok(document)
}
