//! Error types for the file LRU cache

use std::fmt;
use std::io;

/// Errors that can occur when operating on the cache
#[derive(Debug)]
pub enum CacheError {
    /// Invalid construction parameters
    Config(String),
    /// Underlying filesystem failure
    Io(Box<io::Error>),
    /// The requested entry does not exist in the store
    NotFound,
}

impl CacheError {
    /// True for a cache miss (never stored, removed, or evicted)
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound)
    }

    /// Classify an I/O error from a lookup of a single entry, where a missing
    /// file means a missing entry.
    pub(crate) fn from_lookup(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            CacheError::NotFound
        } else {
            CacheError::Io(Box::new(err))
        }
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CacheError::Io(err) => write!(f, "IO error: {}", err),
            CacheError::NotFound => write!(f, "Cache entry not found"),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for CacheError {
    fn from(err: io::Error) -> Self {
        CacheError::Io(Box::new(err))
    }
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
