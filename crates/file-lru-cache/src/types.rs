//! Cache types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata for a stored entry, as read back from the filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    pub id: String,
    pub path: PathBuf,
    pub size: u64,
    /// Last modification time of the entry file, the recency signal
    pub modified: DateTime<Utc>,
}

/// Statistics about the cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub total_size: u64,
    pub hits: u64,
    pub misses: u64,
}

/// Construction parameters for a cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub cache_dir: PathBuf,
    /// Maximum number of entries, must be greater than zero
    pub capacity: usize,
    /// Emit diagnostic events
    pub logging: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./cache/blobs"),
            capacity: 1000,
            logging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.cache_dir, PathBuf::from("./cache/blobs"));
        assert_eq!(config.capacity, 1000);
        assert!(!config.logging);
    }

    #[test]
    fn test_entry_info_serialization() {
        let entry = EntryInfo {
            id: "ab12".to_string(),
            path: PathBuf::from("/cache/ab12"),
            size: 12345,
            modified: Utc::now(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("ab12"));
        assert!(json.contains("12345"));

        let deserialized: EntryInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, entry);
    }
}
