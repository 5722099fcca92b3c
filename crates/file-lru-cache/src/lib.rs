//! Disk-backed byte cache with a bounded entry count and LRU eviction
//!
//! Payloads are stored verbatim, one file per entry, named by the hex SHA-256
//! of the key. The filesystem is the only index: the modification time of an
//! entry file is its recency, refreshed on every hit, and a write into a full
//! cache first removes the entry with the oldest modification time.
//!
//! # Example
//!
//! ```no_run
//! use file_lru_cache::Cache;
//!
//! # fn example() -> Result<(), file_lru_cache::CacheError> {
//! let cache = Cache::new("./cache/blobs", 1000)?;
//! cache.set("greeting", b"hello")?;
//!
//! match cache.get_vec("greeting") {
//!     Ok(data) => println!("{}", String::from_utf8_lossy(&data)),
//!     Err(e) if e.is_not_found() => println!("miss"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod error;
mod eviction;
mod hasher;
mod store;
mod types;

pub use cache::Cache;
pub use error::{CacheError, Result};
pub use eviction::sort_by_recency;
pub use hasher::{identifier, IDENTIFIER_LEN};
pub use types::{CacheConfig, CacheStats, EntryInfo};
