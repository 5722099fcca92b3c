//! Victim selection for capacity-bounded eviction

use crate::types::EntryInfo;

/// Whether a store holding `count` entries must evict before the next insert
pub fn needs_eviction(count: usize, capacity: usize) -> bool {
    count >= capacity
}

/// Pick the least recently touched entry.
///
/// Ties go to the entry listed first.
pub fn select_victim(entries: &[EntryInfo]) -> Option<&EntryInfo> {
    entries.iter().reduce(|oldest, entry| {
        if entry.modified < oldest.modified {
            entry
        } else {
            oldest
        }
    })
}

/// Order entries oldest first, keeping listing order among equal times
pub fn sort_by_recency(entries: &mut [EntryInfo]) {
    entries.sort_by_key(|e| e.modified);
}
