/// Snapshot diff — classifies paths as new, removed, or modified and rolls
/// the tracked mapping forward one generation.
///
/// The tracked mapping is the only state that survives between scans. After
/// [`apply`] returns it contains exactly the paths in the current snapshot,
/// each with its `current` slot set to this scan's metadata.
use crate::model::{FileRecord, FileStat};
use std::collections::HashMap;
use std::path::PathBuf;

/// The three result sets of one scan, each keyed by path.
#[derive(Debug, Default, Clone)]
pub struct ScanDelta {
    /// Present now, not tracked before.
    pub new: HashMap<PathBuf, FileRecord>,
    /// Tracked before, gone now. Holds the last record seen for the path.
    pub removed: HashMap<PathBuf, FileRecord>,
    /// Present in both generations with a different size or mtime.
    pub modified: HashMap<PathBuf, FileRecord>,
}

impl ScanDelta {
    /// Identity changes only: additions plus removals.
    pub fn changed_count(&self) -> usize {
        self.new.len() + self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Diff `curset` against `tracked`, updating `tracked` in place.
pub fn apply(
    tracked: &mut HashMap<PathBuf, FileRecord>,
    mut curset: HashMap<PathBuf, FileStat>,
) -> ScanDelta {
    let mut delta = ScanDelta::default();

    // Evict first so the insert pass below only sees surviving paths.
    tracked.retain(|path, record| {
        if curset.contains_key(path) {
            true
        } else {
            delta.removed.insert(path.clone(), *record);
            false
        }
    });

    for (path, stat) in curset.drain() {
        match tracked.get_mut(&path) {
            Some(record) => {
                if record.advance(stat) {
                    delta.modified.insert(path, *record);
                }
            }
            None => {
                let record = FileRecord::first_seen(stat);
                tracked.insert(path.clone(), record);
                delta.new.insert(path, record);
            }
        }
    }

    delta
}
