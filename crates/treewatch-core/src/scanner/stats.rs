/// Per-scan counters, kept on the scanner after every successful `scan`.
use std::time::Duration;

/// Summary of the most recent scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Directories listed, roots included.
    pub dirs_visited: u64,
    /// Directories that could not be listed (permissions, deleted, missing root).
    pub unreadable_dirs: u64,
    /// Directory entries returned by all listings, before filtering.
    pub entries_seen: u64,
    /// Entries that passed the masks and are now tracked.
    pub files_matched: u64,
    pub new: u64,
    pub removed: u64,
    pub modified: u64,
    /// Wall-clock time spent walking and diffing.
    pub duration: Duration,
}
