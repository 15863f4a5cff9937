/// Per-file metadata snapshots and the two-generation history kept for
/// every tracked path.
///
/// A `FileStat` is what one scan observed for one entry. A `FileRecord`
/// holds the latest two observations so the diff pass can tell whether a
/// file changed between consecutive scans without keeping anything older.
use std::fs::Metadata;
use std::time::{SystemTime, UNIX_EPOCH};

/// Metadata captured for one directory entry during a scan.
///
/// Only `size` and `modified` take part in change detection (see
/// [`FileStat::same_stamp`]). The remaining fields are the raw values the
/// platform reported and are carried along for callers that want them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FileStat {
    /// Logical file size in bytes.
    pub size: u64,
    /// Last modification time, nanoseconds since the Unix epoch.
    /// Negative for timestamps before 1970; zero when unavailable.
    pub modified: i64,
    /// Raw permission / file-type bits (`st_mode`). Zero where unsupported.
    pub mode: u32,
    /// Inode number. Zero where unsupported.
    pub inode: u64,
    /// Device id of the containing filesystem. Zero where unsupported.
    pub device: u64,
    /// Type bit: `true` for directories. Used only to steer traversal.
    pub is_dir: bool,
    /// Type bit: `true` for regular files, the only entries that are tracked.
    pub is_file: bool,
}

impl FileStat {
    /// The zero-valued sentinel stored as the previous generation of a file
    /// first seen in the current scan.
    pub const ZERO: FileStat = FileStat {
        size: 0,
        modified: 0,
        mode: 0,
        inode: 0,
        device: 0,
        is_dir: false,
        is_file: false,
    };

    /// Build a snapshot from `std::fs` metadata.
    pub fn from_metadata(meta: &Metadata) -> Self {
        let (mode, inode, device) = raw_fields(meta);
        Self {
            size: meta.len(),
            modified: meta.modified().map(system_time_to_nanos).unwrap_or(0),
            mode,
            inode,
            device,
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
        }
    }

    /// Modification-detection equality: size and modification time match
    /// exactly. Every other field is ignored.
    ///
    /// Content edits that preserve both values go undetected.
    #[inline]
    pub fn same_stamp(&self, other: &FileStat) -> bool {
        self.size == other.size && self.modified == other.modified
    }

    /// Whether this is the "not seen before" sentinel.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Convert a `SystemTime` into signed nanoseconds relative to the epoch.
///
/// Saturates at the `i64` range (roughly years 1677..2262).
pub fn system_time_to_nanos(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_nanos()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_nanos())
            .map(|n| -n)
            .unwrap_or(i64::MIN),
    }
}

#[cfg(unix)]
fn raw_fields(meta: &Metadata) -> (u32, u64, u64) {
    use std::os::unix::fs::MetadataExt;
    (meta.mode(), meta.ino(), meta.dev())
}

#[cfg(not(unix))]
fn raw_fields(meta: &Metadata) -> (u32, u64, u64) {
    // Read-only is the only permission bit std exposes portably.
    let mode = if meta.permissions().readonly() { 0o444 } else { 0o644 };
    (mode, 0, 0)
}

/// Two-generation metadata history for one tracked path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileRecord {
    /// Metadata from the most recent scan (slot 0).
    pub current: FileStat,
    /// Metadata from the scan before that (slot 1), or [`FileStat::ZERO`]
    /// if the path first appeared in the most recent scan.
    pub previous: FileStat,
}

impl FileRecord {
    /// Record for a path first seen in this scan.
    pub fn first_seen(stat: FileStat) -> Self {
        Self {
            current: stat,
            previous: FileStat::ZERO,
        }
    }

    /// Rotate the history: the current slot moves to `previous` and `stat`
    /// becomes `current`. Returns `true` when the two generations differ.
    pub fn advance(&mut self, stat: FileStat) -> bool {
        self.previous = self.current;
        self.current = stat;
        self.is_modified()
    }

    /// Whether the two retained generations differ in size or mtime.
    pub fn is_modified(&self) -> bool {
        !self.current.same_stamp(&self.previous)
    }

    /// Both slots, most recent first.
    pub fn history(&self) -> [FileStat; 2] {
        [self.current, self.previous]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn stat(size: u64, modified: i64) -> FileStat {
        FileStat {
            size,
            modified,
            ..FileStat::ZERO
        }
    }

    #[test]
    fn same_stamp_ignores_raw_fields() {
        let a = FileStat {
            mode: 0o100644,
            inode: 10,
            device: 1,
            ..stat(5, 100)
        };
        let b = FileStat {
            mode: 0o100600,
            inode: 99,
            device: 2,
            ..stat(5, 100)
        };
        assert!(a.same_stamp(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn same_stamp_detects_size_or_mtime_change() {
        assert!(!stat(5, 100).same_stamp(&stat(6, 100)));
        assert!(!stat(5, 100).same_stamp(&stat(5, 101)));
    }

    #[test]
    fn first_seen_has_zero_previous() {
        let rec = FileRecord::first_seen(stat(42, 7));
        assert_eq!(rec.current.size, 42);
        assert!(rec.previous.is_zero());
        assert_eq!(rec.history(), [stat(42, 7), FileStat::ZERO]);
    }

    #[test]
    fn advance_rotates_and_reports_change() {
        let mut rec = FileRecord::first_seen(stat(1, 1));

        assert!(!rec.advance(stat(1, 1)), "identical stamp is not a change");
        assert_eq!(rec.previous, stat(1, 1));

        assert!(rec.advance(stat(2, 1)));
        assert_eq!(rec.history(), [stat(2, 1), stat(1, 1)]);

        // Only two generations are kept.
        assert!(!rec.advance(stat(2, 1)));
        assert_eq!(rec.history(), [stat(2, 1), stat(2, 1)]);
    }

    #[test]
    fn nanos_conversion_handles_both_sides_of_epoch() {
        assert_eq!(system_time_to_nanos(UNIX_EPOCH), 0);
        assert_eq!(
            system_time_to_nanos(UNIX_EPOCH + Duration::from_secs(2)),
            2_000_000_000
        );
        assert_eq!(
            system_time_to_nanos(UNIX_EPOCH - Duration::from_millis(1)),
            -1_000_000
        );
    }
}
