/// Scanner module — the polling tree scanner.
///
/// [`TreeScanner`] owns its configuration and the tracked-file mapping. Each
/// call to [`TreeScanner::scan`] walks every configured directory, builds a
/// fresh snapshot, and diffs it against the previous generation:
///
/// - [`walk`] — breadth-first traversal and mask filtering.
/// - [`diff`] — new / removed / modified classification.
/// - [`filter`] — compiled include and exclude masks.
///
/// Scanning is synchronous and single-threaded. Repeating it on an interval
/// is the caller's job.
pub mod diff;
pub mod filter;
pub mod stats;
pub mod walk;

pub use diff::ScanDelta;
pub use filter::MaskFilter;
pub use stats::ScanStats;

use crate::config::ScannerConfig;
use crate::error::ScanError;
use crate::model::FileRecord;
use crate::platform::{FileSystem, OsFileSystem};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Polling change detector over one or more directory trees.
///
/// `scan` takes `&mut self`; concurrent scans of one instance need external
/// synchronisation.
pub struct TreeScanner<F: FileSystem = OsFileSystem> {
    fs: F,
    directories: BTreeSet<PathBuf>,
    include_masks: Vec<String>,
    exclude_masks: Vec<String>,
    recurse: bool,
    /// Every file seen by the last scan, with its two-generation history.
    tracked: HashMap<PathBuf, FileRecord>,
    delta: ScanDelta,
    last_scan: ScanStats,
}

impl TreeScanner<OsFileSystem> {
    /// Scanner over the real filesystem. Recursion is on and no masks are set.
    pub fn new<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self::with_filesystem(directories, OsFileSystem)
    }

    /// Scanner over the real filesystem, configured from `config`.
    pub fn from_config(config: &ScannerConfig) -> Self {
        let mut scanner = Self::new(&config.directories);
        scanner.set_include_masks(config.include_masks.clone());
        scanner.set_exclude_masks(config.exclude_masks.clone());
        scanner.set_recurse(config.recurse);
        scanner
    }
}

impl<F: FileSystem> TreeScanner<F> {
    /// Scanner over a caller-supplied filesystem.
    pub fn with_filesystem<I, P>(directories: I, fs: F) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut scanner = Self {
            fs,
            directories: BTreeSet::new(),
            include_masks: Vec::new(),
            exclude_masks: Vec::new(),
            recurse: true,
            tracked: HashMap::new(),
            delta: ScanDelta::default(),
            last_scan: ScanStats::default(),
        };
        scanner.set_directories(directories);
        scanner
    }

    // ── Configuration ───────────────────────────────────────────────────

    /// Replace the monitored directories. Paths are made absolute (symlinks
    /// are not resolved) and duplicates collapse.
    pub fn set_directories<I, P>(&mut self, directories: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.directories = directories
            .into_iter()
            .map(|p| absolutize(p.as_ref()))
            .collect();
    }

    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.directories.iter().map(PathBuf::as_path)
    }

    /// Replace the include masks. Patterns are compiled, and therefore
    /// validated, only when [`scan`](Self::scan) runs.
    pub fn set_include_masks<I, S>(&mut self, masks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_masks = masks.into_iter().map(Into::into).collect();
    }

    pub fn include_masks(&self) -> &[String] {
        &self.include_masks
    }

    /// Replace the exclude masks. Exclusion always takes precedence over
    /// inclusion.
    pub fn set_exclude_masks<I, S>(&mut self, masks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_masks = masks.into_iter().map(Into::into).collect();
    }

    pub fn exclude_masks(&self) -> &[String] {
        &self.exclude_masks
    }

    pub fn set_recurse(&mut self, recurse: bool) {
        self.recurse = recurse;
    }

    pub fn recurse(&self) -> bool {
        self.recurse
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ScannerConfig {
        ScannerConfig {
            directories: self.directories.iter().cloned().collect(),
            include_masks: self.include_masks.clone(),
            exclude_masks: self.exclude_masks.clone(),
            recurse: self.recurse,
        }
    }

    // ── Scanning ────────────────────────────────────────────────────────

    /// Walk every monitored directory and diff against the previous scan.
    ///
    /// Returns the number of paths added plus removed; modifications are
    /// reported through [`modified_files`](Self::modified_files) but not
    /// counted. Unreadable directories are skipped. An invalid mask fails
    /// the scan before anything is walked, leaving all state untouched.
    pub fn scan(&mut self) -> Result<usize, ScanError> {
        let start = Instant::now();
        let filter = MaskFilter::compile(&self.include_masks, &self.exclude_masks)?;

        let walked = walk::walk(&self.fs, &self.directories, self.recurse, &filter);
        let files_matched = walked.snapshot.len() as u64;
        let delta = diff::apply(&mut self.tracked, walked.snapshot);
        let changed = delta.changed_count();

        self.last_scan = ScanStats {
            dirs_visited: walked.dirs_visited,
            unreadable_dirs: walked.unreadable_dirs,
            entries_seen: walked.entries_seen,
            files_matched,
            new: delta.new.len() as u64,
            removed: delta.removed.len() as u64,
            modified: delta.modified.len() as u64,
            duration: start.elapsed(),
        };
        self.delta = delta;

        debug!(
            "Scan complete: {} files tracked ({} new, {} removed, {} modified), \
             {} dirs ({} unreadable) in {:?}",
            self.tracked.len(),
            self.last_scan.new,
            self.last_scan.removed,
            self.last_scan.modified,
            self.last_scan.dirs_visited,
            self.last_scan.unreadable_dirs,
            self.last_scan.duration
        );

        Ok(changed)
    }

    // ── Results ─────────────────────────────────────────────────────────

    /// Every tracked path, sorted.
    pub fn files(&self) -> Vec<&Path> {
        sorted_keys(&self.tracked)
    }

    pub fn files_map(&self) -> &HashMap<PathBuf, FileRecord> {
        &self.tracked
    }

    /// Paths that appeared in the last scan, sorted.
    pub fn new_files(&self) -> Vec<&Path> {
        sorted_keys(&self.delta.new)
    }

    pub fn new_files_map(&self) -> &HashMap<PathBuf, FileRecord> {
        &self.delta.new
    }

    /// Paths that disappeared in the last scan, sorted. They are no longer
    /// tracked.
    pub fn removed_files(&self) -> Vec<&Path> {
        sorted_keys(&self.delta.removed)
    }

    pub fn removed_files_map(&self) -> &HashMap<PathBuf, FileRecord> {
        &self.delta.removed
    }

    /// Paths whose size or mtime changed in the last scan, sorted.
    pub fn modified_files(&self) -> Vec<&Path> {
        sorted_keys(&self.delta.modified)
    }

    pub fn modified_files_map(&self) -> &HashMap<PathBuf, FileRecord> {
        &self.delta.modified
    }

    /// The full result of the last scan.
    pub fn delta(&self) -> &ScanDelta {
        &self.delta
    }

    /// Two-generation history of a tracked path, or `None` if the path is
    /// not tracked.
    pub fn stats(&self, path: impl AsRef<Path>) -> Option<&FileRecord> {
        self.tracked.get(&absolutize(path.as_ref()))
    }

    pub fn last_scan(&self) -> &ScanStats {
        &self.last_scan
    }
}

fn sorted_keys(map: &HashMap<PathBuf, FileRecord>) -> Vec<&Path> {
    let mut keys: Vec<&Path> = map.keys().map(PathBuf::as_path).collect();
    keys.sort_unstable();
    keys
}

/// Make `path` absolute against the working directory without touching the
/// filesystem. Falls back to the path as given if the working directory is
/// unavailable.
fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::walk::tests::MemFs;
    use super::*;

    fn tree() -> MemFs {
        let mut fs = MemFs::default();
        fs.dir("/w")
            .file("/w/keep.txt", 10, 100)
            .file("/w/build.log", 20, 100)
            .dir("/w/sub")
            .file("/w/sub/nested.txt", 30, 100);
        fs
    }

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    fn owned(list: Vec<&Path>) -> Vec<PathBuf> {
        list.into_iter().map(Path::to_path_buf).collect()
    }

    #[test]
    fn first_scan_counts_every_file_as_new() {
        let mut scanner = TreeScanner::with_filesystem(["/w"], tree());
        assert_eq!(scanner.scan().unwrap(), 3);
        assert_eq!(
            owned(scanner.new_files()),
            paths(&["/w/build.log", "/w/keep.txt", "/w/sub/nested.txt"])
        );
        assert_eq!(scanner.files(), scanner.new_files());
        assert_eq!(scanner.last_scan().files_matched, 3);
    }

    #[test]
    fn second_scan_without_changes_is_empty() {
        let mut scanner = TreeScanner::with_filesystem(["/w"], tree());
        scanner.scan().unwrap();
        assert_eq!(scanner.scan().unwrap(), 0);
        assert!(scanner.new_files().is_empty());
        assert!(scanner.removed_files().is_empty());
        assert!(scanner.modified_files().is_empty());
        assert_eq!(scanner.files().len(), 3);
    }

    #[test]
    fn setters_replace_rather_than_append() {
        let mut scanner = TreeScanner::with_filesystem(["/w", "/w", "/x"], tree());
        assert_eq!(scanner.directories().count(), 2);

        scanner.set_directories(["/y"]);
        assert_eq!(
            scanner.directories().collect::<Vec<_>>(),
            vec![Path::new("/y")]
        );

        scanner.set_include_masks(["a", "b"]);
        scanner.set_include_masks(["c"]);
        assert_eq!(scanner.include_masks(), ["c".to_string()]);

        scanner.set_exclude_masks(vec![String::from("d")]);
        assert_eq!(scanner.exclude_masks(), ["d".to_string()]);

        assert!(scanner.recurse());
        scanner.set_recurse(false);
        assert!(!scanner.recurse());
    }

    #[test]
    fn masks_and_recursion_shape_the_tracked_set() {
        let mut scanner = TreeScanner::with_filesystem(["/w"], tree());
        scanner.set_include_masks([r"\.(txt|log)$"]);
        scanner.set_exclude_masks([r"\.log$"]);
        scanner.set_recurse(false);

        assert_eq!(scanner.scan().unwrap(), 1);
        assert_eq!(owned(scanner.files()), paths(&["/w/keep.txt"]));
    }

    #[test]
    fn narrowing_masks_reports_removals() {
        let mut scanner = TreeScanner::with_filesystem(["/w"], tree());
        scanner.scan().unwrap();

        scanner.set_exclude_masks(["^build"]);
        assert_eq!(scanner.scan().unwrap(), 1);
        assert_eq!(owned(scanner.removed_files()), paths(&["/w/build.log"]));
        assert!(scanner.stats("/w/build.log").is_none());
    }

    #[test]
    fn invalid_mask_fails_without_touching_state() {
        let mut scanner = TreeScanner::with_filesystem(["/w"], tree());
        scanner.scan().unwrap();
        let before = scanner.files_map().clone();

        scanner.set_include_masks(["[unterminated"]);
        let err = scanner.scan().unwrap_err();
        assert!(matches!(err, ScanError::InvalidMask { ref pattern, .. } if pattern == "[unterminated"));

        assert_eq!(scanner.files_map(), &before);
        assert_eq!(scanner.new_files().len(), 3, "previous results are kept");
    }

    #[test]
    fn stats_exposes_history() {
        let mut scanner = TreeScanner::with_filesystem(["/w"], tree());
        scanner.scan().unwrap();

        let record = scanner.stats("/w/keep.txt").unwrap();
        assert_eq!(record.current.size, 10);
        assert!(record.previous.is_zero());
        assert!(scanner.stats("/w/nope.txt").is_none());
    }

    #[test]
    fn config_round_trips_through_scanner() {
        let mut scanner = TreeScanner::with_filesystem(["/w"], tree());
        scanner.set_include_masks([r"\.txt$"]);
        scanner.set_recurse(false);

        let config = scanner.config();
        assert_eq!(config.directories, paths(&["/w"]));
        assert_eq!(config.include_masks, vec![r"\.txt$".to_string()]);
        assert!(config.exclude_masks.is_empty());
        assert!(!config.recurse);
    }

    #[test]
    fn modified_paths_resolve_through_stats() {
        let mut scanner = TreeScanner::with_filesystem(["/w"], tree());
        scanner.scan().unwrap();

        scanner.fs.files.get_mut(Path::new("/w/keep.txt")).unwrap().modified = 200;
        scanner.fs.files.get_mut(Path::new("/w/sub/nested.txt")).unwrap().size = 31;

        assert_eq!(scanner.scan().unwrap(), 0);
        let modified = scanner.modified_files();
        assert_eq!(owned(modified.clone()), paths(&["/w/keep.txt", "/w/sub/nested.txt"]));
        for path in modified {
            let record = scanner.stats(path).expect("modified path must be tracked");
            assert_eq!(record, &scanner.modified_files_map()[path]);
            assert!(record.is_modified());
        }
    }
}
