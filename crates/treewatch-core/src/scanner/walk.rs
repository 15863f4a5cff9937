/// Tree traversal — builds the current-generation snapshot.
///
/// Directories are visited breadth-first from a FIFO queue: every entry of a
/// directory is handled before any of its subdirectories is opened. The
/// order in which a single listing yields its entries is whatever the
/// [`FileSystem`] returns and is not relied upon.
///
/// Symbolic links are followed. Each directory is listed at most once per
/// walk, identified by `(device, inode)` where the platform reports one, so
/// link cycles and roots that name the same directory twice terminate.
/// Only regular files are tracked; sockets, FIFOs, devices and dangling
/// links are skipped.
///
/// A directory that cannot be listed contributes nothing and the walk moves
/// on. The failure is logged and counted, never returned.
use super::filter::MaskFilter;
use crate::model::FileStat;
use crate::platform::FileSystem;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Everything one walk produced.
#[derive(Debug, Default)]
pub struct WalkOutput {
    /// Accepted regular files keyed by full path.
    pub snapshot: HashMap<PathBuf, FileStat>,
    /// Directories successfully listed, roots included.
    pub dirs_visited: u64,
    /// Directories (roots included) that could not be listed.
    pub unreadable_dirs: u64,
    /// Entries returned by all listings, before any filtering.
    pub entries_seen: u64,
}

/// Identity of a directory for the visited set.
#[derive(Debug, Hash, PartialEq, Eq)]
enum DirKey {
    Inode { device: u64, inode: u64 },
    /// Platforms without inode numbers fall back to the path as reached.
    Path(PathBuf),
}

impl DirKey {
    fn new(path: &Path, stat: Option<&FileStat>) -> Self {
        match stat {
            Some(stat) if stat.inode != 0 => DirKey::Inode {
                device: stat.device,
                inode: stat.inode,
            },
            _ => DirKey::Path(path.to_path_buf()),
        }
    }
}

/// Walk every root and collect the regular files accepted by `filter`.
///
/// A directory reachable from several roots, or through a link, is listed
/// once, under the first path that reached it.
pub fn walk<'a, F, I>(fs: &F, roots: I, recurse: bool, filter: &MaskFilter) -> WalkOutput
where
    F: FileSystem + ?Sized,
    I: IntoIterator<Item = &'a PathBuf>,
{
    let mut out = WalkOutput::default();
    let mut visited: HashSet<DirKey> = HashSet::new();

    for root in roots {
        let root_key = DirKey::new(root, fs.metadata(root).ok().as_ref());
        let mut queue: VecDeque<(PathBuf, DirKey)> = VecDeque::new();
        queue.push_back((root.clone(), root_key));

        while let Some((dir, key)) = queue.pop_front() {
            if visited.contains(&key) {
                trace!("Already listed {}", dir.display());
                continue;
            }
            let is_root = dir == *root;
            let entries = match fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    out.unreadable_dirs += 1;
                    if is_root {
                        warn!("Cannot read monitored directory {}: {err}", dir.display());
                    } else {
                        debug!("Skipping unreadable directory {}: {err}", dir.display());
                    }
                    continue;
                }
            };
            visited.insert(key);
            out.dirs_visited += 1;

            for path in entries {
                out.entries_seen += 1;
                visit_entry(fs, path, recurse, filter, &mut queue, &mut out.snapshot);
            }
        }
    }

    out
}

fn visit_entry<F: FileSystem + ?Sized>(
    fs: &F,
    path: PathBuf,
    recurse: bool,
    filter: &MaskFilter,
    queue: &mut VecDeque<(PathBuf, DirKey)>,
    snapshot: &mut HashMap<PathBuf, FileStat>,
) {
    let stat = match fs.metadata(&path) {
        Ok(stat) => stat,
        Err(err) => {
            // Usually a file deleted between listing and stat.
            debug!("Skipping {}: {err}", path.display());
            return;
        }
    };

    if stat.is_dir {
        if recurse {
            let key = DirKey::new(&path, Some(&stat));
            queue.push_back((path, key));
        }
        return;
    }

    if !stat.is_file {
        trace!("Skipping non-regular entry {}", path.display());
        return;
    }

    if filter.accepts_path(&path) {
        snapshot.insert(path, stat);
    }
}
