/// Include / exclude mask filtering on file names.
///
/// Masks are regular expressions searched (not anchored) against the final
/// path component. Exclusion is evaluated first and always wins: a name that
/// matches an exclude mask is rejected even if it also matches an include
/// mask.
use crate::error::ScanError;
use regex::Regex;
use std::path::Path;

/// Compiled mask lists for one scan.
#[derive(Debug, Default)]
pub struct MaskFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl MaskFilter {
    /// Compile both mask lists. The first invalid pattern aborts compilation.
    pub fn compile(include: &[String], exclude: &[String]) -> Result<Self, ScanError> {
        Ok(Self {
            include: compile_all(include)?,
            exclude: compile_all(exclude)?,
        })
    }

    /// Whether an entry with this file name should be tracked.
    pub fn accepts(&self, name: &str) -> bool {
        !self.is_excluded(name) && self.is_included(name)
    }

    /// Convenience wrapper over [`accepts`](Self::accepts) for a full path.
    /// Paths without a final component (e.g. `/`) are never accepted.
    pub fn accepts_path(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => self.accepts(&name.to_string_lossy()),
            None => false,
        }
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(name))
    }

    fn is_included(&self, name: &str) -> bool {
        self.include.is_empty() || self.include.iter().any(|re| re.is_match(name))
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, ScanError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| ScanError::InvalidMask {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}
