//! Search root normalization.

use crate::error::{Result, SearchError};
use std::path::{Component, Path, PathBuf};

/// 検索対象のルートディレクトリ集合
///
/// Always non-empty and absolute. Duplicates and roots nested inside another
/// root are dropped; the remaining roots keep the order they were given in.
///
/// Roots must be directories: only matches strictly below a root are kept,
/// so a file passed as a root yields no matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoots {
    roots: Vec<PathBuf>,
}

impl SearchRoots {
    pub fn new<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut candidates = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if path.as_os_str().is_empty() {
                continue;
            }
            if !path.is_absolute() {
                return Err(SearchError::InvalidQuery(format!(
                    "search root must be absolute: {}",
                    path.display()
                )));
            }
            candidates.push(normalize(path));
        }

        if candidates.is_empty() {
            return Err(SearchError::InvalidQuery(
                "at least one search root is required".to_string(),
            ));
        }

        let roots = candidates
            .iter()
            .enumerate()
            .filter(|(i, root)| {
                !candidates.iter().enumerate().any(|(j, other)| {
                    if root.starts_with(other) && *root != other {
                        return true;
                    }
                    // keep only the first copy of a duplicate
                    *root == other && j < *i
                })
            })
            .map(|(_, root)| root.clone())
            .collect();

        Ok(Self { roots })
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.roots.iter()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Longest directory shared by every root.
    ///
    /// Falls back to the first root when the roots share nothing (e.g. two
    /// Windows drives).
    pub fn common_dir(&self) -> PathBuf {
        let mut common: PathBuf = self.roots[0].clone();
        for root in &self.roots[1..] {
            common = common
                .components()
                .zip(root.components())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect();
        }
        if common.as_os_str().is_empty() {
            self.roots[0].clone()
        } else {
            common
        }
    }
}

/// Lexically resolves `.` and `..` and drops trailing separators.
///
/// Tools print matches under the root exactly as it was passed, so a root
/// left with `..` in it would produce paths the parser refuses.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the filesystem root stays at the root
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

impl<'a> IntoIterator for &'a SearchRoots {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_roots_are_rejected() {
        let err = SearchRoots::new(Vec::<PathBuf>::new()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));

        let err = SearchRoots::new([""]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[test]
    fn test_relative_root_is_rejected() {
        let err = SearchRoots::new(["src"]).unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(msg) if msg.contains("absolute")));
    }

    #[cfg(unix)]
    #[test]
    fn test_nested_and_duplicate_roots_collapse() {
        let roots = SearchRoots::new([
            "/work/app/src",
            "/work/app",
            "/work/lib/",
            "/work/lib",
            "/work/application",
        ])
        .unwrap();

        assert_eq!(
            roots.as_slice(),
            &[
                PathBuf::from("/work/app"),
                PathBuf::from("/work/lib"),
                PathBuf::from("/work/application"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_parent_segments_are_resolved() {
        let roots = SearchRoots::new(["/work/app/../app/./src/"]).unwrap();
        assert_eq!(roots.as_slice(), &[PathBuf::from("/work/app/src")]);

        let roots = SearchRoots::new(["/../../work/lib/..", "/work/app/src"]).unwrap();
        assert_eq!(roots.as_slice(), &[PathBuf::from("/work")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_common_dir() {
        let roots = SearchRoots::new(["/work/app/src", "/work/app/tests", "/work/lib"]).unwrap();
        assert_eq!(roots.common_dir(), PathBuf::from("/work"));

        let single = SearchRoots::new(["/work/app/"]).unwrap();
        assert_eq!(single.common_dir(), PathBuf::from("/work/app"));

        let disjoint = SearchRoots::new(["/a", "/b"]).unwrap();
        assert_eq!(disjoint.common_dir(), PathBuf::from("/"));
    }
}
