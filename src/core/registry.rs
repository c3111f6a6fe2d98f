//! Candidate file registry
//!
//! Owns the deduplicated, ordered set of subtitle files the user has
//! gathered for conversion. Entries are keyed by canonical path and carry
//! an insertion-order number that is never reassigned or reused, so every
//! downstream consumer (sorting, conversion snapshots) has a stable
//! tiebreaker.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// One candidate subtitle file in the registry
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Canonical absolute path (the uniqueness key)
    pub path: PathBuf,
    /// The directory the file was discovered under.
    ///
    /// Usually the file's parent directory, but collaborators that expand a
    /// search root may record a coarser directory here. Merge-by-folder
    /// grouping uses this value.
    pub folder: PathBuf,
    /// Insertion-order number, assigned once at insertion
    pub order: u64,
    /// Whether the file is checked for conversion
    pub selected: bool,
}

/// Deduplicated, insertion-ordered set of candidate files
///
/// Iteration order of [`FileRegistry::all`] is registry insertion order.
/// This is an explicit property of the type, not an accident: conversion
/// snapshots are built from it.
#[derive(Debug, Default)]
pub struct FileRegistry {
    entries: Vec<FileEntry>,
    known: HashSet<PathBuf>,
    next_order: u64,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the registry.
    ///
    /// The path is canonicalized first; re-adding an already known path is a
    /// no-op and returns false. New entries start selected. When `folder` is
    /// None, the file's parent directory is recorded.
    pub fn add(&mut self, path: &Path, folder: Option<&Path>) -> bool {
        let canonical = canonical_path(path);
        if self.known.contains(&canonical) {
            return false;
        }

        let folder = folder
            .map(|f| f.to_path_buf())
            .unwrap_or_else(|| parent_directory(&canonical));

        log::debug!("Registry add #{}: {}", self.next_order, canonical.display());

        self.known.insert(canonical.clone());
        self.entries.push(FileEntry {
            path: canonical,
            folder,
            order: self.next_order,
            selected: true,
        });
        self.next_order += 1;
        true
    }

    /// Remove the given paths from the registry. Unknown paths are ignored.
    pub fn remove(&mut self, paths: &[PathBuf]) {
        let doomed: HashSet<PathBuf> = paths.iter().map(|p| canonical_path(p)).collect();
        self.entries.retain(|e| !doomed.contains(&e.path));
        for path in &doomed {
            self.known.remove(path);
        }
    }

    /// Remove every entry.
    ///
    /// The order counter is NOT reset: adds after a clear continue from the
    /// last issued value, so order numbers are never reused.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.known.clear();
    }

    /// All entries, in insertion order.
    pub fn all(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set the selected flag for one entry. Returns false if the path is
    /// not in the registry.
    pub fn set_selected(&mut self, path: &Path, selected: bool) -> bool {
        let canonical = canonical_path(path);
        match self.entries.iter_mut().find(|e| e.path == canonical) {
            Some(entry) => {
                entry.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Select every entry flagged visible in `visible` (parallel to `all()`).
    /// Hidden entries keep their selection.
    pub fn select_visible(&mut self, visible: &[bool]) {
        for (entry, vis) in self.entries.iter_mut().zip(visible) {
            if *vis {
                entry.selected = true;
            }
        }
    }

    /// Deselect every visible entry, leaving hidden entries untouched.
    pub fn deselect_visible(&mut self, visible: &[bool]) {
        for (entry, vis) in self.entries.iter_mut().zip(visible) {
            if *vis {
                entry.selected = false;
            }
        }
    }

    /// Invert the selection of every visible entry.
    pub fn invert_visible(&mut self, visible: &[bool]) {
        for (entry, vis) in self.entries.iter_mut().zip(visible) {
            if *vis {
                entry.selected = !entry.selected;
            }
        }
    }
}

/// Canonicalize a path for use as a registry key.
///
/// Uses `fs::canonicalize` when the file exists (resolving symlinks); for
/// paths that do not exist yet, falls back to a lexical normalization of
/// the absolute form so that tests and dry runs still get stable keys.
pub fn canonical_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    // Lexical cleanup: drop `.` and fold `..` where possible
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Parent directory of a path, or the path itself when it has none.
fn parent_directory(path: &Path) -> PathBuf {
    path.parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| path.to_path_buf())
}
