//! Sort and filter view over the file registry
//!
//! Pure computation: given the registry entries plus the current sort
//! configuration and search text, produces a display order and a
//! visibility mask. Nothing here mutates the registry.
//!
//! The sort configuration is two small axes instead of five mutually
//! exclusive checkboxes: an ordering axis (original / name ascending /
//! name descending) and a selection axis (none / selected first /
//! unselected first). Toggling reconciles the axes deterministically and
//! never leaves the view without an effective ordering.

use std::path::Path;

use regex::RegexBuilder;

use super::registry::FileEntry;

/// How entries are ordered within a selection partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderAxis {
    /// Registry insertion order
    #[default]
    Original,
    /// Case-insensitive name, ascending
    NameAsc,
    /// Case-insensitive name, descending
    NameDesc,
}

/// Whether selected or unselected entries are grouped first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionAxis {
    #[default]
    None,
    SelectedFirst,
    UnselectedFirst,
}

/// One of the user-facing sort checkboxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    Original,
    NameAsc,
    NameDesc,
    SelectedFirst,
    UnselectedFirst,
}

/// Effective sort mode, reconciled from user toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortConfig {
    pub order: OrderAxis,
    pub selection: SelectionAxis,
}

impl SortConfig {
    /// Toggle one sort option on or off and reconcile the axes.
    ///
    /// Turning an option on clears its rival on the same axis; turning
    /// Original on clears the selection axis as well. Turning the active
    /// ordering option off falls back to Original, so exactly one ordering
    /// option is always in effect.
    pub fn toggle(&mut self, option: SortOption) {
        match option {
            SortOption::Original => {
                self.order = OrderAxis::Original;
                self.selection = SelectionAxis::None;
            }
            SortOption::NameAsc => {
                self.order = if self.order == OrderAxis::NameAsc {
                    OrderAxis::Original
                } else {
                    OrderAxis::NameAsc
                };
            }
            SortOption::NameDesc => {
                self.order = if self.order == OrderAxis::NameDesc {
                    OrderAxis::Original
                } else {
                    OrderAxis::NameDesc
                };
            }
            SortOption::SelectedFirst => {
                self.selection = if self.selection == SelectionAxis::SelectedFirst {
                    SelectionAxis::None
                } else {
                    SelectionAxis::SelectedFirst
                };
            }
            SortOption::UnselectedFirst => {
                self.selection = if self.selection == SelectionAxis::UnselectedFirst {
                    SelectionAxis::None
                } else {
                    SelectionAxis::UnselectedFirst
                };
            }
        }
    }
}

/// Search interpretation for the filter box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Case-insensitive substring containment
    #[default]
    Plain,
    /// Case-insensitive regular expression, partial match
    Regex,
}

/// Result of applying a search filter to the registry
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Visibility mask, parallel to the registry's `all()` order
    pub visible: Vec<bool>,
    /// Set when the search pattern was invalid; the mask then shows all
    pub error: Option<String>,
}

impl FilterOutcome {
    pub fn matched_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }
}

/// The text an entry is displayed, searched, and name-sorted by.
pub fn display_text(entry: &FileEntry, show_full_path: bool) -> String {
    if show_full_path {
        entry.path.display().to_string()
    } else {
        basename(&entry.path)
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Compute the display order as indices into `entries`.
///
/// Two-level sort: partition by selection when the selection axis is
/// active, then order each partition by the ordering axis. Insertion
/// order is always the final tiebreak, in both name directions.
pub fn display_order(entries: &[FileEntry], config: SortConfig, show_full_path: bool) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..entries.len()).collect();

    indices.sort_by(|&a, &b| {
        let ea = &entries[a];
        let eb = &entries[b];

        let partition = match config.selection {
            SelectionAxis::None => std::cmp::Ordering::Equal,
            SelectionAxis::SelectedFirst => eb.selected.cmp(&ea.selected),
            SelectionAxis::UnselectedFirst => ea.selected.cmp(&eb.selected),
        };
        if partition != std::cmp::Ordering::Equal {
            return partition;
        }

        let by_name = match config.order {
            OrderAxis::Original => std::cmp::Ordering::Equal,
            OrderAxis::NameAsc => sort_key(ea, show_full_path).cmp(&sort_key(eb, show_full_path)),
            OrderAxis::NameDesc => sort_key(eb, show_full_path).cmp(&sort_key(ea, show_full_path)),
        };

        by_name.then(ea.order.cmp(&eb.order))
    });

    indices
}

fn sort_key(entry: &FileEntry, show_full_path: bool) -> String {
    display_text(entry, show_full_path).to_lowercase()
}

/// Compute the visibility mask for the current search.
///
/// An empty search shows everything. An invalid regular expression is
/// recoverable: the mask reverts to all-visible and `error` carries the
/// compile failure for the caller to surface.
pub fn apply_filter(
    entries: &[FileEntry],
    search: &str,
    mode: SearchMode,
    show_full_path: bool,
) -> FilterOutcome {
    let search = search.trim();
    if search.is_empty() {
        return FilterOutcome {
            visible: vec![true; entries.len()],
            error: None,
        };
    }

    match mode {
        SearchMode::Plain => {
            let needle = search.to_lowercase();
            let visible = entries
                .iter()
                .map(|e| display_text(e, show_full_path).to_lowercase().contains(&needle))
                .collect();
            FilterOutcome { visible, error: None }
        }
        SearchMode::Regex => match RegexBuilder::new(search).case_insensitive(true).build() {
            Ok(pattern) => {
                let visible = entries
                    .iter()
                    .map(|e| pattern.is_match(&display_text(e, show_full_path)))
                    .collect();
                FilterOutcome { visible, error: None }
            }
            Err(e) => {
                log::warn!("Invalid search pattern '{}': {}", search, e);
                FilterOutcome {
                    visible: vec![true; entries.len()],
                    error: Some(format!("Invalid search pattern: {}", e)),
                }
            }
        },
    }
}
