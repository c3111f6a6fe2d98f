//! Core file management
//!
//! This module contains:
//! - The registry of candidate subtitle files (stable identity and order)
//! - The sort/filter view computed over the registry
//! - Subtitle file discovery (directory walks, pasted paths)
//! - Persisted user preferences

mod registry;
mod scanning;
mod settings;
mod view;

pub use registry::{FileEntry, FileRegistry, canonical_path};
pub use scanning::{
    DiscoveredFile, collect_subtitle_paths, find_subtitle_files, is_subtitle_file,
    parse_pasted_paths,
};
pub use settings::AppSettings;
pub use view::{
    FilterOutcome, OrderAxis, SearchMode, SelectionAxis, SortConfig, SortOption, apply_filter,
    display_order, display_text,
};
