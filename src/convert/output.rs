//! Output path composition
//!
//! Naming rules for the three conversion modes, plus filename sanitizing
//! for composed names that embed a directory path.

use std::path::{Path, PathBuf};

use super::{HeaderStyle, OutputLocation};

/// Replace filesystem-invalid characters with underscores
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

/// Basename without the subtitle extension
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Output path for one file in Separate mode.
///
/// Alongside the source, the extension is simply replaced with `.txt`.
/// In a shared folder, the parent directory is folded into the filename
/// (`name(parent).txt`, sanitized) so files from different directories
/// cannot collide on basename alone.
pub fn separate_output_path(source: &Path, location: &OutputLocation) -> PathBuf {
    match location {
        OutputLocation::Alongside => source.with_extension("txt"),
        OutputLocation::SharedFolder(dir) => {
            let parent = source
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            let name = sanitize_filename(&format!("{}({})", file_stem(source), parent));
            dir.join(format!("{}.txt", name))
        }
    }
}

/// Output path for one folder group in MergeByFolder mode.
///
/// `summary.txt` inside the group's folder by default, or
/// `summary(folder).txt` (sanitized) in the shared folder.
pub fn group_output_path(folder: &Path, location: &OutputLocation) -> PathBuf {
    match location {
        OutputLocation::Alongside => folder.join("summary.txt"),
        OutputLocation::SharedFolder(dir) => {
            let name = sanitize_filename(&format!("summary({})", folder.display()));
            dir.join(format!("{}.txt", name))
        }
    }
}

/// Header line for one file's section in a merged output.
///
/// Either the normalized absolute path or just the basename, in both
/// cases without the subtitle extension.
pub fn section_header(path: &Path, style: HeaderStyle) -> String {
    match style {
        HeaderStyle::BaseName => file_stem(path),
        HeaderStyle::FullPath => path.with_extension("").display().to_string(),
    }
}
