//! Conversion pipeline
//!
//! This module contains:
//! - The per-file failure taxonomy and run summary
//! - The immutable conversion request snapshot
//! - Subtitle parsing, output naming, the engine, and overwrite handling

mod engine;
mod output;
mod overwrite;
mod parser;

pub use engine::{preview, run};
pub use output::{group_output_path, sanitize_filename, section_header, separate_output_path};
pub use overwrite::{
    OverwriteDecision, OverwritePolicy, OverwritePrompt, OverwriteRequest, OverwriteResponse,
};
pub use parser::{decode_bytes, parse_blocks, parse_subtitle_file};

#[cfg(test)]
pub(crate) use overwrite::test_support::ScriptedPrompt;

use std::path::PathBuf;

use crate::core::{FileEntry, FileRegistry};

/// Why one source file (or folder group) produced no output.
///
/// A failure never aborts the run; it is recorded against the file and the
/// run moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFailure {
    /// The file could not be read from disk
    Read(String),
    /// No encoding in the fallback chain accepted the bytes
    Decode,
    /// Parsing succeeded but yielded zero subtitle blocks
    EmptyResult,
    /// The output file could not be written
    Write(String),
    /// The user declined to overwrite the existing output
    DeclinedOverwrite,
}

impl FileFailure {
    /// Human-readable reason for the run summary
    pub fn reason_text(&self) -> String {
        match self {
            FileFailure::Read(detail) => detail.clone(),
            FileFailure::Decode => "Unsupported text encoding".to_string(),
            FileFailure::EmptyResult => "No subtitle text found".to_string(),
            FileFailure::Write(detail) => detail.clone(),
            FileFailure::DeclinedOverwrite => "Skipped: output already exists".to_string(),
        }
    }
}

/// How converted text is laid out across output files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionMode {
    /// One `.txt` per source file
    Separate,
    /// All files concatenated into a single destination file
    MergeAll { destination: PathBuf },
    /// One `summary.txt` per source folder
    MergeByFolder,
}

/// Where output files are placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLocation {
    /// Next to each source file (or inside each group's folder)
    Alongside,
    /// Everything into one user-chosen folder
    SharedFolder(PathBuf),
}

/// Section header style for merged outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    BaseName,
    FullPath,
}

/// One file captured in a conversion snapshot
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub folder: PathBuf,
}

/// Immutable snapshot of everything one run needs.
///
/// Built from the registry before the run starts; selection or sort changes
/// made afterwards do not affect a run in flight.
#[derive(Debug)]
pub struct ConversionRequest {
    pub files: Vec<SelectedFile>,
    pub mode: ConversionMode,
    pub location: OutputLocation,
    pub header_style: HeaderStyle,
}

impl ConversionRequest {
    /// Snapshot the registry's selected entries in insertion order.
    ///
    /// When a visibility mask is given (parallel to `registry.all()`), only
    /// entries that are both selected and visible are captured.
    pub fn from_registry(
        registry: &FileRegistry,
        visible: Option<&[bool]>,
        mode: ConversionMode,
        location: OutputLocation,
        header_style: HeaderStyle,
    ) -> Self {
        let files = registry
            .all()
            .iter()
            .enumerate()
            .filter(|(i, entry)| {
                entry.selected && visible.map(|mask| mask[*i]).unwrap_or(true)
            })
            .map(|(_, entry)| SelectedFile::from(entry))
            .collect();

        Self {
            files,
            mode,
            location,
            header_style,
        }
    }
}

impl From<&FileEntry> for SelectedFile {
    fn from(entry: &FileEntry) -> Self {
        Self {
            path: entry.path.clone(),
            folder: entry.folder.clone(),
        }
    }
}

/// Outcome of one conversion run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files (or folder groups in merge-by-folder mode) written successfully
    pub success_count: usize,
    /// Failed identifiers with their reasons, in the order they occurred
    pub failures: Vec<(String, FileFailure)>,
}

impl RunSummary {
    pub fn record_failure(&mut self, identifier: &str, failure: FileFailure) {
        log::warn!("Conversion failed for {}: {}", identifier, failure.reason_text());
        self.failures.push((identifier.to_string(), failure));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_snapshot_keeps_insertion_order() {
        let mut registry = FileRegistry::new();
        registry.add(Path::new("/v/b.srt"), None);
        registry.add(Path::new("/v/a.srt"), None);
        registry.add(Path::new("/v/c.srt"), None);

        let request = ConversionRequest::from_registry(
            &registry,
            None,
            ConversionMode::Separate,
            OutputLocation::Alongside,
            HeaderStyle::BaseName,
        );

        let names: Vec<_> = request
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["b.srt", "a.srt", "c.srt"]);
    }

    #[test]
    fn test_snapshot_skips_deselected_entries() {
        let mut registry = FileRegistry::new();
        registry.add(Path::new("/v/a.srt"), None);
        registry.add(Path::new("/v/b.srt"), None);
        registry.set_selected(Path::new("/v/a.srt"), false);

        let request = ConversionRequest::from_registry(
            &registry,
            None,
            ConversionMode::Separate,
            OutputLocation::Alongside,
            HeaderStyle::BaseName,
        );

        assert_eq!(request.files.len(), 1);
        assert_eq!(request.files[0].path, PathBuf::from("/v/b.srt"));
    }

    #[test]
    fn test_snapshot_respects_visibility_mask() {
        let mut registry = FileRegistry::new();
        registry.add(Path::new("/v/a.srt"), None);
        registry.add(Path::new("/v/b.srt"), None);
        registry.add(Path::new("/v/c.srt"), None);

        let visible = vec![true, false, true];
        let request = ConversionRequest::from_registry(
            &registry,
            Some(&visible),
            ConversionMode::Separate,
            OutputLocation::Alongside,
            HeaderStyle::BaseName,
        );

        let names: Vec<_> = request
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.srt", "c.srt"]);
    }

    #[test]
    fn test_failure_reason_texts() {
        assert_eq!(
            FileFailure::Decode.reason_text(),
            "Unsupported text encoding"
        );
        assert_eq!(
            FileFailure::Read("Failed to read file: gone".to_string()).reason_text(),
            "Failed to read file: gone"
        );
        assert_eq!(
            FileFailure::DeclinedOverwrite.reason_text(),
            "Skipped: output already exists"
        );
    }
}
