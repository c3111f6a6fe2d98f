//! Conversion engine
//!
//! Drives one conversion run over an immutable request snapshot. Every
//! per-file failure is recorded and the run continues; the only thing that
//! blocks is an overwrite conflict waiting on the prompt. A fresh
//! [`OverwritePolicy`] is created here at the start of every run.

use std::path::{Path, PathBuf};

use super::output::{group_output_path, section_header, separate_output_path};
use super::overwrite::{OverwritePolicy, OverwritePrompt};
use super::parser::parse_subtitle_file;
use super::{ConversionMode, ConversionRequest, FileFailure, RunSummary, SelectedFile};

/// Full-width comma used to join subtitle blocks
const BLOCK_JOINER: &str = "，";

/// Join parsed blocks into output text, with the trailing joiner
fn joined_text(blocks: &[String]) -> String {
    let mut text = blocks.join(BLOCK_JOINER);
    text.push_str(BLOCK_JOINER);
    text
}

/// Parse one file into its joined text, mapping zero blocks to a failure.
fn file_text(path: &Path) -> Result<String, FileFailure> {
    let blocks = parse_subtitle_file(path)?;
    if blocks.is_empty() {
        return Err(FileFailure::EmptyResult);
    }
    Ok(joined_text(&blocks))
}

/// Authorize and write one output file, recording the outcome.
fn write_output(
    target: &Path,
    content: &str,
    identifier: &str,
    policy: &mut OverwritePolicy,
    prompt: &mut dyn OverwritePrompt,
    summary: &mut RunSummary,
) {
    if !policy.authorize(target, content, prompt) {
        summary.record_failure(identifier, FileFailure::DeclinedOverwrite);
        return;
    }

    match std::fs::write(target, content) {
        Ok(()) => {
            log::debug!("Wrote {}", target.display());
            summary.success_count += 1;
        }
        Err(e) => {
            summary.record_failure(
                identifier,
                FileFailure::Write(format!("Failed to write output: {}", e)),
            );
        }
    }
}

/// Run one conversion over the request snapshot.
///
/// Sequential and single-run by construction. In Separate mode
/// `success_count` counts source files; in the merge modes it counts output
/// files written (so a declined merge destination fails the whole merge).
pub fn run(request: &ConversionRequest, prompt: &mut dyn OverwritePrompt) -> RunSummary {
    log::info!(
        "Starting conversion run: {} file(s), mode {:?}",
        request.files.len(),
        request.mode
    );

    let mut policy = OverwritePolicy::new();
    let mut summary = RunSummary::default();

    match &request.mode {
        ConversionMode::Separate => {
            for file in &request.files {
                let identifier = file.path.display().to_string();
                match file_text(&file.path) {
                    Ok(content) => {
                        let target = separate_output_path(&file.path, &request.location);
                        write_output(
                            &target,
                            &content,
                            &identifier,
                            &mut policy,
                            &mut *prompt,
                            &mut summary,
                        );
                    }
                    Err(failure) => summary.record_failure(&identifier, failure),
                }
            }
        }
        ConversionMode::MergeAll { destination } => {
            let sections = collect_sections(request, &request.files, &mut summary);
            if !sections.is_empty() {
                let content = sections.join("\n\n");
                let identifier = destination.display().to_string();
                write_output(
                    destination,
                    &content,
                    &identifier,
                    &mut policy,
                    &mut *prompt,
                    &mut summary,
                );
            }
        }
        ConversionMode::MergeByFolder => {
            for (folder, files) in group_by_folder(&request.files) {
                let sections = collect_sections(request, &files, &mut summary);
                if sections.is_empty() {
                    continue;
                }
                let content = sections.join("\n\n");
                let target = group_output_path(&folder, &request.location);
                let identifier = target.display().to_string();
                write_output(
                    &target,
                    &content,
                    &identifier,
                    &mut policy,
                    &mut *prompt,
                    &mut summary,
                );
            }
        }
    }

    log::info!(
        "Conversion run finished: {} succeeded, {} failed",
        summary.success_count,
        summary.failures.len()
    );
    summary
}

/// Build merged sections (header + joined text) for the given files.
///
/// Files that fail to parse or produce no text are recorded and excluded;
/// the merge proceeds with whatever remains.
fn collect_sections(
    request: &ConversionRequest,
    files: &[SelectedFile],
    summary: &mut RunSummary,
) -> Vec<String> {
    let mut sections = Vec::new();
    for file in files {
        match file_text(&file.path) {
            Ok(content) => {
                let header = section_header(&file.path, request.header_style);
                sections.push(format!("{}\n{}", header, content));
            }
            Err(failure) => {
                summary.record_failure(&file.path.display().to_string(), failure);
            }
        }
    }
    sections
}

/// Group files by their folder, preserving first-appearance order of folders
/// and snapshot order within each group.
fn group_by_folder(files: &[SelectedFile]) -> Vec<(PathBuf, Vec<SelectedFile>)> {
    let mut groups: Vec<(PathBuf, Vec<SelectedFile>)> = Vec::new();
    for file in files {
        match groups.iter_mut().find(|(folder, _)| folder == &file.folder) {
            Some((_, members)) => members.push(file.clone()),
            None => groups.push((file.folder.clone(), vec![file.clone()])),
        }
    }
    groups
}

/// Convert one file to its joined text, without the trailing joiner.
///
/// Used to show a file's content before conversion; nothing is written.
pub fn preview(path: &Path) -> Result<String, FileFailure> {
    let blocks = parse_subtitle_file(path)?;
    if blocks.is_empty() {
        return Err(FileFailure::EmptyResult);
    }
    Ok(blocks.join(BLOCK_JOINER))
}
