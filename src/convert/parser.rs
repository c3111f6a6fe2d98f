//! Subtitle container parsing
//!
//! Turns one source file's bytes into the ordered list of subtitle text
//! blocks. Decoding tries a fixed fallback chain; whichever encoding
//! decodes the whole file without error is used in full, never mixed.

use std::path::Path;

use super::FileFailure;

/// Decode raw subtitle bytes.
///
/// Fallback chain: UTF-8 strict, then GBK strict, then WINDOWS_1252
/// (a permissive single-byte encoding that cannot fail). Returns None
/// only if every encoding rejects the input, which WINDOWS_1252 never
/// does in practice.
pub fn decode_bytes(bytes: &[u8]) -> Option<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Some(text.to_string());
    }

    if let Some(text) = encoding_rs::GBK.decode_without_bom_handling_and_without_replacement(bytes)
    {
        return Some(text.into_owned());
    }

    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    Some(text.into_owned())
}

/// Split decoded text into kept subtitle blocks.
///
/// Blocks are runs of non-blank lines separated by one or more blank
/// lines (blank = empty after trimming). A block is kept only when it has
/// at least 3 lines; the first two (index and time range) are dropped and
/// the rest rejoined and trimmed. Blocks whose remaining text is empty
/// are discarded. Source order is preserved and duplicates are allowed.
pub fn parse_blocks(text: &str) -> Vec<String> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = text.trim();

    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
        .into_iter()
        .filter(|lines| lines.len() >= 3)
        .filter_map(|lines| {
            let body = lines[2..].join("\n");
            let body = body.trim();
            if body.is_empty() {
                None
            } else {
                Some(body.to_string())
            }
        })
        .collect()
}

/// Read and parse one subtitle file into its block texts.
///
/// An unreadable file or a file no encoding in the chain accepts is a
/// recorded failure; an empty block list is NOT an error here (the engine
/// decides how to report it per mode).
pub fn parse_subtitle_file(path: &Path) -> Result<Vec<String>, FileFailure> {
    let bytes =
        std::fs::read(path).map_err(|e| FileFailure::Read(format!("Failed to read file: {}", e)))?;

    let text = decode_bytes(&bytes).ok_or(FileFailure::Decode)?;

    Ok(parse_blocks(&text))
}
