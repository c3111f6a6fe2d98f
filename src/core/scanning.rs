//! Subtitle file discovery
//!
//! Expands the user-supplied inputs (files, directories, pasted text) into
//! concrete subtitle file paths for the registry. Directories are the only
//! thing expanded here; the conversion core itself only ever sees file
//! paths.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A subtitle file found during discovery, with the directory it was
/// found in (the merge-by-folder grouping key).
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub folder: PathBuf,
}

/// Whether a path looks like a subtitle container file (.srt, any case)
pub fn is_subtitle_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("srt"))
        .unwrap_or(false)
}

/// Find subtitle files under a directory.
///
/// Non-recursive mode lists only the directory itself; recursive mode
/// walks the whole tree. Each hit records its immediate parent directory
/// as its folder. Results are sorted by path for consistent ordering.
pub fn find_subtitle_files(dir: &Path, recursive: bool) -> Result<Vec<DiscoveredFile>, String> {
    if !dir.is_dir() {
        return Err(format!("Path is not a directory: {}", dir.display()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut found = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_subtitle_file(path) {
            let folder = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dir.to_path_buf());
            found.push(DiscoveredFile {
                path: path.to_path_buf(),
                folder,
            });
        }
    }

    found.sort_by(|a, b| a.path.cmp(&b.path));
    log::debug!(
        "Found {} subtitle file(s) under {} (recursive: {})",
        found.len(),
        dir.display(),
        recursive
    );
    Ok(found)
}

/// Parse pasted text into candidate paths.
///
/// Accepts one path per line; each line may be quoted, a `file://` URL
/// (percent-encoded), a plain path, or several space-joined paths. The
/// space-joined case is disambiguated by probing the filesystem, since
/// paths themselves may contain spaces. Returned paths may be files or
/// directories; use [`collect_subtitle_paths`] to expand them.
pub fn parse_pasted_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if (line.starts_with('"') && line.ends_with('"') && line.len() >= 2)
            || (line.starts_with('\'') && line.ends_with('\'') && line.len() >= 2)
        {
            paths.push(PathBuf::from(&line[1..line.len() - 1]));
        } else if let Some(url_path) = line.strip_prefix("file://") {
            paths.push(PathBuf::from(percent_decode(url_path)));
        } else if line.contains(' ') && !Path::new(line).exists() {
            // Several space-joined paths; grow a candidate until it exists
            let mut candidate = String::new();
            for part in line.split_whitespace() {
                if candidate.is_empty() {
                    candidate.push_str(part);
                } else {
                    candidate.push(' ');
                    candidate.push_str(part);
                }
                if Path::new(&candidate).exists() {
                    paths.push(PathBuf::from(&candidate));
                    candidate.clear();
                }
            }
        } else {
            paths.push(PathBuf::from(line));
        }
    }

    paths
}

/// Expand raw paths (files or directories) into subtitle files.
///
/// Plain subtitle files pass through with their parent as folder;
/// directories are searched recursively. Anything else is dropped.
pub fn collect_subtitle_paths(raw: &[PathBuf]) -> Vec<DiscoveredFile> {
    let mut found = Vec::new();
    for path in raw {
        if path.is_file() && is_subtitle_file(path) {
            let folder = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| path.clone());
            found.push(DiscoveredFile {
                path: path.clone(),
                folder,
            });
        } else if path.is_dir() {
            match find_subtitle_files(path, true) {
                Ok(mut files) => found.append(&mut files),
                Err(e) => log::warn!("Skipping directory: {}", e),
            }
        } else {
            log::debug!("Ignoring non-subtitle input: {}", path.display());
        }
    }
    found
}

/// Decode %XX escapes in a file URL path.
///
/// Works on raw bytes: the byte after a `%` may be the start of a
/// multibyte character, so the input string must never be sliced at
/// arbitrary offsets.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SRT: &str = "1\n00:00:01,000 --> 00:00:02,000\nhello\n";

    #[test]
    fn test_is_subtitle_file() {
        assert!(is_subtitle_file(Path::new("/v/a.srt")));
        assert!(is_subtitle_file(Path::new("/v/a.SRT")));
        assert!(!is_subtitle_file(Path::new("/v/a.txt")));
        assert!(!is_subtitle_file(Path::new("/v/srt")));
    }

    #[test]
    fn test_find_nonexistent_directory() {
        assert!(find_subtitle_files(Path::new("/nonexistent/path"), true).is_err());
    }

    #[test]
    fn test_find_non_recursive_skips_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("top.srt"), SRT).unwrap();
        let sub = temp_dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("deep.srt"), SRT).unwrap();

        let found = find_subtitle_files(temp_dir.path(), false).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].path.ends_with("top.srt"));
    }

    #[test]
    fn test_find_recursive_records_parent_as_folder() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("top.srt"), SRT).unwrap();
        let sub = temp_dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("deep.srt"), SRT).unwrap();
        fs::write(sub.join("notes.txt"), "not a subtitle").unwrap();

        let found = find_subtitle_files(temp_dir.path(), true).unwrap();
        assert_eq!(found.len(), 2);

        let deep = found.iter().find(|f| f.path.ends_with("deep.srt")).unwrap();
        assert_eq!(deep.folder, sub);
    }

    #[test]
    fn test_parse_pasted_quoted_and_plain() {
        let text = "\"/v/with space.srt\"\n/v/plain.srt\n\n'/v/single.srt'";
        let paths = parse_pasted_paths(text);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/v/with space.srt"),
                PathBuf::from("/v/plain.srt"),
                PathBuf::from("/v/single.srt"),
            ]
        );
    }

    #[test]
    fn test_parse_pasted_file_url() {
        let paths = parse_pasted_paths("file:///v/my%20show/ep.srt");
        assert_eq!(paths, vec![PathBuf::from("/v/my show/ep.srt")]);
    }

    #[test]
    fn test_parse_pasted_space_joined_paths() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.srt");
        let b = temp_dir.path().join("b.srt");
        fs::write(&a, SRT).unwrap();
        fs::write(&b, SRT).unwrap();

        let line = format!("{} {}", a.display(), b.display());
        let paths = parse_pasted_paths(&line);
        assert_eq!(paths, vec![a, b]);
    }

    #[test]
    fn test_parse_pasted_existing_path_with_space_kept_whole() {
        let temp_dir = TempDir::new().unwrap();
        let spaced = temp_dir.path().join("my show.srt");
        fs::write(&spaced, SRT).unwrap();

        let paths = parse_pasted_paths(&spaced.display().to_string());
        assert_eq!(paths, vec![spaced]);
    }

    #[test]
    fn test_collect_expands_directories_recursively() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("deep.srt"), SRT).unwrap();
        let file = temp_dir.path().join("direct.srt");
        fs::write(&file, SRT).unwrap();

        let raw = vec![file.clone(), temp_dir.path().to_path_buf()];
        let found = collect_subtitle_paths(&raw);

        // direct.srt appears twice (as a file and via the directory); the
        // registry dedups on add, so discovery does not have to.
        assert!(found.iter().any(|f| f.path == file));
        assert!(found.iter().any(|f| f.path.ends_with("deep.srt")));
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/a%20b/c"), "/a b/c");
        assert_eq!(percent_decode("/plain"), "/plain");
        assert_eq!(percent_decode("/bad%zz"), "/bad%zz");
    }

    #[test]
    fn test_percent_decode_multibyte_after_percent() {
        // The byte after '%' may start a multibyte character; the literal
        // '%' must pass through without decoding (and without panicking)
        assert_eq!(percent_decode("/tmp/100%中x"), "/tmp/100%中x");
        assert_eq!(percent_decode("/100%中%20x"), "/100%中 x");
        assert_eq!(percent_decode("/tail%2"), "/tail%2");
    }

    #[test]
    fn test_parse_pasted_file_url_with_literal_percent() {
        let paths = parse_pasted_paths("file:///tmp/100%中x.srt");
        assert_eq!(paths, vec![PathBuf::from("/tmp/100%中x.srt")]);
    }
}
