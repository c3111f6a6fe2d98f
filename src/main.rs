//! srt2txt - batch SRT subtitle to plain-text converter
//!
//! The binary is a thin front-end over the core: it feeds paths into the
//! registry, applies the sort/filter view, renders the overwrite prompt on
//! the terminal, and prints the run summary. All conversion semantics live
//! in the library modules.

mod convert;
mod core;
mod logging;

use std::io::{BufRead, Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::convert::{
    ConversionMode, ConversionRequest, FileFailure, HeaderStyle, OutputLocation, OverwritePrompt,
    OverwriteRequest, OverwriteResponse, RunSummary,
};
use crate::core::{
    AppSettings, FileRegistry, SearchMode, SortConfig, SortOption, apply_filter,
    collect_subtitle_paths, display_order, display_text, find_subtitle_files, is_subtitle_file,
    parse_pasted_paths,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// One .txt next to each source file
    Separate,
    /// Everything into one destination file (requires --output)
    MergeAll,
    /// One summary.txt per source folder
    MergeByFolder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Original,
    NameAsc,
    NameDesc,
    SelectedFirst,
    UnselectedFirst,
}

impl From<SortArg> for SortOption {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Original => SortOption::Original,
            SortArg::NameAsc => SortOption::NameAsc,
            SortArg::NameDesc => SortOption::NameDesc,
            SortArg::SelectedFirst => SortOption::SelectedFirst,
            SortArg::UnselectedFirst => SortOption::UnselectedFirst,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "srt2txt", version, about = "Batch SRT subtitle to TXT converter")]
struct Cli {
    /// Subtitle files or directories to convert
    paths: Vec<PathBuf>,

    /// Read additional paths from stdin (quoted, file:// URLs, one per line)
    #[arg(long)]
    paste: bool,

    /// Search subdirectories when expanding directories
    #[arg(short, long)]
    recursive: bool,

    /// Output layout
    #[arg(short, long, value_enum, default_value_t = ModeArg::Separate)]
    mode: ModeArg,

    /// Destination file for merge-all mode
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Put every output file into this folder instead of alongside sources
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Display, search, and head merged sections by full path instead of basename
    #[arg(long)]
    full_path: bool,

    /// Only keep files whose name matches this text
    #[arg(short, long)]
    search: Option<String>,

    /// Interpret --search as a regular expression
    #[arg(long)]
    regex: bool,

    /// Convert only the files matching --search (instead of all of them)
    #[arg(long, requires = "search")]
    matched_only: bool,

    /// Sort toggles applied in order (affects --list output)
    #[arg(long, value_enum)]
    sort: Vec<SortArg>,

    /// List the gathered files and exit without converting
    #[arg(long)]
    list: bool,

    /// Print one file's converted text and exit without writing anything
    #[arg(long, value_name = "FILE")]
    preview: Option<PathBuf>,

    /// Overwrite existing outputs without prompting
    #[arg(short = 'y', long, conflicts_with = "skip_existing")]
    overwrite_all: bool,

    /// Skip existing outputs without prompting
    #[arg(short = 'n', long)]
    skip_existing: bool,

    /// Persist --recursive, --regex, --full-path and --output-dir as defaults
    #[arg(long)]
    save_defaults: bool,
}

/// Interactive overwrite prompt on stdin/stdout
struct StdinPrompt;

impl OverwritePrompt for StdinPrompt {
    fn resolve(&mut self, request: &OverwriteRequest) -> OverwriteResponse {
        println!("Output already exists: {}", request.path.display());
        loop {
            print!("[o]verwrite, [s]kip, overwrite [a]ll, s[k]ip all, [v]iew? ");
            let _ = std::io::stdout().flush();

            let mut line = String::new();
            if std::io::stdin().lock().read_line(&mut line).is_err() {
                return OverwriteResponse::SkipOnce;
            }

            match line.trim().to_lowercase().as_str() {
                "o" => return OverwriteResponse::OverwriteOnce,
                "s" => return OverwriteResponse::SkipOnce,
                "a" => return OverwriteResponse::OverwriteAll,
                "k" => return OverwriteResponse::SkipAll,
                "v" => {
                    match &request.existing {
                        Some(existing) => println!("--- existing ---\n{}", existing),
                        None => println!("--- existing file is not readable ---"),
                    }
                    println!("--- new ---\n{}", request.new_content);
                }
                "" => return OverwriteResponse::SkipOnce,
                other => println!("Unrecognized answer: {}", other),
            }
        }
    }
}

/// Non-interactive prompt with a fixed answer (for -y / -n)
struct PresetPrompt(OverwriteResponse);

impl OverwritePrompt for PresetPrompt {
    fn resolve(&mut self, _request: &OverwriteRequest) -> OverwriteResponse {
        self.0
    }
}

fn main() {
    let _ = logging::init_logging();

    let cli = Cli::parse();
    if let Err(e) = run_cli(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<(), String> {
    let settings = AppSettings::load();

    let recursive = cli.recursive || settings.recursive;
    let regex = cli.regex || settings.regex_search;
    let full_path = cli.full_path || settings.show_full_path;
    let output_dir = cli.output_dir.clone().or(settings.output_folder.clone());

    if cli.save_defaults {
        let updated = AppSettings {
            show_full_path: full_path,
            recursive,
            regex_search: regex,
            output_folder: output_dir.clone(),
        };
        updated.save()?;
        println!("Defaults saved");
    }

    if let Some(path) = &cli.preview {
        let text = convert::preview(path).map_err(|f| f.reason_text())?;
        println!("{}", text);
        return Ok(());
    }

    let registry = gather_files(&cli, recursive)?;
    if registry.is_empty() {
        return Err("No subtitle files found".to_string());
    }

    let search_mode = if regex { SearchMode::Regex } else { SearchMode::Plain };
    let search = cli.search.as_deref().unwrap_or("");
    let outcome = apply_filter(registry.all(), search, search_mode, full_path);
    // A broken pattern is recoverable: the mask falls back to all-visible.
    // Only --matched-only depends on the pattern, so only it fails fast.
    if let Some(error) = &outcome.error {
        if cli.matched_only {
            return Err(error.clone());
        }
        eprintln!("Warning: {}; showing all files", error);
    }

    if cli.list {
        list_files(&registry, &cli, &outcome.visible, full_path);
        return Ok(());
    }

    let mode = match cli.mode {
        ModeArg::Separate => ConversionMode::Separate,
        ModeArg::MergeAll => {
            let destination = cli
                .output
                .clone()
                .ok_or_else(|| "merge-all mode requires --output".to_string())?;
            ConversionMode::MergeAll { destination }
        }
        ModeArg::MergeByFolder => ConversionMode::MergeByFolder,
    };

    let location = match output_dir {
        Some(dir) => {
            if !dir.is_dir() {
                return Err(format!("Output folder does not exist: {}", dir.display()));
            }
            OutputLocation::SharedFolder(dir)
        }
        None => OutputLocation::Alongside,
    };

    let header_style = if full_path {
        HeaderStyle::FullPath
    } else {
        HeaderStyle::BaseName
    };

    let visible = cli.matched_only.then_some(outcome.visible.as_slice());
    let request = ConversionRequest::from_registry(&registry, visible, mode, location, header_style);
    if request.files.is_empty() {
        return Err("No files matched the search".to_string());
    }

    let summary = if cli.overwrite_all {
        convert::run(&request, &mut PresetPrompt(OverwriteResponse::OverwriteAll))
    } else if cli.skip_existing {
        convert::run(&request, &mut PresetPrompt(OverwriteResponse::SkipAll))
    } else {
        convert::run(&request, &mut StdinPrompt)
    };

    print_summary(&summary);
    Ok(())
}

/// Build the registry from positional paths and optional pasted stdin.
fn gather_files(cli: &Cli, recursive: bool) -> Result<FileRegistry, String> {
    let mut registry = FileRegistry::new();

    for path in &cli.paths {
        if path.is_dir() {
            for found in find_subtitle_files(path, recursive)? {
                registry.add(&found.path, Some(&found.folder));
            }
        } else if path.is_file() && is_subtitle_file(path) {
            registry.add(path, None);
        } else {
            return Err(format!("Not a subtitle file or directory: {}", path.display()));
        }
    }

    if cli.paste {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("Failed to read pasted paths: {}", e))?;
        let raw = parse_pasted_paths(&text);
        for found in collect_subtitle_paths(&raw) {
            registry.add(&found.path, Some(&found.folder));
        }
    }

    log::info!("Gathered {} subtitle file(s)", registry.len());
    Ok(registry)
}

fn list_files(registry: &FileRegistry, cli: &Cli, visible: &[bool], full_path: bool) {
    let mut config = SortConfig::default();
    for arg in &cli.sort {
        config.toggle((*arg).into());
    }

    let entries = registry.all();
    let mut shown = 0;
    for index in display_order(entries, config, full_path) {
        if visible[index] {
            println!("{}", display_text(&entries[index], full_path));
            shown += 1;
        }
    }
    println!("{} of {} file(s)", shown, entries.len());
}

fn print_summary(summary: &RunSummary) {
    println!("Converted: {}", summary.success_count);

    let (skipped, failed): (Vec<_>, Vec<_>) = summary
        .failures
        .iter()
        .partition(|(_, f)| *f == FileFailure::DeclinedOverwrite);

    if !skipped.is_empty() {
        println!("Skipped: {}", skipped.len());
        for (identifier, _) in skipped {
            println!("  {}", identifier);
        }
    }
    if !failed.is_empty() {
        println!("Failed: {}", failed.len());
        for (identifier, failure) in failed {
            println!("  {}: {}", identifier, failure.reason_text());
        }
    }
}
