//! CLI commands for pathlink: scan, open, resolve, links, info.
//!
//! The CLI stands in for an editor host: it reads documents from disk,
//! supplies workspace roots, and checks existence against the real filesystem.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{self, Config};
use crate::error;
use crate::links::{self, Cursor};
use crate::patterns::PatternSet;
use crate::resolver::{self, FileSystem as _, RealFs, ResolutionContext, normalize_path};
use crate::scanner;
use crate::types::DocumentLink;

/// How `scan` prints its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON array of link records.
    Json,
    /// One `file:line:col` line per link.
    Text,
}

/// What `links` does to the persisted toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LinksAction {
    /// Turn link scanning off.
    Off,
    /// Turn link scanning on.
    On,
    /// Print the current state only.
    Status,
    /// Flip the current state.
    Toggle,
}

/// A link together with the document it was found in.
#[derive(Serialize)]
struct ScanRecord<'a> {
    /// The link itself.
    #[serde(flatten)]
    link: &'a DocumentLink,
    /// Document containing the link, relative to the working directory when possible.
    source: &'a Path,
}

/// Output the pathlink reference document.
///
/// # Errors
///
/// Returns `Error::Io` if the working directory can't be determined, or
/// `Error::InvalidPattern` if the grammar fails to compile.
pub fn info(json: bool) -> Result<(), error::Error> {
    let root = std::env::current_dir()?;
    let patterns = PatternSet::builtin()?;
    crate::info::run(&root, &patterns, json);
    return Ok(());
}

/// Switch link scanning and persist the result, or report it.
///
/// # Errors
///
/// Returns errors from config loading or writing.
pub fn links(action: LinksAction) -> Result<(), error::Error> {
    let root = std::env::current_dir()?;
    let mut toggle = Config::load(&root)?.links;
    let before = toggle;

    match action {
        LinksAction::Off => toggle.disable(),
        LinksAction::On => toggle.enable(),
        LinksAction::Status => {},
        LinksAction::Toggle => {
            toggle.toggle();
        },
    }

    if toggle != before {
        config::write_links_enabled(&root, toggle.is_enabled())?;
    }
    println!("{}", toggle.status_label());
    return Ok(());
}

/// Resolve the path under a cursor and confirm it can be opened.
/// `line` and `column` are one-based; `column` counts characters.
///
/// # Errors
///
/// Returns `Error::NoTokenAtCursor` or `Error::PathNotFound` for the
/// "nothing there" cases, `Error::OpenFailure` if the target can't be
/// opened, or config and I/O errors.
pub fn open(file: &Path, line: usize, column: usize, workspace: &[PathBuf]) -> Result<(), error::Error> {
    let root = std::env::current_dir()?;
    let config = Config::load(&root)?;
    let patterns = PatternSet::builtin()?;
    let roots = workspace_roots(&root, workspace, &config);
    let document = normalize_path(&root.join(file));

    let text = read_document(&document)?;
    let line_index = line.saturating_sub(1);
    let line_text = text.lines().nth(line_index).unwrap_or("");
    let cursor = Cursor {
        column: byte_offset_of_char(line_text, column.saturating_sub(1)),
        line: line_index,
    };

    let ctx = ResolutionContext {
        document: &document,
        options: &config.resolve,
        fs: &RealFs,
        workspace_roots: &roots,
    };
    let resolution = links::resolve_token_at_cursor(&patterns, line_text, cursor, &ctx).map_err(|e| {
        // Report the column the user gave, not the byte offset it became.
        return match e {
            error::Error::NoTokenAtCursor { line, .. } => error::Error::NoTokenAtCursor {
                column: column.saturating_sub(1),
                line,
            },
            other => other,
        };
    })?;

    // Targets are text documents; a file that isn't valid UTF-8 can't be opened as one.
    std::fs::read_to_string(&resolution.path).map_err(|source| {
        return error::Error::OpenFailure {
            path: resolution.path.clone(),
            source,
        };
    })?;

    println!("{}", resolution.path.display());
    let name = resolution.path.file_name().unwrap_or(resolution.path.as_os_str());
    eprintln!("Opened: {}", name.to_string_lossy());
    return Ok(());
}

/// Show how a single token resolves from a given document.
/// Exits 1 when the resolved path does not exist.
///
/// # Errors
///
/// Returns errors from config loading.
pub fn resolve(token: &str, from: &Path, workspace: &[PathBuf]) -> Result<ExitCode, error::Error> {
    let root = std::env::current_dir()?;
    let config = Config::load(&root)?;
    let roots = workspace_roots(&root, workspace, &config);
    let document = normalize_path(&root.join(from));

    let ctx = ResolutionContext {
        document: &document,
        options: &config.resolve,
        fs: &RealFs,
        workspace_roots: &roots,
    };
    let resolution = resolver::resolve(token, &ctx);
    let exists = RealFs.exists(&resolution.path);
    let status = if exists { "exists" } else { "missing" };

    println!("{}  ({}, {status})", resolution.path.display(), resolution.rule);
    if exists {
        return Ok(ExitCode::SUCCESS);
    }
    return Ok(ExitCode::from(1));
}

/// Scan documents and print every link whose target exists.
/// Prints nothing when link scanning is switched off.
///
/// # Errors
///
/// Returns errors from config loading, document discovery, or output encoding.
pub fn scan(paths: &[PathBuf], workspace: &[PathBuf], format: OutputFormat) -> Result<(), error::Error> {
    let root = std::env::current_dir()?;
    let config = Config::load(&root)?;
    if !config.links.is_enabled() {
        eprintln!("{}", config.links.status_label());
        return Ok(());
    }

    let patterns = PatternSet::builtin()?;
    let roots = workspace_roots(&root, workspace, &config);
    let inputs: Vec<PathBuf> = paths.iter().map(|p| return normalize_path(&root.join(p))).collect();
    let documents = scanner::collect_documents(&root, &inputs, &config)?;

    let mut scanned: Vec<(PathBuf, String, Vec<DocumentLink>)> = Vec::new();
    for document in documents {
        let text = match std::fs::read_to_string(&document) {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %document.display(), error = %e, "skipping unreadable document");
                continue;
            },
        };

        let ctx = ResolutionContext {
            document: &document,
            options: &config.resolve,
            fs: &RealFs,
            workspace_roots: &roots,
        };
        let found = links::scan_document(&patterns, &text, &ctx);
        debug!(path = %document.display(), links = found.len(), "scanned document");
        scanned.push((document, text, found));
    }

    match format {
        OutputFormat::Json => print_scan_json(&root, &scanned)?,
        OutputFormat::Text => print_scan_text(&root, &scanned),
    }
    return Ok(());
}

/// Byte offset of the `char_index`-th character, clamped to the line end.
fn byte_offset_of_char(line: &str, char_index: usize) -> usize {
    return line
        .char_indices()
        .nth(char_index)
        .map_or(line.len(), |(offset, _)| return offset);
}

/// Path shown to the user: relative to the working directory when inside it.
fn display_path<'a>(root: &Path, path: &'a Path) -> &'a Path {
    return path.strip_prefix(root).unwrap_or(path);
}

/// Print scan results as a JSON array.
///
/// # Errors
///
/// Returns `Error::Json` if encoding fails.
fn print_scan_json(root: &Path, scanned: &[(PathBuf, String, Vec<DocumentLink>)]) -> Result<(), error::Error> {
    let records: Vec<ScanRecord<'_>> = scanned
        .iter()
        .flat_map(|(document, _, found)| {
            return found.iter().map(move |link| {
                return ScanRecord {
                    link,
                    source: display_path(root, document),
                };
            });
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    return Ok(());
}

/// Print scan results as `file:line:col-endcol  raw -> target`, one-based
/// line and character columns.
fn print_scan_text(root: &Path, scanned: &[(PathBuf, String, Vec<DocumentLink>)]) {
    let mut total = 0_usize;
    for (document, text, found) in scanned {
        let lines: Vec<&str> = text.lines().collect();
        for link in found {
            let line = lines.get(link.range.line).copied().unwrap_or("");
            let start_col = char_column(line, link.range.start).saturating_add(1);
            let end_col = char_column(line, link.range.end).saturating_add(1);
            println!(
                "{}:{}:{start_col}-{end_col}  {} -> {}",
                display_path(root, document).display(),
                link.range.line.saturating_add(1),
                link.raw,
                link.target.display(),
            );
        }
        total = total.saturating_add(found.len());
    }
    eprintln!("{total} links in {} files", scanned.len());
}

/// Character column of a byte offset within a line.
fn char_column(line: &str, byte_offset: usize) -> usize {
    return line.get(..byte_offset).map_or(0, |prefix| return prefix.chars().count());
}

/// Workspace roots in effect: command-line roots, else configured roots,
/// else the working directory alone.
fn workspace_roots(root: &Path, cli_roots: &[PathBuf], config: &Config) -> Vec<PathBuf> {
    if !cli_roots.is_empty() {
        return cli_roots.iter().map(|r| return normalize_path(&root.join(r))).collect();
    }
    if !config.workspace_roots.is_empty() {
        return config.workspace_roots.clone();
    }
    return vec![root.to_path_buf()];
}

/// Read a document, mapping a missing file to `Error::FileNotFound`.
///
/// # Errors
///
/// Returns `Error::FileNotFound` or `Error::Io`.
fn read_document(path: &Path) -> Result<String, error::Error> {
    return std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            return error::Error::FileNotFound { path: path.to_path_buf() };
        }
        return error::Error::Io(e);
    });
}
