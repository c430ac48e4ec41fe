use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::Error;

/// Extensions of documents picked up when walking a directory.
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Collect the documents to scan from command-line inputs.
///
/// Files named explicitly are always scanned. Directories are walked for
/// `.md`/`.mdx` files, skipping hidden directories, and each hit is checked
/// against the config's include/exclude filters relative to `root`.
/// An empty input list walks `root`. Results are sorted and deduplicated.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if an input does not exist.
pub fn collect_documents(root: &Path, inputs: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>, Error> {
    let default_input = [root.to_path_buf()];
    let inputs = if inputs.is_empty() { &default_input[..] } else { inputs };

    let mut documents = Vec::new();
    for input in inputs {
        if input.is_file() {
            documents.push(input.clone());
        } else if input.is_dir() {
            collect_from_directory(root, input, config, &mut documents);
        } else {
            return Err(Error::FileNotFound { path: input.clone() });
        }
    }

    documents.sort();
    documents.dedup();
    return Ok(documents);
}

/// Walk one directory, pushing every document that passes the filters.
fn collect_from_directory(root: &Path, dir: &Path, config: &Config, documents: &mut Vec<PathBuf>) {
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| return e.depth() == 0 || !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| return e.file_type().is_file() && is_document(e.path()))
    {
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if !config.should_scan(&relative.to_string_lossy()) {
            debug!(path = %relative.display(), "skipped by config filters");
            continue;
        }
        documents.push(path.to_path_buf());
    }
}

/// Whether a path carries one of the document extensions.
pub fn is_document(path: &Path) -> bool {
    return path
        .extension()
        .and_then(|e| return e.to_str())
        .is_some_and(|ext| return DOCUMENT_EXTENSIONS.contains(&ext));
}

/// Dot-prefixed entries such as `.git`.
fn is_hidden(entry: &DirEntry) -> bool {
    return entry.file_name().to_str().is_some_and(|name| return name.starts_with('.'));
}
