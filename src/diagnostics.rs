use std::path::Path;

use crate::config::CONFIG_FILE;
use crate::error::Error;
use crate::types::RootRule;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is
/// one, how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::NoTokenAtCursor { line, column } => render_no_token(*line, *column),
        Error::PathNotFound { path, rule } => render_path_not_found(path, *rule),
        Error::OpenFailure { path, source } => format!("\
# Error: Could Not Open File

`{}`: {source}
", path.display()),
        Error::ConfigInvalid { path, reason } => format!("\
# Error: Invalid Config

{reason}

## Fix

Edit `{}`.
", path.display()),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Check the syntax of `{CONFIG_FILE}`.
"),
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::EmptyPatternList | Error::InvalidPattern { .. } => format!("\
# Error: Bad Token Pattern

{e}
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_no_token(line: usize, column: usize) -> String {
    format!("\
# No File Path At Cursor

Nothing at line {}, column {} looks like a path.

Recognized forms: `src=\"file.ext\"`, `src={{file.ext}}`, and bare `.md`/`.mdx` paths.
", line.saturating_add(1), column.saturating_add(1))
}

fn render_path_not_found(path: &Path, rule: RootRule) -> String {
    let hint = match rule {
        RootRule::Marker => "Resolved inside the nearest marker directory. Check the snippet exists there.",
        RootRule::Workspace => "Resolved against the first workspace root. Pass `--workspace` to pick another root.",
        RootRule::Absolute => "Used as an absolute path unchanged.",
        RootRule::Document => "Resolved relative to the directory of the current document.",
    };

    format!("\
# File Not Found

`{}` does not exist ({rule}).

{hint}
", path.display())
}
