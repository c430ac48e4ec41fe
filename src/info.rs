use std::path::Path;

use serde::Serialize;

use crate::config::{CONFIG_FILE, Config};
use crate::patterns::PatternSet;
use crate::resolver::Strategy;

/// Output the pathlink reference document for the project at `root`.
pub fn run(root: &Path, patterns: &PatternSet, json: bool) {
    let state = gather_state(root);
    let listed = list_patterns(patterns);

    if json {
        print_json(&state, &listed);
    } else {
        print_markdown(&state, &listed);
    }
}

/// A pattern as shown to the user. Priority is one-based.
struct ListedPattern {
    group: usize,
    priority: usize,
    regex: String,
}

fn list_patterns(patterns: &PatternSet) -> Vec<ListedPattern> {
    patterns
        .patterns()
        .iter()
        .enumerate()
        .map(|(index, pattern)| ListedPattern {
            group: pattern.group(),
            priority: index.saturating_add(1),
            regex: pattern.as_str().to_string(),
        })
        .collect()
}

// ── State gathering ───────────────────────────────────────────────────

struct CurrentState {
    config_error: Option<String>,
    config_found: bool,
    links_enabled: bool,
    marker_dir: String,
    marker_prefix: String,
    strategy: Strategy,
    workspace_roots: Vec<String>,
}

fn gather_state(root: &Path) -> CurrentState {
    let config_found = root.join(CONFIG_FILE).exists();
    let (config, config_error) = match Config::load(root) {
        Ok(c) => (c, None),
        Err(e) => (Config::defaults(), Some(e.to_string())),
    };

    CurrentState {
        config_error,
        config_found,
        links_enabled: config.links.is_enabled(),
        marker_dir: config.resolve.marker_dir,
        marker_prefix: config.resolve.marker_prefix,
        strategy: config.resolve.strategy,
        workspace_roots: config
            .workspace_roots
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    }
}

const fn strategy_name(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Anchored => "anchored",
        Strategy::Direct => "direct",
    }
}

// ── Markdown output ───────────────────────────────────────────────────

fn print_markdown(state: &CurrentState, listed: &[ListedPattern]) {
    let version = env!("CARGO_PKG_VERSION");
    print_markdown_header(version, listed);
    print_markdown_state(state);
    println!();
    print_markdown_exit_codes();
}

fn print_markdown_header(version: &str, listed: &[ListedPattern]) {
    print!(
        "\
# pathlink {version}

Find file paths in markdown and MDX, resolve them to files on disk.

## Recognized Paths (in priority order)

"
    );
    for pattern in listed {
        println!("{}. `{}` (group {})", pattern.priority, pattern.regex, pattern.group);
    }
    print!(
        "
## Resolution (anchored strategy)

    /snippets/x.mdx   nearest ancestor with a marker directory: <dir>/fern/snippets/x.mdx
    /docs/x.md        first workspace root: <root>/docs/x.md
    C:/abs or /abs    unchanged when no rule above applies
    ./x.md, x.md      relative to the document's directory

The direct strategy keeps only the last two rules.

## Commands

    pathlink scan [PATHS..]                      List links whose targets exist
    pathlink open FILE --line N --column C       Resolve the path under a cursor
    pathlink resolve TOKEN --from FILE           Show how a token resolves
    pathlink links on|off|toggle|status          Switch link scanning

## Configuration ({CONFIG_FILE})

    links = true
    strategy = \"anchored\"          # or \"direct\"
    marker_dir = \"fern\"
    marker_prefix = \"/snippets/\"
    workspace_roots = [\".\"]
    include = [\"docs/\"]
    exclude = [\"docs/archive/\"]

## Current State

"
    );
}

fn print_markdown_state(state: &CurrentState) {
    match (&state.config_error, state.config_found) {
        (Some(e), _) => println!("Config:     {CONFIG_FILE} (invalid: {e})"),
        (None, true) => println!("Config:     {CONFIG_FILE} (found)"),
        (None, false) => println!("Config:     {CONFIG_FILE} (not found)"),
    }

    let links = if state.links_enabled { "on" } else { "off" };
    println!("Links:      {links}");
    println!("Strategy:   {}", strategy_name(state.strategy));
    println!("Marker:     {} for {}", state.marker_dir, state.marker_prefix);

    if state.workspace_roots.is_empty() {
        println!("Workspace:  (current directory)");
    } else {
        println!("Workspace:  {}", state.workspace_roots.join(", "));
    }
}

fn print_markdown_exit_codes() {
    print!(
        "\
## Exit Codes

| Code | Meaning |
|------|---------|
| 0    | Success |
| 1    | No path at cursor, or target not found |
| 2    | Runtime error |
"
    );
}

// ── JSON output ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct InfoJson {
    current_state: StateJson,
    exit_codes: Vec<ExitCodeInfo>,
    patterns: Vec<PatternInfo>,
    version: String,
}

#[derive(Serialize)]
struct PatternInfo {
    group: usize,
    priority: usize,
    regex: String,
}

#[derive(Serialize)]
struct ExitCodeInfo {
    code: u8,
    meaning: String,
}

#[derive(Serialize)]
struct StateJson {
    config_error: Option<String>,
    config_found: bool,
    links_enabled: bool,
    marker_dir: String,
    marker_prefix: String,
    strategy: Strategy,
    workspace_roots: Vec<String>,
}

fn print_json(state: &CurrentState, listed: &[ListedPattern]) {
    let info = InfoJson {
        current_state: StateJson {
            config_error: state.config_error.clone(),
            config_found: state.config_found,
            links_enabled: state.links_enabled,
            marker_dir: state.marker_dir.clone(),
            marker_prefix: state.marker_prefix.clone(),
            strategy: state.strategy,
            workspace_roots: state.workspace_roots.clone(),
        },
        exit_codes: vec![
            ExitCodeInfo { code: 0, meaning: "Success".to_string() },
            ExitCodeInfo { code: 1, meaning: "No path at cursor, or target not found".to_string() },
            ExitCodeInfo { code: 2, meaning: "Runtime error".to_string() },
        ],
        patterns: listed
            .iter()
            .map(|p| PatternInfo {
                group: p.group,
                priority: p.priority,
                regex: p.regex.clone(),
            })
            .collect(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // serde_json::to_string_pretty won't fail on this structure.
    let json = serde_json::to_string_pretty(&info).unwrap_or_default();
    println!("{json}");
}
