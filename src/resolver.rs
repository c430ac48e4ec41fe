use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, trace};

use crate::types::{Resolution, RootRule};

/// Quote characters stripped from either end of a raw token.
const QUOTES: &[char] = &['"', '\'', '`'];

/// Marker directory searched for when no config overrides it.
pub const DEFAULT_MARKER_DIR: &str = "fern";

/// Reserved absolute prefix that triggers the marker-directory search.
pub const DEFAULT_MARKER_PREFIX: &str = "/snippets/";

/// Existence check supplied by the host. The resolver itself never reads
/// the filesystem; every existence check goes through this seam.
pub trait FileSystem {
    /// Whether `path` names an existing file or directory.
    fn exists(&self, path: &Path) -> bool;
}

/// Existence checks backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn exists(&self, path: &Path) -> bool {
        return path.exists();
    }
}

/// Which root rules a resolution may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Marker directory, workspace root, absolute, then document-relative.
    #[default]
    Anchored,
    /// Absolute as given, everything else document-relative.
    Direct,
}

/// Resolution settings that stay fixed for a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Directory name whose presence marks a documentation root.
    pub marker_dir: String,
    /// Token prefix that is anchored at the marker directory.
    pub marker_prefix: String,
    /// Rule set in effect.
    pub strategy: Strategy,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        return Self {
            marker_dir: DEFAULT_MARKER_DIR.to_string(),
            marker_prefix: DEFAULT_MARKER_PREFIX.to_string(),
            strategy: Strategy::Anchored,
        };
    }
}

/// Everything a single resolution may look at. Built fresh per call by the host.
pub struct ResolutionContext<'a> {
    /// Absolute path of the document containing the token.
    pub document: &'a Path,
    /// Run-wide settings.
    pub options: &'a ResolveOptions,
    /// Existence check for marker directories and link targets.
    pub fs: &'a dyn FileSystem,
    /// Workspace roots in host order; only the first anchors `/` tokens.
    pub workspace_roots: &'a [PathBuf],
}

impl ResolutionContext<'_> {
    /// Directory containing the document.
    pub fn document_dir(&self) -> &Path {
        return self.document.parent().unwrap_or_else(|| return Path::new(""));
    }
}

/// Strip one optional quote from each end of a raw token, then trim whitespace.
pub fn clean_token(raw: &str) -> &str {
    let stripped = raw.strip_prefix(QUOTES).unwrap_or(raw);
    let stripped = stripped.strip_suffix(QUOTES).unwrap_or(stripped);
    return stripped.trim();
}

/// Resolve a raw token to an absolute path using the context's strategy.
/// The first applicable root rule wins; document-relative always applies.
/// The target itself is not checked for existence.
pub fn resolve(raw: &str, ctx: &ResolutionContext<'_>) -> Resolution {
    let token = clean_token(raw);

    let resolution = match ctx.options.strategy {
        Strategy::Anchored => resolve_marker_relative(token, ctx)
            .or_else(|| return resolve_workspace_absolute(token, ctx))
            .unwrap_or_else(|| return resolve_absolute_or_relative(token, ctx)),
        Strategy::Direct => resolve_absolute_or_relative(token, ctx),
    };

    debug!(
        token,
        rule = %resolution.rule,
        path = %resolution.path.display(),
        "resolved token"
    );
    return resolution;
}

/// Rule a: `/snippets/...` anchored at the nearest marker directory.
fn resolve_marker_relative(token: &str, ctx: &ResolutionContext<'_>) -> Option<Resolution> {
    let options = ctx.options;
    if options.marker_dir.is_empty() || !token.starts_with(options.marker_prefix.as_str()) {
        return None;
    }

    let marker = find_marker_dir(ctx.document_dir(), &options.marker_dir, ctx.fs)?;
    return Some(Resolution {
        path: normalize_path(&marker.join(token.trim_start_matches('/'))),
        rule: RootRule::Marker,
    });
}

/// Rule b: `/...` anchored at the first workspace root.
fn resolve_workspace_absolute(token: &str, ctx: &ResolutionContext<'_>) -> Option<Resolution> {
    if !token.starts_with('/') {
        return None;
    }
    let root = ctx.workspace_roots.first()?;
    return Some(Resolution {
        path: normalize_path(&root.join(token.trim_start_matches('/'))),
        rule: RootRule::Workspace,
    });
}

/// Rules c and d: absolute tokens unchanged, everything else document-relative.
fn resolve_absolute_or_relative(token: &str, ctx: &ResolutionContext<'_>) -> Resolution {
    let path = Path::new(token);
    if path.is_absolute() {
        return Resolution {
            path: path.to_path_buf(),
            rule: RootRule::Absolute,
        };
    }
    return Resolution {
        path: normalize_path(&ctx.document_dir().join(path)),
        rule: RootRule::Document,
    };
}

/// Walk up from `start` (inclusive) looking for a child directory named
/// `marker`. The filesystem root itself is never checked.
fn find_marker_dir(start: &Path, marker: &str, fs: &dyn FileSystem) -> Option<PathBuf> {
    let mut current = start;
    while let Some(parent) = current.parent() {
        let candidate = current.join(marker);
        trace!(candidate = %candidate.display(), "checking for marker directory");
        if fs.exists(&candidate) {
            return Some(candidate);
        }
        current = parent;
    }
    return None;
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// Preserves leading `..` when there is nothing left to pop, and never pops
/// past the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Handle a single path component during normalization.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => match components.last() {
            Some(Component::Normal(_)) => {
                components.pop();
            },
            Some(Component::RootDir | Component::Prefix(_)) => {},
            _ => components.push(component),
        },
        other => components.push(other),
    }
}
