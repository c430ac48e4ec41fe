/// Core domain types for pathlink matches, resolutions, and links.
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A candidate path token found in a single line of text.
/// `raw == line[start..end]` holds by construction: offsets come straight
/// from a regex capture over that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    /// Byte offset one past the last byte of the token.
    pub end: usize,
    /// The token text exactly as it appears in the line.
    pub raw: String,
    /// Byte offset of the first byte of the token.
    pub start: usize,
}

impl TokenMatch {
    /// Inclusive containment: an offset resting just after the last
    /// character still selects the token.
    pub const fn contains_offset(&self, offset: usize) -> bool {
        return self.start <= offset && offset <= self.end;
    }
}

/// Which root rule turned a token into an absolute path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootRule {
    /// Token was already absolute and returned unchanged.
    Absolute,
    /// Token was joined to the containing document's directory.
    Document,
    /// Token carried the marker prefix and was anchored at a marker directory.
    Marker,
    /// Token started with `/` and was anchored at the first workspace root.
    Workspace,
}

impl fmt::Display for RootRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Absolute => "absolute path",
            Self::Document => "relative to document",
            Self::Marker => "marker directory",
            Self::Workspace => "workspace root",
        };
        return f.write_str(label);
    }
}

/// Output of path resolution: an absolute path and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Absolute, lexically normalized target path.
    pub path: PathBuf,
    /// Rule that produced `path`.
    pub rule: RootRule,
}

/// Location of a link within a document. Line is zero-based, columns are
/// byte offsets within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkRange {
    /// Byte offset one past the end of the link text.
    pub end: usize,
    /// Zero-based line index.
    pub line: usize,
    /// Byte offset of the start of the link text.
    pub start: usize,
}

/// A clickable region whose target is known to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentLink {
    /// Where the link sits in the document.
    #[serde(flatten)]
    pub range: LinkRange,
    /// Token text the link was built from.
    pub raw: String,
    /// Rule that produced the target.
    pub rule: RootRule,
    /// Absolute path of the existing target.
    pub target: PathBuf,
}
