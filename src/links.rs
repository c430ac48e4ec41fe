//! Host-facing link operations: bulk link scanning and the cursor lookup.
//!
//! Both compose the pattern matcher with the resolver and then gate on
//! existence. Scanning treats a missing target as "not a link"; the cursor
//! lookup reports it, naming the path it tried.

use tracing::debug;

use crate::error::Error;
use crate::patterns::PatternSet;
use crate::resolver::{ResolutionContext, resolve};
use crate::types::{DocumentLink, LinkRange, Resolution};

/// A cursor position: zero-based line index and byte column within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Byte offset within the line.
    pub column: usize,
    /// Zero-based line index.
    pub line: usize,
}

/// Every link on one line whose target exists, in pattern-priority order.
pub fn scan_line_for_links(
    patterns: &PatternSet,
    line: &str,
    line_index: usize,
    ctx: &ResolutionContext<'_>,
) -> Vec<DocumentLink> {
    return patterns
        .find_matches(line)
        .into_iter()
        .map(|m| return (resolve(&m.raw, ctx), m))
        .filter(|(resolution, m)| {
            let exists = ctx.fs.exists(&resolution.path);
            if !exists {
                debug!(token = %m.raw, path = %resolution.path.display(), "dropping link to missing file");
            }
            return exists;
        })
        .map(|(resolution, m)| {
            return DocumentLink {
                range: LinkRange {
                    end: m.end,
                    line: line_index,
                    start: m.start,
                },
                raw: m.raw,
                rule: resolution.rule,
                target: resolution.path,
            };
        })
        .collect();
}

/// Scan every line of a document. Line indices follow `str::lines`.
pub fn scan_document(
    patterns: &PatternSet,
    text: &str,
    ctx: &ResolutionContext<'_>,
) -> Vec<DocumentLink> {
    return text
        .lines()
        .enumerate()
        .flat_map(|(index, line)| return scan_line_for_links(patterns, line, index, ctx))
        .collect();
}

/// Resolve the token under the cursor and require that it exists.
///
/// # Errors
///
/// Returns `Error::NoTokenAtCursor` if the cursor is not on any token, or
/// `Error::PathNotFound` carrying the attempted path if the target is missing.
pub fn resolve_token_at_cursor(
    patterns: &PatternSet,
    line: &str,
    cursor: Cursor,
    ctx: &ResolutionContext<'_>,
) -> Result<Resolution, Error> {
    let Some(token) = patterns.find_match_at_offset(line, cursor.column) else {
        return Err(Error::NoTokenAtCursor {
            column: cursor.column,
            line: cursor.line,
        });
    };

    let resolution = resolve(&token.raw, ctx);
    if !ctx.fs.exists(&resolution.path) {
        return Err(Error::PathNotFound {
            path: resolution.path,
            rule: resolution.rule,
        });
    }
    return Ok(resolution);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::indexing_slicing, reason = "tests")]
mod tests {
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::resolver::{FileSystem, ResolveOptions};
    use crate::types::RootRule;

    struct FakeFs(HashSet<PathBuf>);

    impl FileSystem for FakeFs {
        fn exists(&self, path: &Path) -> bool {
            self.0.contains(path)
        }
    }

    fn fake(paths: &[&str]) -> FakeFs {
        FakeFs(paths.iter().map(PathBuf::from).collect())
    }

    fn with_ctx<T>(document: &str, fs: &FakeFs, f: impl FnOnce(&ResolutionContext<'_>) -> T) -> T {
        let options = ResolveOptions::default();
        let roots = vec![PathBuf::from("/proj")];
        let ctx = ResolutionContext {
            document: Path::new(document),
            options: &options,
            fs,
            workspace_roots: &roots,
        };
        f(&ctx)
    }

    #[test]
    fn scan_keeps_only_existing_targets() {
        let patterns = PatternSet::builtin().unwrap();
        let fs = fake(&["/proj/src/docs/guide.md"]);
        let line = "See [guide](./docs/guide.md) and [gone](./gone.md).";
        let links = with_ctx("/proj/src/page.mdx", &fs, |ctx| scan_line_for_links(&patterns, line, 3, ctx));

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, PathBuf::from("/proj/src/docs/guide.md"));
        assert_eq!(links[0].range, LinkRange { end: 27, line: 3, start: 12 });
        assert_eq!(links[0].rule, RootRule::Document);
    }

    #[test]
    fn every_scanned_target_exists() {
        let patterns = PatternSet::builtin().unwrap();
        let fs = fake(&["/proj/a.md", "/proj/img/x.png", "/proj/fern", "/proj/fern/snippets/s.mdx"]);
        let text = "a.md b.md\n<img src=\"img/x.png\" />\n<Snippet src=\"/snippets/s.mdx\" />\n";
        let links = with_ctx("/proj/index.mdx", &fs, |ctx| scan_document(&patterns, text, ctx));

        assert!(links.iter().all(|l| fs.exists(&l.target)));
        let lines: Vec<usize> = links.iter().map(|l| l.range.line).collect();
        assert_eq!(lines, vec![0, 1, 2, 2]);
    }

    #[test]
    fn scan_reports_overlapping_matches_from_each_pattern() {
        let patterns = PatternSet::builtin().unwrap();
        let fs = fake(&["/proj/intro.mdx"]);
        let line = r#"<Snippet src="intro.mdx" />"#;
        let links = with_ctx("/proj/page.mdx", &fs, |ctx| scan_line_for_links(&patterns, line, 0, ctx));
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].range, links[1].range);
    }

    #[test]
    fn cursor_on_existing_token_resolves() {
        let patterns = PatternSet::builtin().unwrap();
        let fs = fake(&["/proj/src/docs/guide.md"]);
        let line = "See [guide](./docs/guide.md) for details.";
        let cursor = Cursor { column: 27, line: 0 };
        let resolution = with_ctx("/proj/src/page.mdx", &fs, |ctx| {
            resolve_token_at_cursor(&patterns, line, cursor, ctx)
        })
        .unwrap();
        assert_eq!(resolution.path, PathBuf::from("/proj/src/docs/guide.md"));
    }

    #[test]
    fn cursor_off_token_is_no_token() {
        let patterns = PatternSet::builtin().unwrap();
        let fs = fake(&[]);
        let cursor = Cursor { column: 1, line: 4 };
        let err = with_ctx("/proj/page.mdx", &fs, |ctx| {
            resolve_token_at_cursor(&patterns, "See [guide](./guide.md)", cursor, ctx)
        })
        .unwrap_err();
        assert!(matches!(err, Error::NoTokenAtCursor { line: 4, column: 1 }));
    }

    #[test]
    fn cursor_on_missing_target_names_attempted_path() {
        let patterns = PatternSet::builtin().unwrap();
        let fs = fake(&[]);
        let cursor = Cursor { column: 3, line: 0 };
        let err = with_ctx("/proj/docs/page.mdx", &fs, |ctx| {
            resolve_token_at_cursor(&patterns, "/intro.md", cursor, ctx)
        })
        .unwrap_err();
        match err {
            Error::PathNotFound { path, rule } => {
                assert_eq!(path, PathBuf::from("/proj/intro.md"));
                assert_eq!(rule, RootRule::Workspace);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_target_is_dropped_from_scan_but_reported_by_cursor() {
        let patterns = PatternSet::builtin().unwrap();
        let fs = fake(&[]);
        let line = "next.md";
        let links = with_ctx("/proj/a.md", &fs, |ctx| scan_line_for_links(&patterns, line, 0, ctx));
        assert!(links.is_empty());

        let cursor = Cursor { column: 0, line: 0 };
        let err = with_ctx("/proj/a.md", &fs, |ctx| resolve_token_at_cursor(&patterns, line, cursor, ctx));
        assert!(err.unwrap_err().is_not_found());
    }
}
