//! Token patterns: the grammar that decides which parts of a line are paths.
//!
//! Patterns run in priority order. Each one sweeps the whole line on its
//! own; results are concatenated, never merged, so overlapping spans from
//! different patterns all survive and priority settles position lookups.

use regex::Regex;

use crate::error::Error;
use crate::types::TokenMatch;

/// Built-in token shapes as `(regex, capture group)`, highest priority first.
pub const BUILTIN_PATTERNS: [(&str, usize); 3] = [
    // src="image.png" or src='image.png'
    (r#"src=["']([^"']+\.[a-zA-Z0-9]+)["']"#, 1),
    // src={image.png}
    (r"src=\{([^}]+\.[a-zA-Z0-9]+)\}", 1),
    // bare ./guide.md or page.mdx
    (r#"([^\s"'`()\[\]{}]+\.mdx?)\b"#, 1),
];

/// One syntactic shape that can contain a path.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    /// Capture group holding the path itself.
    group: usize,
    /// Compiled expression for the whole shape.
    regex: Regex,
}

impl TokenPattern {
    /// Compile a pattern whose path lives in capture group `group`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if the regex does not compile or has
    /// no capture group with that index.
    pub fn new(pattern: &str, group: usize) -> Result<Self, Error> {
        let regex = Regex::new(pattern).map_err(|e| {
            return Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            };
        })?;

        if group >= regex.captures_len() {
            return Err(Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: format!("no capture group {group}"),
            });
        }

        return Ok(Self { group, regex });
    }

    /// Capture group holding the path.
    pub const fn group(&self) -> usize {
        return self.group;
    }

    /// Source text of the underlying regex.
    pub fn as_str(&self) -> &str {
        return self.regex.as_str();
    }

    /// All non-overlapping occurrences in `line`, left to right.
    /// Each call starts a fresh sweep; no position is carried between calls.
    pub fn matches<'a>(&'a self, line: &'a str) -> impl Iterator<Item = TokenMatch> + 'a {
        let group = self.group;
        return self.regex.captures_iter(line).filter_map(move |caps| {
            let path = caps.get(group)?;
            return Some(TokenMatch {
                end: path.end(),
                raw: path.as_str().to_string(),
                start: path.start(),
            });
        });
    }
}

/// An ordered, non-empty list of token patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    /// Patterns in priority order.
    patterns: Vec<TokenPattern>,
}

impl PatternSet {
    /// Compile the built-in grammar: quoted `src`, braced `src`, bare `.md`/`.mdx`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if a built-in pattern fails to compile.
    pub fn builtin() -> Result<Self, Error> {
        let patterns = BUILTIN_PATTERNS
            .iter()
            .map(|(pattern, group)| return TokenPattern::new(pattern, *group))
            .collect::<Result<Vec<_>, _>>()?;
        return Self::new(patterns);
    }

    /// Build a set from patterns already in priority order.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyPatternList` if `patterns` is empty.
    pub fn new(patterns: Vec<TokenPattern>) -> Result<Self, Error> {
        if patterns.is_empty() {
            return Err(Error::EmptyPatternList);
        }
        return Ok(Self { patterns });
    }

    /// Every match of every pattern, grouped by pattern priority and then
    /// ordered by position. Overlaps across patterns are kept.
    pub fn find_matches(&self, line: &str) -> Vec<TokenMatch> {
        return self.patterns.iter().flat_map(|p| return p.matches(line)).collect();
    }

    /// The first match, in `find_matches` order, whose span contains
    /// `offset` inclusively at both ends.
    pub fn find_match_at_offset(&self, line: &str, offset: usize) -> Option<TokenMatch> {
        return self
            .patterns
            .iter()
            .flat_map(|p| return p.matches(line))
            .find(|m| return m.contains_offset(offset));
    }

    /// Patterns in priority order.
    pub fn patterns(&self) -> &[TokenPattern] {
        return &self.patterns;
    }
}
