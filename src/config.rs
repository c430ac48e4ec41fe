use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::resolver::{DEFAULT_MARKER_DIR, DEFAULT_MARKER_PREFIX, ResolveOptions, Strategy, normalize_path};
use crate::toggle::LinkToggle;

/// File name of the project config, looked up in the working directory.
pub const CONFIG_FILE: &str = ".pathlink.toml";

/// Project configuration loaded from `.pathlink.toml`.
/// Include/exclude patterns are path prefixes applied to scanned documents.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path prefixes excluded from directory scans.
    exclude: Vec<String>,
    /// Path prefixes a scanned document must match, if any are set.
    include: Vec<String>,
    /// Persisted link-scanning state.
    pub links: LinkToggle,
    /// Root rules and marker settings for the resolver.
    pub resolve: ResolveOptions,
    /// Configured workspace roots, already absolute.
    pub workspace_roots: Vec<PathBuf>,
}

/// Raw TOML structure for `.pathlink.toml`.
#[derive(serde::Deserialize)]
struct PathlinkTomlConfig {
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
    links: Option<bool>,
    marker_dir: Option<String>,
    marker_prefix: Option<String>,
    strategy: Option<Strategy>,
    #[serde(default)]
    workspace_roots: Vec<PathBuf>,
}

impl Config {
    /// Load config from `.pathlink.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. A file that exists but is
    /// malformed is an error, never a silent fallback.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// `Error::TomlDe` if the TOML is malformed, or `Error::ConfigInvalid`
    /// if a value is unusable.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: PathlinkTomlConfig = toml::from_str(&content)?;
        return Self::from_raw(raw, root, &path);
    }

    /// Default config: links on, anchored resolution, no filters.
    pub fn defaults() -> Self {
        return Self {
            exclude: Vec::new(),
            include: Vec::new(),
            links: LinkToggle::default(),
            resolve: ResolveOptions::default(),
            workspace_roots: Vec::new(),
        };
    }

    /// Validate raw TOML values and anchor relative roots at `root`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigInvalid` if the marker settings are unusable.
    fn from_raw(raw: PathlinkTomlConfig, root: &Path, path: &Path) -> Result<Self, Error> {
        let marker_prefix = raw.marker_prefix.unwrap_or_else(|| return DEFAULT_MARKER_PREFIX.to_string());
        if !marker_prefix.starts_with('/') {
            return Err(Error::ConfigInvalid {
                path: path.to_path_buf(),
                reason: format!("marker_prefix `{marker_prefix}` must start with `/`"),
            });
        }

        let marker_dir = raw.marker_dir.unwrap_or_else(|| return DEFAULT_MARKER_DIR.to_string());
        if marker_dir.contains('/') {
            return Err(Error::ConfigInvalid {
                path: path.to_path_buf(),
                reason: format!("marker_dir `{marker_dir}` must be a single directory name"),
            });
        }

        let workspace_roots = raw
            .workspace_roots
            .iter()
            .map(|r| return normalize_path(&root.join(r)))
            .collect();

        return Ok(Self {
            exclude: raw.exclude,
            include: raw.include,
            links: LinkToggle::new(raw.links.unwrap_or(true)),
            resolve: ResolveOptions {
                marker_dir,
                marker_prefix,
                strategy: raw.strategy.unwrap_or_default(),
            },
            workspace_roots,
        });
    }

    /// Check whether a document path should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}

/// Persist the link toggle into `.pathlink.toml`, keeping the rest of the
/// file's layout and comments intact. Creates the file if needed.
///
/// # Errors
///
/// Returns `Error::TomlEdit` if the existing file can't be parsed,
/// or `Error::Io` if reading or writing fails.
pub fn write_links_enabled(root: &Path, enabled: bool) -> Result<(), Error> {
    let config_path = root.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::Io(e)),
    };

    let mut doc: toml_edit::DocumentMut = content.parse()?;
    doc["links"] = toml_edit::value(enabled);

    std::fs::write(&config_path, doc.to_string())?;
    return Ok(());
}
