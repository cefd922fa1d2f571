use std::path::Path;

use crate::error::Error;

/// Name of the optional configuration file at the project root.
pub const CONFIG_FILE: &str = ".linkref.toml";

/// Project configuration loaded from `.linkref.toml`.
/// Include/exclude/untracked entries are path prefixes relative to the project root.
#[derive(Debug, Default)]
pub struct Config {
    /// Branch or tag used in repository addresses.
    branch: Option<String>,
    /// Prefixes never enumerated.
    exclude: Vec<String>,
    /// Prefixes scanned by `check`; empty scans everything.
    include: Vec<String>,
    /// Prefixes reported as not under version control.
    untracked: Vec<String>,
    /// Repository address overriding the git remote.
    url: Option<String>,
}

/// Raw TOML structure for `.linkref.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct LinkrefTomlConfig {
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    untracked: Vec<String>,
    #[serde(default)]
    url: Option<String>,
}

impl Config {
    /// Load config from `.linkref.toml` in the given root directory.
    /// Returns a default that scans everything if the file doesn't exist.
    /// A file that exists but is malformed is an error, never a silent default.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: LinkrefTomlConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        return Ok(Self {
            branch: raw.branch,
            exclude: raw.exclude,
            include: raw.include,
            untracked: raw.untracked,
            url: raw.url,
        });
    }

    /// Branch or tag for repository addresses, if configured.
    pub fn branch(&self) -> Option<&str> {
        return self.branch.as_deref();
    }

    /// Repository address overriding the detected git remote.
    pub fn url(&self) -> Option<&str> {
        return self.url.as_deref();
    }

    /// Untracked prefixes, relative to the root.
    pub fn untracked(&self) -> &[String] {
        return &self.untracked;
    }

    /// Whether a relative path is excluded from enumeration.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        return self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }

    /// Check whether a markdown file path should be scanned for links.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then dropped if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        return included && !self.is_excluded(relative_path);
    }
}
