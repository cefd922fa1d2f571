//! Existing files, with awareness of the GitHub wiki companion layout.

use std::ops::Deref;

use serde::Serialize;

use crate::path_info::PathInfo;
use crate::project::{ProjectResolver, RepoRoot};

/// Directory suffix marking a wiki clone.
pub const WIKI_DIR_SUFFIX: &str = ".wiki";

/// Name (without extension) of the wiki landing page.
pub const WIKI_HOME_PAGE: &str = "Home";

/// The path of an existing file, local or external.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FileRef {
    /// Path of the file.
    info: PathInfo,
}

impl FileRef {
    /// Wrap the path of an existing file.
    pub fn new(path: impl Into<String>) -> Self {
        return Self { info: PathInfo::new(path) };
    }

    /// The underlying path value.
    pub const fn path_info(&self) -> &PathInfo {
        return &self.info;
    }

    /// Root of the `<name>.wiki` directory this file lives in.
    ///
    /// Only directory segments count, so a file named `notes.wiki` is not its own wiki.
    pub fn wiki_dir(&self) -> Option<&str> {
        let dir = self.info.dir();
        let mut end = 0_usize;
        for segment in dir.split('/') {
            end = end.saturating_add(segment.len());
            if segment.len() > WIKI_DIR_SUFFIX.len() && segment.ends_with(WIKI_DIR_SUFFIX) {
                return dir.get(..end);
            }
            end = end.saturating_add(1);
        }
        return None;
    }

    /// Lies somewhere under a wiki directory.
    pub fn is_under_wiki_dir(&self) -> bool {
        return self.wiki_dir().is_some();
    }

    /// Markdown file under a wiki directory.
    pub fn is_wiki_page(&self) -> bool {
        return self.is_under_wiki_dir() && self.info.is_markdown_ext();
    }

    /// `Home.md` (any markdown extension) directly inside the wiki root.
    pub fn is_wiki_home_page(&self) -> bool {
        let Some(wiki_dir) = self.wiki_dir() else {
            return false;
        };
        let in_root = self.info.dir().strip_suffix('/') == Some(wiki_dir);
        return in_root && self.info.is_markdown_ext() && self.info.file_name_no_ext() == WIKI_HOME_PAGE;
    }

    /// Whether the project reports this file as version controlled.
    pub fn is_under_vcs(&self, project: &dyn ProjectResolver) -> bool {
        return project.is_under_vcs(self);
    }

    /// Repository root owning this file.
    pub fn vcs_root(&self, project: &dyn ProjectResolver) -> Option<RepoRoot> {
        return project.vcs_root(self);
    }
}

impl Deref for FileRef {
    type Target = PathInfo;

    fn deref(&self) -> &Self::Target {
        return &self.info;
    }
}

impl From<PathInfo> for FileRef {
    fn from(info: PathInfo) -> Self {
        return Self { info };
    }
}

/// Main repository directory for a wiki clone.
///
/// A wiki nested in its repository (`/src/repo/repo.wiki`) maps to the parent,
/// a sibling clone (`/src/repo.wiki`) maps to the same path without the suffix.
pub fn main_repo_dir_of_wiki(wiki_dir: &str) -> String {
    let wiki_dir = wiki_dir.trim_end_matches('/');
    let stem = wiki_dir.strip_suffix(WIKI_DIR_SUFFIX).unwrap_or(wiki_dir);
    let Some((parent, wiki_name)) = wiki_dir.rsplit_once('/') else {
        return stem.to_string();
    };
    let parent_name = parent.rsplit('/').next().unwrap_or(parent);
    if wiki_name.strip_suffix(WIKI_DIR_SUFFIX) == Some(parent_name) {
        return parent.to_string();
    }
    return stem.to_string();
}
