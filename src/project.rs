//! The project collaborator: version control roots, repository URLs and the file index.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;

use crate::file_ref::{FileRef, WIKI_DIR_SUFFIX, WIKI_HOME_PAGE, main_repo_dir_of_wiki};
use crate::path_info::{IMAGE_EXTENSIONS, MARKDOWN_EXTENSIONS, encode_link_chars};

/// Branch used for repository addresses when none is given.
pub const DEFAULT_BRANCH: &str = "master";

/// Repository pages listed as completion candidates next to files.
const REPO_PAGES: &[&str] = &["fork", "graphs", "issues", "labels", "milestones", "pulls", "pulse"];

/// Everything the resolver needs to know about the project around a document.
///
/// Implementations own the file index and its synchronization; the resolver only reads.
pub trait ProjectResolver: Send + Sync {
    /// Root directory of the project.
    fn project_base_path(&self) -> &str;

    /// Whether the file is tracked by version control.
    fn is_under_vcs(&self, file: &FileRef) -> bool;

    /// Whether the tracked file is also pushed. Defaults to [`Self::is_under_vcs`].
    fn is_under_vcs_synced(&self, file: &FileRef) -> bool {
        return self.is_under_vcs(file);
    }

    /// Repository owning `path`, the innermost one when repositories nest.
    fn github_repo(&self, path: &str) -> Option<RepoRoot>;

    /// Repository whose remote address space contains `url`.
    fn vcs_root_for_url(&self, url: &str) -> Option<RepoRoot>;

    /// Repository owning the file.
    fn vcs_root(&self, file: &FileRef) -> Option<RepoRoot> {
        return self.github_repo(file.file_path());
    }

    /// Main repository directory for the file, also for files of a wiki clone.
    fn vcs_repo_base_path(&self, file: &FileRef) -> Option<String> {
        return self.vcs_root(file).map(|root| return root.main_repo_base_dir());
    }

    /// Directory of the repository owning the file.
    fn vcs_root_base(&self, file: &FileRef) -> Option<String> {
        return self.vcs_root(file).map(|root| return root.base_path().to_string());
    }

    /// Project files with any of `extensions`, or all files for `None`.
    ///
    /// An extension from the markdown or image class selects the whole class.
    fn project_file_list(&self, extensions: Option<&[&str]>) -> Option<Vec<FileRef>>;

    /// Files of the given types whose path matches `pattern`.
    fn files_matching(&self, extensions: &[&str], pattern: &Regex) -> Vec<FileRef> {
        if extensions.is_empty() {
            return Vec::new();
        }
        return self
            .project_file_list(Some(extensions))
            .unwrap_or_default()
            .into_iter()
            .filter(|file| return pattern.is_match(file.file_path()))
            .collect();
    }
}

/// A GitHub repository checked out at `base_path`, or its wiki clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoRoot {
    /// Checkout directory without trailing slash.
    base_path: String,
    /// `https://github.com/<user>/<repo>` without trailing slash.
    base_url: String,
}

impl RepoRoot {
    /// A repository at `base_path` published at `base_url`.
    pub fn new(base_url: impl Into<String>, base_path: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        let base_path: String = base_path.into();
        return Self {
            base_path: base_path.replace('\\', "/").trim_end_matches('/').to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        };
    }

    /// Checkout directory.
    pub fn base_path(&self) -> &str {
        return &self.base_path;
    }

    /// Repository web address.
    pub fn base_url(&self) -> &str {
        return &self.base_url;
    }

    /// This checkout is a `<repo>.wiki` clone.
    pub fn is_wiki(&self) -> bool {
        return self.base_path.ends_with(WIKI_DIR_SUFFIX);
    }

    /// Directory of the main repository this root belongs to.
    pub fn main_repo_base_dir(&self) -> String {
        if self.is_wiki() {
            return main_repo_dir_of_wiki(&self.base_path);
        }
        return self.base_path.clone();
    }

    /// Path of `file` relative to this root, when the file is inside it.
    pub fn relative_path<'f>(&self, file: &'f FileRef) -> Option<&'f str> {
        let rest = file.file_path().strip_prefix(self.base_path.as_str())?;
        return rest.strip_prefix('/');
    }

    /// Web address of `file`: `blob` (or `raw`) URLs in the main repository, page URLs in the wiki.
    ///
    /// `with_ext` keeps the extension of main repository files; wiki markdown pages
    /// never carry one. `anchor` is appended as a fragment.
    pub fn url_for(
        &self,
        file: &FileRef,
        with_ext: bool,
        anchor: Option<&str>,
        branch_or_tag: Option<&str>,
    ) -> Option<String> {
        let mut url = self.file_url(file, "blob", branch_or_tag, with_ext)?;
        if let Some(anchor) = anchor {
            url.push('#');
            url.push_str(anchor);
        }
        return Some(url);
    }

    /// Raw content address of `file`, as used for images.
    pub fn raw_url_for(&self, file: &FileRef, branch_or_tag: Option<&str>) -> Option<String> {
        return self.file_url(file, "raw", branch_or_tag, true);
    }

    /// Address of `file` under the `link_type` view (`blob` or `raw`).
    fn file_url(
        &self,
        file: &FileRef,
        link_type: &str,
        branch_or_tag: Option<&str>,
        with_ext: bool,
    ) -> Option<String> {
        let relative = self.relative_path(file)?;
        let base = &self.base_url;

        if self.is_wiki() {
            if file.is_markdown_ext() && relative.rsplit_once('.').map(|(stem, _)| return stem) == Some(WIKI_HOME_PAGE) {
                return Some(format!("{base}/wiki"));
            }
            let name = if file.is_markdown_ext() { file.file_name_no_ext() } else { file.file_name() };
            return Some(format!("{base}/wiki/{}", encode_link_chars(name)));
        }

        let branch = branch_or_tag.unwrap_or(DEFAULT_BRANCH);
        let path = if with_ext || !file.has_ext() {
            relative
        } else {
            relative.rsplit_once('.').map_or(relative, |(stem, _)| return stem)
        };
        return Some(format!("{base}/{link_type}/{branch}/{}", encode_link_chars(path)));
    }

    /// The repository's own pages offered alongside files in completion.
    pub fn repo_page_urls(&self) -> Vec<String> {
        return REPO_PAGES.iter().map(|page| return format!("{}/{page}", self.base_url)).collect();
    }

    /// Whether `url` points into this repository's web address space.
    pub fn owns_url(&self, url: &str) -> bool {
        let Some(rest) = url.strip_prefix(self.base_url.as_str()) else {
            return false;
        };
        let is_wiki_url = rest == "/wiki" || rest.starts_with("/wiki/") || rest.starts_with("/wiki#");
        if self.is_wiki() {
            return is_wiki_url;
        }
        return !is_wiki_url && (rest.is_empty() || rest.starts_with('/'));
    }
}

/// Expand extensions so one member of a class selects the whole class.
pub fn expand_extension_classes(extensions: &[&str]) -> HashSet<String> {
    let mut set = HashSet::new();
    for ext in extensions {
        let clean = ext.trim_start_matches('.').to_lowercase();
        if MARKDOWN_EXTENSIONS.contains(&clean.as_str()) {
            set.extend(MARKDOWN_EXTENSIONS.iter().map(|e| return (*e).to_string()));
        } else if IMAGE_EXTENSIONS.contains(&clean.as_str()) {
            set.extend(IMAGE_EXTENSIONS.iter().map(|e| return (*e).to_string()));
        } else {
            set.insert(clean);
        }
    }
    return set;
}

/// A project held entirely in memory: a file list and the repositories that own it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProject {
    /// Project root.
    base_path: String,
    /// Project files, in enumeration order.
    files: Vec<FileRef>,
    /// Known repositories.
    roots: Vec<RepoRoot>,
    /// Paths reported as not version controlled.
    untracked: HashSet<String>,
}

impl InMemoryProject {
    /// An empty project rooted at `base_path`.
    pub fn new(base_path: impl Into<String>) -> Self {
        let base_path: String = base_path.into();
        return Self {
            base_path: base_path.replace('\\', "/").trim_end_matches('/').to_string(),
            ..Self::default()
        };
    }

    /// Add a repository root.
    #[must_use]
    pub fn with_repo(mut self, root: RepoRoot) -> Self {
        self.roots.push(root);
        return self;
    }

    /// Add files to the index.
    #[must_use]
    pub fn with_files<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(paths.into_iter().map(FileRef::new));
        return self;
    }

    /// Mark files or directory prefixes as not version controlled.
    #[must_use]
    pub fn with_untracked<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.untracked.extend(paths.into_iter().map(Into::into));
        return self;
    }

    /// Whether `path` is listed as untracked, directly or through a directory prefix.
    fn is_untracked(&self, path: &str) -> bool {
        return self.untracked.iter().any(|u| {
            return path == u || (u.ends_with('/') && path.starts_with(u.as_str()));
        });
    }
}

impl ProjectResolver for InMemoryProject {
    fn project_base_path(&self) -> &str {
        return &self.base_path;
    }

    fn is_under_vcs(&self, file: &FileRef) -> bool {
        return self.github_repo(file.file_path()).is_some() && !self.is_untracked(file.file_path());
    }

    fn github_repo(&self, path: &str) -> Option<RepoRoot> {
        return self
            .roots
            .iter()
            .filter(|root| {
                let base = root.base_path();
                return path == base || path.strip_prefix(base).is_some_and(|rest| return rest.starts_with('/'));
            })
            .max_by_key(|root| return root.base_path().len())
            .cloned();
    }

    fn vcs_root_for_url(&self, url: &str) -> Option<RepoRoot> {
        return self.roots.iter().find(|root| return root.owns_url(url)).cloned();
    }

    fn project_file_list(&self, extensions: Option<&[&str]>) -> Option<Vec<FileRef>> {
        let Some(extensions) = extensions else {
            return Some(self.files.clone());
        };
        let wanted = expand_extension_classes(extensions);
        return Some(
            self.files
                .iter()
                .filter(|file| return wanted.contains(&file.ext()))
                .cloned()
                .collect(),
        );
    }
}
