//! A project read from disk: walk the tree, find git checkouts and their GitHub remotes.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::Error;
use crate::file_ref::FileRef;
use crate::project::{InMemoryProject, ProjectResolver, RepoRoot};

/// `url = ...` of the `origin` remote in a git config file.
static ORIGIN_URL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    return Regex::new(r#"(?m)^\s*\[remote\s+"origin"\]\s*$(?:\n[^\[\n]*)*?\n\s*url\s*=\s*(\S+)"#).ok();
});

/// Project over a directory tree, indexed once when opened.
#[derive(Debug, Clone)]
pub struct FsProject {
    /// Index of the tree.
    index: InMemoryProject,
    /// Canonical project root.
    root: PathBuf,
}

impl FsProject {
    /// Walk `root`, recording files, git checkouts and their remotes.
    ///
    /// A configured `url` names the remote of the project root, which then counts as a
    /// repository even without a `.git` entry.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the root cannot be canonicalized or a directory cannot be read.
    pub fn open(root: &Path, config: &Config) -> Result<Self, Error> {
        let root = std::fs::canonicalize(root)?;
        let base = path_string(&root);
        let mut index = InMemoryProject::new(base.clone());
        let mut files: Vec<String> = Vec::new();

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| return !is_skipped(entry, &root, config));
        for entry in walker {
            let entry = entry.map_err(|e| return Error::Io(e.into()))?;
            let path = path_string(entry.path());

            if entry.file_type().is_dir() {
                let is_project_root = entry.path() == root;
                let remote = if is_project_root { config.url().map(str::to_string) } else { None };
                let has_git = entry.path().join(".git").exists();
                if has_git || remote.is_some() {
                    let url = remote.or_else(|| return origin_url(entry.path())).unwrap_or_default();
                    tracing::debug!(path = %path, url = %url, "found repository");
                    index = index.with_repo(RepoRoot::new(url, path));
                }
                continue;
            }
            files.push(path);
        }

        let untracked: Vec<String> = config.untracked().iter().map(|prefix| return format!("{base}/{prefix}")).collect();
        tracing::debug!(files = files.len(), root = %base, "indexed project");
        return Ok(Self {
            index: index.with_files(files).with_untracked(untracked),
            root,
        });
    }

    /// Existing file of this project named by `path`, relative to the working directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileNotFound` if the file does not exist,
    /// or `Error::NotInProject` if it lies outside the root.
    pub fn file_ref(&self, path: &Path) -> Result<FileRef, Error> {
        let full = std::fs::canonicalize(path).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "cannot canonicalize");
            return Error::FileNotFound { path: path.to_path_buf() };
        })?;
        if !full.starts_with(&self.root) {
            return Err(Error::NotInProject {
                path: full,
                root: self.root.clone(),
            });
        }
        return Ok(FileRef::new(path_string(&full)));
    }
}

impl ProjectResolver for FsProject {
    fn project_base_path(&self) -> &str {
        return self.index.project_base_path();
    }

    fn is_under_vcs(&self, file: &FileRef) -> bool {
        return self.index.is_under_vcs(file);
    }

    fn github_repo(&self, path: &str) -> Option<RepoRoot> {
        return self.index.github_repo(path);
    }

    fn vcs_root_for_url(&self, url: &str) -> Option<RepoRoot> {
        return self.index.vcs_root_for_url(url);
    }

    fn project_file_list(&self, extensions: Option<&[&str]>) -> Option<Vec<FileRef>> {
        return self.index.project_file_list(extensions);
    }
}

/// `.git` internals and configured exclusions are never walked.
fn is_skipped(entry: &DirEntry, root: &Path, config: &Config) -> bool {
    if entry.file_name() == ".git" {
        return true;
    }
    let Ok(relative) = entry.path().strip_prefix(root) else {
        return false;
    };
    let relative = path_string(relative);
    if relative.is_empty() {
        return false;
    }
    let as_dir = if entry.file_type().is_dir() { format!("{relative}/") } else { relative.clone() };
    return config.is_excluded(&relative) || config.is_excluded(&as_dir);
}

/// Forward-slash path text.
fn path_string(path: &Path) -> String {
    return path.to_string_lossy().replace('\\', "/");
}

/// GitHub address of the checkout's `origin` remote.
fn origin_url(checkout: &Path) -> Option<String> {
    let config_path = checkout.join(".git").join("config");
    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %config_path.display(), error = %e, "cannot read git config");
            return None;
        },
    };
    let pattern = ORIGIN_URL.as_ref()?;
    let remote = pattern.captures(&content)?.get(1)?.as_str();
    return github_base_url(remote);
}

/// Web address of a repository from any of its git remote forms.
///
/// `git@github.com:u/r.git`, `ssh://git@github.com/u/r`, `https://github.com/u/r.wiki.git`
/// all give `https://github.com/u/r`.
pub fn github_base_url(remote: &str) -> Option<String> {
    let remote = remote.trim().trim_end_matches('/');
    let remote = remote.strip_suffix(".git").unwrap_or(remote);
    let remote = remote.strip_suffix(".wiki").unwrap_or(remote);

    if let Some(rest) = remote.strip_prefix("ssh://") {
        let rest = rest.split_once('@').map_or(rest, |(_, host_path)| return host_path);
        return Some(format!("https://{rest}"));
    }
    if let Some(rest) = remote.strip_prefix("git@") {
        let (host, path) = rest.split_once(':')?;
        return Some(format!("https://{host}/{path}"));
    }
    if remote.starts_with("https://") || remote.starts_with("http://") {
        return Some(remote.to_string());
    }
    return None;
}
