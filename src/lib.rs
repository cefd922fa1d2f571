//! Resolve markdown links against a GitHub-style repository and its wiki.
//!
//! A [`GitHubLinkResolver`] is bound to one document. Links written in that document
//! are parsed with [`LinkResolver::link`] and then resolved to local files or
//! repository URLs, completed, or turned back into addresses:
//!
//! ```
//! use linkref::{FileRef, GitHubLinkResolver, InMemoryProject, LinkKind, LinkResolver, RepoRoot, Want};
//!
//! let project = InMemoryProject::new("/repo")
//!     .with_repo(RepoRoot::new("https://github.com/user/repo", "/repo"))
//!     .with_files(["/repo/Readme.md", "/repo/docs/Guide.md"]);
//! let resolver = GitHubLinkResolver::new(&project, FileRef::new("/repo/Readme.md"));
//!
//! let target = resolver.link(LinkKind::Plain, "docs/Guide").resolve(Want::new());
//! assert_eq!(target.map(|t| t.to_string()).as_deref(), Some("/repo/docs/Guide.md"));
//! ```

pub mod config;
pub mod error;
pub mod file_ref;
pub mod github;
pub mod link_ref;
pub mod matcher;
pub mod options;
pub mod path_info;
pub mod project;
pub mod resolver;
pub mod scanner;
pub mod types;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use error::Error;
pub use file_ref::FileRef;
pub use github::GitHubLinkResolver;
pub use link_ref::{LinkKind, LinkRef};
pub use matcher::{LinkRefMatcher, SearchDir};
pub use options::{Links, Local, Match, Remote, Want};
pub use path_info::PathInfo;
pub use project::{InMemoryProject, ProjectResolver, RepoRoot};
pub use resolver::{Context, Link, LinkResolver};
pub use types::{FoundLink, MismatchReason, MismatchReasons};
pub use workspace::FsProject;
