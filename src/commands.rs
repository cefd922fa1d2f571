//! CLI commands for linkref: resolve, complete, address, check.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use linkref::config::Config;
use linkref::options::{Match, Want};
use linkref::scanner;
use linkref::types::{FoundLink, MismatchReasons};
use linkref::{Error, FileRef, FsProject, GitHubLinkResolver, LinkKind, LinkResolver as _, ProjectResolver as _};
use serde::Serialize;

use crate::diagnostics::{self, BrokenLink};

/// Project root, its config, and the indexed tree.
struct Workspace {
    /// Loaded `.linkref.toml`.
    config: Config,
    /// Indexed project.
    project: FsProject,
}

impl Workspace {
    /// Load config and index the tree under `root`.
    ///
    /// # Errors
    ///
    /// Returns config errors or `Error::Io` if the tree cannot be walked.
    fn open(root: &Path) -> Result<Self, Error> {
        let config = Config::load(root)?;
        let project = FsProject::open(root, &config)?;
        return Ok(Self { config, project });
    }

    /// Resolver for links written in `file`.
    fn resolver(&self, file: FileRef) -> GitHubLinkResolver<'_> {
        let resolver = GitHubLinkResolver::new(&self.project, file);
        return match self.config.branch() {
            Some(branch) => resolver.with_branch(branch),
            None => resolver,
        };
    }
}

/// Print the target `link` in `file` resolves to.
///
/// With `anchor`, `link` is taken whole as the address and `anchor` as its fragment.
///
/// # Errors
///
/// Returns errors from loading the project or locating `file`.
pub fn resolve(
    root: &Path,
    file: &Path,
    link: &str,
    anchor: Option<&str>,
    kind: LinkKind,
    want: Want,
) -> Result<ExitCode, Error> {
    let workspace = Workspace::open(root)?;
    let resolver = workspace.resolver(workspace.project.file_ref(file)?);

    let parsed = anchor.map_or_else(
        || return resolver.link(kind, link),
        |anchor| return resolver.link_with_anchor(kind, link, anchor),
    );
    let Some(target) = parsed.resolve(want) else {
        eprintln!("no match for `{link}` ({want})");
        return Ok(ExitCode::from(1));
    };
    println!("{target}");
    return Ok(ExitCode::SUCCESS);
}

/// Print every completion candidate for `prefix` in `file`.
///
/// # Errors
///
/// Returns errors from loading the project or locating `file`.
pub fn complete(root: &Path, file: &Path, prefix: &str, kind: LinkKind, want: Want) -> Result<(), Error> {
    let workspace = Workspace::open(root)?;
    let resolver = workspace.resolver(workspace.project.file_ref(file)?);

    for candidate in resolver.link(kind, prefix).multi_resolve(want | Match::Completion) {
        println!("{candidate}");
    }
    return Ok(());
}

/// Print the address to write in `file` to reach `target`.
///
/// # Errors
///
/// Returns errors from loading the project or locating either file.
pub fn address(
    root: &Path,
    file: &Path,
    target: &Path,
    kind: LinkKind,
    with_ext: bool,
    branch: Option<&str>,
) -> Result<(), Error> {
    let workspace = Workspace::open(root)?;
    let resolver = workspace.resolver(workspace.project.file_ref(file)?);
    let target = workspace.project.file_ref(target)?;

    println!("{}", resolver.link(kind, "").link_address(&target, with_ext, branch));
    return Ok(());
}

/// One broken link in `check --json` output.
#[derive(Serialize)]
struct BrokenLinkReport<'a> {
    /// The link as found.
    #[serde(flatten)]
    link: &'a FoundLink,
    /// Why the closest candidate does not match.
    reasons: Option<&'a MismatchReasons>,
    /// Address of the closest candidate.
    suggestion: Option<&'a str>,
}

/// Scan markdown files, resolve every link, report those that resolve to nothing.
///
/// # Errors
///
/// Returns errors from loading the project, reading markdown, or writing JSON.
pub fn check(root: &Path, json: bool) -> Result<ExitCode, Error> {
    let workspace = Workspace::open(root)?;
    let base = format!("{}/", workspace.project.project_base_path());
    let documents = workspace.project.project_file_list(Some(&["md"])).unwrap_or_default();

    let mut found: Vec<FoundLink> = Vec::new();
    let mut near_misses: Vec<Option<(String, MismatchReasons)>> = Vec::new();
    let mut total = 0_usize;

    for document in documents {
        let relative = document.file_path().strip_prefix(base.as_str()).unwrap_or(document.file_path()).to_string();
        if !workspace.config.should_scan(&relative) {
            continue;
        }
        let content = std::fs::read_to_string(document.file_path())?;
        let resolver = workspace.resolver(document);

        for link in scanner::extract_links(&content, &PathBuf::from(&relative)) {
            total = total.saturating_add(1);
            let parsed = resolver.link(link.kind, &link.address);
            if parsed.link_ref().is_external() || parsed.is_resolved(Want::new()) {
                continue;
            }
            tracing::debug!(source = %relative, address = %link.address, "broken link");
            near_misses.push(closest_candidate(&resolver, &link));
            found.push(link);
        }
    }

    let broken: Vec<BrokenLink<'_>> = found
        .iter()
        .zip(near_misses)
        .map(|(link, near_miss)| return BrokenLink { link, near_miss })
        .collect();

    if json {
        let reports: Vec<BrokenLinkReport<'_>> = broken
            .iter()
            .map(|b| {
                return BrokenLinkReport {
                    link: b.link,
                    reasons: b.near_miss.as_ref().map(|(_, reasons)| return reasons),
                    suggestion: b.near_miss.as_ref().map(|(address, _)| return address.as_str()),
                };
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else if broken.is_empty() {
        println!("All {total} links resolve");
    } else {
        diagnostics::print_markdown(&diagnostics::render_broken_links(&broken));
        println!("{} broken of {total} links", broken.len());
    }

    if broken.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    return Ok(ExitCode::from(1));
}

/// The loose match closest to a broken link, as an address, with the reasons it was missed.
fn closest_candidate(resolver: &GitHubLinkResolver<'_>, link: &FoundLink) -> Option<(String, MismatchReasons)> {
    let parsed = resolver.link(link.kind, &link.address);
    let candidate = parsed.multi_resolve(Want::new() | Match::Completion).into_iter().next()?;
    let target = FileRef::from(candidate);
    let reasons = parsed.analyze(&target).ok()?;
    let with_ext = link.kind != LinkKind::Wiki && parsed.link_ref().has_ext();
    let mut address = parsed.link_address(&target, with_ext, None);
    if let Some(anchor) = parsed.link_ref().anchor() {
        address.push('#');
        address.push_str(anchor);
    }
    return Some((address, reasons));
}
