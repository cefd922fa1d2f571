//! Resolution context shared by every resolver: classify, gather, filter, format.
//!
//! A resolver is bound to the document its links come from. Links are obtained
//! through [`LinkResolver::link`], which parses the address against that same
//! document, so a link from one document can never be resolved by a resolver
//! bound to another.

use regex::Regex;

use crate::error::Error;
use crate::file_ref::{FileRef, WIKI_DIR_SUFFIX};
use crate::link_ref::{LinkKind, LinkRef};
use crate::matcher::{LinkRefMatcher, SearchDir};
use crate::options::Want;
use crate::path_info::PathInfo;
use crate::project::ProjectResolver;
use crate::types::MismatchReasons;

/// Per-call state handed to resolver hooks.
///
/// Only a [`Link`] can build one, which ties the link to the resolver's document.
#[derive(Clone, Copy)]
pub struct Context<'c> {
    /// Candidate list supplied by the caller instead of the project index.
    in_list: Option<&'c [PathInfo]>,
    /// The link being resolved.
    link_ref: &'c LinkRef,
    /// Project around the document.
    project: Option<&'c dyn ProjectResolver>,
    /// Requested output.
    want: Want,
}

impl<'c> Context<'c> {
    /// The link being resolved.
    pub const fn link_ref(&self) -> &'c LinkRef {
        return self.link_ref;
    }

    /// Requested output.
    pub const fn want(&self) -> Want {
        return self.want;
    }

    /// Caller-supplied candidates, if resolution is restricted to them.
    pub const fn in_list(&self) -> Option<&'c [PathInfo]> {
        return self.in_list;
    }

    /// Project around the document.
    pub fn project(&self) -> Option<&'c dyn ProjectResolver> {
        return self.project;
    }

    /// Extensions of the files this link may target.
    pub fn accepted_extensions(&self) -> &'static [&'static str] {
        return self.link_ref.accepted_extensions();
    }

    /// Directory searched by wiki links.
    ///
    /// Inside a wiki that is the wiki root. From a main repository document it is
    /// the repository's wiki clone when the project knows one.
    pub fn wiki_root(&self) -> Option<String> {
        let containing = self.link_ref.containing_file();
        if let Some(dir) = containing.wiki_dir() {
            return Some(dir.to_string());
        }
        let project = self.project?;
        let main = project.vcs_repo_base_path(containing)?;
        let name = main.rsplit('/').next().unwrap_or(&main);
        let nested = format!("{main}/{name}{WIKI_DIR_SUFFIX}");
        let sibling = format!("{main}{WIKI_DIR_SUFFIX}");
        return [nested, sibling].into_iter().find(|candidate| {
            return project.github_repo(candidate).is_some_and(|root| return root.is_wiki());
        });
    }

    /// Candidate pattern for the link, loose in completion mode.
    pub fn pattern(&self) -> Option<Regex> {
        return self.pattern_in(None);
    }

    /// Like [`Self::pattern`], searching `search_dir` instead of the directory the
    /// link names relative to its document.
    pub fn pattern_in(&self, search_dir: Option<SearchDir>) -> Option<Regex> {
        let wiki_root = match self.link_ref.kind() {
            LinkKind::Wiki => self.wiki_root(),
            LinkKind::Image | LinkKind::Plain => None,
        };
        let base = self.project.map(|p| return p.project_base_path());
        return LinkRefMatcher::new(self.link_ref, base, self.want.is_completion())
            .with_wiki_root(wiki_root.as_deref())
            .with_search_dir(search_dir)
            .pattern_regex();
    }

    /// Files whose path matches `pattern`.
    ///
    /// Searches the supplied candidate list when there is one, skipping its external
    /// entries, otherwise the project's files of the accepted types. Wiki matches
    /// are sorted so the first one is stable.
    pub fn matched_files(&self, pattern: &Regex) -> Vec<FileRef> {
        let mut matches: Vec<FileRef> = match self.in_list {
            Some(list) => list
                .iter()
                .filter(|info| return info.is_local() && pattern.is_match(info.file_path()))
                .map(|info| return FileRef::from(info.clone()))
                .collect(),
            None => {
                let extensions = self.accepted_extensions();
                match self.project {
                    Some(project) if !extensions.is_empty() => project.files_matching(extensions, pattern),
                    Some(_) | None => Vec::new(),
                }
            },
        };

        if self.link_ref.kind() == LinkKind::Wiki && matches.len() > 1 {
            matches.sort();
        }
        tracing::debug!(
            link = self.link_ref.full_path(),
            want = %self.want,
            count = matches.len(),
            "matched candidate files"
        );
        return matches;
    }
}

/// A resolver bound to one containing document.
///
/// Implementors supply the formatting hooks; callers go through [`Link`].
pub trait LinkResolver {
    /// The document every link of this resolver comes from.
    fn containing_file(&self) -> &FileRef;

    /// Project around the document, if any.
    fn project(&self) -> Option<&dyn ProjectResolver>;

    /// Branch or tag used for repository addresses.
    fn branch_or_tag(&self) -> Option<&str> {
        return None;
    }

    /// Best single target for the link.
    fn resolve(&self, cx: &Context<'_>) -> Option<PathInfo>;

    /// Every candidate target, in a stable order.
    fn multi_resolve(&self, cx: &Context<'_>) -> Vec<PathInfo>;

    /// Relative path from the document to `target`'s directory, `/` terminated when non-empty.
    fn relative_path(&self, cx: &Context<'_>, target: &FileRef, with_ext: bool, branch_or_tag: Option<&str>)
    -> String;

    /// Full address to write in the document to reach `target`.
    fn link_address(&self, cx: &Context<'_>, target: &FileRef, with_ext: bool, branch_or_tag: Option<&str>)
    -> String;

    /// Whether the link strictly resolves to `target`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unsupported` unless the resolver can compare link and target.
    fn is_resolved_to(&self, cx: &Context<'_>, target: &FileRef) -> Result<bool, Error> {
        let _ = (cx, target);
        return Err(Error::Unsupported { capability: "is_resolved_to" });
    }

    /// Why the link does not resolve to `target`. Empty when it does.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unsupported` unless the resolver can compare link and target.
    fn analyze(&self, cx: &Context<'_>, target: &FileRef) -> Result<MismatchReasons, Error> {
        let _ = (cx, target);
        return Err(Error::Unsupported { capability: "analyze" });
    }

    /// Parse `address` (anchor included) as a link written in this resolver's document.
    fn link(&self, kind: LinkKind, address: &str) -> Link<'_, Self>
    where
        Self: Sized,
    {
        let link_ref = LinkRef::parse(self.containing_file(), address, None, kind);
        return Link { link_ref, resolver: self };
    }

    /// Like [`Self::link`] with the anchor given separately.
    fn link_with_anchor(&self, kind: LinkKind, address: &str, anchor: &str) -> Link<'_, Self>
    where
        Self: Sized,
    {
        let link_ref = LinkRef::parse(self.containing_file(), address, Some(anchor), kind);
        return Link { link_ref, resolver: self };
    }
}

/// A link of the resolver's own document, ready to resolve.
pub struct Link<'r, R: LinkResolver + ?Sized> {
    /// Parsed link, bound to `resolver`'s document.
    link_ref: LinkRef,
    /// The resolver this link belongs to.
    resolver: &'r R,
}

impl<R: LinkResolver + ?Sized> Link<'_, R> {
    /// The parsed link.
    pub const fn link_ref(&self) -> &LinkRef {
        return &self.link_ref;
    }

    /// Hook context for one call.
    fn context<'c>(&'c self, want: Want, in_list: Option<&'c [PathInfo]>) -> Context<'c> {
        return Context {
            in_list,
            link_ref: &self.link_ref,
            project: self.resolver.project(),
            want,
        };
    }

    /// Best target for the link, `None` when nothing matches.
    pub fn resolve(&self, want: Want) -> Option<PathInfo> {
        return self.resolver.resolve(&self.context(want, None));
    }

    /// Best target among `candidates` only.
    pub fn resolve_in(&self, want: Want, candidates: &[PathInfo]) -> Option<PathInfo> {
        return self.resolver.resolve(&self.context(want, Some(candidates)));
    }

    /// All targets, empty when nothing matches.
    pub fn multi_resolve(&self, want: Want) -> Vec<PathInfo> {
        return self.resolver.multi_resolve(&self.context(want, None));
    }

    /// All targets among `candidates`.
    pub fn multi_resolve_in(&self, want: Want, candidates: &[PathInfo]) -> Vec<PathInfo> {
        return self.resolver.multi_resolve(&self.context(want, Some(candidates)));
    }

    /// The link resolves to something.
    pub fn is_resolved(&self, want: Want) -> bool {
        return self.resolve(want).is_some();
    }

    /// The link strictly resolves to `target`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unsupported` when the resolver cannot tell.
    pub fn is_resolved_to(&self, target: &FileRef) -> Result<bool, Error> {
        return self.resolver.is_resolved_to(&self.context(Want::new(), None), target);
    }

    /// Directory part of the address reaching `target` from this link's document.
    pub fn relative_path(&self, target: &FileRef, with_ext: bool, branch_or_tag: Option<&str>) -> String {
        return self.resolver.relative_path(&self.context(Want::new(), None), target, with_ext, branch_or_tag);
    }

    /// Address reaching `target` from this link's document, in this link's syntax.
    pub fn link_address(&self, target: &FileRef, with_ext: bool, branch_or_tag: Option<&str>) -> String {
        return self.resolver.link_address(&self.context(Want::new(), None), target, with_ext, branch_or_tag);
    }

    /// Reasons the link misses `target`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unsupported` when the resolver cannot tell.
    pub fn analyze(&self, target: &FileRef) -> Result<MismatchReasons, Error> {
        return self.resolver.analyze(&self.context(Want::new(), None), target);
    }
}
