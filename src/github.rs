//! Resolver for documents in a GitHub repository and its wiki.
//!
//! GitHub serves main repository files under `<repo>/blob/<branch>/...` and every wiki
//! page flat under `<repo>/wiki/<page>`, whatever directory the page sits in inside
//! the wiki clone. Relative addresses are computed between "logical" locations that
//! mirror this: `blob/<branch>` inserted below the checkout root, every wiki page in
//! the wiki root. Resolution follows the same locations back to real directories.

use std::collections::HashSet;

use crate::error::Error;
use crate::file_ref::FileRef;
use crate::link_ref::LinkKind;
use crate::matcher::SearchDir;
use crate::options::{Local, Remote};
use crate::path_info::{PathInfo, encode_link_chars, encode_spaces, normalize};
use crate::project::{DEFAULT_BRANCH, ProjectResolver};
use crate::resolver::{Context, LinkResolver};
use crate::types::{MismatchReason, MismatchReasons};

/// Segment separating a repository root from the branch in its URL tree.
const BLOB_MARKER: &str = "/blob/";

/// Resolves the links of one document against a GitHub-hosted project.
pub struct GitHubLinkResolver<'p> {
    /// Branch or tag for repository addresses, `master` when unset.
    branch_or_tag: Option<String>,
    /// Document the links come from.
    containing_file: FileRef,
    /// Project around the document.
    project: Option<&'p dyn ProjectResolver>,
}

impl<'p> GitHubLinkResolver<'p> {
    /// Resolver for links written in `containing_file`.
    pub fn new(project: &'p dyn ProjectResolver, containing_file: FileRef) -> Self {
        return Self {
            branch_or_tag: None,
            containing_file,
            project: Some(project),
        };
    }

    /// Resolver without a project: only links that need no file index resolve.
    pub const fn detached(containing_file: FileRef) -> Self {
        return Self {
            branch_or_tag: None,
            containing_file,
            project: None,
        };
    }

    /// Use `branch_or_tag` in repository addresses.
    #[must_use]
    pub fn with_branch(mut self, branch_or_tag: impl Into<String>) -> Self {
        self.branch_or_tag = Some(branch_or_tag.into());
        return self;
    }

    /// Directory a file occupies in the repository's URL tree, `/` terminated.
    ///
    /// Wiki files all sit in the wiki root, whatever their real directory, except the
    /// home page as a link source, which is served one level up and so sits in the
    /// wiki root's parent. Main repository files live under `<root>/blob/<branch>/`,
    /// the root being their repository, else the project root, else their own
    /// directory. `use_actual_wiki_location` keeps the real directory of wiki files.
    pub fn logical_remote_dir(
        &self,
        file: &FileRef,
        use_actual_wiki_location: bool,
        is_source: bool,
        branch_or_tag: Option<&str>,
    ) -> String {
        if let Some(wiki_dir) = file.wiki_dir() {
            if use_actual_wiki_location {
                return file.dir().to_string();
            }
            if is_source && file.is_wiki_home_page() {
                return PathInfo::new(wiki_dir).dir().to_string();
            }
            return format!("{wiki_dir}/");
        }

        let branch = branch_or_tag.unwrap_or(DEFAULT_BRANCH);
        let dir = file.dir();
        let project_base = self
            .project
            .map(|p| return p.project_base_path().to_string())
            .filter(|base| return dir.starts_with(&format!("{base}/")));
        let root = self
            .project
            .and_then(|p| return p.vcs_root_base(file))
            .or(project_base)
            .unwrap_or_else(|| return dir.trim_end_matches('/').to_string());
        let relative_dir = dir.strip_prefix(root.as_str()).and_then(|rest| return rest.strip_prefix('/')).unwrap_or("");
        return format!("{root}/blob/{branch}/{relative_dir}");
    }

    /// Render a matched file in the form `want` asks for, or drop it.
    ///
    /// Local forms win whenever local output is wanted. Remote-only output keeps
    /// version controlled files only.
    fn format_target(&self, cx: &Context<'_>, file: &FileRef) -> Option<PathInfo> {
        let want = cx.want();
        if want.wants_local() {
            return Some(local_form(want.local_mode(), file));
        }

        let project = self.project?;
        if !project.is_under_vcs(file) {
            return None;
        }
        return match want.remote_mode() {
            Remote::None => None,
            Remote::Ref => Some(file.path_info().clone()),
            Remote::Uri | Remote::Url => {
                Some(PathInfo::new(self.remote_url(file).unwrap_or_else(|| return file.to_file_uri())))
            },
        };
    }

    /// Repository address of a version controlled file: `raw` for images, `blob` otherwise.
    fn remote_url(&self, file: &FileRef) -> Option<String> {
        let project = self.project?;
        if !project.is_under_vcs(file) {
            return None;
        }
        let root = project.vcs_root(file)?;
        if root.base_url().is_empty() {
            return None;
        }
        if file.is_image_ext() {
            return root.raw_url_for(file, self.branch_or_tag());
        }
        return root.url_for(file, true, None, self.branch_or_tag());
    }

    /// Target of `#anchor`: the document itself, or its repository address.
    fn resolve_self_anchor(&self, cx: &Context<'_>) -> Option<PathInfo> {
        let want = cx.want();
        if want.wants_local() {
            return Some(self.containing_file.path_info().clone());
        }
        if !want.wants_remote() {
            return None;
        }
        let project = self.project?;
        if !project.is_under_vcs(&self.containing_file) {
            return None;
        }
        let root = project.vcs_root(&self.containing_file)?;
        if root.base_url().is_empty() {
            return None;
        }
        let with_ext = !self.containing_file.is_wiki_page() && self.containing_file.has_ext();
        let href = root.url_for(&self.containing_file, with_ext, cx.link_ref().anchor(), self.branch_or_tag())?;
        return Some(PathInfo::new(href));
    }

    /// Directory a link's path is resolved in, `/` terminated.
    fn link_dir(&self, cx: &Context<'_>) -> String {
        let info = cx.link_ref().path_info();
        if info.is_absolute() {
            return info.dir().to_string();
        }
        let mut dir = normalize(&format!("{}{}", self.containing_file.dir(), info.dir()));
        if !dir.ends_with('/') {
            dir.push('/');
        }
        return dir;
    }

    /// Directories a plain or image link looks in.
    ///
    /// Addresses are written between logical locations, so the link's directory is
    /// first followed through the URL tree: `<root>/blob/<branch>/` leads back to the
    /// checkout and the wiki root to every page below it. A link without a directory
    /// in a wiki page names a page, found at any depth. Otherwise the directory is
    /// taken relative to the document.
    fn search_dir(&self, cx: &Context<'_>) -> SearchDir {
        let info = cx.link_ref().path_info();
        let actual = SearchDir::Exact(self.link_dir(cx));
        if info.is_absolute() {
            return actual;
        }

        let wiki_root = cx.wiki_root().map(|root| return format!("{}/", root.trim_end_matches('/')));
        if info.dir().is_empty()
            && self.containing_file.is_under_wiki_dir()
            && let Some(root) = &wiki_root
        {
            return SearchDir::Tree(root.clone());
        }

        let source = self.logical_remote_dir(&self.containing_file, false, true, self.branch_or_tag());
        let mut logical = normalize(&format!("{source}{}", info.dir()));
        if !logical.ends_with('/') {
            logical.push('/');
        }
        if let Some(root) = wiki_root {
            if logical == root {
                return SearchDir::Tree(root);
            }
            if logical.starts_with(&root) {
                return SearchDir::Exact(logical);
            }
        }
        return self.checkout_dir_of_blob(&logical).map_or(actual, SearchDir::Exact);
    }

    /// Checkout directory that a `<root>/blob/<branch>/<rest>` location stands for.
    fn checkout_dir_of_blob(&self, logical: &str) -> Option<String> {
        let project = self.project?;
        for (at, marker) in logical.match_indices(BLOB_MARKER) {
            let root = logical.get(..at)?;
            let Some((_branch, rest)) = logical.get(at.saturating_add(marker.len())..)?.split_once('/') else {
                continue;
            };
            let is_root = root == project.project_base_path()
                || project.github_repo(root).is_some_and(|repo| return repo.base_path() == root);
            if is_root {
                return Some(format!("{root}/{rest}"));
            }
        }
        return None;
    }
}

impl LinkResolver for GitHubLinkResolver<'_> {
    fn containing_file(&self) -> &FileRef {
        return &self.containing_file;
    }

    fn project(&self) -> Option<&dyn ProjectResolver> {
        return self.project;
    }

    fn branch_or_tag(&self) -> Option<&str> {
        return self.branch_or_tag.as_deref();
    }

    fn resolve(&self, cx: &Context<'_>) -> Option<PathInfo> {
        let link = cx.link_ref();
        let want = cx.want();

        if link.is_external() {
            return want.wants_remote().then(|| return link.path_info());
        }
        if link.is_self_anchor() {
            return self.resolve_self_anchor(cx);
        }

        let info = link.path_info();
        if info.is_file_uri() {
            if !want.wants_local() || self.project.is_none() {
                return None;
            }
            let local = FileRef::new(info.local_path()?);
            return self.format_target(cx, &local);
        }
        if info.is_absolute() {
            return want.wants_local().then_some(info);
        }

        if link.kind() == LinkKind::Wiki && !want.is_completion() && link.has_ext() {
            tracing::debug!(link = link.full_path(), "wiki link with extension does not resolve strictly");
            return None;
        }

        let pattern = cx.pattern_in(Some(self.search_dir(cx)))?;
        for file in cx.matched_files(&pattern) {
            if let Some(found) = self.format_target(cx, &file) {
                link.set_target_ref(&file);
                return Some(found);
            }
        }
        return None;
    }

    fn multi_resolve(&self, cx: &Context<'_>) -> Vec<PathInfo> {
        let link = cx.link_ref();
        let want = cx.want();

        if link.kind() == LinkKind::Wiki && !want.is_completion() && link.has_ext() {
            return Vec::new();
        }
        let Some(pattern) = cx.pattern_in(Some(self.search_dir(cx))) else {
            return Vec::new();
        };

        let mut seen: HashSet<String> = HashSet::new();
        let mut found: Vec<PathInfo> = Vec::new();
        for file in cx.matched_files(&pattern) {
            let Some(target) = self.format_target(cx, &file) else {
                continue;
            };
            if seen.insert(target.file_path().to_string()) {
                found.push(target);
            }
        }

        let offer_repo_pages = want.wants_links_url()
            && want.is_completion()
            && want.wants_remote()
            && link.is_empty()
            && link.kind() == LinkKind::Plain;
        let root = self
            .project
            .and_then(|p| return p.vcs_root(&self.containing_file))
            .filter(|root| return !root.base_url().is_empty());
        if offer_repo_pages && let Some(root) = root {
            for url in root.repo_page_urls() {
                if seen.insert(url.clone()) {
                    found.push(PathInfo::new(url));
                }
            }
        }
        return found;
    }

    fn relative_path(&self, _cx: &Context<'_>, target: &FileRef, with_ext: bool, branch_or_tag: Option<&str>) -> String {
        let branch = branch_or_tag.or_else(|| return self.branch_or_tag());
        // With its extension a wiki file is addressed where it really is.
        let source_dir = self.logical_remote_dir(&self.containing_file, false, true, branch);
        let target_dir = self.logical_remote_dir(target, with_ext, false, branch);
        return relative_dir(&source_dir, &target_dir);
    }

    fn link_address(&self, cx: &Context<'_>, target: &FileRef, with_ext: bool, branch_or_tag: Option<&str>) -> String {
        let is_wiki_link = cx.link_ref().kind() == LinkKind::Wiki;
        let prefix = self.relative_path(cx, target, with_ext, branch_or_tag);

        let name = if is_wiki_link {
            target.file_name_no_ext().replace('-', " ")
        } else if target.is_wiki_page() {
            encode_spaces(if with_ext { target.file_name() } else { target.file_name_no_ext() })
        } else {
            encode_link_chars(target.file_name())
        };
        return format!("{prefix}{name}");
    }

    fn is_resolved_to(&self, cx: &Context<'_>, target: &FileRef) -> Result<bool, Error> {
        let link = cx.link_ref();
        if link.is_external() {
            return Ok(false);
        }
        if link.is_self_anchor() {
            return Ok(target == &self.containing_file);
        }
        let info = link.path_info();
        if info.is_file_uri() {
            return Ok(info.local_path().is_some_and(|p| return p == target.file_path()));
        }
        if info.is_absolute() {
            return Ok(info.file_path() == target.file_path());
        }
        if link.kind() == LinkKind::Wiki && link.has_ext() {
            return Ok(false);
        }
        let Some(pattern) = cx.pattern_in(Some(self.search_dir(cx))) else {
            return Ok(false);
        };
        return Ok(pattern.is_match(target.file_path()));
    }

    fn analyze(&self, cx: &Context<'_>, target: &FileRef) -> Result<MismatchReasons, Error> {
        let link = cx.link_ref();
        let mut reasons = MismatchReasons::default();

        if link.is_external() {
            reasons.insert(MismatchReason::LinkIsExternal);
            return Ok(reasons);
        }
        if link.is_self_anchor() {
            if target != &self.containing_file {
                reasons.insert(MismatchReason::NameMismatch);
            }
            return Ok(reasons);
        }
        if !link.accepted_extensions().contains(&target.ext().as_str()) {
            reasons.insert(MismatchReason::UnsupportedTargetType);
        }

        let info = link.path_info();
        if link.kind() == LinkKind::Wiki {
            if link.has_ext() {
                reasons.insert(MismatchReason::WikiLinkWithExtension);
            }
            let in_wiki = match cx.wiki_root() {
                Some(root) => target.file_path().starts_with(&format!("{root}/")),
                None => target.file_path().starts_with(self.containing_file.dir()),
            };
            if !in_wiki {
                reasons.insert(MismatchReason::TargetNotInWiki);
            }
            let name = if link.has_ext() { info.file_name_no_ext() } else { info.file_name() };
            if fold_page_name(name) != fold_page_name(target.file_name_no_ext()) {
                reasons.insert(MismatchReason::NameMismatch);
            }
            return Ok(reasons);
        }

        if !self.search_dir(cx).contains(target.dir()) {
            reasons.insert(MismatchReason::DirectoryMismatch);
        }

        let (stem, ext) = if info.has_ext() { (info.file_name_no_ext(), Some(info.ext())) } else { (info.file_name(), None) };
        let target_stem = target.file_name_no_ext();
        if stem != target_stem {
            if stem.to_lowercase() == target_stem.to_lowercase() {
                reasons.insert(MismatchReason::CaseMismatch);
            } else if fold_page_name(stem) == fold_page_name(target_stem) {
                reasons.insert(MismatchReason::DashSpaceMismatch);
            } else {
                reasons.insert(MismatchReason::NameMismatch);
            }
        }
        if ext.is_some_and(|ext| return ext != target.ext()) {
            reasons.insert(MismatchReason::ExtensionMismatch);
        }
        return Ok(reasons);
    }
}

/// Local output form of a file.
fn local_form(mode: Local, file: &FileRef) -> PathInfo {
    return match mode {
        Local::Uri => PathInfo::new(file.to_file_uri()),
        Local::None | Local::Ref => file.path_info().clone(),
    };
}

/// Wiki page identity: case, dashes and spaces folded.
fn fold_page_name(name: &str) -> String {
    return name.to_lowercase().replace('-', " ");
}

/// `../` steps out of `source` past the common prefix, then down into `target`.
///
/// Both arguments are `/` terminated directories; the result is empty or `/` terminated.
pub fn relative_dir(source: &str, target: &str) -> String {
    let mut last_slash: Option<usize> = None;
    for (i, (a, b)) in source.bytes().zip(target.bytes()).enumerate() {
        if a != b {
            break;
        }
        if a == b'/' {
            last_slash = Some(i);
        }
    }
    let start = last_slash.map_or(0, |i| return i.saturating_add(1));
    let ups = source.get(start..).map_or(0, |rest| return rest.matches('/').count());
    let down = target.get(start..).unwrap_or("");
    return format!("{}{down}", "../".repeat(ups));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;
    use crate::options::{Links, Match, Want};
    use crate::project::{InMemoryProject, RepoRoot};
    use crate::test_support::{self, URL, main_file, wiki_file};

    fn paths(found: &[PathInfo]) -> Vec<&str> {
        return found.iter().map(PathInfo::file_path).collect();
    }

    fn resolver(project: &InMemoryProject, file: FileRef) -> GitHubLinkResolver<'_> {
        return GitHubLinkResolver::new(project, file);
    }

    #[test]
    fn exact_relative_link_resolves_locally() {
        let project = test_support::project();
        let r = resolver(&project, main_file("Readme.md"));
        let found = r.link(LinkKind::Plain, "SubDirectory/NestedFile.md").resolve(Want::new());
        assert_eq!(found.unwrap().file_path(), "/src/MarkdownTest/SubDirectory/NestedFile.md");

        let from_sub = resolver(&project, main_file("SubDirectory/NestedFile.md"));
        let link = from_sub.link(LinkKind::Plain, "../Readme");
        assert_eq!(link.resolve(Want::new()).unwrap().file_path(), "/src/MarkdownTest/Readme.md");
        assert_eq!(link.link_ref().target_ref().unwrap(), &main_file("Readme.md"));
    }

    #[test]
    fn encoded_names_resolve() {
        let project = test_support::project();
        let r = resolver(&project, main_file("Readme.md"));
        let found = r.link(LinkKind::Plain, "anchor-in-name%235.md#heading").resolve(Want::new());
        assert_eq!(found.unwrap().file_path(), "/src/MarkdownTest/anchor-in-name#5.md");
    }

    #[test]
    fn self_anchor_resolves_to_document() {
        let project = test_support::project();
        let r = resolver(&project, main_file("Readme.md"));
        let found = r.link(LinkKind::Plain, "#any-heading").resolve(Want::new());
        assert_eq!(found.unwrap().file_path(), "/src/MarkdownTest/Readme.md");
    }

    #[test]
    fn self_anchor_remote_only_needs_vcs() {
        let project = test_support::project();
        let want = Local::None | Remote::Url;
        let r = resolver(&project, main_file("Readme.md"));
        let found = r.link(LinkKind::Plain, "#top").resolve(want).unwrap();
        assert_eq!(found.file_path(), format!("{URL}/blob/master/Readme.md#top"));

        let page = resolver(&project, wiki_file("Space In Name.md"));
        let found = page.link(LinkKind::Plain, "#top").resolve(want).unwrap();
        assert_eq!(found.file_path(), format!("{URL}/wiki/Space%20In%20Name#top"));

        let untracked = resolver(&project, main_file("SubDirectory/NonVcsNestedFile.md"));
        assert!(untracked.link(LinkKind::Plain, "#top").resolve(want).is_none());
        let detached = GitHubLinkResolver::detached(main_file("Readme.md"));
        assert!(detached.link(LinkKind::Plain, "#top").resolve(want).is_none());
    }

    #[test]
    fn external_links_need_remote() {
        let project = test_support::project();
        let r = resolver(&project, main_file("Readme.md"));
        let link = r.link(LinkKind::Plain, "https://example.com/page");
        assert_eq!(link.resolve(Want::new()).unwrap().file_path(), "https://example.com/page");
        assert!(link.resolve(Local::Ref | Remote::None).is_none());
    }

    #[test]
    fn file_uri_needs_project_and_local() {
        let project = test_support::project();
        let r = resolver(&project, main_file("Readme.md"));
        let link = r.link(LinkKind::Plain, "file:///src/MarkdownTest/vcs-image.png");
        assert_eq!(link.resolve(Want::new()).unwrap().file_path(), "/src/MarkdownTest/vcs-image.png");
        assert!(link.resolve(Local::None | Remote::Url).is_none());
        let detached = GitHubLinkResolver::detached(main_file("Readme.md"));
        assert!(detached.link(LinkKind::Plain, "file:///src/MarkdownTest/vcs-image.png").resolve(Want::new()).is_none());
    }

    #[test]
    fn absolute_local_paths_pass_through() {
        let detached = GitHubLinkResolver::detached(main_file("Readme.md"));
        let found = detached.link(LinkKind::Plain, "/elsewhere/notes.md").resolve(Want::new());
        assert_eq!(found.unwrap().file_path(), "/elsewhere/notes.md");
    }

    #[test]
    fn wiki_dash_and_space_resolve_alike() {
        let project = test_support::project();
        let r = resolver(&project, wiki_file("Home.md"));
        let spaced = r.link(LinkKind::Wiki, "Space In Name").resolve(Want::new());
        let dashed = r.link(LinkKind::Wiki, "space-in-name").resolve(Want::new());
        assert_eq!(spaced, dashed);
        assert_eq!(spaced.unwrap().file_path(), "/src/MarkdownTest/MarkdownTest.wiki/Space In Name.md");
    }

    #[test]
    fn wiki_pages_in_subdirectories_are_flat() {
        let project = test_support::project();
        let r = resolver(&project, wiki_file("Home.md"));
        let found = r.link(LinkKind::Wiki, "In Name").resolve(Want::new());
        assert_eq!(found.unwrap().file_path(), "/src/MarkdownTest/MarkdownTest.wiki/SubDirectory/In-Name.md");
        let multiple = r.link(LinkKind::Wiki, "Multiple-Match").multi_resolve(Want::new());
        assert_eq!(
            paths(&multiple),
            [
                "/src/MarkdownTest/MarkdownTest.wiki/Multiple-Match.md",
                "/src/MarkdownTest/MarkdownTest.wiki/SubDirectory/Multiple-Match.md",
            ]
        );
    }

    #[test]
    fn dotted_wiki_page_name_resolves() {
        let project = test_support::project();
        let r = resolver(&project, wiki_file("Home.md"));
        let found = r.link(LinkKind::Wiki, "Test 4.2").resolve(Want::new());
        assert_eq!(found.unwrap().file_path(), "/src/MarkdownTest/MarkdownTest.wiki/Test 4.2.md");
    }

    #[test]
    fn wiki_link_with_extension_fails_strictly() {
        let project = test_support::project();
        let r = resolver(&project, wiki_file("Home.md"));
        let link = r.link(LinkKind::Wiki, "Space In Name.md");
        assert!(link.resolve(Want::new()).is_none());
        assert!(link.multi_resolve(Want::new()).is_empty());
        assert_eq!(link.multi_resolve(Match::Completion.into()).len(), 1);
    }

    #[test]
    fn wiki_links_from_main_repo_reach_the_wiki() {
        let project = test_support::project();
        let r = resolver(&project, main_file("Readme.md"));
        let found = r.link(LinkKind::Wiki, "Home").resolve(Want::new());
        assert_eq!(found.unwrap().file_path(), "/src/MarkdownTest/MarkdownTest.wiki/Home.md");
    }

    #[test]
    fn bare_extension_completion_lists_images_as_file_uris() {
        let project = test_support::project();
        let r = resolver(&project, main_file("Readme.md"));
        let want = Local::Uri | Remote::Uri | Match::Completion;
        let found = r.link(LinkKind::Plain, ".png").multi_resolve(want);
        assert_eq!(
            paths(&found),
            [
                "file:///src/MarkdownTest/MarkdownTest.wiki/vcs-image.png",
                "file:///src/MarkdownTest/SubDirectory/sub-dir-vcs-image.png",
                "file:///src/MarkdownTest/non-vcs-image.png",
                "file:///src/MarkdownTest/vcs-image.png",
            ]
        );
        assert_eq!(found, r.link(LinkKind::Plain, ".png").multi_resolve(want));
    }

    #[test]
    fn remote_only_completion_keeps_vcs_files_as_urls() {
        let project = test_support::project();
        let r = resolver(&project, main_file("Readme.md")).with_branch("dev");
        let want = Local::None | Remote::Url | Match::Completion;
        let found = r.link(LinkKind::Plain, ".png").multi_resolve(want);
        assert_eq!(
            paths(&found),
            [
                "https://github.com/vsch/MarkdownTest/wiki/vcs-image.png",
                "https://github.com/vsch/MarkdownTest/raw/dev/SubDirectory/sub-dir-vcs-image.png",
                "https://github.com/vsch/MarkdownTest/raw/dev/vcs-image.png",
            ]
        );
    }

    #[test]
    fn local_forms_win_over_preferred_urls() {
        let project = test_support::project();
        let r = resolver(&project, main_file("Readme.md"));

        let want = Local::Uri | Remote::Uri | Links::Url | Match::Completion;
        let found = r.link(LinkKind::Plain, "SubDirectory/NestedFile").multi_resolve(want);
        assert_eq!(
            paths(&found),
            [
                "file:///src/MarkdownTest/SubDirectory/NestedFile.md",
                "file:///src/MarkdownTest/SubDirectory/NonVcsNestedFile.md",
            ]
        );

        let want = Local::Ref | Remote::Ref | Links::Url;
        let found = r.link(LinkKind::Plain, "SubDirectory/NestedFile.md").resolve(want);
        assert_eq!(found.unwrap().file_path(), "/src/MarkdownTest/SubDirectory/NestedFile.md");

        // Repository pages still follow the files.
        let want = Local::Ref | Remote::Ref | Links::Url | Match::Completion;
        let found = r.link(LinkKind::Plain, "").multi_resolve(want);
        let markdown = test_support::FILES.iter().filter(|f| f.ends_with(".md") || f.ends_with(".markdown"));
        let pages = ["fork", "graphs", "issues", "labels", "milestones", "pulls", "pulse"].map(|page| format!("{URL}/{page}"));
        let expected: Vec<String> = markdown.map(|f| (*f).to_string()).chain(pages).collect();
        assert_eq!(paths(&found), expected);
    }

    #[test]
    fn empty_link_completion_offers_repo_pages() {
        let project = test_support::project();
        let r = resolver(&project, main_file("Readme.md"));
        let want = Local::None | Remote::Url | Links::Url | Match::Completion;
        let found = r.link(LinkKind::Plain, "").multi_resolve(want);
        let expected: Vec<String> = [
            "wiki",
            "wiki/Multiple-Match",
            "wiki/Space%20In%20Name",
            "wiki/In-Name",
            "wiki/Test%204.2",
            "blob/master/Multiple-Match.markdown",
            "blob/master/Multiple-Match.md",
            "blob/master/Readme.md",
            "blob/master/SubDirectory/NestedFile.md",
            "blob/master/anchor-in-name%235.md",
            "fork",
            "graphs",
            "issues",
            "labels",
            "milestones",
            "pulls",
            "pulse",
        ]
        .iter()
        .map(|rest| format!("{URL}/{rest}"))
        .collect();
        assert_eq!(paths(&found), expected);
    }

    #[test]
    fn repository_without_address_gives_no_remote_hrefs() {
        let project = InMemoryProject::new("/p")
            .with_repo(RepoRoot::new("", "/p"))
            .with_files(["/p/Readme.md"]);
        let r = resolver(&project, FileRef::new("/p/Readme.md"));

        assert!(r.link(LinkKind::Plain, "#top").resolve(Local::None | Remote::Url).is_none());
        let want = Local::Uri | Remote::Url | Links::Url | Match::Completion;
        assert_eq!(paths(&r.link(LinkKind::Plain, "").multi_resolve(want)), ["file:///p/Readme.md"]);
        let want = Local::None | Remote::Url | Links::Url | Match::Completion;
        assert_eq!(paths(&r.link(LinkKind::Plain, "").multi_resolve(want)), ["file:///p/Readme.md"]);
    }

    #[test]
    fn relative_paths_follow_the_url_tree() {
        let project = test_support::project();
        let readme = main_file("Readme.md");
        let nested = main_file("SubDirectory/NestedFile.md");
        let page = wiki_file("Space In Name.md");
        let deep_page = wiki_file("SubDirectory/In-Name.md");

        let home = resolver(&project, wiki_file("Home.md"));
        assert_eq!(home.link(LinkKind::Plain, "").relative_path(&readme, false, None), "blob/master/");
        assert_eq!(home.link(LinkKind::Plain, "").relative_path(&page, false, None), "MarkdownTest.wiki/");

        let from_page = resolver(&project, page.clone());
        assert_eq!(from_page.link(LinkKind::Plain, "").relative_path(&readme, false, None), "../blob/master/");
        assert_eq!(from_page.link(LinkKind::Plain, "").relative_path(&readme, false, Some("v1.0")), "../blob/v1.0/");
        assert_eq!(from_page.link(LinkKind::Plain, "").relative_path(&deep_page, false, None), "");
        assert_eq!(from_page.link(LinkKind::Plain, "").relative_path(&deep_page, true, None), "SubDirectory/");

        // The source side stays logical even when the target is addressed where it is.
        let from_deep_page = resolver(&project, deep_page.clone());
        assert_eq!(from_deep_page.link(LinkKind::Plain, "").relative_path(&deep_page, true, None), "SubDirectory/");

        let from_readme = resolver(&project, readme.clone());
        assert_eq!(from_readme.link(LinkKind::Plain, "").relative_path(&nested, false, None), "SubDirectory/");
        assert_eq!(from_readme.link(LinkKind::Plain, "").relative_path(&page, false, None), "../../MarkdownTest.wiki/");
        assert_eq!(
            from_readme.link(LinkKind::Plain, "").relative_path(&deep_page, true, None),
            "../../MarkdownTest.wiki/SubDirectory/"
        );

        let from_nested = resolver(&project, nested);
        assert_eq!(from_nested.link(LinkKind::Plain, "").relative_path(&readme, false, None), "../");
    }

    #[test]
    fn link_addresses_encode_per_target() {
        let project = test_support::project();
        let page = wiki_file("Space In Name.md");
        let deep_page = wiki_file("SubDirectory/In-Name.md");

        let home = resolver(&project, wiki_file("Home.md"));
        assert_eq!(home.link(LinkKind::Wiki, "").link_address(&deep_page, false, None), "MarkdownTest.wiki/In Name");
        assert_eq!(home.link(LinkKind::Wiki, "").link_address(&page, false, None), "MarkdownTest.wiki/Space In Name");
        assert_eq!(home.link(LinkKind::Plain, "").link_address(&page, false, None), "MarkdownTest.wiki/Space%20In%20Name");

        let from_page = resolver(&project, wiki_file("Test 4.2.md"));
        assert_eq!(from_page.link(LinkKind::Plain, "").link_address(&page, false, None), "Space%20In%20Name");
        assert_eq!(from_page.link(LinkKind::Wiki, "").link_address(&deep_page, false, None), "In Name");

        let readme = resolver(&project, main_file("Readme.md"));
        let target = main_file("anchor-in-name#5.md");
        assert_eq!(readme.link(LinkKind::Plain, "").link_address(&target, false, None), "anchor-in-name%235.md");
        assert_eq!(
            readme.link(LinkKind::Plain, "").link_address(&page, true, None),
            "../../MarkdownTest.wiki/Space%20In%20Name.md"
        );
    }

    #[test]
    fn plain_links_in_wiki_pages_find_pages_at_any_depth() {
        let project = test_support::project();
        let r = resolver(&project, wiki_file("Space In Name.md"));
        let found = r.link(LinkKind::Plain, "In-Name").resolve(Want::new());
        assert_eq!(found.unwrap().file_path(), "/src/MarkdownTest/MarkdownTest.wiki/SubDirectory/In-Name.md");
        let found = r.link(LinkKind::Plain, "../blob/master/Readme.md").resolve(Want::new());
        assert_eq!(found.unwrap().file_path(), "/src/MarkdownTest/Readme.md");

        let home = resolver(&project, wiki_file("Home.md"));
        let found = home.link(LinkKind::Plain, "blob/master/SubDirectory/NestedFile.md").resolve(Want::new());
        assert_eq!(found.unwrap().file_path(), "/src/MarkdownTest/SubDirectory/NestedFile.md");
        let reasons = r.link(LinkKind::Plain, "In-Name").analyze(&wiki_file("SubDirectory/In-Name.md")).unwrap();
        assert!(reasons.is_empty());
    }

    #[test]
    fn addresses_resolve_back_to_their_targets() {
        let project = test_support::project();
        let markdown = project.project_file_list(Some(&["md"])).unwrap();
        let sources = [
            main_file("Readme.md"),
            main_file("SubDirectory/NestedFile.md"),
            wiki_file("Home.md"),
            wiki_file("Space In Name.md"),
            wiki_file("SubDirectory/Multiple-Match.md"),
        ];

        let mut misses: Vec<String> = Vec::new();
        for source in &sources {
            let r = resolver(&project, source.clone());
            for target in &markdown {
                let mut attempts = vec![(LinkKind::Plain, false), (LinkKind::Plain, true)];
                if target.is_wiki_page() {
                    attempts.push((LinkKind::Wiki, false));
                }
                for (kind, with_ext) in attempts {
                    let address = r.link(kind, "").link_address(target, with_ext, None);
                    let found = r.link(kind, &address).resolve(Want::new());
                    if found.as_ref().map(PathInfo::file_path) != Some(target.file_path()) {
                        misses.push(format!("{} -> {} {kind:?} {with_ext}", source.file_name(), target.file_name()));
                    }
                }
            }
        }

        // Without an extension the nested page shares its address with the root page of
        // the same name, which comes first. `Test 4.2` then reads as extension `2`.
        let expected: Vec<String> = sources
            .iter()
            .flat_map(|source| {
                return [
                    format!("{} -> Multiple-Match.md Plain false", source.file_name()),
                    format!("{} -> Multiple-Match.md Wiki false", source.file_name()),
                    format!("{} -> Test 4.2.md Plain false", source.file_name()),
                ];
            })
            .collect();
        assert_eq!(misses, expected);
    }

    #[test]
    fn analyze_explains_near_misses() {
        let project = test_support::project();
        let r = resolver(&project, main_file("Readme.md"));
        let nested = main_file("SubDirectory/NestedFile.md");

        let reasons = r.link(LinkKind::Plain, "SubDirectory/nestedfile.md").analyze(&nested).unwrap();
        assert!(reasons.contains(MismatchReason::CaseMismatch));
        let reasons = r.link(LinkKind::Plain, "NestedFile.md").analyze(&nested).unwrap();
        assert_eq!(reasons.iter().collect::<Vec<_>>(), [MismatchReason::DirectoryMismatch]);
        let reasons = r.link(LinkKind::Plain, "SubDirectory/NestedFile.md").analyze(&nested).unwrap();
        assert!(reasons.is_empty());
        let reasons = r.link(LinkKind::Image, "SubDirectory/NestedFile.md").analyze(&nested).unwrap();
        assert!(reasons.contains(MismatchReason::UnsupportedTargetType));

        let home = resolver(&project, wiki_file("Home.md"));
        let page = wiki_file("Space In Name.md");
        let reasons = home.link(LinkKind::Wiki, "Space In Name.md").analyze(&page).unwrap();
        assert_eq!(reasons.iter().collect::<Vec<_>>(), [MismatchReason::WikiLinkWithExtension]);
        let reasons = home.link(LinkKind::Wiki, "Readme").analyze(&main_file("Readme.md")).unwrap();
        assert!(reasons.contains(MismatchReason::TargetNotInWiki));
    }

    #[test]
    fn is_resolved_to_matches_strictly() {
        let project = test_support::project();
        let home = resolver(&project, wiki_file("Home.md"));
        let page = wiki_file("Space In Name.md");
        assert!(home.link(LinkKind::Wiki, "space-in-name").is_resolved_to(&page).unwrap());
        assert!(!home.link(LinkKind::Wiki, "Space In Name.md").is_resolved_to(&page).unwrap());
        assert!(home.link(LinkKind::Plain, "#top").is_resolved_to(&wiki_file("Home.md")).unwrap());
    }

    #[test]
    fn relative_dir_counts_remaining_segments() {
        assert_eq!(relative_dir("/a/b/c/", "/a/x/"), "../../x/");
        assert_eq!(relative_dir("/a/", "/a/"), "");
        assert_eq!(relative_dir("/a/b/", "/a/"), "../");
    }
}
