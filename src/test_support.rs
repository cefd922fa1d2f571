//! Shared fixture: a GitHub repository with a nested wiki clone and a few untracked files.

use crate::file_ref::FileRef;
use crate::project::{InMemoryProject, RepoRoot};

/// Main repository checkout.
pub const BASE: &str = "/src/MarkdownTest";

/// Wiki clone inside the main checkout.
pub const WIKI: &str = "/src/MarkdownTest/MarkdownTest.wiki";

/// Web address of both repositories.
pub const URL: &str = "https://github.com/vsch/MarkdownTest";

/// Every file of the fixture, in index order.
pub const FILES: &[&str] = &[
    "/src/MarkdownTest/MarkdownTest.wiki/Home.md",
    "/src/MarkdownTest/MarkdownTest.wiki/Multiple-Match.md",
    "/src/MarkdownTest/MarkdownTest.wiki/Non-Vcs-Page.md",
    "/src/MarkdownTest/MarkdownTest.wiki/Space In Name.md",
    "/src/MarkdownTest/MarkdownTest.wiki/SubDirectory/In-Name.md",
    "/src/MarkdownTest/MarkdownTest.wiki/SubDirectory/Multiple-Match.md",
    "/src/MarkdownTest/MarkdownTest.wiki/Test 4.2.md",
    "/src/MarkdownTest/MarkdownTest.wiki/vcs-image.png",
    "/src/MarkdownTest/Multiple-Match.markdown",
    "/src/MarkdownTest/Multiple-Match.md",
    "/src/MarkdownTest/Readme.md",
    "/src/MarkdownTest/SubDirectory/NestedFile.md",
    "/src/MarkdownTest/SubDirectory/NonVcsNestedFile.md",
    "/src/MarkdownTest/SubDirectory/sub-dir-vcs-image.png",
    "/src/MarkdownTest/Test.kt",
    "/src/MarkdownTest/anchor-in-name#5.md",
    "/src/MarkdownTest/non-vcs-image.png",
    "/src/MarkdownTest/vcs-image.png",
];

/// Files present on disk but not under version control.
pub const UNTRACKED: &[&str] = &[
    "/src/MarkdownTest/MarkdownTest.wiki/Non-Vcs-Page.md",
    "/src/MarkdownTest/SubDirectory/NonVcsNestedFile.md",
    "/src/MarkdownTest/non-vcs-image.png",
];

/// The fixture project.
pub fn project() -> InMemoryProject {
    return InMemoryProject::new(BASE)
        .with_repo(RepoRoot::new(URL, BASE))
        .with_repo(RepoRoot::new(URL, WIKI))
        .with_files(FILES.iter().copied())
        .with_untracked(UNTRACKED.iter().copied());
}

/// A file of the main checkout.
pub fn main_file(relative: &str) -> FileRef {
    return FileRef::new(format!("{BASE}/{relative}"));
}

/// A file of the wiki clone.
pub fn wiki_file(relative: &str) -> FileRef {
    return FileRef::new(format!("{WIKI}/{relative}"));
}
