/// Shared result types: why a link misses a file, and links found in documents.
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::link_ref::LinkKind;

/// One reason a link does not strictly resolve to a given file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchReason {
    /// Names differ only in letter case.
    CaseMismatch,
    /// Names differ only in dashes versus spaces.
    DashSpaceMismatch,
    /// The link points at a different directory.
    DirectoryMismatch,
    /// The link's extension names a different file type or class.
    ExtensionMismatch,
    /// The link is a URL and cannot point at a local file.
    LinkIsExternal,
    /// Names differ beyond case and dash/space.
    NameMismatch,
    /// A wiki link points at a file outside the wiki.
    TargetNotInWiki,
    /// The link kind cannot target this file type.
    UnsupportedTargetType,
    /// Wiki links resolve by page name and must not carry an extension.
    WikiLinkWithExtension,
}

impl MismatchReason {
    /// Short human explanation.
    pub const fn describe(self) -> &'static str {
        return match self {
            Self::CaseMismatch => "letter case differs",
            Self::DashSpaceMismatch => "dashes and spaces differ",
            Self::DirectoryMismatch => "file is in another directory",
            Self::ExtensionMismatch => "extension differs",
            Self::LinkIsExternal => "link is an external URL",
            Self::NameMismatch => "file name differs",
            Self::TargetNotInWiki => "wiki links only reach wiki pages",
            Self::UnsupportedTargetType => "link kind cannot target this file type",
            Self::WikiLinkWithExtension => "wiki links must not carry an extension",
        };
    }
}

/// Ordered set of mismatch reasons. Empty means the link matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MismatchReasons(BTreeSet<MismatchReason>);

impl MismatchReasons {
    /// Add a reason.
    pub fn insert(&mut self, reason: MismatchReason) {
        self.0.insert(reason);
    }

    /// Whether `reason` is present.
    pub fn contains(&self, reason: MismatchReason) -> bool {
        return self.0.contains(&reason);
    }

    /// No reasons: the link matches.
    pub fn is_empty(&self) -> bool {
        return self.0.is_empty();
    }

    /// Reasons in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = MismatchReason> + '_ {
        return self.0.iter().copied();
    }
}

impl FromIterator<MismatchReason> for MismatchReasons {
    fn from_iter<I: IntoIterator<Item = MismatchReason>>(iter: I) -> Self {
        return Self(iter.into_iter().collect());
    }
}

impl fmt::Display for MismatchReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<&str> = self.iter().map(MismatchReason::describe).collect();
        return f.write_str(&text.join("; "));
    }
}

/// A link found in a markdown document by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundLink {
    /// Address as written, anchor included.
    pub address: String,
    /// Link syntax.
    pub kind: LinkKind,
    /// One-based line number.
    pub line: u32,
    /// Document containing the link.
    pub source: PathBuf,
}
