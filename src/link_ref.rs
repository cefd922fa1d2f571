//! Typed link references parsed from the raw address text of a markdown link.

use std::sync::OnceLock;

use serde::Serialize;

use crate::file_ref::FileRef;
use crate::path_info::{IMAGE_EXTENSIONS, MARKDOWN_EXTENSIONS, PathInfo};

/// The syntax a link was written in. Each kind carries its own matching rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// `![alt](address)`: only image targets.
    Image,
    /// `[text](address)`: markdown or image targets, exact names.
    Plain,
    /// `[[Page Name]]`: wiki pages, case and dash/space insensitive, no extension.
    Wiki,
}

impl LinkKind {
    /// Extensions of the file types this kind of link can target.
    ///
    /// Plain links pick the class from the extension they were written with, and
    /// target nothing when that extension is neither markdown nor image.
    pub fn accepted_extensions(self, link_path: &PathInfo) -> &'static [&'static str] {
        return match self {
            Self::Wiki => MARKDOWN_EXTENSIONS,
            Self::Image => IMAGE_EXTENSIONS,
            Self::Plain if !link_path.has_ext() || link_path.is_markdown_ext() => MARKDOWN_EXTENSIONS,
            Self::Plain if link_path.is_image_ext() => IMAGE_EXTENSIONS,
            Self::Plain => &[],
        };
    }
}

/// A link address bound to the document that contains it.
#[derive(Debug, Clone)]
pub struct LinkRef {
    /// Fragment after `#`, without the `#`.
    anchor: Option<String>,
    /// Document holding the link.
    containing_file: FileRef,
    /// Address as written, percent-decoded for plain and image links.
    full_path: String,
    /// True when `full_path` differs from the raw text because escapes were decoded.
    is_normalized: bool,
    /// Link syntax.
    kind: LinkKind,
    /// Local file the link resolved to, set once.
    target: OnceLock<FileRef>,
}

impl LinkRef {
    /// Build a link from already split parts.
    pub fn new(
        containing_file: FileRef,
        kind: LinkKind,
        full_path: impl Into<String>,
        anchor: Option<String>,
    ) -> Self {
        return Self {
            anchor,
            containing_file,
            full_path: full_path.into(),
            is_normalized: false,
            kind,
            target: OnceLock::new(),
        };
    }

    /// Split the anchor off `raw` and decode the address.
    ///
    /// `explicit_anchor` takes precedence over a `#fragment` in `raw`; when given, `raw`
    /// is taken whole as the address. Plain and image addresses are percent-decoded,
    /// external ones are kept verbatim. Text that cannot be decoded produces a link with
    /// an empty path, which never resolves.
    pub fn parse(
        containing_file: &FileRef,
        raw: &str,
        explicit_anchor: Option<&str>,
        kind: LinkKind,
    ) -> Self {
        let raw = raw.trim();
        let (address, anchor) = match explicit_anchor {
            Some(anchor) => (raw, Some(anchor.to_string())),
            None => match raw.split_once('#') {
                Some((address, anchor)) => (address, Some(anchor.to_string())),
                None => (raw, None),
            },
        };

        let decode = kind != LinkKind::Wiki && !PathInfo::new(address).is_external();
        let (full_path, is_normalized) = if decode {
            match urlencoding::decode(address) {
                Ok(decoded) => {
                    let changed = decoded != address;
                    (decoded.into_owned(), changed)
                },
                Err(e) => {
                    tracing::debug!(address, error = %e, "undecodable link address");
                    (String::new(), false)
                },
            }
        } else {
            (address.to_string(), false)
        };

        let mut link = Self::new(containing_file.clone(), kind, full_path, anchor);
        link.is_normalized = is_normalized;
        return link;
    }

    /// Anchor fragment, if any.
    pub fn anchor(&self) -> Option<&str> {
        return self.anchor.as_deref();
    }

    /// Document holding the link.
    pub const fn containing_file(&self) -> &FileRef {
        return &self.containing_file;
    }

    /// Address without the anchor.
    pub fn full_path(&self) -> &str {
        return &self.full_path;
    }

    /// Address with the anchor re-attached.
    pub fn address(&self) -> String {
        return match &self.anchor {
            Some(anchor) => format!("{}#{anchor}", self.full_path),
            None => self.full_path.clone(),
        };
    }

    /// Whether decoding changed the address.
    pub const fn is_normalized(&self) -> bool {
        return self.is_normalized;
    }

    /// Link syntax.
    pub const fn kind(&self) -> LinkKind {
        return self.kind;
    }

    /// Address as a path value.
    pub fn path_info(&self) -> PathInfo {
        return PathInfo::new(self.full_path.as_str());
    }

    /// No address text at all.
    pub fn is_empty(&self) -> bool {
        return self.full_path.is_empty();
    }

    /// Empty address with an anchor: another heading of the same document.
    pub fn is_self_anchor(&self) -> bool {
        return self.is_empty() && self.anchor.is_some();
    }

    /// Address has a non-file URI scheme.
    pub fn is_external(&self) -> bool {
        return self.path_info().is_external();
    }

    /// Rooted path or URI.
    pub fn is_absolute(&self) -> bool {
        return self.path_info().is_absolute();
    }

    /// Whether the address carries an explicit file extension.
    ///
    /// Wiki page names may contain dots (`Release 4.2`), so for wiki links only a
    /// markdown extension counts.
    pub fn has_ext(&self) -> bool {
        let info = self.path_info();
        if self.kind == LinkKind::Wiki {
            return info.is_markdown_ext();
        }
        return info.has_ext();
    }

    /// Extensions of the file types this link can target.
    pub fn accepted_extensions(&self) -> &'static [&'static str] {
        return self.kind.accepted_extensions(&self.path_info());
    }

    /// Resolved local target, once known.
    pub fn target_ref(&self) -> Option<&FileRef> {
        return self.target.get();
    }

    /// Record the resolved target. Later calls keep the first value.
    pub(crate) fn set_target_ref(&self, target: &FileRef) {
        let _ = self.target.set(target.clone());
    }
}
