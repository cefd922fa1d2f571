//! Compile a link reference into the regex that selects its candidate files.

use regex::Regex;

use crate::link_ref::{LinkKind, LinkRef};
use crate::path_info::{MARKDOWN_EXTENSIONS, normalize};

/// Where a plain or image link looks for its file, once the resolver has mapped its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchDir {
    /// Exactly this `/` terminated directory.
    Exact(String),
    /// This directory and every directory below it.
    Tree(String),
}

impl SearchDir {
    /// Whether a file in `dir` (`/` terminated) lies in the searched directories.
    pub fn contains(&self, dir: &str) -> bool {
        return match self {
            Self::Exact(exact) => dir == exact,
            Self::Tree(root) => dir.starts_with(&format!("{}/", root.trim_end_matches('/'))),
        };
    }

    /// Regex prefix selecting the searched directories.
    fn pattern(&self) -> String {
        return match self {
            Self::Exact(exact) => format!("^{}", regex::escape(exact)),
            Self::Tree(root) => format!("^{}/(?:[^/]*/)*", regex::escape(root.trim_end_matches('/'))),
        };
    }
}

/// Builds the candidate pattern for one link.
///
/// Strict patterns name exactly one directory and one file name; a missing extension
/// may be any member of the accepted class. Loose patterns, used for completion and
/// for empty links, accept any name containing the typed text and, when the link
/// names no directory, any directory under the project root.
#[derive(Debug, Clone)]
pub struct LinkRefMatcher<'a> {
    /// The link being matched.
    link_ref: &'a LinkRef,
    /// Completion-style matching.
    loose: bool,
    /// Root searched by loose links without a directory.
    project_base: Option<&'a str>,
    /// Directory mapped by the resolver, replacing the one relative to the containing file.
    search_dir: Option<SearchDir>,
    /// Directory holding the wiki pages wiki links may target.
    wiki_root: Option<&'a str>,
}

impl<'a> LinkRefMatcher<'a> {
    /// Matcher for `link_ref`. Empty links are always matched loosely.
    pub fn new(link_ref: &'a LinkRef, project_base: Option<&'a str>, loose: bool) -> Self {
        return Self {
            link_ref,
            loose: loose || link_ref.is_empty(),
            project_base,
            search_dir: None,
            wiki_root: None,
        };
    }

    /// Search `search_dir` for plain and image links.
    #[must_use]
    pub fn with_search_dir(mut self, search_dir: Option<SearchDir>) -> Self {
        self.search_dir = search_dir;
        return self;
    }

    /// Search wiki links under `wiki_root` instead of the containing file's directory.
    #[must_use]
    pub const fn with_wiki_root(mut self, wiki_root: Option<&'a str>) -> Self {
        self.wiki_root = wiki_root;
        return self;
    }

    /// Whether the pattern is loose.
    pub const fn is_loose(&self) -> bool {
        return self.loose;
    }

    /// Pattern source, or `None` when the link points outside the project tree.
    pub fn pattern_text(&self) -> Option<String> {
        if self.link_ref.is_external() || self.link_ref.is_absolute() {
            return None;
        }
        let text = match self.link_ref.kind() {
            LinkKind::Wiki => self.wiki_pattern(),
            LinkKind::Image | LinkKind::Plain => self.file_pattern(),
        };
        tracing::debug!(link = self.link_ref.full_path(), loose = self.loose, pattern = %text, "built link pattern");
        return Some(text);
    }

    /// Compiled pattern. A pattern that fails to compile matches nothing.
    pub fn pattern_regex(&self) -> Option<Regex> {
        let text = self.pattern_text()?;
        return match Regex::new(&text) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(pattern = %text, error = %e, "link pattern does not compile");
                None
            },
        };
    }

    /// Directory of the containing file, without the trailing slash.
    fn containing_dir(&self) -> &str {
        let dir = self.link_ref.containing_file().dir();
        return dir.strip_suffix('/').unwrap_or(dir);
    }

    /// Wiki pages live anywhere below the wiki root, matched by folded page name.
    fn wiki_pattern(&self) -> String {
        let root = self.wiki_root.map_or_else(|| return self.containing_dir(), |r| return r.trim_end_matches('/'));
        let info = self.link_ref.path_info();
        let name = if self.link_ref.has_ext() { info.file_name_no_ext() } else { info.file_name() };
        let mut name_pattern = fold_wiki_name(name);
        if self.loose {
            name_pattern = format!("[^/]*{name_pattern}[^/]*");
        }
        return format!(
            "^{}/(?:[^/]*/)*(?i:{name_pattern}\\.(?:{}))$",
            regex::escape(root),
            MARKDOWN_EXTENSIONS.join("|")
        );
    }

    /// Plain and image links: directory relative to the containing file, then name and extension.
    fn file_pattern(&self) -> String {
        let info = self.link_ref.path_info();
        let link_dir = info.dir();

        let dir_pattern = if self.loose && link_dir.is_empty() {
            let base = self.project_base.map_or_else(|| return self.containing_dir(), |b| return b.trim_end_matches('/'));
            SearchDir::Tree(base.to_string()).pattern()
        } else if let Some(search_dir) = &self.search_dir {
            search_dir.pattern()
        } else {
            let mut dir = normalize(&format!("{}/{link_dir}", self.containing_dir()));
            if !dir.ends_with('/') {
                dir.push('/');
            }
            SearchDir::Exact(dir).pattern()
        };

        let (stem, ext) = if info.has_ext() {
            (info.file_name_no_ext(), Some(info.ext()))
        } else {
            (info.file_name(), None)
        };
        if self.loose {
            let ext_part = ext.map(|ext| return format!("\\.{}", extension_class_pattern(&ext))).unwrap_or_default();
            return format!("{dir_pattern}(?i:[^/]*{}[^/]*{ext_part})$", regex::escape(stem));
        }

        let ext_part = match ext {
            Some(ext) => format!("\\.(?i:{})", regex::escape(&ext)),
            None => {
                let accepted = self.link_ref.accepted_extensions();
                if accepted.is_empty() {
                    String::new()
                } else {
                    format!("(?:\\.(?i:{}))?", accepted.join("|"))
                }
            },
        };
        return format!("{dir_pattern}{}{ext_part}$", regex::escape(stem));
    }
}

/// Escape a wiki page name, letting every dash or space match either one.
fn fold_wiki_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len().saturating_mul(2));
    for c in name.chars() {
        if c == '-' || c == ' ' {
            out.push_str("[- ]");
        } else {
            out.push_str(&regex::escape(c.encode_utf8(&mut [0_u8; 4])));
        }
    }
    return out;
}

/// Markdown extensions match their whole class, anything else matches literally.
fn extension_class_pattern(ext: &str) -> String {
    if MARKDOWN_EXTENSIONS.contains(&ext) {
        return format!("(?:{})", MARKDOWN_EXTENSIONS.join("|"));
    }
    return regex::escape(ext);
}
