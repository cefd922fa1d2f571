//! Path and URI value type with derived name, extension and locality properties.

use std::fmt;

use serde::Serialize;

/// Extensions treated as one markdown equivalence class.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mkd", "mdown", "mkdn", "mdwn"];

/// Extensions treated as one image equivalence class.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "bmp", "webp", "ico"];

/// Prefix of local file URIs.
pub const FILE_URI_PREFIX: &str = "file://";

/// A forward-slash separated path, URI or URL.
///
/// Backslashes are converted on construction so the stored path never contains one.
/// Nothing about the path is checked against the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PathInfo {
    /// The normalized path text.
    path: String,
}

impl PathInfo {
    /// Wrap a path, converting any backslashes to forward slashes.
    pub fn new(path: impl Into<String>) -> Self {
        let path: String = path.into();
        if path.contains('\\') {
            return Self { path: path.replace('\\', "/") };
        }
        return Self { path };
    }

    /// Join `parts` onto `base` and collapse `.`/`..` segments.
    pub fn append(base: &str, parts: &[&str]) -> Self {
        let mut joined = base.to_string();
        for part in parts {
            if part.is_empty() {
                continue;
            }
            if !joined.is_empty() && !joined.ends_with('/') {
                joined.push('/');
            }
            joined.push_str(part);
        }
        return Self::new(normalize(&joined));
    }

    /// The full path text.
    pub fn file_path(&self) -> &str {
        return &self.path;
    }

    /// Last path segment, including the extension.
    pub fn file_name(&self) -> &str {
        return match self.path.rfind('/') {
            Some(pos) => self.path.get(pos.saturating_add(1)..).unwrap_or(""),
            None => &self.path,
        };
    }

    /// File name without its extension. A leading dot counts as the extension separator,
    /// so `.png` has an empty name and the extension `png`.
    pub fn file_name_no_ext(&self) -> &str {
        let name = self.file_name();
        return match name.rfind('.') {
            Some(pos) => name.get(..pos).unwrap_or(""),
            None => name,
        };
    }

    /// Lower-cased extension without the leading dot, empty when there is none.
    pub fn ext(&self) -> String {
        let name = self.file_name();
        return match name.rfind('.') {
            Some(pos) => name.get(pos.saturating_add(1)..).unwrap_or("").to_lowercase(),
            None => String::new(),
        };
    }

    /// Whether the file name carries an extension.
    pub fn has_ext(&self) -> bool {
        return !self.ext().is_empty();
    }

    /// Directory portion including the trailing slash, empty for a bare name.
    pub fn dir(&self) -> &str {
        return match self.path.rfind('/') {
            Some(pos) => self.path.get(..=pos).unwrap_or(""),
            None => "",
        };
    }

    /// URI scheme (`https`, `file`, `mailto`...) when present.
    ///
    /// Single letter schemes are rejected so `C:/dir` stays a path.
    pub fn scheme(&self) -> Option<&str> {
        let colon = self.path.find(':')?;
        let scheme = self.path.get(..colon)?;
        let mut chars = scheme.chars();
        let first = chars.next()?;
        if scheme.len() < 2 || !first.is_ascii_alphabetic() {
            return None;
        }
        if !chars.all(|c| return c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
            return None;
        }
        return Some(scheme);
    }

    /// Has a URI scheme, local `file:` URIs included.
    pub fn is_uri(&self) -> bool {
        return self.scheme().is_some() || self.path.starts_with("//");
    }

    /// Points outside the local filesystem: any scheme other than `file`.
    pub fn is_external(&self) -> bool {
        if self.path.starts_with("//") {
            return true;
        }
        return self.scheme().is_some_and(|s| return !s.eq_ignore_ascii_case("file"));
    }

    /// Not external.
    pub fn is_local(&self) -> bool {
        return !self.is_external();
    }

    /// A `file:` URI.
    pub fn is_file_uri(&self) -> bool {
        return self.scheme().is_some_and(|s| return s.eq_ignore_ascii_case("file"));
    }

    /// Rooted path or any URI.
    pub fn is_absolute(&self) -> bool {
        return self.path.starts_with('/') || self.is_uri();
    }

    /// Extension is in the markdown class.
    pub fn is_markdown_ext(&self) -> bool {
        return MARKDOWN_EXTENSIONS.contains(&self.ext().as_str());
    }

    /// Extension is in the image class.
    pub fn is_image_ext(&self) -> bool {
        return IMAGE_EXTENSIONS.contains(&self.ext().as_str());
    }

    /// Filesystem path of a `file:` URI, percent-decoded.
    pub fn local_path(&self) -> Option<String> {
        if !self.is_file_uri() {
            return None;
        }
        let rest = self.path.get(5..)?;
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        // file://host/path is not supported, only file:///path and file:/path
        let decoded = urlencoding::decode(rest).ok()?;
        return Some(decoded.into_owned());
    }

    /// `file://` URI for this path with spaces and `#` escaped.
    pub fn to_file_uri(&self) -> String {
        if self.is_uri() {
            return self.path.clone();
        }
        return format!("{FILE_URI_PREFIX}{}", encode_link_chars(&self.path));
    }
}

impl fmt::Display for PathInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.path);
    }
}

impl From<&str> for PathInfo {
    fn from(path: &str) -> Self {
        return Self::new(path);
    }
}

/// Percent-encode the characters that break a markdown link address: space and `#`.
pub fn encode_link_chars(text: &str) -> String {
    return text.replace(' ', "%20").replace('#', "%23");
}

/// Percent-encode spaces only.
pub fn encode_spaces(text: &str) -> String {
    return text.replace(' ', "%20");
}

/// Collapse `.` and `..` segments without touching the filesystem.
/// Keeps a leading `/`, a trailing `/`, and leading `..` that cannot be popped.
pub fn normalize(path: &str) -> String {
    let rooted = path.starts_with('/');
    let trailing = path.ends_with('/') && path.len() > 1;
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                let can_pop = segments.last().is_some_and(|s| return *s != "..");
                if can_pop {
                    segments.pop();
                } else if !rooted {
                    segments.push(segment);
                }
            },
            other => segments.push(other),
        }
    }

    let mut out = String::with_capacity(path.len());
    if rooted {
        out.push('/');
    }
    out.push_str(&segments.join("/"));
    if trailing && !segments.is_empty() {
        out.push('/');
    }
    return out;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_extension() {
        let info = PathInfo::new("/repo/docs/Read Me.MD");
        assert_eq!(info.file_name(), "Read Me.MD");
        assert_eq!(info.file_name_no_ext(), "Read Me");
        assert_eq!(info.ext(), "md");
        assert_eq!(info.dir(), "/repo/docs/");
        assert!(info.is_markdown_ext());
    }

    #[test]
    fn bare_extension_has_empty_name() {
        let info = PathInfo::new(".png");
        assert_eq!(info.file_name_no_ext(), "");
        assert_eq!(info.ext(), "png");
        assert!(info.is_image_ext());
    }

    #[test]
    fn backslashes_become_slashes() {
        assert_eq!(PathInfo::new(r"C:\src\a.md").file_path(), "C:/src/a.md");
    }

    #[test]
    fn drive_letter_is_not_a_scheme() {
        let info = PathInfo::new("C:/src/a.md");
        assert!(!info.is_uri());
        assert!(info.is_local());
    }

    #[test]
    fn classifies_external_and_file_uris() {
        assert!(PathInfo::new("https://github.com/u/r").is_external());
        assert!(PathInfo::new("mailto:me@example.com").is_external());
        let file = PathInfo::new("file:///repo/a%20b.md");
        assert!(file.is_uri());
        assert!(file.is_local());
        assert_eq!(file.local_path().as_deref(), Some("/repo/a b.md"));
    }

    #[test]
    fn file_uri_escapes_space_and_hash() {
        let info = PathInfo::new("/repo/Space In#6.md");
        assert_eq!(info.to_file_uri(), "file:///repo/Space%20In%236.md");
    }

    #[test]
    fn normalize_collapses_parent_segments() {
        assert_eq!(normalize("/repo/sub/../a.md"), "/repo/a.md");
        assert_eq!(normalize("../../a/./b/"), "../../a/b/");
        assert_eq!(normalize("/../a"), "/a");
    }

    #[test]
    fn append_inserts_separators() {
        assert_eq!(PathInfo::append("/repo/sub/", &["..", "x.md"]).file_path(), "/repo/x.md");
        assert_eq!(PathInfo::append("/repo", &["blob", "master"]).file_path(), "/repo/blob/master");
    }
}
