use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::link_ref::LinkKind;
use crate::types::FoundLink;

/// `[text](address)` and `![alt](address "title")`, address optionally in `<>`.
static INLINE_LINK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    return Regex::new(r#"(!?)\[([^\]]*)\]\(\s*<?([^)\s>]*)>?(?:\s+"[^"]*")?\s*\)"#).ok();
});

/// `[[Page]]` and `[[Text|Page]]`.
static WIKI_LINK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    return Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").ok();
});

/// Extract every link from markdown content, skipping fenced code blocks.
pub fn extract_links(content: &str, source: &Path) -> Vec<FoundLink> {
    let mut links = Vec::new();
    let mut fence: Option<&str> = None;

    for (index, line) in content.lines().enumerate() {
        let line_number: u32 = index.saturating_add(1).try_into().unwrap_or(u32::MAX);
        let trimmed = line.trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        extract_links_from_line(line, line_number, source, &mut links);
    }
    return links;
}

/// Extract links from one markdown line.
fn extract_links_from_line(line: &str, line_number: u32, source: &Path, links: &mut Vec<FoundLink>) {
    if let Some(wiki) = WIKI_LINK.as_ref() {
        for cap in wiki.captures_iter(line) {
            links.push(wiki_link_from_capture(&cap, line_number, source));
        }
    }

    let Some(inline) = INLINE_LINK.as_ref() else {
        return;
    };
    for cap in inline.captures_iter(line) {
        // The closing brackets of a wiki link look like an empty inline link text.
        let start = cap.get(0).map_or(0, |m| return m.start());
        if line.get(..start).is_some_and(|before| return before.ends_with('[')) {
            continue;
        }
        let kind = if cap.get(1).is_some_and(|m| return !m.as_str().is_empty()) { LinkKind::Image } else { LinkKind::Plain };
        let address = cap.get(3).map_or("", |m| return m.as_str());
        links.push(FoundLink {
            address: address.to_string(),
            kind,
            line: line_number,
            source: source.to_path_buf(),
        });
    }
}

/// Page name of a wiki link capture: the part after `|` when present.
fn wiki_link_from_capture(cap: &Captures<'_>, line_number: u32, source: &Path) -> FoundLink {
    let page = cap.get(2).or_else(|| return cap.get(1)).map_or("", |m| return m.as_str());
    return FoundLink {
        address: page.trim().to_string(),
        kind: LinkKind::Wiki,
        line: line_number,
        source: source.to_path_buf(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addresses(content: &str) -> Vec<(LinkKind, String)> {
        return extract_links(content, Path::new("doc.md"))
            .into_iter()
            .map(|l| (l.kind, l.address))
            .collect();
    }

    #[test]
    fn finds_each_link_kind() {
        let found = addresses("See [guide](docs/guide.md#intro), ![logo](<img/logo.png> \"Logo\") and [[Home Page]].");
        assert_eq!(
            found,
            [
                (LinkKind::Wiki, "Home Page".to_string()),
                (LinkKind::Plain, "docs/guide.md#intro".to_string()),
                (LinkKind::Image, "img/logo.png".to_string()),
            ]
        );
    }

    #[test]
    fn wiki_link_text_is_not_the_page() {
        let found = addresses("[[the start|Home]]");
        assert_eq!(found, [(LinkKind::Wiki, "Home".to_string())]);
    }

    #[test]
    fn skips_fenced_code() {
        let found = addresses("```\n[not](a.md)\n```\n~~~md\n[[Nope]]\n~~~\n[yes](b.md)\n");
        assert_eq!(found, [(LinkKind::Plain, "b.md".to_string())]);
    }

    #[test]
    fn records_line_numbers() {
        let links = extract_links("intro\n\n[a](a.md)\n", Path::new("doc.md"));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].line, 3);
    }
}
