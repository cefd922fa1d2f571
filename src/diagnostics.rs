use std::fmt::Write as _;

use linkref::Error;
use linkref::types::{FoundLink, MismatchReasons};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Print markdown to stderr, headings in bold.
pub fn print_markdown(md: &str) {
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as valid markdown and print it to stderr.
pub fn print_error(e: &Error) {
    print_markdown(&render_error(e));
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::NotInProject { path, root } => format!("\
# Error: Not In Project

`{}` is outside the project root `{}`.

## Fix

Pass the right root:

    linkref --root <dir> ...
", path.display(), root.display()),

        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Correct `.linkref.toml`; recognized keys are `branch`, `url`, `include`, `exclude`, `untracked`.
"),

        Error::Unsupported { capability } => format!("\
# Error: Unsupported

The resolver cannot answer `{capability}`.
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::Json(e) => format!("\
# Error: JSON

{e}
"),
    };
}

/// A link that resolved to nothing, with the closest candidate when one exists.
pub struct BrokenLink<'a> {
    /// The link as found in its document.
    pub link: &'a FoundLink,
    /// Closest loose match and why the link misses it.
    pub near_miss: Option<(String, MismatchReasons)>,
}

/// Render the broken links of a `check` run as a markdown report.
pub fn render_broken_links(broken: &[BrokenLink<'_>]) -> String {
    let mut out = String::from("# Broken Links\n\n");
    for entry in broken {
        let link = entry.link;
        let _ = writeln!(out, "- {}:{}  `{}`", link.source.display(), link.line, link.address);
        if let Some((candidate, reasons)) = &entry.near_miss {
            let _ = writeln!(out, "  did you mean `{candidate}`? ({reasons})");
        }
    }
    return out;
}
