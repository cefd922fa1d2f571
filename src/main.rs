mod commands;
mod diagnostics;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use linkref::options::{Links, Local, Remote, Want};
use linkref::{Error, LinkKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "linkref", about = "Resolve markdown, wiki and image links against a GitHub repository")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Project root
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the address to write in FILE to reach TARGET
    Address {
        /// Document the link is written in
        file: PathBuf,
        /// File the link should reach
        target: PathBuf,
        /// Branch or tag for repository addresses
        #[arg(long)]
        branch: Option<String>,
        /// Link syntax
        #[arg(long, value_enum, default_value_t = KindArg::Plain)]
        kind: KindArg,
        /// Keep the extension of wiki pages (addresses the file, not the page)
        #[arg(long)]
        with_ext: bool,
    },
    /// Scan markdown files and report links that resolve to nothing
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List completion candidates for a partial link
    Complete {
        /// Document the link is written in
        file: PathBuf,
        /// Text typed so far
        #[arg(default_value = "")]
        prefix: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print what a link in FILE resolves to
    Resolve {
        /// Document the link is written in
        file: PathBuf,
        /// Link address, anchor included unless given with --anchor
        link: String,
        /// Anchor fragment, taking LINK whole as the address
        #[arg(long)]
        anchor: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Link syntax and requested output forms.
#[derive(clap::Args)]
struct OutputArgs {
    /// Link syntax
    #[arg(long, value_enum, default_value_t = KindArg::Plain)]
    kind: KindArg,
    /// Offer repository pages alongside files
    #[arg(long, value_enum, default_value_t = LinksArg::Ref)]
    links: LinksArg,
    /// Local output form
    #[arg(long, value_enum, default_value_t = LocalArg::Ref)]
    local: LocalArg,
    /// Remote output form
    #[arg(long, value_enum, default_value_t = RemoteArg::Ref)]
    remote: RemoteArg,
}

impl OutputArgs {
    /// Resolution options for these flags.
    fn want(&self) -> Want {
        return Want::new().local(self.local.into()).remote(self.remote.into()).links(self.links.into());
    }
}

/// `--kind`: the syntax the link is written in.
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    /// `![alt](address)`
    Image,
    /// `[text](address)`
    Plain,
    /// `[[Page Name]]`
    Wiki,
}

/// `--links`: extra candidates when remote output is allowed.
#[derive(Clone, Copy, ValueEnum)]
enum LinksArg {
    /// Files only
    Ref,
    /// Also the repository's own pages when completing an empty link
    Url,
}

/// `--local`: how local files are printed.
#[derive(Clone, Copy, ValueEnum)]
enum LocalArg {
    /// Not at all
    None,
    /// File path
    Ref,
    /// `file://` URI
    Uri,
}

/// `--remote`: how version controlled files are printed when local output is off.
#[derive(Clone, Copy, ValueEnum)]
enum RemoteArg {
    /// Not at all
    None,
    /// File path
    Ref,
    /// Repository URI
    Uri,
    /// Repository URL
    Url,
}

impl From<KindArg> for LinkKind {
    fn from(kind: KindArg) -> Self {
        return match kind {
            KindArg::Image => Self::Image,
            KindArg::Plain => Self::Plain,
            KindArg::Wiki => Self::Wiki,
        };
    }
}

impl From<LinksArg> for Links {
    fn from(links: LinksArg) -> Self {
        return match links {
            LinksArg::Ref => Self::Ref,
            LinksArg::Url => Self::Url,
        };
    }
}

impl From<LocalArg> for Local {
    fn from(local: LocalArg) -> Self {
        return match local {
            LocalArg::None => Self::None,
            LocalArg::Ref => Self::Ref,
            LocalArg::Uri => Self::Uri,
        };
    }
}

impl From<RemoteArg> for Remote {
    fn from(remote: RemoteArg) -> Self {
        return match remote {
            RemoteArg::None => Self::None,
            RemoteArg::Ref => Self::Ref,
            RemoteArg::Uri => Self::Uri,
            RemoteArg::Url => Self::Url,
        };
    }
}

/// Log to stderr, filtered by `LINKREF_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("LINKREF_LOG").unwrap_or_else(|_| return EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let root = cli.root;

    let result: Result<ExitCode, Error> = match cli.command {
        Commands::Address { file, target, branch, kind, with_ext } => {
            commands::address(&root, &file, &target, kind.into(), with_ext, branch.as_deref())
                .map(|()| return ExitCode::SUCCESS)
        },
        Commands::Check { json } => commands::check(&root, json),
        Commands::Complete { file, prefix, output } => {
            commands::complete(&root, &file, &prefix, output.kind.into(), output.want())
                .map(|()| return ExitCode::SUCCESS)
        },
        Commands::Resolve { file, link, anchor, output } => {
            commands::resolve(&root, &file, &link, anchor.as_deref(), output.kind.into(), output.want())
        },
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}
