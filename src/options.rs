//! What a resolution call wants back: local and remote forms, link style, match mode.
//!
//! A [`Want`] holds exactly one value per axis. Axis values compose with `|`, a later
//! value for the same axis replacing the earlier one:
//!
//! ```
//! use linkref::options::{Local, Match, Remote, Want};
//!
//! let want = Local::Uri | Remote::Uri | Match::Completion;
//! assert_eq!(want, Want::new().local(Local::Uri).remote(Remote::Uri).matching(Match::Completion));
//! ```

use std::fmt;
use std::ops::BitOr;

use serde::Serialize;

/// How local targets are returned, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Local {
    /// Local targets are not wanted.
    None,
    /// The file path.
    #[default]
    Ref,
    /// A `file://` URI.
    Uri,
}

/// How remote targets are returned, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Remote {
    /// Remote targets are not wanted.
    None,
    /// The local path of a version controlled file.
    #[default]
    Ref,
    /// The repository URI of a version controlled file.
    Uri,
    /// The repository URL string of a version controlled file.
    Url,
}

/// Whether repository pages join the files as candidates.
///
/// Local forms still win over repository URLs for matched files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Links {
    /// Files only.
    #[default]
    Ref,
    /// Also the repository's own pages (issues, pulls...) when completing an empty
    /// plain link with remote output allowed.
    Url,
}

/// Exact single-target resolution or loose multi-candidate completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Match {
    /// Loose matching for completion.
    Completion,
    /// Exact resolution.
    #[default]
    Default,
}

/// One value of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WantPart {
    /// Links axis value.
    Links(Links),
    /// Local axis value.
    Local(Local),
    /// Match axis value.
    Match(Match),
    /// Remote axis value.
    Remote(Remote),
}

/// Options for one resolution call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Want {
    /// Link style.
    links: Links,
    /// Local output.
    local: Local,
    /// Match mode.
    matching: Match,
    /// Remote output.
    remote: Remote,
}

impl Want {
    /// Local and remote references, exact matching.
    pub const fn new() -> Self {
        return Self {
            links: Links::Ref,
            local: Local::Ref,
            matching: Match::Default,
            remote: Remote::Ref,
        };
    }

    /// Replace the local axis.
    #[must_use]
    pub const fn local(mut self, local: Local) -> Self {
        self.local = local;
        return self;
    }

    /// Replace the remote axis.
    #[must_use]
    pub const fn remote(mut self, remote: Remote) -> Self {
        self.remote = remote;
        return self;
    }

    /// Replace the links axis.
    #[must_use]
    pub const fn links(mut self, links: Links) -> Self {
        self.links = links;
        return self;
    }

    /// Replace the match axis.
    #[must_use]
    pub const fn matching(mut self, matching: Match) -> Self {
        self.matching = matching;
        return self;
    }

    /// Replace whichever axis `part` belongs to.
    #[must_use]
    pub const fn with(self, part: WantPart) -> Self {
        return match part {
            WantPart::Local(v) => self.local(v),
            WantPart::Links(v) => self.links(v),
            WantPart::Match(v) => self.matching(v),
            WantPart::Remote(v) => self.remote(v),
        };
    }

    /// Local axis value.
    pub const fn local_mode(&self) -> Local {
        return self.local;
    }

    /// Remote axis value.
    pub const fn remote_mode(&self) -> Remote {
        return self.remote;
    }

    /// Links axis value.
    pub const fn links_mode(&self) -> Links {
        return self.links;
    }

    /// Match axis value.
    pub const fn match_mode(&self) -> Match {
        return self.matching;
    }

    /// Local targets are acceptable.
    pub fn wants_local(&self) -> bool {
        return self.local != Local::None;
    }

    /// Remote targets are acceptable.
    pub fn wants_remote(&self) -> bool {
        return self.remote != Remote::None;
    }

    /// Repository URLs are preferred.
    pub fn wants_links_url(&self) -> bool {
        return self.links == Links::Url;
    }

    /// Loose multi-candidate matching.
    pub fn is_completion(&self) -> bool {
        return self.matching == Match::Completion;
    }
}

impl fmt::Display for Want {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(
            f,
            "Want(Local.{:?}, Remote.{:?}, Links.{:?}, Match.{:?})",
            self.local, self.remote, self.links, self.matching
        );
    }
}

/// `From` and `|` for every axis type.
macro_rules! want_axis {
    ($axis:ident) => {
        impl From<$axis> for WantPart {
            fn from(value: $axis) -> Self {
                return WantPart::$axis(value);
            }
        }

        impl From<$axis> for Want {
            fn from(value: $axis) -> Self {
                return Want::new().with(WantPart::$axis(value));
            }
        }

        impl<P: Into<WantPart>> BitOr<P> for $axis {
            type Output = Want;

            fn bitor(self, rhs: P) -> Want {
                return Want::from(self).with(rhs.into());
            }
        }
    };
}

want_axis!(Local);
want_axis!(Remote);
want_axis!(Links);
want_axis!(Match);

impl<P: Into<WantPart>> BitOr<P> for Want {
    type Output = Self;

    fn bitor(self, rhs: P) -> Self {
        return self.with(rhs.into());
    }
}
