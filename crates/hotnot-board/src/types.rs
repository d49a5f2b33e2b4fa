//! Core board types.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::BoardError;

/// Character class shared by topic titles and identity tokens.
///
/// Excluding `_` and `.` keeps slot file names unambiguous, see [`crate::address`].
static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").unwrap());

/// Validated topic title.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TopicTitle(String);

impl TopicTitle {
    /// Validate a title against `[A-Za-z0-9-]+`.
    pub fn parse(title: &str) -> Result<Self, BoardError> {
        if SLUG_PATTERN.is_match(title) {
            Ok(Self(title.to_string()))
        } else {
            Err(BoardError::InvalidTopic(title.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque per-client token.
///
/// Tokens produced by [`crate::IdentityResolver`] are 40 lowercase hex digits.
/// Anything matching the slot character class is accepted so that tokens
/// read back from disk can be reconstructed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn parse(token: &str) -> Result<Self, BoardError> {
        if SLUG_PATTERN.is_match(token) {
            Ok(Self(token.to_string()))
        } else {
            Err(BoardError::InvalidIdentity(token.to_string()))
        }
    }

    /// Wrap a hex digest, which always satisfies the slot character class.
    pub(crate) fn from_digest(hex: String) -> Self {
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sentiment verdict one identity records per topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Assessment {
    Hot,
    Not,
    #[default]
    Shrug,
}

impl Assessment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Not => "Not",
            Self::Shrug => "Shrug",
        }
    }

    /// Image shown next to a comment carrying this assessment.
    pub fn reaction_asset(&self) -> &'static str {
        match self {
            Self::Hot => "yes.gif",
            Self::Not => "no.png",
            Self::Shrug => "shrug.jpg",
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Assessment {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Hot" => Ok(Self::Hot),
            "Not" => Ok(Self::Not),
            "Shrug" => Ok(Self::Shrug),
            other => Err(BoardError::InvalidAssessment(other.to_string())),
        }
    }
}

/// Kind of content a save request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    /// The topic body.
    Edit,
    /// The caller's comment (and optionally assessment).
    Comment,
    /// The caller's assessment alone.
    Assessment,
}

impl FromStr for SaveKind {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit" => Ok(Self::Edit),
            "comment" => Ok(Self::Comment),
            "assessment" => Ok(Self::Assessment),
            other => Err(BoardError::InvalidKind(other.to_string())),
        }
    }
}

/// Per-topic sentiment statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSummary {
    pub title: TopicTitle,
    pub hot_count: usize,
    pub not_count: usize,
    pub shrug_count: usize,
    pub comment_count: usize,
    pub hotness_percent: u8,
}

impl TopicSummary {
    pub(crate) fn new(title: TopicTitle) -> Self {
        Self {
            title,
            hot_count: 0,
            not_count: 0,
            shrug_count: 0,
            comment_count: 0,
            hotness_percent: 0,
        }
    }
}

/// Topics split relative to one viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicListing {
    /// Topics the viewer has not commented on.
    pub current: Vec<TopicSummary>,
    /// Topics the viewer has commented on.
    pub old: Vec<TopicSummary>,
}

/// One comment prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub identity: Identity,
    pub html: String,
    pub assessment: Assessment,
    pub reaction_asset: &'static str,
}
