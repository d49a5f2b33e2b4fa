//! Slot addressing: the mapping between slots and file names.
//!
//! Layout inside the data directory:
//! - `{topic}.md` - topic body
//! - `{topic}_comment_{identity}.md` - one identity's comment
//! - `{topic}_assessment_{identity}.md` - one identity's assessment
//!
//! Topics and identities never contain `_` or `.`, so the kind marker is
//! unambiguous in both directions.

use crate::types::{Identity, TopicTitle};

const EXTENSION: &str = ".md";
const COMMENT_MARKER: &str = "_comment_";
const ASSESSMENT_MARKER: &str = "_assessment_";

/// Address of one stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotAddress {
    Body(TopicTitle),
    Comment(TopicTitle, Identity),
    Assessment(TopicTitle, Identity),
}

impl SlotAddress {
    /// Compose the file name for this slot.
    pub fn file_name(&self) -> String {
        match self {
            Self::Body(topic) => format!("{}{}", topic, EXTENSION),
            Self::Comment(topic, identity) => {
                format!("{}{}{}{}", topic, COMMENT_MARKER, identity, EXTENSION)
            }
            Self::Assessment(topic, identity) => {
                format!("{}{}{}{}", topic, ASSESSMENT_MARKER, identity, EXTENSION)
            }
        }
    }

    /// Parse a file name back into a slot address.
    ///
    /// Returns `None` for anything that is not a well-formed slot name
    /// (hidden temp files, stray files, unknown kind markers).
    pub fn parse_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(EXTENSION)?;

        if let Some((topic, identity)) = stem.split_once(COMMENT_MARKER) {
            return Some(Self::Comment(
                TopicTitle::parse(topic).ok()?,
                Identity::parse(identity).ok()?,
            ));
        }

        if let Some((topic, identity)) = stem.split_once(ASSESSMENT_MARKER) {
            return Some(Self::Assessment(
                TopicTitle::parse(topic).ok()?,
                Identity::parse(identity).ok()?,
            ));
        }

        TopicTitle::parse(stem).ok().map(Self::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(s: &str) -> TopicTitle {
        TopicTitle::parse(s).unwrap()
    }

    fn identity(s: &str) -> Identity {
        Identity::parse(s).unwrap()
    }

    #[test]
    fn test_file_names() {
        assert_eq!(SlotAddress::Body(topic("go")).file_name(), "go.md");
        assert_eq!(
            SlotAddress::Comment(topic("go"), identity("abc123")).file_name(),
            "go_comment_abc123.md"
        );
        assert_eq!(
            SlotAddress::Assessment(topic("go"), identity("abc123")).file_name(),
            "go_assessment_abc123.md"
        );
    }

    #[test]
    fn test_parse_distinguishes_kinds() {
        assert_eq!(
            SlotAddress::parse_file_name("go.md"),
            Some(SlotAddress::Body(topic("go")))
        );
        assert_eq!(
            SlotAddress::parse_file_name("go_comment_abc.md"),
            Some(SlotAddress::Comment(topic("go"), identity("abc")))
        );
        assert_eq!(
            SlotAddress::parse_file_name("go-lang_assessment_abc.md"),
            Some(SlotAddress::Assessment(topic("go-lang"), identity("abc")))
        );
    }

    #[test]
    fn test_parse_rejects_foreign_files() {
        assert_eq!(SlotAddress::parse_file_name(".tmpXYZ"), None);
        assert_eq!(SlotAddress::parse_file_name("go.txt"), None);
        assert_eq!(SlotAddress::parse_file_name("go_reply_abc.md"), None);
        assert_eq!(SlotAddress::parse_file_name("_comment_abc.md"), None);
        assert_eq!(SlotAddress::parse_file_name("go_comment_.md"), None);
    }
}
