//! The board facade: the operations the web layer calls.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::BoardError;
use crate::aggregate::TopicAggregator;
use crate::comments::CommentCollector;
use crate::identity::{IdentityRegistry, IdentityResolver};
use crate::renderer::render_markdown;
use crate::store::ContentStore;
use crate::types::{Assessment, CommentView, Identity, SaveKind, TopicListing, TopicTitle};

/// Where the board keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Directory holding topic bodies, comments and assessments.
    pub data_dir: PathBuf,
    /// Directory for the identity audit mapping. `None` disables it.
    pub users_dir: Option<PathBuf>,
}

impl BoardConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            users_dir: None,
        }
    }

    pub fn with_users_dir(mut self, users_dir: impl Into<PathBuf>) -> Self {
        self.users_dir = Some(users_dir.into());
        self
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new("data").with_users_dir("users")
    }
}

/// A topic as seen by one viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPage {
    pub title: TopicTitle,
    /// Raw body markdown.
    pub markdown: String,
    /// Sanitized body HTML.
    pub html: String,
    /// The viewer's own comment markdown, if they left one.
    pub own_comment: Option<String>,
    /// The viewer's assessment, Shrug when unset.
    pub own_assessment: Assessment,
}

/// A submitted save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub kind: SaveKind,
    pub markdown: String,
    pub assessment: Option<Assessment>,
}

impl Submission {
    /// Build a submission from raw form fields.
    ///
    /// The kind is checked first so an unknown kind is rejected before any
    /// other field is looked at. An empty assessment field means none.
    pub fn from_form(kind: &str, markdown: &str, assessment: &str) -> Result<Self, BoardError> {
        let kind = kind.parse()?;
        let assessment = match assessment.trim() {
            "" => None,
            value => Some(value.parse()?),
        };
        Ok(Self {
            kind,
            markdown: markdown.to_string(),
            assessment,
        })
    }
}

/// Content board over a data directory.
#[derive(Debug, Clone)]
pub struct Board {
    store: ContentStore,
    resolver: IdentityResolver,
}

impl Board {
    /// Open a board. Nothing touches the filesystem until the first call.
    pub fn open(config: BoardConfig) -> Self {
        let resolver = match config.users_dir {
            Some(dir) => IdentityResolver::new(IdentityRegistry::new(dir)),
            None => IdentityResolver::without_registry(),
        };
        Self {
            store: ContentStore::new(config.data_dir),
            resolver,
        }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn resolve_identity(&self, address: &str) -> Identity {
        self.resolver.resolve(address)
    }

    pub fn resolve_socket(&self, address: SocketAddr) -> Identity {
        self.resolver.resolve_socket(address)
    }

    // =========================================================================
    // Topics
    // =========================================================================

    /// Load a topic body with its rendered HTML.
    ///
    /// Fails with [`BoardError::NotFound`] when the topic has no body yet.
    pub fn load_topic(&self, title: &TopicTitle, viewer: &Identity) -> Result<TopicPage, BoardError> {
        let body = self
            .store
            .get_body(title)?
            .ok_or_else(|| BoardError::NotFound(format!("topic {}", title)))?;
        let markdown = String::from_utf8_lossy(&body).into_owned();
        let html = render_markdown(title.as_str(), &markdown);

        let own_comment = self
            .store
            .get_comment(title, viewer)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
        let own_assessment = self.store.assessment_or_shrug(title, viewer)?;

        Ok(TopicPage {
            title: title.clone(),
            markdown,
            html,
            own_comment,
            own_assessment,
        })
    }

    /// Store a submission. Returns whether anything was written.
    pub fn save(
        &self,
        title: &TopicTitle,
        identity: &Identity,
        submission: &Submission,
    ) -> Result<bool, BoardError> {
        let markdown = submission.markdown.as_bytes();
        if markdown.is_empty() && submission.assessment.is_none() {
            debug!(topic = %title, "empty submission, nothing to save");
            return Ok(false);
        }

        match submission.kind {
            SaveKind::Edit => {
                if markdown.is_empty() {
                    return Ok(false);
                }
                self.store.put_body(title, markdown)?;
            }
            SaveKind::Comment => {
                if let Some(assessment) = submission.assessment {
                    self.store.put_assessment(title, identity, assessment)?;
                }
                self.store.put_comment(title, identity, markdown)?;
            }
            SaveKind::Assessment => {
                let assessment = match submission.assessment {
                    Some(assessment) => assessment,
                    None => submission.markdown.parse()?,
                };
                self.store.put_assessment(title, identity, assessment)?;
            }
        }

        info!(topic = %title, identity = %identity, kind = ?submission.kind, "saved");
        Ok(true)
    }

    /// Current and old topics for a viewer.
    pub fn list_topics(&self, viewer: &Identity) -> Result<TopicListing, BoardError> {
        self.aggregator().list_topics(viewer)
    }

    /// The unseen topic to visit after `after`, if any remain.
    pub fn next_topic(
        &self,
        viewer: &Identity,
        after: &TopicTitle,
    ) -> Result<Option<TopicTitle>, BoardError> {
        self.aggregator().next_topic(viewer, after)
    }

    /// Every comment on a topic, rendered.
    pub fn collect_comments(&self, title: &TopicTitle) -> Result<Vec<CommentView>, BoardError> {
        CommentCollector::new(&self.store).collect(title)
    }

    fn aggregator(&self) -> TopicAggregator<'_> {
        TopicAggregator::new(&self.store)
    }
}
