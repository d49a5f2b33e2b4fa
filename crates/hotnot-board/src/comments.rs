//! Collects a topic's comments with their authors' assessments.

use tracing::{debug, warn};

use crate::BoardError;
use crate::renderer::render_markdown;
use crate::store::ContentStore;
use crate::types::{CommentView, Identity, TopicTitle};

pub struct CommentCollector<'a> {
    store: &'a ContentStore,
}

impl<'a> CommentCollector<'a> {
    pub fn new(store: &'a ContentStore) -> Self {
        Self { store }
    }

    /// Render every comment on `topic`.
    ///
    /// A comment that disappears or fails to read after listing is skipped
    /// and logged; only a failure to list the topic's comments is an error.
    /// An unrecognised stored assessment shows as Shrug.
    pub fn collect(&self, topic: &TopicTitle) -> Result<Vec<CommentView>, BoardError> {
        let identities = self.store.list_identities_with_comment(topic)?;

        let mut views = Vec::with_capacity(identities.len());
        for identity in identities {
            match self.view(topic, &identity) {
                Ok(Some(view)) => views.push(view),
                Ok(None) => {
                    debug!(topic = %topic, identity = %identity, "comment vanished before read");
                }
                Err(e) => {
                    warn!(topic = %topic, identity = %identity, error = %e, "skipping comment");
                }
            }
        }
        Ok(views)
    }

    fn view(
        &self,
        topic: &TopicTitle,
        identity: &Identity,
    ) -> Result<Option<CommentView>, BoardError> {
        let Some(markdown) = self.store.get_comment(topic, identity)? else {
            return Ok(None);
        };
        let assessment = self.store.assessment_or_shrug(topic, identity)?;

        Ok(Some(CommentView {
            identity: identity.clone(),
            html: render_markdown(topic.as_str(), &String::from_utf8_lossy(&markdown)),
            assessment,
            reaction_asset: assessment.reaction_asset(),
        }))
    }
}
