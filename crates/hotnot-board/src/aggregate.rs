//! Topic aggregation: sentiment statistics and the seen/unseen split.
//!
//! An assessment only counts when the same identity also commented on the
//! topic, so `hot + not + shrug == comments` for every summary. Identities
//! that never commented contribute nothing, so only commenters are visited.

use std::collections::BTreeSet;

use tracing::debug;

use crate::BoardError;
use crate::store::ContentStore;
use crate::types::{Assessment, Identity, TopicListing, TopicSummary, TopicTitle};

/// Scans the store and summarizes every topic for one viewer.
pub struct TopicAggregator<'a> {
    store: &'a ContentStore,
}

impl<'a> TopicAggregator<'a> {
    pub fn new(store: &'a ContentStore) -> Self {
        Self { store }
    }

    /// Summaries of every topic, split into unseen (`current`) and seen (`old`).
    ///
    /// Lists keep directory enumeration order.
    pub fn list_topics(&self, viewer: &Identity) -> Result<TopicListing, BoardError> {
        let topics = self.store.list_topics()?;
        let commenters = self.store.list_commenters()?;
        let no_commenters = BTreeSet::new();

        let mut listing = TopicListing::default();
        for topic in topics {
            let topic_commenters = commenters.get(&topic).unwrap_or(&no_commenters);
            let summary = self.summarize(topic, topic_commenters)?;

            if topic_commenters.contains(viewer) {
                listing.old.push(summary);
            } else {
                listing.current.push(summary);
            }
        }

        debug!(
            viewer = %viewer,
            current = listing.current.len(),
            old = listing.old.len(),
            "listed topics"
        );
        Ok(listing)
    }

    /// The unseen topic to visit after `after`.
    ///
    /// Wraps to the first unseen topic at the end of the list, or when `after`
    /// is not itself unseen. `None` when nothing is left unseen.
    pub fn next_topic(
        &self,
        viewer: &Identity,
        after: &TopicTitle,
    ) -> Result<Option<TopicTitle>, BoardError> {
        let current = self.list_topics(viewer)?.current;

        let next = match current.iter().position(|s| &s.title == after) {
            Some(index) if index + 1 < current.len() => current.get(index + 1),
            _ => current.first(),
        };
        Ok(next.map(|s| s.title.clone()))
    }

    fn summarize(
        &self,
        topic: TopicTitle,
        commenters: &BTreeSet<Identity>,
    ) -> Result<TopicSummary, BoardError> {
        let mut summary = TopicSummary::new(topic);

        for identity in commenters {
            summary.comment_count += 1;
            match self.store.assessment_or_shrug(&summary.title, identity)? {
                Assessment::Hot => summary.hot_count += 1,
                Assessment::Not => summary.not_count += 1,
                Assessment::Shrug => summary.shrug_count += 1,
            }
        }

        summary.hotness_percent = hotness_percent(summary.hot_count, summary.comment_count);
        Ok(summary)
    }
}

/// `round(hot / comments * 100)`, or 0 without comments.
pub fn hotness_percent(hot: usize, comments: usize) -> u8 {
    if comments == 0 {
        return 0;
    }
    ((hot as f64 / comments as f64) * 100.0).round() as u8
}
