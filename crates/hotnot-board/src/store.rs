//! Filesystem-backed content store.
//!
//! Every slot is one file in the data directory, named by
//! [`SlotAddress::file_name`]. Writes go to a temporary file in the same
//! directory which is then renamed over the slot, so a reader sees either
//! the old content or the new content, never a mix.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::BoardError;
use crate::address::SlotAddress;
use crate::types::{Assessment, Identity, TopicTitle};

/// Store of topic bodies, comments and assessments.
#[derive(Debug, Clone)]
pub struct ContentStore {
    dir: PathBuf,
}

impl ContentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    // =========================================================================
    // Topic bodies
    // =========================================================================

    pub fn get_body(&self, topic: &TopicTitle) -> Result<Option<Vec<u8>>, BoardError> {
        self.read_slot(&SlotAddress::Body(topic.clone()))
    }

    pub fn put_body(&self, topic: &TopicTitle, markdown: &[u8]) -> Result<(), BoardError> {
        let slot = SlotAddress::Body(topic.clone());
        let created = !self.slot_path(&slot).exists();
        self.write_slot(&slot, markdown)?;
        if created {
            info!(topic = %topic, "topic created");
        }
        Ok(())
    }

    // =========================================================================
    // Comments
    // =========================================================================

    pub fn get_comment(
        &self,
        topic: &TopicTitle,
        identity: &Identity,
    ) -> Result<Option<Vec<u8>>, BoardError> {
        self.read_slot(&SlotAddress::Comment(topic.clone(), identity.clone()))
    }

    pub fn put_comment(
        &self,
        topic: &TopicTitle,
        identity: &Identity,
        markdown: &[u8],
    ) -> Result<(), BoardError> {
        self.write_slot(
            &SlotAddress::Comment(topic.clone(), identity.clone()),
            markdown,
        )
    }

    /// Whether `identity` has a comment on `topic`, without reading it.
    pub fn has_comment(&self, topic: &TopicTitle, identity: &Identity) -> Result<bool, BoardError> {
        let path = self.slot_path(&SlotAddress::Comment(topic.clone(), identity.clone()));
        match fs::metadata(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BoardError::store(path, e)),
        }
    }

    // =========================================================================
    // Assessments
    // =========================================================================

    /// Stored assessment, `None` when the slot is absent.
    ///
    /// Callers apply the Shrug default; the store only reports presence.
    pub fn get_assessment(
        &self,
        topic: &TopicTitle,
        identity: &Identity,
    ) -> Result<Option<Assessment>, BoardError> {
        let Some(bytes) =
            self.read_slot(&SlotAddress::Assessment(topic.clone(), identity.clone()))?
        else {
            return Ok(None);
        };
        String::from_utf8_lossy(&bytes).parse().map(Some)
    }

    /// Stored assessment with the Shrug default applied.
    ///
    /// Unrecognised slot content is logged and read as Shrug; only storage
    /// failures are errors.
    pub fn assessment_or_shrug(
        &self,
        topic: &TopicTitle,
        identity: &Identity,
    ) -> Result<Assessment, BoardError> {
        match self.get_assessment(topic, identity) {
            Ok(assessment) => Ok(assessment.unwrap_or_default()),
            Err(BoardError::InvalidAssessment(value)) => {
                warn!(
                    topic = %topic,
                    identity = %identity,
                    value = %value,
                    "unrecognised stored assessment, reading as Shrug"
                );
                Ok(Assessment::Shrug)
            }
            Err(e) => Err(e),
        }
    }

    pub fn put_assessment(
        &self,
        topic: &TopicTitle,
        identity: &Identity,
        assessment: Assessment,
    ) -> Result<(), BoardError> {
        self.write_slot(
            &SlotAddress::Assessment(topic.clone(), identity.clone()),
            assessment.as_str().as_bytes(),
        )
    }

    // =========================================================================
    // Enumeration
    // =========================================================================

    /// Titles of every topic with a body.
    pub fn list_topics(&self) -> Result<Vec<TopicTitle>, BoardError> {
        Ok(self
            .list_slots()?
            .into_iter()
            .filter_map(|slot| match slot {
                SlotAddress::Body(topic) => Some(topic),
                _ => None,
            })
            .collect())
    }

    /// Identities with a comment on `topic`.
    pub fn list_identities_with_comment(
        &self,
        topic: &TopicTitle,
    ) -> Result<BTreeSet<Identity>, BoardError> {
        Ok(self
            .list_slots()?
            .into_iter()
            .filter_map(|slot| match slot {
                SlotAddress::Comment(t, identity) if &t == topic => Some(identity),
                _ => None,
            })
            .collect())
    }

    /// Commenters of every topic, from one directory scan.
    pub fn list_commenters(&self) -> Result<BTreeMap<TopicTitle, BTreeSet<Identity>>, BoardError> {
        let mut commenters: BTreeMap<TopicTitle, BTreeSet<Identity>> = BTreeMap::new();
        for slot in self.list_slots()? {
            if let SlotAddress::Comment(topic, identity) = slot {
                commenters.entry(topic).or_default().insert(identity);
            }
        }
        Ok(commenters)
    }

    /// Every well-formed slot in directory order. A missing directory is empty.
    fn list_slots(&self) -> Result<Vec<SlotAddress>, BoardError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(BoardError::store(&self.dir, e)),
        };

        let mut slots = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BoardError::store(&self.dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            // Skip hidden files (temporary files from in-flight writes)
            if name.starts_with('.') {
                continue;
            }
            if let Some(slot) = SlotAddress::parse_file_name(name) {
                slots.push(slot);
            }
        }
        slots.sort_by_key(SlotAddress::file_name);
        Ok(slots)
    }

    // =========================================================================
    // Slot I/O
    // =========================================================================

    fn slot_path(&self, slot: &SlotAddress) -> PathBuf {
        self.dir.join(slot.file_name())
    }

    fn read_slot(&self, slot: &SlotAddress) -> Result<Option<Vec<u8>>, BoardError> {
        let path = self.slot_path(slot);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(slot = %slot.file_name(), bytes = bytes.len(), "read slot");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BoardError::store(path, e)),
        }
    }

    /// Replace a slot's content atomically, creating the directory if needed.
    fn write_slot(&self, slot: &SlotAddress, content: &[u8]) -> Result<(), BoardError> {
        fs::create_dir_all(&self.dir).map_err(|e| BoardError::store(&self.dir, e))?;

        let path = self.slot_path(slot);
        let mut file =
            NamedTempFile::new_in(&self.dir).map_err(|e| BoardError::store(&self.dir, e))?;
        file.write_all(content)
            .map_err(|e| BoardError::store(file.path(), e))?;
        file.as_file()
            .sync_all()
            .map_err(|e| BoardError::store(file.path(), e))?;
        file.persist(&path)
            .map_err(|e| BoardError::store(&path, e.error))?;

        debug!(slot = %slot.file_name(), bytes = content.len(), "wrote slot");
        Ok(())
    }
}
