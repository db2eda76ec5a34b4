//! The append-only record of a chat session.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use little_chat_responder::Attachment;
use serde::Serialize;

/// Identifies an entry by its position of creation, starting at 1.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    /// Returns the raw value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "msg:{}", self.0)
    }
}

/// Who authored an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Composed and submitted by the user.
    User,
    /// Produced by the responder.
    Assistant,
}

/// An entry of the transcript. It never changes after being appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    id: EntryId,
    text: String,
    origin: Origin,
    created_at: DateTime<Utc>,
    attachment: Option<Arc<Attachment>>,
}

impl TranscriptEntry {
    /// Returns the id of this entry.
    #[inline]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Returns the message body. It may be empty for a user entry that
    /// carries an attachment.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns who authored this entry.
    #[inline]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Returns when this entry was created. For display only, the order of
    /// the transcript is authoritative.
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the attachment, if any.
    #[inline]
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_deref()
    }
}

/// An ordered sequence of entries, which can only grow.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Returns all entries in append order.
    #[inline]
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been appended yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry with the given id.
    pub fn get(&self, id: EntryId) -> Option<&TranscriptEntry> {
        let idx = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.entries.get(idx)
    }

    pub(crate) fn append(
        &mut self,
        origin: Origin,
        text: String,
        attachment: Option<Arc<Attachment>>,
    ) -> &TranscriptEntry {
        let id = EntryId(self.entries.len() as u64 + 1);
        self.entries.push(TranscriptEntry {
            id,
            text,
            origin,
            created_at: Utc::now(),
            attachment,
        });
        &self.entries[self.entries.len() - 1]
    }
}
