//! Core logic of the chat composer: the draft and its submit guard,
//! attachment encoding, the submission pipeline, and the transcript.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod attachment;
mod composer;
mod draft;
mod error;
mod responder_client;
pub mod transcript;

pub use attachment::{FileSource, PendingFile};
pub use composer::{
    Composer, ComposerBuilder, FALLBACK_REPLY_TEXT, RESPONDER_ERROR_TEXT,
};
pub use draft::{ComposerDraft, can_submit};
pub use error::{ClosedError, EncodeError, EncodeErrorKind, SubmitError};
pub use transcript::{EntryId, Origin, Transcript, TranscriptEntry};
