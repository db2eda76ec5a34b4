mod builder;
mod state;
#[cfg(test)]
mod tests;

use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

use crate::attachment::PendingFile;
use crate::draft::ComposerDraft;
use crate::error::{ClosedError, SubmitError};
use crate::transcript::{EntryId, TranscriptEntry};
pub use builder::ComposerBuilder;
use state::{Command, ComposerState};

/// The assistant text used when the responder succeeds with an empty reply.
pub const FALLBACK_REPLY_TEXT: &str = "Server response received";

/// The assistant text used when the responder fails. The error itself is
/// only logged.
pub const RESPONDER_ERROR_TEXT: &str = "Error connecting to server";

/// A handle to a chat composer, which owns a draft and a transcript and
/// runs the submissions.
///
/// All state lives in a single task, and every call on this handle is a
/// command processed in the order it was issued. A submission suspends
/// while its attachment is encoded and while the responder works, but the
/// composer keeps handling other commands meanwhile. Replies of
/// overlapping submissions are appended in the order they settle.
///
/// Clones refer to the same composer. The task ends when all handles are
/// dropped and no submission is in flight.
#[derive(Clone)]
pub struct Composer {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl Composer {
    /// Replaces the draft text.
    pub fn set_text<S: Into<String>>(&self, text: S) {
        self.send(Command::SetText(text.into()));
    }

    /// Sets the pending file, replacing any previous one.
    pub fn set_pending_file(&self, file: PendingFile) {
        self.send(Command::SetPendingFile(file));
    }

    /// Drops the pending file and keeps the text.
    pub fn clear_attachment(&self) {
        self.send(Command::ClearAttachment);
    }

    /// Drops both the text and the pending file.
    pub fn clear(&self) {
        self.send(Command::Clear);
    }

    /// Submits the current draft.
    ///
    /// This resolves as soon as the user entry is in the transcript and
    /// the draft has been reset, returning the id of that entry. The reply
    /// is appended later, once the responder settles.
    ///
    /// Nothing is appended and the draft is kept when an error is
    /// returned.
    pub async fn submit(&self) -> Result<EntryId, SubmitError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Submit(reply_tx))
            .map_err(|_| SubmitError::Closed)?;
        reply_rx.await.map_err(|_| SubmitError::Closed)?
    }

    /// Returns a snapshot of the draft.
    pub async fn draft(&self) -> Result<ComposerDraft, ClosedError> {
        self.query(Command::GetDraft).await
    }

    /// Returns whether the current draft may be submitted.
    pub async fn can_submit(&self) -> Result<bool, ClosedError> {
        Ok(self.draft().await?.can_submit())
    }

    /// Returns a snapshot of the transcript entries.
    pub async fn transcript(&self) -> Result<Vec<TranscriptEntry>, ClosedError> {
        self.query(Command::GetTranscript).await
    }
}

impl Composer {
    fn spawn(state: ComposerState) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(
            state::run_composer(state, cmd_rx, cmd_tx.downgrade())
                .instrument(trace_span!("composer")),
        );
        Self { cmd_tx }
    }

    #[inline]
    fn send(&self, cmd: Command) {
        self.cmd_tx
            .send(cmd)
            .expect("composer task has been dropped too early");
    }

    async fn query<T>(
        &self,
        make_cmd: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ClosedError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(make_cmd(tx)).map_err(|_| ClosedError)?;
        rx.await.map_err(|_| ClosedError)
    }
}
