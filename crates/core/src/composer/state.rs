use std::collections::HashSet;
use std::sync::Arc;

use little_chat_responder::{Attachment, ResponderRequest};
use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

use super::{FALLBACK_REPLY_TEXT, RESPONDER_ERROR_TEXT};
use crate::attachment::PendingFile;
use crate::draft::ComposerDraft;
use crate::error::{EncodeError, SubmitError};
use crate::responder_client::{RespondResult, ResponderClient};
use crate::transcript::{EntryId, Origin, Transcript, TranscriptEntry};

const LOGGED_PAYLOAD_PREFIX: usize = 100;

type SubmitReply = oneshot::Sender<Result<EntryId, SubmitError>>;

pub(super) enum Command {
    SetText(String),
    SetPendingFile(PendingFile),
    ClearAttachment,
    Clear,
    Submit(SubmitReply),
    GetDraft(oneshot::Sender<ComposerDraft>),
    GetTranscript(oneshot::Sender<Vec<TranscriptEntry>>),
    EncodeFinished {
        submission: Submission,
        result: Result<Attachment, EncodeError>,
        reply: SubmitReply,
    },
    ResponderFinished {
        submission_id: u64,
        result: RespondResult,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::SetText(_) => "set_text",
            Command::SetPendingFile(_) => "set_pending_file",
            Command::ClearAttachment => "clear_attachment",
            Command::Clear => "clear",
            Command::Submit(_) => "submit",
            Command::GetDraft(_) => "get_draft",
            Command::GetTranscript(_) => "get_transcript",
            Command::EncodeFinished { .. } => "encode_finished",
            Command::ResponderFinished { .. } => "responder_finished",
        }
    }
}

/// What a submission captured from the draft when it was accepted.
#[derive(Debug)]
pub(super) struct Submission {
    id: u64,
    text: String,
}

pub(super) struct ComposerState {
    pub(super) responder_client: ResponderClient,
    pub(super) draft: ComposerDraft,
    pub(super) transcript: Transcript,
    /// The submission whose attachment is being encoded.
    pub(super) encoding: Option<u64>,
    /// Submissions waiting for the responder.
    pub(super) awaiting_replies: HashSet<u64>,
    pub(super) next_submission_id: u64,

    pub(super) on_entry: Option<Box<dyn Fn(&TranscriptEntry) + Send + Sync>>,
    pub(super) on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ComposerState {
    fn handle(
        &mut self,
        cmd: Command,
        cmd_tx: &mpsc::UnboundedSender<Command>,
    ) {
        match cmd {
            Command::SetText(text) => self.draft.set_text(text),
            Command::SetPendingFile(file) => {
                if let Some(replaced) = self.draft.set_pending_file(file) {
                    trace!("replaced pending file {}", replaced.name());
                }
            }
            Command::ClearAttachment => self.draft.clear_attachment(),
            Command::Clear => self.draft.clear(),
            Command::Submit(reply) => self.submit(reply, cmd_tx),
            Command::GetDraft(tx) => {
                tx.send(self.draft.clone()).ok();
            }
            Command::GetTranscript(tx) => {
                tx.send(self.transcript.entries().to_vec()).ok();
            }
            Command::EncodeFinished {
                submission,
                result,
                reply,
            } => self.encode_finished(submission, result, reply, cmd_tx),
            Command::ResponderFinished {
                submission_id,
                result,
            } => self.responder_finished(submission_id, result),
        }
    }

    fn submit(
        &mut self,
        reply: SubmitReply,
        cmd_tx: &mpsc::UnboundedSender<Command>,
    ) {
        if !self.draft.can_submit() {
            debug!("nothing to submit");
            reply.send(Err(SubmitError::NothingToSubmit)).ok();
            return;
        }
        if let Some(encoding) = self.encoding {
            warn!("submission #{encoding} is still encoding, rejecting submit");
            reply.send(Err(SubmitError::EncodingInFlight)).ok();
            return;
        }

        let submission = Submission {
            id: self.next_submission_id,
            text: self.draft.text().to_owned(),
        };
        self.next_submission_id += 1;

        // The file is captured now, later changes to the draft don't
        // affect this submission.
        let Some(file) = self.draft.pending_file().cloned() else {
            debug!(
                submission = submission.id,
                text = %submission.text,
                "accepted a submission"
            );
            self.append_user_entry(submission, None, reply, cmd_tx);
            return;
        };

        debug!(
            submission = submission.id,
            text = %submission.text,
            file_name = file.name(),
            file_size = file.size_bytes(),
            mime_type = file.mime_type(),
            "accepted a submission with a file"
        );
        self.encoding = Some(submission.id);
        let cmd_tx = cmd_tx.clone();
        tokio::spawn(
            async move {
                let result = file.encode().await;
                cmd_tx
                    .send(Command::EncodeFinished {
                        submission,
                        result,
                        reply,
                    })
                    .ok();
            }
            .instrument(trace_span!("encode")),
        );
    }

    fn encode_finished(
        &mut self,
        submission: Submission,
        result: Result<Attachment, EncodeError>,
        reply: SubmitReply,
        cmd_tx: &mpsc::UnboundedSender<Command>,
    ) {
        self.encoding = None;

        let attachment = match result {
            Ok(attachment) => attachment,
            Err(err) => {
                error!("submission #{} aborted: {err}", submission.id);
                reply.send(Err(SubmitError::Encode(err))).ok();
                self.notify_idle_if_needed();
                return;
            }
        };

        let prefix_end = attachment
            .payload
            .len()
            .min(LOGGED_PAYLOAD_PREFIX);
        debug!(
            submission = submission.id,
            payload_len = attachment.payload.len(),
            "encoded attachment: {}...",
            &attachment.payload[..prefix_end]
        );
        self.append_user_entry(submission, Some(attachment), reply, cmd_tx);
    }

    fn append_user_entry(
        &mut self,
        submission: Submission,
        attachment: Option<Attachment>,
        reply: SubmitReply,
        cmd_tx: &mpsc::UnboundedSender<Command>,
    ) {
        let Submission { id, text } = submission;
        let request = ResponderRequest {
            text: text.clone(),
            attachment: attachment.clone(),
        };

        // The user entry must be visible before the responder is invoked.
        let entry = self
            .transcript
            .append(Origin::User, text, attachment.map(Arc::new))
            .clone();
        self.notify_entry(&entry);
        self.draft.clear();
        reply.send(Ok(entry.id())).ok();

        self.awaiting_replies.insert(id);
        let responder_client = self.responder_client.clone();
        let cmd_tx = cmd_tx.clone();
        tokio::spawn(async move {
            let result = responder_client.respond(request).await;
            cmd_tx
                .send(Command::ResponderFinished {
                    submission_id: id,
                    result,
                })
                .ok();
        });
    }

    fn responder_finished(
        &mut self,
        submission_id: u64,
        result: RespondResult,
    ) {
        self.awaiting_replies.remove(&submission_id);

        let text = match result {
            Ok(reply) if reply.is_empty() => {
                debug!("submission #{submission_id} got an empty reply");
                FALLBACK_REPLY_TEXT.to_owned()
            }
            Ok(reply) => reply,
            Err(err) => {
                error!("submission #{submission_id} got no reply: {err}");
                RESPONDER_ERROR_TEXT.to_owned()
            }
        };

        let entry = self
            .transcript
            .append(Origin::Assistant, text, None)
            .clone();
        self.notify_entry(&entry);
        self.notify_idle_if_needed();
    }

    fn notify_entry(&self, entry: &TranscriptEntry) {
        trace!("appended {} from {:?}", entry.id(), entry.origin());
        if let Some(on_entry) = &self.on_entry {
            on_entry(entry);
        }
    }

    /// Whether an attachment is being encoded or a reply is pending.
    fn is_busy(&self) -> bool {
        self.encoding.is_some() || !self.awaiting_replies.is_empty()
    }

    fn notify_idle_if_needed(&self) {
        if self.is_busy() {
            return;
        }
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }
}

pub(super) async fn run_composer(
    mut state: ComposerState,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    cmd_tx: mpsc::WeakUnboundedSender<Command>,
) {
    debug!("started");
    // Keeps the channel open while work is in flight, so its results are
    // still delivered after the last handle is dropped.
    let mut in_flight_tx = None;
    while let Some(cmd) = cmd_rx.recv().await {
        trace!("received command: {}", cmd.name());

        let Some(cmd_tx) = cmd_tx.upgrade() else {
            warn!(
                "all composer handles have been dropped, discard {}",
                cmd.name()
            );
            break;
        };
        state.handle(cmd, &cmd_tx);
        in_flight_tx = state.is_busy().then_some(cmd_tx);
    }
    drop(in_flight_tx);
    debug!("will terminate");
}
