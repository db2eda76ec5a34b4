use std::io;
use std::path::Path;

use little_chat_core::{
    ClosedError, Composer, ComposerBuilder, EntryId, PendingFile, SubmitError,
    TranscriptEntry,
};
use little_chat_form_responder::{FormResponder, FormResponderConfig};
use little_chat_stub_responder::StubResponder;

const STUB_GREETING: &str = "Hello! I'm your AI assistant. You can chat with me and upload files. Everything is logged to the console for now.";
const FORM_GREETING: &str = "Hello! Send me a message or upload a file.";

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    composer_builder: ComposerBuilder,
    form_responder: Option<FormResponder>,
    greeting: &'static str,
}

impl SessionBuilder {
    /// Creates a session builder that replies locally with the stub.
    pub fn with_stub_responder(responder: StubResponder) -> Self {
        Self {
            composer_builder: ComposerBuilder::with_responder(responder),
            form_responder: None,
            greeting: STUB_GREETING,
        }
    }

    /// Creates a session builder that posts messages to a remote endpoint.
    pub fn with_form_responder(config: FormResponderConfig) -> Self {
        let responder = FormResponder::new(config);
        Self {
            composer_builder: ComposerBuilder::with_responder(
                responder.clone(),
            ),
            form_responder: Some(responder),
            greeting: FORM_GREETING,
        }
    }

    /// Attaches a callback to be invoked after every append to the
    /// transcript.
    #[inline]
    pub fn on_entry(
        mut self,
        on_entry: impl Fn(&TranscriptEntry) + Send + Sync + 'static,
    ) -> Self {
        self.composer_builder = self.composer_builder.on_entry(on_entry);
        self
    }

    /// Attaches a callback to be invoked when no submission is in flight
    /// anymore.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.composer_builder = self.composer_builder.on_idle(on_idle);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        let composer = self
            .composer_builder
            .with_greeting(self.greeting)
            .build();
        Session {
            composer,
            form_responder: self.form_responder,
        }
    }
}

/// A chat session, like a window that displays messages and has an input
/// box with an attach button.
///
/// It's basically a wrapper around [`Composer`], which also keeps the
/// remote endpoint editable when the session posts to one.
pub struct Session {
    composer: Composer,
    form_responder: Option<FormResponder>,
}

impl Session {
    /// Returns the underlying composer.
    #[inline]
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Selects a file on disk for the next message.
    pub async fn attach_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> io::Result<PendingFile> {
        let file = PendingFile::from_path(path).await?;
        debug!(
            "selected {} ({} bytes, {})",
            file.name(),
            file.size_bytes(),
            file.mime_type()
        );
        self.composer.set_pending_file(file.clone());
        Ok(file)
    }

    /// Drops the selected file.
    #[inline]
    pub fn detach_file(&self) {
        self.composer.clear_attachment();
    }

    /// Sends a message along with the selected file, if any.
    pub async fn send_message(
        &self,
        message: &str,
    ) -> Result<EntryId, SubmitError> {
        self.composer.set_text(message);
        self.composer.submit().await
    }

    /// Returns a snapshot of the transcript.
    #[inline]
    pub async fn transcript(
        &self,
    ) -> Result<Vec<TranscriptEntry>, ClosedError> {
        self.composer.transcript().await
    }

    /// Returns the remote endpoint, if the session posts to one.
    pub fn endpoint(&self) -> Option<String> {
        self.form_responder.as_ref().map(FormResponder::endpoint)
    }

    /// Changes the remote endpoint. Returns `false` if the session replies
    /// locally.
    pub fn set_endpoint(&self, endpoint: &str) -> bool {
        let Some(form_responder) = &self.form_responder else {
            return false;
        };
        form_responder.set_endpoint(endpoint);
        true
    }
}
