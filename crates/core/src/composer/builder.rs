use little_chat_responder::Responder;

use super::Composer;
use super::state::ComposerState;
use crate::responder_client::ResponderClient;
use crate::transcript::{Origin, Transcript, TranscriptEntry};

/// [`Composer`] builder.
pub struct ComposerBuilder {
    pub(crate) responder_client: ResponderClient,
    pub(crate) greeting: Option<String>,
    pub(crate) on_entry: Option<Box<dyn Fn(&TranscriptEntry) + Send + Sync>>,
    pub(crate) on_idle: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ComposerBuilder {
    /// Creates a new builder with the specified responder.
    #[inline]
    pub fn with_responder<R: Responder + 'static>(responder: R) -> Self {
        Self {
            responder_client: ResponderClient::new(responder),
            greeting: None,
            on_entry: None,
            on_idle: None,
        }
    }

    /// Seeds the transcript with an assistant entry.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    /// Attaches a callback to be invoked after every append to the
    /// transcript, including the greeting.
    #[inline]
    pub fn on_entry(
        mut self,
        on_entry: impl Fn(&TranscriptEntry) + Send + Sync + 'static,
    ) -> Self {
        self.on_entry = Some(Box::new(on_entry));
        self
    }

    /// Attaches a callback to be invoked whenever the last in-flight
    /// submission settles.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the composer.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn build(self) -> Composer {
        let ComposerBuilder {
            responder_client,
            greeting,
            on_entry,
            on_idle,
        } = self;

        let mut transcript = Transcript::default();
        if let Some(greeting) = greeting {
            let entry = transcript.append(Origin::Assistant, greeting, None);
            if let Some(on_entry) = &on_entry {
                on_entry(entry);
            }
        }

        let state = ComposerState {
            responder_client,
            draft: Default::default(),
            transcript,
            encoding: None,
            awaiting_replies: Default::default(),
            next_submission_id: 1,
            on_entry,
            on_idle,
        };
        Composer::spawn(state)
    }
}
