//! Local responders that never leave the process.
//!
//! [`StubResponder`] is the demo collaborator, it acknowledges every message
//! with a templated text after a cosmetic delay. [`ScriptedResponder`] plays
//! back preset replies and is meant for tests.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

use little_chat_responder::{
    ErrorKind, Responder, ResponderError, ResponderRequest,
};
use tokio::time::sleep;

pub use preset::*;

const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

const PLAIN_ACKNOWLEDGEMENT: &str = "Thanks for your message! I've logged it to the console. This is just a demo response - in the future, this could connect to a real AI backend.";

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ResponderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A local responder that acknowledges every message.
///
/// The reply only depends on the request, so the same message is always
/// acknowledged with the same text. The delay is purely cosmetic.
#[derive(Clone, Debug)]
pub struct StubResponder {
    delay: Duration,
}

impl StubResponder {
    #[inline]
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = duration;
    }
}

impl Default for StubResponder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Responder for StubResponder {
    type Error = std::convert::Infallible;

    fn respond(
        &self,
        req: &ResponderRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static
    {
        let reply = acknowledgement(req);
        let delay = self.delay;
        async move {
            sleep(delay).await;
            Ok(reply)
        }
    }
}

/// Builds the templated acknowledgement for a request.
pub fn acknowledgement(req: &ResponderRequest) -> String {
    let Some(attachment) = &req.attachment else {
        return PLAIN_ACKNOWLEDGEMENT.to_owned();
    };

    let quoted = if req.text.is_empty() {
        String::new()
    } else {
        format!(": \"{}\"", req.text)
    };
    format!(
        "I received your message{quoted} along with the file \"{}\" ({:.1} KB). The file content has been logged to the console!",
        attachment.name,
        attachment.size_bytes as f64 / 1024.0,
    )
}
