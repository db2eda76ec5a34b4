use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use little_chat_responder::{ErrorKind, Responder, ResponderRequest};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::Error;

/// How a preset reply settles.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    #[serde(rename = "reply")]
    Reply(String),
    #[serde(rename = "failure")]
    Failure(String),
}

/// The preset reply for one call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetReply {
    /// The outcome of this call.
    pub outcome: PresetOutcome,
    /// If set, the call settles only after this delay.
    pub delay: Option<Duration>,
}

impl PresetReply {
    /// Creates a `PresetReply` that succeeds with the specified text.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self {
            outcome: PresetOutcome::Reply(text.into()),
            delay: None,
        }
    }

    /// Creates a `PresetReply` that fails with the specified reason.
    #[inline]
    pub fn with_failure<S: Into<String>>(reason: S) -> Self {
        Self {
            outcome: PresetOutcome::Failure(reason.into()),
            delay: None,
        }
    }

    /// Delays the settlement of this reply.
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A responder that plays back preset replies in call order.
///
/// The n-th call settles with the n-th added reply. Calls beyond the script
/// fail. Every received request is recorded and can be inspected later.
/// Clones share the script position and the recorded requests.
///
/// # Note
///
/// This type is not optimized for production use, you should only use it
/// for testing.
#[derive(Clone, Default)]
pub struct ScriptedResponder {
    script: Vec<PresetReply>,
    next_call: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<ResponderRequest>>>,
}

impl ScriptedResponder {
    #[inline]
    pub fn add_reply(&mut self, preset: PresetReply) {
        self.script.push(preset);
    }

    /// Returns all requests received so far, in call order.
    pub fn requests(&self) -> Vec<ResponderRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Responder for ScriptedResponder {
    type Error = crate::Error;

    fn respond(
        &self,
        req: &ResponderRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static
    {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(req.clone());

        let call_idx = self.next_call.fetch_add(1, Ordering::SeqCst);
        let preset = self.script.get(call_idx).cloned();
        async move {
            let Some(preset) = preset else {
                return Err(Error::new("no enough replies", ErrorKind::Other));
            };
            if let Some(delay) = preset.delay {
                sleep(delay).await;
            }
            match preset.outcome {
                PresetOutcome::Reply(text) => Ok(text),
                PresetOutcome::Failure(reason) => {
                    Err(Error::new(reason, ErrorKind::Connection))
                }
            }
        }
    }
}
