use std::pin::Pin;
use std::sync::Arc;

use little_chat_responder::{Responder, ResponderError, ResponderRequest};
use tracing::Instrument;

pub(crate) type RespondResult = Result<String, Box<dyn ResponderError>>;
type BoxedRespondFuture = Pin<Box<dyn Future<Output = RespondResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ResponderRequest) -> BoxedRespondFuture + Send + Sync>;

/// A wrapper around a responder that provides a type-erased interface for
/// the other modules.
#[derive(Clone)]
pub(crate) struct ResponderClient {
    handler_fn: HandlerFn,
}

impl ResponderClient {
    #[inline]
    pub fn new<R: Responder + 'static>(responder: R) -> Self {
        // We have to erase the type `R`, since `ResponderClient` doesn't
        // have a generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(
            move |req: ResponderRequest| -> BoxedRespondFuture {
                trace!(
                    "got a request: {} bytes of text, attachment: {:?}",
                    req.text.len(),
                    req.attachment.as_ref().map(|a| &a.name)
                );
                let fut = responder.respond(&req);
                Box::pin(
                    async move {
                        match fut.await {
                            Ok(reply) => {
                                trace!("finished a request");
                                Ok(reply)
                            }
                            Err(err) => {
                                error!("got an error: {err:?}");
                                Err(Box::new(err) as Box<dyn ResponderError>)
                            }
                        }
                    }
                    .instrument(trace_span!("responder req")),
                )
            },
        );
        Self { handler_fn }
    }

    /// Sends a request and waits for the reply.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe as long as the underlying responder is.
    #[inline]
    pub async fn respond(&self, req: ResponderRequest) -> RespondResult {
        (self.handler_fn)(req).await
    }
}
