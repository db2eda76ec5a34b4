use std::convert::Infallible;
use std::error::Error;

use crate::error::ErrorKind;
use crate::request::ResponderRequest;

/// The error type for a responder.
pub trait ResponderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

impl ResponderError for Infallible {
    fn kind(&self) -> ErrorKind {
        match *self {}
    }
}

/// A type that produces a reply for a composed message, either locally or
/// by calling out to a remote service.
///
/// Once the responder is created, it should behave like a stateless object.
/// Several requests may be in flight at the same time, and callers make no
/// assumption about the order in which they settle.
pub trait Responder: Send + Sync {
    /// The error type that may be returned by the responder.
    type Error: ResponderError;

    /// Sends a message to the responder and resolves to its reply text.
    ///
    /// An empty reply is a valid success. The returned future must not
    /// borrow from `self` or `req`.
    fn respond(
        &self,
        req: &ResponderRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static;
}
