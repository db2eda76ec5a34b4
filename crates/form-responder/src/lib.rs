//! A responder that posts messages to a remote endpoint as a form.

#[macro_use]
extern crate tracing;

mod config;
mod form;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::{Arc, PoisonError, RwLock};

use little_chat_responder::{
    ErrorKind, Responder, ResponderError, ResponderRequest,
};
use reqwest::{Client, RequestBuilder, Response};

pub use config::{FormResponderConfig, FormResponderConfigBuilder};

/// Error type for [`FormResponder`].
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

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_status() {
            ErrorKind::Status
        } else {
            ErrorKind::Connection
        };
        Self::new(format!("{err}"), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ResponderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Remote responder that posts every message as a form to an endpoint, and
/// takes the response body as the reply.
///
/// The endpoint can be changed at any time, clones share it. A change
/// applies to requests sent afterwards.
#[derive(Clone, Debug)]
pub struct FormResponder {
    client: Client,
    endpoint: Arc<RwLock<String>>,
    page: Arc<str>,
}

impl FormResponder {
    /// Creates a new `FormResponder` with the given configuration.
    #[inline]
    pub fn new(config: FormResponderConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: Arc::new(RwLock::new(config.endpoint)),
            page: config.page.into(),
        }
    }

    /// Returns the current endpoint.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the endpoint. The address is not validated.
    pub fn set_endpoint<S: Into<String>>(&self, endpoint: S) {
        let endpoint = endpoint.into();
        debug!("endpoint changed to {endpoint}");
        *self.endpoint.write().unwrap_or_else(PoisonError::into_inner) =
            endpoint;
    }

    fn build_request(&self, req: &ResponderRequest) -> RequestBuilder {
        let fields = form::create_fields(req, &self.page);
        self.client.post(self.endpoint()).form(&fields)
    }
}

impl Responder for FormResponder {
    type Error = Error;

    fn respond(
        &self,
        req: &ResponderRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'static
    {
        let attachment = req.attachment.as_ref();
        debug!(
            text = %req.text,
            file_name = attachment.map(|a| a.name.as_str()).unwrap_or(""),
            file_size = attachment.map(|a| a.size_bytes).unwrap_or(0),
            has_payload = attachment.is_some(),
            page = %self.page,
            "posting message"
        );
        let resp_fut = self.build_request(req).send();

        async move {
            let resp =
                match resp_fut.await.and_then(Response::error_for_status) {
                    Ok(resp) => resp,
                    Err(err) => {
                        error!("error posting message: {err}");
                        return Err(Error::from_reqwest(err));
                    }
                };

            let body = resp.text().await.map_err(Error::from_reqwest)?;
            trace!("got a response: {body:?}");
            Ok(body)
        }
    }
}
