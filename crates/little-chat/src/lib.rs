//! An out-of-the-box chat composer that assembles the core pipeline with
//! one of the responders.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to bring a chat composer into your own host apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod session;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`little_chat_core`] crate.
pub mod core {
    pub use little_chat_core::*;
}

/// Re-exports of the responder crates.
pub mod responders {
    pub use little_chat_form_responder::{
        FormResponder, FormResponderConfig, FormResponderConfigBuilder,
    };
    pub use little_chat_responder::*;
    pub use little_chat_stub_responder::StubResponder;
}
