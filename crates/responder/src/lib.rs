//! An abstraction layer for the collaborators that reply to chat messages.
//!
//! This crate establishes a unified protocol for the composer to hand a
//! composed message over to whatever produces the reply, so that the
//! composer can seamlessly switch between a local stub and a remote
//! endpoint without modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod request;
mod responder;

pub use error::*;
pub use request::*;
pub use responder::*;
