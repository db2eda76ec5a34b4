use std::fmt::{self, Display, Formatter};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The responder could not be reached.
    Connection,
    /// The responder was reached but signaled a failure.
    Status,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Connection => write!(f, "Connection error"),
            ErrorKind::Status => write!(f, "Unsuccessful status"),
            ErrorKind::Other => write!(f, "Other error"),
        }
    }
}
