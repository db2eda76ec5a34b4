use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// A type of error which can be returned whenever the composer task has
/// gone away.
pub struct ClosedError;

impl fmt::Debug for ClosedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosedError").finish()
    }
}

impl Display for ClosedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        "the composer has closed".fmt(f)
    }
}

impl Error for ClosedError {}

/// The kind of encode error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncodeErrorKind {
    /// The file bytes could not be read.
    Read,
    /// The encoding task stopped before producing a payload.
    Interrupted,
}

impl Display for EncodeErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EncodeErrorKind::Read => write!(f, "Read error"),
            EncodeErrorKind::Interrupted => write!(f, "Interrupted"),
        }
    }
}

/// Describes why an attachment could not be encoded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncodeError {
    kind: EncodeErrorKind,
    file_name: String,
    reason: String,
}

impl EncodeError {
    #[inline]
    pub(crate) fn new<S1: Into<String>, S2: Into<String>>(
        kind: EncodeErrorKind,
        file_name: S1,
        reason: S2,
    ) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> EncodeErrorKind {
        self.kind
    }

    /// Returns the name of the file that failed to encode.
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} while encoding \"{}\": {}",
            self.kind, self.file_name, self.reason
        )
    }
}

impl Error for EncodeError {}

/// Why a submit did not append anything to the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubmitError {
    /// The draft has neither text nor a pending file.
    NothingToSubmit,
    /// Another submission is still encoding its attachment.
    EncodingInFlight,
    /// The pending file could not be encoded. The draft is left untouched.
    Encode(EncodeError),
    /// The composer task has gone away.
    Closed,
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::NothingToSubmit => write!(f, "nothing to submit"),
            SubmitError::EncodingInFlight => {
                write!(f, "another attachment is still being encoded")
            }
            SubmitError::Encode(err) => Display::fmt(err, f),
            SubmitError::Closed => Display::fmt(&ClosedError, f),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SubmitError::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ClosedError> for SubmitError {
    #[inline]
    fn from(_: ClosedError) -> Self {
        SubmitError::Closed
    }
}
