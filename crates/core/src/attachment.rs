//! Pending files and their encoding into attachments.

use std::fmt::{self, Debug, Formatter};
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bytes::Bytes;
use little_chat_responder::Attachment;
use mime::Mime;
use tokio::fs;
use tokio::task::spawn_blocking;

use crate::error::{EncodeError, EncodeErrorKind};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Where the bytes of a pending file come from.
#[derive(Clone)]
pub enum FileSource {
    /// Bytes already held in memory, e.g. from a drop.
    Memory(Bytes),
    /// A file on disk, read when the attachment is encoded.
    Path(PathBuf),
}

impl Debug for FileSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Memory(bytes) => f
                .debug_tuple("Memory")
                .field(&format_args!("{} bytes", bytes.len()))
                .finish(),
            FileSource::Path(path) => {
                f.debug_tuple("Path").field(path).finish()
            }
        }
    }
}

/// A file selected for the next message, not encoded yet.
///
/// Its name, size and type are fixed once selected. Cloning is cheap, and
/// the clone keeps referring to the same bytes.
#[derive(Clone, Debug)]
pub struct PendingFile {
    name: String,
    size_bytes: u64,
    mime_type: String,
    source: FileSource,
}

impl PendingFile {
    /// Creates a pending file from bytes in memory.
    pub fn from_bytes<S1, S2, B>(name: S1, mime_type: S2, bytes: B) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        B: Into<Bytes>,
    {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            mime_type: mime_type.into(),
            source: FileSource::Memory(bytes),
        }
    }

    /// Creates a pending file from a path on disk.
    ///
    /// Only the metadata is read here. The MIME type is guessed from the
    /// extension.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_owned());
        Ok(Self {
            name,
            size_bytes: metadata.len(),
            mime_type: guess_mime_type(path).to_string(),
            source: FileSource::Path(path.to_owned()),
        })
    }

    /// Creates a pending file from its parts as is.
    #[inline]
    pub fn from_parts<S1: Into<String>, S2: Into<String>>(
        name: S1,
        size_bytes: u64,
        mime_type: S2,
        source: FileSource,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
            source,
        }
    }

    /// Returns the file name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the size in bytes captured at selection.
    #[inline]
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Returns the MIME type.
    #[inline]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns where the bytes come from.
    #[inline]
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Reads the bytes and encodes them into an [`Attachment`].
    ///
    /// The same bytes always produce the same payload. Nothing is cached,
    /// every call reads and encodes again.
    pub async fn encode(&self) -> Result<Attachment, EncodeError> {
        let bytes = match &self.source {
            FileSource::Memory(bytes) => bytes.clone(),
            FileSource::Path(path) => {
                fs::read(path).await.map(Bytes::from).map_err(|err| {
                    EncodeError::new(
                        EncodeErrorKind::Read,
                        &self.name,
                        err.to_string(),
                    )
                })?
            }
        };

        let payload = spawn_blocking(move || BASE64_STANDARD.encode(&bytes))
            .await
            .map_err(|err| {
                EncodeError::new(
                    EncodeErrorKind::Interrupted,
                    &self.name,
                    err.to_string(),
                )
            })?;

        Ok(Attachment {
            name: self.name.clone(),
            size_bytes: self.size_bytes,
            mime_type: self.mime_type.clone(),
            payload,
        })
    }
}

/// Decodes an attachment payload back into the raw bytes.
#[inline]
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64_STANDARD.decode(payload)
}

/// Guesses the MIME type of a file from its extension, falling back to
/// `application/octet-stream`.
#[inline]
pub fn guess_mime_type(path: &Path) -> Mime {
    mime_guess::from_path(path).first_or_octet_stream()
}

/// Formats a byte count for humans, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_owned();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}
