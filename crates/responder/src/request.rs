use serde::{Deserialize, Serialize};

/// A composed message to be handed to the responder.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponderRequest {
    /// The message text, exactly as the user typed it.
    ///
    /// It may be empty when an attachment is present.
    pub text: String,
    /// The encoded attachment, if the message carries one.
    pub attachment: Option<Attachment>,
}

/// A file attached to a message, with its bytes encoded as text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attachment {
    /// The file name.
    pub name: String,
    /// The size of the raw file in bytes.
    pub size_bytes: u64,
    /// The MIME type of the file.
    pub mime_type: String,
    /// Base64 text of the raw file bytes, without any `data:` prefix.
    pub payload: String,
}

impl Attachment {
    /// Renders the payload as a `data:` URL.
    #[inline]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }
}
