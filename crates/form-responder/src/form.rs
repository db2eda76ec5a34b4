use little_chat_responder::ResponderRequest;

pub const CHAT_TEXT: &str = "CHAT_TEXT";
pub const PAGE: &str = "page";
pub const FILE_NAME: &str = "FILE_NAME";
pub const FILE_SIZE: &str = "FILE_SIZE";
pub const FILE_BASE64: &str = "FILE_BASE64";

/// Lays out the form fields for a request.
///
/// File fields are only present when the request carries an attachment.
pub fn create_fields(
    req: &ResponderRequest,
    page: &str,
) -> Vec<(&'static str, String)> {
    let mut fields = vec![(CHAT_TEXT, req.text.clone()), (PAGE, page.to_owned())];
    if let Some(attachment) = &req.attachment {
        fields.push((FILE_NAME, attachment.name.clone()));
        fields.push((FILE_SIZE, attachment.size_bytes.to_string()));
        fields.push((FILE_BASE64, attachment.payload.clone()));
    }
    fields
}
