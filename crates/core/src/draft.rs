use crate::attachment::PendingFile;

/// The in-progress message: text and at most one pending file.
#[derive(Clone, Debug, Default)]
pub struct ComposerDraft {
    text: String,
    pending_file: Option<PendingFile>,
}

impl ComposerDraft {
    /// Returns the draft text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the pending file, if any.
    #[inline]
    pub fn pending_file(&self) -> Option<&PendingFile> {
        self.pending_file.as_ref()
    }

    /// Replaces the draft text.
    #[inline]
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }

    /// Sets the pending file, returning the one it replaced.
    #[inline]
    pub fn set_pending_file(&mut self, file: PendingFile) -> Option<PendingFile> {
        self.pending_file.replace(file)
    }

    /// Drops the pending file and keeps the text.
    #[inline]
    pub fn clear_attachment(&mut self) {
        self.pending_file = None;
    }

    /// Drops both the text and the pending file.
    #[inline]
    pub fn clear(&mut self) {
        self.text.clear();
        self.pending_file = None;
    }

    /// Returns `true` if there is neither text nor a pending file.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.pending_file.is_none()
    }

    /// See [`can_submit`].
    #[inline]
    pub fn can_submit(&self) -> bool {
        can_submit(self)
    }
}

/// Returns whether the draft may be submitted: either its trimmed text is
/// non-empty or it has a pending file.
pub fn can_submit(draft: &ComposerDraft) -> bool {
    !draft.text.trim().is_empty() || draft.pending_file.is_some()
}
