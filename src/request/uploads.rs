/// A file received as part of a multipart request.
///
/// The host adapter materializes uploads before the pipeline runs; upload
/// bindings in the dispatcher hand the first one to the action handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Form field the file arrived under.
    pub field: String,
    /// Client-supplied file name.
    pub file_name: String,
    /// Declared media type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
