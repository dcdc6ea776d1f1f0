use bytes::Bytes;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file held by an uploader, and the candidate passed to version conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    original_filename: String,
    content_type: Option<String>,
    data: Bytes,
}

impl UploadedFile {
    pub fn new(original_filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            original_filename: original_filename.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub(crate) fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Lowercased extension, if the filename has one
    pub fn extension(&self) -> Option<String> {
        self.original_filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}
