// src/analyze/extract.rs
// Document-text extraction seam. Extraction is an external collaborator:
// the pipeline hands over the uploaded bytes and receives plain text, or an
// error it treats as non-fatal (analysis continues with empty text).

/// Uploaded file as received from the multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("unsupported document format: .{0}")]
    Unsupported(String),
    #[error("document is not valid UTF-8 text")]
    Encoding,
}

pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, file: &UploadedFile) -> Result<String, ExtractError>;
}

/// Extractor for plain-text payloads. Binary formats (PDF, PPTX) belong to
/// an external extraction service and are rejected here.
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract(&self, file: &UploadedFile) -> Result<String, ExtractError> {
        let ext = file
            .filename
            .rsplit_once('.')
            .map(|(_, e)| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "" | "txt" | "md" | "markdown" | "csv" => {
                String::from_utf8(file.bytes.clone()).map_err(|_| ExtractError::Encoding)
            }
            other => Err(ExtractError::Unsupported(other.to_string())),
        }
    }
}
