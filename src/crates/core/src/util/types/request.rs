use crate::service::validation::check_file_size;
use crate::util::errors::ClassifierResult;
use log::debug;
use std::path::Path;

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads a file from disk, rejecting it by metadata size before any
    /// content is loaded.
    pub async fn from_path(path: &Path, max_size: u64) -> ClassifierResult<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        check_file_size(metadata.len(), max_size)?;

        let bytes = tokio::fs::read(path).await?;
        // The file may have grown between metadata and read.
        check_file_size(bytes.len() as u64, max_size)?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        debug!("File loaded: name={}, size={}", file_name, bytes.len());
        Ok(Self { file_name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// `name (12.3KB)`
    pub fn label(&self) -> String {
        format!("{} ({:.1}KB)", self.file_name, self.size() as f64 / 1024.0)
    }
}

/// Input of one submission. Text is stored trimmed; blank text is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub text: Option<String>,
    pub file: Option<FileUpload>,
}

impl ClassificationRequest {
    pub fn new(text: Option<&str>, file: Option<FileUpload>) -> Self {
        let text = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Self { text, file }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.file.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_absent() {
        let request = ClassificationRequest::new(Some("   \n\t"), None);
        assert!(request.text.is_none());
        assert!(request.is_empty());
    }

    #[test]
    fn text_is_trimmed() {
        let request = ClassificationRequest::new(Some("  pagar fatura  "), None);
        assert_eq!(request.text.as_deref(), Some("pagar fatura"));
    }

    #[test]
    fn label_shows_size_in_kilobytes() {
        let upload = FileUpload::new("email.txt", vec![0u8; 1536]);
        assert_eq!(upload.label(), "email.txt (1.5KB)");
    }
}
