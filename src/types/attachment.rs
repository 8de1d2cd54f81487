//! Message attachments.

use mime::Mime;
use std::path::{Path, PathBuf};

use crate::error::{require, MailgunError, MailgunResult, ValidationError};

/// Where an attachment's content lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    /// Content already in memory.
    Bytes(Vec<u8>),
    /// Content read from disk when the request is sent.
    ///
    /// `len` is the declared size charged against the message size budget.
    File {
        /// Path to read.
        path: PathBuf,
        /// Declared size in bytes.
        len: u64,
    },
}

/// A named attachment or inline image.
///
/// Both representations are equivalent once serialized: file references are
/// resolved to bytes by the transport layer only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    filename: String,
    source: AttachmentSource,
}

impl FileAttachment {
    /// Create an attachment from in-memory content.
    pub fn from_bytes(filename: &str, content: Vec<u8>) -> Result<Self, ValidationError> {
        require("filename", filename)?;
        Ok(Self {
            filename: filename.to_string(),
            source: AttachmentSource::Bytes(content),
        })
    }

    /// Create a file reference with a declared length; nothing is read.
    pub fn from_file(
        filename: &str,
        path: impl Into<PathBuf>,
        len: u64,
    ) -> Result<Self, ValidationError> {
        require("filename", filename)?;
        Ok(Self {
            filename: filename.to_string(),
            source: AttachmentSource::File {
                path: path.into(),
                len,
            },
        })
    }

    /// Create a file reference, taking name and length from the file itself.
    ///
    /// Only the file metadata is read here.
    pub fn from_path(path: impl AsRef<Path>) -> MailgunResult<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|source| MailgunError::Attachment {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ValidationError::missing_field("filename"))?;
        Ok(Self::from_file(filename, path, metadata.len())?)
    }

    /// The attachment's file name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The content source.
    pub fn source(&self) -> &AttachmentSource {
        &self.source
    }

    /// Size in bytes charged against the message budget.
    pub fn len(&self) -> u64 {
        match &self.source {
            AttachmentSource::Bytes(bytes) => bytes.len() as u64,
            AttachmentSource::File { len, .. } => *len,
        }
    }

    /// Returns true if the attachment has no content.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Content type guessed from the file name.
    pub fn content_type(&self) -> Mime {
        mime_guess::from_path(&self.filename).first_or_octet_stream()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_bytes() {
        let attachment = FileAttachment::from_bytes("report.pdf", vec![0x25, 0x50, 0x44, 0x46]).unwrap();
        assert_eq!(attachment.filename(), "report.pdf");
        assert_eq!(attachment.len(), 4);
        assert_eq!(attachment.content_type(), mime::APPLICATION_PDF);
    }

    #[test]
    fn test_blank_filename_rejected() {
        assert_eq!(
            FileAttachment::from_bytes(" ", vec![1]).unwrap_err(),
            ValidationError::missing_field("filename")
        );
        assert!(FileAttachment::from_file("", "/tmp/x", 1).is_err());
    }

    #[test]
    fn test_from_file_uses_declared_len() {
        let attachment = FileAttachment::from_file("big.bin", "/does/not/exist", 1_000).unwrap();
        assert_eq!(attachment.len(), 1_000);
        assert_eq!(attachment.content_type(), mime::APPLICATION_OCTET_STREAM);
    }

    #[test]
    fn test_from_path_reads_metadata() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"hello world").unwrap();

        let attachment = FileAttachment::from_path(file.path()).unwrap();
        assert_eq!(attachment.len(), 11);
        assert!(attachment.filename().ends_with(".txt"));
        assert!(matches!(attachment.source(), AttachmentSource::File { .. }));
        assert_eq!(attachment.content_type(), mime::TEXT_PLAIN);
    }

    #[test]
    fn test_from_path_missing_file() {
        let error = FileAttachment::from_path("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(error, MailgunError::Attachment { .. }));
    }
}
