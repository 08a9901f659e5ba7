//! Recognized document formats and extraction errors.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur while extracting text from a document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The file extension is not in the recognized set.  Caller's fault.
    #[error("unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// The extraction tool ran but did not produce text.
    #[error("{tool} failed: {detail}")]
    Tool { tool: String, detail: String },
}

/// A document format the extraction boundary recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Jpeg,
    Png,
}

impl DocumentFormat {
    /// Determine the format from a file path's extension
    /// (case-insensitive; `.jpg` and `.jpeg` both map to [`Self::Jpeg`]).
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(ExtractError::UnsupportedFormat(ext)),
        }
    }

    /// Whether this format is a raster image (and thus needs OCR rather than
    /// PDF text extraction).
    pub fn is_image(self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn recognizes_allowed_extensions() {
        let cases = [
            ("invoice.pdf", DocumentFormat::Pdf),
            ("scan.jpg", DocumentFormat::Jpeg),
            ("scan.JPEG", DocumentFormat::Jpeg),
            ("page.png", DocumentFormat::Png),
            ("BILL.PDF", DocumentFormat::Pdf),
        ];
        for (name, expected) in cases {
            let format = DocumentFormat::from_path(&PathBuf::from(name)).unwrap();
            assert_eq!(format, expected, "{name}");
        }
    }

    #[test]
    fn rejects_unknown_extensions() {
        for name in ["notes.txt", "archive.zip", "no_extension"] {
            let err = DocumentFormat::from_path(&PathBuf::from(name)).unwrap_err();
            assert!(matches!(err, ExtractError::UnsupportedFormat(_)), "{name}");
        }
    }

    #[test]
    fn images_need_ocr() {
        assert!(DocumentFormat::Jpeg.is_image());
        assert!(DocumentFormat::Png.is_image());
        assert!(!DocumentFormat::Pdf.is_image());
    }
}
