//! Text extraction collaborators.
//!
//! The redaction engine only ever sees a plain string; everything about
//! turning a PDF or scanned image into that string lives behind the
//! [`TextExtractor`] trait.  Extraction is long-running I/O, so the trait is
//! async; the engine itself stays synchronous.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::format::{DocumentFormat, ExtractError};

/// Boundary contract: given a stored document, produce its plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract plain UTF-8 text from the document at `path`.
    ///
    /// The format is derived from the file extension; unrecognized
    /// extensions fail with [`ExtractError::UnsupportedFormat`].
    async fn extract_text(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Extractor that shells out to the standard command-line tools:
/// `pdftotext` for PDFs and `tesseract` for raster images.
///
/// Both tools write extracted text to stdout when given `-` as the output
/// argument.  The subprocess is spawned through tokio so extraction never
/// blocks the server runtime.
pub struct CommandExtractor {
    pdftotext_bin: PathBuf,
    tesseract_bin: PathBuf,
}

impl CommandExtractor {
    pub fn new(pdftotext_bin: impl Into<PathBuf>, tesseract_bin: impl Into<PathBuf>) -> Self {
        Self {
            pdftotext_bin: pdftotext_bin.into(),
            tesseract_bin: tesseract_bin.into(),
        }
    }

    /// Run `tool` with `args`, returning its stdout as a UTF-8 string.
    async fn run_tool(
        tool: &Path,
        args: &[&std::ffi::OsStr],
    ) -> Result<String, ExtractError> {
        let output = tokio::process::Command::new(tool)
            .args(args)
            .output()
            .await
            .map_err(|e| ExtractError::Tool {
                tool: tool.display().to_string(),
                detail: format!("failed to spawn: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                tool = %tool.display(),
                status = %output.status,
                "extraction tool failed"
            );
            return Err(ExtractError::Tool {
                tool: tool.display().to_string(),
                detail: format!("exited with {}: {}", output.status, stderr.trim()),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| ExtractError::Tool {
            tool: tool.display().to_string(),
            detail: format!("produced non-UTF-8 output: {e}"),
        })
    }
}

impl Default for CommandExtractor {
    /// Uses `pdftotext` and `tesseract` from `PATH`.
    fn default() -> Self {
        Self::new("pdftotext", "tesseract")
    }
}

#[async_trait]
impl TextExtractor for CommandExtractor {
    async fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        let format = DocumentFormat::from_path(path)?;
        // Fail early with an I/O error when the stored file is gone, rather
        // than surfacing it as a tool failure.
        tokio::fs::metadata(path).await?;
        debug!(path = %path.display(), ?format, "extracting document text");

        let text = if format.is_image() {
            // `tesseract <image> stdout`
            Self::run_tool(
                &self.tesseract_bin,
                &[path.as_os_str(), "stdout".as_ref()],
            )
            .await?
        } else {
            // `pdftotext <pdf> -` writes the text to stdout.
            Self::run_tool(&self.pdftotext_bin, &[path.as_os_str(), "-".as_ref()]).await?
        };

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedExtractor(&'static str);

    #[async_trait]
    impl TextExtractor for FixedExtractor {
        async fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
            DocumentFormat::from_path(path)?;
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn trait_objects_are_usable() {
        let extractor: Box<dyn TextExtractor> = Box::new(FixedExtractor("INVOICE # 123"));
        let text = extractor
            .extract_text(Path::new("bill.pdf"))
            .await
            .unwrap();
        assert_eq!(text, "INVOICE # 123");
    }

    #[tokio::test]
    async fn unsupported_extension_fails_before_tool_runs() {
        let extractor = CommandExtractor::default();
        let err = extractor
            .extract_text(Path::new("notes.docx"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn missing_tool_surfaces_a_tool_error() {
        let dir = std::env::temp_dir().join("text-extract-tool-tests");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("bill.pdf");
        tokio::fs::write(&path, b"%PDF-").await.unwrap();

        let extractor = CommandExtractor::new("/nonexistent/pdftotext", "/nonexistent/tesseract");
        let err = extractor.extract_text(&path).await.unwrap_err();
        match err {
            ExtractError::Tool { tool, .. } => assert!(tool.contains("pdftotext")),
            other => panic!("expected Tool error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_file_surfaces_an_io_error() {
        let extractor = CommandExtractor::default();
        let err = extractor
            .extract_text(Path::new("/nonexistent-dir/bill.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }
}
