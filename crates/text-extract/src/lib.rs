//! # text-extract
//!
//! Async text-extraction boundary for the invoice-scrub service.  The
//! redaction engine consumes plain strings; this crate owns everything about
//! producing those strings from uploaded documents:
//!
//! - **[`format`]** -- the recognized document formats (`.pdf`, `.jpg`,
//!   `.jpeg`, `.png`) and the extraction error taxonomy.
//! - **[`extractor`]** -- the [`TextExtractor`](extractor::TextExtractor)
//!   trait plus [`CommandExtractor`](extractor::CommandExtractor), which
//!   shells out to `pdftotext`/`tesseract`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use text_extract::{CommandExtractor, TextExtractor};
//!
//! # async fn example() -> Result<(), text_extract::ExtractError> {
//! let extractor = CommandExtractor::default();
//! let text = extractor.extract_text(Path::new("invoice.pdf")).await?;
//! # Ok(())
//! # }
//! ```

pub mod extractor;
pub mod format;

// Re-export primary public types at the crate root for convenience.
pub use extractor::{CommandExtractor, TextExtractor};
pub use format::{DocumentFormat, ExtractError};
