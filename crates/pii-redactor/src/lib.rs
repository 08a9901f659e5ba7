//! # pii-redactor
//!
//! Detects and redacts personally-identifiable and business-sensitive
//! information in free-form text extracted from scanned bills and invoices.
//!
//! The crate is organised around three layers:
//!
//! 1. **[`patterns`]** -- static catalogue of regex rules grouped by
//!    [`PiiCategory`](patterns::PiiCategory), with per-category placeholder
//!    tokens, base confidence weights, and the fixed category processing
//!    order.
//! 2. **[`guard`]** -- false-positive guard that shields a curated table of
//!    benign phrases behind inert markers before any category runs and
//!    restores them verbatim afterwards.
//! 3. **[`engine`]** -- the [`RedactionEngine`](engine::RedactionEngine):
//!    compiles the catalogue once, applies it category by category against a
//!    progressively mutated buffer, and scores every redacted span.
//!
//! ## Quick start
//!
//! ```rust
//! use pii_redactor::RedactionEngine;
//!
//! let engine = RedactionEngine::new().unwrap();
//! let result = engine.redact("Contact us at (555) 123-4567").unwrap();
//! assert!(result.redacted_text.contains("[PHONE_NUMBER]"));
//! assert_eq!(result.total_matches, 1);
//! ```

pub mod engine;
pub mod guard;
pub mod patterns;

// Re-export the most commonly used types at the crate root for ergonomic
// imports (`use pii_redactor::RedactionEngine`).
pub use engine::{EngineError, RedactionEngine, RedactionRecord, RedactionResult};
pub use guard::{FalsePositiveGuard, GuardedSpan, GUARDED_PHRASES};
pub use patterns::{PatternRule, PiiCategory, CATALOG, GENERIC_PLACEHOLDER, PROCESSING_ORDER};
