//! The redaction engine: applies the pattern catalogue category by category,
//! resolves overlaps by mutating a shared text buffer, and scores each
//! redacted span.

use std::collections::BTreeMap;
use std::ops::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::guard::FalsePositiveGuard;
use crate::patterns::{PiiCategory, CATALOG, PROCESSING_ORDER};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while constructing or using a [`RedactionEngine`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The input text was empty (or whitespace only).  Caller's fault.
    #[error("text must be a non-empty string")]
    InvalidInput,

    #[error("failed to compile redaction pattern: {0}")]
    RegexCompile(#[from] regex::Error),
}

// ---------------------------------------------------------------------------
// Records & result
// ---------------------------------------------------------------------------

/// One detected-and-replaced occurrence.
///
/// Records are appended in detection order and never merged or deduplicated.
/// Wire field names match the redaction API (`type`, `original`, `redacted`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionRecord {
    /// Category of the matched span.
    #[serde(rename = "type")]
    pub category: PiiCategory,
    /// The literal text that was redacted.
    pub original: String,
    /// The placeholder token substituted for the span.
    pub redacted: String,
    /// Confidence in `[0, 1]` that the span really is PII of this category.
    pub confidence: f64,
}

/// The complete outcome of one [`RedactionEngine::redact`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionResult {
    pub original_text: String,
    pub redacted_text: String,
    /// All redaction records, in detection order.
    #[serde(rename = "redactedFields")]
    pub records: Vec<RedactionRecord>,
    /// Arithmetic mean of all record confidences rounded to two decimals;
    /// `0` when no spans were redacted.
    #[serde(rename = "confidence")]
    pub aggregate_confidence: f64,
    pub total_matches: usize,
}

impl RedactionResult {
    /// Convenience helper: returns `true` when at least one span was
    /// redacted.
    pub fn has_redactions(&self) -> bool {
        !self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Confidence model
// ---------------------------------------------------------------------------

/// Bonus applied when a match carries a category-confirming cue or falls in
/// the category's typical length range.
const CUE_BONUS: f64 = 0.10;

/// Street-type words confirming an address match.
const STREET_CUES: &[&str] = &["street", "avenue", "road"];

/// Typical full-span length of a labelled account-number match.
const ACCOUNT_TYPICAL_LEN: Range<usize> = 8..17;

/// Score a single matched span.  Base weight per category, plus at most one
/// fixed bonus, clamped to `1.0`.
fn score(category: PiiCategory, matched: &str) -> f64 {
    let mut confidence = category.base_confidence();

    match category {
        PiiCategory::AccountNumber if ACCOUNT_TYPICAL_LEN.contains(&matched.len()) => {
            confidence += CUE_BONUS;
        }
        PiiCategory::PropertyAddress => {
            let lower = matched.to_ascii_lowercase();
            if STREET_CUES.iter().any(|cue| lower.contains(cue)) {
                confidence += CUE_BONUS;
            }
        }
        _ => {}
    }

    confidence.min(1.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// RedactionEngine
// ---------------------------------------------------------------------------

/// One catalogue rule compiled for repeated evaluation.
struct CompiledRule {
    category: PiiCategory,
    regex: Regex,
}

/// Main entry point for PII detection and redaction.
///
/// The engine is purely synchronous and holds no mutable state across calls;
/// a single instance behind an [`Arc`](std::sync::Arc) serves concurrent
/// callers without coordination.
///
/// # Example
///
/// ```rust
/// use pii_redactor::RedactionEngine;
///
/// let engine = RedactionEngine::new().unwrap();
/// let result = engine.redact("Email: john.doe@example.com").unwrap();
/// assert!(result.redacted_text.contains("[EMAIL_ADDRESS]"));
/// ```
pub struct RedactionEngine {
    /// Catalogue rules flattened into processing order: categories in
    /// [`PROCESSING_ORDER`], rules within a category in catalogue order.
    rules: Vec<CompiledRule>,
    guard: FalsePositiveGuard,
}

impl RedactionEngine {
    /// Compile the full catalogue and guard table.
    pub fn new() -> Result<Self, EngineError> {
        let mut rules = Vec::with_capacity(CATALOG.len());
        for category in PROCESSING_ORDER {
            for rule in CATALOG.iter().filter(|r| r.category == category) {
                rules.push(CompiledRule {
                    category,
                    regex: Regex::new(rule.pattern)?,
                });
            }
        }
        let guard = FalsePositiveGuard::new()?;
        Ok(Self { rules, guard })
    }

    /// Redact all recognized PII in `text`.
    ///
    /// Fails with [`EngineError::InvalidInput`] when `text` trims to empty;
    /// otherwise always returns a complete [`RedactionResult`], even when
    /// zero spans match.
    pub fn redact(&self, text: &str) -> Result<RedactionResult, EngineError> {
        if text.trim().is_empty() {
            return Err(EngineError::InvalidInput);
        }

        // Shield known benign phrases before any category runs.
        let (mut buf, guarded) = self.guard.shield(text);
        let mut records: Vec<RedactionRecord> = Vec::new();

        for rule in &self.rules {
            // Collect every non-overlapping match of this rule against the
            // current (progressively mutated) buffer, then splice the
            // placeholder in at the exact byte offsets.  Because the buffer
            // mutates between rules, a later rule never re-matches a span
            // that is already a placeholder.
            let matches: Vec<(Range<usize>, String)> = rule
                .regex
                .find_iter(&buf)
                .map(|m| (m.range(), m.as_str().to_string()))
                .collect();

            if matches.is_empty() {
                continue;
            }

            debug!(
                category = %rule.category,
                count = matches.len(),
                "redacting matched spans"
            );

            let token = rule.category.placeholder();
            buf = splice(&buf, &matches, token);

            for (range, original) in matches {
                trace!(category = %rule.category, offset = range.start, "span redacted");
                records.push(RedactionRecord {
                    category: rule.category,
                    confidence: score(rule.category, &original),
                    original,
                    redacted: token.to_string(),
                });
            }
        }

        // Put the shielded phrases back, verbatim.
        let redacted_text = self.guard.restore(&buf, &guarded);

        let total_matches = records.len();
        let aggregate_confidence = if records.is_empty() {
            0.0
        } else {
            round2(records.iter().map(|r| r.confidence).sum::<f64>() / records.len() as f64)
        };

        Ok(RedactionResult {
            original_text: text.to_string(),
            redacted_text,
            records,
            aggregate_confidence,
            total_matches,
        })
    }

    /// Count raw matches per category without redacting anything.
    ///
    /// Runs every catalogue rule read-only against the unmodified input;
    /// used for introspection and testing, never by [`redact`](Self::redact).
    pub fn statistics(&self, text: &str) -> BTreeMap<PiiCategory, usize> {
        let mut stats: BTreeMap<PiiCategory, usize> = BTreeMap::new();
        for category in PROCESSING_ORDER {
            stats.insert(category, 0);
        }
        for rule in &self.rules {
            let count = rule.regex.find_iter(text).count();
            *stats.entry(rule.category).or_insert(0) += count;
        }
        stats
    }

    /// Number of compiled catalogue rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// Rebuild `text` left-to-right, substituting `token` for each matched
/// range.  Ranges come from a single `find_iter` pass, so they are sorted
/// and non-overlapping.
fn splice(text: &str, matches: &[(Range<usize>, String)], token: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor: usize = 0;

    for (range, _) in matches {
        out.push_str(&text[cursor..range.start]);
        out.push_str(token);
        cursor = range.end;
    }

    out.push_str(&text[cursor..]);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
