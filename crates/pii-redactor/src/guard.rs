//! False-positive guard.
//!
//! A small fixed table of benign phrases that would otherwise trip a
//! catalogue rule (e.g. a heading containing an organisation-like token) is
//! shielded before category processing and restored verbatim afterwards.
//!
//! Each occurrence is swapped at its exact byte offset for an index-tagged
//! marker built around a Unicode private-use-area sentinel.  No catalogue
//! rule can match the marker, and the sentinel character does not occur in
//! OCR or typed invoice text, so the guard cannot collide with real input
//! the way a plain-text sentinel phrase could.

use regex::{escape, Regex};

/// Known benign phrases, matched exactly and case-insensitively.
///
/// Curated ahead of time; the guard never learns new phrases at runtime.
pub static GUARDED_PHRASES: &[&str] = &["MANAGEMENT INVOICE Service"];

/// Private-use-area sentinel delimiting guard markers.
const MARKER_SENTINEL: char = '\u{F8FF}';

/// One shielded occurrence: the marker currently sitting in the text and the
/// phrase text exactly as it appeared in the input.
#[derive(Debug, Clone)]
pub struct GuardedSpan {
    marker: String,
    original: String,
}

/// Compiled guard table.
pub struct FalsePositiveGuard {
    phrases: Vec<Regex>,
}

impl FalsePositiveGuard {
    /// Compile every guarded phrase into a case-insensitive whole-phrase
    /// regex.
    pub fn new() -> Result<Self, regex::Error> {
        let phrases = GUARDED_PHRASES
            .iter()
            .map(|p| Regex::new(&format!(r"(?i)\b{}\b", escape(p))))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { phrases })
    }

    /// Replace every guarded phrase occurrence in `text` with a unique
    /// marker, returning the shielded text and the spans needed to undo the
    /// substitution.
    ///
    /// Each occurrence is spliced out at the byte offset where it was found,
    /// so repeated phrases are shielded independently.
    pub fn shield(&self, text: &str) -> (String, Vec<GuardedSpan>) {
        let mut shielded = text.to_string();
        let mut spans = Vec::new();

        for re in &self.phrases {
            loop {
                let found = re.find(&shielded).map(|m| (m.range(), m.as_str().to_string()));
                let Some((range, original)) = found else { break };

                let marker = format!("{MARKER_SENTINEL}{}{MARKER_SENTINEL}", spans.len());
                shielded.replace_range(range, &marker);
                spans.push(GuardedSpan { marker, original });
            }
        }

        (shielded, spans)
    }

    /// Swap every marker back for its original phrase, verbatim.
    pub fn restore(&self, text: &str, spans: &[GuardedSpan]) -> String {
        let mut restored = text.to_string();
        for span in spans {
            restored = restored.replacen(&span.marker, &span.original, 1);
        }
        restored
    }
}
