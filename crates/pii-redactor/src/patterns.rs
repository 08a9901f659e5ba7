//! PII pattern catalogue.
//!
//! Contains the static catalogue of regex rules used to detect PII in bill
//! and invoice text.  Each entry belongs to exactly one [`PiiCategory`]; the
//! rules for a category are listed most-specific first and are compiled at
//! engine-construction time.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A class of personally-identifiable or business-sensitive information.
///
/// Serialized names match the wire format of the redaction API
/// (`"phoneNumber"`, `"propertyAddress"`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum PiiCategory {
    PropertyAddress,
    PhoneNumber,
    AccountNumber,
    PropertyName,
    Email,
    Ssn,
    CreditCard,
    InvoiceNumber,
    ZipCode,
}

impl PiiCategory {
    /// The fixed replacement token for this category.
    ///
    /// Deterministic and a pure function of the category alone; the matched
    /// content never influences the token.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::PropertyAddress => "[PROPERTY_ADDRESS]",
            Self::PhoneNumber => "[PHONE_NUMBER]",
            Self::AccountNumber => "[ACCOUNT_NUMBER]",
            Self::PropertyName => "[PROPERTY_NAME]",
            Self::Email => "[EMAIL_ADDRESS]",
            Self::Ssn => "[SSN]",
            Self::CreditCard => "[CREDIT_CARD]",
            Self::InvoiceNumber => "[INVOICE_NUMBER]",
            Self::ZipCode => "[ZIP_CODE]",
        }
    }

    /// Base confidence weight in `[0, 1]` assigned to any match of this
    /// category before cue/length bonuses are applied.
    pub fn base_confidence(self) -> f64 {
        match self {
            Self::PropertyAddress => 0.80,
            Self::PhoneNumber => 0.95,
            Self::AccountNumber => 0.90,
            Self::PropertyName => 0.70,
            Self::Email => 0.98,
            Self::Ssn => 0.99,
            Self::CreditCard => 0.95,
            Self::InvoiceNumber => 0.90,
            Self::ZipCode => 0.85,
        }
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PropertyAddress => write!(f, "propertyAddress"),
            Self::PhoneNumber => write!(f, "phoneNumber"),
            Self::AccountNumber => write!(f, "accountNumber"),
            Self::PropertyName => write!(f, "propertyName"),
            Self::Email => write!(f, "email"),
            Self::Ssn => write!(f, "ssn"),
            Self::CreditCard => write!(f, "creditCard"),
            Self::InvoiceNumber => write!(f, "invoiceNumber"),
            Self::ZipCode => write!(f, "zipCode"),
        }
    }
}

/// Replacement token used when no category applies.
pub const GENERIC_PLACEHOLDER: &str = "[REDACTED]";

/// The fixed order in which categories are processed during redaction.
///
/// Narrow numeric/structural shapes go first so that the broad alphabetic
/// categories at the end (addresses, property names) operate on a text where
/// unambiguous entities have already been replaced by opaque placeholders and
/// cannot be re-matched or corrupted.
pub const PROCESSING_ORDER: [PiiCategory; 9] = [
    PiiCategory::PhoneNumber,
    PiiCategory::Email,
    PiiCategory::Ssn,
    PiiCategory::CreditCard,
    PiiCategory::InvoiceNumber,
    PiiCategory::ZipCode,
    PiiCategory::AccountNumber,
    PiiCategory::PropertyAddress,
    PiiCategory::PropertyName,
];

// ---------------------------------------------------------------------------
// Rule definition
// ---------------------------------------------------------------------------

/// A single detection rule: one regex belonging to one category.
///
/// New formats for a category are supported by appending a rule here, not by
/// editing engine control flow.
pub struct PatternRule {
    /// The category this rule detects.
    pub category: PiiCategory,
    /// A regex string (compiled by the engine at construction).
    pub pattern: &'static str,
}

// ---------------------------------------------------------------------------
// Rule catalogue
// ---------------------------------------------------------------------------

/// The built-in rule library, grouped by category, most-specific rule first
/// within each group.
pub static CATALOG: &[PatternRule] = &[
    // ---- Phone numbers -------------------------------------------------
    PatternRule {
        category: PiiCategory::PhoneNumber,
        pattern: r"\(\d{3}\)\s*\d{3}[-.]?\d{4}",
    },
    PatternRule {
        category: PiiCategory::PhoneNumber,
        pattern: r"\+\d{1,3}\s*\d{3}[-.]?\d{3}[-.]?\d{4}\b",
    },
    PatternRule {
        category: PiiCategory::PhoneNumber,
        pattern: r"(?i)\b(?:phone|tel|telephone|call|contact)\s*[:#]?\s*\d{3}[-.]?\d{3}[-.]?\d{4}\b",
    },
    PatternRule {
        category: PiiCategory::PhoneNumber,
        pattern: r"\b\d{3}[-.]\d{3}[-.]?\d{4}\b",
    },
    PatternRule {
        category: PiiCategory::PhoneNumber,
        pattern: r"\b\d{4}\s*\d{3}[-.]?\d{4}\b",
    },
    // ---- Email addresses -----------------------------------------------
    PatternRule {
        category: PiiCategory::Email,
        pattern: r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
    },
    // ---- Social security numbers ---------------------------------------
    PatternRule {
        category: PiiCategory::Ssn,
        pattern: r"\b\d{3}-\d{2}-\d{4}\b",
    },
    PatternRule {
        category: PiiCategory::Ssn,
        pattern: r"\b\d{9}\b",
    },
    // ---- Credit cards --------------------------------------------------
    PatternRule {
        category: PiiCategory::CreditCard,
        pattern: r"(?i)\b(?:visa|mastercard|american express|discover|card)\s*#?\s*\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}\b",
    },
    PatternRule {
        category: PiiCategory::CreditCard,
        pattern: r"\b\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}\b",
    },
    PatternRule {
        category: PiiCategory::CreditCard,
        pattern: r"\b\d{4}[- ]?\d{6}[- ]?\d{5}\b",
    },
    // ---- Invoice numbers -----------------------------------------------
    PatternRule {
        category: PiiCategory::InvoiceNumber,
        pattern: r"(?i)\b(?:invoice|bill|receipt)\s*#?\s*\d{3,6}\b",
    },
    PatternRule {
        category: PiiCategory::InvoiceNumber,
        pattern: r"#\s*\d{3,6}\b",
    },
    // ---- ZIP codes (state + ZIP) ---------------------------------------
    PatternRule {
        category: PiiCategory::ZipCode,
        pattern: r"(?i)\b[A-Z]{2}\s+\d{5}\b",
    },
    // ---- Account numbers -----------------------------------------------
    PatternRule {
        category: PiiCategory::AccountNumber,
        pattern: r"(?i)\b(?:account|acct|acc|a/c)(?:\s+(?:number|no))?\s*[:#]?\s*\d{3,4}[- ]\d{4,6}[- ]\d{4,6}\b",
    },
    PatternRule {
        category: PiiCategory::AccountNumber,
        pattern: r"(?i)\b(?:account|acct|acc|a/c)(?:\s+(?:number|no))?\s*[:#]?\s*[A-Z]{2,4}\d{6,12}\b",
    },
    PatternRule {
        category: PiiCategory::AccountNumber,
        pattern: r"(?i)\b(?:account|acct|acc|a/c)(?:\s+(?:number|no))?\s*[:#]?\s*\d{4,20}\b",
    },
    // ---- Property addresses --------------------------------------------
    // The two "full" variants (street/company + city + state + ZIP) only see
    // unredacted text via `statistics`; during redaction the ZIP category has
    // already consumed the state/ZIP tail and the simpler variants below
    // catch the remaining street part.
    PatternRule {
        category: PiiCategory::PropertyAddress,
        pattern: r"(?i)\b\d+\s+[A-Za-z\s&]+(?:partners|partnership|llc|ltd|inc|corp|corporation|company|co)[,\s]+[A-Za-z\s]+\s+[A-Za-z]{2}\s+\d{5}\b",
    },
    PatternRule {
        category: PiiCategory::PropertyAddress,
        pattern: r"(?i)\b\d+\s+[A-Za-z\s]+(?:street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|court|ct|place|pl|way|terrace|ter)[,\s]+[A-Za-z\s]+\s+[A-Za-z]{2}\s+\d{5}\b",
    },
    PatternRule {
        category: PiiCategory::PropertyAddress,
        pattern: r"(?i)\b\d+\s+[A-Za-z\s]+(?:street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|court|ct|place|pl|way|terrace|ter)\b",
    },
    PatternRule {
        category: PiiCategory::PropertyAddress,
        pattern: r"(?i)\b\d+\s+[A-Za-z\s]+(?:apartment|apt|unit|suite|ste|floor|fl|building|bldg)\s*\d*\b",
    },
    PatternRule {
        category: PiiCategory::PropertyAddress,
        pattern: r"(?i)\b[A-Za-z\s]+(?:street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|court|ct|place|pl|way|terrace|ter)\s+\d+\b",
    },
    // ---- Property / company names --------------------------------------
    PatternRule {
        category: PiiCategory::PropertyName,
        pattern: r"(?i)\b(?:bill\s+to|invoice\s+to)\s+[A-Za-z\s&]+(?:properties|property|inc|llc|ltd|corp|corporation|company|co|services|service)\b",
    },
    PatternRule {
        category: PiiCategory::PropertyName,
        pattern: r"(?i)\b[A-Za-z][A-Za-z\s]*(?:management|mgmt)\s+(?:and|&)\s+[A-Za-z][A-Za-z\s]*\b",
    },
    PatternRule {
        category: PiiCategory::PropertyName,
        pattern: r"(?i)\b(?:property|building|complex|tower|plaza|center|gardens|manor|residence|residential|apartment|apt)\s+[A-Za-z][A-Za-z\s]{1,29}\b",
    },
    PatternRule {
        category: PiiCategory::PropertyName,
        pattern: r"(?i)\b[A-Za-z][A-Za-z\s]{1,29}\s+(?:property|building|complex|tower|plaza|center|gardens|manor|residence|residential|apartment|apt)\b",
    },
    PatternRule {
        category: PiiCategory::PropertyName,
        pattern: r"(?i)\b[A-Za-z][A-Za-z\s&]*(?:properties|property|inc|llc|ltd|corp|corporation|company|co|services|service)\b",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_rules_compile() {
        for rule in CATALOG {
            regex::Regex::new(rule.pattern).unwrap_or_else(|e| {
                panic!(
                    "rule for category '{}' failed to compile: {e}",
                    rule.category
                )
            });
        }
    }

    #[test]
    fn every_category_has_rules() {
        for category in PROCESSING_ORDER {
            assert!(
                CATALOG.iter().any(|r| r.category == category),
                "no rules for category '{category}'"
            );
        }
    }

    #[test]
    fn processing_order_covers_each_category_once() {
        let mut seen = std::collections::HashSet::new();
        for category in PROCESSING_ORDER {
            assert!(seen.insert(category), "duplicate category '{category}'");
        }
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn placeholders_do_not_match_any_rule() {
        // Redaction must be idempotent: no placeholder may trip a rule on a
        // second pass, the generic fallback token included.
        let mut tokens: Vec<&str> = PROCESSING_ORDER.iter().map(|c| c.placeholder()).collect();
        tokens.push(GENERIC_PLACEHOLDER);

        for token in tokens {
            for rule in CATALOG {
                let re = regex::Regex::new(rule.pattern).unwrap();
                assert!(
                    !re.is_match(token),
                    "placeholder '{token}' matches a '{}' rule",
                    rule.category
                );
            }
        }
    }

    #[test]
    fn category_serializes_to_wire_name() {
        let json = serde_json::to_string(&PiiCategory::PhoneNumber).unwrap();
        assert_eq!(json, "\"phoneNumber\"");
        let back: PiiCategory = serde_json::from_str("\"propertyAddress\"").unwrap();
        assert_eq!(back, PiiCategory::PropertyAddress);
    }

    #[test]
    fn base_confidence_in_unit_interval() {
        for category in PROCESSING_ORDER {
            let c = category.base_confidence();
            assert!((0.0..=1.0).contains(&c), "{category}: {c}");
        }
    }
}
