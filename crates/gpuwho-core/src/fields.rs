//! Tolerant coercion of vendor-reported field text into numbers.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("digit-run pattern is valid"))
}

// ── FieldValue ────────────────────────────────────────────────────────────────

/// A numeric field as reported by the vendor tool.
///
/// nvidia-smi embeds numbers in descriptive text (`"512 MiB"`, `"37 %"`) and
/// sometimes reports no number at all (`"N/A"`, `"Insufficient Permissions"`).
/// The first case coerces to [`FieldValue::Amount`]; the second is kept
/// verbatim as [`FieldValue::Raw`], a recognised degraded state rather than
/// an error. Summation skips degraded values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// First contiguous digit run found in the field text.
    Amount(u64),
    /// Original text, preserved because no digit run was found.
    Raw(String),
}

impl FieldValue {
    /// Coerce field text: extract the first contiguous digit run as an
    /// integer, or fall back to the original text unchanged.
    pub fn parse(text: &str) -> FieldValue {
        match digit_run().find(text) {
            Some(m) => match m.as_str().parse::<u64>() {
                Ok(n) => FieldValue::Amount(n),
                // Digit run longer than u64::MAX; keep the raw text.
                Err(_) => FieldValue::Raw(text.to_string()),
            },
            None => {
                tracing::debug!("FieldValue: no digit run in \"{}\", keeping raw text", text);
                FieldValue::Raw(text.to_string())
            }
        }
    }

    /// The numeric value, when this field is not degraded.
    pub fn amount(&self) -> Option<u64> {
        match self {
            FieldValue::Amount(n) => Some(*n),
            FieldValue::Raw(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Amount(n) => write!(f, "{}", n),
            FieldValue::Raw(s) => write!(f, "{}", s),
        }
    }
}
