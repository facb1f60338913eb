//! Heuristic typing of CSV cells.
//!
//! Cells are typed one at a time, not per column, so a column can hold a mix
//! of numbers and text across rows.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static PERCENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?%$").unwrap());

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

/// A typed cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Numeric(f64),
    Text(String),
}

impl CellValue {
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Numeric(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Numeric(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    /// Text form used for searching and text comparison
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Numeric(n) => without_negative_zero(*n).to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Text(String::new())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Numeric(n) => write!(f, "{}", without_negative_zero(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

// -0 renders as "0"
fn without_negative_zero(n: f64) -> f64 {
    if n == 0.0 {
        0.0
    } else {
        n
    }
}

/// Classify a raw cell as a number or leave it as text.
///
/// The trimmed value is only used for matching; text results keep the
/// original untrimmed cell. A percent sign is dropped, not converted to a
/// fraction: `"45.2%"` becomes `45.2`.
pub fn coerce(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Text(raw.to_string());
    }

    if PERCENT_PATTERN.is_match(trimmed) {
        if let Ok(n) = trimmed.trim_end_matches('%').parse::<f64>() {
            return CellValue::Numeric(without_negative_zero(n));
        }
    }

    if NUMBER_PATTERN.is_match(trimmed) {
        if let Ok(n) = trimmed.parse::<f64>() {
            return CellValue::Numeric(without_negative_zero(n));
        }
    }

    CellValue::Text(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_is_dropped_not_scaled() {
        assert_eq!(coerce("45.2%"), CellValue::Numeric(45.2));
        assert_eq!(coerce("-1.5%"), CellValue::Numeric(-1.5));
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(coerce("-3"), CellValue::Numeric(-3.0));
        assert_eq!(coerce("0.312"), CellValue::Numeric(0.312));
        assert_eq!(coerce(" 42 "), CellValue::Numeric(42.0));
    }

    #[test]
    fn test_non_numbers_stay_text() {
        assert_eq!(coerce("3.1.4"), CellValue::Text("3.1.4".to_string()));
        assert_eq!(coerce(".300"), CellValue::Text(".300".to_string()));
        assert_eq!(coerce("+5"), CellValue::Text("+5".to_string()));
        assert_eq!(coerce("1e5"), CellValue::Text("1e5".to_string()));
        assert_eq!(coerce("%"), CellValue::Text("%".to_string()));
    }

    #[test]
    fn test_text_keeps_original_spacing() {
        assert_eq!(coerce(" Kim "), CellValue::Text(" Kim ".to_string()));
        assert_eq!(coerce("   "), CellValue::Text("   ".to_string()));
        assert_eq!(coerce(""), CellValue::Text(String::new()));
    }

    #[test]
    fn test_negative_zero_reads_as_zero() {
        assert_eq!(coerce("-0").to_string(), "0");
        assert_eq!(coerce("-0.0%").to_string(), "0");
        assert_eq!(coerce("-0").as_text(), "0");
        assert_eq!(CellValue::Numeric(-0.0).to_string(), "0");
        assert!(coerce("-0").as_number().is_some_and(|n| n.is_sign_positive()));
    }

    #[test]
    fn test_display() {
        assert_eq!(coerce("3").to_string(), "3");
        assert_eq!(coerce("45.2%").to_string(), "45.2");
        assert_eq!(coerce("-0.5").to_string(), "-0.5");
        assert_eq!(coerce("Kim").to_string(), "Kim");
    }
}
