use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a cell value read from a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    /// No value stored at this position.
    Absent,
    Text(String),
    Number(f64),
    Boolean(bool),
    /// Anything else (dates, durations, formula errors), kept in display form.
    Other(String),
}

impl CellValue {
    /// Check whether the cell counts as empty.
    ///
    /// Only `Absent` and whitespace-only `Text` are empty. `Number(0.0)`,
    /// `Boolean(false)` and `Text("0")` all hold data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Absent => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Boolean(_) | CellValue::Other(_) => false,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Absent
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Absent => write!(f, ""),
            CellValue::Text(s) | CellValue::Other(s) => write!(f, "{s}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Number(i as f64)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Number(f64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Number(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_blank_text_are_empty() {
        assert!(CellValue::Absent.is_empty());
        assert!(CellValue::Text(String::new()).is_empty());
        assert!(CellValue::Text("   ".to_string()).is_empty());
        assert!(CellValue::Text("\t\n ".to_string()).is_empty());
    }

    #[test]
    fn test_values_with_data_are_not_empty() {
        assert!(!CellValue::Text("0".to_string()).is_empty());
        assert!(!CellValue::Text(" x ".to_string()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
        assert!(!CellValue::Boolean(false).is_empty());
        assert!(!CellValue::Other("#N/A".to_string()).is_empty());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CellValue::from(3), CellValue::Number(3.0));
        assert_eq!(CellValue::from("a"), CellValue::Text("a".to_string()));
        assert_eq!(CellValue::from(None::<&str>), CellValue::Absent);
        assert_eq!(CellValue::from(Some(true)), CellValue::Boolean(true));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Absent.to_string(), "");
        assert_eq!(CellValue::Number(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Boolean(true).to_string(), "true");
    }
}
