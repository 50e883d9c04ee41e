use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Convert a 1-based column index to column letters
/// 1=A, 2=B, ... 26=Z, 27=AA, 28=AB, ...
///
/// Column 0 has no letter form and renders as an empty string.
#[must_use]
pub fn column_letters(col: u32) -> String {
    let mut result = Vec::new();
    let mut col = col;

    while col > 0 {
        col -= 1;
        result.push((col % 26) as u8 + b'A');
        col /= 26;
    }

    result.reverse();
    String::from_utf8(result).unwrap_or_default()
}

/// Convert column letters to a 1-based column index (case-insensitive)
pub fn parse_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(SheetError::InvalidCellNotation(letters.to_string()));
    }

    let mut col: u32 = 0;
    for b in letters.bytes() {
        let b = b.to_ascii_uppercase();
        if !b.is_ascii_uppercase() {
            return Err(SheetError::InvalidCellNotation(letters.to_string()));
        }
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(u32::from(b - b'A') + 1))
            .ok_or_else(|| SheetError::InvalidCellNotation(letters.to_string()))?;
    }

    Ok(col)
}

/// A 1-based (row, column) position in a sheet
///
/// Ordering is row-major: by row, then by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellCoordinate {
    pub row: u32,
    pub col: u32,
}

impl CellCoordinate {
    #[must_use]
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(2), "B");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(28), "AB");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(53), "BA");
        assert_eq!(column_letters(702), "ZZ");
        assert_eq!(column_letters(703), "AAA");
        assert_eq!(column_letters(0), "");
    }

    #[test]
    fn test_parse_column() {
        assert_eq!(parse_column("A").unwrap(), 1);
        assert_eq!(parse_column("z").unwrap(), 26);
        assert_eq!(parse_column("AA").unwrap(), 27);
        assert_eq!(parse_column("ZZ").unwrap(), 702);
        assert!(parse_column("").is_err());
        assert!(parse_column("A1").is_err());
    }

    #[test]
    fn test_coordinate_display() {
        assert_eq!(CellCoordinate::new(7, 2).to_string(), "B7");
        assert_eq!(CellCoordinate::new(100, 26).to_string(), "Z100");
        assert_eq!(CellCoordinate::new(1, 27).to_string(), "AA1");
    }

    #[test]
    fn test_coordinate_ordering_is_row_major() {
        let mut coords = vec![
            CellCoordinate::new(2, 1),
            CellCoordinate::new(1, 3),
            CellCoordinate::new(1, 1),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                CellCoordinate::new(1, 1),
                CellCoordinate::new(1, 3),
                CellCoordinate::new(2, 1),
            ]
        );
    }

    #[test]
    fn test_roundtrip() {
        for col in 1..800 {
            let letters = column_letters(col);
            assert_eq!(parse_column(&letters).unwrap(), col);
        }
    }
}
