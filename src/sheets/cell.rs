use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single spreadsheet cell as it crosses the wire: a string, a number, or
/// nothing at all. Rows read back from the values API routinely mix all
/// three, and trailing empty cells are simply omitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// String view of the cell; empty cells and numbers are rendered too so
    /// decoding never has to care which variant the API chose.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Empty => String::new(),
        }
    }

    /// Integer view; unparseable or missing cells read as 0.
    pub fn as_integer(&self) -> i64 {
        match self {
            CellValue::Number(n) => *n as i64,
            CellValue::Text(s) => s.trim().parse::<i64>().unwrap_or_else(|_| {
                s.trim().parse::<f64>().map(|f| f as i64).unwrap_or(0)
            }),
            CellValue::Empty => 0,
        }
    }

    /// Float view; unparseable or missing cells read as 0.0.
    pub fn as_float(&self) -> f64 {
        match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse().unwrap_or(0.0),
            CellValue::Empty => 0.0,
        }
    }

    /// Decimal view; unparseable or missing cells read as zero.
    pub fn as_decimal(&self) -> Decimal {
        match self {
            CellValue::Number(n) => Decimal::from_str(&format_number(*n)).unwrap_or(Decimal::ZERO),
            CellValue::Text(s) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
            CellValue::Empty => Decimal::ZERO,
        }
    }

    pub fn from_integer(value: i64) -> Self {
        CellValue::Number(value as f64)
    }

    /// Decimals are written as text so the value round-trips without binary
    /// float rounding; USER_ENTERED input coerces it back to a number.
    pub fn from_decimal(value: Decimal) -> Self {
        CellValue::Text(value.normalize().to_string())
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Returns the cell at `index`, or `Empty` when the row is short.
pub fn cell_at(row: &[CellValue], index: usize) -> CellValue {
    row.get(index).cloned().unwrap_or(CellValue::Empty)
}
