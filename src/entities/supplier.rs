use super::SheetRecord;
use crate::sheets::{cell_at, CellValue};
use serde::{Deserialize, Serialize};

/// A supplier. Column layout on the `Fornitori` sheet:
/// Id(0), Name(1), Rating(2), Email(3), PaymentTerms(4).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    /// Internal vendor rating, 1.0 to 5.0.
    pub rating: f32,
    pub email: String,
    pub payment_terms: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,
}

impl SheetRecord for Supplier {
    const SHEET: &'static str = "Fornitori";
    const LAST_COLUMN: char = 'E';

    fn decode(row: &[CellValue], row_index: Option<u32>) -> Self {
        Self {
            id: cell_at(row, 0).as_text(),
            name: cell_at(row, 1).as_text(),
            rating: cell_at(row, 2).as_float() as f32,
            email: cell_at(row, 3).as_text(),
            payment_terms: cell_at(row, 4).as_text(),
            row_index,
        }
    }

    fn encode(&self) -> Vec<CellValue> {
        vec![
            CellValue::text(&self.id),
            CellValue::text(&self.name),
            CellValue::Number(self.rating as f64),
            CellValue::text(&self.email),
            CellValue::text(&self.payment_terms),
        ]
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.id.to_lowercase().contains(needle)
    }

    fn row_index(&self) -> Option<u32> {
        self.row_index
    }
}
