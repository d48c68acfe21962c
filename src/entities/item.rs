use super::SheetRecord;
use crate::sheets::{cell_at, CellValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

/// Procurement category of an item. Unknown values decode as `Generico` so a
/// hand-edited sheet cell never poisons a whole read.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum Category {
    Idraulica,
    Carpenteria,
    Elettronica,
    Verniciatura,
    Saldatura,
    #[default]
    Generico,
}

/// An inventory item. Column layout on the `Articoli` sheet:
/// SKU(0), Name(1), Category(2), Stock(3), SafetyStock(4), Cost(5),
/// SupplierId(6), LeadTime(7).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub sku: String,
    pub name: String,
    pub category: Category,
    pub stock: i64,
    pub safety_stock: i64,
    pub cost: Decimal,
    pub supplier_id: String,
    pub lead_time_days: i64,
    /// Present iff this record came from a non-search ranged read (or the
    /// seed path, which assigns indices by the same arithmetic).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,
}

impl SheetRecord for Item {
    const SHEET: &'static str = "Articoli";
    const LAST_COLUMN: char = 'H';

    fn decode(row: &[CellValue], row_index: Option<u32>) -> Self {
        Self {
            sku: cell_at(row, 0).as_text(),
            name: cell_at(row, 1).as_text(),
            category: Category::from_str(cell_at(row, 2).as_text().trim()).unwrap_or_default(),
            stock: cell_at(row, 3).as_integer(),
            safety_stock: cell_at(row, 4).as_integer(),
            cost: cell_at(row, 5).as_decimal(),
            supplier_id: cell_at(row, 6).as_text(),
            lead_time_days: cell_at(row, 7).as_integer(),
            row_index,
        }
    }

    fn encode(&self) -> Vec<CellValue> {
        vec![
            CellValue::text(&self.sku),
            CellValue::text(&self.name),
            CellValue::text(self.category.to_string()),
            CellValue::from_integer(self.stock),
            CellValue::from_integer(self.safety_stock),
            CellValue::from_decimal(self.cost),
            CellValue::text(&self.supplier_id),
            CellValue::from_integer(self.lead_time_days),
        ]
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.sku.to_lowercase().contains(needle)
    }

    fn row_index(&self) -> Option<u32> {
        self.row_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn full_row() -> Vec<CellValue> {
        vec![
            CellValue::text("HYD-VAL-001"),
            CellValue::text("Valvola Controllo Flusso"),
            CellValue::text("Idraulica"),
            CellValue::Number(12.0),
            CellValue::Number(20.0),
            CellValue::text("150"),
            CellValue::text("SUP-01"),
            CellValue::Number(7.0),
        ]
    }

    #[test]
    fn decodes_a_full_row() {
        let item = Item::decode(&full_row(), Some(2));
        assert_eq!(item.sku, "HYD-VAL-001");
        assert_eq!(item.category, Category::Idraulica);
        assert_eq!(item.stock, 12);
        assert_eq!(item.safety_stock, 20);
        assert_eq!(item.cost, dec!(150));
        assert_eq!(item.row_index, Some(2));
    }

    #[test]
    fn short_rows_decode_with_defaults() {
        let row = vec![CellValue::text("STL-PLT-5MM"), CellValue::text("Piastra")];
        let item = Item::decode(&row, None);
        assert_eq!(item.sku, "STL-PLT-5MM");
        assert_eq!(item.category, Category::Generico);
        assert_eq!(item.stock, 0);
        assert_eq!(item.cost, Decimal::ZERO);
        assert_eq!(item.lead_time_days, 0);
        assert_eq!(item.row_index, None);
    }

    #[test]
    fn unknown_category_falls_back_to_generico() {
        let mut row = full_row();
        row[2] = CellValue::text("Pneumatica");
        assert_eq!(Item::decode(&row, None).category, Category::Generico);
    }

    #[test]
    fn encoding_emits_the_full_fixed_width_row() {
        let item = Item::decode(&full_row(), Some(2));
        let encoded = item.encode();
        assert_eq!(encoded.len(), 8);
        assert_eq!(encoded[2], CellValue::text("Idraulica"));
        assert_eq!(encoded[5], CellValue::text("150"));
        // The row index is transport metadata, never a column.
        assert!(Item::decode(&encoded, None).row_index.is_none());
    }

    #[test]
    fn search_matches_sku_and_name_case_insensitively() {
        let item = Item::decode(&full_row(), None);
        assert!(item.matches("valvola"));
        assert!(item.matches("hyd-val"));
        assert!(!item.matches("piastra"));
    }
}
