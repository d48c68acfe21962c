use super::SheetRecord;
use crate::sheets::{cell_at, CellValue};
use serde::{Deserialize, Serialize};

/// A customer. Column layout on the `Clienti` sheet:
/// Id(0), Name(1), Email(2), VatNumber(3), Address(4), Region(5),
/// PaymentTerms(6).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub vat_number: String,
    pub address: String,
    pub region: String,
    pub payment_terms: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,
}

impl SheetRecord for Customer {
    const SHEET: &'static str = "Clienti";
    const LAST_COLUMN: char = 'G';

    fn decode(row: &[CellValue], row_index: Option<u32>) -> Self {
        Self {
            id: cell_at(row, 0).as_text(),
            name: cell_at(row, 1).as_text(),
            email: cell_at(row, 2).as_text(),
            vat_number: cell_at(row, 3).as_text(),
            address: cell_at(row, 4).as_text(),
            region: cell_at(row, 5).as_text(),
            payment_terms: cell_at(row, 6).as_text(),
            row_index,
        }
    }

    fn encode(&self) -> Vec<CellValue> {
        vec![
            CellValue::text(&self.id),
            CellValue::text(&self.name),
            CellValue::text(&self.email),
            CellValue::text(&self.vat_number),
            CellValue::text(&self.address),
            CellValue::text(&self.region),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_keeps_canonical_column_order() {
        let row = vec![
            CellValue::text("CUST-01"),
            CellValue::text("Municipalità di Milano"),
            CellValue::text("appalti@comune.milano.it"),
            CellValue::text("01199250158"),
            CellValue::text("Piazza della Scala, 2"),
            CellValue::text("Lombardia"),
            CellValue::text("Bonifico 30gg"),
        ];
        let customer = Customer::decode(&row, Some(3));
        assert_eq!(customer.vat_number, "01199250158");
        assert_eq!(customer.encode(), row);
    }

    #[test]
    fn short_row_defaults_to_empty_strings() {
        let customer = Customer::decode(&[CellValue::text("CUST-07")], None);
        assert_eq!(customer.region, "");
        assert_eq!(customer.payment_terms, "");
    }
}
