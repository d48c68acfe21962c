//! Offline seed dataset.
//!
//! When no access credential is held, reads are served from these fixed rows
//! through the same `SheetsBackend` contract as the live API. Ranges are
//! honored exactly, so pagination and search behave the same with or without
//! credentials; this exists so the dashboard and its tests can run without a
//! live login, not as a degraded mode with different semantics.

use super::cell::CellValue;
use super::client::SheetsBackend;
use super::range::{parse_range, FIRST_DATA_ROW};
use crate::errors::ServiceError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static DEMO_SHEETS: Lazy<HashMap<String, Vec<Vec<CellValue>>>> = Lazy::new(|| {
    let mut sheets = HashMap::new();
    sheets.insert("Articoli".to_string(), demo_items());
    sheets.insert("Fornitori".to_string(), demo_suppliers());
    sheets.insert("Clienti".to_string(), demo_customers());
    sheets
});

#[derive(Default)]
pub struct SeedBackend {
    sheets: HashMap<String, Vec<Vec<CellValue>>>,
}

impl SeedBackend {
    pub fn new(sheets: HashMap<String, Vec<Vec<CellValue>>>) -> Self {
        Self { sheets }
    }

    /// Seed rows mirroring a small but realistic procurement dataset.
    pub fn with_demo_data() -> Self {
        Self {
            sheets: DEMO_SHEETS.clone(),
        }
    }
}

#[async_trait]
impl SheetsBackend for SeedBackend {
    async fn get_values(
        &self,
        _spreadsheet_id: &str,
        range: &str,
        _token: &str,
    ) -> Result<Vec<Vec<CellValue>>, ServiceError> {
        let parsed = parse_range(range)
            .ok_or_else(|| ServiceError::RangeRead(format!("unparseable range: {}", range)))?;

        let rows = match self.sheets.get(&parsed.sheet) {
            Some(rows) => rows,
            None => return Ok(vec![]),
        };

        // Translate sheet coordinates into offsets within the data body.
        let start = parsed.start_row.max(FIRST_DATA_ROW) - FIRST_DATA_ROW;
        let end = match parsed.end_row {
            Some(end_row) if end_row >= FIRST_DATA_ROW => {
                ((end_row - FIRST_DATA_ROW) as usize + 1).min(rows.len())
            }
            Some(_) => 0,
            None => rows.len(),
        };

        if start as usize >= end {
            return Ok(vec![]);
        }
        Ok(rows[start as usize..end].to_vec())
    }

    async fn update_values(
        &self,
        _spreadsheet_id: &str,
        _range: &str,
        _token: &str,
        _values: Vec<Vec<CellValue>>,
    ) -> Result<(), ServiceError> {
        // Writes are gated on a credential before any backend is chosen.
        Err(ServiceError::AuthenticationRequired(
            "offline seed data is read-only".into(),
        ))
    }

    async fn append_values(
        &self,
        _spreadsheet_id: &str,
        _range: &str,
        _token: &str,
        _values: Vec<Vec<CellValue>>,
    ) -> Result<(), ServiceError> {
        Err(ServiceError::AuthenticationRequired(
            "offline seed data is read-only".into(),
        ))
    }
}

fn text(s: &str) -> CellValue {
    CellValue::text(s)
}

fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

// Column order matches the entity codecs: SKU, Name, Category, Stock,
// SafetyStock, Cost, SupplierId, LeadTime.
fn demo_items() -> Vec<Vec<CellValue>> {
    vec![
        vec![
            text("HYD-VAL-001"),
            text("Valvola Controllo Flusso"),
            text("Idraulica"),
            num(12.0),
            num(20.0),
            text("150"),
            text("SUP-01"),
            num(7.0),
        ],
        vec![
            text("STL-PLT-5MM"),
            text("Piastra Acciaio 5mm"),
            text("Carpenteria"),
            num(500.0),
            num(200.0),
            text("45"),
            text("SUP-02"),
            num(14.0),
        ],
        vec![
            text("ELC-PLC-X2"),
            text("Centralina PLC Veicolare"),
            text("Elettronica"),
            num(5.0),
            num(10.0),
            text("800"),
            text("SUP-03"),
            num(21.0),
        ],
        vec![
            text("PNT-YEL-RAL"),
            text("Vernice Gialla RAL1023"),
            text("Verniciatura"),
            num(50.0),
            num(40.0),
            text("20"),
            text("SUP-04"),
            num(7.0),
        ],
        vec![
            text("WLD-ROD-X1"),
            text("Elettrodi Saldatura Inox"),
            text("Saldatura"),
            num(1000.0),
            num(500.0),
            text("0.5"),
            text("SUP-02"),
            num(7.0),
        ],
    ]
}

// Id, Name, Rating, Email, PaymentTerms.
fn demo_suppliers() -> Vec<Vec<CellValue>> {
    vec![
        vec![
            text("SUP-01"),
            text("HydraForce Italia"),
            num(4.8),
            text("sales@hydraforce.it"),
            text("60 DFFM"),
        ],
        vec![
            text("SUP-02"),
            text("Acciaierie Venete"),
            num(4.2),
            text("ordini@acciaierie.it"),
            text("30 DF"),
        ],
        vec![
            text("SUP-03"),
            text("AutoElectric Pro"),
            num(3.9),
            text("info@autoelectric.com"),
            text("RB 30/60"),
        ],
    ]
}

// Id, Name, Email, VatNumber, Address, Region, PaymentTerms.
fn demo_customers() -> Vec<Vec<CellValue>> {
    vec![
        vec![
            text("CUST-01"),
            text("Municipalità di Milano"),
            text("appalti@comune.milano.it"),
            text("01199250158"),
            text("Piazza della Scala, 2"),
            text("Lombardia"),
            text("Bonifico 30gg"),
        ],
        vec![
            text("CUST-02"),
            text("Roma Multiservizi"),
            text("acquisti@romamultiservizi.it"),
            text("05438871003"),
            text("Via Tiburtina 100"),
            text("Lazio"),
            text("Bonifico 60gg"),
        ],
        vec![
            text("CUST-03"),
            text("Hera SpA"),
            text("procurement@gruppohera.it"),
            text("04245520376"),
            text("Viale Berti Pichat 2/4"),
            text("Emilia-Romagna"),
            text("Bonifico 90gg"),
        ],
    ]
}
