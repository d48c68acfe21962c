//! Purchase orders, logistics events and the company profile.
//!
//! These read paths serve fixed demo data pending dedicated sheets, but they
//! go through the same request envelope and filter/slice logic as the stored
//! entities so the dashboard contract does not change when real storage
//! lands.

use crate::entities::{
    CompanyProfile, LogisticsEvent, LogisticsStatus, PoStatus, PurchaseOrder, PurchaseOrderLine,
    ShipmentDirection,
};
use crate::errors::ServiceError;
use crate::paging::{page_slice, PageRequest, PageResult};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

pub struct ProcurementService {
    orders: Vec<PurchaseOrder>,
    logistics: Vec<LogisticsEvent>,
    profile: CompanyProfile,
}

impl Default for ProcurementService {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcurementService {
    pub fn new() -> Self {
        Self {
            orders: demo_orders(),
            logistics: demo_logistics(),
            profile: demo_profile(),
        }
    }

    pub fn list_orders(&self, req: &PageRequest) -> Result<PageResult<PurchaseOrder>, ServiceError> {
        req.validate()?;
        let needle = req.search.trim().to_lowercase();
        let matches: Vec<PurchaseOrder> = self
            .orders
            .iter()
            .filter(|po| needle.is_empty() || po.matches(&needle))
            .cloned()
            .collect();
        Ok(PageResult {
            total: matches.len() as u64,
            data: page_slice(&matches, req.page, req.page_size),
        })
    }

    pub fn list_logistics(
        &self,
        req: &PageRequest,
    ) -> Result<PageResult<LogisticsEvent>, ServiceError> {
        req.validate()?;
        let needle = req.search.trim().to_lowercase();
        let matches: Vec<LogisticsEvent> = self
            .logistics
            .iter()
            .filter(|ev| needle.is_empty() || ev.matches(&needle))
            .cloned()
            .collect();
        Ok(PageResult {
            total: matches.len() as u64,
            data: page_slice(&matches, req.page, req.page_size),
        })
    }

    pub fn profile(&self) -> CompanyProfile {
        self.profile.clone()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("static demo date")
}

fn demo_orders() -> Vec<PurchaseOrder> {
    vec![
        PurchaseOrder {
            id: "PO-2023-1001".into(),
            date: date(2023, 10, 1),
            supplier_id: "SUP-01".into(),
            supplier_name: "HydraForce Italia".into(),
            status: PoStatus::Received,
            items: vec![PurchaseOrderLine {
                sku: "HYD-VAL-001".into(),
                description: "Valvola Controllo Flusso".into(),
                qty: 30,
                unit_price: dec!(150),
                total: dec!(4500),
            }],
            total_amount: dec!(4500.50),
            expected_delivery_date: Some(date(2023, 10, 20)),
            tracking_code: Some("DHL-123456".into()),
            notes: None,
        },
        PurchaseOrder {
            id: "PO-2023-1015".into(),
            date: date(2023, 10, 18),
            supplier_id: "SUP-02".into(),
            supplier_name: "Acciaierie Venete".into(),
            status: PoStatus::Shipped,
            items: vec![PurchaseOrderLine {
                sku: "STL-PLT-5MM".into(),
                description: "Piastra Acciaio 5mm".into(),
                qty: 150,
                unit_price: dec!(45),
                total: dec!(6750),
            }],
            total_amount: dec!(6750),
            expected_delivery_date: Some(date(2023, 10, 28)),
            tracking_code: Some("BRT-998877".into()),
            notes: Some("Urgent restock".into()),
        },
    ]
}

fn demo_logistics() -> Vec<LogisticsEvent> {
    vec![LogisticsEvent {
        id: "LOG-001".into(),
        direction: ShipmentDirection::Inbound,
        reference_id: "PO-2023-1015".into(),
        date: date(2023, 10, 23),
        courier: Some("Bartolini".into()),
        tracking: Some("BRT-998877".into()),
        status: LogisticsStatus::Transit,
        items_count: 150,
    }]
}

fn demo_profile() -> CompanyProfile {
    CompanyProfile {
        company_name: "EB-pro Procurement Solutions S.r.l.".into(),
        vat_number: "IT12345678901".into(),
        tax_id: "12345678901".into(),
        address: "Via dell'Innovazione Tecnologica, 42".into(),
        city: "Milano".into(),
        zip_code: "20100".into(),
        province: "MI".into(),
        country: "Italia".into(),
        email: "admin@eb-pro.com".into(),
        phone: "+39 02 555 1234".into(),
        website: "www.eb-pro.com".into(),
        bank_name: "Intesa Sanpaolo".into(),
        iban: "IT60X0306903200100000012345".into(),
        swift: "BCITITMM".into(),
    }
}
