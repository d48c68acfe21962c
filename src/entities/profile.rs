use serde::{Deserialize, Serialize};

/// Registry data of the company operating the dashboard. Single record,
/// read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub vat_number: String,
    pub tax_id: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub province: String,
    pub country: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub bank_name: String,
    pub iban: String,
    pub swift: String,
}
