//! Spreadsheet-as-database access: range addressing, the values-API
//! transport, and the offline seed backend.

pub mod cell;
pub mod client;
pub mod range;
pub mod seed;

pub use cell::{cell_at, CellValue};
pub use client::{HttpSheetsBackend, SheetsBackend, ValueRange};
pub use seed::SeedBackend;
