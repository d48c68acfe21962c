//! Material Requirements Planning: shortage detection and reorder sizing.
//!
//! Shortage status is a global property of the item set, so the plan is
//! always computed over a complete, unpaginated fetch; pagination applies to
//! the computed output only. Paginating the input instead would silently
//! hide shortages outside the displayed page.

use crate::entities::Item;
use crate::errors::ServiceError;
use crate::paging::{page_slice, PageRequest, PageResult};
use crate::services::datastore::SpreadsheetDataStore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Reorder advice for one item. Derived, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MrpResult {
    pub item: Item,
    pub is_shortage: bool,
    pub qty_to_order: i64,
    pub estimated_cost: Decimal,
}

/// Computes the shortage plan, preserving input order. Pure: no state, no
/// I/O. Stock exactly at the safety level is not a shortage.
pub fn compute(items: &[Item]) -> Vec<MrpResult> {
    items
        .iter()
        .map(|item| {
            let qty_to_order = (item.safety_stock - item.stock).max(0);
            MrpResult {
                is_shortage: item.stock < item.safety_stock,
                qty_to_order,
                estimated_cost: Decimal::from(qty_to_order) * item.cost,
                item: item.clone(),
            }
        })
        .collect()
}

/// Shortage planning over the datastore.
pub struct MrpService {
    store: Arc<SpreadsheetDataStore>,
}

impl MrpService {
    pub fn new(store: Arc<SpreadsheetDataStore>) -> Self {
        Self { store }
    }

    /// Runs the plan across the entire item set (honoring the search filter)
    /// and slices the computed results down to the requested page.
    #[instrument(skip(self))]
    pub async fn plan(&self, req: &PageRequest) -> Result<PageResult<MrpResult>, ServiceError> {
        req.validate()?;
        let items = self.store.all_items(req.search.trim()).await;
        let results = compute(&items);
        Ok(PageResult {
            total: results.len() as u64,
            data: page_slice(&results, req.page, req.page_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Category;
    use rust_decimal_macros::dec;

    fn item(sku: &str, stock: i64, safety_stock: i64, cost: Decimal) -> Item {
        Item {
            sku: sku.into(),
            name: format!("Item {}", sku),
            category: Category::Generico,
            stock,
            safety_stock,
            cost,
            supplier_id: "SUP-01".into(),
            lead_time_days: 7,
            row_index: None,
        }
    }

    #[test]
    fn flags_shortages_and_sizes_reorders() {
        let items = vec![
            item("A", 12, 20, dec!(150)),
            item("B", 500, 200, dec!(45)),
            item("C", 5, 10, dec!(800)),
            item("D", 50, 40, dec!(20)),
            item("E", 1000, 500, dec!(0.5)),
        ];
        let plan = compute(&items);

        let shortages: Vec<&MrpResult> = plan.iter().filter(|r| r.is_shortage).collect();
        assert_eq!(shortages.len(), 2);
        assert_eq!(shortages[0].item.sku, "A");
        assert_eq!(shortages[0].qty_to_order, 8);
        assert_eq!(shortages[0].estimated_cost, dec!(1200));
        assert_eq!(shortages[1].item.sku, "C");
        assert_eq!(shortages[1].qty_to_order, 5);
        assert_eq!(shortages[1].estimated_cost, dec!(4000));
    }

    #[test]
    fn stock_at_safety_level_is_not_a_shortage() {
        let plan = compute(&[item("A", 40, 40, dec!(10))]);
        assert!(!plan[0].is_shortage);
        assert_eq!(plan[0].qty_to_order, 0);
        assert_eq!(plan[0].estimated_cost, Decimal::ZERO);
    }

    #[test]
    fn surplus_never_yields_a_negative_order() {
        let plan = compute(&[item("A", 100, 10, dec!(3))]);
        assert!(!plan[0].is_shortage);
        assert_eq!(plan[0].qty_to_order, 0);
    }

    #[test]
    fn preserves_input_order() {
        let items = vec![
            item("Z", 0, 1, dec!(1)),
            item("A", 0, 1, dec!(1)),
            item("M", 0, 1, dec!(1)),
        ];
        let plan = compute(&items);
        let order: Vec<&str> = plan.iter().map(|r| r.item.sku.as_str()).collect();
        assert_eq!(order, vec!["Z", "A", "M"]);
    }

    #[test]
    fn fractional_costs_stay_exact() {
        let plan = compute(&[item("W", 100, 500, dec!(0.5))]);
        assert_eq!(plan[0].qty_to_order, 400);
        assert_eq!(plan[0].estimated_cost, dec!(200.0));
    }
}
