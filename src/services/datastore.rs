//! The sole gateway to entity storage.
//!
//! Reads are range-addressed against the backing spreadsheet; rows decode
//! into typed records tagged with their originating sheet row so they can be
//! updated in place. Without an access credential every read is served from
//! the seed backend through the identical code path, and every write fails.

use crate::auth::SessionContext;
use crate::entities::{Customer, Item, SheetRecord, Supplier};
use crate::errors::ServiceError;
use crate::paging::{page_slice, PageFetcher, PageRequest, PageResult};
use crate::sheets::range;
use crate::sheets::{CellValue, SheetsBackend};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Which backend served a read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StoreMode {
    Live,
    Seed,
}

pub struct SpreadsheetDataStore {
    live: Arc<dyn SheetsBackend>,
    seed: Arc<dyn SheetsBackend>,
    session: SessionContext,
    spreadsheet_id: String,
}

impl SpreadsheetDataStore {
    pub fn new(
        live: Arc<dyn SheetsBackend>,
        seed: Arc<dyn SheetsBackend>,
        session: SessionContext,
        spreadsheet_id: impl Into<String>,
    ) -> Self {
        Self {
            live,
            seed,
            session,
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    /// Backend a read issued right now would hit.
    pub fn mode(&self) -> StoreMode {
        if self.session.snapshot().is_some() {
            StoreMode::Live
        } else {
            StoreMode::Seed
        }
    }

    /// One ranged read with the credential snapshotted at call start.
    async fn read_values(&self, rng: &str) -> Result<Vec<Vec<CellValue>>, ServiceError> {
        match self.session.snapshot() {
            Some(token) => {
                self.live
                    .get_values(&self.spreadsheet_id, rng, token.as_str())
                    .await
            }
            None => self.seed.get_values(&self.spreadsheet_id, rng, "").await,
        }
    }

    /// Exact row count via a key-column scan. `None` when the scan fails;
    /// the caller degrades to rows-seen instead of failing the page.
    async fn exact_row_count<E: SheetRecord>(&self) -> Option<u64> {
        match self.read_values(&range::key_column_range(E::SHEET)).await {
            Ok(rows) => Some(
                rows.iter()
                    .filter(|row| row.first().map(|cell| !cell.is_empty()).unwrap_or(false))
                    .count() as u64,
            ),
            Err(err) => {
                warn!(sheet = E::SHEET, error = %err, "key-column count failed");
                None
            }
        }
    }

    /// Lists one page of an entity.
    ///
    /// Non-search mode issues a single page-ranged read and tags each row
    /// with `start_row + offset`. Search mode scans the whole data body,
    /// filters locally, and page-slices the matches; those records carry no
    /// row index, so an edit attempted on them fails fast instead of writing
    /// through an unreliable address.
    #[instrument(skip(self), fields(sheet = E::SHEET))]
    pub async fn list<E: SheetRecord>(&self, req: &PageRequest) -> Result<PageResult<E>, ServiceError> {
        req.validate()?;

        if req.is_search() {
            let needle = req.search.trim().to_lowercase();
            let rows = match self
                .read_values(&range::full_range(E::SHEET, E::LAST_COLUMN))
                .await
            {
                Ok(rows) => rows,
                Err(err) => {
                    warn!(sheet = E::SHEET, error = %err, "search scan failed; serving empty page");
                    return Ok(PageResult::empty());
                }
            };

            let matches: Vec<E> = rows
                .iter()
                .map(|row| E::decode(row, None))
                .filter(|record| record.matches(&needle))
                .collect();

            return Ok(PageResult {
                total: matches.len() as u64,
                data: page_slice(&matches, req.page, req.page_size),
            });
        }

        let (start_row, _) = range::page_rows(req.page, req.page_size);
        let rng = range::page_range(E::SHEET, req.page, req.page_size, E::LAST_COLUMN);
        let rows = match self.read_values(&rng).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(sheet = E::SHEET, error = %err, "page read failed; serving empty page");
                return Ok(PageResult::empty());
            }
        };

        let data: Vec<E> = rows
            .iter()
            .enumerate()
            .map(|(offset, row)| E::decode(row, Some(start_row + offset as u32)))
            .collect();

        let total = match self.exact_row_count::<E>().await {
            Some(count) => count,
            None => data.len() as u64,
        };

        Ok(PageResult { data, total })
    }

    /// Fetches the complete entity body in one ranged read, optionally
    /// filtered. Shortage planning and analysis need the full set no matter
    /// what page the dashboard is showing; read failures degrade to an empty
    /// set.
    #[instrument(skip(self), fields(sheet = E::SHEET))]
    pub async fn fetch_all<E: SheetRecord>(&self, search: &str) -> Vec<E> {
        let rows = match self
            .read_values(&range::full_range(E::SHEET, E::LAST_COLUMN))
            .await
        {
            Ok(rows) => rows,
            Err(err) => {
                warn!(sheet = E::SHEET, error = %err, "full-table read failed; serving empty set");
                return Vec::new();
            }
        };

        let needle = search.trim().to_lowercase();
        rows.iter()
            .enumerate()
            .map(|(offset, row)| E::decode(row, Some(range::FIRST_DATA_ROW + offset as u32)))
            .filter(|record| needle.is_empty() || record.matches(&needle))
            .collect()
    }

    /// Appends a fully-serialized row; the backend assigns the position.
    #[instrument(skip(self, record), fields(sheet = E::SHEET))]
    pub async fn create<E: SheetRecord>(&self, record: &E) -> Result<(), ServiceError> {
        let token = self.require_credential()?;
        self.live
            .append_values(
                &self.spreadsheet_id,
                &range::append_range(E::SHEET),
                token.as_str(),
                vec![record.encode()],
            )
            .await
    }

    /// Replaces exactly the row the record was loaded from. A record without
    /// a usable row index is a caller bug and fails before any backend call.
    #[instrument(skip(self, record), fields(sheet = E::SHEET))]
    pub async fn update<E: SheetRecord>(&self, record: &E) -> Result<(), ServiceError> {
        let row_index = record
            .row_index()
            .filter(|idx| *idx >= range::FIRST_DATA_ROW)
            .ok_or_else(|| {
                ServiceError::MissingRowIndex(format!(
                    "cannot update {} record without a data-row index; refetch by page before editing",
                    E::SHEET
                ))
            })?;

        let token = self.require_credential()?;
        self.live
            .update_values(
                &self.spreadsheet_id,
                &range::write_range(E::SHEET, row_index),
                token.as_str(),
                vec![record.encode()],
            )
            .await
    }

    fn require_credential(&self) -> Result<crate::auth::AccessToken, ServiceError> {
        self.session.snapshot().ok_or_else(|| {
            ServiceError::AuthenticationRequired("sign in before saving data".into())
        })
    }

    // Typed per-entity surface.

    pub async fn list_items(&self, req: &PageRequest) -> Result<PageResult<Item>, ServiceError> {
        self.list(req).await
    }

    pub async fn list_suppliers(
        &self,
        req: &PageRequest,
    ) -> Result<PageResult<Supplier>, ServiceError> {
        self.list(req).await
    }

    pub async fn list_customers(
        &self,
        req: &PageRequest,
    ) -> Result<PageResult<Customer>, ServiceError> {
        self.list(req).await
    }

    pub async fn all_items(&self, search: &str) -> Vec<Item> {
        self.fetch_all(search).await
    }

    pub async fn all_suppliers(&self) -> Vec<Supplier> {
        self.fetch_all("").await
    }

    pub async fn create_item(&self, item: &Item) -> Result<(), ServiceError> {
        self.create(item).await
    }

    pub async fn update_item(&self, item: &Item) -> Result<(), ServiceError> {
        self.update(item).await
    }

    pub async fn create_supplier(&self, supplier: &Supplier) -> Result<(), ServiceError> {
        self.create(supplier).await
    }

    pub async fn update_supplier(&self, supplier: &Supplier) -> Result<(), ServiceError> {
        self.update(supplier).await
    }

    pub async fn create_customer(&self, customer: &Customer) -> Result<(), ServiceError> {
        self.create(customer).await
    }

    pub async fn update_customer(&self, customer: &Customer) -> Result<(), ServiceError> {
        self.update(customer).await
    }
}

/// Adapter exposing an entity listing as a `PageFetcher`, so a
/// `PaginatedQueryController` can drive the store directly.
pub struct StorePageFetcher<E> {
    store: Arc<SpreadsheetDataStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> StorePageFetcher<E> {
    pub fn new(store: Arc<SpreadsheetDataStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: SheetRecord> PageFetcher<E> for StorePageFetcher<E> {
    async fn fetch(&self, req: PageRequest) -> Result<PageResult<E>, ServiceError> {
        self.store.list(&req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AccessToken;
    use crate::sheets::SeedBackend;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory backend wrapper that counts writes and can be told to fail.
    struct CountingBackend {
        rows: SeedBackend,
        updates: AtomicUsize,
        appends: AtomicUsize,
        fail_reads: bool,
        reject_writes: bool,
    }

    impl CountingBackend {
        fn demo() -> Arc<Self> {
            Arc::new(Self {
                rows: SeedBackend::with_demo_data(),
                updates: AtomicUsize::new(0),
                appends: AtomicUsize::new(0),
                fail_reads: false,
                reject_writes: false,
            })
        }

        fn failing_reads() -> Arc<Self> {
            Arc::new(Self {
                rows: SeedBackend::with_demo_data(),
                updates: AtomicUsize::new(0),
                appends: AtomicUsize::new(0),
                fail_reads: true,
                reject_writes: false,
            })
        }

        fn rejecting_writes() -> Arc<Self> {
            Arc::new(Self {
                rows: SeedBackend::with_demo_data(),
                updates: AtomicUsize::new(0),
                appends: AtomicUsize::new(0),
                fail_reads: false,
                reject_writes: true,
            })
        }

        fn write_count(&self) -> usize {
            self.updates.load(Ordering::SeqCst) + self.appends.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SheetsBackend for CountingBackend {
        async fn get_values(
            &self,
            spreadsheet_id: &str,
            range: &str,
            token: &str,
        ) -> Result<Vec<Vec<CellValue>>, ServiceError> {
            if self.fail_reads {
                return Err(ServiceError::RangeRead("backend unavailable".into()));
            }
            self.rows.get_values(spreadsheet_id, range, token).await
        }

        async fn update_values(
            &self,
            _spreadsheet_id: &str,
            range: &str,
            _token: &str,
            _values: Vec<Vec<CellValue>>,
        ) -> Result<(), ServiceError> {
            if self.reject_writes {
                return Err(ServiceError::WriteFailed(format!("{}: out of range", range)));
            }
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn append_values(
            &self,
            _spreadsheet_id: &str,
            _range: &str,
            _token: &str,
            _values: Vec<Vec<CellValue>>,
        ) -> Result<(), ServiceError> {
            if self.reject_writes {
                return Err(ServiceError::WriteFailed("append rejected".into()));
            }
            self.appends.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn signed_in_session() -> SessionContext {
        let session = SessionContext::new();
        session.activate(AccessToken::new("tok-test"), None);
        session
    }

    fn store_with(live: Arc<CountingBackend>, session: SessionContext) -> SpreadsheetDataStore {
        SpreadsheetDataStore::new(
            live,
            Arc::new(SeedBackend::with_demo_data()),
            session,
            "sheet-test",
        )
    }

    #[tokio::test]
    async fn paginated_read_tags_rows_with_sheet_coordinates() {
        let store = store_with(CountingBackend::demo(), signed_in_session());
        let page = store
            .list_items(&PageRequest::new(1, 2, ""))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].row_index, Some(2));
        assert_eq!(page.data[1].row_index, Some(3));
        assert_eq!(page.total, 5, "non-search total is the exact key-column count");

        let page2 = store
            .list_items(&PageRequest::new(2, 2, ""))
            .await
            .unwrap();
        assert_eq!(page2.data[0].row_index, Some(4));
    }

    #[tokio::test]
    async fn search_pages_partition_the_filtered_set_exactly() {
        let store = store_with(CountingBackend::demo(), signed_in_session());

        // "a" matches every demo item name or SKU except none — collect the
        // filtered set through small pages and check the partition.
        let req1 = PageRequest::new(1, 2, "al");
        let first = store.list_items(&req1).await.unwrap();
        let total = first.total;
        let mut seen: Vec<String> = first.data.iter().map(|i| i.sku.clone()).collect();
        let mut page = 2;
        loop {
            let next = store
                .list_items(&PageRequest::new(page, 2, "al"))
                .await
                .unwrap();
            assert_eq!(next.total, total, "total is stable across pages");
            if next.data.is_empty() {
                break;
            }
            seen.extend(next.data.iter().map(|i| i.sku.clone()));
            page += 1;
        }

        assert_eq!(seen.len() as u64, total);
        let mut deduped = seen.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), seen.len(), "no item appears on two pages");
    }

    #[tokio::test]
    async fn search_results_carry_no_row_index() {
        let store = store_with(CountingBackend::demo(), signed_in_session());
        let page = store
            .list_items(&PageRequest::new(1, 20, "valvola"))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert!(page.data[0].row_index.is_none());
    }

    #[tokio::test]
    async fn update_without_row_index_fails_before_any_backend_write() {
        let live = CountingBackend::demo();
        let store = store_with(live.clone(), signed_in_session());

        let mut item = store
            .list_items(&PageRequest::new(1, 1, ""))
            .await
            .unwrap()
            .data
            .remove(0);
        item.row_index = None;

        let err = store.update_item(&item).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingRowIndex(_)));
        assert_eq!(live.write_count(), 0);
    }

    #[tokio::test]
    async fn update_with_header_row_index_is_rejected() {
        let live = CountingBackend::demo();
        let store = store_with(live.clone(), signed_in_session());

        let mut item = store
            .list_items(&PageRequest::new(1, 1, ""))
            .await
            .unwrap()
            .data
            .remove(0);
        item.row_index = Some(1);

        let err = store.update_item(&item).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingRowIndex(_)));
        assert_eq!(live.write_count(), 0);
    }

    #[tokio::test]
    async fn update_addresses_exactly_the_tracked_row() {
        let live = CountingBackend::demo();
        let store = store_with(live.clone(), signed_in_session());

        let mut item = store
            .list_items(&PageRequest::new(2, 2, ""))
            .await
            .unwrap()
            .data
            .remove(0);
        assert_eq!(item.row_index, Some(4));
        item.stock = 99;
        store.update_item(&item).await.unwrap();
        assert_eq!(live.updates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_row_index_surfaces_as_write_failed() {
        let live = CountingBackend::rejecting_writes();
        let store = store_with(live, signed_in_session());

        let item = Item::decode(&[CellValue::text("GONE-SKU")], Some(9000));
        let err = store.update_item(&item).await.unwrap_err();
        assert!(matches!(err, ServiceError::WriteFailed(_)));
    }

    #[tokio::test]
    async fn unauthenticated_reads_fall_back_to_seed_data() {
        let live = CountingBackend::failing_reads();
        let store = store_with(live, SessionContext::new());

        let page = store
            .list_items(&PageRequest::new(1, 2, ""))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].sku, "HYD-VAL-001");
        assert_eq!(store.mode(), StoreMode::Seed);
    }

    #[tokio::test]
    async fn seed_and_live_modes_return_the_same_records() {
        let live_store = store_with(CountingBackend::demo(), signed_in_session());
        let seed_store = store_with(CountingBackend::demo(), SessionContext::new());

        let live_page = live_store
            .list_items(&PageRequest::new(1, 2, ""))
            .await
            .unwrap();
        let seed_page = seed_store
            .list_items(&PageRequest::new(1, 2, ""))
            .await
            .unwrap();

        assert_eq!(live_page.total, seed_page.total);
        assert_eq!(live_page.data, seed_page.data);
    }

    #[tokio::test]
    async fn unauthenticated_writes_fail_terminally() {
        let live = CountingBackend::demo();
        let store = store_with(live.clone(), SessionContext::new());

        let item = store
            .list_items(&PageRequest::new(1, 1, ""))
            .await
            .unwrap()
            .data
            .remove(0);

        let err = store.create_item(&item).await.unwrap_err();
        assert!(matches!(err, ServiceError::AuthenticationRequired(_)));
        let err = store.update_item(&item).await.unwrap_err();
        assert!(matches!(err, ServiceError::AuthenticationRequired(_)));
        assert_eq!(live.write_count(), 0);
    }

    #[tokio::test]
    async fn failed_reads_absorb_into_an_empty_page() {
        let store = store_with(CountingBackend::failing_reads(), signed_in_session());
        let page = store
            .list_items(&PageRequest::new(1, 20, ""))
            .await
            .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);

        let searched = store
            .list_items(&PageRequest::new(1, 20, "valvola"))
            .await
            .unwrap();
        assert!(searched.data.is_empty());
        assert_eq!(searched.total, 0);
    }

    #[tokio::test]
    async fn expired_credential_reads_seed_data() {
        let session = SessionContext::new();
        session.activate(AccessToken::new("tok-old"), Some(-5));
        let store = store_with(CountingBackend::failing_reads(), session);

        let page = store
            .list_items(&PageRequest::new(1, 1, ""))
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1, "expired token must not hit the live backend");
    }

    #[tokio::test]
    async fn fetch_all_spans_every_row_regardless_of_paging() {
        let store = store_with(CountingBackend::demo(), signed_in_session());
        let items = store.all_items("").await;
        assert_eq!(items.len(), 5);
        assert_eq!(items[4].row_index, Some(6));

        let filtered = store.all_items("acciaio").await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].sku, "STL-PLT-5MM");
    }

    #[tokio::test]
    async fn invalid_page_request_is_rejected() {
        let store = store_with(CountingBackend::demo(), signed_in_session());
        let err = store
            .list_items(&PageRequest::new(0, 20, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn short_seed_rows_decode_with_defaults() {
        let mut sheets = HashMap::new();
        sheets.insert(
            "Articoli".to_string(),
            vec![vec![CellValue::text("LONE-SKU")]],
        );
        let live = Arc::new(CountingBackend {
            rows: SeedBackend::new(sheets),
            updates: AtomicUsize::new(0),
            appends: AtomicUsize::new(0),
            fail_reads: false,
            reject_writes: false,
        });
        let store = store_with(live, signed_in_session());
        let page = store
            .list_items(&PageRequest::new(1, 20, ""))
            .await
            .unwrap();
        assert_eq!(page.data[0].sku, "LONE-SKU");
        assert_eq!(page.data[0].stock, 0);
        assert_eq!(page.data[0].cost, rust_decimal::Decimal::ZERO);
    }
}
