//! Generic client-side paging: the page/search request envelope and a
//! reusable controller that binds a fetch function to page, search and
//! loading state.
//!
//! The controller debounces search-triggered refetches through a single-slot
//! cancellable timer and suppresses stale in-flight responses with monotonic
//! request ids, so rapid page flips can never regress the visible state to an
//! older page.

use crate::errors::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Debounce window for search-triggered refetches, measured from the last
/// keystroke.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// One immutable fetch request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub search: String,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32, search: impl Into<String>) -> Self {
        Self {
            page,
            page_size,
            search: search.into(),
        }
    }

    pub fn is_search(&self) -> bool {
        !self.search.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.page < 1 || self.page_size < 1 {
            return Err(ServiceError::InvalidInput(format!(
                "page and page_size must be >= 1 (got page={}, page_size={})",
                self.page, self.page_size
            )));
        }
        Ok(())
    }
}

/// One page of results plus the backing-store total. In search mode `total`
/// is the exact unsliced match count; otherwise it is the store's best known
/// row count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T> PageResult<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
        }
    }
}

/// Slice `all` down to the requested page. Pages past the end come back
/// empty.
pub fn page_slice<T: Clone>(all: &[T], page: u32, page_size: u32) -> Vec<T> {
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
    let end = start.saturating_add(page_size as usize).min(all.len());
    if start >= all.len() {
        return Vec::new();
    }
    all[start..end].to_vec()
}

/// The fetch side of the controller: anything that can resolve a
/// `PageRequest` into a `PageResult`.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync + 'static {
    async fn fetch(&self, req: PageRequest) -> Result<PageResult<T>, ServiceError>;
}

/// Observable controller state.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerSnapshot<T> {
    pub page: u32,
    pub search: String,
    pub data: Vec<T>,
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
}

struct ControllerState<T> {
    page: u32,
    search: String,
    data: Vec<T>,
    total: u64,
    loading: bool,
    error: Option<String>,
}

/// Single-slot cancellable timer. Scheduling replaces (and aborts) any
/// pending callback, so at most one debounced fetch can be in flight per
/// controller.
struct DebounceSlot {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl DebounceSlot {
    fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    fn schedule(&self, delay: Duration, task: impl std::future::Future<Output = ()> + Send + 'static) {
        let mut slot = self.handle.lock().expect("debounce slot poisoned");
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }
}

struct ControllerInner<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    page_size: u32,
    debounce: Duration,
    state: Mutex<ControllerState<T>>,
    seq: AtomicU64,
    timer: DebounceSlot,
    applied_tx: watch::Sender<u64>,
}

/// Generic, entity-agnostic paging controller. Cheap to clone; clones share
/// state.
pub struct PaginatedQueryController<T> {
    inner: Arc<ControllerInner<T>>,
}

impl<T> Clone for PaginatedQueryController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> PaginatedQueryController<T> {
    pub fn new(fetcher: Arc<dyn PageFetcher<T>>, page_size: u32, debounce: Duration) -> Self {
        let (applied_tx, _) = watch::channel(0u64);
        Self {
            inner: Arc::new(ControllerInner {
                fetcher,
                page_size,
                debounce,
                state: Mutex::new(ControllerState {
                    page: 1,
                    search: String::new(),
                    data: Vec::new(),
                    total: 0,
                    loading: false,
                    error: None,
                }),
                seq: AtomicU64::new(0),
                timer: DebounceSlot::new(),
                applied_tx,
            }),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    pub fn snapshot(&self) -> ControllerSnapshot<T> {
        let state = self.inner.state.lock().expect("controller state poisoned");
        ControllerSnapshot {
            page: state.page,
            search: state.search.clone(),
            data: state.data.clone(),
            total: state.total,
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Receiver that ticks every time a fetch result is applied to state.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.applied_tx.subscribe()
    }

    /// Jump to a page and refetch immediately.
    pub fn set_page(&self, page: u32) {
        let search = {
            let mut state = self.inner.state.lock().expect("controller state poisoned");
            state.page = page;
            state.search.clone()
        };
        Self::issue(self.inner.clone(), page, search);
    }

    /// Update the visible search text immediately; the refetch fires after
    /// the debounce window, at page 1. Only the last call within the window
    /// reaches the fetcher.
    pub fn set_search(&self, term: impl Into<String>) {
        let term = term.into();
        {
            let mut state = self.inner.state.lock().expect("controller state poisoned");
            state.search = term.clone();
        }
        let inner = self.inner.clone();
        self.inner.timer.schedule(self.inner.debounce, async move {
            {
                let mut state = inner.state.lock().expect("controller state poisoned");
                state.page = 1;
            }
            Self::issue(inner.clone(), 1, term);
        });
    }

    /// Refetch the current page and search term, e.g. after an external
    /// mutation. Does not reset the page.
    pub fn refresh(&self) {
        let (page, search) = {
            let state = self.inner.state.lock().expect("controller state poisoned");
            (state.page, state.search.clone())
        };
        Self::issue(self.inner.clone(), page, search);
    }

    /// Issues one fetch tagged with the next request id. Ids are allocated
    /// here, synchronously, so issuance order equals call order.
    fn issue(inner: Arc<ControllerInner<T>>, page: u32, search: String) {
        let id = inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = inner.state.lock().expect("controller state poisoned");
            state.loading = true;
            state.error = None;
        }
        tokio::spawn(async move {
            let req = PageRequest::new(page, inner.page_size, search);
            let result = inner.fetcher.fetch(req).await;

            let mut state = inner.state.lock().expect("controller state poisoned");
            if id != inner.seq.load(Ordering::SeqCst) {
                // A newer request was issued while this one was in flight;
                // its resolution owns the state.
                debug!(id, "dropping stale page response");
                return;
            }
            match result {
                Ok(page_result) => {
                    state.data = page_result.data;
                    state.total = page_result.total;
                    state.loading = false;
                    state.error = None;
                }
                Err(err) => {
                    state.data = Vec::new();
                    state.total = 0;
                    state.loading = false;
                    state.error = Some(err.to_string());
                }
            }
            drop(state);
            inner.applied_tx.send_modify(|tick| *tick += 1);
        });
    }
}
