//! Search, sort and pagination coordination for a single list view
//!
//! A [`QueryController`] owns the [`QueryState`] of one list (raw and
//! debounced search text, page, sort) and tells a caller-supplied
//! [`FetchData`] implementation whenever the parameters it derives change.
//!
//! Timing rules:
//! - Typed search text is normalized (trimmed, lower-cased) and applied to
//!   `debounced_search_term` only after `debounce` of quiet. Each change of the
//!   normalized text restarts the window.
//! - The automatic fetch runs when the debounced term, page, sort field or
//!   sort direction changed, at most once per `throttle`. Changes arriving
//!   inside the throttle window are dropped, not queued.
//! - Pressing Enter in the search box resets the page to 1 and fetches right
//!   away with the non-debounced term, skipping both rules above.
//!
//! Fetches are fire-and-forget: failures are logged, the controller state is
//! left untouched, and overlapping fetches are not sequenced, so whichever
//! response lands last is what the view ends up showing.

use async_trait::async_trait;
use fintrack_config::QueryConfig;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::filter::{filter_items, normalize_search};
use crate::types::{QueryKind, SortDirection};

/// Key name that submits the search box
pub const ENTER_KEY: &str = "Enter";

pub const DEFAULT_SORT_FIELD: &str = "name";
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(500);

/// Current sort column and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorting {
    pub field: String,
    pub direction: SortDirection,
}

/// View-local state of a searchable, sortable, paginated list
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    /// Raw text as typed
    pub search_term: String,
    /// Normalized text, lagging `search_term` by the debounce window
    pub debounced_search_term: String,
    /// 1-based page
    pub current_page: u32,
    pub sorting: Sorting,
    pub limit: u32,
}

impl QueryState {
    pub fn new(sort_field: impl Into<String>, direction: SortDirection, limit: u32) -> Self {
        Self {
            search_term: String::new(),
            debounced_search_term: String::new(),
            current_page: 1,
            sorting: Sorting {
                field: sort_field.into(),
                direction,
            },
            limit: limit.max(1),
        }
    }

    /// Parameters for the automatic fetch, built from the debounced term
    pub fn to_params<K: QueryKind>(&self, kind: Option<K>) -> FetchParams<K> {
        FetchParams {
            page: self.current_page,
            limit: self.limit,
            search: non_empty(self.debounced_search_term.clone()),
            sort_by: self.sorting.field.clone(),
            sort_dir: self.sorting.direction,
            kind,
        }
    }
}

fn non_empty(term: String) -> Option<String> {
    if term.is_empty() {
        None
    } else {
        Some(term)
    }
}

/// Read-only parameter bundle handed to a [`FetchData`] implementation
#[derive(Debug, Clone, PartialEq)]
pub struct FetchParams<K> {
    pub page: u32,
    pub limit: u32,
    /// Normalized search text, `None` when blank
    pub search: Option<String>,
    pub sort_by: String,
    pub sort_dir: SortDirection,
    /// Optional discriminator such as a category kind
    pub kind: Option<K>,
}

impl<K: QueryKind> FetchParams<K> {
    /// Unfiltered first page sorted by `sort_by`
    pub fn first_page(limit: u32, sort_by: impl Into<String>, sort_dir: SortDirection) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            search: None,
            sort_by: sort_by.into(),
            sort_dir,
            kind: None,
        }
    }

    /// Number of records before this page
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.limit as usize
    }

    /// Query string pairs in the backend's naming
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        pairs.push(("sort_by", self.sort_by.clone()));
        pairs.push(("sort_dir", self.sort_dir.to_string()));
        if let Some(ref kind) = self.kind {
            pairs.push(("type", kind.to_string()));
        }
        pairs
    }
}

// ==================== Fetch callback ====================

/// Data-fetch callback driven by a [`QueryController`]
///
/// Implementations resolve once whatever store they feed has been updated.
/// The controller ignores the result apart from logging failures.
#[async_trait]
pub trait FetchData<K>: Send + Sync {
    async fn fetch(&self, params: FetchParams<K>) -> CoreResult<()>;
}

/// [`FetchData`] backed by an async closure
pub struct FetchFn<F>(F);

#[async_trait]
impl<K, F, Fut> FetchData<K> for FetchFn<F>
where
    K: QueryKind,
    F: Fn(FetchParams<K>) -> Fut + Send + Sync,
    Fut: Future<Output = CoreResult<()>> + Send,
{
    async fn fetch(&self, params: FetchParams<K>) -> CoreResult<()> {
        (self.0)(params).await
    }
}

/// Wrap an async closure as a shareable fetch callback
pub fn fetch_fn<K, F, Fut>(f: F) -> Arc<dyn FetchData<K>>
where
    K: QueryKind,
    F: Fn(FetchParams<K>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CoreResult<()>> + Send + 'static,
{
    Arc::new(FetchFn(f))
}

// ==================== Options ====================

/// Construction options for a [`QueryController`]
pub struct QueryOptions<K> {
    pub initial_sort_field: String,
    pub initial_sort_direction: SortDirection,
    pub initial_limit: u32,
    /// Without a fetcher the controller only tracks state
    pub fetch_data: Option<Arc<dyn FetchData<K>>>,
    pub kind: Option<K>,
    pub debounce: Duration,
    pub throttle: Duration,
}

impl<K> Default for QueryOptions<K> {
    fn default() -> Self {
        Self {
            initial_sort_field: DEFAULT_SORT_FIELD.to_string(),
            initial_sort_direction: SortDirection::Asc,
            initial_limit: DEFAULT_LIMIT,
            fetch_data: None,
            kind: None,
            debounce: DEFAULT_DEBOUNCE,
            throttle: DEFAULT_THROTTLE,
        }
    }
}

impl<K: QueryKind> QueryOptions<K> {
    /// Defaults taken from the `query` configuration section
    pub fn from_config(config: &QueryConfig) -> Self {
        Self {
            initial_sort_field: config.default_sort_field.clone(),
            initial_sort_direction: config.default_sort_direction,
            initial_limit: config.default_limit,
            debounce: Duration::from_millis(config.debounce_ms),
            throttle: Duration::from_millis(config.throttle_ms),
            ..Self::default()
        }
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.initial_sort_field = field.into();
        self.initial_sort_direction = direction;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.initial_limit = limit;
        self
    }

    pub fn fetch_with(mut self, fetcher: Arc<dyn FetchData<K>>) -> Self {
        self.fetch_data = Some(fetcher);
        self
    }

    pub fn kind(mut self, kind: K) -> Self {
        self.kind = Some(kind);
        self
    }
}

// ==================== Controller ====================

struct Inner<K> {
    state: QueryState,
    /// Parameters the fetch effect last looked at
    observed: Option<FetchParams<K>>,
    last_fetch: Option<Instant>,
    debounce_task: Option<JoinHandle<()>>,
    debounce_generation: u64,
}

struct Shared<K: QueryKind> {
    inner: Mutex<Inner<K>>,
    fetcher: Option<Arc<dyn FetchData<K>>>,
    kind: Option<K>,
    debounce: Duration,
    throttle: Duration,
    mounted: AtomicBool,
    logger: DefaultErrorLogger,
}

impl<K: QueryKind> Shared<K> {
    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Fetch when the derived parameters changed and the throttle allows it
    fn run_effect(shared: &Arc<Self>) {
        let params = {
            let mut inner = shared.inner.lock();
            if !shared.is_mounted() {
                return;
            }

            let params = inner.state.to_params(shared.kind.clone());
            if inner.observed.as_ref() == Some(&params) {
                return;
            }
            inner.observed = Some(params.clone());

            if shared.fetcher.is_none() {
                return;
            }

            let now = Instant::now();
            if let Some(last) = inner.last_fetch {
                if now.duration_since(last) < shared.throttle {
                    log::debug!(
                        target: "fintrack::query",
                        "Fetch throttled, dropping change (page={}, search={:?})",
                        params.page,
                        params.search
                    );
                    return;
                }
            }
            inner.last_fetch = Some(now);
            params
        };

        Self::dispatch(shared, params, "fetch_data");
    }

    /// Spawn the fetch without waiting for it
    fn dispatch(shared: &Arc<Self>, params: FetchParams<K>, operation: &'static str) {
        let Some(fetcher) = shared.fetcher.clone() else {
            return;
        };

        log::debug!(
            target: "fintrack::query",
            "{}: page={} limit={} search={:?} sort={} {}",
            operation,
            params.page,
            params.limit,
            params.search,
            params.sort_by,
            params.sort_dir
        );

        let shared = Arc::clone(shared);
        tokio::spawn(async move {
            let context = ErrorContext::new(operation)
                .with_data("page", serde_json::json!(params.page))
                .with_data("search", serde_json::json!(params.search))
                .with_data("sort_by", serde_json::json!(params.sort_by));

            if let Err(error) = fetcher.fetch(params).await {
                if shared.is_mounted() {
                    shared.logger.log_error(&error, &context);
                }
            }
        });
    }
}

/// Coordinates search, sort and pagination for one list view
///
/// Create it inside a Tokio runtime: construction runs the initial fetch and
/// the debounce timer is a spawned task. Dropping the controller unmounts it.
pub struct QueryController<K: QueryKind> {
    shared: Arc<Shared<K>>,
}

impl<K: QueryKind> QueryController<K> {
    /// Mount a controller and run the initial fetch (when a fetcher is set)
    pub fn new(options: QueryOptions<K>) -> Self {
        let state = QueryState::new(
            options.initial_sort_field,
            options.initial_sort_direction,
            options.initial_limit,
        );

        log::debug!(
            target: "fintrack::query",
            "Mounting list controller: sort={} {}, limit={}, kind={:?}",
            state.sorting.field,
            state.sorting.direction,
            state.limit,
            options.kind
        );

        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                state,
                observed: None,
                last_fetch: None,
                debounce_task: None,
                debounce_generation: 0,
            }),
            fetcher: options.fetch_data,
            kind: options.kind,
            debounce: options.debounce,
            throttle: options.throttle,
            mounted: AtomicBool::new(true),
            logger: DefaultErrorLogger,
        });

        Shared::run_effect(&shared);

        Self { shared }
    }

    /// Update the raw search text and (re)start the debounce window
    pub fn set_search_term(&self, text: impl Into<String>) {
        if !self.shared.is_mounted() {
            return;
        }

        let text = text.into();
        let normalized = normalize_search(&text);

        let mut inner = self.shared.inner.lock();
        let previous = normalize_search(&inner.state.search_term);
        inner.state.search_term = text;

        // Whitespace or case edits leave the pending window alone
        if normalized == previous {
            return;
        }

        inner.debounce_generation += 1;
        let generation = inner.debounce_generation;
        if let Some(task) = inner.debounce_task.take() {
            task.abort();
        }

        let shared = Arc::clone(&self.shared);
        let delay = self.shared.debounce;
        inner.debounce_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut inner = shared.inner.lock();
                if inner.debounce_generation != generation || !shared.is_mounted() {
                    return;
                }
                inner.state.debounced_search_term = normalized;
                inner.debounce_task = None;
            }
            Shared::run_effect(&shared);
        }));
    }

    /// Sort by `field`; the current field flips direction, a new one starts ascending
    pub fn handle_sort(&self, field: &str) {
        if !self.shared.is_mounted() {
            return;
        }

        {
            let mut inner = self.shared.inner.lock();
            let sorting = &mut inner.state.sorting;
            if sorting.field == field {
                sorting.direction = sorting.direction.toggle();
            } else {
                sorting.field = field.to_string();
                sorting.direction = SortDirection::Asc;
            }
        }
        Shared::run_effect(&self.shared);
    }

    /// Jump to `page` (pages start at 1)
    pub fn handle_page_change(&self, page: u32) {
        if !self.shared.is_mounted() {
            return;
        }

        self.shared.inner.lock().state.current_page = page.max(1);
        Shared::run_effect(&self.shared);
    }

    /// Key press in the search box; Enter submits immediately
    pub fn handle_search_key_down(&self, key: &str) {
        if key != ENTER_KEY || self.shared.fetcher.is_none() || !self.shared.is_mounted() {
            return;
        }

        let params = {
            let mut inner = self.shared.inner.lock();
            inner.state.current_page = 1;
            let mut params = inner.state.to_params(self.shared.kind.clone());
            params.search = non_empty(normalize_search(&inner.state.search_term));
            params
        };

        Shared::dispatch(&self.shared, params, "search_submit");
        Shared::run_effect(&self.shared);
    }

    /// Filter an in-memory list by the current raw search text
    pub fn filter_data<'a, T, F, S>(&self, items: &'a [T], extract: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> S,
        S: AsRef<str>,
    {
        let term = self.shared.inner.lock().state.search_term.clone();
        filter_items(items, &term, extract)
    }

    /// Cancel pending timers; later timer callbacks apply nothing
    pub fn unmount(&self) {
        if self.shared.mounted.swap(false, Ordering::SeqCst) {
            if let Some(task) = self.shared.inner.lock().debounce_task.take() {
                task.abort();
            }
            log::debug!(target: "fintrack::query", "List controller unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.is_mounted()
    }

    /// Snapshot of the whole state
    pub fn state(&self) -> QueryState {
        self.shared.inner.lock().state.clone()
    }

    pub fn search_term(&self) -> String {
        self.shared.inner.lock().state.search_term.clone()
    }

    pub fn debounced_search_term(&self) -> String {
        self.shared.inner.lock().state.debounced_search_term.clone()
    }

    pub fn current_page(&self) -> u32 {
        self.shared.inner.lock().state.current_page
    }

    pub fn limit(&self) -> u32 {
        self.shared.inner.lock().state.limit
    }

    pub fn sorting(&self) -> Sorting {
        self.shared.inner.lock().state.sorting.clone()
    }

    /// Parameters the automatic fetch would use right now
    pub fn search_params(&self) -> FetchParams<K> {
        self.shared
            .inner
            .lock()
            .state
            .to_params(self.shared.kind.clone())
    }
}

impl<K: QueryKind> Drop for QueryController<K> {
    fn drop(&mut self) {
        self.unmount();
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use tokio::time::sleep;

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<FetchParams<String>>>>,
    }

    impl Recorder {
        fn fetcher(&self) -> Arc<dyn FetchData<String>> {
            let calls = Arc::clone(&self.calls);
            fetch_fn(move |params: FetchParams<String>| {
                calls.lock().push(params);
                async { Ok(()) }
            })
        }

        fn calls(&self) -> Vec<FetchParams<String>> {
            self.calls.lock().clone()
        }

        fn searches(&self, term: &str) -> usize {
            self.calls()
                .iter()
                .filter(|p| p.search.as_deref() == Some(term))
                .count()
        }
    }

    /// Let spawned timer and fetch tasks run without moving the clock
    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    fn controller(recorder: &Recorder, field: &str) -> QueryController<String> {
        QueryController::new(
            QueryOptions::default()
                .sort_by(field, SortDirection::Asc)
                .fetch_with(recorder.fetcher()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_fetch_on_mount() {
        let recorder = Recorder::default();
        let _ctl = controller(&recorder, "date");
        settle().await;

        let calls = recorder.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].page, 1);
        assert_eq!(calls[0].limit, 10);
        assert_eq!(calls[0].search, None);
        assert_eq!(calls[0].sort_by, "date");
        assert_eq!(calls[0].sort_dir, SortDirection::Asc);
    }

    #[tokio::test(start_paused = true)]
    async fn test_defaults_without_fetcher() {
        let ctl: QueryController<String> = QueryController::new(QueryOptions::default());
        let state = ctl.state();
        assert_eq!(state.sorting.field, "name");
        assert_eq!(state.sorting.direction, SortDirection::Asc);
        assert_eq!(state.limit, 10);
        assert_eq!(state.current_page, 1);

        ctl.handle_page_change(3);
        ctl.handle_search_key_down(ENTER_KEY);
        // Enter only resets the page when there is something to fetch
        assert_eq!(ctl.current_page(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_coffee_search_end_to_end() {
        let recorder = Recorder::default();
        let ctl = controller(&recorder, "date");

        ctl.set_search_term("Coffee");
        assert_eq!(ctl.search_term(), "Coffee");
        assert_eq!(ctl.debounced_search_term(), "");

        sleep(Duration::from_millis(500)).await;
        settle().await;

        assert_eq!(ctl.debounced_search_term(), "coffee");
        assert_eq!(recorder.searches("coffee"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_keeps_only_last_value() {
        let recorder = Recorder::default();
        let ctl = controller(&recorder, "date");

        ctl.set_search_term("C");
        sleep(Duration::from_millis(200)).await;
        ctl.set_search_term("Co");
        sleep(Duration::from_millis(200)).await;
        ctl.set_search_term("Coffee");

        sleep(Duration::from_millis(499)).await;
        assert_eq!(ctl.debounced_search_term(), "");

        sleep(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(ctl.debounced_search_term(), "coffee");
        assert_eq!(recorder.searches("c"), 0);
        assert_eq!(recorder.searches("co"), 0);
        assert_eq!(recorder.searches("coffee"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_normalized_text_does_not_restart_window() {
        let recorder = Recorder::default();
        let ctl = controller(&recorder, "date");

        ctl.set_search_term("coffee");
        sleep(Duration::from_millis(300)).await;
        ctl.set_search_term("Coffee  ");
        sleep(Duration::from_millis(201)).await;
        settle().await;

        assert_eq!(ctl.search_term(), "Coffee  ");
        assert_eq!(ctl.debounced_search_term(), "coffee");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sort_toggle_end_to_end() {
        let recorder = Recorder::default();
        let ctl = controller(&recorder, "date");
        assert_eq!(ctl.current_page(), 1);

        ctl.handle_sort("date");
        assert_eq!(
            ctl.sorting(),
            Sorting {
                field: "date".to_string(),
                direction: SortDirection::Desc
            }
        );

        ctl.handle_sort("amount");
        assert_eq!(
            ctl.sorting(),
            Sorting {
                field: "amount".to_string(),
                direction: SortDirection::Asc
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sort_toggles_back_to_ascending() {
        let ctl: QueryController<String> =
            QueryController::new(QueryOptions::default().sort_by("amount", SortDirection::Desc));
        ctl.handle_sort("amount");
        assert_eq!(ctl.sorting().direction, SortDirection::Asc);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_drops_second_change() {
        let recorder = Recorder::default();
        let ctl = controller(&recorder, "date");
        settle().await;

        sleep(Duration::from_millis(600)).await;
        ctl.handle_page_change(2);
        settle().await;
        assert_eq!(recorder.calls().len(), 2);

        sleep(Duration::from_millis(100)).await;
        ctl.handle_page_change(3);
        settle().await;
        assert_eq!(ctl.current_page(), 3);
        assert_eq!(recorder.calls().len(), 2);

        // Dropped, not queued
        sleep(Duration::from_millis(1000)).await;
        settle().await;
        assert_eq!(recorder.calls().len(), 2);
        assert_eq!(recorder.calls()[1].page, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_page_does_not_fetch() {
        let recorder = Recorder::default();
        let ctl = controller(&recorder, "date");
        sleep(Duration::from_millis(600)).await;

        ctl.handle_page_change(1);
        settle().await;
        assert_eq!(recorder.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_fetches_immediately_with_raw_term() {
        let recorder = Recorder::default();
        let ctl = controller(&recorder, "amount");
        settle().await;

        ctl.handle_page_change(4);
        ctl.set_search_term("  Rent ");
        ctl.handle_search_key_down(ENTER_KEY);
        settle().await;

        assert_eq!(ctl.current_page(), 1);
        assert_eq!(ctl.debounced_search_term(), "");

        let calls = recorder.calls();
        let submitted = calls.last().unwrap();
        assert_eq!(submitted.search.as_deref(), Some("rent"));
        assert_eq!(submitted.page, 1);
        assert_eq!(submitted.sort_by, "amount");
        assert_eq!(calls.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_keys_are_ignored() {
        let recorder = Recorder::default();
        let ctl = controller(&recorder, "date");
        settle().await;

        ctl.handle_page_change(2);
        ctl.handle_search_key_down("a");
        ctl.handle_search_key_down("enter");
        settle().await;

        assert_eq!(ctl.current_page(), 2);
        assert_eq!(recorder.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_kind_is_forwarded() {
        let recorder = Recorder::default();
        let _ctl = QueryController::new(
            QueryOptions::default()
                .kind("income".to_string())
                .fetch_with(recorder.fetcher()),
        );
        settle().await;
        assert_eq!(recorder.calls()[0].kind.as_deref(), Some("income"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_cancels_pending_debounce() {
        let recorder = Recorder::default();
        let ctl = controller(&recorder, "date");
        settle().await;

        ctl.set_search_term("abc");
        ctl.unmount();
        assert!(!ctl.is_mounted());

        sleep(Duration::from_millis(1000)).await;
        settle().await;

        assert_eq!(ctl.debounced_search_term(), "");
        assert_eq!(recorder.calls().len(), 1);

        ctl.handle_sort("amount");
        assert_eq!(ctl.sorting().field, "date");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_leaves_state_alone() {
        let attempts = Arc::new(Mutex::new(0u32));
        let counter = Arc::clone(&attempts);
        let fetcher = fetch_fn(move |_params: FetchParams<String>| {
            *counter.lock() += 1;
            async { Err(CoreError::request("Request failed")) }
        });

        let ctl = QueryController::new(QueryOptions::default().fetch_with(fetcher));
        settle().await;

        sleep(Duration::from_millis(600)).await;
        ctl.handle_sort("amount");
        settle().await;

        assert_eq!(*attempts.lock(), 2);
        assert_eq!(ctl.sorting().field, "amount");
        assert_eq!(ctl.current_page(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_data_uses_raw_term() {
        let ctl: QueryController<String> = QueryController::new(QueryOptions::default());
        let rows = vec!["abc".to_string(), "xyz".to_string()];

        assert_eq!(ctl.filter_data(&rows, |r| r.clone()).len(), 2);

        ctl.set_search_term("B");
        assert_eq!(ctl.filter_data(&rows, |r| r.clone()), vec![&rows[0]]);

        let empty: Vec<String> = vec![];
        assert!(ctl.filter_data(&empty, |r| r.clone()).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_change_clamps_to_first_page() {
        let ctl: QueryController<String> = QueryController::new(QueryOptions::default());
        ctl.handle_page_change(0);
        assert_eq!(ctl.current_page(), 1);
    }

    #[test]
    fn test_options_from_config() {
        let config = QueryConfig {
            debounce_ms: 250,
            throttle_ms: 750,
            default_limit: 25,
            default_sort_field: "date".to_string(),
            default_sort_direction: SortDirection::Desc,
        };
        let options: QueryOptions<String> = QueryOptions::from_config(&config);
        assert_eq!(options.debounce, Duration::from_millis(250));
        assert_eq!(options.throttle, Duration::from_millis(750));
        assert_eq!(options.initial_limit, 25);
        assert_eq!(options.initial_sort_field, "date");
        assert!(options.fetch_data.is_none());
    }

    #[test]
    fn test_query_pairs() {
        let mut params: FetchParams<String> =
            FetchParams::first_page(5, "amount", SortDirection::Desc);
        params.page = 3;
        params.search = Some("coffee".to_string());
        params.kind = Some("expense".to_string());

        assert_eq!(params.offset(), 10);
        assert_eq!(
            params.query_pairs(),
            vec![
                ("page", "3".to_string()),
                ("limit", "5".to_string()),
                ("search", "coffee".to_string()),
                ("sort_by", "amount".to_string()),
                ("sort_dir", "desc".to_string()),
                ("type", "expense".to_string()),
            ]
        );
    }
}
