//! Per-collection stores
//!
//! A [`Store`] holds the currently loaded page of one collection together
//! with its loading flag, last error and pagination. State lives in a watch
//! channel: writes are serialised and every subscriber sees each update.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::CoreResult;
use crate::models::{Meta, Mutation, Validate};
use crate::notification::Notifier;
use crate::query::{FetchData, FetchParams};
use crate::resource::Resource;
use crate::source::DataSource;

/// Snapshot of a store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub pagination: Meta,
    /// Bumped whenever `items` is replaced or shrinks
    pub revision: u64,
}

impl<T> StoreState<T> {
    fn initial(per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
            pagination: Meta::initial(per_page),
            revision: 0,
        }
    }
}

pub struct Store<R: Resource> {
    source: Arc<dyn DataSource<R>>,
    state: watch::Sender<StoreState<R::Item>>,
    notifier: Option<Notifier>,
    per_page: u32,
}

impl<R: Resource> Store<R> {
    pub fn new(source: Arc<dyn DataSource<R>>, per_page: u32) -> Self {
        let (state, _) = watch::channel(StoreState::initial(per_page));
        Self {
            source,
            state,
            notifier: None,
            per_page,
        }
    }

    /// Report mutation outcomes and fetch failures through `notifier`
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<R::Item>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreState<R::Item> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<R::Item> {
        self.state.borrow().items.clone()
    }

    pub fn pagination(&self) -> Meta {
        self.state.borrow().pagination
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn fail(&self, message: String) {
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.error = Some(message);
        });
    }

    fn finish(&self) {
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.error = None;
        });
    }

    fn notify_success(&self, message: Option<String>, fallback: &str) {
        if let Some(ref notifier) = self.notifier {
            notifier.success(message.unwrap_or_else(|| {
                format!("{} {} successfully", R::KIND.label(), fallback)
            }));
        }
    }

    fn notify_error(&self, message: &str) {
        if let Some(ref notifier) = self.notifier {
            notifier.error(message);
        }
    }

    /// Load one page; pagination is replaced only when the response carries it
    pub async fn fetch(&self, params: &FetchParams<R::Kind>) -> CoreResult<()> {
        self.begin();

        match self.source.list(params).await {
            Ok(page) => {
                log::debug!(
                    target: "fintrack::store",
                    "{}: loaded {} record(s) for page {}",
                    R::KIND,
                    page.items.len(),
                    params.page
                );
                self.state.send_modify(|s| {
                    s.items = page.items;
                    if let Some(meta) = page.pagination {
                        s.pagination = meta;
                    }
                    s.is_loading = false;
                    s.error = None;
                    s.revision += 1;
                });
                Ok(())
            }
            Err(error) => {
                self.fail(error.to_string());
                Err(error)
            }
        }
    }

    /// Create a record; the loaded page is left as is until the next fetch
    pub async fn create(&self, form: &R::Form) -> CoreResult<R::Item> {
        form.validate()?;
        self.begin();

        match self.source.create(form).await {
            Ok(Mutation { data, message }) => {
                self.finish();
                log::info!(target: "fintrack::store", "{}: created {}", R::KIND, R::id(&data));
                self.notify_success(message, "created");
                Ok(data)
            }
            Err(error) => {
                self.fail(error.to_string());
                self.notify_error(&error.to_string());
                Err(error)
            }
        }
    }

    pub async fn update(&self, id: &str, form: &R::Form) -> CoreResult<R::Item> {
        form.validate()?;
        self.begin();

        match self.source.update(id, form).await {
            Ok(Mutation { data, message }) => {
                self.finish();
                log::info!(target: "fintrack::store", "{}: updated {}", R::KIND, id);
                self.notify_success(message, "updated");
                Ok(data)
            }
            Err(error) => {
                self.fail(error.to_string());
                self.notify_error(&error.to_string());
                Err(error)
            }
        }
    }

    /// Delete a record and drop it from the loaded page
    pub async fn delete(&self, id: &str) -> CoreResult<()> {
        match self.source.delete(id).await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    s.items.retain(|item| R::id(item) != id);
                    s.pagination.record_removed();
                    s.is_loading = false;
                    s.error = None;
                    s.revision += 1;
                });
                log::info!(target: "fintrack::store", "{}: deleted {}", R::KIND, id);
                self.notify_success(None, "deleted");
                Ok(())
            }
            Err(error) => {
                self.fail(error.to_string());
                self.notify_error(&error.to_string());
                Err(error)
            }
        }
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    /// Forget the loaded page
    pub fn clear(&self) {
        let per_page = self.per_page;
        self.state.send_modify(|s| {
            s.items.clear();
            s.pagination = Meta::initial(per_page);
            s.revision += 1;
        });
    }

    /// Fetch callback for a query controller driving this store
    pub fn fetcher(self: &Arc<Self>) -> Arc<dyn FetchData<R::Kind>> {
        Arc::new(StoreFetcher {
            store: Arc::clone(self),
        })
    }
}

/// Feeds controller fetches into a [`Store`]
pub struct StoreFetcher<R: Resource> {
    store: Arc<Store<R>>,
}

#[async_trait]
impl<R: Resource> FetchData<R::Kind> for StoreFetcher<R> {
    async fn fetch(&self, params: FetchParams<R::Kind>) -> CoreResult<()> {
        let result = self.store.fetch(&params).await;
        if let Err(ref error) = result {
            self.store.notify_error(&error.to_string());
        }
        result
    }
}
