//! Data sources: where list pages and mutations come from
//!
//! [`DataSource`] is the seam between stores and the backend. The REST
//! implementation lives in `fintrack-client`; [`MemorySource`] keeps records in
//! process and answers list queries the way the backend does (search, kind
//! filter, sort, pagination), which the CLI uses for offline mode.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::marker::PhantomData;

use crate::error::{CoreError, CoreResult};
use crate::filter::filter_items;
use crate::models::{Meta, Mutation, Paginated, Validate};
use crate::query::FetchParams;
use crate::resource::Resource;
use crate::types::SortDirection;

/// Paginated access to one backend collection
///
/// Each call is a single attempt: no retry, no caching.
#[async_trait]
pub trait DataSource<R: Resource>: Send + Sync {
    async fn list(&self, params: &FetchParams<R::Kind>) -> CoreResult<Paginated<R::Item>>;

    async fn create(&self, form: &R::Form) -> CoreResult<Mutation<R::Item>>;

    async fn update(&self, id: &str, form: &R::Form) -> CoreResult<Mutation<R::Item>>;

    async fn delete(&self, id: &str) -> CoreResult<()>;
}

/// In-process data source
pub struct MemorySource<R: Resource> {
    records: RwLock<Vec<R::Item>>,
    _resource: PhantomData<R>,
}

impl<R: Resource> Default for MemorySource<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R: Resource> MemorySource<R> {
    pub fn new(records: Vec<R::Item>) -> Self {
        Self {
            records: RwLock::new(records),
            _resource: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Every stored record in insertion order
    pub fn snapshot(&self) -> Vec<R::Item> {
        self.records.read().clone()
    }

    fn not_found(id: &str) -> CoreError {
        CoreError::NotFound {
            resource: R::KIND.label().to_lowercase(),
            id: id.to_string(),
        }
    }

    fn query(&self, params: &FetchParams<R::Kind>) -> Paginated<R::Item> {
        let records = self.records.read();
        let search = params.search.as_deref().unwrap_or_default();

        let mut matched: Vec<R::Item> = filter_items(records.as_slice(), search, R::searchable_text)
            .into_iter()
            .filter(|item| match params.kind {
                Some(ref kind) => R::matches_kind(item, kind),
                None => true,
            })
            .cloned()
            .collect();
        drop(records);

        let field = params.sort_by.as_str();
        match params.sort_dir {
            SortDirection::Asc => matched.sort_by_cached_key(|item| R::sort_key(item, field)),
            SortDirection::Desc => {
                matched.sort_by_cached_key(|item| Reverse(R::sort_key(item, field)))
            }
        }

        let page = params.page.max(1);
        let per_page = params.limit.max(1);
        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(params.offset())
            .take(per_page as usize)
            .collect();

        Paginated {
            items,
            pagination: Some(Meta::for_page(page, per_page, total)),
        }
    }
}

#[async_trait]
impl<R: Resource> DataSource<R> for MemorySource<R> {
    async fn list(&self, params: &FetchParams<R::Kind>) -> CoreResult<Paginated<R::Item>> {
        let page = self.query(params);
        log::debug!(
            target: "fintrack::source",
            "memory {}: page {} -> {} record(s)",
            R::KIND,
            params.page,
            page.items.len()
        );
        Ok(page)
    }

    async fn create(&self, form: &R::Form) -> CoreResult<Mutation<R::Item>> {
        form.validate()?;

        let item = R::build(
            fintrack_utils::generate_id(),
            form,
            chrono::Utc::now().timestamp_millis(),
        );
        self.records.write().push(item.clone());

        Ok(Mutation {
            data: item,
            message: Some(format!("{} created", R::KIND.label())),
        })
    }

    async fn update(&self, id: &str, form: &R::Form) -> CoreResult<Mutation<R::Item>> {
        form.validate()?;

        let mut records = self.records.write();
        let item = records
            .iter_mut()
            .find(|item| R::id(item) == id)
            .ok_or_else(|| Self::not_found(id))?;
        R::apply(item, form);

        Ok(Mutation {
            data: item.clone(),
            message: Some(format!("{} updated", R::KIND.label())),
        })
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|item| R::id(item) != id);
        if records.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryForm, Transaction, TransactionForm};
    use crate::resource::{Categories, Expenses};
    use crate::types::CategoryKind;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn expense(id: &str, amount: i64, description: &str, day: u32) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount: Decimal::from(amount),
            description: description.to_string(),
            category: "makan".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            created_at: 0,
        }
    }

    fn source() -> MemorySource<Expenses> {
        MemorySource::new(vec![
            expense("1", 319_000, "Internet Bulanan", 20),
            expense("2", 1_000_000, "Makan per bulan", 21),
            expense("3", 500_000, "Bensin", 5),
            expense("4", 25_000, "Coffee", 6),
            expense("5", 30_000, "Coffee beans", 7),
        ])
    }

    fn params(page: u32, limit: u32, sort_by: &str, dir: SortDirection) -> FetchParams<crate::types::Unscoped> {
        let mut params = FetchParams::first_page(limit, sort_by, dir);
        params.page = page;
        params
    }

    #[tokio::test]
    async fn test_list_sorts_and_paginates() {
        let source = source();
        let page = source
            .list(&params(2, 2, "amount", SortDirection::Desc))
            .await
            .unwrap();

        let ids: Vec<&str> = page.items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "5"]);
        assert_eq!(page.pagination, Some(Meta::for_page(2, 2, 5)));
        assert_eq!(page.pagination.unwrap().total_pages, 3);
    }

    #[tokio::test]
    async fn test_list_searches() {
        let source = source();
        let mut query = params(1, 10, "date", SortDirection::Asc);
        query.search = Some("coffee".to_string());

        let page = source.list(&query).await.unwrap();
        let ids: Vec<&str> = page.items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "5"]);
        assert_eq!(page.pagination.unwrap().total_records, 2);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let page = source()
            .list(&params(9, 2, "amount", SortDirection::Asc))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.unwrap().current_page, 9);
    }

    #[tokio::test]
    async fn test_unknown_sort_field_keeps_insertion_order() {
        let page = source()
            .list(&params(1, 10, "colour", SortDirection::Desc))
            .await
            .unwrap();
        let ids: Vec<&str> = page.items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let source = source();
        let form = TransactionForm {
            amount: Decimal::from(75_000),
            description: "Pulsa".to_string(),
            category: "lainnya".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        };

        let created = source.create(&form).await.unwrap();
        assert_eq!(created.message.as_deref(), Some("Expense created"));
        assert_eq!(source.len(), 6);

        let mut changed = form.clone();
        changed.amount = Decimal::from(80_000);
        let updated = source.update(&created.data.id, &changed).await.unwrap();
        assert_eq!(updated.data.amount, Decimal::from(80_000));
        assert_eq!(updated.data.id, created.data.id);

        source.delete(&created.data.id).await.unwrap();
        assert_eq!(source.len(), 5);

        let missing = source.delete(&created.data.id).await.unwrap_err();
        assert_eq!(missing.code(), crate::error::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_form() {
        let source = source();
        let form = TransactionForm {
            amount: Decimal::ZERO,
            description: "Nothing".to_string(),
            category: "lainnya".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        };
        let error = source.create(&form).await.unwrap_err();
        assert_eq!(error.to_string(), "Amount must be greater than 0");
        assert_eq!(source.len(), 5);
    }

    #[tokio::test]
    async fn test_kind_filter() {
        let categories: MemorySource<Categories> = MemorySource::default();
        for (name, kind) in [
            ("Gaji", CategoryKind::Income),
            ("Makan", CategoryKind::Expense),
            ("Bonus", CategoryKind::Income),
        ] {
            categories
                .create(&CategoryForm {
                    name: name.to_string(),
                    description: None,
                    kind: Some(kind),
                })
                .await
                .unwrap();
        }

        let mut query: FetchParams<CategoryKind> =
            FetchParams::first_page(10, "name", SortDirection::Asc);
        query.kind = Some(CategoryKind::Income);

        let page = categories.list(&query).await.unwrap();
        let names: Vec<&str> = page.items.iter().map(|c: &Category| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bonus", "Gaji"]);
    }
}
