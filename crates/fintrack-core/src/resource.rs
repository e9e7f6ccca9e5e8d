//! Backend collections and the record/form types bound to each of them

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

use crate::models::{Budget, BudgetForm, Category, CategoryForm, Transaction, TransactionForm, Validate};
use crate::types::{CategoryKind, EntityKind, QueryKind, Unscoped};

/// Comparable value extracted from a record for sorting
///
/// Text keys are lower-cased so sorting is case-insensitive. Unknown sort
/// fields yield `Missing` for every record, which keeps the input order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Missing,
    Number(Decimal),
    Integer(i64),
    Date(NaiveDate),
    Text(String),
}

impl SortKey {
    fn text(value: &str) -> Self {
        SortKey::Text(value.to_lowercase())
    }
}

/// A backend collection
pub trait Resource: Send + Sync + 'static {
    /// Record as returned by the backend
    type Item: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Create/update payload
    type Form: Clone + Debug + Serialize + Validate + Send + Sync + 'static;
    /// Discriminator accepted by list queries
    type Kind: QueryKind;

    const KIND: EntityKind;

    fn id(item: &Self::Item) -> &str;

    /// Text matched by search
    fn searchable_text(item: &Self::Item) -> String;

    fn sort_key(item: &Self::Item, field: &str) -> SortKey;

    fn matches_kind(item: &Self::Item, kind: &Self::Kind) -> bool;

    /// New record from a validated form
    fn build(id: String, form: &Self::Form, created_at: i64) -> Self::Item;

    /// Overwrite the editable fields of `item`
    fn apply(item: &mut Self::Item, form: &Self::Form);

    /// Short label used in messages and tables
    fn title(item: &Self::Item) -> String;
}

/// Income records
pub struct Incomes;

/// Expense records
pub struct Expenses;

/// Income and expense categories
pub struct Categories;

/// Monthly budgets
pub struct Budgets;

fn transaction_sort_key(tx: &Transaction, field: &str) -> SortKey {
    match field {
        "amount" => SortKey::Number(tx.amount),
        "date" => SortKey::Date(tx.date),
        "category" => SortKey::text(&tx.category),
        "description" | "name" => SortKey::text(&tx.description),
        "created_at" | "createdAt" => SortKey::Integer(tx.created_at),
        "id" => SortKey::text(&tx.id),
        _ => SortKey::Missing,
    }
}

fn transaction_build(id: String, form: &TransactionForm, created_at: i64) -> Transaction {
    Transaction {
        id,
        amount: form.amount,
        description: form.description.trim().to_string(),
        category: form.category.clone(),
        date: form.date,
        created_at,
    }
}

fn transaction_apply(tx: &mut Transaction, form: &TransactionForm) {
    tx.amount = form.amount;
    tx.description = form.description.trim().to_string();
    tx.category = form.category.clone();
    tx.date = form.date;
}

fn transaction_text(tx: &Transaction) -> String {
    format!("{} {}", tx.description, tx.category)
}

impl Resource for Incomes {
    type Item = Transaction;
    type Form = TransactionForm;
    type Kind = Unscoped;

    const KIND: EntityKind = EntityKind::Income;

    fn id(item: &Transaction) -> &str {
        &item.id
    }

    fn searchable_text(item: &Transaction) -> String {
        transaction_text(item)
    }

    fn sort_key(item: &Transaction, field: &str) -> SortKey {
        transaction_sort_key(item, field)
    }

    fn matches_kind(_item: &Transaction, kind: &Unscoped) -> bool {
        match *kind {}
    }

    fn build(id: String, form: &TransactionForm, created_at: i64) -> Transaction {
        transaction_build(id, form, created_at)
    }

    fn apply(item: &mut Transaction, form: &TransactionForm) {
        transaction_apply(item, form)
    }

    fn title(item: &Transaction) -> String {
        item.description.clone()
    }
}

impl Resource for Expenses {
    type Item = Transaction;
    type Form = TransactionForm;
    type Kind = Unscoped;

    const KIND: EntityKind = EntityKind::Expense;

    fn id(item: &Transaction) -> &str {
        &item.id
    }

    fn searchable_text(item: &Transaction) -> String {
        transaction_text(item)
    }

    fn sort_key(item: &Transaction, field: &str) -> SortKey {
        transaction_sort_key(item, field)
    }

    fn matches_kind(_item: &Transaction, kind: &Unscoped) -> bool {
        match *kind {}
    }

    fn build(id: String, form: &TransactionForm, created_at: i64) -> Transaction {
        transaction_build(id, form, created_at)
    }

    fn apply(item: &mut Transaction, form: &TransactionForm) {
        transaction_apply(item, form)
    }

    fn title(item: &Transaction) -> String {
        item.description.clone()
    }
}

impl Resource for Categories {
    type Item = Category;
    type Form = CategoryForm;
    type Kind = CategoryKind;

    const KIND: EntityKind = EntityKind::Category;

    fn id(item: &Category) -> &str {
        &item.id
    }

    fn searchable_text(item: &Category) -> String {
        format!("{} {}", item.name, item.description)
    }

    fn sort_key(item: &Category, field: &str) -> SortKey {
        match field {
            "name" => SortKey::text(&item.name),
            "description" => SortKey::text(&item.description),
            "type" | "kind" => item
                .kind
                .map(|k| SortKey::text(&k.to_string()))
                .unwrap_or(SortKey::Missing),
            "created_at" | "createdAt" => SortKey::Integer(item.created_at),
            "id" => SortKey::text(&item.id),
            _ => SortKey::Missing,
        }
    }

    fn matches_kind(item: &Category, kind: &CategoryKind) -> bool {
        item.kind == Some(*kind)
    }

    fn build(id: String, form: &CategoryForm, created_at: i64) -> Category {
        Category {
            id,
            name: form.name.trim().to_string(),
            description: form.description.clone().unwrap_or_default(),
            kind: form.kind,
            created_at,
        }
    }

    fn apply(item: &mut Category, form: &CategoryForm) {
        item.name = form.name.trim().to_string();
        if let Some(ref description) = form.description {
            item.description = description.clone();
        }
        if form.kind.is_some() {
            item.kind = form.kind;
        }
    }

    fn title(item: &Category) -> String {
        item.name.clone()
    }
}

impl Resource for Budgets {
    type Item = Budget;
    type Form = BudgetForm;
    type Kind = Unscoped;

    const KIND: EntityKind = EntityKind::Budget;

    fn id(item: &Budget) -> &str {
        &item.id
    }

    fn searchable_text(item: &Budget) -> String {
        format!("{} {}", item.category_id, item.period_label())
    }

    fn sort_key(item: &Budget, field: &str) -> SortKey {
        match field {
            "amount" => SortKey::Number(item.amount),
            "spent" => SortKey::Number(item.spent),
            "remaining" => SortKey::Number(item.remaining()),
            "category_id" | "categoryId" | "category" => SortKey::text(&item.category_id),
            "period" | "month" => {
                SortKey::Integer(i64::from(item.year) * 100 + i64::from(item.month))
            }
            "year" => SortKey::Integer(i64::from(item.year)),
            "created_at" | "createdAt" => SortKey::Integer(item.created_at),
            "id" => SortKey::text(&item.id),
            _ => SortKey::Missing,
        }
    }

    fn matches_kind(_item: &Budget, kind: &Unscoped) -> bool {
        match *kind {}
    }

    fn build(id: String, form: &BudgetForm, created_at: i64) -> Budget {
        Budget {
            id,
            category_id: form.category_id.clone(),
            amount: form.amount,
            spent: Decimal::ZERO,
            month: form.month,
            year: form.year,
            created_at,
        }
    }

    fn apply(item: &mut Budget, form: &BudgetForm) {
        item.category_id = form.category_id.clone();
        item.amount = form.amount;
        item.month = form.month;
        item.year = form.year;
    }

    fn title(item: &Budget) -> String {
        format!("{} ({})", item.category_id, item.period_label())
    }
}
