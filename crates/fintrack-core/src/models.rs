//! Core data models: records, forms and pagination envelopes

use chrono::{Month, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::CategoryKind;

/// Income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: String,
    /// Amount, always positive; the collection decides the sign
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Category name
    pub category: String,
    /// Booking date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Creation timestamp in milliseconds
    #[serde(default)]
    pub created_at: i64,
}

/// Income or expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Which side of the ledger the category belongs to
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CategoryKind>,
    #[serde(default)]
    pub created_at: i64,
}

/// Monthly spending limit for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category_id: String,
    /// Spending limit
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Amount already spent in the period
    #[serde(with = "rust_decimal::serde::float", default)]
    pub spent: Decimal,
    /// Month (1-12)
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub created_at: i64,
}

impl Budget {
    /// Amount left before the limit is reached (negative when overspent)
    pub fn remaining(&self) -> Decimal {
        self.amount - self.spent
    }

    /// Share of the limit already spent, in percent
    pub fn usage_percent(&self) -> Decimal {
        if self.amount.is_zero() {
            return Decimal::ZERO;
        }
        (self.spent * Decimal::from(100) / self.amount).round_dp(1)
    }

    /// Whether spending exceeded the limit
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.amount
    }

    /// Period label, e.g. "March 2024"
    pub fn period_label(&self) -> String {
        match u8::try_from(self.month).ok().and_then(|m| Month::try_from(m).ok()) {
            Some(month) => format!("{} {}", month.name(), self.year),
            None => format!("{:02}/{}", self.month, self.year),
        }
    }
}

// ==================== Forms ====================

/// Form values that can be checked before submission
pub trait Validate {
    fn validate(&self) -> CoreResult<()>;
}

fn require(value: &str, message: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(message));
    }
    Ok(())
}

fn require_positive(amount: &Decimal) -> CoreResult<()> {
    if *amount < Decimal::ONE {
        return Err(CoreError::validation("Amount must be greater than 0"));
    }
    Ok(())
}

/// Create/update payload for incomes and expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
}

impl Validate for TransactionForm {
    fn validate(&self) -> CoreResult<()> {
        require_positive(&self.amount)?;
        require(&self.category, "Category is required")?;
        require(&self.description, "Description is required")?;
        Ok(())
    }
}

/// Create/update payload for categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CategoryKind>,
}

impl Validate for CategoryForm {
    fn validate(&self) -> CoreResult<()> {
        require(&self.name, "Category name is required")
    }
}

/// Create/update payload for budgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetForm {
    pub category_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
}

impl Validate for BudgetForm {
    fn validate(&self) -> CoreResult<()> {
        require(&self.category_id, "Category is required")?;
        require_positive(&self.amount)?;
        if !(1..=12).contains(&self.month) {
            return Err(CoreError::validation("Month must be between 1 and 12"));
        }
        if self.year < 1970 {
            return Err(CoreError::validation("Year is out of range"));
        }
        Ok(())
    }
}

// ==================== Pagination ====================

/// Pagination metadata returned with every list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub current_page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub total_records: u64,
}

impl Meta {
    /// Empty pagination before the first fetch
    pub fn initial(per_page: u32) -> Self {
        Self {
            current_page: 1,
            per_page,
            total_pages: 0,
            total_records: 0,
        }
    }

    /// Pagination for `total_records` items split into pages of `per_page`
    pub fn for_page(current_page: u32, per_page: u32, total_records: u64) -> Self {
        Self {
            current_page,
            per_page,
            total_pages: Self::pages_for(total_records, per_page),
            total_records,
        }
    }

    fn pages_for(total_records: u64, per_page: u32) -> u32 {
        if per_page == 0 {
            return 0;
        }
        let pages = total_records.div_ceil(u64::from(per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Adjust locally after one record on this page was deleted
    pub fn record_removed(&mut self) {
        if self.total_records > 0 {
            self.total_records -= 1;
        }
        self.total_pages = Self::pages_for(self.total_records, self.per_page).max(1);
        if self.current_page > self.total_pages {
            self.current_page = self.total_pages;
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(rename = "data", alias = "items")]
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Meta>,
}

/// Result of a create/update call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(amount: i64, spent: i64) -> Budget {
        Budget {
            id: "b1".to_string(),
            category_id: "2".to_string(),
            amount: Decimal::from(amount),
            spent: Decimal::from(spent),
            month: 3,
            year: 2024,
            created_at: 0,
        }
    }

    #[test]
    fn test_budget_derived_values() {
        let b = budget(1_500_000, 1_200_000);
        assert_eq!(b.remaining(), Decimal::from(300_000));
        assert_eq!(b.usage_percent(), Decimal::from(80));
        assert!(!b.is_over_budget());
        assert_eq!(b.period_label(), "March 2024");

        let over = budget(100, 150);
        assert!(over.is_over_budget());
        assert_eq!(over.remaining(), Decimal::from(-50));
    }

    #[test]
    fn test_budget_zero_limit() {
        assert_eq!(budget(0, 10).usage_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_transaction_wire_format() {
        let json = r#"{"id":"7","amount":25000,"description":"Coffee","category":"Makan","date":"2024-03-05","createdAt":1709600000000}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount, Decimal::from(25_000));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(tx.created_at, 1_709_600_000_000);

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["amount"], serde_json::json!(25000.0));
        assert_eq!(value["createdAt"], serde_json::json!(1_709_600_000_000i64));
    }

    #[test]
    fn test_category_type_field() {
        let json = r#"{"id":"1","name":"Gaji","type":"income"}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.kind, Some(CategoryKind::Income));
        assert_eq!(category.description, "");
    }

    #[test]
    fn test_transaction_form_validation() {
        let mut form = TransactionForm {
            amount: Decimal::from(50_000),
            description: "Groceries".to_string(),
            category: "Makan".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert!(form.validate().is_ok());

        form.amount = Decimal::ZERO;
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Amount must be greater than 0"
        );

        form.amount = Decimal::from(10);
        form.category = "  ".to_string();
        assert_eq!(form.validate().unwrap_err().to_string(), "Category is required");
    }

    #[test]
    fn test_budget_form_validation() {
        let mut form = BudgetForm {
            category_id: "1".to_string(),
            amount: Decimal::from(1000),
            month: 13,
            year: 2024,
        };
        assert!(form.validate().is_err());
        form.month = 12;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_category_form_validation() {
        let form = CategoryForm {
            name: String::new(),
            description: None,
            kind: Some(CategoryKind::Expense),
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Category name is required");
    }

    #[test]
    fn test_meta_record_removed() {
        let mut meta = Meta::for_page(3, 5, 11);
        assert_eq!(meta.total_pages, 3);

        meta.record_removed();
        assert_eq!(meta.total_records, 10);
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.current_page, 2);
    }

    #[test]
    fn test_meta_record_removed_never_below_one_page() {
        let mut meta = Meta::for_page(1, 5, 1);
        meta.record_removed();
        assert_eq!(meta.total_records, 0);
        assert_eq!(meta.total_pages, 1);
        assert_eq!(meta.current_page, 1);

        meta.record_removed();
        assert_eq!(meta.total_records, 0);
    }

    #[test]
    fn test_paginated_accepts_data_or_items() {
        let a: Paginated<u32> = serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        let b: Paginated<u32> = serde_json::from_str(r#"{"items":[1,2],"pagination":{"current_page":1,"per_page":2,"total_pages":1,"total_records":2}}"#).unwrap();
        assert_eq!(a.items, b.items);
        assert!(a.pagination.is_none());
        assert_eq!(b.pagination.unwrap().total_records, 2);
    }
}
