//! Seed records for offline mode

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Budget, Category, Transaction};
use crate::resource::{Budgets, Categories, Expenses, Incomes};
use crate::source::MemorySource;
use crate::types::CategoryKind;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn transaction(id: &str, amount: i64, description: &str, category: &str, on: NaiveDate, days_ago: i64, now: i64) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount: Decimal::from(amount),
        description: description.to_string(),
        category: category.to_string(),
        date: on,
        created_at: now - days_ago * DAY_MS,
    }
}

fn category(id: &str, name: &str, description: &str, kind: CategoryKind, now: i64) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        kind: Some(kind),
        created_at: now,
    }
}

pub fn incomes(now: i64) -> Vec<Transaction> {
    vec![
        transaction("1", 5_000_000, "Gaji Bulanan", "salary", date(2024, 2, 20), 10, now),
        transaction("2", 1_000_000, "Bonus Project", "bonus", date(2024, 2, 21), 5, now),
        transaction("3", 500_000, "Dividen Saham", "investment", date(2024, 3, 1), 2, now),
    ]
}

pub fn expenses(now: i64) -> Vec<Transaction> {
    vec![
        transaction("1", 319_000, "Internet Bulanan", "internet", date(2024, 2, 20), 8, now),
        transaction("2", 1_000_000, "Makan per bulan", "makan", date(2024, 2, 21), 4, now),
        transaction("3", 500_000, "Bensin dan Transportasi", "transportasi", date(2024, 3, 5), 1, now),
    ]
}

pub fn categories(now: i64) -> Vec<Category> {
    vec![
        category("1", "Gaji", "Pendapatan dari pekerjaan tetap", CategoryKind::Income, now),
        category("2", "Bonus", "Pendapatan tambahan dari bonus", CategoryKind::Income, now),
        category("3", "Investasi", "Pendapatan dari investasi", CategoryKind::Income, now),
        category("4", "Lainnya", "Pendapatan dari sumber lain", CategoryKind::Income, now),
        category("5", "Internet", "Biaya internet bulanan", CategoryKind::Expense, now),
        category("6", "Makan", "Biaya makan per bulan", CategoryKind::Expense, now),
        category("7", "Transportasi", "Biaya transportasi", CategoryKind::Expense, now),
        category("8", "Lainnya", "Pengeluaran lain-lain", CategoryKind::Expense, now),
    ]
}

pub fn budgets(now: i64) -> Vec<Budget> {
    vec![
        Budget {
            id: "1".to_string(),
            category_id: "makan".to_string(),
            amount: Decimal::from(1_500_000),
            spent: Decimal::from(1_200_000),
            month: 3,
            year: 2024,
            created_at: now,
        },
        Budget {
            id: "2".to_string(),
            category_id: "transportasi".to_string(),
            amount: Decimal::from(400_000),
            spent: Decimal::from(500_000),
            month: 3,
            year: 2024,
            created_at: now,
        },
    ]
}

/// In-memory sources for every collection, seeded with the sample records
pub struct SampleData {
    pub incomes: MemorySource<Incomes>,
    pub expenses: MemorySource<Expenses>,
    pub categories: MemorySource<Categories>,
    pub budgets: MemorySource<Budgets>,
}

impl SampleData {
    pub fn seeded() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            incomes: MemorySource::new(incomes(now)),
            expenses: MemorySource::new(expenses(now)),
            categories: MemorySource::new(categories(now)),
            budgets: MemorySource::new(budgets(now)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_counts() {
        let data = SampleData::seeded();
        assert_eq!(data.incomes.len(), 3);
        assert_eq!(data.expenses.len(), 3);
        assert_eq!(data.categories.len(), 8);
        assert_eq!(data.budgets.len(), 2);
    }

    #[test]
    fn test_created_at_is_relative_to_now() {
        let records = incomes(100 * DAY_MS);
        assert_eq!(records[0].created_at, 90 * DAY_MS);
        assert!(budgets(0)[1].is_over_budget());
    }
}
