//! Dashboard figures: period totals and chart data

use chrono::{Datelike, Month, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Calendar month shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Month (1-12)
    pub month: u32,
    pub year: i32,
}

impl Period {
    /// Period for `month`/`year`; `None` when the month is out of range
    pub fn new(month: u32, year: i32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { month, year })
        } else {
            None
        }
    }

    /// Month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn current() -> Self {
        Self::of(Utc::now().date_naive())
    }

    /// Previous month, wrapping January to December of the year before
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                month: 12,
                year: self.year - 1,
            }
        } else {
            Self {
                month: self.month - 1,
                year: self.year,
            }
        }
    }

    /// Next month, wrapping December to January of the year after
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                month: 1,
                year: self.year + 1,
            }
        } else {
            Self {
                month: self.month + 1,
                year: self.year,
            }
        }
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// e.g. "March 2024"
    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

/// Income, expense and balance of one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub period: Period,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
}

fn period_total(period: &Period, records: &[Transaction]) -> (Decimal, usize) {
    records
        .iter()
        .filter(|tx| period.contains(&tx.date))
        .fold((Decimal::ZERO, 0), |(sum, count), tx| (sum + tx.amount, count + 1))
}

pub fn summarize(period: Period, incomes: &[Transaction], expenses: &[Transaction]) -> DashboardSummary {
    let (total_income, income_count) = period_total(&period, incomes);
    let (total_expense, expense_count) = period_total(&period, expenses);

    DashboardSummary {
        period,
        total_income,
        total_expense,
        balance: total_income - total_expense,
        income_count,
        expense_count,
    }
}

/// Per-month totals of `year`, January first
pub fn monthly_totals(records: &[Transaction], year: i32) -> [Decimal; 12] {
    let mut totals = [Decimal::ZERO; 12];
    for tx in records.iter().filter(|tx| tx.date.year() == year) {
        totals[tx.date.month0() as usize] += tx.amount;
    }
    totals
}

/// Chart dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<Decimal>,
}

/// Bar chart data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Income vs expense per month of `year`
pub fn yearly_chart(incomes: &[Transaction], expenses: &[Transaction], year: i32) -> ChartData {
    ChartData {
        labels: (1..=12).map(|m| month_name(m).to_string()).collect(),
        datasets: vec![
            ChartDataset {
                label: "Income".to_string(),
                data: monthly_totals(incomes, year).to_vec(),
            },
            ChartDataset {
                label: "Expense".to_string(),
                data: monthly_totals(expenses, year).to_vec(),
            },
        ],
    }
}

/// Category breakdown for charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub amount: Decimal,
    /// Share of the total, one decimal place
    pub percentage: Decimal,
    pub count: usize,
}

/// Totals per category, in the order categories first appear
pub fn category_breakdown(records: &[Transaction]) -> Vec<CategoryBreakdown> {
    let mut entries: Vec<CategoryBreakdown> = Vec::new();

    for tx in records {
        match entries.iter_mut().find(|e| e.category == tx.category) {
            Some(entry) => {
                entry.amount += tx.amount;
                entry.count += 1;
            }
            None => entries.push(CategoryBreakdown {
                category: tx.category.clone(),
                amount: tx.amount,
                percentage: Decimal::ZERO,
                count: 1,
            }),
        }
    }

    let total: Decimal = entries.iter().map(|e| e.amount).sum();
    if !total.is_zero() {
        for entry in &mut entries {
            entry.percentage = (entry.amount * Decimal::from(100) / total).round_dp(1);
        }
    }

    entries
}
