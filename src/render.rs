//! Plain-text rendering for the terminal

use fintrack_config::{CurrencyConfig, SymbolPosition};
use fintrack_core::dashboard::{CategoryBreakdown, ChartData, DashboardSummary};
use fintrack_core::{
    Budget, Budgets, Categories, Category, Expenses, Incomes, Meta, Notification, NotificationType,
    Resource, Sorting, Transaction,
};
use fintrack_utils::{format_currency, CurrencyStyle};
use rust_decimal::Decimal;

/// Currency formatter bound to the `currency` configuration section
pub struct Money<'a> {
    style: CurrencyStyle<'a>,
}

impl<'a> Money<'a> {
    pub fn new(config: &'a CurrencyConfig) -> Self {
        Self {
            style: CurrencyStyle {
                symbol: &config.symbol,
                thousands_separator: &config.thousands_separator,
                decimal_separator: &config.decimal_separator,
                decimal_places: config.decimal_places,
                symbol_before: config.symbol_position == SymbolPosition::Before,
            },
        }
    }

    pub fn format(&self, amount: &Decimal) -> String {
        format_currency(amount, &self.style)
    }
}

/// Collections that can be printed as a table
pub trait Tabular: Resource {
    const HEADERS: &'static [&'static str];

    fn row(item: &Self::Item, money: &Money<'_>) -> Vec<String>;
}

fn transaction_row(tx: &Transaction, money: &Money<'_>) -> Vec<String> {
    vec![
        tx.id.clone(),
        tx.date.format("%Y-%m-%d").to_string(),
        tx.description.clone(),
        tx.category.clone(),
        money.format(&tx.amount),
    ]
}

const TRANSACTION_HEADERS: &[&str] = &["ID", "DATE", "DESCRIPTION", "CATEGORY", "AMOUNT"];

impl Tabular for Incomes {
    const HEADERS: &'static [&'static str] = TRANSACTION_HEADERS;

    fn row(item: &Transaction, money: &Money<'_>) -> Vec<String> {
        transaction_row(item, money)
    }
}

impl Tabular for Expenses {
    const HEADERS: &'static [&'static str] = TRANSACTION_HEADERS;

    fn row(item: &Transaction, money: &Money<'_>) -> Vec<String> {
        transaction_row(item, money)
    }
}

impl Tabular for Categories {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "TYPE", "DESCRIPTION"];

    fn row(item: &Category, _money: &Money<'_>) -> Vec<String> {
        vec![
            item.id.clone(),
            item.name.clone(),
            item.kind.map(|k| k.to_string()).unwrap_or_else(|| "-".to_string()),
            item.description.clone(),
        ]
    }
}

impl Tabular for Budgets {
    const HEADERS: &'static [&'static str] =
        &["ID", "CATEGORY", "PERIOD", "BUDGET", "SPENT", "REMAINING", "USED"];

    fn row(item: &Budget, money: &Money<'_>) -> Vec<String> {
        let used = if item.is_over_budget() {
            format!("{}% (over)", item.usage_percent())
        } else {
            format!("{}%", item.usage_percent())
        };
        vec![
            item.id.clone(),
            item.category_id.clone(),
            item.period_label(),
            money.format(&item.amount),
            money.format(&item.spent),
            money.format(&item.remaining()),
            used,
        ]
    }
}

/// Left-aligned table with a header rule
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.to_vec())];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    if rows.is_empty() {
        out.push("(no records)".to_string());
    }
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

/// Table of `items` using the collection's columns
pub fn records<R: Tabular>(items: &[&R::Item], money: &Money<'_>) -> String {
    let rows: Vec<Vec<String>> = items.iter().map(|item| R::row(item, money)).collect();
    table(R::HEADERS, &rows)
}

pub fn page_footer(meta: &Meta) -> String {
    format!(
        "Page {} of {} ({} record{})",
        meta.current_page,
        meta.total_pages.max(1),
        meta.total_records,
        if meta.total_records == 1 { "" } else { "s" }
    )
}

pub fn sort_line(sorting: &Sorting, search: &str) -> String {
    if search.is_empty() {
        format!("sorted by {} {}", sorting.field, sorting.direction)
    } else {
        format!(
            "sorted by {} {}, search \"{}\"",
            sorting.field, sorting.direction, search
        )
    }
}

/// One-line form of a visible notification
pub fn notification_line(notification: &Notification) -> Option<String> {
    if !notification.is_visible {
        return None;
    }
    let message = notification.message.as_deref()?;
    let tag = match notification.kind {
        NotificationType::Success => "ok",
        NotificationType::Error => "error",
        NotificationType::Warning => "warning",
        NotificationType::Info => "info",
    };
    Some(format!("[{}] {}", tag, message))
}

pub fn dashboard(
    summary: &DashboardSummary,
    breakdown: &[CategoryBreakdown],
    budgets: &[&Budget],
    chart: &ChartData,
    money: &Money<'_>,
) -> String {
    let mut out = vec![
        format!("Dashboard for {}", summary.period.label()),
        String::new(),
        table(
            &["", "AMOUNT", "RECORDS"],
            &[
                vec![
                    "Income".to_string(),
                    money.format(&summary.total_income),
                    summary.income_count.to_string(),
                ],
                vec![
                    "Expense".to_string(),
                    money.format(&summary.total_expense),
                    summary.expense_count.to_string(),
                ],
                vec!["Balance".to_string(), money.format(&summary.balance), String::new()],
            ],
        ),
        String::new(),
        "Expenses by category".to_string(),
    ];

    let rows: Vec<Vec<String>> = breakdown
        .iter()
        .map(|entry| {
            vec![
                entry.category.clone(),
                money.format(&entry.amount),
                format!("{}%", entry.percentage),
            ]
        })
        .collect();
    out.push(table(&["CATEGORY", "AMOUNT", "SHARE"], &rows));

    out.push(String::new());
    out.push("Budgets".to_string());
    out.push(records::<Budgets>(budgets, money));

    out.push(String::new());
    out.push(format!("Monthly totals {}", summary.period.year));
    let rows: Vec<Vec<String>> = chart
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mut row = vec![label.clone()];
            for dataset in &chart.datasets {
                row.push(
                    dataset
                        .data
                        .get(i)
                        .map(|v| money.format(v))
                        .unwrap_or_default(),
                );
            }
            row
        })
        .collect();
    let mut headers = vec!["MONTH"];
    headers.extend(chart.datasets.iter().map(|d| d.label.as_str()));
    out.push(table(&headers, &rows));

    out.join("\n")
}
