//! Basic types shared across the core modules

use serde::{Deserialize, Serialize};
use std::fmt;

pub use fintrack_config::SortDirection;

/// Category kind, used to scope category queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Categories for incoming money (salary, bonus)
    Income,
    /// Categories for outgoing money (food, transport)
    Expense,
}

impl std::str::FromStr for CategoryKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            _ => Err(format!("Invalid category kind: {}", s)),
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKind::Income => write!(f, "income"),
            CategoryKind::Expense => write!(f, "expense"),
        }
    }
}

/// Collections exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Income,
    Expense,
    Category,
    Budget,
}

impl EntityKind {
    /// Collection segment of the REST path
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Income => "incomes",
            EntityKind::Expense => "expenses",
            EntityKind::Category => "categories",
            EntityKind::Budget => "budgets",
        }
    }

    /// Human-readable singular label
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Income => "Income",
            EntityKind::Expense => "Expense",
            EntityKind::Category => "Category",
            EntityKind::Budget => "Budget",
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "incomes" => Ok(EntityKind::Income),
            "expense" | "expenses" => Ok(EntityKind::Expense),
            "category" | "categories" => Ok(EntityKind::Category),
            "budget" | "budgets" => Ok(EntityKind::Budget),
            _ => Err(format!("Invalid entity kind: {}", s)),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Notification flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationType::Success => write!(f, "success"),
            NotificationType::Error => write!(f, "error"),
            NotificationType::Info => write!(f, "info"),
            NotificationType::Warning => write!(f, "warning"),
        }
    }
}

/// Discriminator values that can scope a list query
///
/// Implemented for every type that can be cloned, compared, printed and sent
/// across tasks; the `Display` form is what goes on the wire.
pub trait QueryKind: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> QueryKind for T where T: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static {}

/// Discriminator for collections that are never scoped
///
/// Has no values, so `Option<Unscoped>` is always `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unscoped {}

impl fmt::Display for Unscoped {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
