//! Query coordination, stores and business logic for fintrack

pub mod dashboard;
pub mod error;
pub mod filter;
pub mod models;
pub mod notification;
pub mod query;
pub mod resource;
pub mod sample;
pub mod source;
pub mod store;
pub mod types;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use filter::{filter_items, normalize_search};
pub use models::{
    Budget, BudgetForm, Category, CategoryForm, Meta, Mutation, Paginated, Transaction,
    TransactionForm, Validate,
};
pub use notification::{Notification, Notifier};
pub use query::{
    fetch_fn, FetchData, FetchParams, QueryController, QueryOptions, QueryState, Sorting,
    ENTER_KEY,
};
pub use resource::{Budgets, Categories, Expenses, Incomes, Resource, SortKey};
pub use source::{DataSource, MemorySource};
pub use store::{Store, StoreFetcher, StoreState};
pub use types::{CategoryKind, EntityKind, NotificationType, QueryKind, SortDirection, Unscoped};
