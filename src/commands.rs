//! CLI subcommands

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use fintrack_client::{ApiClient, RestSource};
use fintrack_config::{Config, SourceMode};
use fintrack_core::dashboard::{self, Period};
use fintrack_core::sample::SampleData;
use fintrack_core::{
    normalize_search, BudgetForm, Budgets, Categories, CategoryForm, CategoryKind,
    CoreResult, DataSource, EntityKind, Expenses, FetchParams, Incomes, Notifier, QueryController,
    QueryKind, QueryOptions, Resource, SortDirection, Store, TransactionForm, ENTER_KEY,
};
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::{self, Money, Tabular};

/// Page size used when the dashboard pulls whole collections
const DASHBOARD_PAGE_SIZE: u32 = 100;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of a collection
    List(ListArgs),
    /// Search, sort and page through a collection interactively
    Browse {
        /// incomes, expenses, categories or budgets
        resource: EntityKind,
        /// Only categories of this kind (income or expense)
        #[arg(long)]
        kind: Option<CategoryKind>,
    },
    /// Create a record
    #[command(subcommand)]
    Add(AddCommand),
    /// Delete a record
    Delete { resource: EntityKind, id: String },
    /// Totals, category breakdown and monthly chart data for one month
    Dashboard {
        /// Month (1-12), defaults to the current month
        #[arg(long)]
        month: Option<u32>,
        /// Year, defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Print the default configuration
    Config,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// incomes, expenses, categories or budgets
    pub resource: EntityKind,
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(long)]
    pub sort_by: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    #[arg(short, long)]
    pub page: Option<u32>,
    #[arg(short, long)]
    pub limit: Option<u32>,
    /// Only categories of this kind (income or expense)
    #[arg(long)]
    pub kind: Option<CategoryKind>,
}

#[derive(Subcommand, Debug)]
pub enum AddCommand {
    Income(TransactionArgs),
    Expense(TransactionArgs),
    Category(CategoryArgs),
    Budget(BudgetArgs),
}

#[derive(clap::Args, Debug)]
pub struct TransactionArgs {
    /// Amount, e.g. 25000 or "Rp 25.000"
    #[arg(long, value_parser = parse_amount)]
    pub amount: Decimal,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub category: String,
    /// Booking date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(clap::Args, Debug)]
pub struct CategoryArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub kind: Option<CategoryKind>,
}

#[derive(clap::Args, Debug)]
pub struct BudgetArgs {
    #[arg(long)]
    pub category: String,
    #[arg(long, value_parser = parse_amount)]
    pub amount: Decimal,
    #[arg(long)]
    pub month: Option<u32>,
    #[arg(long)]
    pub year: Option<i32>,
}

fn parse_amount(input: &str) -> Result<Decimal, String> {
    fintrack_utils::parse_amount_input(input).ok_or_else(|| format!("not an amount: {}", input))
}

/// One data source per collection
pub struct Sources {
    pub incomes: Arc<dyn DataSource<Incomes>>,
    pub expenses: Arc<dyn DataSource<Expenses>>,
    pub categories: Arc<dyn DataSource<Categories>>,
    pub budgets: Arc<dyn DataSource<Budgets>>,
}

impl Sources {
    pub fn from_config(config: &Config, offline: bool) -> anyhow::Result<Self> {
        if offline || config.data.source == SourceMode::Memory {
            log::info!("Using in-memory sample data");
            let sample = SampleData::seeded();
            return Ok(Self {
                incomes: Arc::new(sample.incomes),
                expenses: Arc::new(sample.expenses),
                categories: Arc::new(sample.categories),
                budgets: Arc::new(sample.budgets),
            });
        }

        let client = Arc::new(ApiClient::new(&config.api)?);
        log::info!("Using backend at {}", client.base_url());
        Ok(Self {
            incomes: Arc::new(RestSource::<Incomes>::new(Arc::clone(&client))),
            expenses: Arc::new(RestSource::<Expenses>::new(Arc::clone(&client))),
            categories: Arc::new(RestSource::<Categories>::new(Arc::clone(&client))),
            budgets: Arc::new(RestSource::<Budgets>::new(client)),
        })
    }
}

pub struct App {
    pub config: Config,
    pub sources: Sources,
    pub notifier: Notifier,
}

pub async fn run(command: Command, config: Config, offline: bool) -> anyhow::Result<()> {
    if let Command::Config = command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let sources = Sources::from_config(&config, offline)?;
    let notifier = Notifier::from_config(&config.notification);
    let app = App {
        config,
        sources,
        notifier,
    };

    match command {
        Command::List(args) => list_command(&app, args).await,
        Command::Browse { resource, kind } => browse_command(&app, resource, kind).await,
        Command::Add(add) => add_command(&app, add).await,
        Command::Delete { resource, id } => delete_command(&app, resource, &id).await,
        Command::Dashboard { month, year } => dashboard_command(&app, month, year).await,
        Command::Config => Ok(()),
    }
}

fn ignore_kind(resource: EntityKind, kind: Option<CategoryKind>) {
    if kind.is_some() {
        log::warn!("--kind only applies to categories, ignored for {}", resource);
    }
}

fn print_notification(notifier: &Notifier) {
    if let Some(line) = render::notification_line(&notifier.current()) {
        eprintln!("{}", line);
    }
}

// ==================== list ====================

fn list_params<K: QueryKind>(app: &App, args: &ListArgs, kind: Option<K>) -> FetchParams<K> {
    let query = &app.config.query;
    let search = args.search.as_deref().map(normalize_search).unwrap_or_default();
    FetchParams {
        page: args.page.unwrap_or(1).max(1),
        limit: args.limit.unwrap_or(query.default_limit).max(1),
        search: if search.is_empty() { None } else { Some(search) },
        sort_by: args
            .sort_by
            .clone()
            .unwrap_or_else(|| query.default_sort_field.clone()),
        sort_dir: if args.desc {
            SortDirection::Desc
        } else {
            query.default_sort_direction
        },
        kind,
    }
}

async fn list_command(app: &App, args: ListArgs) -> anyhow::Result<()> {
    match args.resource {
        EntityKind::Income => {
            ignore_kind(args.resource, args.kind);
            list_page::<Incomes>(app, app.sources.incomes.clone(), list_params(app, &args, None)).await
        }
        EntityKind::Expense => {
            ignore_kind(args.resource, args.kind);
            list_page::<Expenses>(app, app.sources.expenses.clone(), list_params(app, &args, None)).await
        }
        EntityKind::Category => {
            let params = list_params(app, &args, args.kind);
            list_page::<Categories>(app, app.sources.categories.clone(), params).await
        }
        EntityKind::Budget => {
            ignore_kind(args.resource, args.kind);
            list_page::<Budgets>(app, app.sources.budgets.clone(), list_params(app, &args, None)).await
        }
    }
}

async fn list_page<R: Tabular>(
    app: &App,
    source: Arc<dyn DataSource<R>>,
    params: FetchParams<R::Kind>,
) -> anyhow::Result<()> {
    let store = Store::new(source, params.limit);
    store
        .fetch(&params)
        .await
        .with_context(|| format!("Failed to fetch {}", R::KIND))?;

    let state = store.snapshot();
    let money = Money::new(&app.config.currency);
    let items: Vec<&R::Item> = state.items.iter().collect();
    println!("{}", render::records::<R>(&items, &money));
    println!("{}", render::page_footer(&state.pagination));
    Ok(())
}

// ==================== browse ====================

/// One line typed in browse mode
#[derive(Debug, Clone, PartialEq)]
enum BrowseInput {
    /// Plain text: typed into the search box, then Enter
    Search(String),
    /// Typed into the search box without Enter
    Filter(String),
    Sort(String),
    Page(u32),
    Next,
    Previous,
    Help,
    Quit,
    Invalid(String),
}

impl BrowseInput {
    fn parse(line: &str) -> Self {
        let Some(command) = line.trim_start().strip_prefix(':') else {
            return BrowseInput::Search(line.to_string());
        };

        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command.trim(), ""),
        };

        match name {
            "q" | "quit" => BrowseInput::Quit,
            "h" | "help" => BrowseInput::Help,
            "n" | "next" => BrowseInput::Next,
            "p" | "prev" => BrowseInput::Previous,
            "f" | "filter" => BrowseInput::Filter(rest.to_string()),
            "s" | "sort" if !rest.is_empty() => BrowseInput::Sort(rest.to_string()),
            "page" => match rest.parse() {
                Ok(page) => BrowseInput::Page(page),
                Err(_) => BrowseInput::Invalid(format!("not a page number: {}", rest)),
            },
            _ => BrowseInput::Invalid(format!("unknown command: :{}", command.trim())),
        }
    }
}

const BROWSE_HELP: &str = "\
Type text and press Enter to search.
  :filter TEXT  filter the loaded page (search follows after a pause)
  :sort FIELD   sort by FIELD, again to flip direction
  :page N       jump to page N
  :next :prev   move one page
  :quit         leave";

async fn browse_command(app: &App, resource: EntityKind, kind: Option<CategoryKind>) -> anyhow::Result<()> {
    match resource {
        EntityKind::Income => {
            ignore_kind(resource, kind);
            browse::<Incomes>(app, app.sources.incomes.clone(), None).await
        }
        EntityKind::Expense => {
            ignore_kind(resource, kind);
            browse::<Expenses>(app, app.sources.expenses.clone(), None).await
        }
        EntityKind::Category => browse::<Categories>(app, app.sources.categories.clone(), kind).await,
        EntityKind::Budget => {
            ignore_kind(resource, kind);
            browse::<Budgets>(app, app.sources.budgets.clone(), None).await
        }
    }
}

async fn browse<R: Tabular>(
    app: &App,
    source: Arc<dyn DataSource<R>>,
    kind: Option<R::Kind>,
) -> anyhow::Result<()> {
    let money = Money::new(&app.config.currency);
    let store = Arc::new(
        Store::new(source, app.config.query.default_limit).with_notifier(app.notifier.clone()),
    );

    let mut options = QueryOptions::from_config(&app.config.query).fetch_with(store.fetcher());
    options.kind = kind;
    let controller = QueryController::new(options);

    let mut updates = store.subscribe();
    let mut notifications = app.notifier.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("{}", BROWSE_HELP);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if state.is_loading || state.error.is_some() {
                    continue;
                }
                let items: Vec<&R::Item> = state.items.iter().collect();
                println!("{}", render::records::<R>(&items, &money));
                println!(
                    "{} | {}",
                    render::page_footer(&state.pagination),
                    render::sort_line(&controller.sorting(), &controller.search_term())
                );
            }
            changed = notifications.changed() => {
                if changed.is_err() {
                    break;
                }
                let notification = notifications.borrow_and_update().clone();
                if let Some(line) = render::notification_line(&notification) {
                    eprintln!("{}", line);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match BrowseInput::parse(&line) {
                    BrowseInput::Search(text) => {
                        controller.set_search_term(text);
                        controller.handle_search_key_down(ENTER_KEY);
                    }
                    BrowseInput::Filter(text) => {
                        controller.set_search_term(text);
                        let items = store.items();
                        let visible = controller.filter_data(&items, R::searchable_text);
                        println!("{}", render::records::<R>(&visible, &money));
                    }
                    BrowseInput::Sort(field) => controller.handle_sort(&field),
                    BrowseInput::Page(page) => controller.handle_page_change(page),
                    BrowseInput::Next => {
                        let meta = store.pagination();
                        if meta.has_next() {
                            controller.handle_page_change(controller.current_page() + 1);
                        } else {
                            eprintln!("Already on the last page");
                        }
                    }
                    BrowseInput::Previous => {
                        if controller.current_page() > 1 {
                            controller.handle_page_change(controller.current_page() - 1);
                        } else {
                            eprintln!("Already on the first page");
                        }
                    }
                    BrowseInput::Help => eprintln!("{}", BROWSE_HELP),
                    BrowseInput::Quit => break,
                    BrowseInput::Invalid(reason) => eprintln!("{}", reason),
                }
            }
        }
    }

    controller.unmount();
    Ok(())
}

// ==================== add / delete ====================

async fn create<R: Tabular>(app: &App, source: Arc<dyn DataSource<R>>, form: R::Form) -> anyhow::Result<()> {
    let store = Store::new(source, app.config.query.default_limit).with_notifier(app.notifier.clone());
    let result = store.create(&form).await;
    print_notification(&app.notifier);

    let created = result?;
    let money = Money::new(&app.config.currency);
    println!("{}", render::records::<R>(&[&created], &money));
    Ok(())
}

fn transaction_form(args: TransactionArgs) -> TransactionForm {
    TransactionForm {
        amount: args.amount,
        description: args.description,
        category: args.category,
        date: args.date.unwrap_or_else(|| Utc::now().date_naive()),
    }
}

async fn add_command(app: &App, command: AddCommand) -> anyhow::Result<()> {
    match command {
        AddCommand::Income(args) => {
            create::<Incomes>(app, app.sources.incomes.clone(), transaction_form(args)).await
        }
        AddCommand::Expense(args) => {
            create::<Expenses>(app, app.sources.expenses.clone(), transaction_form(args)).await
        }
        AddCommand::Category(args) => {
            let form = CategoryForm {
                name: args.name,
                description: args.description,
                kind: args.kind,
            };
            create::<Categories>(app, app.sources.categories.clone(), form).await
        }
        AddCommand::Budget(args) => {
            let current = Period::current();
            let form = BudgetForm {
                category_id: args.category,
                amount: args.amount,
                month: args.month.unwrap_or(current.month),
                year: args.year.unwrap_or(current.year),
            };
            create::<Budgets>(app, app.sources.budgets.clone(), form).await
        }
    }
}

async fn remove<R: Resource>(app: &App, source: Arc<dyn DataSource<R>>, id: &str) -> anyhow::Result<()> {
    let store = Store::new(source, app.config.query.default_limit).with_notifier(app.notifier.clone());
    let result = store.delete(id).await;
    print_notification(&app.notifier);
    Ok(result?)
}

async fn delete_command(app: &App, resource: EntityKind, id: &str) -> anyhow::Result<()> {
    match resource {
        EntityKind::Income => remove::<Incomes>(app, app.sources.incomes.clone(), id).await,
        EntityKind::Expense => remove::<Expenses>(app, app.sources.expenses.clone(), id).await,
        EntityKind::Category => remove::<Categories>(app, app.sources.categories.clone(), id).await,
        EntityKind::Budget => remove::<Budgets>(app, app.sources.budgets.clone(), id).await,
    }
}

// ==================== dashboard ====================

/// Every record of a collection, page by page
async fn fetch_all<R: Resource>(source: &dyn DataSource<R>, sort_by: &str) -> CoreResult<Vec<R::Item>> {
    let mut params = FetchParams::first_page(DASHBOARD_PAGE_SIZE, sort_by, SortDirection::Asc);
    let mut items = Vec::new();

    loop {
        let page = source.list(&params).await?;
        let received = page.items.len();
        items.extend(page.items);

        let more = match page.pagination {
            Some(meta) => meta.has_next(),
            None => received as u32 == params.limit,
        };
        if !more || received == 0 {
            break;
        }
        params.page += 1;
    }

    Ok(items)
}

async fn dashboard_command(app: &App, month: Option<u32>, year: Option<i32>) -> anyhow::Result<()> {
    let current = Period::current();
    let month = month.unwrap_or(current.month);
    let period = Period::new(month, year.unwrap_or(current.year))
        .ok_or_else(|| anyhow!("Month must be between 1 and 12, got {}", month))?;

    let (incomes, expenses, budgets) = tokio::try_join!(
        fetch_all(app.sources.incomes.as_ref(), "date"),
        fetch_all(app.sources.expenses.as_ref(), "date"),
        fetch_all(app.sources.budgets.as_ref(), "amount"),
    )
    .context("Failed to load dashboard data")?;

    let summary = dashboard::summarize(period, &incomes, &expenses);
    let month_expenses: Vec<_> = expenses
        .iter()
        .filter(|tx| period.contains(&tx.date))
        .cloned()
        .collect();
    let breakdown = dashboard::category_breakdown(&month_expenses);
    let month_budgets: Vec<_> = budgets
        .iter()
        .filter(|b| b.month == period.month && b.year == period.year)
        .collect();
    let chart = dashboard::yearly_chart(&incomes, &expenses, period.year);

    if summary.income_count == 0 && summary.expense_count == 0 {
        log::info!("No transactions in {}", period.label());
    }

    let money = Money::new(&app.config.currency);
    println!(
        "{}",
        render::dashboard(&summary, &breakdown, &month_budgets, &chart, &money)
    );
    Ok(())
}

/// Reject an unusable configuration before any request is made
pub fn check_config(config: &Config) -> anyhow::Result<()> {
    if let Err(error) = config.validate() {
        bail!("{}", error.to_details());
    }
    Ok(())
}
