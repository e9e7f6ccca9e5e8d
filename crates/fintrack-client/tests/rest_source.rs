//! RestSource against an in-process fake backend

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use fintrack_client::{ApiClient, RestSource};
use fintrack_config::ApiConfig;
use fintrack_core::{
    Budgets, Categories, CategoryForm, CategoryKind, CoreError, DataSource, Expenses, FetchParams,
    SortDirection, TransactionForm,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn list_expenses(State(seen): State<Seen>, Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    seen.lock().unwrap().push(query);
    Json(json!({
        "data": [
            {"id": "7", "amount": 25000, "description": "Coffee", "category": "makan", "date": "2024-03-05", "createdAt": 1}
        ],
        "pagination": {"current_page": 2, "per_page": 5, "total_pages": 3, "total_records": 11}
    }))
}

async fn update_expense(Path(id): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "data": {
            "id": id,
            "amount": body["amount"],
            "description": body["description"],
            "category": body["category"],
            "date": body["date"]
        },
        "message": "Expense updated"
    }))
}

async fn delete_expense(Path(id): Path<String>) -> StatusCode {
    if id == "missing" {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn create_category() -> (StatusCode, Json<Value>) {
    (
        StatusCode::CONFLICT,
        Json(json!({"message": "Category already exists"})),
    )
}

async fn list_budgets(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer secret");
    if authorized {
        (StatusCode::OK, Json(json!({"data": []})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"})))
    }
}

async fn serve(seen: Seen) -> String {
    let app = Router::new()
        .route("/api/expenses", get(list_expenses))
        .route("/api/expenses/:id", put(update_expense).delete(delete_expense))
        .route("/api/categories", axum::routing::post(create_category))
        .route("/api/budgets", get(list_budgets))
        .with_state(seen);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn client(base_url: &str, token: Option<&str>) -> Arc<ApiClient> {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        auth_token: token.map(str::to_string),
    };
    Arc::new(ApiClient::new(&config).unwrap())
}

#[tokio::test]
async fn test_list_encodes_query_and_reads_page() {
    let seen = Seen::default();
    let base = serve(seen.clone()).await;
    let source = RestSource::<Expenses>::new(client(&base, None));

    let mut params = FetchParams::first_page(5, "amount", SortDirection::Desc);
    params.page = 2;
    params.search = Some("coffee".to_string());

    let page = source.list(&params).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].amount, Decimal::from(25_000));
    assert_eq!(page.pagination.unwrap().total_records, 11);

    let query = seen.lock().unwrap()[0].clone();
    assert_eq!(query["page"], "2");
    assert_eq!(query["limit"], "5");
    assert_eq!(query["search"], "coffee");
    assert_eq!(query["sort_by"], "amount");
    assert_eq!(query["sort_dir"], "desc");
    assert!(!query.contains_key("type"));
}

#[tokio::test]
async fn test_blank_search_is_omitted() {
    let seen = Seen::default();
    let base = serve(seen.clone()).await;
    let source = RestSource::<Expenses>::new(client(&base, None));

    source
        .list(&FetchParams::first_page(10, "date", SortDirection::Asc))
        .await
        .unwrap();
    assert!(!seen.lock().unwrap()[0].contains_key("search"));
}

#[tokio::test]
async fn test_update_uses_put_and_reads_message() {
    let base = serve(Seen::default()).await;
    let source = RestSource::<Expenses>::new(client(&base, None));

    let form = TransactionForm {
        amount: Decimal::from(30_000),
        description: "Lunch".to_string(),
        category: "makan".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
    };
    let updated = source.update("7", &form).await.unwrap();
    assert_eq!(updated.data.id, "7");
    assert_eq!(updated.data.description, "Lunch");
    assert_eq!(updated.message.as_deref(), Some("Expense updated"));
}

#[tokio::test]
async fn test_error_message_from_body() {
    let base = serve(Seen::default()).await;
    let source = RestSource::<Categories>::new(client(&base, None));

    let form = CategoryForm {
        name: "Makan".to_string(),
        description: None,
        kind: Some(CategoryKind::Expense),
    };
    let error = source.create(&form).await.unwrap_err();
    assert_eq!(
        error,
        CoreError::RequestFailed {
            message: "Category already exists".to_string(),
            status: Some(409),
        }
    );
}

#[tokio::test]
async fn test_error_without_body_uses_default_message() {
    let base = serve(Seen::default()).await;
    let source = RestSource::<Expenses>::new(client(&base, None));

    source.delete("7").await.unwrap();
    let error = source.delete("missing").await.unwrap_err();
    assert_eq!(error.to_string(), "Request failed");
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let base = serve(Seen::default()).await;

    let anonymous = RestSource::<Budgets>::new(client(&base, None));
    let params = FetchParams::first_page(10, "amount", SortDirection::Asc);
    assert_eq!(
        anonymous.list(&params).await.unwrap_err().to_string(),
        "Unauthorized"
    );

    let signed_in = RestSource::<Budgets>::new(client(&base, Some("secret")));
    let page = signed_in.list(&params).await.unwrap();
    assert!(page.items.is_empty());
    assert!(page.pagination.is_none());
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Port 9 (discard) is expected to refuse connections locally
    let source = RestSource::<Expenses>::new(client("http://127.0.0.1:9/api", None));
    let error = source
        .list(&FetchParams::first_page(10, "date", SortDirection::Asc))
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "Request failed");
}
