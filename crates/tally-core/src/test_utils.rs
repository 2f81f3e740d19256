//! Test utilities for tally-core
//!
//! Mock servers for the two collaborators: an OpenAI-compatible completions
//! endpoint and a Supabase-style store (auth + rows). Both bind an ephemeral
//! port and shut down when dropped, so tests can run in parallel.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

use crate::models::{Budget, BudgetPeriod, Category, Expense, Profile};

/// Canned completion returned by the mock text generation server
pub const MOCK_SERVER_INSIGHT: &str =
    "Here's a look at your spending: steady overall, with one category doing \
     most of the damage. Set a budget there and check in weekly. Keeping your \
     average transaction low is working in your favor.";

/// User id issued by the mock store's auth endpoints
pub const MOCK_USER_ID: &str = "mock-user-1";

/// Password the mock store rejects, for unhappy-path tests
pub const REJECTED_PASSWORD: &str = "wrong";

/// Refresh token the mock store rejects as expired
pub const EXPIRED_REFRESH_TOKEN: &str = "expired";

/// Mock OpenAI-compatible completions server
pub struct MockTextGenServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockTextGenServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat_completion));

        let (addr, shutdown_tx) = serve(app).await;
        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockTextGenServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_models() -> Json<serde_json::Value> {
    Json(json!({ "data": [{ "id": "gpt-4o-mini", "object": "model" }] }))
}

async fn handle_chat_completion(Json(request): Json<ChatRequest>) -> Json<serde_json::Value> {
    let content = if request
        .messages
        .first()
        .map(|m| m.content.contains("Total Spending"))
        .unwrap_or(false)
    {
        MOCK_SERVER_INSIGHT.to_string()
    } else {
        format!("Echo: {}", request.messages.first().map(|m| m.content.as_str()).unwrap_or(""))
    };

    Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }],
        "model": request.model,
    }))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatRequestMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatRequestMessage {
    content: String,
}

/// Mock Supabase-style store (GoTrue auth + PostgREST rows)
///
/// Rows live in memory for the server's lifetime. Auth accepts any
/// credentials except [`REJECTED_PASSWORD`] and always issues
/// [`MOCK_USER_ID`]; a refresh with [`EXPIRED_REFRESH_TOKEN`] is rejected
/// like a dead session.
pub struct MockStoreServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockStoreServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = SharedState::default();

        let app = Router::new()
            .route("/auth/v1/signup", post(handle_auth_token))
            .route("/auth/v1/token", post(handle_auth_token))
            .route("/auth/v1/logout", post(handle_logout))
            .route(
                "/rest/v1/expenses",
                get(handle_expenses_list)
                    .post(handle_expenses_insert)
                    .patch(handle_expenses_update)
                    .delete(handle_expenses_delete),
            )
            .route(
                "/rest/v1/budgets",
                get(handle_budgets_list)
                    .post(handle_budgets_insert)
                    .patch(handle_budgets_update)
                    .delete(handle_budgets_delete),
            )
            .route(
                "/rest/v1/profiles",
                get(handle_profiles_list).post(handle_profiles_upsert),
            )
            .with_state(state);

        let (addr, shutdown_tx) = serve(app).await;
        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockStoreServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn serve(app: Router) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

#[derive(Clone, Default)]
struct SharedState {
    rows: Arc<Mutex<Rows>>,
    counter: Arc<AtomicU32>,
}

impl SharedState {
    fn next_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[derive(Default)]
struct Rows {
    expenses: Vec<Expense>,
    budgets: Vec<Budget>,
    profiles: Vec<Profile>,
}

// ---- auth handlers ----

#[derive(Debug, Deserialize)]
struct AuthBody {
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

async fn handle_auth_token(
    State(state): State<SharedState>,
    Json(body): Json<AuthBody>,
) -> Response {
    if body.password.as_deref() == Some(REJECTED_PASSWORD) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" })),
        )
            .into_response();
    }
    if body.refresh_token.as_deref() == Some(EXPIRED_REFRESH_TOKEN) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_grant", "error_description": "Refresh token expired" })),
        )
            .into_response();
    }

    let n = state.counter.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({
        "access_token": format!("mock-access-{}", n),
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": format!("mock-refresh-{}", n),
        "user": { "id": MOCK_USER_ID, "email": "mock@example.com" }
    }))
    .into_response()
}

async fn handle_logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

// ---- row filter helpers ----

fn filter_value<'a>(params: &'a [(String, String)], key: &str, op: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, v)| k == key && v.starts_with(op))
        .map(|(_, v)| &v[op.len()..])
}

// ---- expense handlers ----

#[derive(Debug, Deserialize)]
struct ExpenseBody {
    user_id: String,
    amount: f64,
    description: String,
    category: Category,
    date: NaiveDate,
}

async fn handle_expenses_list(
    State(state): State<SharedState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Expense>> {
    let user_id = filter_value(&params, "user_id", "eq.").unwrap_or_default().to_string();
    let from = filter_value(&params, "date", "gte.").and_then(|v| v.parse::<NaiveDate>().ok());
    let to = filter_value(&params, "date", "lte.").and_then(|v| v.parse::<NaiveDate>().ok());

    let rows = state.rows.lock().unwrap();
    let mut matches: Vec<Expense> = rows
        .expenses
        .iter()
        .filter(|e| e.user_id == user_id)
        .filter(|e| from.map_or(true, |d| e.date >= d))
        .filter(|e| to.map_or(true, |d| e.date <= d))
        .cloned()
        .collect();
    matches.sort_by(|a, b| b.date.cmp(&a.date));

    Json(matches)
}

async fn handle_expenses_insert(
    State(state): State<SharedState>,
    Json(body): Json<ExpenseBody>,
) -> (StatusCode, Json<Vec<Expense>>) {
    let expense = Expense {
        id: state.next_id("exp"),
        user_id: body.user_id,
        amount: body.amount,
        description: body.description,
        category: body.category.to_string(),
        date: body.date,
        created_at: Utc::now(),
    };

    state.rows.lock().unwrap().expenses.push(expense.clone());
    (StatusCode::CREATED, Json(vec![expense]))
}

async fn handle_expenses_update(
    State(state): State<SharedState>,
    Query(params): Query<Vec<(String, String)>>,
    Json(body): Json<ExpenseBody>,
) -> Json<Vec<Expense>> {
    let id = filter_value(&params, "id", "eq.").unwrap_or_default().to_string();

    let mut rows = state.rows.lock().unwrap();
    let mut updated = Vec::new();
    for expense in rows.expenses.iter_mut().filter(|e| e.id == id) {
        expense.amount = body.amount;
        expense.description = body.description.clone();
        expense.category = body.category.to_string();
        expense.date = body.date;
        updated.push(expense.clone());
    }

    Json(updated)
}

async fn handle_expenses_delete(
    State(state): State<SharedState>,
    Query(params): Query<Vec<(String, String)>>,
) -> StatusCode {
    let id = filter_value(&params, "id", "eq.").unwrap_or_default().to_string();
    state.rows.lock().unwrap().expenses.retain(|e| e.id != id);
    StatusCode::NO_CONTENT
}

// ---- budget handlers ----

#[derive(Debug, Deserialize)]
struct BudgetBody {
    user_id: String,
    category: Option<Category>,
    amount: f64,
    period: BudgetPeriod,
    alert_threshold: f64,
}

async fn handle_budgets_list(
    State(state): State<SharedState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Budget>> {
    let user_id = filter_value(&params, "user_id", "eq.").unwrap_or_default().to_string();

    let rows = state.rows.lock().unwrap();
    let matches = rows
        .budgets
        .iter()
        .filter(|b| b.user_id == user_id)
        .cloned()
        .collect();

    Json(matches)
}

async fn handle_budgets_insert(
    State(state): State<SharedState>,
    Json(body): Json<BudgetBody>,
) -> (StatusCode, Json<Vec<Budget>>) {
    let budget = Budget {
        id: state.next_id("bud"),
        user_id: body.user_id,
        category: body.category,
        amount: body.amount,
        period: body.period,
        alert_threshold: body.alert_threshold,
    };

    state.rows.lock().unwrap().budgets.push(budget.clone());
    (StatusCode::CREATED, Json(vec![budget]))
}

async fn handle_budgets_update(
    State(state): State<SharedState>,
    Query(params): Query<Vec<(String, String)>>,
    Json(body): Json<BudgetBody>,
) -> Json<Vec<Budget>> {
    let id = filter_value(&params, "id", "eq.").unwrap_or_default().to_string();

    let mut rows = state.rows.lock().unwrap();
    let mut updated = Vec::new();
    for budget in rows.budgets.iter_mut().filter(|b| b.id == id) {
        budget.category = body.category;
        budget.amount = body.amount;
        budget.alert_threshold = body.alert_threshold;
        updated.push(budget.clone());
    }

    Json(updated)
}

async fn handle_budgets_delete(
    State(state): State<SharedState>,
    Query(params): Query<Vec<(String, String)>>,
) -> StatusCode {
    let id = filter_value(&params, "id", "eq.").unwrap_or_default().to_string();
    state.rows.lock().unwrap().budgets.retain(|b| b.id != id);
    StatusCode::NO_CONTENT
}

// ---- profile handlers ----

#[derive(Debug, Deserialize)]
struct ProfileBody {
    id: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    monthly_budget: Option<f64>,
}

async fn handle_profiles_list(
    State(state): State<SharedState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Profile>> {
    let id = filter_value(&params, "id", "eq.").unwrap_or_default().to_string();

    let rows = state.rows.lock().unwrap();
    let matches = rows
        .profiles
        .iter()
        .filter(|p| p.id == id)
        .cloned()
        .collect();

    Json(matches)
}

async fn handle_profiles_upsert(
    State(state): State<SharedState>,
    Json(body): Json<ProfileBody>,
) -> (StatusCode, Json<Vec<Profile>>) {
    let mut rows = state.rows.lock().unwrap();

    let profile = match rows.profiles.iter_mut().find(|p| p.id == body.id) {
        Some(existing) => {
            if let Some(name) = body.full_name {
                existing.full_name = Some(name);
            }
            if let Some(url) = body.avatar_url {
                existing.avatar_url = Some(url);
            }
            if let Some(currency) = body.currency {
                existing.currency = currency;
            }
            if let Some(amount) = body.monthly_budget {
                existing.monthly_budget = Some(amount);
            }
            existing.clone()
        }
        None => {
            let profile = Profile {
                id: body.id,
                full_name: body.full_name,
                avatar_url: body.avatar_url,
                currency: body.currency.unwrap_or_else(|| "USD".to_string()),
                monthly_budget: body.monthly_budget,
            };
            rows.profiles.push(profile.clone());
            profile
        }
    };

    (StatusCode::CREATED, Json(vec![profile]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{OpenAiBackend, TextGenBackend};
    use crate::config::StoreConfig;
    use crate::error::Error;
    use crate::models::{NewBudget, NewExpense};
    use crate::store::{SessionStore, SupabaseStore};

    fn store_for(server: &MockStoreServer) -> SupabaseStore {
        SupabaseStore::new(
            &StoreConfig {
                url: server.url(),
                anon_key: "test-anon-key".to_string(),
            },
            SessionStore::memory(),
        )
    }

    fn new_expense(category: Category, amount: f64, date: NaiveDate) -> NewExpense {
        NewExpense {
            user_id: MOCK_USER_ID.to_string(),
            amount,
            description: format!("{} purchase", category),
            category,
            date,
        }
    }

    #[tokio::test]
    async fn test_textgen_server_health() {
        let server = MockTextGenServer::start().await;
        let backend = OpenAiBackend::new(&server.url(), "gpt-4o-mini");
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_textgen_server_insight_completion() {
        let server = MockTextGenServer::start().await;
        let backend = OpenAiBackend::new(&server.url(), "gpt-4o-mini");

        let text = backend
            .complete(
                "Total Spending: $100.00\nNumber of Transactions: 3",
                &crate::ai::GenerationOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(text, MOCK_SERVER_INSIGHT);
    }

    #[tokio::test]
    async fn test_store_sign_in_and_session() {
        let server = MockStoreServer::start().await;
        let store = store_for(&server);

        let session = store.sign_in("user@example.com", "hunter2").await.unwrap();
        assert_eq!(session.user_id, MOCK_USER_ID);
        assert!(!session.needs_refresh());
        assert_eq!(store.user_id().await.unwrap(), MOCK_USER_ID);
    }

    #[tokio::test]
    async fn test_store_rejects_bad_password() {
        let server = MockStoreServer::start().await;
        let store = store_for(&server);

        let err = store
            .sign_in("user@example.com", REJECTED_PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Store { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_store_expired_refresh_maps_to_session_expired() {
        let server = MockStoreServer::start().await;
        let store = store_for(&server);
        store.sign_in("user@example.com", "hunter2").await.unwrap();

        // Force the saved session into a state that must refresh with a
        // token the server will reject.
        let mut session = store.current_session().unwrap().unwrap();
        session.refresh_token = EXPIRED_REFRESH_TOKEN.to_string();
        session.expires_at = Utc::now() - chrono::Duration::hours(1);
        store.sessions().save_session(&session).unwrap();

        let err = store.list_expenses(None).await.unwrap_err();
        assert!(matches!(err, Error::SessionExpired));
    }

    #[tokio::test]
    async fn test_store_sign_out_clears_session() {
        let server = MockStoreServer::start().await;
        let store = store_for(&server);
        store.sign_in("user@example.com", "hunter2").await.unwrap();

        store.sign_out().await.unwrap();
        assert!(store.current_session().unwrap().is_none());

        let err = store.list_expenses(None).await.unwrap_err();
        assert!(matches!(err, Error::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_store_expense_round_trip() {
        let server = MockStoreServer::start().await;
        let store = store_for(&server);
        store.sign_in("user@example.com", "hunter2").await.unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let inserted = store
            .insert_expense(&new_expense(Category::Food, 42.0, date))
            .await
            .unwrap();
        assert_eq!(inserted.category, "food");

        let listed = store.list_expenses(None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, 42.0);

        store.delete_expense(&inserted.id).await.unwrap();
        assert!(store.list_expenses(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_expense_date_range_filter() {
        let server = MockStoreServer::start().await;
        let store = store_for(&server);
        store.sign_in("user@example.com", "hunter2").await.unwrap();

        let in_march = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let in_feb = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        store
            .insert_expense(&new_expense(Category::Food, 10.0, in_march))
            .await
            .unwrap();
        store
            .insert_expense(&new_expense(Category::Bills, 20.0, in_feb))
            .await
            .unwrap();

        let march_only = store
            .list_expenses(Some((
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            )))
            .await
            .unwrap();
        assert_eq!(march_only.len(), 1);
        assert_eq!(march_only[0].amount, 10.0);
    }

    #[tokio::test]
    async fn test_store_budget_round_trip() {
        let server = MockStoreServer::start().await;
        let store = store_for(&server);
        store.sign_in("user@example.com", "hunter2").await.unwrap();

        let inserted = store
            .insert_budget(&NewBudget::monthly(MOCK_USER_ID, Some(Category::Food), 400.0))
            .await
            .unwrap();
        assert_eq!(inserted.period, BudgetPeriod::Monthly);

        let listed = store.list_budgets().await.unwrap();
        assert_eq!(listed.len(), 1);

        store.delete_budget(&inserted.id).await.unwrap();
        assert!(store.list_budgets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_profile_upsert_and_fetch() {
        let server = MockStoreServer::start().await;
        let store = store_for(&server);
        store.sign_in("user@example.com", "hunter2").await.unwrap();

        assert!(store.fetch_profile().await.unwrap().is_none());

        let update = crate::models::ProfileUpdate::new(MOCK_USER_ID)
            .with_full_name("Sam Spender")
            .with_monthly_budget(1200.0);
        let profile = store.upsert_profile(&update).await.unwrap();
        assert_eq!(profile.currency, "USD");

        let fetched = store.fetch_profile().await.unwrap().unwrap();
        assert_eq!(fetched.full_name.as_deref(), Some("Sam Spender"));
        assert_eq!(fetched.monthly_budget, Some(1200.0));
    }
}
