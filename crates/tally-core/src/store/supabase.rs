//! Client for the hosted store
//!
//! Thin wrapper over the provider's endpoints: GoTrue for auth (password
//! grant, signup, refresh) and PostgREST for the `expenses`, `budgets`, and
//! `profiles` tables. Row-level authorization lives server-side; this client
//! just scopes queries to the signed-in user and maps non-success responses
//! to [`Error::Store`]. Requests are single-shot, no retries or pagination.

use chrono::{Duration, NaiveDate, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetPeriod, Expense, NewBudget, NewExpense, Profile, ProfileUpdate};

use super::session::{Session, SessionStore};

/// Hosted store client
///
/// The session store is injected at construction; every authenticated call
/// goes through [`SupabaseStore::session`], which transparently refreshes an
/// expiring token and persists the result.
pub struct SupabaseStore {
    http_client: Client,
    base_url: String,
    anon_key: String,
    sessions: SessionStore,
}

impl SupabaseStore {
    pub fn new(config: &StoreConfig, sessions: SessionStore) -> Self {
        Self {
            http_client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            sessions,
        }
    }

    /// Base URL of the hosted project (for status displays)
    pub fn host(&self) -> &str {
        &self.base_url
    }

    /// The session store backing this client
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    // ---- auth ----

    /// Register a new account and persist the returned session
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        self.password_auth(&url, email, password).await
    }

    /// Sign in with the password grant and persist the returned session
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        self.password_auth(&url, email, password).await
    }

    async fn password_auth(&self, url: &str, email: &str, password: &str) -> Result<Session> {
        debug!(url, "Authenticating");
        let response = self
            .http_client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        let session = into_session(check(response).await?.json().await?);
        self.sessions.save_session(&session)?;
        Ok(session)
    }

    /// Exchange the refresh token for a new session
    pub async fn refresh_session(&self) -> Result<Session> {
        let current = self
            .sessions
            .load_session()?
            .ok_or(Error::NotAuthenticated)?;

        let response = self
            .http_client
            .post(format!(
                "{}/auth/v1/token?grant_type=refresh_token",
                self.base_url
            ))
            .header("apikey", &self.anon_key)
            .json(&RefreshGrant {
                refresh_token: &current.refresh_token,
            })
            .send()
            .await?;

        let response = match check(response).await {
            Ok(r) => r,
            // A rejected refresh token means the session is gone for good
            Err(Error::Store { status: 400 | 401, .. }) => return Err(Error::SessionExpired),
            Err(e) => return Err(e),
        };

        let session = into_session(response.json().await?);
        self.sessions.save_session(&session)?;
        Ok(session)
    }

    /// End the session on the server and forget it locally
    ///
    /// The local session is cleared even when the server call fails; a
    /// dangling server-side session expires on its own.
    pub async fn sign_out(&self) -> Result<()> {
        if let Some(session) = self.sessions.load_session()? {
            let result = self
                .http_client
                .post(format!("{}/auth/v1/logout", self.base_url))
                .header("apikey", &self.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;
            if let Err(e) = result {
                debug!(error = %e, "Logout request failed, clearing local session anyway");
            }
        }
        self.sessions.clear_session()
    }

    /// The persisted session without touching the network
    pub fn current_session(&self) -> Result<Option<Session>> {
        self.sessions.load_session()
    }

    /// A usable session, refreshing first when the token is about to expire
    pub async fn session(&self) -> Result<Session> {
        let session = self
            .sessions
            .load_session()?
            .ok_or(Error::NotAuthenticated)?;

        if session.needs_refresh() {
            return self.refresh_session().await;
        }
        Ok(session)
    }

    /// Signed-in user id
    pub async fn user_id(&self) -> Result<String> {
        Ok(self.session().await?.user_id)
    }

    // ---- expenses ----

    /// Expenses for the signed-in user, newest first
    ///
    /// `range` limits to dates within `(from, to)` inclusive, e.g. the
    /// current month via [`crate::aggregate::month_bounds`].
    pub async fn list_expenses(
        &self,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<Expense>> {
        let session = self.session().await?;
        let mut request = self
            .rest(Method::GET, "expenses", &session)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", session.user_id)),
                ("order", "date.desc".to_string()),
            ]);

        if let Some((from, to)) = range {
            request = request.query(&[
                ("date", format!("gte.{}", from)),
                ("date", format!("lte.{}", to)),
            ]);
        }

        Ok(check(request.send().await?).await?.json().await?)
    }

    /// Insert an expense, returning the stored row
    pub async fn insert_expense(&self, expense: &NewExpense) -> Result<Expense> {
        let session = self.session().await?;
        let response = self
            .rest(Method::POST, "expenses", &session)
            .header("Prefer", "return=representation")
            .json(expense)
            .send()
            .await?;

        single(check(response).await?.json().await?, "expense")
    }

    /// Update an expense by id, returning the stored row
    pub async fn update_expense(&self, id: &str, expense: &NewExpense) -> Result<Expense> {
        let session = self.session().await?;
        let response = self
            .rest(Method::PATCH, "expenses", &session)
            .query(&[
                ("id", format!("eq.{}", id)),
                ("user_id", format!("eq.{}", session.user_id)),
            ])
            .header("Prefer", "return=representation")
            .json(expense)
            .send()
            .await?;

        single(check(response).await?.json().await?, "expense")
    }

    /// Delete an expense by id
    pub async fn delete_expense(&self, id: &str) -> Result<()> {
        let session = self.session().await?;
        let response = self
            .rest(Method::DELETE, "expenses", &session)
            .query(&[
                ("id", format!("eq.{}", id)),
                ("user_id", format!("eq.{}", session.user_id)),
            ])
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    // ---- budgets ----

    /// Monthly budgets for the signed-in user
    pub async fn list_budgets(&self) -> Result<Vec<Budget>> {
        let session = self.session().await?;
        let response = self
            .rest(Method::GET, "budgets", &session)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", session.user_id)),
                ("period", format!("eq.{}", BudgetPeriod::Monthly)),
            ])
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Insert a budget, returning the stored row
    pub async fn insert_budget(&self, budget: &NewBudget) -> Result<Budget> {
        let session = self.session().await?;
        let response = self
            .rest(Method::POST, "budgets", &session)
            .header("Prefer", "return=representation")
            .json(budget)
            .send()
            .await?;

        single(check(response).await?.json().await?, "budget")
    }

    /// Update a budget by id, returning the stored row
    pub async fn update_budget(&self, id: &str, budget: &NewBudget) -> Result<Budget> {
        let session = self.session().await?;
        let response = self
            .rest(Method::PATCH, "budgets", &session)
            .query(&[
                ("id", format!("eq.{}", id)),
                ("user_id", format!("eq.{}", session.user_id)),
            ])
            .header("Prefer", "return=representation")
            .json(budget)
            .send()
            .await?;

        single(check(response).await?.json().await?, "budget")
    }

    /// Delete a budget by id
    pub async fn delete_budget(&self, id: &str) -> Result<()> {
        let session = self.session().await?;
        let response = self
            .rest(Method::DELETE, "budgets", &session)
            .query(&[
                ("id", format!("eq.{}", id)),
                ("user_id", format!("eq.{}", session.user_id)),
            ])
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    // ---- profile ----

    /// Profile row for the signed-in user, if one exists yet
    pub async fn fetch_profile(&self) -> Result<Option<Profile>> {
        let session = self.session().await?;
        let response = self
            .rest(Method::GET, "profiles", &session)
            .query(&[
                ("select", "*".to_string()),
                ("id", format!("eq.{}", session.user_id)),
            ])
            .send()
            .await?;

        let rows: Vec<Profile> = check(response).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    /// Create or update the profile row
    pub async fn upsert_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        let session = self.session().await?;
        let response = self
            .rest(Method::POST, "profiles", &session)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(update)
            .send()
            .await?;

        single(check(response).await?.json().await?, "profile")
    }

    // ---- helpers ----

    /// Request builder for a table with the standard headers applied
    fn rest(&self, method: Method, table: &str, session: &Session) -> RequestBuilder {
        debug!(%method, table, "Store request");
        self.http_client
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
    }
}

/// Map non-success responses to `Error::Store`
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(Error::Store {
        status: status.as_u16(),
        message,
    })
}

/// First row of a `return=representation` response
fn single<T>(mut rows: Vec<T>, what: &str) -> Result<T> {
    if rows.is_empty() {
        return Err(Error::NotFound(format!("{} row not returned", what)));
    }
    Ok(rows.remove(0))
}

fn into_session(auth: AuthResponse) -> Session {
    Session {
        access_token: auth.access_token,
        refresh_token: auth.refresh_token,
        user_id: auth.user.id,
        expires_at: Utc::now() + Duration::seconds(auth.expires_in),
    }
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// GoTrue token/signup response
#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}
