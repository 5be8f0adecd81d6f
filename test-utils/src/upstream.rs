//! Fake upstream HTTP server for Discord and the identity provider.
//!
//! Binds a real axum server on an ephemeral localhost port so code under test exercises
//! its actual HTTP client. Responses are canned per test and every Discord request is
//! counted, which lets tests assert that a flow made no outbound calls at all.
//!
//! # Routes
//!
//! - `POST {base}/discord/api/oauth2/token` - token exchange
//! - `GET  {base}/discord/api/users/@me` - Discord profile
//! - `GET  {base}/identity/user` - identity provider user info
//!
//! Discord responses are always served as `application/json`, even when a test
//! replaces the body with text that is not valid JSON.
//!
//! # Example
//!
//! ```rust,ignore
//! let upstream = FakeUpstream::start().await?;
//! upstream.set_token_response(400, fixture::discord::invalid_grant());
//!
//! // ... drive the callback ...
//!
//! assert_eq!(upstream.discord_calls(), 1);
//! ```

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, HeaderName, StatusCode,
    },
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::{error::TestError, fixture};

/// Canned responses and recorded requests.
struct Canned {
    token: (StatusCode, String),
    profile: (StatusCode, String),
    /// Identity provider access token -> member email.
    identities: HashMap<String, String>,
    last_token_form: Option<HashMap<String, String>>,
    last_profile_authorization: Option<String>,
}

impl Default for Canned {
    fn default() -> Self {
        Self {
            token: (StatusCode::OK, fixture::discord::token("tok").to_string()),
            profile: (
                StatusCode::OK,
                fixture::discord::verified_user("alice@discord.example").to_string(),
            ),
            identities: HashMap::new(),
            last_token_form: None,
            last_profile_authorization: None,
        }
    }
}

#[derive(Clone, Default)]
struct Shared {
    canned: Arc<Mutex<Canned>>,
    discord_calls: Arc<AtomicUsize>,
}

/// Local stand-in for Discord's OAuth/API endpoints and the identity provider.
///
/// The server task is aborted when the value is dropped.
pub struct FakeUpstream {
    base_url: String,
    shared: Shared,
    handle: JoinHandle<()>,
}

impl FakeUpstream {
    /// Starts the fake server on `127.0.0.1` with an OS-assigned port.
    ///
    /// Defaults: the token endpoint returns `access_token = "tok"` and the profile
    /// endpoint returns user `999` / `alice_d` with verified email `alice@discord.example`.
    ///
    /// # Returns
    /// - `Ok(FakeUpstream)` - Server is accepting connections
    /// - `Err(TestError::Io)` - Failed to bind the listener
    pub async fn start() -> Result<Self, TestError> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shared = Shared::default();

        let app = Router::new()
            .route("/discord/api/oauth2/token", post(token))
            .route("/discord/api/users/@me", get(profile))
            .route("/identity/user", get(identity_user))
            .with_state(shared.clone());

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            shared,
            handle,
        })
    }

    /// Base URL of the Discord API (`.../discord/api`).
    pub fn discord_api_url(&self) -> String {
        format!("{}/discord/api", self.base_url)
    }

    /// Full URL of the Discord token endpoint.
    pub fn discord_token_url(&self) -> String {
        format!("{}/discord/api/oauth2/token", self.base_url)
    }

    /// Full URL of the identity provider's user-info endpoint.
    pub fn identity_userinfo_url(&self) -> String {
        format!("{}/identity/user", self.base_url)
    }

    /// Replaces the token endpoint response.
    pub fn set_token_response(&self, status: u16, body: Value) {
        self.set_token_body(status, &body.to_string());
    }

    /// Replaces the token endpoint response with a raw body.
    pub fn set_token_body(&self, status: u16, body: &str) {
        self.lock().token = (status_code(status), body.to_string());
    }

    /// Replaces the `users/@me` response.
    pub fn set_profile_response(&self, status: u16, body: Value) {
        self.set_profile_body(status, &body.to_string());
    }

    /// Replaces the `users/@me` response with a raw body.
    pub fn set_profile_body(&self, status: u16, body: &str) {
        self.lock().profile = (status_code(status), body.to_string());
    }

    /// Registers an identity provider access token that resolves to `email`.
    pub fn add_identity(&self, access_token: impl Into<String>, email: impl Into<String>) {
        self.lock()
            .identities
            .insert(access_token.into(), email.into());
    }

    /// Number of requests received on the Discord routes so far.
    pub fn discord_calls(&self) -> usize {
        self.shared.discord_calls.load(Ordering::SeqCst)
    }

    /// Form fields of the most recent token exchange request, if any.
    pub fn last_token_form(&self) -> Option<HashMap<String, String>> {
        self.lock().last_token_form.clone()
    }

    /// `Authorization` header of the most recent profile request, if any.
    pub fn last_profile_authorization(&self) -> Option<String> {
        self.lock().last_profile_authorization.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Canned> {
        // A panicking test thread must not poison the other assertions
        self.shared
            .canned
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

type JsonText = (StatusCode, [(HeaderName, &'static str); 1], String);

fn json_text((status, body): (StatusCode, String)) -> JsonText {
    (status, [(CONTENT_TYPE, "application/json")], body)
}

async fn token(
    State(shared): State<Shared>,
    Form(form): Form<HashMap<String, String>>,
) -> JsonText {
    shared.discord_calls.fetch_add(1, Ordering::SeqCst);

    let mut canned = shared
        .canned
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    canned.last_token_form = Some(form);

    json_text(canned.token.clone())
}

async fn profile(State(shared): State<Shared>, headers: HeaderMap) -> JsonText {
    shared.discord_calls.fetch_add(1, Ordering::SeqCst);

    let mut canned = shared
        .canned
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    canned.last_profile_authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    json_text(canned.profile.clone())
}

async fn identity_user(
    State(shared): State<Shared>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    let canned = shared
        .canned
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    match token.and_then(|token| canned.identities.get(&token).cloned()) {
        Some(email) => (
            StatusCode::OK,
            Json(json!({ "id": "idp-user", "email": email })),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "invalid JWT" })),
        ),
    }
}
