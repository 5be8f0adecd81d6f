use std::collections::HashMap;

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::{json, Value};
use tower::ServiceExt;
use url::Url;

use crate::server::{config::Config, router, startup, state::AppState};
use test_utils::{builder::TestBuilder, factory, fixture, upstream::FakeUpstream};

mod callback;
mod unlink;

/// Router wired to an in-memory database and a fake Discord / identity provider.
///
/// Replays the session cookie between requests like a browser would.
struct TestApp {
    app: Router,
    db: DatabaseConnection,
    state: AppState,
    upstream: FakeUpstream,
    cookie: Option<String>,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    async fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let upstream = FakeUpstream::start().await.unwrap();
        let mut config = Config::for_upstream(&upstream);
        configure(&mut config);

        let mut test = TestBuilder::new()
            .with_member_tables()
            .build()
            .await
            .unwrap();
        let session = test.session_layer().await.unwrap();
        let db = test.db.clone().unwrap();

        let http_client = startup::http_client_builder().no_proxy().build().unwrap();
        let oauth_client = startup::setup_oauth_client(&config).unwrap();
        let state = AppState::new(db.clone(), http_client, oauth_client, &config).unwrap();

        let app = router::router().with_state(state.clone()).layer(session);

        Self {
            app,
            db,
            state,
            upstream,
            cookie: None,
        }
    }

    async fn send(&mut self, mut request: Request<Body>) -> Response<Body> {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        response
    }

    async fn get(&mut self, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn post_json(&mut self, uri: &str, body: Value) -> Response<Body> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Signs in through the identity provider as the member with `email`.
    async fn sign_in(&mut self, email: &str) -> Response<Body> {
        let access_token = format!("idp-token-{}", email);
        self.upstream.add_identity(access_token.clone(), email);

        self.post_json("/api/auth/session", json!({ "accessToken": access_token }))
            .await
    }

    /// Drives the Discord callback with the given query string.
    async fn callback(&mut self, query: &str) -> Response<Body> {
        self.get(&format!("/api/discord/callback?{}", query)).await
    }

    async fn member(&self, email: &str) -> entity::member::Model {
        use sea_orm::{ColumnTrait, QueryFilter};

        entity::prelude::Member::find()
            .filter(entity::member::Column::Email.eq(email))
            .one(&self.db)
            .await
            .unwrap()
            .unwrap()
    }
}

/// Base URL of a local port with nothing listening on it.
async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{}", addr)
}

/// Location header of a redirect response, parsed.
fn location(response: &Response<Body>) -> Url {
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    Url::parse(location).unwrap()
}

/// Query parameters of a redirect response's Location.
fn redirect_params(response: &Response<Body>) -> HashMap<String, String> {
    location(response).query_pairs().into_owned().collect()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
