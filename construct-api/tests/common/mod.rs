/// Common test utilities for integration tests
///
/// - In-memory store behind the real router (no database needed)
/// - Fake federated identity provider
/// - Request helpers returning status and JSON body

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use construct_api::app::{build_router, AppState};
use construct_api::config::{ApiConfig, CommentConfig, Config, DatabaseConfig, GoogleConfig, JwtConfig};
use construct_shared::auth::identity::{IdentityClaims, IdentityError, IdentityVerifier};
use construct_shared::repository::{MemoryRepository, Repositories};
use construct_shared::services::CommentScopePolicy;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const GOOGLE_AUDIENCE: &str = "construct-test.apps.googleusercontent.com";
pub const GOOGLE_TOKEN: &str = "valid-google-id-token";
pub const GOOGLE_EMAIL: &str = "grace@example.com";
pub const UNVERIFIED_GOOGLE_TOKEN: &str = "unverified-google-id-token";
pub const UNVERIFIED_GOOGLE_EMAIL: &str = "ada@example.com";

/// Accepts [`GOOGLE_TOKEN`], and [`UNVERIFIED_GOOGLE_TOKEN`] with an
/// unverified email claim
pub struct FakeGoogle;

#[async_trait]
impl IdentityVerifier for FakeGoogle {
    async fn validate(
        &self,
        id_token: &str,
        audience: &str,
    ) -> Result<IdentityClaims, IdentityError> {
        if id_token == GOOGLE_TOKEN && audience == GOOGLE_AUDIENCE {
            Ok(IdentityClaims {
                sub: "1234567890".to_string(),
                email: Some(GOOGLE_EMAIL.to_string()),
                email_verified: Some(true),
                name: None,
            })
        } else if id_token == UNVERIFIED_GOOGLE_TOKEN && audience == GOOGLE_AUDIENCE {
            Ok(IdentityClaims {
                sub: "0987654321".to_string(),
                email: Some(UNVERIFIED_GOOGLE_EMAIL.to_string()),
                email_verified: Some(false),
                name: None,
            })
        } else {
            Err(IdentityError::InvalidToken("rejected".to_string()))
        }
    }
}

/// Test context containing the router and its backing store
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryRepository>,
    pub config: Config,
}

pub fn test_config(policy: CommentScopePolicy) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
        google: GoogleConfig {
            audience: Some(GOOGLE_AUDIENCE.to_string()),
        },
        comments: CommentConfig { policy },
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_policy(CommentScopePolicy::Unscoped)
    }

    pub fn with_policy(policy: CommentScopePolicy) -> Self {
        let store = Arc::new(MemoryRepository::new());
        let repos = Repositories {
            companies: store.clone(),
            users: store.clone(),
            clients: store.clone(),
            projects: store.clone(),
            links: store.clone(),
            health: store.clone(),
        };
        let config = test_config(policy);
        let state = AppState::new(&repos, Arc::new(FakeGoogle), config.clone());

        Self {
            app: build_router(state),
            store,
            config,
        }
    }

    /// Sends a request and returns status plus parsed body (Null when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, body).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Signs up a company and returns the admin's token
    pub async fn signup(&self, name: &str, email: &str, company: &str, tax_id: &str) -> String {
        let (status, body) = self
            .post(
                "/signup",
                None,
                json!({
                    "email": email,
                    "password": "secret1",
                    "name": name,
                    "company_name": company,
                    "tax_id": tax_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a client and returns its id
    pub async fn create_client(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .post("/clients", Some(token), json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "client create failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a project for `client_id` and returns its id
    pub async fn create_project(&self, token: &str, name: &str, client_id: &str) -> String {
        let (status, body) = self
            .post(
                "/projects",
                Some(token),
                json!({ "name": name, "client_id": client_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "project create failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}
