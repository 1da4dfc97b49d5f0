/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use construct_api::{app::{build_router, AppState}, config::Config};
/// use construct_shared::auth::identity::GoogleIdentityVerifier;
/// use construct_shared::repository::{MemoryRepository, Repositories};
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let repos = Repositories::from_store(MemoryRepository::new());
/// let state = AppState::new(&repos, Arc::new(GoogleIdentityVerifier::new()), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use construct_shared::auth::identity::IdentityVerifier;
use construct_shared::auth::middleware::authenticate;
use construct_shared::repository::{Repositories, StoreHealth};
use construct_shared::services::{AuthSettings, Services};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub config: Arc<Config>,
    pub health: Arc<dyn StoreHealth>,
}

impl AppState {
    /// Wires services over the given repositories
    pub fn new(repos: &Repositories, identity: Arc<dyn IdentityVerifier>, config: Config) -> Self {
        let services = Services::new(
            repos,
            identity,
            AuthSettings {
                jwt_secret: config.jwt.secret.clone(),
                google_audience: config.google.audience.clone(),
            },
            config.comments.policy,
        );

        Self {
            services: Arc::new(services),
            config: Arc::new(config),
            health: repos.health.clone(),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          public
/// ├── /signup, /login                  public
/// ├── /auth/google, /signup/google     public, federated login
/// ├── /auth/verify                     public
/// ├── /public/...                      anonymous profile, project, click
/// └── everything else                  bearer token
///     ├── /username, /user/...         any authenticated user
///     ├── /company, /company/members   company admin
///     └── /projects, /tasks, /subtasks,
///         /clients, /links             company member
/// ```
///
/// # Middleware Stack
///
/// 1. Compression (tower-http CompressionLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/auth/google", post(routes::auth::google_login))
        .route("/signup/google", post(routes::auth::google_login))
        .route("/auth/verify", post(routes::auth::verify))
        .route(
            "/public/profile/:username",
            get(routes::public::get_public_profile),
        )
        .route("/public/projects/:id", get(routes::public::get_public_project))
        .route("/public/links/:id/click", post(routes::public::track_click));

    let user_routes = Router::new()
        .route(
            "/username",
            get(routes::users::verify_username).post(routes::users::update_username),
        )
        .route("/user/username", get(routes::users::get_username))
        .route(
            "/user/profile",
            get(routes::users::get_profile).put(routes::users::update_profile),
        )
        .route("/user/bio", put(routes::users::update_bio))
        .route("/user/password", put(routes::users::update_password));

    let company_routes = Router::new()
        .route(
            "/company",
            get(routes::company::get_company).put(routes::company::update_company),
        )
        .route(
            "/company/members",
            get(routes::company::list_members).post(routes::company::add_member),
        );

    let project_routes = Router::new()
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/projects/:id/tasks",
            get(routes::projects::list_tasks).post(routes::projects::add_task),
        )
        .route(
            "/tasks/:id",
            get(routes::projects::get_task)
                .put(routes::projects::toggle_task)
                .delete(routes::projects::delete_task),
        )
        .route("/tasks/:id/subtasks", post(routes::projects::add_subtask))
        .route(
            "/subtasks/:id",
            get(routes::projects::get_subtask)
                .put(routes::projects::toggle_subtask)
                .delete(routes::projects::delete_subtask),
        );

    let client_routes = Router::new()
        .route(
            "/clients",
            get(routes::clients::list_clients).post(routes::clients::create_client),
        )
        .route(
            "/clients/:id",
            get(routes::clients::get_client)
                .put(routes::clients::update_client)
                .delete(routes::clients::delete_client),
        )
        .route("/clients/:id/comments", post(routes::clients::add_comment));

    let link_routes = Router::new()
        .route(
            "/links",
            get(routes::links::list_links).post(routes::links::create_link),
        )
        .route(
            "/links/:id",
            put(routes::links::update_link).delete(routes::links::delete_link),
        );

    let protected_routes = Router::new()
        .merge(user_routes)
        .merge(company_routes)
        .merge(project_routes)
        .merge(client_routes)
        .merge(link_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    // Entries are validated by `Config::from_lookup`
    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Validates the bearer token and injects `AuthContext` into request
/// extensions. The user is not re-fetched from storage.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;
    req.extensions_mut().insert(auth_context);
    Ok(next.run(req).await)
}
