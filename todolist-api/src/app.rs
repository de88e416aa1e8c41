/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use todolist_api::{app::{build_router, AppState}, config::Config};
/// use todolist_shared::store::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::FromRef,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use todolist_shared::{
    auth::{jwt::TokenService, middleware::session_auth_middleware},
    store::CredentialStore,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Everything inside is behind `Arc` or cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Credential store (PostgreSQL in production, in-memory in tests)
    pub store: Arc<dyn CredentialStore>,

    /// Session token issuer/verifier
    pub tokens: TokenService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    ///
    /// The token service is built from `config.jwt.secret` here, once.
    pub fn new(store: Arc<dyn CredentialStore>, config: Config) -> Self {
        Self {
            store,
            tokens: TokenService::new(&config.jwt.secret),
            config: Arc::new(config),
        }
    }

    /// Whether session cookies carry the `Secure` flag
    pub fn secure_cookies(&self) -> bool {
        self.config.api.production
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /                  # Banner (public)
/// ├── GET    /health            # Health check (public)
/// ├── /auth/                    # Authentication (public)
/// │   ├── POST /signup
/// │   ├── POST /login
/// │   └── POST /logout
/// └── todo routes               # Session cookie required
///     ├── GET    /todo          # List caller's todos
///     ├── POST   /todo          # Create
///     ├── GET    /todo/:id      # Read one
///     ├── PATCH  /todos/:id     # Update
///     └── DELETE /todos/:id     # Delete
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Session authentication (todo routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/", get(routes::health::banner))
        .route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    let todo_routes = Router::new()
        .route(
            "/todo",
            get(routes::todos::list_todos).post(routes::todos::create_todo),
        )
        .route("/todo/:id", get(routes::todos::get_todo))
        .route(
            "/todos/:id",
            patch(routes::todos::update_todo).delete(routes::todos::delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .nest("/auth", auth_routes)
        .merge(todo_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Configures CORS from the allowed origins
///
/// Explicit origins are allowed to send the session cookie. A wildcard
/// origin cannot be combined with credentials.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

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
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
