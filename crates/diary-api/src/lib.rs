pub mod auth;
pub mod diaries;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod session;
pub mod token;

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tracing::error;

use diary_db::Database;

use crate::error::AppError;
use crate::middleware::require_session;
use crate::session::SessionStore;
use crate::token::TokenService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenService,
    pub sessions: SessionStore,
}

impl AppStateInner {
    pub fn new(db: Database, tokens: TokenService) -> AppState {
        Arc::new(Self {
            db,
            tokens,
            sessions: SessionStore::new(),
        })
    }
}

/// Builds every route. Diary routes sit behind the session gate.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(auth::root))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/index", get(diaries::index))
        .route("/add", post(diaries::add))
        .route("/edit/{id}", get(diaries::edit_form).post(diaries::edit))
        .route("/delete/{id}", post(diaries::delete))
        .route("/user_notes", get(diaries::user_notes))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Runs blocking work (SQLite, password hashing) off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&AppStateInner) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            AppError::Internal(e.to_string())
        })?
}
