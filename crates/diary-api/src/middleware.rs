use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;
use crate::session;

/// The user id proven by the session token, set by `require_session`.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

/// Gate for diary routes: no session, no token, or a token that fails
/// verification all send the caller to `/login` without running the handler.
/// A session holding a rejected token is evicted.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_id = session::session_id(&jar).ok_or(AppError::Unauthorized)?;

    let token = state
        .sessions
        .token(&session_id)
        .await
        .ok_or(AppError::Unauthorized)?;

    let Some(user_id) = state.tokens.verify(&token) else {
        debug!("Rejected session token for {}", req.uri().path());
        state.sessions.remove(&session_id).await;
        return Err(AppError::Unauthorized);
    };

    req.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(req).await)
}
