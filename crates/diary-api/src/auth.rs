use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use diary_db::{Database, models::UserRow};
use diary_types::api::{LoginForm, RegisterForm};

use crate::error::AppError;
use crate::{AppState, blocking, pages, session};

pub async fn root() -> Redirect {
    Redirect::to("/login")
}

pub async fn login_form() -> Html<String> {
    Html(pages::login_page(None))
}

pub async fn register_form() -> Html<String> {
    Html(pages::register_page(None))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.clone();
    let user = blocking(&state, move |s| {
        authenticate(&s.db, &form.username, &form.password)
    })
    .await?;

    let Some(user) = user else {
        warn!("Failed login for '{}'", username);
        return Ok((
            StatusCode::UNAUTHORIZED,
            Html(pages::login_page(Some("Invalid username or password"))),
        )
            .into_response());
    };

    info!("User '{}' logged in", user.username);
    let jar = start_session(&state, jar, user.id).await?;
    Ok((jar, Redirect::to("/index")).into_response())
}

/// Creates the account and logs the new user straight in.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if let Err(msg) = form.validate() {
        return Ok((StatusCode::BAD_REQUEST, Html(pages::register_page(Some(msg)))).into_response());
    }

    let username = form.username.clone();
    let created = blocking(&state, move |s| {
        let password_hash = hash_password(&form.password)?;
        Ok(s.db.register_user(&form.username, &password_hash)?)
    })
    .await;

    let user_id = match created {
        Ok(id) => id,
        Err(AppError::Conflict(msg)) => {
            return Ok((StatusCode::CONFLICT, Html(pages::register_page(Some(&msg)))).into_response());
        }
        Err(e) => return Err(e),
    };

    info!("Registered user '{}' (id {})", username, user_id);
    let jar = start_session(&state, jar, user_id).await?;
    Ok((jar, Redirect::to("/index")).into_response())
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(id) = session::session_id(&jar) {
        state.sessions.remove(&id).await;
    }
    (jar.remove(session::removal_cookie()), Redirect::to("/login"))
}

/// Looks the user up and checks the password against the stored hash.
/// Unknown user and wrong password are indistinguishable to the caller.
pub fn authenticate(db: &Database, username: &str, password: &str) -> Result<Option<UserRow>, AppError> {
    let Some(user) = db.find_user_by_username(username)? else {
        return Ok(None);
    };

    Ok(verify_password(password, &user.password).then_some(user))
}

/// Argon2id with a random salt, PHC string format.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

/// Issues a token, stores it in a fresh server-side session and sets the
/// cookie. Any session the caller already had is dropped, as are sessions
/// whose tokens have expired.
async fn start_session(state: &AppState, jar: CookieJar, user_id: i64) -> Result<CookieJar, AppError> {
    let token = state
        .tokens
        .issue(user_id)
        .map_err(|e| AppError::Internal(format!("token issue failed: {e}")))?;

    if let Some(old) = session::session_id(&jar) {
        state.sessions.remove(&old).await;
    }

    let id = state
        .sessions
        .create(token, |stored| state.tokens.verify(stored).is_some())
        .await;
    Ok(jar.add(session::session_cookie(id)))
}
