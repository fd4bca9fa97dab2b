use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use tracing::debug;

use diary_types::api::DiaryForm;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::{AppState, blocking, pages};

pub async fn index(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, AppError> {
    // A token can outlive its user row (e.g. a replaced database file).
    let (account, diaries) = blocking(&state, move |s| {
        let account = s.db.get_user_by_id(user.0)?.ok_or(AppError::Unauthorized)?;
        Ok((account, s.db.get_user_diaries(user.0)?))
    })
    .await?;

    Ok(Html(pages::index_page(&account.username, &diaries)))
}

pub async fn user_notes(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, AppError> {
    let diaries = blocking(&state, move |s| Ok(s.db.get_user_diaries(user.0)?)).await?;
    Ok(Html(pages::user_notes_page(&diaries)))
}

pub async fn add(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<DiaryForm>,
) -> Result<Redirect, AppError> {
    require_title(&form)?;

    let id = blocking(&state, move |s| {
        Ok(s.db.add_diary(&form.title, form.content(), user.0)?)
    })
    .await?;

    debug!("User {} added diary {}", user.0, id);
    Ok(Redirect::to("/index"))
}

/// Ownership is not checked: any signed-in user can open any diary id.
pub async fn edit_form(
    State(state): State<AppState>,
    Path(diary_id): Path<i64>,
    Extension(_user): Extension<CurrentUser>,
) -> Result<Html<String>, AppError> {
    let diary = blocking(&state, move |s| Ok(s.db.get_diary(diary_id)?))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Html(pages::edit_page(&diary)))
}

pub async fn edit(
    State(state): State<AppState>,
    Path(diary_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<DiaryForm>,
) -> Result<Redirect, AppError> {
    require_title(&form)?;

    blocking(&state, move |s| {
        Ok(s.db.edit_diary(diary_id, &form.title, form.content())?)
    })
    .await?;

    debug!("User {} edited diary {}", user.0, diary_id);
    Ok(Redirect::to("/index"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(diary_id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Redirect, AppError> {
    blocking(&state, move |s| Ok(s.db.delete_diary(diary_id)?)).await?;

    debug!("User {} deleted diary {}", user.0, diary_id);
    Ok(Redirect::to("/index"))
}

fn require_title(form: &DiaryForm) -> Result<(), AppError> {
    if form.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".into()));
    }
    Ok(())
}
