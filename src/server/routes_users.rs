//! User CRUD routes.
//!
//! Create reports failures through the flash message and a redirect back to
//! the form. Update and delete answer failures with a JSON danger message.
//! Edit treats a missing user as a reason to go back to the listing.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use userbook_common::{StatusMessage, UserId};

use super::error::ApiError;
use super::flash::{set_flash, take_flash};
use super::{views, AppContext};
use crate::uploads::read_user_form;
use crate::users::WriteOutcome;

/// Create user routes.
pub fn user_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(list_users))
        .route("/add", get(add_form).post(add_user))
        .route("/edit/:id", get(edit_form))
        .route("/update/:id", post(update_user))
        .route("/delete/:id", get(delete_user))
}

/// Render the listing with the pending status message.
async fn list_users(State(ctx): State<AppContext>, jar: CookieJar) -> Response {
    match ctx.users.list().await {
        Ok(users) => {
            let (jar, message) = take_flash(jar);
            let page = views::IndexTemplate {
                users: &users,
                message: message.as_ref(),
            };
            (jar, views::render(&page)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list users: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving users").into_response()
        }
    }
}

/// Render the creation form.
async fn add_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, message) = take_flash(jar);
    let page = views::AddTemplate {
        message: message.as_ref(),
    };
    (jar, views::render(&page))
}

/// Create a user from the multipart form.
async fn add_user(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Response {
    let form = match read_user_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("Malformed create form: {}", e);
            let jar = set_flash(jar, &StatusMessage::danger(e.body_text()));
            return (jar, Redirect::to("/add")).into_response();
        }
    };

    match ctx.users.create(form).await {
        Ok(outcome) => {
            let jar = set_flash(jar, &outcome.status());
            (jar, Redirect::to("/")).into_response()
        }
        Err(e) => {
            if e.is_validation() {
                tracing::debug!("Rejected create form: {}", e);
            } else {
                tracing::error!("Failed to create user: {}", e);
            }
            let jar = set_flash(jar, &StatusMessage::danger(e.to_string()));
            (jar, Redirect::to("/add")).into_response()
        }
    }
}

/// Render the edit form, or go back to the listing if there is nothing to edit.
async fn edit_form(State(ctx): State<AppContext>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<UserId>() else {
        return Redirect::to("/").into_response();
    };

    match ctx.users.get(id).await {
        Ok(Some(user)) => views::render(&views::EditTemplate { user: &user }),
        Ok(None) => Redirect::to("/").into_response(),
        Err(e) => {
            tracing::error!(user_id = %id, "Failed to load user for editing: {}", e);
            Redirect::to("/").into_response()
        }
    }
}

/// Replace a user's fields from the multipart edit form.
async fn update_user(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let Ok(id) = id.parse::<UserId>() else {
        return Err(ApiError::user_not_found());
    };

    let form = read_user_form(&mut multipart).await.map_err(|e| {
        ApiError::new(e.status(), StatusMessage::danger(e.body_text()))
    })?;

    redirect_with_status(jar, ctx.users.update(id, form).await?)
}

/// Delete a user and its image.
async fn delete_user(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let Ok(id) = id.parse::<UserId>() else {
        return Err(ApiError::user_not_found());
    };

    redirect_with_status(jar, ctx.users.delete(id).await?)
}

fn redirect_with_status(jar: CookieJar, outcome: WriteOutcome) -> Result<Response, ApiError> {
    if outcome == WriteOutcome::NotFound {
        return Err(ApiError::user_not_found());
    }

    let jar = set_flash(jar, &outcome.status());
    Ok((jar, Redirect::to("/")).into_response())
}
