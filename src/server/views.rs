//! HTML pages for the user routes.
//!
//! Markup lives in `templates/`; askama escapes every interpolated value.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use userbook_common::StatusMessage;
use userbook_db::models::User;

/// Listing of all users with the pending status message.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub users: &'a [User],
    pub message: Option<&'a StatusMessage>,
}

/// Creation form.
#[derive(Template)]
#[template(path = "add.html")]
pub struct AddTemplate<'a> {
    pub message: Option<&'a StatusMessage>,
}

/// Edit form for one user.
///
/// The current image name travels back in the hidden `old_image` field.
#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditTemplate<'a> {
    pub user: &'a User,
}

/// Render a page, answering 500 if the template fails.
pub fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render template: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error rendering page").into_response()
        }
    }
}
