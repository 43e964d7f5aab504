//! Multipart form extraction for the user write routes.

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};

/// Name of the single file part accepted per request.
pub const IMAGE_FIELD: &str = "image";

/// A file part received from the client.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field the file arrived in.
    pub field: String,
    /// Filename as sent by the client, unsanitised.
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// Fields of the create and update forms.
#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Previously stored image, sent back by the edit form.
    pub old_image: Option<String>,
    pub image: Option<FilePart>,
}

/// Read a user form from a multipart body.
///
/// An `image` part with no filename and no bytes is what browsers submit
/// for an untouched file input, so it counts as no file. Only the first
/// file part is kept; unknown fields are skipped.
pub async fn read_user_form(multipart: &mut Multipart) -> Result<UserForm, MultipartError> {
    let mut form = UserForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            IMAGE_FIELD => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|name| !name.is_empty());
                let data = field.bytes().await?;

                if file_name.is_none() && data.is_empty() {
                    continue;
                }

                if form.image.is_some() {
                    tracing::warn!("Ignoring extra file part in user form");
                    continue;
                }

                form.image = Some(FilePart {
                    field: field_name,
                    file_name,
                    data,
                });
            }
            "name" => form.name = Some(field.text().await?),
            "email" => form.email = Some(field.text().await?),
            "phone" => form.phone = Some(field.text().await?),
            "old_image" => form.old_image = Some(field.text().await?),
            other => {
                tracing::debug!("Ignoring unknown form field {:?}", other);
            }
        }
    }

    Ok(form)
}
