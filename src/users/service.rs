//! User service coordinating upload storage and database operations.
//!
//! The record mutation is the operation of record. File writes and deletes
//! around it are best-effort: failures are logged and never undo or block
//! the database write, so orphaned files and dangling image names are
//! possible after crashes or I/O errors.

use rusqlite::Connection;
use userbook_common::{Error, Result, StatusMessage, UserId};
use userbook_db::models::{User, UserInput};
use userbook_db::pool::{get_conn, DbPool};
use userbook_db::queries::users;

use crate::uploads::{FilePart, UploadDir, UserForm};

/// Result of a create, update, or delete.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Created(User),
    Updated(User),
    Deleted(User),
    NotFound,
}

impl WriteOutcome {
    /// The message to show the client for this outcome.
    pub fn status(&self) -> StatusMessage {
        match self {
            Self::Created(_) => StatusMessage::success("User added successfully!"),
            Self::Updated(_) => StatusMessage::success("User updated successfully"),
            Self::Deleted(_) => StatusMessage::info("User deleted successfully!"),
            Self::NotFound => StatusMessage::danger("User not found"),
        }
    }
}

/// High-level user service that couples the record store with upload storage.
pub struct UserService {
    pool: DbPool,
    uploads: UploadDir,
}

impl UserService {
    pub fn new(pool: DbPool, uploads: UploadDir) -> Self {
        Self { pool, uploads }
    }

    pub fn uploads(&self) -> &UploadDir {
        &self.uploads
    }

    /// Run a query on a pooled connection off the async runtime.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = get_conn(&pool)?;
            f(&conn)
        })
        .await
        .map_err(|e| Error::internal(format!("spawn_blocking join error: {e}")))?
    }

    /// Write the uploaded file, if any. A failed write is logged and the
    /// request carries on as if no file had been sent.
    async fn store_upload(&self, file: Option<&FilePart>) -> Option<String> {
        let file = file?;
        match self.uploads.store(file).await {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::error!(
                    file_name = ?file.file_name,
                    "Failed to store upload, continuing without it: {}",
                    e
                );
                None
            }
        }
    }

    /// Create a user from a submitted form.
    ///
    /// A store failure after the upload was written leaves that file on disk.
    pub async fn create(&self, form: UserForm) -> Result<WriteOutcome> {
        let image = self.store_upload(form.image.as_ref()).await;

        let input = UserInput {
            name: form.name,
            email: form.email,
            phone: form.phone,
            image: None,
        }
        .with_image(image.clone());

        match self
            .with_conn(move |conn| users::create_user(conn, &input))
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Created user");
                Ok(WriteOutcome::Created(user))
            }
            Err(e) => {
                if let Some(image) = image {
                    tracing::warn!(file = %image, "Create failed, upload left orphaned");
                }
                Err(e)
            }
        }
    }

    /// List all users.
    pub async fn list(&self) -> Result<Vec<User>> {
        self.with_conn(users::list_users).await
    }

    /// Fetch one user. `Ok(None)` is not an error.
    pub async fn get(&self, id: UserId) -> Result<Option<User>> {
        self.with_conn(move |conn| users::get_user(conn, id)).await
    }

    /// Number of stored users.
    pub async fn count(&self) -> Result<i64> {
        self.with_conn(users::count_users).await
    }

    /// Replace a user's fields from a submitted edit form.
    ///
    /// With a new file, the file named by `old_image` is deleted before the
    /// record is written; without one, `old_image` is kept as the image.
    pub async fn update(&self, id: UserId, form: UserForm) -> Result<WriteOutcome> {
        let old_image = form.old_image.filter(|name| !name.is_empty());

        let image = match self.store_upload(form.image.as_ref()).await {
            Some(new_image) => {
                if let Some(old) = &old_image {
                    self.uploads.remove(old).await;
                }
                Some(new_image)
            }
            None => old_image,
        };

        let input = UserInput {
            name: form.name,
            email: form.email,
            phone: form.phone,
            image: None,
        }
        .with_image(image);

        let updated = self
            .with_conn(move |conn| users::update_user(conn, id, &input))
            .await?;

        match updated {
            Some(user) => {
                tracing::info!(user_id = %user.id, "Updated user");
                Ok(WriteOutcome::Updated(user))
            }
            None => {
                tracing::debug!(user_id = %id, "Update for unknown user");
                Ok(WriteOutcome::NotFound)
            }
        }
    }

    /// Delete a user, then its image file.
    pub async fn delete(&self, id: UserId) -> Result<WriteOutcome> {
        let deleted = self
            .with_conn(move |conn| users::delete_user(conn, id))
            .await?;

        let Some(user) = deleted else {
            tracing::debug!(user_id = %id, "Delete for unknown user");
            return Ok(WriteOutcome::NotFound);
        };

        tracing::info!(user_id = %user.id, "Deleted user");

        if let Some(image) = &user.image {
            self.uploads.remove(image).await;
        }

        Ok(WriteOutcome::Deleted(user))
    }
}
