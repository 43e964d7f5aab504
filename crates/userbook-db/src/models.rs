//! Rust models matching the database schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use userbook_common::UserId;

/// User record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Filename inside the upload directory, if the user has an image.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values written by a create or a full update.
///
/// Fields are optional because requests may omit them; the schema decides
/// what is required and the queries report its verdict as
/// `Error::InvalidInput`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
}

impl UserInput {
    /// Input with all three text fields set and no image.
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
            image: None,
        }
    }

    /// Set the image filename. Empty names are stored as no image.
    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image.filter(|name| !name.is_empty());
        self
    }
}
