//! Filesystem storage for uploaded images.
//!
//! Files are named `<field>_<unix-millis>_<original-name>`. Names are opened
//! create-new, so an upload never replaces an existing file; a collision
//! inside the same millisecond moves the timestamp forward and tries again.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use userbook_common::paths::{client_file_name, is_plain_file_name};

use super::form::FilePart;

/// Attempts at finding a free name before giving up.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// Used when the client sent no usable filename.
const FALLBACK_NAME: &str = "upload";

/// The directory holding all uploaded images.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Resolve a stored filename to its path.
    ///
    /// Returns `None` for names that are empty or carry path components,
    /// so client-supplied names cannot escape the directory.
    pub fn path_of(&self, name: &str) -> Option<PathBuf> {
        is_plain_file_name(name).then(|| self.root.join(name))
    }

    /// Persist an uploaded file under a freshly generated name.
    ///
    /// Returns the name relative to the upload directory.
    pub async fn store(&self, file: &FilePart) -> io::Result<String> {
        let original = file
            .file_name
            .as_deref()
            .and_then(client_file_name)
            .unwrap_or(FALLBACK_NAME);
        let millis = Utc::now().timestamp_millis();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = format_filename(&file.field, millis + attempt, original);
            let Some(path) = self.path_of(&name) else {
                return Err(io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("unusable upload name {name:?}"),
                ));
            };

            let mut out = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(out) => out,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!("Upload name {} taken, retrying", name);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let written = async {
                out.write_all(&file.data).await?;
                out.flush().await
            }
            .await;

            if let Err(e) = written {
                // Do not leave a truncated file behind
                drop(out);
                if let Err(rm) = tokio::fs::remove_file(&path).await {
                    tracing::warn!("Failed to remove partial upload {:?}: {}", path, rm);
                }
                return Err(e);
            }

            tracing::info!(file = %name, size = file.data.len(), "Stored upload");

            return Ok(name);
        }

        Err(io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free upload name for {original:?} after {MAX_NAME_ATTEMPTS} attempts"),
        ))
    }

    /// Delete a stored file, best-effort.
    ///
    /// Failures are logged and reported as `false`; they never propagate.
    pub async fn remove(&self, name: &str) -> bool {
        let Some(path) = self.path_of(name) else {
            tracing::warn!("Refusing to delete upload with unusable name {:?}", name);
            return false;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(file = %name, "Deleted upload");
                true
            }
            Err(e) => {
                tracing::warn!("Failed to delete upload {:?}: {}", path, e);
                false
            }
        }
    }
}

/// Build the stored name for an upload.
pub fn format_filename(field: &str, millis: i64, original: &str) -> String {
    format!("{}_{}_{}", field, millis, original)
}
