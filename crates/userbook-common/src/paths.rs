//! Path utilities for upload filenames.
//!
//! Stored upload names are always a single path component inside the upload
//! directory. Anything a client sends back (for example the `old_image` form
//! field) goes through these checks before it touches the filesystem.

use std::path::{Component, Path};

/// Check that `name` is a single, normal path component.
///
/// # Examples
///
/// ```
/// use userbook_common::paths::is_plain_file_name;
///
/// assert!(is_plain_file_name("image_1_cat.png"));
/// assert!(!is_plain_file_name(""));
/// assert!(!is_plain_file_name(".."));
/// assert!(!is_plain_file_name("a/b.png"));
/// ```
pub fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains('\\') {
        return false;
    }

    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Reduce a client-supplied filename to its last component.
///
/// Browsers on some platforms send full paths in the multipart
/// `filename` parameter. Returns `None` when nothing usable remains.
///
/// # Examples
///
/// ```
/// use userbook_common::paths::client_file_name;
///
/// assert_eq!(client_file_name("photo.jpg"), Some("photo.jpg"));
/// assert_eq!(client_file_name("C:\\Users\\ana\\photo.jpg"), Some("photo.jpg"));
/// assert_eq!(client_file_name("../../photo.jpg"), Some("photo.jpg"));
/// assert_eq!(client_file_name("dir/"), None);
/// ```
pub fn client_file_name(raw: &str) -> Option<&str> {
    let last = raw.rsplit(&['/', '\\'][..]).next().unwrap_or(raw).trim();

    if is_plain_file_name(last) {
        Some(last)
    } else {
        None
    }
}
