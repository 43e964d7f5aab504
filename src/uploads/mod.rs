//! Upload handling for user images.
//!
//! Uploaded files live flat in a single directory and are referenced from a
//! user record by filename. Writing and deleting files is best-effort with
//! respect to the record store: nothing here is transactional with the
//! database write that follows or precedes it.

mod form;
mod storage;

pub use form::{read_user_form, FilePart, UserForm, IMAGE_FIELD};
pub use storage::{format_filename, UploadDir};
