//! User record operations coupled to the image file lifecycle.

mod service;

pub use service::{UserService, WriteOutcome};
