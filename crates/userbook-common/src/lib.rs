//! Userbook-Common: Shared types, IDs, and utilities.
//!
//! This crate provides functionality used by both the store and the server:
//!
//! - **Typed IDs**: UUID wrapper for user records
//! - **Status messages**: One-shot outcome messages shown to the client
//! - **Path Utilities**: Upload filename checks
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use userbook_common::{Error, Result, UserId};
//! use userbook_common::paths::is_plain_file_name;
//!
//! let id = UserId::new();
//! assert!(id.to_string().parse::<UserId>().is_ok());
//!
//! assert!(is_plain_file_name("image_1700000000000_cat.png"));
//! assert!(!is_plain_file_name("../etc/passwd"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::invalid_input("name is required"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
