//! Database query modules.
//!
//! - users: user record CRUD

pub mod users;
