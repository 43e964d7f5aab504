//! Userbook-DB: Database schema, migrations, and query operations
//!
//! This crate is the record store for userbook. It uses SQLite through
//! rusqlite with r2d2 connection pooling. Every query is a single SQL
//! statement, so each create/update/delete is atomic per record.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use userbook_db::models::UserInput;
//! use userbook_db::pool::{get_conn, init_pool};
//! use userbook_db::queries::users;
//!
//! let pool = init_pool("/var/lib/userbook/userbook.db").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let user = users::create_user(&conn, &UserInput::new("Ana", "a@x.com", "555")).unwrap();
//! println!("Created user: {}", user.name);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
