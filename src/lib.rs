//! Userbook - user directory web backend with image uploads
//!
//! This library crate exposes the server pieces for integration testing.

pub mod config;
pub mod server;
pub mod uploads;
pub mod users;
