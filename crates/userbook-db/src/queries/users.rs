//! User record queries.
//!
//! Every operation is one SQL statement, so a create, update, or delete is
//! atomic for the record it touches. Updates and deletes use `RETURNING` to
//! hand back the affected row from that same statement.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{types::Type, Connection, ErrorCode};
use userbook_common::{Error, Result, UserId};

use crate::models::{User, UserInput};

const USER_COLUMNS: &str = "id, name, email, phone, image, created_at";

/// Parse a user from a database row.
///
/// Expects columns in the order of [`USER_COLUMNS`].
fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let id = row
        .get::<_, String>(0)?
        .parse::<UserId>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    let created_at = DateTime::parse_from_rfc3339(&row.get::<_, String>(5)?)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(User {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        image: row.get(4)?,
        created_at,
    })
}

/// Map a failed write to the common error type.
///
/// Constraint violations mean the store rejected the values, which callers
/// report as validation errors. SQLite names the offending column
/// (`NOT NULL constraint failed: users.name`) or check
/// (`CHECK constraint failed: name_required`); both become
/// "name is required".
fn map_write_error(e: rusqlite::Error) -> Error {
    match &e {
        rusqlite::Error::SqliteFailure(err, msg) if err.code == ErrorCode::ConstraintViolation => {
            let detail = msg.as_deref().unwrap_or("constraint failed");
            let field = detail
                .rsplit(": ")
                .next()
                .map(|s| s.trim_start_matches("users.").trim_end_matches("_required"));

            match field {
                Some(field) if detail.contains("NOT NULL") || detail.contains("CHECK") => {
                    Error::invalid_input(format!("{} is required", field))
                }
                _ => Error::invalid_input(detail.to_string()),
            }
        }
        _ => Error::database(e.to_string()),
    }
}

fn optional(result: rusqlite::Result<User>) -> Result<Option<User>> {
    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(map_write_error(e)),
    }
}

/// Create a new user record.
///
/// # Returns
///
/// * `Ok(User)` - The created record with its generated id
/// * `Err(Error::InvalidInput)` - If a required field is missing or empty
/// * `Err(Error)` - If a database error occurs
pub fn create_user(conn: &Connection, input: &UserInput) -> Result<User> {
    let id = UserId::new();
    let created_at = Utc::now();

    let sql = format!(
        "INSERT INTO users (id, name, email, phone, image, created_at)
         VALUES (:id, :name, :email, :phone, :image, :created_at)
         RETURNING {USER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        rusqlite::named_params! {
            ":id": id.to_string(),
            ":name": &input.name,
            ":email": &input.email,
            ":phone": &input.phone,
            ":image": &input.image,
            ":created_at": created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        },
        parse_user_row,
    )
    .map_err(map_write_error)
}

/// Get a user by ID.
///
/// # Returns
///
/// * `Ok(Some(User))` - The user if found
/// * `Ok(None)` - If the user does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_user(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = :id");

    optional(conn.query_row(
        &sql,
        rusqlite::named_params! { ":id": id.to_string() },
        parse_user_row,
    ))
}

/// List all users, oldest first.
pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, rowid");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;

    let users = stmt
        .query_map([], parse_user_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(users)
}

/// Count all users.
pub fn count_users(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

/// Replace name, email, phone, and image of a user.
///
/// # Returns
///
/// * `Ok(Some(User))` - The record as written
/// * `Ok(None)` - If no user has this id
/// * `Err(Error::InvalidInput)` - If a required field is missing or empty
/// * `Err(Error)` - If a database error occurs
pub fn update_user(conn: &Connection, id: UserId, input: &UserInput) -> Result<Option<User>> {
    let sql = format!(
        "UPDATE users
         SET name = :name, email = :email, phone = :phone, image = :image
         WHERE id = :id
         RETURNING {USER_COLUMNS}"
    );

    optional(conn.query_row(
        &sql,
        rusqlite::named_params! {
            ":id": id.to_string(),
            ":name": &input.name,
            ":email": &input.email,
            ":phone": &input.phone,
            ":image": &input.image,
        },
        parse_user_row,
    ))
}

/// Delete a user and return the removed record.
///
/// # Returns
///
/// * `Ok(Some(User))` - The record that was removed
/// * `Ok(None)` - If no user has this id
/// * `Err(Error)` - If a database error occurs
pub fn delete_user(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let sql = format!("DELETE FROM users WHERE id = :id RETURNING {USER_COLUMNS}");

    optional(conn.query_row(
        &sql,
        rusqlite::named_params! { ":id": id.to_string() },
        parse_user_row,
    ))
}
