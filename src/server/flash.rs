//! One-shot status messages carried in a cookie.
//!
//! A write handler sets the flash on its redirect; the next page that shows
//! it removes the cookie in the same response.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use userbook_common::StatusMessage;

pub const FLASH_COOKIE_NAME: &str = "userbook_flash";

fn encode(message: &StatusMessage) -> String {
    let json = serde_json::to_string(message).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn decode(encoded: &str) -> Option<StatusMessage> {
    let json = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    serde_json::from_slice(&json).ok()
}

/// Attach a status message for the next page view.
pub fn set_flash(jar: CookieJar, message: &StatusMessage) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE_NAME, encode(message)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    jar.add(cookie)
}

/// Read and clear the pending status message, if any.
///
/// An undecodable cookie is cleared and ignored.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<StatusMessage>) {
    let Some(value) = jar.get(FLASH_COOKIE_NAME).map(|c| c.value().to_string()) else {
        return (jar, None);
    };

    let message = decode(&value);
    if message.is_none() {
        tracing::debug!("Discarding malformed flash cookie");
    }

    let removal = Cookie::build((FLASH_COOKIE_NAME, "")).path("/");
    (jar.remove(removal), message)
}
