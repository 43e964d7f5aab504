//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which wires an in-memory database and a
//! temporary upload directory into a full [`AppContext`], plus helpers for
//! building multipart requests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use userbook::config::Config;
use userbook::server::{create_router, AppContext};
use userbook::uploads::UploadDir;
use userbook::users::UserService;
use userbook_db::pool::{init_memory_pool, DbPool};

pub const BOUNDARY: &str = "userbook-test-boundary";

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub router: Router,
    upload_dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let upload_dir = tempfile::tempdir().expect("failed to create upload dir");
        let uploads = UploadDir::new(upload_dir.path().to_path_buf());

        let ctx = AppContext {
            config: Arc::new(config),
            users: Arc::new(UserService::new(db.clone(), uploads)),
        };
        let router = create_router(ctx.clone());

        Self {
            ctx,
            db,
            router,
            upload_dir,
        }
    }

    pub fn upload_path(&self, name: &str) -> PathBuf {
        self.upload_dir.path().join(name)
    }

    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("upload dir readable")
            .count()
    }

    pub fn conn(&self) -> userbook_db::pool::PooledConnection {
        userbook_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> Response<Body> {
        self.send(
            Request::get(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, form: MultipartForm) -> Response<Body> {
        self.send(form.into_request(uri)).await
    }
}

/// Builder for `multipart/form-data` request bodies.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// The three text fields every user form carries.
    pub fn user(name: &str, email: &str, phone: &str) -> Self {
        Self::new()
            .text("name", name)
            .text("email", email)
            .text("phone", phone)
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// Helper to get a response body as a string.
pub async fn body_to_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_to_string(response).await).unwrap()
}

/// The `name=value` pair of the flash cookie set by a response, if any.
pub fn flash_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("userbook_flash="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
        .filter(|pair| pair != "userbook_flash=")
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
