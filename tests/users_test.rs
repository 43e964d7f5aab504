//! Integration tests for the user CRUD routes.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_to_string, flash_cookie, location, MultipartForm, TestHarness};
use userbook_common::UserId;

async fn only_user(h: &TestHarness) -> userbook_db::models::User {
    let mut users = h.ctx.users.list().await.unwrap();
    assert_eq!(users.len(), 1, "expected exactly one user");
    users.remove(0)
}

#[tokio::test]
async fn health_reports_user_count() {
    let h = TestHarness::new();

    let resp = h.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["users"], 0);
}

#[tokio::test]
async fn empty_listing() {
    let h = TestHarness::new();

    let resp = h.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_to_string(resp).await.contains("No users found"));
}

#[tokio::test]
async fn add_form_renders() {
    let h = TestHarness::new();

    let resp = h.get("/add").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_string(resp).await;
    assert!(body.contains(r#"action="/add""#));
    assert!(body.contains("multipart/form-data"));
}

#[tokio::test]
async fn create_without_file_then_list_then_delete() {
    let h = TestHarness::new();

    let resp = h
        .post_form("/add", MultipartForm::user("Ana", "a@x.com", "555"))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let user = only_user(&h).await;
    assert_eq!(user.name, "Ana");
    assert_eq!(user.email, "a@x.com");
    assert_eq!(user.phone, "555");
    assert_eq!(user.image, None);
    assert_eq!(h.upload_count(), 0);

    let resp = h.get(&format!("/delete/{}", user.id)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(h.ctx.users.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_with_file_stores_upload() {
    let h = TestHarness::new();

    let form = MultipartForm::user("Ana", "a@x.com", "555").file("image", "cat.png", b"meow");
    let resp = h.post_form("/add", form).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let user = only_user(&h).await;
    let image = user.image.expect("image set");
    assert!(image.starts_with("image_"));
    assert!(image.ends_with("_cat.png"));
    assert_eq!(std::fs::read(h.upload_path(&image)).unwrap(), b"meow");

    // Stored files are served back
    let resp = h.get(&format!("/uploads/{image}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_to_string(resp).await, "meow");
}

#[tokio::test]
async fn empty_file_input_counts_as_no_file() {
    let h = TestHarness::new();

    let form = MultipartForm::user("Ana", "a@x.com", "555").file("image", "", b"");
    h.post_form("/add", form).await;

    let user = only_user(&h).await;
    assert_eq!(user.image, None);
    assert_eq!(h.upload_count(), 0);
}

#[tokio::test]
async fn create_flash_shows_once() {
    let h = TestHarness::new();

    let resp = h
        .post_form("/add", MultipartForm::user("Ana", "a@x.com", "555"))
        .await;
    let cookie = flash_cookie(&resp).expect("flash cookie set");

    let resp = h.get_with_cookie("/", &cookie).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = resp
        .headers()
        .get_all("set-cookie")
        .iter()
        .any(|v| v.to_str().unwrap().starts_with("userbook_flash=;"));
    assert!(cleared, "listing should clear the flash cookie");

    let body = body_to_string(resp).await;
    assert!(body.contains("User added successfully!"));
    assert!(body.contains("alert-success"));

    // Without the cookie the message is gone
    let body = body_to_string(h.get("/").await).await;
    assert!(!body.contains("User added successfully!"));
}

#[tokio::test]
async fn create_missing_field_redirects_back_with_message() {
    let h = TestHarness::new();

    let form = MultipartForm::new()
        .text("name", "Ana")
        .text("email", "a@x.com");
    let resp = h.post_form("/add", form).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/add"));

    let cookie = flash_cookie(&resp).expect("flash cookie set");
    let body = body_to_string(h.get_with_cookie("/add", &cookie).await).await;
    assert!(body.contains("alert-danger"));
    assert!(body.contains("phone is required"));

    assert!(h.ctx.users.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn edit_renders_form_with_old_image() {
    let h = TestHarness::new();

    let form = MultipartForm::user("Ana", "a@x.com", "555").file("image", "cat.png", b"meow");
    h.post_form("/add", form).await;
    let user = only_user(&h).await;

    let resp = h.get(&format!("/edit/{}", user.id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_to_string(resp).await;
    assert!(body.contains(&format!(r#"action="/update/{}""#, user.id)));
    assert!(body.contains(&format!(
        r#"name="old_image" value="{}""#,
        user.image.unwrap()
    )));
}

#[tokio::test]
async fn edit_unknown_or_malformed_id_redirects() {
    let h = TestHarness::new();

    let resp = h.get(&format!("/edit/{}", UserId::new())).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let resp = h.get("/edit/not-an-id").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));
}

#[tokio::test]
async fn update_without_file_keeps_image() {
    let h = TestHarness::new();

    let form = MultipartForm::user("Ana", "a@x.com", "555").file("image", "cat.png", b"meow");
    h.post_form("/add", form).await;
    let user = only_user(&h).await;
    let image = user.image.clone().unwrap();

    let form = MultipartForm::user("Bea", "b@x.com", "777").text("old_image", &image);
    let resp = h.post_form(&format!("/update/{}", user.id), form).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let updated = only_user(&h).await;
    assert_eq!(updated.name, "Bea");
    assert_eq!(updated.email, "b@x.com");
    assert_eq!(updated.phone, "777");
    assert_eq!(updated.image.as_deref(), Some(image.as_str()));
    assert!(h.upload_path(&image).exists());
}

#[tokio::test]
async fn update_with_file_replaces_old_file() {
    let h = TestHarness::new();

    let form = MultipartForm::user("Ana", "a@x.com", "555").file("image", "old.png", b"old");
    h.post_form("/add", form).await;
    let user = only_user(&h).await;
    let old_image = user.image.clone().unwrap();

    let form = MultipartForm::user("Ana", "a@x.com", "555")
        .text("old_image", &old_image)
        .file("image", "new.png", b"new");
    let resp = h.post_form(&format!("/update/{}", user.id), form).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let updated = only_user(&h).await;
    let new_image = updated.image.unwrap();
    assert!(new_image.ends_with("_new.png"));
    assert!(!h.upload_path(&old_image).exists());
    assert_eq!(std::fs::read(h.upload_path(&new_image)).unwrap(), b"new");
    assert_eq!(h.upload_count(), 1);
}

#[tokio::test]
async fn update_with_missing_old_file_still_updates() {
    let h = TestHarness::new();

    h.post_form("/add", MultipartForm::user("Ana", "a@x.com", "555"))
        .await;
    let user = only_user(&h).await;

    let form = MultipartForm::user("Bea", "b@x.com", "777")
        .text("old_image", "image_1_gone.png")
        .file("image", "new.png", b"new");
    let resp = h.post_form(&format!("/update/{}", user.id), form).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let cookie = flash_cookie(&resp).expect("flash cookie set");
    let body = body_to_string(h.get_with_cookie("/", &cookie).await).await;
    assert!(body.contains("User updated successfully"));

    let updated = only_user(&h).await;
    assert_eq!(updated.name, "Bea");
    let new_image = updated.image.expect("new image stored");
    assert_eq!(std::fs::read(h.upload_path(&new_image)).unwrap(), b"new");
    assert_eq!(h.upload_count(), 1);
}

#[tokio::test]
async fn update_unknown_user_is_json_danger() {
    let h = TestHarness::new();

    let form = MultipartForm::user("Ana", "a@x.com", "555");
    let resp = h
        .post_form(&format!("/update/{}", UserId::new()), form)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let json = body_json(resp).await;
    assert_eq!(json["message"], "User not found");
    assert_eq!(json["type"], "danger");
}

#[tokio::test]
async fn update_malformed_id_is_json_danger() {
    let h = TestHarness::new();

    let resp = h
        .post_form("/update/xyz", MultipartForm::user("Ana", "a@x.com", "555"))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["type"], "danger");
}

#[tokio::test]
async fn update_missing_field_is_json_danger() {
    let h = TestHarness::new();

    h.post_form("/add", MultipartForm::user("Ana", "a@x.com", "555"))
        .await;
    let user = only_user(&h).await;

    let form = MultipartForm::new().text("name", "Bea").text("phone", "777");
    let resp = h.post_form(&format!("/update/{}", user.id), form).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_json(resp).await;
    assert_eq!(json["type"], "danger");
    assert_eq!(json["message"], "Invalid input: email is required");

    let unchanged = only_user(&h).await;
    assert_eq!(unchanged.name, "Ana");
}

#[tokio::test]
async fn update_is_idempotent() {
    let h = TestHarness::new();

    h.post_form("/add", MultipartForm::user("Ana", "a@x.com", "555"))
        .await;
    let user = only_user(&h).await;
    let uri = format!("/update/{}", user.id);

    h.post_form(&uri, MultipartForm::user("Bea", "b@x.com", "777"))
        .await;
    let first = only_user(&h).await;
    h.post_form(&uri, MultipartForm::user("Bea", "b@x.com", "777"))
        .await;
    let second = only_user(&h).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn delete_removes_file() {
    let h = TestHarness::new();

    let form = MultipartForm::user("Ana", "a@x.com", "555").file("image", "cat.png", b"meow");
    h.post_form("/add", form).await;
    let user = only_user(&h).await;
    let image = user.image.clone().unwrap();

    let resp = h.get(&format!("/delete/{}", user.id)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let cookie = flash_cookie(&resp).expect("flash cookie set");
    let body = body_to_string(h.get_with_cookie("/", &cookie).await).await;
    assert!(body.contains("User deleted successfully!"));
    assert!(body.contains("alert-info"));

    assert!(!h.upload_path(&image).exists());
    assert!(h.ctx.users.get(user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_unknown_user_is_json_danger() {
    let h = TestHarness::new();

    let resp = h.get(&format!("/delete/{}", UserId::new())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let json = body_json(resp).await;
    assert_eq!(json["message"], "User not found");
    assert_eq!(json["type"], "danger");
}

#[tokio::test]
async fn delete_twice_reports_not_found() {
    let h = TestHarness::new();

    h.post_form("/add", MultipartForm::user("Ana", "a@x.com", "555"))
        .await;
    let user = only_user(&h).await;
    let uri = format!("/delete/{}", user.id);

    assert_eq!(h.get(&uri).await.status(), StatusCode::SEE_OTHER);
    assert_eq!(h.get(&uri).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_over_body_limit_is_rejected() {
    let mut config = userbook::config::Config::default();
    config.server.max_upload_bytes = 1024;
    let h = TestHarness::with_config(config);

    let big = vec![b'x'; 4096];
    let form = MultipartForm::user("Ana", "a@x.com", "555").file("image", "big.bin", &big);
    let resp = h.post_form("/add", form).await;

    // The multipart reader fails, so create reports back on the form
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/add"));
    assert!(h.ctx.users.list().await.unwrap().is_empty());
    assert_eq!(h.upload_count(), 0);
}
