mod helpers;

use axum::http::StatusCode;
use helpers::{admin_auth, basic_auth, setup_test_app, setup_test_app_with, TestApp, ADMIN_USER};
use shutterbox_storage::Storage;

/// Uploads three photos; the review queue lists them newest first.
async fn seed_three(app: &TestApp) {
    for name in ["alpha.png", "bravo.png", "charlie.png"] {
        let response = app.upload_png(name, 40, 30).await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    }
}

#[tokio::test]
async fn test_review_queue_requires_auth() {
    let app = setup_test_app().await;

    let response = app.client().get("/approve").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.header("www-authenticate"),
        r#"Basic realm="shutterbox""#
    );
}

#[tokio::test]
async fn test_review_queue_rejects_wrong_password() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/approve")
        .add_header("Authorization", basic_auth(ADMIN_USER, "hunter2"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_review_queue_lists_newest_first() {
    let app = setup_test_app().await;
    seed_three(&app).await;

    let response = app
        .client()
        .get("/approve")
        .add_header("Authorization", admin_auth())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    let charlie = body.find("charlie.png").unwrap();
    let bravo = body.find("bravo.png").unwrap();
    let alpha = body.find("alpha.png").unwrap();
    assert!(charlie < bravo && bravo < alpha);
    assert!(body.contains(r#"name="index" value="2""#));
}

#[tokio::test]
async fn test_approve_tags_entry_at_index() {
    let app = setup_test_app().await;
    seed_three(&app).await;

    // Index 1 of [charlie, bravo, alpha]
    let response = app.approve("1", None).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
    assert_eq!(app.tag_of("upload/bravo.png").await.as_deref(), Some("true"));
    assert_eq!(app.tag_of("upload/alpha.png").await, None);
    assert_eq!(app.tag_of("upload/charlie.png").await, None);

    let gallery = app.client().get("/").await.text();
    assert!(gallery.contains("bravo.png"));
    assert!(!gallery.contains("alpha.png"));
    assert!(!gallery.contains("charlie.png"));
}

#[tokio::test]
async fn test_approve_with_matching_key() {
    let app = setup_test_app().await;
    seed_three(&app).await;

    let response = app.approve("0", Some("upload/charlie.png")).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        app.tag_of("upload/charlie.png").await.as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn test_approve_out_of_range_is_bad_request() {
    let app = setup_test_app().await;
    seed_three(&app).await;

    let response = app.approve("3", None).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    for key in ["upload/alpha.png", "upload/bravo.png", "upload/charlie.png"] {
        assert_eq!(app.tag_of(key).await, None);
    }
}

#[tokio::test]
async fn test_approve_non_numeric_index_is_bad_request() {
    let app = setup_test_app().await;
    seed_three(&app).await;

    let response = app.approve("first", None).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_approve_on_empty_queue_is_bad_request() {
    let app = setup_test_app().await;

    let response = app.approve("0", None).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_approve_key_mismatch_is_conflict() {
    let app = setup_test_app().await;
    seed_three(&app).await;

    // The queue shifted since the admin loaded the page
    let response = app.approve("1", Some("upload/alpha.png")).await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    for key in ["upload/alpha.png", "upload/bravo.png", "upload/charlie.png"] {
        assert_eq!(app.tag_of(key).await, None);
    }
}

#[tokio::test]
async fn test_unauthenticated_approve_does_not_mutate() {
    let app = setup_test_app().await;
    seed_three(&app).await;

    let response = app
        .client()
        .post("/approve-submit")
        .form(&[("index", "0")])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.tag_of("upload/charlie.png").await, None);
}

#[tokio::test]
async fn test_approve_storage_failure_still_redirects() {
    let app = setup_test_app().await;
    seed_three(&app).await;
    app.storage.set_read_only(true);

    let response = app.approve("0", None).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(app.tag_of("upload/charlie.png").await, None);
}

#[tokio::test]
async fn test_rename_mode_promotes_to_latest() {
    let app = setup_test_app_with(r#""APPROVAL_MODE": "rename""#).await;
    seed_three(&app).await;

    let response = app.approve("2", Some("upload/alpha.png")).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert!(app.storage.head("latest").await.is_ok());
    assert!(app.storage.head("upload/alpha.png").await.unwrap_err().is_not_found());
    assert_eq!(app.storage.len().await, 3);

    let queue = app
        .client()
        .get("/approve")
        .add_header("Authorization", admin_auth())
        .await
        .text();
    assert!(!queue.contains("alpha.png"));
    assert!(queue.contains("bravo.png"));

    let gallery = app.client().get("/").await.text();
    assert!(gallery.contains(r#"alt="latest""#));
    assert!(!gallery.contains("bravo.png"));
}
