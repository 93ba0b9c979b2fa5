#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Rgb, RgbImage};
use shutterbox_api::setup::{build_app, templates::load_templates};
use shutterbox_api::state::AppState;
use shutterbox_core::Config;
use shutterbox_storage::{MemoryStorage, PhotoBucket};
use std::io::Cursor;
use std::sync::Arc;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "correct horse battery staple";
pub const TOAST: &str = "Thanks for sharing your photo";

const TEMPLATE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");

/// Test application backed by in-memory storage
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MemoryStorage>,
    pub state: Arc<AppState>,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Upload `data` as the `file` part of a multipart form.
    pub async fn upload(&self, filename: &str, mime: &str, data: Vec<u8>) -> TestResponse {
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(data).file_name(filename).mime_type(mime),
        );
        self.server.post("/upload").multipart(form).await
    }

    pub async fn upload_png(&self, filename: &str, width: u32, height: u32) -> TestResponse {
        self.upload(filename, "image/png", png(width, height, [200, 40, 40]))
            .await
    }

    pub async fn approve(&self, index: &str, key: Option<&str>) -> TestResponse {
        let mut form = vec![("index", index.to_string())];
        if let Some(key) = key {
            form.push(("key", key.to_string()));
        }
        self.server
            .post("/approve-submit")
            .add_header("Authorization", admin_auth())
            .form(&form)
            .await
    }

    pub async fn tag_of(&self, key: &str) -> Option<String> {
        use shutterbox_storage::Storage;
        self.storage
            .get_tags(key)
            .await
            .ok()
            .and_then(|tags| tags.get("approved").cloned())
    }
}

/// `extra` is spliced into the config document, e.g. `"APPROVAL_MODE": "rename"`.
pub async fn setup_test_app_with(extra: &str) -> TestApp {
    let extra = if extra.is_empty() {
        String::new()
    } else {
        format!(", {}", extra)
    };
    let config = Config::from_json(&format!(
        r#"{{
            "ADMIN_USER": "{ADMIN_USER}",
            "ADMIN_PASS": "{ADMIN_PASS}",
            "STORAGE_BACKEND": "memory",
            "APP_NAME": "Shutterbox Test",
            "PAGE_TITLE": "Photo of the day",
            "SUBMIT_TITLE": "Send a photo",
            "FILE_UPLOAD_SUCCESS_TOAST": "{TOAST}"
            {extra}
        }}"#
    ))
    .expect("test config should be valid");

    // Small pages so every listing crosses a continuation cursor
    let storage = Arc::new(MemoryStorage::with_page_size(2));
    let bucket = PhotoBucket::new(storage.clone(), config.presign_expiry());
    let templates = load_templates(TEMPLATE_DIR).expect("templates should load");

    let (state, router) = build_app(config, bucket, templates).expect("app should build");
    let server = TestServer::new(router).expect("test server should start");

    TestApp {
        server,
        storage,
        state,
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with("").await
}

pub fn basic_auth(user: &str, pass: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, pass)))
}

pub fn admin_auth() -> String {
    basic_auth(ADMIN_USER, ADMIN_PASS)
}

pub fn png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("png encode");
    buffer
}
