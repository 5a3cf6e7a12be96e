//! Test helpers: build the real router over in-memory stores and a temporary upload root.
//!
//! Run with: `cargo test -p vitrine-api`. No database is needed.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use vitrine_api::constants;
use vitrine_api::setup::routes;
use vitrine_api::state::AppState;
use vitrine_core::config::{BaseConfig, LibraryConfig};
use vitrine_core::Config;
use vitrine_db::test_helpers::{InMemoryMediaStore, InMemoryUserStore};
use vitrine_storage::LocalStorage;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_PASSWORD: &str = "correct-horse";
pub const TEST_MAX_UPLOAD_BYTES: u64 = 64 * 1024;

/// API path with version prefix (e.g. `/api/v1/media`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Test application: server plus handles on its stores and upload root.
pub struct TestApp {
    pub server: TestServer,
    pub media: Arc<InMemoryMediaStore>,
    pub users: Arc<InMemoryUserStore>,
    pub upload_root: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Create an account and return a bearer token for it.
    pub async fn login_as(&self, username: &str) -> String {
        self.users
            .insert_user(username, TEST_PASSWORD)
            .await
            .expect("Failed to create test user");

        let response = self
            .server
            .post(&api_path("/login"))
            .json(&serde_json::json!({ "username": username, "password": TEST_PASSWORD }))
            .await;
        assert_eq!(response.status_code(), 200);

        let body: serde_json::Value = response.json();
        body["token"]
            .as_str()
            .expect("Expected 'token' in login response")
            .to_string()
    }

    pub fn file_count(&self) -> usize {
        count_files(&self.upload_root)
    }
}

fn count_files(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(Result::ok)
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}

pub fn test_config(upload_path: PathBuf) -> Config {
    Config::new(LibraryConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 1,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_expiry_hours: 1,
            environment: "test".to_string(),
        },
        database_url: "postgresql://localhost/vitrine_test".to_string(),
        upload_path,
        max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
    })
}

/// Setup test app with in-memory stores and local storage in a temp directory.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let upload_root = temp_dir.path().join("uploads");
    let storage = Arc::new(
        LocalStorage::new(&upload_root)
            .await
            .expect("Failed to create local storage"),
    );

    let media = Arc::new(InMemoryMediaStore::new());
    let users = Arc::new(InMemoryUserStore::new());
    let config = test_config(upload_root.clone());

    let state = Arc::new(AppState::new(
        config.clone(),
        media.clone(),
        users.clone(),
        storage,
    ));
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        media,
        users,
        upload_root,
        _temp_dir: temp_dir,
    }
}

/// Multipart form with an optional declared size and one `file` part.
pub fn upload_form(
    filename: &str,
    content_type: &str,
    data: Vec<u8>,
    declared_size: Option<u64>,
) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(filename.to_string())
        .mime_type(content_type.to_string());

    let form = MultipartForm::new();
    let form = match declared_size {
        Some(size) => form.add_text("size", size.to_string()),
        None => form,
    };
    form.add_part("file", part)
}

/// Upload a small PNG-typed file and return the created record as JSON.
pub async fn upload_image(app: &TestApp, token: &str, filename: &str, len: usize) -> serde_json::Value {
    let response = app
        .client()
        .post(&api_path("/media/upload"))
        .add_header("Authorization", bearer(token))
        .multipart(upload_form(filename, "image/png", vec![0x89; len], None))
        .await;
    assert_eq!(response.status_code(), 201);

    let body: serde_json::Value = response.json();
    body["media"].clone()
}
