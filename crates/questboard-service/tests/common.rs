//! Common test utilities for questboard integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum::Router;
use axum_test::{TestRequest, TestServer};
use serde_json::json;
use tempfile::TempDir;

use questboard_core::{Catalog, Ledger, StudentId};
use questboard_service::{create_router, AppState, ServiceConfig};
use questboard_store::{RocksStore, Store, UnitOfWork};

/// A registered and logged-in student.
pub struct TestStudent {
    /// Student ID.
    pub id: StudentId,
    /// Session token.
    pub token: String,
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct store access for arranging state.
    pub store: Arc<RocksStore>,
    /// Where avatars are written.
    pub upload_dir: PathBuf,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh, seeded database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let data_dir = temp_dir.path().join("db");
        let upload_dir = temp_dir.path().join("avatares");

        let store = Arc::new(RocksStore::open(&data_dir).expect("Failed to open store"));
        store
            .seed_catalog(&Catalog::default_seed())
            .expect("Failed to seed catalog");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: data_dir.to_string_lossy().to_string(),
            upload_dir: upload_dir.to_string_lossy().to_string(),
            session_secret: "test-session-secret".into(),
            session_ttl_seconds: 3600,
            session_issuer: "questboard".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 5 * 1024 * 1024,
            request_timeout_seconds: 30,
            seed_catalog: true,
        };

        let state = AppState::new(Arc::clone(&store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            upload_dir,
            _temp_dir: temp_dir,
        }
    }

    /// Register a student and log in.
    pub async fn student(&self, name: &str) -> TestStudent {
        let email = format!("{name}@example.com");

        let response = self
            .server
            .post("/v1/auth/register")
            .json(&json!({ "name": name, "email": email, "password": "secreto1" }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let response = self
            .server
            .post("/v1/auth/login")
            .json(&json!({ "email": email, "password": "secreto1" }))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        TestStudent {
            id: body["student"]["id"]
                .as_str()
                .expect("student id")
                .parse()
                .expect("valid student id"),
            token: body["token"].as_str().expect("token").to_string(),
        }
    }

    /// Set a student's points directly.
    pub fn set_points(&self, id: &StudentId, points: i64) {
        let mut uow = UnitOfWork::begin(self.store.as_ref(), id).expect("student exists");
        uow.student_mut().points = points;
        uow.commit().expect("commit");
    }

    /// Set a student's experience and level directly.
    pub fn set_xp(&self, id: &StudentId, xp: i64, level: u32) {
        let mut uow = UnitOfWork::begin(self.store.as_ref(), id).expect("student exists");
        uow.student_mut().xp = xp;
        uow.student_mut().level = level;
        uow.commit().expect("commit");
    }

    /// Current stored points.
    pub fn points(&self, id: &StudentId) -> i64 {
        self.store
            .get_student(id)
            .expect("read")
            .expect("student exists")
            .points
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Attach a student's session as a Bearer header.
pub fn authed(request: TestRequest, student: &TestStudent) -> TestRequest {
    let value = HeaderValue::from_str(&format!("Bearer {}", student.token)).expect("header value");
    request.add_header(AUTHORIZATION, value)
}
