//! Common test utilities for in-process API testing with mocks.
//!
//! The fixture assembles the full server surface — session, broadcaster,
//! router — over temp directories with mock editor and assembler, so tests
//! need no ffmpeg, no editor and no network listener.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use replayq_core::{
    load_config_from_str,
    testing::{MockAssembler, MockEditor},
    ArtifactKind, Session, SessionHandle, SlotPool, TransitionCycle, UpdateCallback,
};
use replayq_server::api::{create_router, WsBroadcaster};
use replayq_server::state::AppState;

/// Test fixture for in-process API testing with mock collaborators.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Handle into the session lane
    pub session: SessionHandle,
    /// Mock editor - inspect invocations
    pub editor: MockEditor,
    /// Mock assembler - inspect submitted jobs
    pub assembler: MockAssembler,
    /// Broadcaster wired to the session's update callback
    pub broadcaster: WsBroadcaster,
    /// Queue directory backing the pool
    pub queue_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with an empty pool of the given capacity.
    pub async fn new(capacity: usize) -> Self {
        Self::with_slots(capacity, &[]).await
    }

    /// Create a fixture with pre-seeded slots: (index, has_cut).
    pub async fn with_slots(capacity: usize, seeded: &[(usize, bool)]) -> Self {
        let queue_dir = TempDir::new().expect("Failed to create queue dir");

        let config = load_config_from_str(&format!(
            r#"
[input]
dir = "{input}"

[queue]
dir = "{queue}"
capacity = {capacity}

[editor]
program = "/usr/bin/losslesscut"
settings_json = "{{}}"

[server]
host = "127.0.0.1"
port = 8080
"#,
            input = queue_dir.path().join("inbox").display(),
            queue = queue_dir.path().display(),
        ))
        .expect("Failed to build test config");

        let mut pool = SlotPool::new(queue_dir.path(), capacity);
        for (slot, has_cut) in seeded {
            std::fs::write(pool.artifact(*slot, ArtifactKind::Original), b"original").unwrap();
            if *has_cut {
                std::fs::write(pool.artifact(*slot, ArtifactKind::Cut), b"cut").unwrap();
            }
        }
        pool.refresh().await;

        let editor = MockEditor::new();
        let assembler = MockAssembler::new();
        let broadcaster = WsBroadcaster::default();

        let broadcaster_for_callback = broadcaster.clone();
        let callback: UpdateCallback = Arc::new(move |view| {
            broadcaster_for_callback.broadcast(view);
        });

        let session = Session::new(
            pool,
            TransitionCycle::starting_at("fade").unwrap(),
            editor.clone(),
            assembler.clone(),
            queue_dir.path().join("export.mp4"),
        )
        .with_update_callback(callback)
        .spawn();

        let state = Arc::new(AppState::new(config, session.clone(), broadcaster.clone()));
        let router = create_router(state);

        Self {
            router,
            session,
            editor,
            assembler,
            broadcaster,
            queue_dir,
        }
    }

    /// Path of an artifact in the fixture's queue directory.
    pub fn artifact(&self, slot: usize, kind: ArtifactKind) -> PathBuf {
        replayq_core::artifact_path(self.queue_dir.path(), slot, kind)
    }

    /// GET a JSON endpoint.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// GET a plain-text endpoint.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        (status, String::from_utf8_lossy(&bytes).to_string())
    }
}
