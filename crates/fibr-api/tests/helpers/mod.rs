//! Shared helpers for router tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use fibr_api::{AppState, build_app};
use fibr_auth::BasicUserAuthenticator;
use fibr_core::config::AppConfig;
use fibr_core::traits::jobs::{JobSubmitter, NoopSubmitter};
use fibr_core::traits::storage::Storage;
use fibr_service::{AccessService, CrudService, JsonFileShareStore, ShareRegistry};
use fibr_storage::{ImageRenderer, LocalStorage, Thumbnailer};

/// Owner login.
pub const OWNER: &str = "admin";
/// Owner password.
pub const OWNER_PASSWORD: &str = "secret";

/// Multipart boundary used by [`multipart`].
const BOUNDARY: &str = "fibr-test-boundary";

/// Test application over a temporary served root.
pub struct TestApp {
    pub dir: TempDir,
    pub router: Router,
    pub storage: Arc<dyn Storage>,
    pub registry: Arc<ShareRegistry>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(1024 * 1024, Arc::new(NoopSubmitter)).await
    }

    pub async fn with_upload_limit(max_upload_size: u64) -> Self {
        Self::build(max_upload_size, Arc::new(NoopSubmitter)).await
    }

    pub async fn build(max_upload_size: u64, jobs: Arc<dyn JobSubmitter>) -> Self {
        let dir = tempfile::tempdir().unwrap();

        let mut config = AppConfig::default();
        config.storage.root_directory = dir.path().to_str().unwrap().to_string();
        config.storage.max_upload_size_bytes = max_upload_size;
        config.auth.users = vec![format!(
            "{OWNER}:{}",
            bcrypt::hash(OWNER_PASSWORD, 4).unwrap()
        )];

        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(&config.storage.root_directory)
                .await
                .unwrap(),
        );
        let registry = Arc::new(
            ShareRegistry::load(Arc::new(JsonFileShareStore::new(Arc::clone(&storage))))
                .await
                .unwrap(),
        );
        let authenticator = Arc::new(BasicUserAuthenticator::from_config(&config.auth).unwrap());
        let thumbnailer = Thumbnailer::new(
            Arc::clone(&storage),
            Arc::new(ImageRenderer),
            config.thumbnail.size,
        );
        let crud = Arc::new(CrudService::new(
            Arc::clone(&storage),
            Arc::clone(&registry),
            thumbnailer.clone(),
            jobs,
            config.ui.clone(),
            config.storage.max_upload_size_bytes,
        ));
        let access = Arc::new(AccessService::new(Arc::clone(&registry), authenticator));

        let state = AppState::new(Arc::new(config), access, crud, thumbnailer);

        Self {
            dir,
            router: build_app(state),
            storage,
            registry,
        }
    }

    /// Absolute path of `relative` in the served root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative.trim_start_matches('/'))
    }

    /// Write a file under the served root, creating parents.
    pub fn write(&self, relative: &str, content: &[u8]) {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Send a request without body.
    pub async fn request(&self, method: &str, uri: &str, authorization: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(authorization) = authorization {
            builder = builder.header("Authorization", authorization);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Send a URL-encoded form.
    pub async fn form(
        &self,
        method: &str,
        uri: &str,
        form: &str,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/x-www-form-urlencoded");
        if let Some(authorization) = authorization {
            builder = builder.header("Authorization", authorization);
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap())
            .await
    }

    /// Upload files as `multipart/form-data`.
    pub async fn upload(
        &self,
        uri: &str,
        files: &[(&str, &str, &[u8])],
        authorization: Option<&str>,
    ) -> TestResponse {
        let (content_type, body) = multipart(files);
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", content_type);
        if let Some(authorization) = authorization {
            builder = builder.header("Authorization", authorization);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }
}

/// Response of a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// `Authorization` value for Basic credentials.
pub fn basic(login: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{login}:{password}")))
}

/// `Authorization` value of the owner.
pub fn owner() -> String {
    basic(OWNER, OWNER_PASSWORD)
}

/// Encode `(field, filename, content)` parts as a multipart body.
pub fn multipart(files: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (field, filename, content) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Names of the items of a listing response.
pub fn item_names(listing: &Value) -> Vec<String> {
    listing["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}
