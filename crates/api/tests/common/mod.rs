//! Shared harness for the API integration tests.
//!
//! The app is built through the production [`build_app_router`] with
//! in-memory stand-ins for the database, the photo directory and the
//! mailer, so these tests run without Postgres or SMTP.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};
use tower::ServiceExt;

use wealthlist_api::config::AppConfig;
use wealthlist_api::mail::{MailError, Mailer, OutgoingMail};
use wealthlist_api::router::build_app_router;
use wealthlist_api::state::AppState;
use wealthlist_api::storage::{PhotoFile, PhotoStorage};
use wealthlist_core::pagination::{PageRequest, Paginated};
use wealthlist_core::search::MillionaireFilter;
use wealthlist_core::types::DbId;
use wealthlist_db::models::millionaire::{Millionaire, MillionaireInput};
use wealthlist_db::MillionaireStore;

pub const PHOTO_DIR: &str = "uploads/photos";
pub const BOUNDARY: &str = "X-WEALTHLIST-TEST-BOUNDARY";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Defaults from an empty environment, with a small upload cap.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::from_lookup(|_| None).unwrap();
    config.server.host = "127.0.0.1".to_string();
    config.photos.dir = PHOTO_DIR.to_string();
    config.photos.max_upload_bytes = 64 * 1024;
    config
}

// ---------------------------------------------------------------------------
// In-memory record store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Millionaire>>,
    next_id: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    /// Make every subsequent call fail like an unreachable database.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<Millionaire> {
        self.rows.lock().unwrap().clone()
    }

    pub fn get(&self, id: DbId) -> Option<Millionaire> {
        self.rows().into_iter().find(|m| m.id == id)
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

fn contains(haystack: Option<&str>, needle: &str) -> bool {
    needle.is_empty()
        || haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

fn matches(m: &Millionaire, filter: &MillionaireFilter) -> bool {
    contains(Some(&m.last_name), &filter.last_name)
        && contains(Some(&m.first_name), &filter.first_name)
        && contains(m.middle_name.as_deref(), &filter.middle_name)
        && contains(m.country.as_deref(), &filter.country)
}

fn apply(m: &mut Millionaire, input: &MillionaireInput) {
    m.last_name = input.last_name.clone();
    m.first_name = input.first_name.clone();
    m.middle_name = input.middle_name.clone();
    m.birth_date = input.birth_date;
    m.birth_place = input.birth_place.clone();
    m.company = input.company.clone();
    m.net_worth = input.net_worth;
    m.industry = input.industry.clone();
    m.country = input.country.clone();
    m.biography = input.biography.clone();
    m.updated_at = Utc::now();
}

#[async_trait]
impl MillionaireStore for MemoryStore {
    async fn create(&self, input: &MillionaireInput) -> Result<Millionaire, sqlx::Error> {
        self.check()?;
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as DbId + 1;
        let mut row = Millionaire {
            id,
            last_name: String::new(),
            first_name: String::new(),
            middle_name: None,
            birth_date: None,
            birth_place: None,
            company: None,
            net_worth: None,
            industry: None,
            country: None,
            biography: None,
            path_to_photo: None,
            created_at: now,
            updated_at: now,
        };
        apply(&mut row, input);
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Millionaire>, sqlx::Error> {
        self.check()?;
        Ok(self.get(id))
    }

    async fn update(
        &self,
        id: DbId,
        input: &MillionaireInput,
    ) -> Result<Option<Millionaire>, sqlx::Error> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|m| m.id == id).map(|m| {
            apply(m, input);
            m.clone()
        }))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.id != id);
        Ok(rows.len() < before)
    }

    async fn search(
        &self,
        filter: &MillionaireFilter,
        page: PageRequest,
    ) -> Result<Paginated<Millionaire>, sqlx::Error> {
        self.check()?;
        let page = page.clamped();
        let mut matching: Vec<Millionaire> =
            self.rows().into_iter().filter(|m| matches(m, filter)).collect();
        matching.sort_by_key(|m| m.id);

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .collect();
        Ok(Paginated::new(items, total, page))
    }

    async fn top_by_net_worth(&self, limit: i64) -> Result<Vec<Millionaire>, sqlx::Error> {
        self.check()?;
        let mut rows = self.rows();
        rows.sort_by(|a, b| match (a.net_worth, b.net_worth) {
            (Some(x), Some(y)) => y.total_cmp(&x).then(a.id.cmp(&b.id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.id.cmp(&b.id),
        });
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn photo_path(&self, id: DbId) -> Result<Option<String>, sqlx::Error> {
        self.check()?;
        Ok(self.get(id).and_then(|m| m.path_to_photo))
    }

    async fn set_photo_path(&self, id: DbId, path: Option<&str>) -> Result<bool, sqlx::Error> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.path_to_photo = path.map(str::to_string);
                m.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn batch_set_photo_paths(&self, paths: &[(DbId, String)]) -> Result<u64, sqlx::Error> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if paths.iter().any(|(id, _)| !rows.iter().any(|m| m.id == *id)) {
            return Err(sqlx::Error::RowNotFound);
        }
        for (id, path) in paths {
            if let Some(m) = rows.iter_mut().find(|m| m.id == *id) {
                m.path_to_photo = Some(path.clone());
            }
        }
        Ok(paths.len() as u64)
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        self.check()
    }
}

// ---------------------------------------------------------------------------
// In-memory photo storage
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
    remove_calls: AtomicUsize,
}

impl MemoryStorage {
    pub fn insert(&self, name: &str, bytes: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhotoStorage for MemoryStorage {
    async fn save(
        &self,
        file_name: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> io::Result<u64> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let mut files = self.files.lock().unwrap();
        if files.contains_key(file_name) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        let len = bytes.len() as u64;
        files.insert(file_name.to_string(), bytes);
        Ok(len)
    }

    async fn open(&self, file_name: &str) -> io::Result<Option<PhotoFile>> {
        Ok(self.file(file_name).map(|bytes| PhotoFile {
            len: bytes.len() as u64,
            reader: Box::new(io::Cursor::new(bytes)),
        }))
    }

    async fn remove(&self, file_name: &str) -> io::Result<bool> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.files.lock().unwrap().remove(file_name).is_some())
    }
}

// ---------------------------------------------------------------------------
// Recording mailer
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    attempts: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingMailer {
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Build("relay refused the message".to_string()));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub storage: Arc<MemoryStorage>,
    pub mailer: Arc<RecordingMailer>,
}

/// Build the full application router over fresh in-memory doubles.
pub fn build_test_app() -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let storage = Arc::new(MemoryStorage::default());
    let mailer = Arc::new(RecordingMailer::default());

    let state = AppState::new(
        test_config(),
        store.clone(),
        storage.clone(),
        mailer.clone(),
    );

    TestApp {
        router: build_app_router(state),
        store,
        storage,
        mailer,
    }
}

/// Build the app with a caller-supplied photo storage.
pub fn build_test_app_with_storage(storage: Arc<dyn PhotoStorage>) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState::new(
        test_config(),
        store.clone(),
        storage,
        Arc::new(RecordingMailer::default()),
    );
    (build_app_router(state), store)
}

/// Insert a record directly through the store.
pub async fn seed(store: &MemoryStore, last_name: &str, first_name: &str, country: Option<&str>) -> Millionaire {
    store
        .create(&MillionaireInput {
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
            country: country.map(str::to_string),
            ..Default::default()
        })
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body.to_string()).await
}

pub async fn put_json(app: &Router, uri: &str, body: &Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body.to_string()).await
}

/// Send a raw body with a JSON content type.
pub async fn json_request(app: &Router, method: Method, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Send a multipart form with one file field.
pub async fn multipart(
    app: &Router,
    method: Method,
    uri: &str,
    field: &str,
    file_name: &str,
    bytes: &[u8],
) -> Response<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
