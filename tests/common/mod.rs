#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use share_dashboard::AppContext;
use share_dashboard::api::FileShareApi;
use share_dashboard::api::error::ApiError;
use share_dashboard::config::ClientConfig;
use share_dashboard::models::{
    DiskSpaceInfo, FileRecord, ShareAlias, ShareRecord, ShareSecurity, ShareUpdate,
};
use share_dashboard::services::notifier::{Clipboard, MessageCatalog, Notifier};
use share_dashboard::services::share_actions::RefreshHook;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn file(id: &str, minutes: i64) -> FileRecord {
    FileRecord {
        id: id.to_string(),
        created_at: at(minutes),
        name: Some(format!("{}.txt", id)),
        extra: Default::default(),
    }
}

pub fn share(id: &str, minutes: i64, alias: Option<&str>) -> ShareRecord {
    ShareRecord {
        id: id.to_string(),
        created_at: at(minutes),
        name: Some(format!("Share {}", id)),
        expiration: None,
        alias: alias.map(|a| ShareAlias {
            alias: a.to_string(),
        }),
        security: ShareSecurity::default(),
        files: vec![],
        recipients: vec![],
    }
}

pub fn disk(used: f64) -> DiskSpaceInfo {
    DiskSpaceInfo {
        disk_size_gb: 100.0,
        disk_used_gb: used,
        disk_available_gb: 100.0 - used,
        upload_allowed: used < 100.0,
    }
}

fn server_error(what: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        message: format!("{} failed", what),
    }
}

/// In-memory backend. Every call is appended to `calls`.
#[derive(Default)]
pub struct MockApi {
    pub disk: Mutex<Option<DiskSpaceInfo>>,
    pub files: Mutex<Vec<FileRecord>>,
    pub shares: Mutex<Vec<ShareRecord>>,
    pub fail_disk: AtomicBool,
    pub fail_files: AtomicBool,
    pub fail_shares: AtomicBool,
    pub fail_update_share: AtomicBool,
    pub fail_password: AtomicBool,
    pub fail_delete: AtomicBool,
    pub calls: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<ShareUpdate>>,
    pub list_files_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    /// When set, `list_files` waits for a notification before answering
    pub files_gate: Mutex<Option<Arc<Notify>>>,
    /// When set, `delete_share` waits for a notification before answering
    pub delete_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockApi {
    pub fn new(disk_info: DiskSpaceInfo, files: Vec<FileRecord>, shares: Vec<ShareRecord>) -> Self {
        Self {
            disk: Mutex::new(Some(disk_info)),
            files: Mutex::new(files),
            shares: Mutex::new(shares),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn hold_files(&self) {
        *self.files_gate.lock().unwrap() = Some(Arc::new(Notify::new()));
    }

    pub fn release_files(&self) {
        if let Some(gate) = self.files_gate.lock().unwrap().take() {
            gate.notify_one();
        }
    }

    pub fn hold_delete(&self) {
        *self.delete_gate.lock().unwrap() = Some(Arc::new(Notify::new()));
    }

    pub fn release_delete(&self) {
        if let Some(gate) = self.delete_gate.lock().unwrap().take() {
            gate.notify_one();
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl FileShareApi for MockApi {
    async fn get_disk_space(&self) -> Result<DiskSpaceInfo, ApiError> {
        self.record("get_disk_space".to_string());
        if self.fail_disk.load(Ordering::SeqCst) {
            return Err(server_error("disk space"));
        }
        self.disk
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| server_error("disk space"))
    }

    async fn list_files(&self) -> Result<Vec<FileRecord>, ApiError> {
        self.record("list_files".to_string());
        self.list_files_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.files_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_files.load(Ordering::SeqCst) {
            return Err(server_error("list files"));
        }
        Ok(self.files.lock().unwrap().clone())
    }

    async fn list_user_shares(&self) -> Result<Vec<ShareRecord>, ApiError> {
        self.record("list_user_shares".to_string());
        if self.fail_shares.load(Ordering::SeqCst) {
            return Err(server_error("list shares"));
        }
        Ok(self.shares.lock().unwrap().clone())
    }

    async fn update_share(&self, update: &ShareUpdate) -> Result<(), ApiError> {
        self.record(format!("update_share:{}", update.id));
        if self.fail_update_share.load(Ordering::SeqCst) {
            return Err(server_error("update share"));
        }
        self.updates.lock().unwrap().push(update.clone());
        Ok(())
    }

    async fn update_share_password(&self, share_id: &str, password: &str) -> Result<(), ApiError> {
        self.record(format!("update_share_password:{}:{}", share_id, password));
        if self.fail_password.load(Ordering::SeqCst) {
            return Err(server_error("update password"));
        }
        Ok(())
    }

    async fn delete_share(&self, share_id: &str) -> Result<(), ApiError> {
        self.record(format!("delete_share:{}", share_id));
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.delete_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(server_error("delete share"));
        }
        self.shares.lock().unwrap().retain(|s| s.id != share_id);
        Ok(())
    }

    async fn update_share_files(&self, share_id: &str, file_ids: &[String]) -> Result<(), ApiError> {
        self.record(format!("update_share_files:{}:{}", share_id, file_ids.join(",")));
        Ok(())
    }

    async fn update_share_recipients(&self, share_id: &str, emails: &[String]) -> Result<(), ApiError> {
        self.record(format!("update_share_recipients:{}:{}", share_id, emails.join(",")));
        Ok(())
    }

    async fn get_config_value(&self, key: &str) -> Result<Option<String>, ApiError> {
        self.record(format!("get_config_value:{}", key));
        Ok(None)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

pub struct FailingClipboard;

impl Clipboard for FailingClipboard {
    fn write_text(&self, _text: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("clipboard unavailable"))
    }
}

#[derive(Default)]
pub struct CountingRefresh {
    pub count: AtomicUsize,
}

impl CountingRefresh {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RefreshHook for CountingRefresh {
    async fn refresh(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn context(
    api: Arc<MockApi>,
    notifier: Arc<RecordingNotifier>,
    clipboard: Arc<dyn Clipboard>,
) -> AppContext {
    AppContext {
        api,
        notifier,
        clipboard,
        translator: Arc::new(MessageCatalog::default()),
        config: ClientConfig {
            public_origin: "https://example.com".to_string(),
            ..ClientConfig::default()
        },
    }
}

/// Yield to the runtime until `condition` holds.
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
