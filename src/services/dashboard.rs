use crate::AppContext;
use crate::api::FileShareApi;
use crate::models::{DiskSpaceInfo, FileRecord, ShareRecord};
use crate::services::error::DashboardError;
use crate::services::notifier::{Clipboard, Notifier, Translator};
use crate::services::share_actions::RefreshHook;
use crate::utils::busy::{BusyFlag, BusyGuard};
use crate::utils::recency::most_recent;
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Path segment under which public share links live
pub const SHARE_LINK_PATH: &str = "s";

/// Entries kept in the recent files and recent shares views
pub const RECENT_LIMIT: usize = 5;

/// Config key telling whether the backend can send emails
const SMTP_ENABLED_KEY: &str = "smtpEnabled";

type PendingLoad = Shared<BoxFuture<'static, Result<(), DashboardError>>>;

/// Last committed dashboard data. Replaced as a whole by a successful load.
#[derive(Debug, Clone, Default)]
struct DashboardState {
    disk_space: Option<DiskSpaceInfo>,
    recent_files: Vec<FileRecord>,
    recent_shares: Vec<ShareRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalState {
    pub is_upload_modal_open: bool,
    pub is_create_modal_open: bool,
}

/// Owned snapshot of everything the dashboard page renders
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub is_loading: bool,
    pub disk_space: Option<DiskSpaceInfo>,
    pub recent_files: Vec<FileRecord>,
    pub recent_shares: Vec<ShareRecord>,
    pub modals: ModalState,
    pub smtp_enabled: bool,
}

struct Inner {
    api: Arc<dyn FileShareApi>,
    notifier: Arc<dyn Notifier>,
    clipboard: Arc<dyn Clipboard>,
    translator: Arc<dyn Translator>,
    public_origin: String,
    state: RwLock<DashboardState>,
    loading: BusyFlag,
    upload_modal_open: AtomicBool,
    create_modal_open: AtomicBool,
    smtp_enabled: AtomicBool,
    in_flight: Mutex<Option<PendingLoad>>,
}

/// Loads disk usage, files and shares together and keeps the dashboard view model.
///
/// At most one load runs at a time: callers arriving while a load is pending
/// await that same load. The three fetches are committed together or not at all.
#[derive(Clone)]
pub struct DashboardAggregator {
    inner: Arc<Inner>,
}

/// Clears the in-flight slot once the load task finishes, even on panic.
struct InFlightReset(Arc<Inner>);

impl Drop for InFlightReset {
    fn drop(&mut self) {
        let mut slot = self
            .0
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
    }
}

impl DashboardAggregator {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            inner: Arc::new(Inner {
                api: ctx.api.clone(),
                notifier: ctx.notifier.clone(),
                clipboard: ctx.clipboard.clone(),
                translator: ctx.translator.clone(),
                public_origin: ctx.config.public_origin.trim_end_matches('/').to_string(),
                state: RwLock::new(DashboardState::default()),
                loading: BusyFlag::new(),
                upload_modal_open: AtomicBool::new(false),
                create_modal_open: AtomicBool::new(false),
                smtp_enabled: AtomicBool::new(false),
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Fetch disk usage, files and shares concurrently and commit them together.
    ///
    /// On failure the previous snapshot is kept and one error notification is raised.
    pub async fn load(&self) -> Result<(), DashboardError> {
        let pending = {
            let mut slot = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            match slot.as_ref() {
                Some(pending) => {
                    debug!("Dashboard load already in flight, joining it");
                    pending.clone()
                }
                None => {
                    let pending = self.start_load();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Spawn the load so it settles even if every caller stops waiting.
    /// Must be called with the in-flight slot locked.
    fn start_load(&self) -> PendingLoad {
        let guard = self.inner.loading.acquire();
        let inner = self.inner.clone();

        let task = tokio::spawn(async move {
            // drop order: the loading flag comes down before the slot is reopened
            let _reset = InFlightReset(inner.clone());
            let _guard: BusyGuard = guard;
            inner.fetch_and_commit().await
        });

        async move {
            task.await
                .unwrap_or_else(|e| Err(DashboardError::Interrupted(e.to_string())))
        }
        .boxed()
        .shared()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.is_set()
    }

    pub async fn disk_space(&self) -> Option<DiskSpaceInfo> {
        self.inner.state.read().await.disk_space.clone()
    }

    pub async fn recent_files(&self) -> Vec<FileRecord> {
        self.inner.state.read().await.recent_files.clone()
    }

    pub async fn recent_shares(&self) -> Vec<ShareRecord> {
        self.inner.state.read().await.recent_shares.clone()
    }

    pub async fn view(&self) -> DashboardView {
        let state = self.inner.state.read().await;
        DashboardView {
            is_loading: self.is_loading(),
            disk_space: state.disk_space.clone(),
            recent_files: state.recent_files.clone(),
            recent_shares: state.recent_shares.clone(),
            modals: self.modals(),
            smtp_enabled: self.smtp_enabled(),
        }
    }

    /// Copy the public link of `share` to the clipboard.
    ///
    /// Shares without an alias are not linkable yet; that is a silent no-op
    /// returning `Ok(None)`.
    pub fn copy_share_link(&self, share: &ShareRecord) -> Result<Option<String>, DashboardError> {
        let Some(alias) = share.alias_token() else {
            return Ok(None);
        };

        let link = self.share_link(alias);
        let inner = &self.inner;

        if let Err(e) = inner.clipboard.write_text(&link) {
            warn!("Failed to copy share link for {}: {}", share.id, e);
            inner
                .notifier
                .error(&inner.translator.resolve("dashboard.linkCopyError"));
            return Err(DashboardError::Clipboard(e.to_string()));
        }

        inner
            .notifier
            .success(&inner.translator.resolve("dashboard.linkCopied"));
        Ok(Some(link))
    }

    pub fn share_link(&self, alias: &str) -> String {
        format!("{}/{}/{}", self.inner.public_origin, SHARE_LINK_PATH, alias)
    }

    /// Re-read the `smtpEnabled` config value. Failures keep the previous value.
    pub async fn refresh_smtp_enabled(&self) -> bool {
        match self.inner.api.get_config_value(SMTP_ENABLED_KEY).await {
            Ok(value) => {
                let enabled = value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
                self.inner.smtp_enabled.store(enabled, Ordering::Release);
                enabled
            }
            Err(e) => {
                warn!("Failed to read {}: {}", SMTP_ENABLED_KEY, e);
                self.smtp_enabled()
            }
        }
    }

    pub fn smtp_enabled(&self) -> bool {
        self.inner.smtp_enabled.load(Ordering::Acquire)
    }

    pub fn modals(&self) -> ModalState {
        ModalState {
            is_upload_modal_open: self.inner.upload_modal_open.load(Ordering::Acquire),
            is_create_modal_open: self.inner.create_modal_open.load(Ordering::Acquire),
        }
    }

    pub fn open_upload_modal(&self) {
        self.inner.upload_modal_open.store(true, Ordering::Release);
    }

    pub fn close_upload_modal(&self) {
        self.inner.upload_modal_open.store(false, Ordering::Release);
    }

    pub fn open_create_modal(&self) {
        self.inner.create_modal_open.store(true, Ordering::Release);
    }

    pub fn close_create_modal(&self) {
        self.inner.create_modal_open.store(false, Ordering::Release);
    }
}

impl Inner {
    async fn fetch_and_commit(&self) -> Result<(), DashboardError> {
        info!("📊 Loading dashboard data...");

        let fetched = tokio::try_join!(
            self.api.get_disk_space(),
            self.api.list_files(),
            self.api.list_user_shares()
        );

        let (disk_space, files, shares) = match fetched {
            Ok(results) => results,
            Err(e) => {
                error!("❌ Dashboard load failed, keeping previous snapshot: {}", e);
                self.notifier
                    .error(&self.translator.resolve("dashboard.loadError"));
                return Err(DashboardError::Load(Arc::new(e)));
            }
        };

        let recent_files = most_recent(&files, RECENT_LIMIT);
        let recent_shares = most_recent(&shares, RECENT_LIMIT);

        let mut state = self.state.write().await;
        *state = DashboardState {
            disk_space: Some(disk_space),
            recent_files,
            recent_shares,
        };

        info!(
            "✅ Dashboard loaded: {} files, {} shares",
            files.len(),
            shares.len()
        );
        Ok(())
    }
}

#[async_trait]
impl RefreshHook for DashboardAggregator {
    async fn refresh(&self) {
        // failures are already reported through the notifier
        let _ = self.load().await;
    }
}
