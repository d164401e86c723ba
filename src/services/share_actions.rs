use crate::AppContext;
use crate::api::FileShareApi;
use crate::models::{FieldUpdate, ShareRecord, ShareUpdate};
use crate::services::error::ShareActionError;
use crate::services::notifier::{Notifier, Translator};
use crate::utils::busy::BusyFlag;
use crate::utils::validation::{format_local_datetime, parse_local_datetime, parse_max_views};
use async_trait::async_trait;
use chrono::{Local, TimeZone};
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info};

/// Called after a share changed so the owner can re-read its share list.
#[async_trait]
pub trait RefreshHook: Send + Sync {
    async fn refresh(&self);
}

/// Text fields of the edit dialog, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditShareForm {
    pub name: String,
    /// Local wall-clock time, `YYYY-MM-DDTHH:MM`, blank for none
    pub expires_at: String,
    pub is_password_protected: bool,
    /// New password; blank keeps the current one
    pub password: String,
    /// Blank for "no limit"
    pub max_views: String,
}

impl EditShareForm {
    /// Pre-populate the form from the share being edited.
    pub fn from_share<Tz: TimeZone>(share: &ShareRecord, tz: &Tz) -> Self
    where
        Tz::Offset: Display,
    {
        Self {
            name: share.name.clone().unwrap_or_default(),
            expires_at: share
                .expiration
                .map(|exp| format_local_datetime(&exp, tz))
                .unwrap_or_default(),
            is_password_protected: share.security.has_password,
            password: String::new(),
            max_views: share
                .security
                .max_views
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }

    /// Toggling protection always discards a half-typed password.
    pub fn set_password_protected(&mut self, protected: bool) {
        self.is_password_protected = protected;
        self.password.clear();
    }
}

/// What the edit does to the password sub-resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordAction {
    Keep,
    Clear,
    Set(String),
}

impl PasswordAction {
    pub fn decide(form: &EditShareForm, share: &ShareRecord) -> Self {
        if !form.is_password_protected && share.security.has_password {
            PasswordAction::Clear
        } else if form.is_password_protected && !form.password.is_empty() {
            PasswordAction::Set(form.password.clone())
        } else {
            PasswordAction::Keep
        }
    }
}

/// Build the metadata payload. Blank expiration is left untouched, blank max views clears the limit.
pub fn build_share_update<Tz: TimeZone>(
    form: &EditShareForm,
    share: &ShareRecord,
    tz: &Tz,
) -> Result<ShareUpdate, ShareActionError> {
    let expiration = parse_local_datetime(&form.expires_at, tz)
        .map_err(|e| ShareActionError::InvalidForm(e.to_string()))?
        .map_or(FieldUpdate::Unchanged, FieldUpdate::Set);

    let max_views = parse_max_views(&form.max_views)
        .map_err(|e| ShareActionError::InvalidForm(e.to_string()))?
        .map_or(FieldUpdate::Cleared, FieldUpdate::Set);

    Ok(ShareUpdate {
        id: share.id.clone(),
        name: form.name.clone(),
        expiration,
        max_views,
    })
}

/// Shares currently targeted by each dialog; `None` means the dialog is closed.
#[derive(Debug, Clone, Default)]
pub struct DialogTargets {
    pub edit: Option<ShareRecord>,
    pub delete: Option<ShareRecord>,
    pub manage_files: Option<ShareRecord>,
    pub manage_recipients: Option<ShareRecord>,
}

/// Edit, delete and manage-files/recipients workflows behind the share dialogs.
pub struct ShareActions<Tz: TimeZone = Local> {
    api: Arc<dyn FileShareApi>,
    notifier: Arc<dyn Notifier>,
    translator: Arc<dyn Translator>,
    refresh: Arc<dyn RefreshHook>,
    tz: Tz,
    busy: BusyFlag,
    targets: Mutex<DialogTargets>,
}

impl ShareActions<Local> {
    pub fn new(ctx: &AppContext, refresh: Arc<dyn RefreshHook>) -> Self {
        Self::with_timezone(ctx, refresh, Local)
    }
}

impl<Tz> ShareActions<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: Display + Send + Sync,
{
    /// Interpret the form's local datetimes in `tz` instead of the system zone.
    pub fn with_timezone(ctx: &AppContext, refresh: Arc<dyn RefreshHook>, tz: Tz) -> Self {
        Self {
            api: ctx.api.clone(),
            notifier: ctx.notifier.clone(),
            translator: ctx.translator.clone(),
            refresh,
            tz,
            busy: BusyFlag::new(),
            targets: Mutex::new(DialogTargets::default()),
        }
    }

    fn targets_mut(&self) -> MutexGuard<'_, DialogTargets> {
        self.targets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn targets(&self) -> DialogTargets {
        self.targets_mut().clone()
    }

    /// True while a submit from one of the dialogs is pending
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    pub fn open_edit(&self, share: &ShareRecord) -> EditShareForm {
        self.targets_mut().edit = Some(share.clone());
        EditShareForm::from_share(share, &self.tz)
    }

    pub fn close_edit(&self) {
        self.targets_mut().edit = None;
    }

    pub fn open_delete(&self, share: &ShareRecord) {
        self.targets_mut().delete = Some(share.clone());
    }

    pub fn close_delete(&self) {
        self.targets_mut().delete = None;
    }

    /// Returns the ids of the files already attached, the dialog's initial selection.
    pub fn open_manage_files(&self, share: &ShareRecord) -> Vec<String> {
        self.targets_mut().manage_files = Some(share.clone());
        selected_file_ids(share)
    }

    pub fn close_manage_files(&self) {
        self.targets_mut().manage_files = None;
    }

    /// Returns the current recipient emails.
    pub fn open_manage_recipients(&self, share: &ShareRecord) -> Vec<String> {
        self.targets_mut().manage_recipients = Some(share.clone());
        share.recipients.iter().map(|r| r.email.clone()).collect()
    }

    pub fn close_manage_recipients(&self) {
        self.targets_mut().manage_recipients = None;
    }

    /// Apply the edit form: metadata first, then the password if it changes.
    ///
    /// A failed password step does not undo the metadata update; the dialog stays
    /// open so the user can resubmit. Nothing is sent unless the edit dialog is
    /// open on `share`.
    pub async fn submit_edit(
        &self,
        form: &EditShareForm,
        share: &ShareRecord,
    ) -> Result<(), ShareActionError> {
        ensure_target(&self.targets_mut().edit, share)?;
        let busy = self.busy.try_acquire().ok_or(ShareActionError::InFlight)?;
        let result = self.apply_edit(form, share).await;
        drop(busy);

        match result {
            Ok(()) => {
                info!("✏️  Share {} updated", share.id);
                self.refresh.refresh().await;
                self.close_edit();
                self.notify_success("shareActions.editSuccess");
                Ok(())
            }
            Err(e) => {
                error!("Failed to update share {}: {}", share.id, e);
                self.notify_error("shareActions.editError");
                Err(e)
            }
        }
    }

    async fn apply_edit(
        &self,
        form: &EditShareForm,
        share: &ShareRecord,
    ) -> Result<(), ShareActionError> {
        let update = build_share_update(form, share, &self.tz)?;
        self.api.update_share(&update).await?;

        match PasswordAction::decide(form, share) {
            PasswordAction::Keep => {}
            PasswordAction::Clear => {
                self.api.update_share_password(&share.id, "").await?;
            }
            PasswordAction::Set(password) => {
                self.api.update_share_password(&share.id, &password).await?;
            }
        }
        Ok(())
    }

    /// Delete a share. A second submit while the first is pending is rejected.
    pub async fn submit_delete(&self, share: &ShareRecord) -> Result<(), ShareActionError> {
        ensure_target(&self.targets_mut().delete, share)?;
        let busy = self.busy.try_acquire().ok_or(ShareActionError::InFlight)?;
        let result = self.api.delete_share(&share.id).await;
        drop(busy);

        match result {
            Ok(()) => {
                info!("🗑️  Share {} deleted", share.id);
                self.refresh.refresh().await;
                self.close_delete();
                self.notify_success("shareActions.deleteSuccess");
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete share {}: {}", share.id, e);
                self.notify_error("shareActions.deleteError");
                Err(e.into())
            }
        }
    }

    pub async fn save_share_files(
        &self,
        share_id: &str,
        file_ids: &[String],
    ) -> Result<(), ShareActionError> {
        match self.api.update_share_files(share_id, file_ids).await {
            Ok(()) => {
                info!("📎 Share {} now has {} files", share_id, file_ids.len());
                self.refresh.refresh().await;
                self.close_manage_files();
                self.notify_success("shareActions.filesSuccess");
                Ok(())
            }
            Err(e) => {
                error!("Failed to update files of share {}: {}", share_id, e);
                self.notify_error("shareActions.filesError");
                Err(e.into())
            }
        }
    }

    pub async fn save_share_recipients(
        &self,
        share_id: &str,
        emails: &[String],
    ) -> Result<(), ShareActionError> {
        match self.api.update_share_recipients(share_id, emails).await {
            Ok(()) => {
                info!("📧 Share {} now has {} recipients", share_id, emails.len());
                self.refresh.refresh().await;
                self.close_manage_recipients();
                self.notify_success("shareActions.recipientsSuccess");
                Ok(())
            }
            Err(e) => {
                error!("Failed to update recipients of share {}: {}", share_id, e);
                self.notify_error("shareActions.recipientsError");
                Err(e.into())
            }
        }
    }

    fn notify_success(&self, key: &str) {
        self.notifier.success(&self.translator.resolve(key));
    }

    fn notify_error(&self, key: &str) {
        self.notifier.error(&self.translator.resolve(key));
    }
}

fn ensure_target(
    target: &Option<ShareRecord>,
    share: &ShareRecord,
) -> Result<(), ShareActionError> {
    match target {
        Some(open) if open.id == share.id => Ok(()),
        _ => {
            debug!("Ignoring submit for share {}: dialog not open on it", share.id);
            Err(ShareActionError::NoTarget)
        }
    }
}

pub fn selected_file_ids(share: &ShareRecord) -> Vec<String> {
    share.files.iter().map(|f| f.id.clone()).collect()
}
