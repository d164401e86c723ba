pub mod client;
pub mod error;
pub mod types;

use crate::models::{DiskSpaceInfo, FileRecord, ShareRecord, ShareUpdate};
use async_trait::async_trait;
use error::ApiError;

pub use client::HttpApiClient;

/// Operations the dashboard and share dialogs consume from the backend.
#[async_trait]
pub trait FileShareApi: Send + Sync {
    async fn get_disk_space(&self) -> Result<DiskSpaceInfo, ApiError>;

    async fn list_files(&self) -> Result<Vec<FileRecord>, ApiError>;

    async fn list_user_shares(&self) -> Result<Vec<ShareRecord>, ApiError>;

    /// Metadata update (name, expiration, max views)
    async fn update_share(&self, update: &ShareUpdate) -> Result<(), ApiError>;

    /// Set the share password. An empty password removes protection.
    async fn update_share_password(&self, share_id: &str, password: &str) -> Result<(), ApiError>;

    async fn delete_share(&self, share_id: &str) -> Result<(), ApiError>;

    /// Replace the set of files attached to a share
    async fn update_share_files(&self, share_id: &str, file_ids: &[String]) -> Result<(), ApiError>;

    /// Replace the set of recipient emails notified about a share
    async fn update_share_recipients(&self, share_id: &str, emails: &[String]) -> Result<(), ApiError>;

    /// Read a public app config value, `None` when the key is unset
    async fn get_config_value(&self, key: &str) -> Result<Option<String>, ApiError>;
}
