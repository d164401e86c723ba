use chrono::{DateTime, Utc};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use validator::Validate;

/// Records the dashboard ranks by recency.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

/// Disk usage snapshot reported by the backend, in gigabytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DiskSpaceInfo {
    #[serde(rename = "diskSizeGB")]
    #[validate(range(min = 0.0, message = "Disk size must not be negative"))]
    pub disk_size_gb: f64,
    #[serde(rename = "diskUsedGB")]
    #[validate(range(min = 0.0, message = "Used space must not be negative"))]
    pub disk_used_gb: f64,
    #[serde(rename = "diskAvailableGB")]
    #[validate(range(min = 0.0, message = "Available space must not be negative"))]
    pub disk_available_gb: f64,
    #[serde(rename = "uploadAllowed")]
    pub upload_allowed: bool,
}

impl DiskSpaceInfo {
    /// Percentage of the disk in use, 0.0 when the size is unknown.
    pub fn usage_percent(&self) -> f64 {
        if self.disk_size_gb <= 0.0 {
            0.0
        } else {
            (self.disk_used_gb / self.disk_size_gb) * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub name: Option<String>,
    /// Fields owned by the file-management side, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Timestamped for FileRecord {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareAlias {
    pub alias: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSecurity {
    #[serde(default)]
    pub has_password: bool,
    #[serde(default)]
    pub max_views: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecipient {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,
    #[serde(default)]
    pub alias: Option<ShareAlias>,
    #[serde(default)]
    pub security: ShareSecurity,
    #[serde(default)]
    pub files: Vec<FileRef>,
    #[serde(default)]
    pub recipients: Vec<ShareRecipient>,
}

impl ShareRecord {
    /// The public alias token, if the share is linkable.
    pub fn alias_token(&self) -> Option<&str> {
        self.alias
            .as_ref()
            .map(|a| a.alias.as_str())
            .filter(|alias| !alias.is_empty())
    }
}

impl Timestamped for ShareRecord {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Per-field update: leave as is, set to a value, or clear to "no value".
///
/// `Unchanged` must be skipped on the wire (pair it with
/// `skip_serializing_if = "FieldUpdate::is_unchanged"`); serializing it is an
/// error so it can never turn into `null`. `Cleared` is sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Unchanged,
    Set(T),
    Cleared,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Unchanged
    }
}

impl<T> FieldUpdate<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldUpdate::Unchanged)
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, FieldUpdate::Cleared)
    }
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldUpdate::Set(value) => value.serialize(serializer),
            FieldUpdate::Cleared => serializer.serialize_none(),
            FieldUpdate::Unchanged => Err(S::Error::custom(
                "unchanged field must be skipped with skip_serializing_if",
            )),
        }
    }
}

/// Metadata update payload for `PUT /api/shares`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareUpdate {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub expiration: FieldUpdate<DateTime<Utc>>,
    #[serde(skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub max_views: FieldUpdate<u32>,
}
