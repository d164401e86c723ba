use crate::models::{FileRecord, ShareRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ListFilesResponse {
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ListSharesResponse {
    #[serde(default)]
    pub shares: Vec<ShareRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ConfigValueResponse {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSharePasswordRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateShareFilesRequest {
    pub files: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateShareRecipientsRequest {
    pub emails: Vec<String>,
}
