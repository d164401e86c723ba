use super::FileShareApi;
use super::error::ApiError;
use super::types::{
    ConfigValueResponse, ListFilesResponse, ListSharesResponse, UpdateShareFilesRequest,
    UpdateSharePasswordRequest, UpdateShareRecipientsRequest,
};
use crate::config::ClientConfig;
use crate::models::{DiskSpaceInfo, FileRecord, ShareRecord, ShareUpdate};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use validator::Validate;

/// `reqwest`-backed client for the file-sharing REST API.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpApiClient {
    pub fn new(client: Client, base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Self::new(client, &config.api_base_url, config.api_token.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("➡️  {} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let response = Self::send(self.request(Method::GET, url)).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_json<B: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(segments)?;
        Self::send(self.request(method, url).json(body)).await?;
        Ok(())
    }
}

#[async_trait]
impl FileShareApi for HttpApiClient {
    async fn get_disk_space(&self) -> Result<DiskSpaceInfo, ApiError> {
        let disk: DiskSpaceInfo = self.get_json(&["api", "storage", "disk-space"]).await?;
        disk.validate()?;
        Ok(disk)
    }

    async fn list_files(&self) -> Result<Vec<FileRecord>, ApiError> {
        let body: ListFilesResponse = self.get_json(&["api", "files"]).await?;
        Ok(body.files)
    }

    async fn list_user_shares(&self) -> Result<Vec<ShareRecord>, ApiError> {
        let body: ListSharesResponse = self.get_json(&["api", "shares", "me"]).await?;
        Ok(body.shares)
    }

    async fn update_share(&self, update: &ShareUpdate) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &["api", "shares"], update).await
    }

    async fn update_share_password(&self, share_id: &str, password: &str) -> Result<(), ApiError> {
        let body = UpdateSharePasswordRequest {
            password: password.to_string(),
        };
        self.send_json(Method::PATCH, &["api", "shares", share_id, "password"], &body)
            .await
    }

    async fn delete_share(&self, share_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "shares", share_id])?;
        Self::send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn update_share_files(&self, share_id: &str, file_ids: &[String]) -> Result<(), ApiError> {
        let body = UpdateShareFilesRequest {
            files: file_ids.to_vec(),
        };
        self.send_json(Method::PUT, &["api", "shares", share_id, "files"], &body)
            .await
    }

    async fn update_share_recipients(&self, share_id: &str, emails: &[String]) -> Result<(), ApiError> {
        let body = UpdateShareRecipientsRequest {
            emails: emails.to_vec(),
        };
        self.send_json(Method::PUT, &["api", "shares", share_id, "recipients"], &body)
            .await
    }

    async fn get_config_value(&self, key: &str) -> Result<Option<String>, ApiError> {
        match self
            .get_json::<ConfigValueResponse>(&["api", "app", "configs", key])
            .await
        {
            Ok(body) => Ok(body.value),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
