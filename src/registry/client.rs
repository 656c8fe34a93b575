//! Production HTTP adapter for the upload capability interface
//!
//! Implements the registry's action-style JSON API: each operation is a POST
//! to `{endpoint}/v1/{Action}` with a JSON body. Part payloads travel
//! base64-encoded inside the request body. Authentication is an optional
//! bearer token; token acquisition and refresh are handled by the caller.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::api::RegistryUploadApi;
use super::identity::RegistryIdentity;
use super::types::{CompleteLayerUploadOutput, InitiateLayerUploadOutput};
use crate::config::ClientConfig;
use crate::error::{PushError, Result};
use crate::logging::Logger;

const ALREADY_EXISTS_CODE: &str = "LayerAlreadyExistsException";

pub struct RegistryHttpClient {
    client: Client,
    endpoint: Url,
    auth_token: Option<String>,
    output: Logger,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitiateLayerUploadRequest<'a> {
    registry_id: &'a str,
    repository_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitiateLayerUploadResponse {
    upload_id: String,
    part_size: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadLayerPartRequest<'a> {
    registry_id: &'a str,
    repository_name: &'a str,
    upload_id: &'a str,
    part_first_byte: i64,
    part_last_byte: i64,
    layer_part_blob: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteLayerUploadRequest<'a> {
    registry_id: &'a str,
    repository_name: &'a str,
    upload_id: &'a str,
    total_bytes: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteLayerUploadResponse {
    layer_digest: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayerAvailabilityRequest<'a> {
    registry_id: &'a str,
    repository_name: &'a str,
    layer_digest: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayerAvailabilityResponse {
    available: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadUrlResponse {
    download_url: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl RegistryHttpClient {
    pub fn new(config: &ClientConfig, output: Logger) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(60))
            .pool_idle_timeout(Duration::from_secs(300))
            .danger_accept_invalid_certs(config.skip_tls)
            .user_agent("layer-pusher/0.1")
            .build()
            .map_err(|e| PushError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(RegistryHttpClient {
            client,
            endpoint,
            auth_token: config.auth_token.clone(),
            output,
        })
    }

    fn action_url(&self, action: &str) -> String {
        format!(
            "{}/v1/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            action
        )
    }

    async fn post_action<Req: Serialize>(
        &self,
        action: &str,
        body: &Req,
    ) -> Result<reqwest::Response> {
        let mut request = self.client.post(self.action_url(action)).json(body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| {
            self.output
                .error(&format!("{} request failed: {}", action, e));
            PushError::Network(e.to_string())
        })?;
        Ok(response)
    }

    /// Read the error body of a failed action and classify it.
    async fn classify_failure(&self, action: &str, response: reqwest::Response) -> PushError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error response".to_string());

        if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(&body) {
            if parsed.code.as_deref() == Some(ALREADY_EXISTS_CODE) {
                return PushError::LayerAlreadyExists;
            }
            if let Some(message) = parsed.message {
                return Self::status_error(action, status, &message);
            }
        }
        Self::status_error(action, status, &body)
    }

    fn status_error(action: &str, status: StatusCode, detail: &str) -> PushError {
        let msg = match status.as_u16() {
            401 => format!("Authentication failed: {}", detail),
            403 => format!("Permission denied: {}", detail),
            404 => format!("Repository not found: {}", detail),
            413 => format!("Part too large: {}", detail),
            500 => format!("Registry server error: {}", detail),
            502 | 503 => format!("Registry unavailable: {}", detail),
            _ => format!("{} failed (status {}): {}", action, status, detail),
        };
        PushError::Upload(msg)
    }
}

#[async_trait]
impl RegistryUploadApi for RegistryHttpClient {
    async fn initiate_layer_upload(
        &self,
        identity: &RegistryIdentity,
    ) -> Result<InitiateLayerUploadOutput> {
        self.output.detail(&format!(
            "Initiating layer upload to {}/{}",
            identity.account_id, identity.repository_name
        ));

        let request = InitiateLayerUploadRequest {
            registry_id: &identity.account_id,
            repository_name: &identity.repository_name,
        };
        let response = self.post_action("InitiateLayerUpload", &request).await?;

        if !response.status().is_success() {
            let err = self.classify_failure("InitiateLayerUpload", response).await;
            return Err(match err {
                PushError::Upload(msg) => PushError::Negotiation(msg),
                other => other,
            });
        }

        let parsed: InitiateLayerUploadResponse = response.json().await.map_err(|e| {
            PushError::Serialization(format!("Invalid initiate response: {}", e))
        })?;

        self.output.detail(&format!(
            "Upload session {} opened, part size {}",
            parsed.upload_id,
            self.output.format_size(parsed.part_size.max(0) as u64)
        ));

        Ok(InitiateLayerUploadOutput {
            upload_id: parsed.upload_id,
            part_size: parsed.part_size,
        })
    }

    async fn upload_layer_part(
        &self,
        identity: &RegistryIdentity,
        upload_id: &str,
        first_byte: i64,
        last_byte: i64,
        data: &[u8],
    ) -> Result<()> {
        self.output.detail(&format!(
            "Uploading part bytes {}-{} of session {}",
            first_byte, last_byte, upload_id
        ));

        let request = UploadLayerPartRequest {
            registry_id: &identity.account_id,
            repository_name: &identity.repository_name,
            upload_id,
            part_first_byte: first_byte,
            part_last_byte: last_byte,
            layer_part_blob: STANDARD.encode(data),
        };
        let response = self.post_action("UploadLayerPart", &request).await?;

        if !response.status().is_success() {
            return Err(self.classify_failure("UploadLayerPart", response).await);
        }
        Ok(())
    }

    async fn complete_layer_upload(
        &self,
        identity: &RegistryIdentity,
        upload_id: &str,
        total_bytes: i64,
    ) -> Result<CompleteLayerUploadOutput> {
        self.output.detail(&format!(
            "Completing upload session {} ({} total)",
            upload_id,
            self.output.format_size(total_bytes.max(0) as u64)
        ));

        let request = CompleteLayerUploadRequest {
            registry_id: &identity.account_id,
            repository_name: &identity.repository_name,
            upload_id,
            total_bytes,
        };
        let response = self.post_action("CompleteLayerUpload", &request).await?;

        if !response.status().is_success() {
            return Err(self.classify_failure("CompleteLayerUpload", response).await);
        }

        let parsed: CompleteLayerUploadResponse = response.json().await.map_err(|e| {
            PushError::Serialization(format!("Invalid complete response: {}", e))
        })?;

        Ok(CompleteLayerUploadOutput {
            digest: parsed.layer_digest,
        })
    }

    async fn check_layer_availability(
        &self,
        identity: &RegistryIdentity,
        digest: &str,
    ) -> Result<bool> {
        let request = LayerAvailabilityRequest {
            registry_id: &identity.account_id,
            repository_name: &identity.repository_name,
            layer_digest: digest,
        };
        let response = self
            .post_action("BatchCheckLayerAvailability", &request)
            .await?;

        if !response.status().is_success() {
            return Err(
                self.classify_failure("BatchCheckLayerAvailability", response)
                    .await,
            );
        }

        let parsed: LayerAvailabilityResponse = response.json().await.map_err(|e| {
            PushError::Serialization(format!("Invalid availability response: {}", e))
        })?;
        Ok(parsed.available)
    }

    async fn layer_download_url(
        &self,
        identity: &RegistryIdentity,
        digest: &str,
    ) -> Result<String> {
        let request = LayerAvailabilityRequest {
            registry_id: &identity.account_id,
            repository_name: &identity.repository_name,
            layer_digest: digest,
        };
        let response = self.post_action("GetDownloadUrlForLayer", &request).await?;

        if !response.status().is_success() {
            return Err(
                self.classify_failure("GetDownloadUrlForLayer", response)
                    .await,
            );
        }

        let parsed: DownloadUrlResponse = response.json().await.map_err(|e| {
            PushError::Serialization(format!("Invalid download URL response: {}", e))
        })?;
        Ok(parsed.download_url)
    }
}
