use super::traits::{StorageService, StoredObject};
use crate::config::{CloudinaryConfig, StorageTarget};
use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Signed uploads to the Cloudinary image upload API.
pub struct CloudinaryStorageService {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryStorageService {
    pub fn new(config: CloudinaryConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("upload-api/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client for image CDN")?;
        Ok(Self { client, config })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.api_base, self.config.cloud_name
        )
    }

    /// Parameters that take part in the request signature.
    fn signed_params(&self, public_id: &str, timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.to_string()),
        ];
        if let Some(folder) = &self.config.folder {
            params.push(("folder", folder.clone()));
        }
        params
    }
}

/// SHA-256 signature over `k=v` pairs sorted by key and joined with `&`, followed by the secret.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Cloudinary public ids carry no extension; the provider appends the detected format.
fn public_id_for(key: &str) -> &str {
    match key.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => key,
    }
}

#[async_trait]
impl StorageService for CloudinaryStorageService {
    async fn upload(&self, key: &str, data: Bytes, _content_type: &str) -> anyhow::Result<StoredObject> {
        let timestamp = Utc::now().timestamp();
        let params = self.signed_params(public_id_for(key), timestamp);
        let signature = sign_params(&params, &self.config.api_secret);

        let mut form = Form::new()
            .part("file", Part::bytes(data.to_vec()).file_name(key.to_string()))
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (name, value) in params {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .context("image CDN request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            anyhow::bail!("image CDN rejected upload ({}): {}", status, message);
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .context("image CDN returned an unreadable response")?;

        tracing::debug!(public_id = %uploaded.public_id, "uploaded to image CDN");

        Ok(StoredObject {
            key: uploaded.public_id,
            url: uploaded.secure_url,
            local_path: None,
            width: uploaded.width,
            height: uploaded.height,
        })
    }

    fn target(&self) -> StorageTarget {
        StorageTarget::Remote
    }
}
