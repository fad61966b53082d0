use super::traits::{StorageService, StoredObject};
use crate::config::{S3Config, StorageTarget};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::{
    Client, config::BehaviorVersion, config::Credentials, config::Region, primitives::ByteStream,
};
use bytes::Bytes;

/// Uploads into an S3-compatible bucket (Cloudflare R2, MinIO, AWS S3).
pub struct S3StorageService {
    client: Client,
    bucket: String,
    public_url: String,
}

impl S3StorageService {
    pub async fn new(config: S3Config) -> anyhow::Result<Self> {
        let creds = Credentials::new(
            config.access_key_id,
            config.secret_access_key,
            None,
            None,
            "upload-api",
        );
        let sdk_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(creds)
            .endpoint_url(config.endpoint)
            .region(Region::new(config.region))
            .force_path_style(config.force_path_style)
            .build();
        Ok(Self {
            client: Client::from_conf(sdk_config),
            bucket: config.bucket_name,
            public_url: config.public_url,
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> anyhow::Result<StoredObject> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .cache_control("public, max-age=31536000, immutable")
            .send()
            .await
            .with_context(|| format!("PutObject {}/{} failed", self.bucket, key))?;

        Ok(StoredObject {
            key: key.to_string(),
            url: self.object_url(key),
            ..Default::default()
        })
    }

    fn target(&self) -> StorageTarget {
        StorageTarget::S3
    }
}
