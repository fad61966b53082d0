pub mod cloudinary_storage_service;
pub mod local_storage_service;
pub mod s3_storage_service;
pub mod traits;

use crate::config::{Config, StorageTarget};
use anyhow::Context;
use cloudinary_storage_service::CloudinaryStorageService;
use local_storage_service::LocalStorageService;
use s3_storage_service::S3StorageService;
use std::sync::Arc;
use traits::StorageService;

/// Build the storage backend selected by `config.storage_target`.
///
/// # Errors
///
/// Returns an error if the credentials the target needs are absent or the
/// backend client cannot be constructed.
pub async fn build_storage(config: &Config) -> anyhow::Result<Arc<dyn StorageService>> {
    let storage: Arc<dyn StorageService> = match config.storage_target {
        StorageTarget::Local => Arc::new(LocalStorageService::new(
            config.public_upload_dir.clone(),
            config.public_upload_url_prefix.clone(),
            None,
        )),
        StorageTarget::LocalShared => {
            let shared = config
                .shared_upload_dir
                .clone()
                .context("local+shared target needs SHARED_UPLOAD_DIR")?;
            Arc::new(LocalStorageService::new(
                config.public_upload_dir.clone(),
                config.public_upload_url_prefix.clone(),
                Some(shared),
            ))
        }
        StorageTarget::Remote => {
            let cdn = config
                .cloudinary
                .clone()
                .context("remote target needs CLOUDINARY_* credentials")?;
            Arc::new(CloudinaryStorageService::new(cdn)?)
        }
        StorageTarget::S3 => {
            let s3 = config
                .s3
                .clone()
                .context("s3 target needs S3_* credentials")?;
            Arc::new(S3StorageService::new(s3).await?)
        }
    };

    tracing::info!(storage = %storage.target(), "storage backend ready");
    Ok(storage)
}
