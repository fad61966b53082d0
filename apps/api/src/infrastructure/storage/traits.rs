use crate::config::StorageTarget;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;

/// What a storage backend reports back after persisting an upload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredObject {
    /// Name or provider id the object was stored under
    pub key: String,
    pub url: String,
    /// Copy readable by a co-located backend, if the target keeps one
    pub local_path: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> anyhow::Result<StoredObject>;
    fn target(&self) -> StorageTarget;
}
