use super::traits::{StorageService, StoredObject};
use crate::config::StorageTarget;
use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Writes uploads to the public directory and, optionally, to a shared directory.
///
/// With a shared directory the write is all-or-nothing: every destination is
/// staged as `.<key>.part` first, then each staged file is renamed into place.
/// Any failure removes staged and already-renamed files before the error is
/// returned, so no destination is left holding a file the caller never got a
/// URL for.
pub struct LocalStorageService {
    public_dir: PathBuf,
    public_url_prefix: String,
    shared_dir: Option<PathBuf>,
}

/// One destination of a write: staging path and final path.
struct Staged {
    temp: PathBuf,
    target: PathBuf,
}

impl LocalStorageService {
    pub fn new(public_dir: PathBuf, public_url_prefix: String, shared_dir: Option<PathBuf>) -> Self {
        Self {
            public_dir,
            public_url_prefix: public_url_prefix.trim_end_matches('/').to_string(),
            shared_dir,
        }
    }

    fn destinations(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.public_dir.as_path()).chain(self.shared_dir.as_deref())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url_prefix, key)
    }

    async fn stage(&self, key: &str, data: &[u8], staged: &mut Vec<Staged>) -> anyhow::Result<()> {
        for dir in self.destinations() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("failed to create upload directory {}", dir.display()))?;

            let entry = Staged {
                temp: dir.join(format!(".{}.part", key)),
                target: dir.join(key),
            };
            let temp = entry.temp.clone();
            staged.push(entry);

            tokio::fs::write(&temp, data)
                .await
                .with_context(|| format!("failed to write {}", temp.display()))?;
        }
        Ok(())
    }

    async fn commit(staged: &[Staged], committed: &mut usize) -> anyhow::Result<()> {
        for entry in staged {
            tokio::fs::rename(&entry.temp, &entry.target)
                .await
                .with_context(|| format!("failed to move upload into {}", entry.target.display()))?;
            *committed += 1;
        }
        Ok(())
    }

    /// Remove renamed files for the first `committed` entries and staging files for the rest.
    async fn discard(staged: &[Staged], committed: usize) {
        for (index, entry) in staged.iter().enumerate() {
            let path = if index < committed {
                &entry.target
            } else {
                &entry.temp
            };
            match tokio::fs::remove_file(path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "rolled back partial upload"),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to roll back partial upload")
                }
            }
        }
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn upload(&self, key: &str, data: Bytes, _content_type: &str) -> anyhow::Result<StoredObject> {
        let mut staged = Vec::new();
        if let Err(err) = self.stage(key, &data, &mut staged).await {
            Self::discard(&staged, 0).await;
            return Err(err);
        }

        let mut committed = 0;
        if let Err(err) = Self::commit(&staged, &mut committed).await {
            Self::discard(&staged, committed).await;
            return Err(err);
        }

        tracing::debug!(key, destinations = staged.len(), bytes = data.len(), "stored upload on disk");

        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
            local_path: self.shared_dir.as_ref().map(|dir| dir.join(key)),
            ..Default::default()
        })
    }

    fn target(&self) -> StorageTarget {
        if self.shared_dir.is_some() {
            StorageTarget::LocalShared
        } else {
            StorageTarget::Local
        }
    }
}
