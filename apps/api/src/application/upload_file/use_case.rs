use crate::{
    domain::upload::{
        clock::UploadClock,
        entity::{UploadRequest, UploadResult},
        errors::UploadError,
        value_objects::StoredFileName,
    },
    infrastructure::{
        media::probe::{probe_dimensions, sniff_content_type},
        storage::traits::StorageService,
    },
};
use std::sync::Arc;
use tracing::{error, info, instrument};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Persists one uploaded file and describes where it ended up.
///
/// The use case names the file, probes image dimensions, and hands the bytes to
/// whichever [`StorageService`] the deployment selected. It keeps no state between
/// calls apart from the shared [`UploadClock`].
pub struct UploadFileUseCase {
    storage: Arc<dyn StorageService>,
    clock: Arc<UploadClock>,
}

impl UploadFileUseCase {
    pub fn new(storage: Arc<dyn StorageService>, clock: Arc<UploadClock>) -> Self {
        Self { storage, clock }
    }

    /// Store `request` and return its reference.
    ///
    /// # Errors
    /// Returns [`UploadError::NoFile`] for an empty payload with no filename and
    /// [`UploadError::Storage`] with the backend's message when persisting fails.
    /// Nothing is retried.
    #[instrument(skip_all, fields(file_name = %request.file_name, bytes = request.data.len()))]
    pub async fn execute(&self, request: UploadRequest) -> Result<UploadResult, UploadError> {
        if request.file_name.is_empty() && request.data.is_empty() {
            return Err(UploadError::NoFile);
        }

        let name = StoredFileName::new(self.clock.next_stamp(), &request.file_name);
        let content_type = resolve_content_type(request.content_type.as_deref(), &request.data);
        let probed = probe_dimensions(&request.data);

        let stored = self
            .storage
            .upload(name.as_str(), request.data, content_type)
            .await
            .map_err(|err| {
                error!(file = %name.as_str(), error = %format!("{:#}", err), "upload failed");
                UploadError::from(err)
            })?;

        let (width, height) = match (stored.width, stored.height) {
            (Some(w), Some(h)) => (Some(w), Some(h)),
            _ => probed.map_or((None, None), |(w, h)| (Some(w), Some(h))),
        };

        info!(
            file = %stored.key,
            storage = %self.storage.target(),
            "upload stored"
        );

        Ok(UploadResult {
            filename: stored.key,
            url: stored.url,
            local_path: stored.local_path.map(|p| p.display().to_string()),
            width,
            height,
        })
    }
}

/// Declared content type of the part, falling back to magic-byte sniffing.
fn resolve_content_type<'a>(declared: Option<&'a str>, data: &[u8]) -> &'a str {
    match declared.map(str::trim) {
        Some(ct) if !ct.is_empty() && ct != FALLBACK_CONTENT_TYPE => ct,
        _ => sniff_content_type(data).unwrap_or(FALLBACK_CONTENT_TYPE),
    }
}
