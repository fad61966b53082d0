use thiserror::Error;

/// Everything that can go wrong while accepting an upload.
///
/// The taxonomy is flat: either the client sent no usable file, or
/// persisting it failed. Storage messages are carried verbatim to the caller.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No files received.")]
    NoFile,
    #[error("Invalid multipart body: {0}")]
    InvalidForm(String),
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Storage(String),
}

impl From<anyhow::Error> for UploadError {
    fn from(err: anyhow::Error) -> Self {
        UploadError::Storage(format!("{:#}", err))
    }
}
