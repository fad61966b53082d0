use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A single file received from the dashboard.
///
/// Content type is whatever the client declared for the multipart part. It is
/// forwarded to the storage backend as-is and never validated here.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Filename as sent by the browser, before sanitizing
    pub file_name: String,

    /// Declared MIME type of the part, if any
    pub content_type: Option<String>,

    /// Raw file bytes
    pub data: Bytes,
}

/// Reference to a stored upload, handed straight back to the caller.
///
/// # Invariants
/// - `url` is the only field callers depend on; it is used as an `<img>` source
///   and echoed to the backend as `image_url`
/// - Optional fields are omitted from JSON when absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Stored name (filesystem/S3 targets) or provider public id (remote target)
    pub filename: String,

    /// Address the stored bytes can be fetched from
    pub url: String,

    /// Path of the copy in the shared directory, for a co-located backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}
