//! Application configuration loading from environment variables.
//!
//! All configuration is loaded once at startup and injected into handlers through
//! [`AppState`](crate::presentation::http::state::AppState). Business logic never reads
//! the process environment directly.
//!
//! # Environment Variables
//!
//! ## General
//! - `RUST_LOG`: Logging level (default: "info,upload_api=debug,tower_http=debug")
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 3000)
//! - `STORAGE_TARGET`: One of `local`, `local+shared`, `remote`, `s3` (default: `local`)
//! - `UPLOAD_FIELD_NAME`: Multipart field carrying the file (default: "file")
//! - `MAX_UPLOAD_BYTES`: Request body limit in bytes (default: 20 MiB)
//! - `ALLOWED_ORIGINS`: Comma-separated CORS origins for release builds
//!
//! ## Local targets
//! - `PUBLIC_UPLOAD_DIR`: Public upload directory (default: "public/uploads")
//! - `PUBLIC_UPLOAD_URL_PREFIX`: URL prefix for stored files (default: "/uploads")
//! - `SHARED_UPLOAD_DIR`: Second destination, required for `local+shared`
//!
//! ## Remote target (image CDN)
//! - `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`: required
//! - `CLOUDINARY_API_BASE`: Upload API base (default: "https://api.cloudinary.com")
//! - `CLOUDINARY_FOLDER`: Optional folder for uploaded assets
//!
//! ## S3 target
//! - `S3_ACCESS_KEY_ID`, `S3_SECRET_ACCESS_KEY`, `S3_ENDPOINT`, `S3_BUCKET_NAME`,
//!   `S3_PUBLIC_URL`: required
//! - `S3_REGION`: Region (default: "auto")
//! - `S3_FORCE_PATH_STYLE`: Use path-style URLs (default: false)

use std::{fmt, path::PathBuf, str::FromStr};

/// Where uploaded files end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTarget {
    /// Public directory only.
    Local,
    /// Public directory plus a shared directory read by a co-located backend.
    LocalShared,
    /// Image CDN upload API.
    Remote,
    /// S3-compatible bucket.
    S3,
}

impl StorageTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::LocalShared => "local+shared",
            Self::Remote => "remote",
            Self::S3 => "s3",
        }
    }

    /// Whether files are written to the local filesystem and served by this process.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local | Self::LocalShared)
    }
}

impl fmt::Display for StorageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "local+shared" | "local_shared" | "shared" => Ok(Self::LocalShared),
            "remote" | "cloudinary" => Ok(Self::Remote),
            "s3" | "r2" => Ok(Self::S3),
            other => Err(format!(
                "unknown storage target '{}' (expected local, local+shared, remote or s3)",
                other
            )),
        }
    }
}

/// Credentials and options for the image CDN.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,

    /// Upload API base URL, without trailing slash
    pub api_base: String,

    /// Folder prefix applied by the provider
    pub folder: Option<String>,
}

/// Credentials and options for an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub access_key_id: String,
    pub secret_access_key: String,

    /// API endpoint (e.g., `https://xxx.r2.cloudflarestorage.com`)
    pub endpoint: String,

    /// Region (typically "auto" or "us-east-1")
    pub region: String,

    /// Use path-style URLs instead of virtual-hosted-style
    pub force_path_style: bool,

    pub bucket_name: String,

    /// Public URL for accessing objects (e.g., `https://cdn.example.com`)
    pub public_url: String,
}

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Storage target selected at deployment time
    pub storage_target: StorageTarget,

    /// Multipart field name carrying the uploaded file
    pub upload_field_name: String,

    /// Maximum accepted request body in bytes
    pub max_upload_bytes: usize,

    /// Directory whose contents are served under `public_upload_url_prefix`
    pub public_upload_dir: PathBuf,

    /// URL prefix of files in `public_upload_dir`
    pub public_upload_url_prefix: String,

    /// Second destination for the `local+shared` target
    pub shared_upload_dir: Option<PathBuf>,

    /// Present when the target is `remote`
    pub cloudinary: Option<CloudinaryConfig>,

    /// Present when the target is `s3`
    pub s3: Option<S3Config>,

    /// CORS origins allowed in release builds
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable required by the selected storage target is
    /// missing, or if any variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);
        let storage_target: StorageTarget = env.or("STORAGE_TARGET", StorageTarget::Local)?;

        let shared_upload_dir = match storage_target {
            StorageTarget::LocalShared => Some(PathBuf::from(env.required("SHARED_UPLOAD_DIR")?)),
            _ => env.optional("SHARED_UPLOAD_DIR").map(PathBuf::from),
        };

        let cloudinary = match storage_target {
            StorageTarget::Remote => Some(CloudinaryConfig {
                cloud_name: env.required("CLOUDINARY_CLOUD_NAME")?,
                api_key: env.required("CLOUDINARY_API_KEY")?,
                api_secret: env.required("CLOUDINARY_API_SECRET")?,
                api_base: env
                    .or(
                        "CLOUDINARY_API_BASE",
                        "https://api.cloudinary.com".to_string(),
                    )?
                    .trim_end_matches('/')
                    .to_string(),
                folder: env.optional("CLOUDINARY_FOLDER"),
            }),
            _ => None,
        };

        let s3 = match storage_target {
            StorageTarget::S3 => Some(S3Config {
                access_key_id: env.required("S3_ACCESS_KEY_ID")?,
                secret_access_key: env.required("S3_SECRET_ACCESS_KEY")?,
                endpoint: env.required("S3_ENDPOINT")?,
                region: env.or("S3_REGION", "auto".to_string())?,
                force_path_style: env.or("S3_FORCE_PATH_STYLE", false)?,
                bucket_name: env.required("S3_BUCKET_NAME")?,
                public_url: env
                    .required("S3_PUBLIC_URL")?
                    .trim_end_matches('/')
                    .to_string(),
            }),
            _ => None,
        };

        Ok(Self {
            host: env.or("HOST", "0.0.0.0".to_string())?,
            port: env.or("PORT", 3000)?,
            storage_target,
            upload_field_name: env.or("UPLOAD_FIELD_NAME", "file".to_string())?,
            max_upload_bytes: env.or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
            public_upload_dir: env.or("PUBLIC_UPLOAD_DIR", PathBuf::from("public/uploads"))?,
            public_upload_url_prefix: env
                .or("PUBLIC_UPLOAD_URL_PREFIX", "/uploads".to_string())?
                .trim_end_matches('/')
                .to_string(),
            shared_upload_dir,
            cloudinary,
            s3,
            allowed_origins: env
                .optional("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

struct Env<'a, F>(&'a F);

impl<F> Env<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Non-empty value of `key`, if set.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Load a required variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is not set.
    fn required(&self, key: &str) -> anyhow::Result<String> {
        self.optional(key)
            .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: {}", key))
    }

    /// Load a variable with a default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is set but cannot be parsed.
    fn or<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.optional(key) {
            Some(val) => val
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
            None => Ok(default),
        }
    }
}
