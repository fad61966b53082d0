use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref UNSAFE_FILE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.\-]").unwrap();
}

/// Leaves room for the stamp and the `.part` staging wrapper under the
/// 255-byte filename limit.
const MAX_NAME_BYTES: usize = 200;
const MAX_EXTENSION_BYTES: usize = 16;
const FALLBACK_NAME: &str = "upload";

/// Collision-avoiding name of a stored upload: `<millis>_<sanitized original>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFileName {
    pub value: String,
}

impl StoredFileName {
    pub fn new(stamp_millis: i64, original: &str) -> Self {
        Self {
            value: format!("{}_{}", stamp_millis, sanitize_file_name(original)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Reduce a client-supplied filename to a single safe path component.
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9_.-]` becomes `_`,
/// so the result is plain ASCII and safe in a URL path. Leading dots are stripped
/// and overly long names are shortened while keeping the extension.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let replaced = UNSAFE_FILE_CHARS.replace_all(base, "_");
    let name = replaced.trim_start_matches('.');

    if name.is_empty() {
        return FALLBACK_NAME.to_string();
    }

    // Only ASCII survives the replacement, so byte offsets are char boundaries.
    if name.len() <= MAX_NAME_BYTES {
        return name.to_string();
    }

    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && ext.len() <= MAX_EXTENSION_BYTES => {
            let keep = MAX_NAME_BYTES - ext.len() - 1;
            format!("{}.{}", &stem[..keep], ext)
        }
        _ => name[..MAX_NAME_BYTES].to_string(),
    }
}
