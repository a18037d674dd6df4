//! Upload validation rules: extension allow-list and size ceiling.
//!
//! The checks are split so the multipart reader can reject on the file name
//! before it pulls a single byte of the body.

use thiserror::Error;

/// 200 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 200 * 1024 * 1024;

pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = [".txt", ".pdf", ".jpg", ".csv"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_BYTES)
    }
}

/// A file that passed both checks. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("unsupported file type: {extension:?}")]
    UnsupportedType {
        extension: String,
        allowed: Vec<String>,
    },
    #[error("file too large (limit {limit} bytes)")]
    TooLarge { limit: u64 },
}

impl UploadRejection {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "UNSUPPORTED_FILE_TYPE",
            Self::TooLarge { .. } => "FILE_TOO_LARGE",
        }
    }

    /// Message shown to the user on the page.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedType { allowed, .. } => format!(
                "Unsupported file type! Only {} files are allowed.",
                allowed.join(", ")
            ),
            Self::TooLarge { .. } => "File too large!".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted(UploadedFile),
    Rejected(UploadRejection),
}

impl UploadPolicy {
    /// Entries are lower-cased and given a leading dot if they lack one.
    pub fn new<I, S>(allowed_extensions: I, max_bytes: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalised: Vec<String> = Vec::new();
        for ext in allowed_extensions {
            let ext = ext.as_ref().trim().to_lowercase();
            if ext.is_empty() {
                continue;
            }
            let ext = if ext.starts_with('.') {
                ext
            } else {
                format!(".{ext}")
            };
            if !normalised.contains(&ext) {
                normalised.push(ext);
            }
        }

        Self {
            allowed_extensions: normalised,
            max_bytes,
        }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn check_extension(&self, file_name: &str) -> Result<(), UploadRejection> {
        let extension = extension_of(file_name);
        if self.allowed_extensions.iter().any(|e| *e == extension) {
            Ok(())
        } else {
            Err(UploadRejection::UnsupportedType {
                extension,
                allowed: self.allowed_extensions.clone(),
            })
        }
    }

    pub fn check_size(&self, len: u64) -> Result<(), UploadRejection> {
        if len > self.max_bytes {
            Err(UploadRejection::TooLarge {
                limit: self.max_bytes,
            })
        } else {
            Ok(())
        }
    }
}

/// Lower-cased extension of the final path component, leading dot included.
///
/// Leading dots of the file name do not start an extension, so `.txt` has
/// none. Returns an empty string when there is no extension.
pub fn extension_of(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = base.trim_start_matches('.');

    match stem.rfind('.') {
        Some(idx) => stem[idx..].to_lowercase(),
        None => String::new(),
    }
}
