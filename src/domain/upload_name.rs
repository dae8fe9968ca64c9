use std::fmt;

use uuid::Uuid;

use super::JobId;

const FALLBACK_NAME: &str = "upload";

/// Name under which an uploaded file is staged on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadName(String);

impl UploadName {
    /// Staging name for a synchronous image request. The random prefix keeps
    /// concurrent uploads of the same filename apart.
    pub fn for_image(filename: &str) -> Self {
        Self(format!("temp_{}_{}", Uuid::new_v4(), sanitize_filename(filename)))
    }

    pub fn for_video(job_id: &JobId, filename: &str) -> Self {
        Self(format!("temp_{}_{}", job_id.as_uuid(), sanitize_filename(filename)))
    }

    pub fn from_raw(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keeps only the final path component and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}
