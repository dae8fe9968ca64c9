use axum::body::Bytes;
use axum::extract::Multipart;

use crate::presentation::error::ApiError;

const FILE_FIELD: &str = "file";
const PROMPT_FIELD: &str = "prompt";

/// The `file` and `prompt` parts of an analysis request. Other parts are
/// ignored.
pub struct UploadForm {
    pub filename: String,
    pub data: Bytes,
    pub prompt: Option<String>,
}

impl UploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut file: Option<(String, Bytes)> = None;
        let mut prompt = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart: {e}")))?
        {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some(FILE_FIELD) => {
                    let filename = field.file_name().unwrap_or("upload").to_string();
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {e}")))?;
                    file = Some((filename, data));
                }
                Some(PROMPT_FIELD) => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Failed to read prompt: {e}")))?;
                    prompt = Some(text);
                }
                _ => {}
            }
        }

        let (filename, data) =
            file.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

        Ok(Self {
            filename,
            data,
            prompt: prompt.filter(|p| !p.trim().is_empty()),
        })
    }
}
