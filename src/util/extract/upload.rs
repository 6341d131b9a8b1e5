use axum::{body::Bytes, extract::Multipart};

use crate::errors::code_error::{CodeError, CodeErrorResp, code_err};

/// Multipart field the admin upload forms send the image under.
pub const UPLOAD_FIELD: &str = "file";

pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Pulls the `file` field out of a multipart body. Other fields are skipped.
pub async fn read_upload(multipart: &mut Multipart) -> Result<Upload, CodeErrorResp> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| code_err(CodeError::INVALID_REQUEST, e))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| code_err(CodeError::INVALID_REQUEST, e))?;
        return Ok(Upload { file_name, bytes });
    }

    Err(code_err(
        CodeError::INVALID_REQUEST,
        format!("Missing multipart field `{UPLOAD_FIELD}`"),
    ))
}

pub fn upload_rejected(max_size_bytes: usize) -> CodeErrorResp {
    code_err(
        CodeError::UPLOAD_FAILED,
        format!(
            "Upload failed. Images must be JPG, PNG, GIF or WEBP and smaller than {} MB.",
            max_size_bytes / (1024 * 1024)
        ),
    )
}
