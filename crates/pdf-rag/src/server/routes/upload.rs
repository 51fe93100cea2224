//! PDF upload and indexing endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// Multipart field carrying the document
const FILE_FIELD: &str = "file";

/// POST /upload-pdf - Save, extract, chunk, embed and index a PDF
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let (filename, data) = read_file_field(&mut multipart).await?;

    tracing::info!("Processing file: {} ({} bytes)", filename, data.len());

    state
        .uploads()
        .save(&filename, &data)
        .await
        .map_err(|e| match e {
            Error::InvalidInput(msg) => Error::InvalidInput(msg),
            other => processing_error(other),
        })?;

    let chunk_count = state.pipeline().ingest(data).await.map_err(|e| {
        tracing::error!("Failed to process {}: {}", filename, e);
        processing_error(e)
    })?;

    tracing::info!("Ingested '{}': {} chunks", filename, chunk_count);

    Ok(Json(UploadResponse::success()))
}

/// Pull the `file` field out of the multipart body
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_input(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.pdf".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::invalid_input(format!("Failed to read file: {}", e)))?;

        return Ok((filename, data.to_vec()));
    }

    Err(Error::invalid_input(format!(
        "missing multipart field '{}'",
        FILE_FIELD
    )))
}

/// Quota errors keep their own status; everything else becomes a generic
/// processing failure
fn processing_error(err: Error) -> Error {
    if err.is_quota_exceeded() {
        err
    } else {
        Error::internal(format!(
            "An error occurred while processing the PDF: {}",
            err
        ))
    }
}
