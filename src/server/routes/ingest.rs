//! Ingestion endpoints for file uploads and URLs

use axum::{
    extract::{Multipart, State},
    Form, Json,
};
use std::path::Path;

use crate::error::{Error, Result};
use crate::ingestion::loader;
use crate::server::state::AppState;
use crate::types::document::FileType;
use crate::types::query::IngestUrlForm;
use crate::types::response::IngestResponse;

/// POST /ingest/file - multipart file upload
pub async fn ingest_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("failed to read multipart field: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidRequest(format!("failed to read upload: {}", e)))?;

        tracing::info!("ingesting file: {} ({} bytes)", filename, data.len());

        let extension = file_extension(&filename);
        let documents = match FileType::from_extension(&extension) {
            FileType::Pdf => loader::load_pdf(&data)?,
            kind if kind.is_plain_text() => loader::load_text(&data),
            _ => return Err(Error::UnsupportedFileType(extension)),
        };

        let source = format!("file:{}", filename);
        let ingested_chunks = state.pipeline().ingest(documents, &source).await?;

        return Ok(Json(IngestResponse {
            ingested_chunks,
            source,
        }));
    }

    Err(Error::InvalidRequest(
        "multipart body contained no file".to_string(),
    ))
}

/// POST /ingest/url - fetch a page and ingest its text
pub async fn ingest_url(
    State(state): State<AppState>,
    Form(form): Form<IngestUrlForm>,
) -> Result<Json<IngestResponse>> {
    tracing::info!("ingesting url: {}", form.url);

    let documents = loader::load_url(state.fetch_client(), &form.url).await?;
    let ingested_chunks = state.pipeline().ingest(documents, &form.url).await?;

    Ok(Json(IngestResponse {
        ingested_chunks,
        source: form.url,
    }))
}

/// Lowercased extension with a leading dot, empty when the name has none
fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_extension_is_lowercased_and_dotted() {
        assert_eq!(file_extension("report.PDF"), ".pdf");
        assert_eq!(file_extension("notes.txt"), ".txt");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("README"), "");
    }
}
