//! Axum route handlers for letter analysis.

use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context};
use axum::{
    extract::{multipart::Multipart, rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::company_info::{extract_company_info, CompanyInfo};
use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;
use crate::extraction::{DocumentFormat, ExtractError, FileDescriptor, TextExtractor};
use crate::state::AppState;
use crate::webhook::WebhookPayload;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeTextResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
    pub verification_hints: CompanyInfo,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub filename: String,
    pub analysis: AnalysisResult,
    pub verification_hints: CompanyInfo,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze-text
///
/// Analyses raw letter text. Analysis problems surface inside the result,
/// never as an HTTP error.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Result<Json<AnalyzeTextResponse>, AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;
    let text = request
        .text
        .ok_or_else(|| AppError::Validation("No text provided".to_string()))?;

    let analysis = state.analyzer.analyze(&text).await;

    Ok(Json(AnalyzeTextResponse {
        success: true,
        analysis,
        verification_hints: extract_company_info(&text),
    }))
}

/// POST /upload
///
/// Multipart field `file`. The upload is staged in the upload folder for the
/// duration of extraction and removed before the analysis runs.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            upload = Some((name, data));
            break;
        }
    }

    let (original_name, data) =
        upload.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    if original_name.is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }

    let filename = secure_filename(&original_name);
    let extension = Path::new(&filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| DocumentFormat::from_extension(ext).is_some())
        .ok_or_else(|| AppError::UnsupportedFormat(filename.clone()))?
        .to_ascii_lowercase();

    let extractor = state.extractor;
    let upload_dir = state.config.upload_dir.clone();
    let (descriptor, text) = tokio::task::spawn_blocking(move || {
        stage_and_extract(&extractor, &upload_dir, &extension, &data)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("Extraction task failed: {e}")))??;

    info!(
        "Extracted {} characters from upload {} ({} bytes)",
        text.chars().count(),
        filename,
        descriptor.size
    );

    let analysis = state.analyzer.analyze(&text).await;

    if let Some(webhook) = &state.webhook {
        webhook
            .notify(&WebhookPayload {
                filename: &filename,
                content: &text,
                analysis: &analysis,
                timestamp: Utc::now(),
            })
            .await;
    }

    Ok(Json(UploadResponse {
        success: true,
        verification_hints: extract_company_info(&text),
        filename,
        analysis,
    }))
}

/// Writes the upload to a temporary file in `upload_dir`, probes and extracts
/// it, then deletes it when the temporary file handle drops.
fn stage_and_extract(
    extractor: &TextExtractor,
    upload_dir: &Path,
    extension: &str,
    data: &[u8],
) -> Result<(FileDescriptor, String), AppError> {
    let mut staged = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&format!(".{extension}"))
        .tempfile_in(upload_dir)
        .with_context(|| format!("Failed to stage upload in {}", upload_dir.display()))?;
    staged
        .write_all(data)
        .and_then(|_| staged.flush())
        .context("Failed to write staged upload")?;

    let descriptor = extractor.describe(staged.path())?;
    if !extractor.is_processable(staged.path()) {
        return Err(ExtractError::UnsupportedFormat(descriptor.extension).into());
    }
    let text = extractor.extract(staged.path())?;

    Ok((descriptor, text))
}

/// Reduces a client-supplied filename to a safe ASCII basename.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    cleaned.trim_start_matches(['.', '_']).to_string()
}
