//! 文本与文件解析入口

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::StreamExt;
use tracing::{info, warn};

use super::ImportService;
use super::preview::preview_response;
use crate::config::AppConfig;
use crate::import::{PreviewStore, parse_rows};
use crate::models::imports::entities::{AssignmentContext, ImportTarget};
use crate::models::imports::requests::{ParseImportRequest, UploadImportQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::roster::existing_keys;
use crate::services::context::bad_request;
use crate::utils::upload::decode_text_upload;

pub async fn parse_text(
    service: &ImportService,
    session_id: String,
    target: ImportTarget,
    body: ParseImportRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    stage_text(service, session_id, target, &body.text, body.context, request).await
}

pub async fn upload_file(
    service: &ImportService,
    session_id: String,
    target: ImportTarget,
    query: UploadImportQuery,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();

    let (data, file_name) = match read_file_from_multipart(&mut payload, config.upload.max_size).await {
        Ok(result) => result,
        Err(UploadError::TooLarge) => {
            return Ok(HttpResponse::PayloadTooLarge().json(ApiResponse::error_empty(
                ErrorCode::PayloadTooLarge,
                format!("File exceeds {} bytes", config.upload.max_size),
            )));
        }
        Err(UploadError::Read(e)) => {
            return Ok(bad_request(
                ErrorCode::ImportFileReadFailed,
                format!("Failed to read upload: {e}"),
            ));
        }
    };

    let text = match decode_text_upload(&data, &file_name, &config.upload.allowed_extensions) {
        Ok(text) => text,
        Err(e) => {
            let code = if e.code() == "E003" {
                ErrorCode::ImportEmpty
            } else {
                ErrorCode::ImportFileTypeNotAllowed
            };
            return Ok(bad_request(code, e.message()));
        }
    };

    info!(
        "Received {} upload '{}' ({} bytes) for session {}",
        target,
        file_name,
        data.len(),
        session_id
    );
    stage_text(service, session_id, target, &text, query.into_context(), request).await
}

/// 解析文本并替换该 (会话, 目标) 的暂存内容
async fn stage_text(
    service: &ImportService,
    session_id: String,
    target: ImportTarget,
    text: &str,
    context: Option<AssignmentContext>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();

    let rows = parse_rows(text);
    if rows.is_empty() {
        return Ok(bad_request(ErrorCode::ImportEmpty, "No rows found in input"));
    }
    if rows.len() > config.staging.max_rows {
        return Ok(bad_request(
            ErrorCode::ImportTooManyRows,
            format!(
                "Input has {} rows, at most {} rows can be imported at once",
                rows.len(),
                config.staging.max_rows
            ),
        ));
    }
    if target == ImportTarget::Assignments && context.is_none() {
        return Ok(bad_request(
            ErrorCode::ImportContextMissing,
            "Assignment import requires a course",
        ));
    }

    // 现有键只用于区分 new / exists，加载失败时退化为 valid
    let client = service.get_client(request);
    let existing = match existing_keys(&client, target).await {
        Ok(keys) => keys,
        Err(e) => {
            warn!("Could not load existing {} for preview: {}", target, e);
            None
        }
    };

    let staging = service.get_staging(request);
    let entry = staging
        .get_or_insert_with((session_id, target), || PreviewStore::new(target))
        .await;
    let mut store = entry.lock().await;
    store.load(&rows, context, existing);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        preview_response(&store, config),
        format!("Parsed {} rows", store.len()),
    )))
}

enum UploadError {
    TooLarge,
    Read(String),
}

async fn read_file_from_multipart(
    payload: &mut Multipart,
    max_size: usize,
) -> Result<(Vec<u8>, String), UploadError> {
    let mut file_bytes = Vec::new();
    let mut file_name = String::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| UploadError::Read(e.to_string()))?;

        if field.name() == Some("file") {
            if let Some(disposition) = field.content_disposition() {
                file_name = disposition.get_filename().unwrap_or("upload.csv").to_string();
            }

            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| UploadError::Read(e.to_string()))?;
                if file_bytes.len() + data.len() > max_size {
                    return Err(UploadError::TooLarge);
                }
                file_bytes.extend_from_slice(&data);
            }
        }
    }

    if file_name.is_empty() && file_bytes.is_empty() {
        return Err(UploadError::Read("missing 'file' field".to_string()));
    }

    Ok((file_bytes, file_name))
}
