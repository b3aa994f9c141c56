use actix_web::{HttpResponse, Result as ActixResult};
use tracing::{debug, error};

use crate::import::export;
use crate::models::imports::entities::ImportTarget;
use crate::models::imports::responses::SessionResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_session() -> ActixResult<HttpResponse> {
    let session_id = uuid::Uuid::new_v4().to_string();
    debug!("Allocated console session {}", session_id);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        SessionResponse { session_id },
        "Session created",
    )))
}

pub async fn template(target: ImportTarget) -> ActixResult<HttpResponse> {
    match export::template(target) {
        Ok(body) => Ok(crate::services::context::csv_attachment(
            body,
            &format!("{target}-template.csv"),
        )),
        Err(e) => {
            error!("Failed to build {} template: {}", target, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to build template: {}", e.message()),
            )))
        }
    }
}
