use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::AdminService;
use crate::backend::BackendClient;
use crate::backend::requests::PatchSection;
use crate::errors::{Result, RosterError};
use crate::models::admin::requests::{DeleteSectionQuery, PatchSectionRequest};
use crate::models::directory::entities::{DEFAULT_SECTION_NAME, Section};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{bad_request, error_response};

async fn find_section(client: &BackendClient, section_id: &str) -> Result<Section> {
    client
        .list_sections()
        .await?
        .into_iter()
        .find(|s| s.id == section_id)
        .ok_or_else(|| RosterError::not_found(format!("Section {section_id} not found")))
}

fn reserved(action: &str) -> HttpResponse {
    bad_request(
        ErrorCode::SectionReserved,
        format!("The default section cannot be {action}"),
    )
}

pub async fn patch_section(
    service: &AdminService,
    section_id: String,
    body: PatchSectionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let name = body
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    if name.is_none() && body.archived.is_none() {
        return Ok(bad_request(ErrorCode::BadRequest, "Nothing to update"));
    }
    if name.as_deref() == Some(DEFAULT_SECTION_NAME) {
        return Ok(bad_request(
            ErrorCode::SectionReserved,
            "This section name is reserved",
        ));
    }

    let client = service.get_client(request);
    if name.is_some() {
        match find_section(&client, &section_id).await {
            Ok(section) if section.is_default() => return Ok(reserved("renamed")),
            Ok(_) => {}
            Err(e) => return Ok(error_response(&e)),
        }
    }

    let patch = PatchSection {
        section_id,
        name,
        archived: body.archived,
    };
    info!("Updating section {}", patch.section_id);
    match client.patch_section(patch).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data, "Section updated"))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 硬删除班级，必须显式确认；其成员在概念上归入默认班级
pub async fn delete_section(
    service: &AdminService,
    section_id: String,
    query: DeleteSectionQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if !query.confirm {
        return Ok(bad_request(
            ErrorCode::SectionDeleteNotConfirmed,
            "Deleting a section requires confirm=true",
        ));
    }

    let client = service.get_client(request);
    let section = match find_section(&client, &section_id).await {
        Ok(section) => section,
        Err(e) => return Ok(error_response(&e)),
    };
    if section.is_default() {
        return Ok(reserved("deleted"));
    }

    match client.delete_section(section_id).await {
        Ok(()) => {
            if !section.enrollments.is_empty() {
                warn!(
                    "Section {} deleted with {} enrollments left to the default section",
                    section.id,
                    section.enrollments.len()
                );
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Section deleted")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
