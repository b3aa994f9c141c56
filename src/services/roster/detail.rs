use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RosterService;
use crate::models::ApiResponse;
use crate::models::roster::requests::DetailQuery;
use crate::roster::{Directory, course_detail as build_course_detail, section_detail as build_section_detail};
use crate::services::context::error_response;

pub async fn course_detail(
    service: &RosterService,
    course_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let client = service.get_client(request);
    let detail = Directory::load(&client)
        .await
        .and_then(|directory| build_course_detail(&directory, &course_id));

    match detail {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Course loaded"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn section_detail(
    service: &RosterService,
    section_id: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let client = service.get_client(request);
    let detail = Directory::load(&client)
        .await
        .and_then(|directory| build_section_detail(&directory, &section_id));

    match detail {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Section loaded"))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 用户档案按上游结构透传
pub async fn user_detail(
    service: &RosterService,
    user_id: String,
    query: DetailQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match service
        .get_client(request)
        .user_detail(user_id, query.include_archived)
        .await
    {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "User loaded"))),
        Err(e) => Ok(error_response(&e)),
    }
}
