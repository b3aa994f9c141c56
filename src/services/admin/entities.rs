use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AdminService;
use crate::backend::requests::{PatchCourse, PatchExam, PatchUser};
use crate::models::admin::requests::{PatchCourseRequest, PatchExamRequest, PatchUserRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::context::{bad_request, error_response};
use crate::utils::validate::validate_email;

/// 去掉首尾空白；空字符串视为未提供
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn patch_user(
    service: &AdminService,
    user_id: String,
    body: PatchUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let patch = PatchUser {
        user_id,
        name: trimmed(body.name),
        email: trimmed(body.email),
        archived: body.archived,
    };
    if patch.name.is_none() && patch.email.is_none() && patch.archived.is_none() {
        return Ok(bad_request(ErrorCode::BadRequest, "Nothing to update"));
    }
    if let Some(email) = &patch.email
        && let Err(msg) = validate_email(email)
    {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    info!("Updating user {}", patch.user_id);
    match service.get_client(request).patch_user(patch).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data, "User updated"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn patch_course(
    service: &AdminService,
    course_id: String,
    body: PatchCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let patch = PatchCourse {
        course_id,
        code: trimmed(body.code),
        name: trimmed(body.name),
        archived: body.archived,
    };
    if patch.code.is_none() && patch.name.is_none() && patch.archived.is_none() {
        return Ok(bad_request(ErrorCode::BadRequest, "Nothing to update"));
    }

    info!("Updating course {}", patch.course_id);
    match service.get_client(request).patch_course(patch).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data, "Course updated"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn patch_exam(
    service: &AdminService,
    exam_id: String,
    body: PatchExamRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let message = if body.archived {
        "Exam archived"
    } else {
        "Exam restored"
    };
    let patch = PatchExam {
        exam_id,
        archived: body.archived,
    };
    match service.get_client(request).patch_exam(patch).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data, message))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_are_not_sent() {
        assert_eq!(trimmed(Some("  ".into())), None);
        assert_eq!(trimmed(Some(" Algebra ".into())).as_deref(), Some("Algebra"));
        assert_eq!(trimmed(None), None);
    }
}
