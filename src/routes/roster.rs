use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::navigation::NavParams;
use crate::models::roster::requests::{DetailQuery, ExportPeopleQuery, PeopleQuery};
use crate::services::RosterService;
use crate::utils::SafeEntityId;

static ROSTER_SERVICE: Lazy<RosterService> = Lazy::new(RosterService::new_lazy);

pub async fn list_people(
    req: HttpRequest,
    query: web::Query<PeopleQuery>,
) -> ActixResult<HttpResponse> {
    ROSTER_SERVICE.list_people(query.into_inner(), &req).await
}

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<NavParams>,
) -> ActixResult<HttpResponse> {
    ROSTER_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn course_detail(req: HttpRequest, course_id: SafeEntityId) -> ActixResult<HttpResponse> {
    ROSTER_SERVICE.course_detail(course_id.0, &req).await
}

pub async fn section_detail(
    req: HttpRequest,
    section_id: SafeEntityId,
) -> ActixResult<HttpResponse> {
    ROSTER_SERVICE.section_detail(section_id.0, &req).await
}

pub async fn user_detail(
    req: HttpRequest,
    user_id: SafeEntityId,
    query: web::Query<DetailQuery>,
) -> ActixResult<HttpResponse> {
    ROSTER_SERVICE
        .user_detail(user_id.0, query.into_inner(), &req)
        .await
}

pub async fn export_people(
    req: HttpRequest,
    query: web::Query<ExportPeopleQuery>,
) -> ActixResult<HttpResponse> {
    ROSTER_SERVICE.export_people(query.into_inner(), &req).await
}

pub async fn export_courses(
    req: HttpRequest,
    query: web::Query<DetailQuery>,
) -> ActixResult<HttpResponse> {
    ROSTER_SERVICE.export_courses(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_roster_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/v1/people").route(web::get().to(list_people)))
        .service(web::resource("/api/v1/courses").route(web::get().to(list_courses)))
        .service(web::resource("/api/v1/courses/{id}/detail").route(web::get().to(course_detail)))
        .service(
            web::resource("/api/v1/sections/{id}/detail").route(web::get().to(section_detail)),
        )
        .service(web::resource("/api/v1/users/{id}/detail").route(web::get().to(user_detail)))
        .service(
            web::scope("/api/v1/export")
                .service(web::resource("/people").route(web::get().to(export_people)))
                .service(web::resource("/courses").route(web::get().to(export_courses))),
        );
}
