use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RosterService;
use crate::import::export;
use crate::models::directory::entities::{Archivable, PersonRole};
use crate::models::roster::requests::{DetailQuery, ExportPeopleQuery};
use crate::services::context::{csv_attachment, error_response};

pub async fn export_people(
    service: &RosterService,
    query: ExportPeopleQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let people = match service.get_client(request).list_people(Some(query.role)).await {
        Ok(people) => people,
        Err(e) => return Ok(error_response(&e)),
    };
    let people: Vec<_> = people
        .into_iter()
        .filter(|p| query.include_archived || !p.is_archived())
        .collect();

    let stem = match query.role {
        PersonRole::Teacher => "teachers",
        PersonRole::Student => "students",
    };
    match export::export_people(&people) {
        Ok(body) => Ok(csv_attachment(body, &export::file_name(stem))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn export_courses(
    service: &RosterService,
    query: DetailQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let courses = match service.get_client(request).list_courses().await {
        Ok(courses) => courses,
        Err(e) => return Ok(error_response(&e)),
    };
    let courses: Vec<_> = courses
        .into_iter()
        .filter(|c| query.include_archived || !c.is_archived())
        .collect();

    match export::export_courses(&courses) {
        Ok(body) => Ok(csv_attachment(body, &export::file_name("courses"))),
        Err(e) => Ok(error_response(&e)),
    }
}
