use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RosterService;
use crate::models::ApiResponse;
use crate::models::directory::entities::PersonRole;
use crate::models::navigation::{ConsoleTab, NavParams, NavigationState, reconcile};
use crate::models::roster::requests::PeopleQuery;
use crate::models::roster::responses::{CourseListResponse, PeopleListResponse};
use crate::roster::aggregate::{filter_courses, filter_people};
use crate::services::context::error_response;

/// 未显式指定角色时由标签页推导
fn role_for(state: &NavigationState) -> Option<PersonRole> {
    match state.tab {
        ConsoleTab::Teachers => Some(PersonRole::Teacher),
        ConsoleTab::Students => Some(PersonRole::Student),
        _ => None,
    }
}

pub async fn list_people(
    service: &RosterService,
    query: PeopleQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let navigation = reconcile(&NavigationState::default(), &query.nav);
    let role = query.role.or_else(|| role_for(&navigation));

    let people = match service.get_client(request).list_people(role).await {
        Ok(people) => people,
        Err(e) => return Ok(error_response(&e)),
    };
    let (items, archived_hidden) = filter_people(&people, &navigation);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PeopleListResponse {
            navigation,
            total: items.len(),
            items,
            archived_hidden,
        },
        "People loaded",
    )))
}

pub async fn list_courses(
    service: &RosterService,
    params: NavParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut navigation = reconcile(&NavigationState::default(), &params);
    if params.tab.is_none() {
        navigation.tab = ConsoleTab::Courses;
    }

    let courses = match service.get_client(request).list_courses().await {
        Ok(courses) => courses,
        Err(e) => return Ok(error_response(&e)),
    };
    let (items, archived_hidden) = filter_courses(&courses, &navigation);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseListResponse {
            navigation,
            total: items.len(),
            items,
            archived_hidden,
        },
        "Courses loaded",
    )))
}
