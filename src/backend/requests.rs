//! 上游后端请求
//!
//! 每个操作对应一个变体和一个载荷结构，载荷只序列化显式给出的可选字段。

use reqwest::Method;
use serde::Serialize;

use crate::models::directory::entities::{EntityId, PersonRole};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub institution_id: String,
    pub role: PersonRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateUsers {
    pub role: PersonRole,
    pub users: Vec<NewUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatchUser {
    pub user_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewCourse {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchCreateCourses {
    pub courses: Vec<NewCourse>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatchCourse {
    pub course_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSection {
    pub course_id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSection {
    pub course_code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchCreateSections {
    pub sections: Vec<NewSection>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatchSection {
    pub section_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSection {
    pub section_id: EntityId,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollment {
    pub user_id: EntityId,
    pub course_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<EntityId>,
    pub role: PersonRole,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchEnroll {
    pub role: PersonRole,
    pub course_id: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<EntityId>,
    pub emails: Vec<String>,
}

/// 删除成员关系：按 (用户, 班级) 或按成员关系 ID
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum DeleteEnrollment {
    #[serde(rename_all = "camelCase")]
    ByMember { user_id: EntityId, class_id: EntityId },
    #[serde(rename_all = "camelCase")]
    ById { enrollment_id: EntityId },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatchExam {
    pub exam_id: EntityId,
    pub archived: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    CreateUser(CreateUser),
    BatchCreateUsers(BatchCreateUsers),
    PatchUser(PatchUser),
    CreateCourse(NewCourse),
    BatchCreateCourses(BatchCreateCourses),
    PatchCourse(PatchCourse),
    CreateSection(CreateSection),
    BatchCreateSections(BatchCreateSections),
    PatchSection(PatchSection),
    DeleteSection(DeleteSection),
    Enroll(CreateEnrollment),
    BatchEnroll(BatchEnroll),
    Unenroll(DeleteEnrollment),
    PatchExam(PatchExam),
    ListUsers { role: Option<PersonRole> },
    ListCourses,
    ListSections,
    ListExams,
    UserDetail { user_id: EntityId, include_archived: bool },
}

impl BackendRequest {
    /// 日志中使用的操作名
    pub fn operation(&self) -> &'static str {
        match self {
            BackendRequest::CreateUser(_) => "create_user",
            BackendRequest::BatchCreateUsers(_) => "batch_create_users",
            BackendRequest::PatchUser(_) => "patch_user",
            BackendRequest::CreateCourse(_) => "create_course",
            BackendRequest::BatchCreateCourses(_) => "batch_create_courses",
            BackendRequest::PatchCourse(_) => "patch_course",
            BackendRequest::CreateSection(_) => "create_section",
            BackendRequest::BatchCreateSections(_) => "batch_create_sections",
            BackendRequest::PatchSection(_) => "patch_section",
            BackendRequest::DeleteSection(_) => "delete_section",
            BackendRequest::Enroll(_) => "enroll",
            BackendRequest::BatchEnroll(_) => "batch_enroll",
            BackendRequest::Unenroll(_) => "unenroll",
            BackendRequest::PatchExam(_) => "patch_exam",
            BackendRequest::ListUsers { .. } => "list_users",
            BackendRequest::ListCourses => "list_courses",
            BackendRequest::ListSections => "list_sections",
            BackendRequest::ListExams => "list_exams",
            BackendRequest::UserDetail { .. } => "user_detail",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            BackendRequest::CreateUser(_)
            | BackendRequest::BatchCreateUsers(_)
            | BackendRequest::CreateCourse(_)
            | BackendRequest::BatchCreateCourses(_)
            | BackendRequest::CreateSection(_)
            | BackendRequest::BatchCreateSections(_)
            | BackendRequest::Enroll(_)
            | BackendRequest::BatchEnroll(_) => Method::POST,
            BackendRequest::PatchUser(_)
            | BackendRequest::PatchCourse(_)
            | BackendRequest::PatchSection(_)
            | BackendRequest::PatchExam(_) => Method::PATCH,
            BackendRequest::DeleteSection(_) | BackendRequest::Unenroll(_) => Method::DELETE,
            BackendRequest::ListUsers { .. }
            | BackendRequest::ListCourses
            | BackendRequest::ListSections
            | BackendRequest::ListExams
            | BackendRequest::UserDetail { .. } => Method::GET,
        }
    }

    /// 相对于后端根地址的路径
    pub fn path(&self) -> String {
        match self {
            BackendRequest::CreateUser(_)
            | BackendRequest::BatchCreateUsers(_)
            | BackendRequest::PatchUser(_)
            | BackendRequest::ListUsers { .. } => "/users".to_string(),
            BackendRequest::CreateCourse(_)
            | BackendRequest::BatchCreateCourses(_)
            | BackendRequest::PatchCourse(_)
            | BackendRequest::ListCourses => "/courses".to_string(),
            BackendRequest::CreateSection(_)
            | BackendRequest::BatchCreateSections(_)
            | BackendRequest::PatchSection(_)
            | BackendRequest::DeleteSection(_)
            | BackendRequest::ListSections => "/sections".to_string(),
            BackendRequest::Enroll(_)
            | BackendRequest::BatchEnroll(_)
            | BackendRequest::Unenroll(_) => "/enrollments".to_string(),
            BackendRequest::PatchExam(_) | BackendRequest::ListExams => "/exams".to_string(),
            BackendRequest::UserDetail { user_id, .. } => format!("/users/{user_id}/detail"),
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            BackendRequest::ListUsers { role } => {
                let mut query = vec![("includeArchived", "true".to_string())];
                if let Some(role) = role {
                    query.push(("role", role.as_str().to_string()));
                }
                query
            }
            BackendRequest::ListCourses
            | BackendRequest::ListSections
            | BackendRequest::ListExams => vec![("includeArchived", "true".to_string())],
            BackendRequest::UserDetail {
                include_archived, ..
            } => vec![("includeArchived", include_archived.to_string())],
            _ => Vec::new(),
        }
    }

    /// 请求体，读操作没有请求体
    pub fn body(&self) -> serde_json::Result<Option<serde_json::Value>> {
        let value = match self {
            BackendRequest::CreateUser(p) => serde_json::to_value(p)?,
            BackendRequest::BatchCreateUsers(p) => serde_json::to_value(p)?,
            BackendRequest::PatchUser(p) => serde_json::to_value(p)?,
            BackendRequest::CreateCourse(p) => serde_json::to_value(p)?,
            BackendRequest::BatchCreateCourses(p) => serde_json::to_value(p)?,
            BackendRequest::PatchCourse(p) => serde_json::to_value(p)?,
            BackendRequest::CreateSection(p) => serde_json::to_value(p)?,
            BackendRequest::BatchCreateSections(p) => serde_json::to_value(p)?,
            BackendRequest::PatchSection(p) => serde_json::to_value(p)?,
            BackendRequest::DeleteSection(p) => serde_json::to_value(p)?,
            BackendRequest::Enroll(p) => serde_json::to_value(p)?,
            BackendRequest::BatchEnroll(p) => serde_json::to_value(p)?,
            BackendRequest::Unenroll(p) => serde_json::to_value(p)?,
            BackendRequest::PatchExam(p) => serde_json::to_value(p)?,
            BackendRequest::ListUsers { .. }
            | BackendRequest::ListCourses
            | BackendRequest::ListSections
            | BackendRequest::ListExams
            | BackendRequest::UserDetail { .. } => return Ok(None),
        };
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_user_only_sends_given_fields() {
        let request = BackendRequest::PatchUser(PatchUser {
            user_id: "u1".into(),
            archived: Some(true),
            ..Default::default()
        });
        assert_eq!(request.method(), Method::PATCH);
        assert_eq!(
            request.body().unwrap(),
            Some(json!({"userId": "u1", "archived": true}))
        );
    }

    #[test]
    fn test_create_user_body() {
        let request = BackendRequest::CreateUser(CreateUser {
            institution_id: "inst".into(),
            role: PersonRole::Teacher,
            name: None,
            email: "t@x.com".into(),
            password: None,
        });
        assert_eq!(
            request.body().unwrap(),
            Some(json!({"institutionId": "inst", "role": "TEACHER", "email": "t@x.com"}))
        );
    }

    #[test]
    fn test_unenroll_variants_serialize_flat() {
        let by_member = BackendRequest::Unenroll(DeleteEnrollment::ByMember {
            user_id: "u1".into(),
            class_id: "s1".into(),
        });
        assert_eq!(
            by_member.body().unwrap(),
            Some(json!({"userId": "u1", "classId": "s1"}))
        );
        let by_id = BackendRequest::Unenroll(DeleteEnrollment::ById {
            enrollment_id: "e9".into(),
        });
        assert_eq!(by_id.body().unwrap(), Some(json!({"enrollmentId": "e9"})));
        assert_eq!(by_id.method(), Method::DELETE);
        assert_eq!(by_id.path(), "/enrollments");
    }

    #[test]
    fn test_batch_sections_use_course_code() {
        let request = BackendRequest::BatchCreateSections(BatchCreateSections {
            sections: vec![NewSection {
                course_code: "MATH101".into(),
                name: "A".into(),
            }],
        });
        assert_eq!(
            request.body().unwrap(),
            Some(json!({"sections": [{"courseCode": "MATH101", "name": "A"}]}))
        );
    }

    #[test]
    fn test_read_requests_have_query_and_no_body() {
        let request = BackendRequest::ListUsers {
            role: Some(PersonRole::Student),
        };
        assert_eq!(request.body().unwrap(), None);
        assert!(request.query().contains(&("role", "STUDENT".to_string())));

        let detail = BackendRequest::UserDetail {
            user_id: "u1".into(),
            include_archived: false,
        };
        assert_eq!(detail.path(), "/users/u1/detail");
        assert_eq!(detail.query(), vec![("includeArchived", "false".to_string())]);
    }
}
