//! 目录快照：从上游加载的人员、课程、班级与考试
//!
//! 每次请求重新加载，不做带手动失效的缓存。

use std::collections::HashSet;
use tracing::debug;

use crate::backend::BackendClient;
use crate::errors::Result;
use crate::models::directory::entities::{Course, Exam, Person, PersonRole, Section};
use crate::models::imports::entities::ImportTarget;
use crate::reconcile::Lookup;

#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub people: Vec<Person>,
    pub courses: Vec<Course>,
    pub sections: Vec<Section>,
    pub exams: Vec<Exam>,
}

impl Directory {
    /// 顺序加载全部集合
    pub async fn load(client: &BackendClient) -> Result<Self> {
        let people = client.list_people(None).await?;
        let courses = client.list_courses().await?;
        let sections = client.list_sections().await?;
        let exams = client.list_exams().await?;
        debug!(
            "Directory loaded: {} people, {} courses, {} sections, {} exams",
            people.len(),
            courses.len(),
            sections.len(),
            exams.len()
        );
        Ok(Self {
            people,
            courses,
            sections,
            exams,
        })
    }

    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn person(&self, user_id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == user_id)
    }

    /// 提交时使用的邮箱 / 课程代码索引
    pub fn lookup(&self) -> Lookup {
        Lookup {
            user_ids_by_email: self
                .people
                .iter()
                .map(|p| (p.email.trim().to_lowercase(), p.id.clone()))
                .collect(),
            course_ids_by_code: self
                .courses
                .iter()
                .map(|c| (c.code.trim().to_lowercase(), c.id.clone()))
                .collect(),
        }
    }
}

/// 读取导入目标对应的现有键（小写），用于区分 new / exists
///
/// 关联导入没有"新建"的概念，返回 None。
pub async fn existing_keys(client: &BackendClient, target: ImportTarget) -> Result<Option<HashSet<String>>> {
    let keys = match target {
        ImportTarget::Teachers | ImportTarget::Students => {
            let role = target.person_role().unwrap_or(PersonRole::Student);
            client
                .list_people(Some(role))
                .await?
                .into_iter()
                .map(|p| p.email.trim().to_lowercase())
                .collect()
        }
        ImportTarget::Courses => client
            .list_courses()
            .await?
            .into_iter()
            .map(|c| c.code.trim().to_lowercase())
            .collect(),
        ImportTarget::Sections => {
            let courses = client.list_courses().await?;
            client
                .list_sections()
                .await?
                .into_iter()
                .filter_map(|s| {
                    let course = courses.iter().find(|c| c.id == s.course_id)?;
                    Some(format!(
                        "{}::{}",
                        course.code.trim().to_lowercase(),
                        s.name.trim().to_lowercase()
                    ))
                })
                .collect()
        }
        ImportTarget::Assignments => return Ok(None),
    };
    Ok(Some(keys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendRequest;
    use crate::backend::testing::FakeTransport;
    use serde_json::json;

    fn fake_client() -> (std::sync::Arc<FakeTransport>, BackendClient) {
        let transport = FakeTransport::new(|request| {
            Ok(match request {
                BackendRequest::ListUsers { .. } => json!({"users": [
                    {"id": "u1", "email": "Alice@Test.com", "role": "STUDENT"}
                ]}),
                BackendRequest::ListCourses => json!([
                    {"id": "c1", "code": "MATH101", "name": "Algebra"}
                ]),
                BackendRequest::ListSections => json!({"sections": [
                    {"id": "s1", "courseId": "c1", "name": "Group A"},
                    {"id": "s2", "courseId": "gone", "name": "Orphan"}
                ]}),
                _ => json!([]),
            })
        });
        let client = BackendClient::new(transport.clone(), "inst");
        (transport, client)
    }

    #[tokio::test]
    async fn test_existing_keys_are_lowercase() {
        let (_, client) = fake_client();
        let keys = existing_keys(&client, ImportTarget::Students)
            .await
            .unwrap()
            .unwrap();
        assert!(keys.contains("alice@test.com"));
    }

    #[tokio::test]
    async fn test_existing_section_keys_use_course_code() {
        let (_, client) = fake_client();
        let keys = existing_keys(&client, ImportTarget::Sections)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys.contains("math101::group a"));
    }

    #[tokio::test]
    async fn test_assignments_have_no_existing_keys() {
        let (transport, client) = fake_client();
        assert!(existing_keys(&client, ImportTarget::Assignments)
            .await
            .unwrap()
            .is_none());
        assert!(transport.seen().is_empty());
    }

    #[tokio::test]
    async fn test_load_builds_lookup() {
        let (transport, client) = fake_client();
        let directory = Directory::load(&client).await.unwrap();
        assert_eq!(
            transport.operations(),
            vec!["list_users", "list_courses", "list_sections", "list_exams"]
        );
        let lookup = directory.lookup();
        assert_eq!(lookup.user_id("alice@test.com").map(String::as_str), Some("u1"));
        assert_eq!(lookup.course_id("math101").map(String::as_str), Some("c1"));
    }
}
