use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::requests::*;
use super::transport::Transport;
use crate::errors::{Result, RosterError};
use crate::models::directory::entities::{Course, EntityId, Exam, Person, PersonRole, Section};
use crate::models::imports::entities::CommitReport;

/// 幂等操作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    /// 本次调用完成了变更
    Applied,
    /// 目标状态已满足（已存在 / 不存在）
    AlreadySatisfied,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: Person,
}

/// 上游后端客户端
#[derive(Clone)]
pub struct BackendClient {
    transport: Arc<dyn Transport>,
    institution_id: String,
}

impl BackendClient {
    pub fn new(transport: Arc<dyn Transport>, institution_id: impl Into<String>) -> Self {
        Self {
            transport,
            institution_id: institution_id.into(),
        }
    }

    pub async fn send(&self, request: BackendRequest) -> Result<serde_json::Value> {
        let started = Instant::now();
        let result = self.transport.send(&request).await;
        debug!(
            "Backend {} finished in {:?} (ok: {})",
            request.operation(),
            started.elapsed(),
            result.is_ok()
        );
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, request: BackendRequest) -> Result<T> {
        let operation = request.operation();
        let value = self.send(request).await?;
        serde_json::from_value(value).map_err(|e| {
            RosterError::serialization(format!("Unexpected {operation} response: {e}"))
        })
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: BackendRequest,
        key: &str,
    ) -> Result<Vec<T>> {
        let operation = request.operation();
        let value = self.send(request).await?;
        decode_list(value, key)
            .map_err(|e| RosterError::serialization(format!("Unexpected {operation} response: {e}")))
    }

    // 人员

    pub async fn create_user(
        &self,
        role: PersonRole,
        name: Option<String>,
        email: String,
    ) -> Result<Person> {
        let envelope: UserEnvelope = self
            .fetch(BackendRequest::CreateUser(CreateUser {
                institution_id: self.institution_id.clone(),
                role,
                name,
                email,
                password: None,
            }))
            .await?;
        Ok(envelope.user)
    }

    pub async fn batch_create_users(&self, role: PersonRole, users: Vec<NewUser>) -> Result<CommitReport> {
        self.fetch(BackendRequest::BatchCreateUsers(BatchCreateUsers {
            role,
            users,
            password: None,
        }))
        .await
    }

    pub async fn patch_user(&self, patch: PatchUser) -> Result<serde_json::Value> {
        self.send(BackendRequest::PatchUser(patch)).await
    }

    pub async fn list_people(&self, role: Option<PersonRole>) -> Result<Vec<Person>> {
        self.fetch_list(BackendRequest::ListUsers { role }, "users").await
    }

    pub async fn user_detail(&self, user_id: EntityId, include_archived: bool) -> Result<serde_json::Value> {
        self.send(BackendRequest::UserDetail {
            user_id,
            include_archived,
        })
        .await
    }

    // 课程

    pub async fn create_course(&self, code: String, name: String) -> Result<serde_json::Value> {
        self.send(BackendRequest::CreateCourse(NewCourse { code, name }))
            .await
    }

    pub async fn batch_create_courses(&self, courses: Vec<NewCourse>) -> Result<CommitReport> {
        self.fetch(BackendRequest::BatchCreateCourses(BatchCreateCourses { courses }))
            .await
    }

    pub async fn patch_course(&self, patch: PatchCourse) -> Result<serde_json::Value> {
        self.send(BackendRequest::PatchCourse(patch)).await
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        self.fetch_list(BackendRequest::ListCourses, "courses").await
    }

    // 班级

    pub async fn create_section(&self, course_id: EntityId, name: String) -> Result<serde_json::Value> {
        self.send(BackendRequest::CreateSection(CreateSection { course_id, name }))
            .await
    }

    pub async fn batch_create_sections(&self, sections: Vec<NewSection>) -> Result<CommitReport> {
        self.fetch(BackendRequest::BatchCreateSections(BatchCreateSections { sections }))
            .await
    }

    pub async fn patch_section(&self, patch: PatchSection) -> Result<serde_json::Value> {
        self.send(BackendRequest::PatchSection(patch)).await
    }

    pub async fn delete_section(&self, section_id: EntityId) -> Result<()> {
        info!("Deleting section {}", section_id);
        self.send(BackendRequest::DeleteSection(DeleteSection { section_id }))
            .await?;
        Ok(())
    }

    pub async fn list_sections(&self) -> Result<Vec<Section>> {
        self.fetch_list(BackendRequest::ListSections, "sections").await
    }

    // 成员关系

    pub async fn enroll(&self, enrollment: CreateEnrollment) -> Result<serde_json::Value> {
        self.send(BackendRequest::Enroll(enrollment)).await
    }

    /// 加入成员；"已存在"视为成功
    pub async fn ensure_enrolled(&self, enrollment: CreateEnrollment) -> Result<Ensured> {
        match self.enroll(enrollment).await {
            Ok(_) => Ok(Ensured::Applied),
            Err(e) if e.is_conflict() => Ok(Ensured::AlreadySatisfied),
            Err(e) => Err(e),
        }
    }

    pub async fn batch_enroll(&self, batch: BatchEnroll) -> Result<CommitReport> {
        self.fetch(BackendRequest::BatchEnroll(batch)).await
    }

    pub async fn unenroll(&self, key: DeleteEnrollment) -> Result<()> {
        self.send(BackendRequest::Unenroll(key)).await?;
        Ok(())
    }

    /// 移除成员；"不存在"视为成功
    pub async fn ensure_unenrolled(&self, key: DeleteEnrollment) -> Result<Ensured> {
        match self.unenroll(key).await {
            Ok(()) => Ok(Ensured::Applied),
            Err(e) if e.is_not_found() => Ok(Ensured::AlreadySatisfied),
            Err(e) => Err(e),
        }
    }

    // 考试

    pub async fn patch_exam(&self, patch: PatchExam) -> Result<serde_json::Value> {
        self.send(BackendRequest::PatchExam(patch)).await
    }

    pub async fn list_exams(&self) -> Result<Vec<Exam>> {
        self.fetch_list(BackendRequest::ListExams, "exams").await
    }
}

/// 列表响应可能是数组，也可能包在以集合名为键的对象里
fn decode_list<T: DeserializeOwned>(value: serde_json::Value, key: &str) -> serde_json::Result<Vec<T>> {
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Object(mut map) => match map.remove(key).or_else(|| map.remove("items")) {
            Some(inner) => serde_json::from_value(inner),
            None => serde_json::from_value(serde_json::Value::Object(map)),
        },
        other => serde_json::from_value(other),
    }
}
