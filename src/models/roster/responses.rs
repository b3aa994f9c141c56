use serde::Serialize;
use ts_rs::TS;

use crate::models::directory::entities::{Course, EntityId, Exam, Person};
use crate::models::navigation::NavigationState;

// 成员摘要（按用户 ID 去重）
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/roster.ts")]
pub struct MemberSummary {
    pub user_id: EntityId,
    pub name: String,
}

// 班级摘要，名称已替换默认班级的保留名
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/roster.ts")]
pub struct SectionSummary {
    pub id: EntityId,
    pub name: String,
    pub is_default: bool,
    pub teacher_count: usize,
    pub student_count: usize,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/roster.ts")]
pub struct CourseDetail {
    pub course: Course,
    pub sections: Vec<SectionSummary>,
    pub exams: Vec<Exam>,
    pub teachers: Vec<MemberSummary>,
    pub students: Vec<MemberSummary>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/roster.ts")]
pub struct SectionDetail {
    pub section: SectionSummary,
    pub course: Option<Course>,
    pub exams: Vec<Exam>,
    pub teachers: Vec<MemberSummary>,
    pub students: Vec<MemberSummary>,
}

// 列表响应：规范化后的导航状态与可见子集
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/roster.ts")]
pub struct PeopleListResponse {
    pub navigation: NavigationState,
    pub items: Vec<Person>,
    pub total: usize,
    pub archived_hidden: usize,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/roster.ts")]
pub struct CourseListResponse {
    pub navigation: NavigationState,
    pub items: Vec<Course>,
    pub total: usize,
    pub archived_hidden: usize,
}
