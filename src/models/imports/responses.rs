use serde::Serialize;
use ts_rs::TS;

use super::entities::{CommitReport, ImportRecord, ImportTarget, RowStatus, StatusCounts};
use crate::models::directory::entities::{Course, Person, Section};
use crate::reconcile::CommitStrategy;

// 新建控制台会话响应
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct SessionResponse {
    pub session_id: String,
}

// 预览中的一行
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct PreviewRow {
    pub index: usize,
    pub record: ImportRecord,
    pub status: RowStatus,
}

// 预览响应
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct PreviewResponse {
    pub target: ImportTarget,
    pub rows: Vec<PreviewRow>,
    pub showing_all: bool,
    pub hidden_rows: usize,
    pub counts: StatusCounts,
    /// 截断后的错误摘要（前 N 条加 "+N more"）
    pub errors: Vec<String>,
    pub error_count: usize,
    /// 最近一次提交的结果（提交后暂存行已清空）
    pub last_report: Option<CommitReport>,
}

// 提交后重新加载的集合
#[derive(Debug, Serialize, TS)]
#[serde(tag = "collection", content = "items", rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub enum RefreshedCollection {
    People(Vec<Person>),
    Courses(Vec<Course>),
    Sections(Vec<Section>),
}

// 提交响应
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct CommitResponse {
    pub target: ImportTarget,
    pub strategy: CommitStrategy,
    pub report: CommitReport,
    pub error_summary: Vec<String>,
    /// 读侧刷新失败时为空，不影响提交结果
    pub refreshed: Option<RefreshedCollection>,
}
