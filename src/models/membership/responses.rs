use serde::Serialize;
use ts_rs::TS;

use crate::models::imports::entities::StatusCounts;
use crate::models::roster::responses::CourseDetail;
use crate::reconcile::{MembershipCommitReport, MembershipPlan};

// 当前成员变更计划
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/membership.ts")]
pub struct MembershipPlanResponse {
    pub plan: MembershipPlan,
    pub pending_operations: usize,
}

// 成员导入结果：计划与被拒绝的行
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/membership.ts")]
pub struct MembershipImportResponse {
    pub plan: MembershipPlan,
    pub pending_operations: usize,
    pub counts: StatusCounts,
    pub errors: Vec<String>,
    pub error_count: usize,
}

// 成员计划提交结果
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/membership.ts")]
pub struct MembershipCommitResponse {
    pub report: MembershipCommitReport,
    pub error_summary: Vec<String>,
    /// 提交后重新聚合的课程详情；刷新失败时为空
    pub detail: Option<CourseDetail>,
}
