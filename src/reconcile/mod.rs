//! 提交与协调：把暂存内容按固定顺序写入上游后端

pub mod committer;
pub mod delta;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub use committer::{Lookup, MembershipCommitReport, Reconciler};
pub use delta::{EnrollmentDelta, MembershipPlan, SectionDelta, diff_membership};

// 提交策略
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub enum CommitStrategy {
    /// 逐行顺序调用单条创建接口，单行失败不影响后续行
    #[default]
    PerRow,
    /// 一次调用批量接口，结果由后端汇总
    Batch,
}

impl CommitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitStrategy::PerRow => "per_row",
            CommitStrategy::Batch => "batch",
        }
    }
}

impl std::fmt::Display for CommitStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CommitStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_row" => Ok(CommitStrategy::PerRow),
            "batch" => Ok(CommitStrategy::Batch),
            _ => Err(format!(
                "Invalid commit strategy: {s}. Supported: per_row, batch"
            )),
        }
    }
}
