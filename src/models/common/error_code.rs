use serde::Serialize;
use ts_rs::TS;

use crate::errors::RosterError;

// 统一业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/error-code.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    NotFound = 1001,
    Conflict = 1002,
    InternalServerError = 1003,
    RateLimitExceeded = 1004,
    PayloadTooLarge = 1005,

    // 导入相关 2xxx
    ImportEmpty = 2000,
    ImportTooManyRows = 2001,
    ImportRowNotFound = 2002,
    ImportTargetInvalid = 2003,
    ImportContextMissing = 2004,
    ImportNothingToCommit = 2005,
    ImportFileTypeNotAllowed = 2006,
    ImportFileReadFailed = 2007,

    // 班级/成员相关 3xxx
    SectionDeleteNotConfirmed = 3000,
    SectionReserved = 3001,
    MembershipPlanEmpty = 3002,

    // 上游后端 4xxx
    UpstreamFailed = 4000,
    UpstreamTimeout = 4001,
}

impl ErrorCode {
    /// 根据内部错误推导业务错误码
    pub fn from_error(err: &RosterError) -> Self {
        match err {
            RosterError::Validation(_) => ErrorCode::BadRequest,
            RosterError::EmptyInput(_) => ErrorCode::ImportEmpty,
            RosterError::NotFound(_) => ErrorCode::NotFound,
            RosterError::Conflict(_) => ErrorCode::Conflict,
            RosterError::Upstream(_) => ErrorCode::UpstreamFailed,
            RosterError::UpstreamTimeout(_) => ErrorCode::UpstreamTimeout,
            RosterError::Config(_)
            | RosterError::Serialization(_)
            | RosterError::FileOperation(_) => ErrorCode::InternalServerError,
        }
    }
}
