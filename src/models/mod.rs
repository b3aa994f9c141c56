pub mod admin;
pub mod common;
pub mod directory;
pub mod imports;
pub mod membership;
pub mod navigation;
pub mod roster;

pub use common::{ApiResponse, ErrorCode};

/// 进程启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
