//! 批量导入工作流：解析 -> 校验 -> 预览 -> （提交见 reconcile）

pub mod export;
pub mod parser;
pub mod preview;
pub mod summary;
pub mod validator;

pub use parser::{Row, parse_rows};
pub use preview::PreviewStore;
pub use summary::summarize_errors;
