//! 会话级暂存缓存

pub mod staging;

pub use staging::{MembershipCache, MembershipKey, SessionCache, StagingCache, StagingKey};
