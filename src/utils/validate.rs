use once_cell::sync::Lazy;
use regex::Regex;

// 只要求存在唯一的 @ 且两侧非空、无空白；更严格的校验交给后端
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("Invalid email regex"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() {
        return Err("Email is required");
    }
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 控制台会话 ID 必须是 UUID
pub fn validate_session_id(session_id: &str) -> Result<(), &'static str> {
    uuid::Uuid::parse_str(session_id)
        .map(|_| ())
        .map_err(|_| "Session id must be a UUID")
}
