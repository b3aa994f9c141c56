use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

use super::requests::BackendRequest;
use crate::config::BackendConfig;
use crate::errors::{Result, RosterError};

/// 上游后端传输层
#[async_trait]
pub trait Transport: Send + Sync {
    /// 发送请求并返回 JSON 响应体（空响应体为 `Null`）
    async fn send(&self, request: &BackendRequest) -> Result<serde_json::Value>;
}

/// 基于 reqwest 的 HTTP 传输
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RosterError::config(format!("Failed to build HTTP client: {e}")))?;

        let api_token = if config.api_token.trim().is_empty() {
            None
        } else {
            Some(config.api_token.clone())
        };

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    fn url(&self, request: &BackendRequest) -> String {
        format!("{}{}", self.base_url, request.path())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &BackendRequest) -> Result<serde_json::Value> {
        let url = self.url(request);
        debug!("{} {} ({})", request.method(), url, request.operation());

        let mut builder = self
            .client
            .request(request.method(), &url)
            .query(&request.query());
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body()? {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = failure_message(&bytes);
            return Err(classify_failure(request.operation(), status, &message));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// 从错误响应体中取出可读信息
fn failure_message(bytes: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(bytes) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    String::from_utf8_lossy(bytes).trim().to_string()
}

/// 按状态码与信息对失败归类
pub fn classify_failure(operation: &str, status: StatusCode, message: &str) -> RosterError {
    let detail = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        message.to_string()
    };

    match status {
        StatusCode::NOT_FOUND => RosterError::not_found(detail),
        StatusCode::CONFLICT => RosterError::conflict(detail),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RosterError::upstream_timeout(format!("{operation}: {detail}"))
        }
        _ if detail.to_lowercase().contains("already exists") => RosterError::conflict(detail),
        _ => RosterError::upstream(format!(
            "{operation} failed with status {}: {detail}",
            status.as_u16()
        )),
    }
}
