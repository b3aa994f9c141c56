use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub staging: StagingConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            system_name: "Roster Console".to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub unix_socket_path: String,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            unix_socket_path: String::new(),
            workers: 0,
            max_workers: 8,
            timeouts: TimeoutConfig::default(),
            limits: LimitConfig::default(),
        }
    }
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            client_request: 30_000,
            client_disconnect: 5_000,
            keep_alive: 30,
        }
    }
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_payload_size: 4 * 1024 * 1024,
        }
    }
}

/// 上游机构后端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub api_token: String,
    pub institution_id: String,
    /// 单个请求超时（毫秒），超时后该请求按失败处理
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/api".to_string(),
            api_token: String::new(),
            institution_id: String::new(),
            timeout_ms: 15_000,
            user_agent: "roster-console/0.1".to_string(),
        }
    }
}

/// 导入暂存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// 同时保留的暂存条目上限
    pub max_sessions: u64,
    /// 暂存条目空闲过期时间（秒）
    pub idle_ttl_secs: u64,
    /// 单次导入最大行数
    pub max_rows: usize,
    /// 预览默认显示行数
    pub preview_limit: usize,
    /// 错误摘要显示条数
    pub error_summary_limit: usize,
    /// 默认提交策略：per_row / batch
    pub default_commit_strategy: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            idle_ttl_secs: 1_800,
            max_rows: 1_000,
            preview_limit: 5,
            error_summary_limit: 5,
            default_commit_strategy: "per_row".to_string(),
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            max_age: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_size: usize,                 // 单文件最大字节数
    pub allowed_extensions: Vec<String>, // 允许的扩展名
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size: 2 * 1024 * 1024,
            allowed_extensions: vec!["csv".to_string(), "tsv".to_string(), "txt".to_string()],
        }
    }
}
