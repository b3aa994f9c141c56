//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_roster_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum RosterError {
            $($variant(String),)*
        }

        impl RosterError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(RosterError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(RosterError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(RosterError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl RosterError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        RosterError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_roster_errors! {
    Config("E001", "Configuration Error"),
    Validation("E002", "Validation Error"),
    EmptyInput("E003", "Empty Input"),
    NotFound("E004", "Resource Not Found"),
    Conflict("E005", "Resource Conflict"),
    Upstream("E006", "Upstream Request Error"),
    UpstreamTimeout("E007", "Upstream Timeout"),
    Serialization("E008", "Serialization Error"),
    FileOperation("E009", "File Operation Error"),
}

impl RosterError {
    /// 幂等语义下可视为成功的"未找到"
    pub fn is_not_found(&self) -> bool {
        matches!(self, RosterError::NotFound(_))
    }

    /// 幂等语义下可视为成功的"已存在"
    pub fn is_conflict(&self) -> bool {
        matches!(self, RosterError::Conflict(_))
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RosterError {}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        RosterError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for RosterError {
    fn from(err: csv::Error) -> Self {
        RosterError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for RosterError {
    fn from(err: config::ConfigError) -> Self {
        RosterError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for RosterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RosterError::UpstreamTimeout(err.to_string())
        } else if err.is_decode() {
            RosterError::Serialization(err.to_string())
        } else {
            RosterError::Upstream(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
