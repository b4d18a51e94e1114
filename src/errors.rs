use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortenerError {
    InvalidUrl(String),
    NotFound(String),
    Internal(String),
    Config(String),
}

impl ShortenerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortenerError::InvalidUrl(_) => "E001",
            ShortenerError::NotFound(_) => "E002",
            ShortenerError::Internal(_) => "E003",
            ShortenerError::Config(_) => "E004",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortenerError::InvalidUrl(_) => "Invalid URL",
            ShortenerError::NotFound(_) => "Resource Not Found",
            ShortenerError::Internal(_) => "Internal Error",
            ShortenerError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortenerError::InvalidUrl(msg) => msg,
            ShortenerError::NotFound(msg) => msg,
            ShortenerError::Internal(msg) => msg,
            ShortenerError::Config(msg) => msg,
        }
    }

    /// HTTP 层对应的状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            ShortenerError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
            ShortenerError::Internal(_) | ShortenerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 可以返回给客户端的消息
    ///
    /// 内部错误的细节只写日志，不返回
    pub fn public_message(&self) -> &'static str {
        match self {
            ShortenerError::InvalidUrl(_) => "Invalid URL format",
            ShortenerError::NotFound(_) => "Not found",
            ShortenerError::Internal(_) | ShortenerError::Config(_) => "Internal server error",
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortenerError {}

// 便捷的构造函数
impl ShortenerError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        ShortenerError::InvalidUrl(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortenerError::NotFound(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Internal(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortenerError::Config(msg.into())
    }
}

impl From<config::ConfigError> for ShortenerError {
    fn from(err: config::ConfigError) -> Self {
        ShortenerError::Config(err.to_string())
    }
}

impl From<std::io::Error> for ShortenerError {
    fn from(err: std::io::Error) -> Self {
        ShortenerError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortenerError>;
