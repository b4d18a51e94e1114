//! URL 验证模块
//!
//! 只做结构校验：必须能解析出 scheme 和 host，不限制协议。

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    MissingHost,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::MissingHost => write!(f, "URL has no host component"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证 URL 结构
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 能被解析为绝对 URL（带 scheme）
/// 3. host 部分非空
///
/// 不限制协议，`ftp://host`、`javascript://host` 都能通过
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    if url.trim().is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    // Url::parse 已保证 scheme 非空
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/path?query=1").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
        assert!(validate_url("https://openai.com").is_ok());
    }

    #[test]
    fn test_non_http_schemes_accepted() {
        assert!(validate_url("ftp://files.example.com/a.iso").is_ok());
        assert!(validate_url("javascript://example.com").is_ok());
    }

    #[test]
    fn test_missing_host() {
        assert_eq!(
            validate_url("mailto:test@example.com"),
            Err(UrlValidationError::MissingHost)
        );
        assert_eq!(
            validate_url("file:///etc/passwd"),
            Err(UrlValidationError::MissingHost)
        );
    }

    #[test]
    fn test_invalid_format() {
        assert!(matches!(
            validate_url("not a url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_url("example.com/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_url("http://"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_empty_url() {
        assert_eq!(validate_url(""), Err(UrlValidationError::EmptyUrl));
        assert_eq!(validate_url("   "), Err(UrlValidationError::EmptyUrl));
    }
}
