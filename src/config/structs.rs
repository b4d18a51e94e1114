use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShortenerError};

/// 环境变量前缀，分隔符为 `__`，例如 `SU__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "SU";

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 从环境变量读取时按逗号拆分的列表字段
const LIST_ENV_KEYS: &[&str] = &[
    "server.trusted_proxies",
    "server.cors.allowed_origins",
    "server.cors.allowed_methods",
    "server.cors.allowed_headers",
];

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、worker 数、可信代理、跨域
/// - shortener: 短码长度、分配重试上限、短链接前缀
/// - rate_limit: 每个客户端的窗口和请求上限
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub shortener: ShortenerConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config file > 默认值。
    /// `path` 为 `None` 时读取可选的 `config.toml`；显式指定的文件必须存在。
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with_env(path, Self::env_source())
    }

    /// 环境变量来源，列表字段用逗号分隔
    pub fn env_source() -> config::Environment {
        let env = config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",");
        LIST_ENV_KEYS
            .iter()
            .fold(env, |env, key| env.with_list_parse_key(key))
    }

    /// 使用指定的环境变量来源加载
    pub fn load_with_env(path: Option<&str>, env: config::Environment) -> Result<Self> {
        use config::{Config, File};

        let (path, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let settings = Config::builder()
            .add_source(File::with_name(path).required(required))
            .add_source(env)
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 校验取值范围
    pub fn validate(&self) -> Result<()> {
        let s = &self.shortener;
        if s.code_length == 0 || s.code_length > crate::utils::MAX_SHORT_CODE_LENGTH {
            return Err(ShortenerError::config(format!(
                "shortener.code_length must be between 1 and {}, got {}",
                crate::utils::MAX_SHORT_CODE_LENGTH,
                s.code_length
            )));
        }
        if s.max_attempts == 0 {
            return Err(ShortenerError::config(
                "shortener.max_attempts must be at least 1",
            ));
        }
        if let Some(base) = &s.base_url
            && url::Url::parse(base).is_err()
        {
            return Err(ShortenerError::config(format!(
                "shortener.base_url is not a valid URL: {}",
                base
            )));
        }

        let r = &self.rate_limit;
        if r.max_requests == 0 {
            return Err(ShortenerError::config(
                "rate_limit.max_requests must be at least 1",
            ));
        }
        if r.window_secs == 0 {
            return Err(ShortenerError::config(
                "rate_limit.window_secs must be at least 1",
            ));
        }

        for origin in &self.server.cors.allowed_origins {
            if origin != "*" && url::Url::parse(origin).is_err() {
                return Err(ShortenerError::config(format!(
                    "server.cors.allowed_origins contains an invalid origin: {}",
                    origin
                )));
            }
        }
        for method in &self.server.cors.allowed_methods {
            if method.parse::<actix_web::http::Method>().is_err() {
                return Err(ShortenerError::config(format!(
                    "server.cors.allowed_methods contains an invalid method: {}",
                    method
                )));
            }
        }

        if self.logging.format != "text" && self.logging.format != "json" {
            return Err(ShortenerError::config(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// 生成示例 TOML 配置文件（全部默认值）
    pub fn generate_sample_config() -> Result<String> {
        toml::to_string_pretty(&Self::default())
            .map_err(|e| ShortenerError::config(format!("Failed to serialize config: {}", e)))
    }

    /// 把示例配置写入文件，父目录不存在时自动创建
    pub fn write_sample_config<P: AsRef<std::path::Path>>(path: P) -> Result<()> {
        let content = Self::generate_sample_config()?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// 可信反向代理（IP 或 CIDR），来自这些地址的请求使用 X-Forwarded-For 作为客户端标识
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// 跨域配置
///
/// 默认允许任意来源，浏览器前端可以直接调用 `/api/shorten`。
/// `allowed_origins` 为空表示只允许同源；包含 `"*"` 表示任意来源。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorsConfig {
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cors_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_allowed_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_cors_allowed_headers")]
    pub allowed_headers: Vec<String>,
    /// 预检结果缓存时间（秒）
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
    /// 任意来源时忽略此项
    #[serde(default)]
    pub allow_credentials: bool,
}

/// 短码分配配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShortenerConfig {
    /// 返回短链接的前缀，未设置时从请求 host 推断
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// 每次分配最多尝试的候选短码数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// 限流配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
}

// ============================================================
// 默认值函数
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    5001
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_cors_enabled() -> bool {
    true
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_allowed_methods() -> Vec<String> {
    ["GET", "POST", "HEAD", "OPTIONS"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn default_cors_allowed_headers() -> Vec<String> {
    ["Content-Type", "Accept", "X-Request-ID"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

fn default_cors_max_age() -> u64 {
    3600
}

fn default_code_length() -> usize {
    6
}

fn default_max_attempts() -> u32 {
    32
}

fn default_max_requests() -> u32 {
    10
}

fn default_window_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

// ============================================================
// Default 实现
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
            trusted_proxies: Vec::new(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            allowed_origins: default_cors_allowed_origins(),
            allowed_methods: default_cors_allowed_methods(),
            allowed_headers: default_cors_allowed_headers(),
            max_age: default_cors_max_age(),
            allow_credentials: false,
        }
    }
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            code_length: default_code_length(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.shortener.code_length, 6);
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert!(config.shortener.base_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[shortener]
base_url = "https://sho.rt/s/"
code_length = 8

[rate_limit]
max_requests = 3
"#
        )
        .unwrap();

        let config = StaticConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.shortener.code_length, 8);
        assert_eq!(
            config.shortener.base_url.as_deref(),
            Some("https://sho.rt/s/")
        );
        assert_eq!(config.rate_limit.max_requests, 3);
        // 未出现的字段回落到默认值
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.server.port, 5001);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let result = StaticConfig::load(Some("/definitely/not/here/config.toml"));
        assert!(matches!(result, Err(ShortenerError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = StaticConfig::default();
        config.shortener.code_length = 0;
        assert!(config.validate().is_err());

        let mut config = StaticConfig::default();
        config.shortener.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = StaticConfig::default();
        config.rate_limit.window_secs = 0;
        assert!(config.validate().is_err());

        let mut config = StaticConfig::default();
        config.shortener.base_url = Some("not a url".to_string());
        assert!(config.validate().is_err());

        let mut config = StaticConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_config_round_trips() {
        let sample = StaticConfig::generate_sample_config().unwrap();
        assert!(sample.contains("[rate_limit]"));
        assert!(sample.contains("[server.cors]"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.shortener, ShortenerConfig::default());
        assert_eq!(parsed.server.cors, CorsConfig::default());
    }

    #[test]
    fn test_write_sample_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        StaticConfig::write_sample_config(&path).unwrap();

        let written = StaticConfig::load(path.to_str()).unwrap();
        assert_eq!(written.rate_limit, RateLimitConfig::default());
        assert_eq!(written.server.cors, CorsConfig::default());
    }

    fn env_from(pairs: &[(&str, &str)]) -> config::Environment {
        let vars: config::Map<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StaticConfig::env_source().source(Some(vars))
    }

    #[test]
    fn test_env_overrides_scalars() {
        let config = StaticConfig::load_with_env(
            None,
            env_from(&[("SU__SERVER__PORT", "9000"), ("SU__RATE_LIMIT__MAX_REQUESTS", "4")]),
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.rate_limit.max_requests, 4);
    }

    #[test]
    fn test_env_overrides_lists() {
        let config = StaticConfig::load_with_env(
            None,
            env_from(&[
                ("SU__SERVER__TRUSTED_PROXIES", "10.0.0.0/8,192.168.1.1"),
                ("SU__SERVER__CORS__ALLOWED_ORIGINS", "https://a.example,https://b.example"),
            ]),
        )
        .unwrap();
        assert_eq!(
            config.server.trusted_proxies,
            vec!["10.0.0.0/8".to_string(), "192.168.1.1".to_string()]
        );
        assert_eq!(
            config.server.cors.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_cors_defaults_allow_any_origin() {
        let cors = CorsConfig::default();
        assert!(cors.enabled);
        assert_eq!(cors.allowed_origins, vec!["*".to_string()]);
        assert!(cors.allowed_methods.iter().any(|m| m == "POST"));
    }

    #[test]
    fn test_validate_rejects_bad_cors_method() {
        let mut config = StaticConfig::default();
        config.server.cors.allowed_methods = vec!["NOT A METHOD".to_string()];
        assert!(config.validate().is_err());

        let mut config = StaticConfig::default();
        config.server.cors.allowed_origins = vec!["not an origin".to_string()];
        assert!(config.validate().is_err());
    }
}
