use chrono_tz::Tz;
use std::path::PathBuf;
use std::time::Duration;

/// 服务器配置 - 边缘节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/crab/edge | 工作目录 |
/// | DATABASE_PATH | {WORK_DIR}/pos.db | SQLite 数据库文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | MAX_CONNECTIONS | 1000 | 最大并发请求数 |
/// | BUSINESS_TIMEZONE | Asia/Kolkata | 营业时区 (决定订单所属日期) |
/// | PRINT_POOL_SIZE | 3 | 打印面板池最大空闲数 |
/// | PRINT_JOB_TIMEOUT_MS | 10000 | 单个厨房打印任务超时(毫秒) |
/// | PAPER_WIDTH | 48 | 小票宽度 (字符, 80mm=48) |
/// | DEFAULT_KITCHEN_PRINTER | 127.0.0.1:9100 | 未映射分类的默认厨房打印机 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 滚动日志目录 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/crab HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    pub max_connections: usize,
    /// 营业时区
    pub timezone: Tz,
    /// 打印面板池最大空闲数
    pub print_pool_size: usize,
    pub print_job_timeout_ms: u64,
    pub paper_width: usize,
    /// 默认厨房打印机 (host:port)
    pub default_kitchen_printer: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// BUSINESS_TIMEZONE 无法识别时的原始值 (日志初始化后再告警)
    pub rejected_timezone: Option<String>,
}

const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

/// Parse an IANA zone name, keeping the raw value when it is unknown
fn resolve_timezone(value: Option<String>) -> (Tz, Option<String>) {
    match value {
        Some(v) => match v.trim().parse::<Tz>() {
            Ok(tz) => (tz, None),
            Err(_) => (DEFAULT_TIMEZONE, Some(v)),
        },
        None => (DEFAULT_TIMEZONE, None),
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/crab/edge".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("pos.db")
                .to_string_lossy()
                .into_owned()
        });
        let (timezone, rejected_timezone) =
            resolve_timezone(std::env::var("BUSINESS_TIMEZONE").ok());

        Self {
            work_dir,
            database_path,
            http_port: env_or("HTTP_PORT", 3000),
            max_connections: env_or("MAX_CONNECTIONS", 1000),
            timezone,
            print_pool_size: env_or("PRINT_POOL_SIZE", 3),
            print_job_timeout_ms: env_or("PRINT_JOB_TIMEOUT_MS", 10_000),
            paper_width: env_or("PAPER_WIDTH", 48),
            default_kitchen_printer: std::env::var("DEFAULT_KITCHEN_PRINTER")
                .unwrap_or_else(|_| "127.0.0.1:9100".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            rejected_timezone,
        }
    }

    /// Report values that fell back to defaults; call once the logger is up
    pub fn warn_fallbacks(&self) {
        if let Some(value) = &self.rejected_timezone {
            tracing::warn!(
                value = %value,
                fallback = %self.timezone,
                "Unknown BUSINESS_TIMEZONE, using fallback"
            );
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = PathBuf::from(&config.work_dir)
            .join("pos.db")
            .to_string_lossy()
            .into_owned();
        config.http_port = http_port;
        config
    }

    pub fn print_job_timeout(&self) -> Duration {
        Duration::from_millis(self.print_job_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_move_database_into_work_dir() {
        let config = Config::with_overrides("/tmp/crab-test", 3999);
        assert_eq!(config.http_port, 3999);
        assert!(config.database_path.starts_with("/tmp/crab-test"));
        assert!(config.database_path.ends_with("pos.db"));
    }

    #[test]
    fn unknown_timezone_is_kept_for_later_warning() {
        let (tz, rejected) = resolve_timezone(Some("Mars/Olympus_Mons".into()));
        assert_eq!(tz, DEFAULT_TIMEZONE);
        assert_eq!(rejected.as_deref(), Some("Mars/Olympus_Mons"));

        let (tz, rejected) = resolve_timezone(Some(" Asia/Dubai ".into()));
        assert_eq!(tz, chrono_tz::Asia::Dubai);
        assert!(rejected.is_none());

        let (tz, rejected) = resolve_timezone(None);
        assert_eq!(tz, DEFAULT_TIMEZONE);
        assert!(rejected.is_none());
    }

    #[test]
    fn env_or_falls_back_on_garbage() {
        // Key that is never set by the test environment
        assert_eq!(env_or("CRAB_TEST_UNSET_NUMBER", 7usize), 7);
    }
}
