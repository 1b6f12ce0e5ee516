use std::path::{Path, PathBuf};

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | RESOLVE_WORK_DIR | ./data | 工作目录（数据库、日志） |
/// | RESOLVE_SERVER_PORT | 8080 | HTTP 服务端口 |
/// | RESOLVE_LOG_LEVEL | info | 日志级别 |
/// | RESOLVE_SWEEP_INTERVAL_MINUTES | 30 | 升级扫描间隔（分钟） |
/// | RESOLVE_EMAIL_API_URL | https://api.resend.com | 邮件服务地址 |
/// | RESOLVE_EMAIL_API_KEY | (空 = 禁用发送) | 邮件服务密钥 |
/// | RESOLVE_EMAIL_FROM | ResolveIt Notifications <...> | 发件人 |
/// | RESOLVE_EMAIL_QUEUE_SIZE | 256 | 邮件队列容量 |
///
/// # 示例
///
/// ```ignore
/// RESOLVE_WORK_DIR=/data/resolveit RESOLVE_SERVER_PORT=9090 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 日志级别: trace | debug | info | warn | error
    pub log_level: String,
    /// 升级扫描触发间隔（分钟）
    pub sweep_interval_minutes: u64,
    /// 邮件分发配置
    pub email: EmailConfig,
}

/// 邮件分发配置
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// 邮件服务 API 地址 (Resend 兼容)
    pub api_url: String,
    /// API 密钥，为空时禁用实际发送（仅记录日志）
    pub api_key: String,
    /// 发件人
    pub from: String,
    /// 队列容量，满时丢弃并告警
    pub queue_size: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("RESOLVE_WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("RESOLVE_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            log_level: std::env::var("RESOLVE_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            sweep_interval_minutes: std::env::var("RESOLVE_SWEEP_INTERVAL_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            email: EmailConfig {
                api_url: std::env::var("RESOLVE_EMAIL_API_URL")
                    .unwrap_or_else(|_| "https://api.resend.com".into()),
                api_key: std::env::var("RESOLVE_EMAIL_API_KEY").unwrap_or_default(),
                from: std::env::var("RESOLVE_EMAIL_FROM").unwrap_or_else(|_| {
                    "ResolveIt Notifications <notifications@resolveit.app>".into()
                }),
                queue_size: std::env::var("RESOLVE_EMAIL_QUEUE_SIZE")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(256),
            },
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/db)
    pub fn database_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("db")
    }

    /// 日志目录 (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// 升级扫描间隔
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_minutes * 60)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
