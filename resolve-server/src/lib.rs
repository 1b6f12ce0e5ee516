//! ResolveIt Case Server - 投诉生命周期与 SLA 自动升级服务
//!
//! # 架构概述
//!
//! 本模块是 Case Server 的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储（投诉、历史、规则、员工）
//! - **升级引擎** (`escalation`): SLA 规则评估、工作量均衡指派、原子提交
//! - **分析任务** (`analytics`): 每日投诉统计快照
//! - **邮件服务** (`services/email`): 队列化 fire-and-forget 邮件分发
//! - **HTTP API** (`api`): 手动升级、升级队列、历史查询
//!
//! # 模块结构
//!
//! ```text
//! resolve-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── db/            # 数据库层（schema + repositories）
//! ├── escalation/    # 升级引擎（evaluator / resolver / committer / sweep）
//! ├── analytics/     # 每日统计快照
//! ├── services/      # 邮件分发
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志
//! ```

pub mod analytics;
pub mod api;
pub mod core;
pub mod db;
pub mod escalation;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 启动前的环境准备：加载 .env、创建工作目录、初始化日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("RESOLVE_WORK_DIR").unwrap_or_else(|_| "./data".into());
    let log_dir = std::path::Path::new(&work_dir).join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let level = std::env::var("RESOLVE_LOG_LEVEL").unwrap_or_else(|_| "info".into());
    utils::logger::init_logger_with_file(Some(&level), Some(&log_dir));

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____                  __
   / __ \___  _________  / /   _____
  / /_/ / _ \/ ___/ __ \/ / | / / _ \
 / _, _/  __(__  ) /_/ / /| |/ /  __/
/_/ |_|\___/____/\____/_/ |___/\___/
    ____ __
   /  _// /_
   / / / __/
 _/ / / /_
/___/ \__/
    "#
    );
}
