//! Repository Module
//!
//! Struct repositories over the embedded SurrealDB instance. Each table the
//! escalation engine touches gets its own repository.

pub mod analytics;
pub mod complaint;
pub mod escalation_rule;
pub mod notification;
pub mod staff;
pub mod status_history;

// Re-exports
pub use analytics::AnalyticsRepository;
pub use complaint::ComplaintRepository;
pub use escalation_rule::EscalationRuleRepository;
pub use notification::NotificationRepository;
pub use staff::StaffRepository;
pub use status_history::StatusHistoryRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "complaint:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("complaint", "abc");
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId
//
// 记录链接字段 (assigned_to, user_id, complaint_id, escalate_to) 以字符串
// 形式存储；查询比较时 bind `id.to_string()`，更新目标 bind 原生 RecordId。

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Row shape for `count() ... GROUP ALL` queries
#[derive(Debug, serde::Deserialize)]
pub(crate) struct CountRow {
    pub count: i64,
}
