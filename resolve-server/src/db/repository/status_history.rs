//! Status History Repository
//!
//! 只追加的状态流转账本。升级提交走 `ComplaintRepository::apply_escalation`
//! 的事务；这里提供读取和独立追加（外部状态更新用）。

use super::{BaseRepository, CountRow, RepoError, RepoResult};
use shared::models::StatusHistoryEntry;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct StatusHistoryRepository {
    base: BaseRepository,
}

impl StatusHistoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append one entry to the ledger
    pub async fn append(&self, entry: StatusHistoryEntry) -> RepoResult<StatusHistoryEntry> {
        let created: Option<StatusHistoryEntry> = self
            .base
            .db()
            .create("status_history")
            .content(entry)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to append history entry".to_string()))
    }

    /// All entries for one complaint, newest first
    pub async fn find_by_complaint(
        &self,
        complaint_id: &RecordId,
    ) -> RepoResult<Vec<StatusHistoryEntry>> {
        let entries: Vec<StatusHistoryEntry> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM status_history
                WHERE complaint_id = $cid
                ORDER BY timestamp DESC"#,
            )
            .bind(("cid", complaint_id.to_string()))
            .await?
            .take(0)?;
        Ok(entries)
    }

    /// 历史条数 - 复杂度规则的输入
    pub async fn count_by_complaint(&self, complaint_id: &RecordId) -> RepoResult<i64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query(
                r#"SELECT count() AS count FROM status_history
                WHERE complaint_id = $cid
                GROUP ALL"#,
            )
            .bind(("cid", complaint_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(|r| r.count).unwrap_or(0))
    }
}
