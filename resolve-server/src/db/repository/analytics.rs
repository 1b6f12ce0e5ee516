//! Daily Analytics Repository
//!
//! 每日快照的写入。使用确定性 ID `daily_{YYYYMMDD}` upsert，
//! 重复执行同一天只会覆盖同一条记录。

use super::{BaseRepository, RepoError, RepoResult};
use shared::models::DailyAnalytics;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "daily_analytics";

#[derive(Clone)]
pub struct AnalyticsRepository {
    base: BaseRepository,
}

impl AnalyticsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Upsert the snapshot for its date (deterministic record id)
    pub async fn upsert_daily(&self, snapshot: DailyAnalytics) -> RepoResult<DailyAnalytics> {
        let id = format!("daily_{}", snapshot.date.replace('-', ""));
        let saved: Option<DailyAnalytics> = self
            .base
            .db()
            .upsert((TABLE, id.as_str()))
            .content(snapshot)
            .await?;
        saved.ok_or_else(|| RepoError::Database("Failed to save daily analytics".to_string()))
    }

    /// Find the snapshot for a calendar date ("YYYY-MM-DD")
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Option<DailyAnalytics>> {
        let snapshots: Vec<DailyAnalytics> = self
            .base
            .db()
            .query("SELECT * FROM daily_analytics WHERE date = $date LIMIT 1")
            .bind(("date", date.to_string()))
            .await?
            .take(0)?;
        Ok(snapshots.into_iter().next())
    }
}
