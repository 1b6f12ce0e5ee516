//! 每日统计快照
//!
//! 每天 00:00 (UTC) 对刚结束的那一天做一次汇总：当日新建/解决/升级数、
//! 平均解决时长和类别/优先级/状态分布，upsert 到 `daily_analytics`。
//!
//! 与升级扫描完全独立，共享投诉表但没有顺序依赖。

use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

use crate::db::repository::{AnalyticsRepository, ComplaintRepository, RepoResult};
use shared::models::{CategoryCount, DailyAnalytics, PriorityCount, StatusCount};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// 每日统计任务，注册为 `TaskKind::Periodic`
pub struct DailyAnalyticsJob {
    complaints: ComplaintRepository,
    analytics: AnalyticsRepository,
    shutdown: CancellationToken,
}

impl DailyAnalyticsJob {
    pub fn new(
        complaints: ComplaintRepository,
        analytics: AnalyticsRepository,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            complaints,
            analytics,
            shutdown,
        }
    }

    /// 主循环：每个 UTC 零点触发，汇总昨天
    pub async fn run(self) {
        tracing::info!("Daily analytics job started");

        loop {
            let sleep_duration = duration_until_next_utc_midnight();
            tracing::debug!(
                "Next analytics snapshot in {} minutes",
                sleep_duration.as_secs() / 60
            );

            tokio::select! {
                _ = tokio::time::sleep(sleep_duration) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Daily analytics job received shutdown signal");
                    return;
                }
            }

            let yesterday = Utc::now().date_naive() - chrono::Duration::days(1);
            match self.snapshot_date(yesterday).await {
                Ok(snapshot) => {
                    tracing::info!(
                        date = %snapshot.date,
                        total = snapshot.total_complaints,
                        resolved = snapshot.resolved_complaints,
                        escalated = snapshot.escalated_complaints,
                        "Daily analytics snapshot saved"
                    );
                }
                Err(e) => {
                    tracing::error!("Daily analytics snapshot failed: {}", e);
                }
            }
        }
    }

    /// 汇总一个 UTC 日历日并落库
    pub async fn snapshot_date(&self, date: NaiveDate) -> RepoResult<DailyAnalytics> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let start = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        let end = start + DAY_MS;

        let created = self.complaints.find_created_between(start, end).await?;
        let resolved = self.complaints.find_resolved_between(start, end).await?;
        let escalated = self.complaints.count_escalated_between(start, end).await?;

        // 平均解决时长：当日解决的投诉的 (resolved_at - created_at) 均值
        let resolution_times: Vec<i64> = resolved
            .iter()
            .filter_map(|c| c.resolved_at.map(|r| r - c.created_at))
            .collect();
        let average_resolution_millis = if resolution_times.is_empty() {
            None
        } else {
            Some(resolution_times.iter().sum::<i64>() as f64 / resolution_times.len() as f64)
        };

        // 分布按当日新建的投诉统计
        let mut by_category: BTreeMap<String, (shared::models::Category, i64)> = BTreeMap::new();
        let mut by_priority: BTreeMap<String, (shared::models::Priority, i64)> = BTreeMap::new();
        let mut by_status: BTreeMap<String, (shared::models::Status, i64)> = BTreeMap::new();
        for c in &created {
            by_category
                .entry(c.category.to_string())
                .or_insert((c.category, 0))
                .1 += 1;
            by_priority
                .entry(c.priority.to_string())
                .or_insert((c.priority, 0))
                .1 += 1;
            by_status
                .entry(c.status.to_string())
                .or_insert((c.status, 0))
                .1 += 1;
        }

        let snapshot = DailyAnalytics {
            id: None,
            date: date_str,
            total_complaints: created.len() as i64,
            resolved_complaints: resolved.len() as i64,
            escalated_complaints: escalated,
            average_resolution_millis,
            category_breakdown: by_category
                .into_values()
                .map(|(category, count)| CategoryCount { category, count })
                .collect(),
            priority_breakdown: by_priority
                .into_values()
                .map(|(priority, count)| PriorityCount { priority, count })
                .collect(),
            status_breakdown: by_status
                .into_values()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
            created_at: shared::util::now_millis(),
        };

        self.analytics.upsert_daily(snapshot).await
    }
}

/// 距离下一个 UTC 零点的时长
fn duration_until_next_utc_midnight() -> std::time::Duration {
    let now = Utc::now();
    let tomorrow = now.date_naive() + chrono::Duration::days(1);
    let target = tomorrow
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now + chrono::Duration::hours(24));

    let duration = target.signed_duration_since(now);
    if duration.num_seconds() <= 0 {
        // Safety: 不应该发生，兜底 1 分钟
        std::time::Duration::from_secs(60)
    } else {
        duration
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_until_next_utc_midnight_positive() {
        let duration = duration_until_next_utc_midnight();
        assert!(duration.as_secs() > 0);
        assert!(duration.as_secs() <= 24 * 60 * 60);
    }
}
