//! Daily analytics snapshot tests against an embedded database.
//! Run: cargo test -p resolve-server --test analytics_snapshot -- --nocapture

use chrono::NaiveDate;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};
use tokio_util::sync::CancellationToken;

use resolve_server::analytics::DailyAnalyticsJob;
use resolve_server::db::repository::{AnalyticsRepository, ComplaintRepository};
use resolve_server::db::schema;
use shared::models::{Category, Complaint, Priority, Status};

const HOUR_MS: i64 = 60 * 60 * 1000;

// tempdir 句柄跟着测试走，结束时自动清理
async fn test_db() -> (Surreal<Db>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    schema::define(&db).await.unwrap();
    (db, tmp)
}

fn make_complaint(
    category: Category,
    priority: Priority,
    status: Status,
    created_at: i64,
) -> Complaint {
    Complaint {
        id: None,
        title: "snapshot fixture".to_string(),
        description: "snapshot fixture".to_string(),
        category,
        subcategory: None,
        priority,
        status,
        user_id: Some(RecordId::from_table_key("user", "owner1")),
        is_anonymous: false,
        contact_email: None,
        assigned_to: None,
        resolution: None,
        resolved_at: None,
        escalated_at: None,
        escalation_reason: None,
        due_date: None,
        tags: None,
        location: None,
        urgency_level: None,
        created_at,
        updated_at: created_at,
    }
}

fn day_start(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
}

#[tokio::test]
async fn snapshot_aggregates_one_calendar_day() {
    let (db, _tmp) = test_db().await;
    let complaints = ComplaintRepository::new(db.clone());
    let analytics = AnalyticsRepository::new(db.clone());
    let job = DailyAnalyticsJob::new(
        complaints.clone(),
        analytics.clone(),
        CancellationToken::new(),
    );

    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let t0 = day_start(date);

    // 当日新建：2 x TECHNICAL/LOW, 1 x BILLING/HIGH
    complaints
        .create(make_complaint(
            Category::Technical,
            Priority::Low,
            Status::Submitted,
            t0 + HOUR_MS,
        ))
        .await
        .unwrap();
    complaints
        .create(make_complaint(
            Category::Technical,
            Priority::Low,
            Status::InProgress,
            t0 + 2 * HOUR_MS,
        ))
        .await
        .unwrap();
    complaints
        .create(make_complaint(
            Category::Billing,
            Priority::High,
            Status::Submitted,
            t0 + 3 * HOUR_MS,
        ))
        .await
        .unwrap();

    // 当日解决（前一天创建）：2h 和 4h 解决时长
    let mut resolved_a = make_complaint(
        Category::Service,
        Priority::Medium,
        Status::Resolved,
        t0 - 2 * HOUR_MS,
    );
    resolved_a.resolved_at = Some(t0);
    complaints.create(resolved_a).await.unwrap();

    let mut resolved_b = make_complaint(
        Category::Service,
        Priority::Medium,
        Status::Resolved,
        t0 - 3 * HOUR_MS,
    );
    resolved_b.resolved_at = Some(t0 + HOUR_MS);
    complaints.create(resolved_b).await.unwrap();

    // 当日升级一单（隔天创建，不算当日新建）
    let mut escalated = make_complaint(
        Category::Safety,
        Priority::Critical,
        Status::Escalated,
        t0 - 10 * HOUR_MS,
    );
    escalated.escalated_at = Some(t0 + 5 * HOUR_MS);
    complaints.create(escalated).await.unwrap();

    // 隔日噪音：不该进任何统计
    complaints
        .create(make_complaint(
            Category::Other,
            Priority::Low,
            Status::Submitted,
            t0 + 25 * HOUR_MS,
        ))
        .await
        .unwrap();

    let snapshot = job.snapshot_date(date).await.unwrap();

    assert_eq!(snapshot.date, "2024-01-15");
    assert_eq!(snapshot.total_complaints, 3);
    assert_eq!(snapshot.resolved_complaints, 2);
    assert_eq!(snapshot.escalated_complaints, 1);
    // (2h + 4h) / 2 = 3h
    assert_eq!(snapshot.average_resolution_millis, Some(3.0 * HOUR_MS as f64));

    // 分布按当日新建统计
    let technical = snapshot
        .category_breakdown
        .iter()
        .find(|c| c.category == Category::Technical)
        .unwrap();
    assert_eq!(technical.count, 2);
    let billing = snapshot
        .category_breakdown
        .iter()
        .find(|c| c.category == Category::Billing)
        .unwrap();
    assert_eq!(billing.count, 1);

    let low = snapshot
        .priority_breakdown
        .iter()
        .find(|p| p.priority == Priority::Low)
        .unwrap();
    assert_eq!(low.count, 2);

    let submitted = snapshot
        .status_breakdown
        .iter()
        .find(|s| s.status == Status::Submitted)
        .unwrap();
    assert_eq!(submitted.count, 2);
}

#[tokio::test]
async fn snapshot_is_idempotent_per_date() {
    let (db, _tmp) = test_db().await;
    let complaints = ComplaintRepository::new(db.clone());
    let analytics = AnalyticsRepository::new(db.clone());
    let job = DailyAnalyticsJob::new(
        complaints.clone(),
        analytics.clone(),
        CancellationToken::new(),
    );

    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let t0 = day_start(date);

    complaints
        .create(make_complaint(
            Category::General,
            Priority::Low,
            Status::Submitted,
            t0 + HOUR_MS,
        ))
        .await
        .unwrap();

    job.snapshot_date(date).await.unwrap();

    // 第二次运行前多了一单，覆盖同一条记录而不是新增
    complaints
        .create(make_complaint(
            Category::General,
            Priority::Low,
            Status::Submitted,
            t0 + 2 * HOUR_MS,
        ))
        .await
        .unwrap();
    job.snapshot_date(date).await.unwrap();

    let saved = analytics.find_by_date("2024-01-15").await.unwrap().unwrap();
    assert_eq!(saved.total_complaints, 2);

    let all: Vec<shared::models::DailyAnalytics> = db
        .query("SELECT * FROM daily_analytics")
        .await
        .unwrap()
        .take(0)
        .unwrap();
    assert_eq!(all.len(), 1, "same date must upsert a single record");
}

#[tokio::test]
async fn snapshot_of_empty_day_has_no_average() {
    let (db, _tmp) = test_db().await;
    let complaints = ComplaintRepository::new(db.clone());
    let analytics = AnalyticsRepository::new(db.clone());
    let job = DailyAnalyticsJob::new(complaints, analytics, CancellationToken::new());

    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let snapshot = job.snapshot_date(date).await.unwrap();

    assert_eq!(snapshot.total_complaints, 0);
    assert_eq!(snapshot.resolved_complaints, 0);
    assert_eq!(snapshot.escalated_complaints, 0);
    assert_eq!(snapshot.average_resolution_millis, None);
    assert!(snapshot.category_breakdown.is_empty());
}
