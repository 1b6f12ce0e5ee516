//! End-to-end escalation engine tests against an embedded database.
//! Run: cargo test -p resolve-server --test escalation_flow -- --nocapture

use surrealdb::engine::local::{Db, RocksDb};
use surrealdb::{RecordId, Surreal};

use resolve_server::db::repository::{
    ComplaintRepository, EscalationRuleRepository, NotificationRepository, RepoError,
    StaffRepository, StatusHistoryRepository,
};
use resolve_server::db::schema;
use resolve_server::escalation::{AssignmentResolver, EscalationCommitter, EscalationSweep};
use resolve_server::services::email::EmailDispatcher;
use shared::models::{
    Category, Complaint, EscalationRule, Priority, StaffProfile, StaffRole, Status,
};
use shared::util::now_millis;

const HOUR_MS: i64 = 60 * 60 * 1000;

async fn test_db() -> (Surreal<Db>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    schema::define(&db).await.unwrap();
    (db, tmp)
}

struct Engine {
    db: Surreal<Db>,
    complaints: ComplaintRepository,
    history: StatusHistoryRepository,
    staff: StaffRepository,
    notifications: NotificationRepository,
    committer: EscalationCommitter,
    sweep: EscalationSweep,
    _email_rx: tokio::sync::mpsc::Receiver<resolve_server::services::email::EmailJob>,
    // tempdir 句柄掉了目录会被删，测试期内保留
    _tmp: tempfile::TempDir,
}

fn build_engine((db, tmp): (Surreal<Db>, tempfile::TempDir)) -> Engine {
    let complaints = ComplaintRepository::new(db.clone());
    let history = StatusHistoryRepository::new(db.clone());
    let rules = EscalationRuleRepository::new(db.clone());
    let staff = StaffRepository::new(db.clone());
    let notifications = NotificationRepository::new(db.clone());

    let (email, email_rx) = EmailDispatcher::new(16);
    let resolver = AssignmentResolver::new(rules.clone(), staff.clone(), complaints.clone());
    let committer = EscalationCommitter::new(
        complaints.clone(),
        notifications.clone(),
        resolver,
        email,
    );
    let sweep = EscalationSweep::new(complaints.clone(), history.clone(), committer.clone());

    Engine {
        db,
        complaints,
        history,
        staff,
        notifications,
        committer,
        sweep,
        _email_rx: email_rx,
        _tmp: tmp,
    }
}

fn make_complaint(priority: Priority, category: Category, created_at: i64) -> Complaint {
    Complaint {
        id: None,
        title: "Checkout keeps failing".to_string(),
        description: "Payment form errors out on submit".to_string(),
        category,
        subcategory: None,
        priority,
        status: Status::Submitted,
        user_id: Some(RecordId::from_table_key("user", "owner1")),
        is_anonymous: false,
        contact_email: Some("owner@example.com".to_string()),
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

fn make_staff(key: &str, role: StaffRole, created_at: i64) -> StaffProfile {
    StaffProfile {
        id: None,
        user_id: RecordId::from_table_key("user", key),
        display_name: key.to_string(),
        email: Some(format!("{key}@example.com")),
        role,
        department: None,
        is_active: true,
        created_at,
    }
}

#[tokio::test]
async fn sweep_escalates_and_cool_down_blocks_second_pass() {
    let engine = build_engine(test_db().await);
    let now = now_millis();

    // CRITICAL，3 小时前创建 —— 2 小时 SLA 已破
    let created = engine
        .complaints
        .create(make_complaint(
            Priority::Critical,
            Category::Technical,
            now - 3 * HOUR_MS,
        ))
        .await
        .unwrap();
    let id = created.id.clone().unwrap();

    engine
        .staff
        .create(make_staff("admin1", StaffRole::Admin, 1))
        .await
        .unwrap();

    let outcome = engine.sweep.run_once().await.unwrap();
    assert_eq!(outcome.processed, 1);
    assert_eq!(outcome.escalated, 1);

    let after = engine.complaints.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(after.status, Status::Escalated);
    assert_eq!(after.priority, Priority::Critical);
    assert!(after.escalated_at.is_some());
    let reason = after.escalation_reason.unwrap();
    assert!(
        reason.starts_with("AUTO-ESCALATED: Critical complaint unresolved"),
        "unexpected reason: {reason}"
    );
    assert_eq!(
        after.assigned_to,
        Some(RecordId::from_table_key("user", "admin1"))
    );

    // 事务的另一半：历史记录已追加
    let ledger = engine.history.find_by_complaint(&id).await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].status, Status::Escalated);
    assert_eq!(ledger[0].previous_status, Some(Status::Submitted));
    assert!(ledger[0].is_system_generated);
    assert_eq!(
        ledger[0].changed_by_name.as_deref(),
        Some("System (Auto-Escalation)")
    );

    // 冷却窗口内的第二次扫描不会再碰它
    let outcome = engine.sweep.run_once().await.unwrap();
    assert_eq!(outcome.processed, 0);
    assert_eq!(outcome.escalated, 0);
    let ledger = engine.history.find_by_complaint(&id).await.unwrap();
    assert_eq!(ledger.len(), 1, "double sweep must not duplicate history");

    // 升级后进入审查队列
    let pending = engine.complaints.find_pending_escalations().await.unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn sweep_balances_workload_across_staff() {
    let engine = build_engine(test_db().await);
    let now = now_millis();

    engine
        .staff
        .create(make_staff("super1", StaffRole::SuperAdmin, 1))
        .await
        .unwrap();
    engine
        .staff
        .create(make_staff("admin1", StaffRole::Admin, 2))
        .await
        .unwrap();
    engine
        .staff
        .create(make_staff("mod1", StaffRole::Moderator, 3))
        .await
        .unwrap();

    // 现有工作量：super_admin 3 单、admin 2 单、moderator 2 单
    for (key, open) in [("super1", 3), ("admin1", 2), ("mod1", 2)] {
        for _ in 0..open {
            let mut c = make_complaint(Priority::Medium, Category::General, now);
            c.status = Status::InProgress;
            c.assigned_to = Some(RecordId::from_table_key("user", key));
            engine.complaints.create(c).await.unwrap();
        }
    }

    // 两个可升级投诉，created_at 决定处理顺序
    let first = engine
        .complaints
        .create(make_complaint(
            Priority::Critical,
            Category::Technical,
            now - 4 * HOUR_MS,
        ))
        .await
        .unwrap();
    let second = engine
        .complaints
        .create(make_complaint(
            Priority::Critical,
            Category::Service,
            now - 3 * HOUR_MS,
        ))
        .await
        .unwrap();

    let outcome = engine.sweep.run_once().await.unwrap();
    assert_eq!(outcome.escalated, 2);

    // 第一个给 admin：工作量 2 与 moderator 平局，角色优先级定胜负，
    // super_admin 背着 3 单出局。第二个决策必须看到 admin 已变成 3 单，
    // 落到 moderator
    let first = engine
        .complaints
        .find_by_id(first.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    let second = engine
        .complaints
        .find_by_id(second.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        first.assigned_to,
        Some(RecordId::from_table_key("user", "admin1"))
    );
    assert_eq!(
        second.assigned_to,
        Some(RecordId::from_table_key("user", "mod1"))
    );
}

#[tokio::test]
async fn active_rule_overrides_workload_assignment() {
    let engine = build_engine(test_db().await);
    let now = now_millis();

    // 空闲的 admin 在场，但规则指定了接收人
    engine
        .staff
        .create(make_staff("admin1", StaffRole::Admin, 1))
        .await
        .unwrap();

    let db_rule = EscalationRule {
        id: None,
        category: Category::Billing,
        priority: Priority::Critical,
        auto_escalate_after_hours: 2,
        escalate_to: RecordId::from_table_key("user", "router"),
        is_active: true,
        conditions: None,
    };
    // 规则由管理端写入；测试直接落表
    let _: Option<EscalationRule> = engine
        .db
        .create("escalation_rule")
        .content(db_rule)
        .await
        .unwrap();

    let created = engine
        .complaints
        .create(make_complaint(
            Priority::Critical,
            Category::Billing,
            now - 3 * HOUR_MS,
        ))
        .await
        .unwrap();

    let outcome = engine.sweep.run_once().await.unwrap();
    assert_eq!(outcome.escalated, 1);

    let after = engine
        .complaints
        .find_by_id(created.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        after.assigned_to,
        Some(RecordId::from_table_key("user", "router"))
    );
}

#[tokio::test]
async fn manual_escalation_honors_explicit_target_and_priority() {
    let engine = build_engine(test_db().await);
    let now = now_millis();

    // 新投诉，任何自动规则都不会触发
    let created = engine
        .complaints
        .create(make_complaint(Priority::Medium, Category::Service, now))
        .await
        .unwrap();
    let id = created.id.clone().unwrap();
    let target = RecordId::from_table_key("user", "director");

    engine
        .committer
        .manual_escalation(
            &id,
            "VIP customer, needs direct handling",
            Some(target.clone()),
            Some(Priority::High),
            now,
        )
        .await
        .unwrap();

    let after = engine.complaints.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(after.status, Status::Escalated);
    assert_eq!(after.priority, Priority::High);
    assert_eq!(after.assigned_to, Some(target.clone()));
    assert_eq!(
        after.escalation_reason.as_deref(),
        Some("AUTO-ESCALATED: MANUAL ESCALATION: VIP customer, needs direct handling")
    );

    // 双方通知都已入队
    let owner = RecordId::from_table_key("user", "owner1");
    let owner_inbox = engine.notifications.find_by_user(&owner).await.unwrap();
    assert_eq!(owner_inbox.len(), 1);
    assert_eq!(owner_inbox[0].title, "🚨 Complaint Auto-Escalated");

    let target_inbox = engine.notifications.find_by_user(&target).await.unwrap();
    assert_eq!(target_inbox.len(), 1);
    assert_eq!(target_inbox[0].title, "⚡ Urgent: Complaint Auto-Escalated");
}

#[tokio::test]
async fn manual_escalation_of_missing_complaint_fails_fast() {
    let engine = build_engine(test_db().await);
    let missing = RecordId::from_table_key("complaint", "nope");

    let err = engine
        .committer
        .manual_escalation(&missing, "test", None, None, now_millis())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn auto_commit_on_missing_complaint_is_silent_noop() {
    let engine = build_engine(test_db().await);
    let missing = RecordId::from_table_key("complaint", "nope");

    // 自动路径：消失的投诉是良性竞争，返回 false 而不是错误
    let committed = engine
        .committer
        .commit(&missing, "ghost", Some(Priority::Critical), None, now_millis())
        .await
        .unwrap();
    assert!(!committed);
}

#[tokio::test]
async fn vanished_complaint_aborts_commit_without_history() {
    let engine = build_engine(test_db().await);
    let now = now_millis();

    let created = engine
        .complaints
        .create(make_complaint(
            Priority::Critical,
            Category::Technical,
            now - 3 * HOUR_MS,
        ))
        .await
        .unwrap();
    let id = created.id.unwrap();

    // re-fetch 和事务之间的竞争窗口：投诉被并发删除
    let _: Option<Complaint> = engine.db.delete(id.clone()).await.unwrap();

    let err = engine
        .complaints
        .apply_escalation(
            &id,
            Status::Submitted,
            Priority::Critical,
            "AUTO-ESCALATED: race window",
            "AUTO-ESCALATED: race window. Priority changed from CRITICAL to CRITICAL.",
            None,
            now,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Database(_)), "got: {err:?}");

    // 事务整体回滚：不能留下没有投诉的历史记录
    let ledger = engine.history.find_by_complaint(&id).await.unwrap();
    assert!(
        ledger.is_empty(),
        "aborted escalation must not write history rows"
    );
}

#[tokio::test]
async fn anonymous_owner_gets_no_notification() {
    let engine = build_engine(test_db().await);
    let now = now_millis();

    let mut complaint = make_complaint(Priority::Critical, Category::Technical, now - 3 * HOUR_MS);
    complaint.is_anonymous = true;
    engine.complaints.create(complaint).await.unwrap();

    engine
        .staff
        .create(make_staff("admin1", StaffRole::Admin, 1))
        .await
        .unwrap();

    let outcome = engine.sweep.run_once().await.unwrap();
    assert_eq!(outcome.escalated, 1);

    let owner = RecordId::from_table_key("user", "owner1");
    let owner_inbox = engine.notifications.find_by_user(&owner).await.unwrap();
    assert!(owner_inbox.is_empty(), "anonymous owner must not be notified");

    // 指派方照常收到
    let admin = RecordId::from_table_key("user", "admin1");
    let admin_inbox = engine.notifications.find_by_user(&admin).await.unwrap();
    assert_eq!(admin_inbox.len(), 1);
}

#[tokio::test]
async fn escalation_proceeds_unassigned_without_staff() {
    let engine = build_engine(test_db().await);
    let now = now_millis();

    // 员工目录为空：升级照常，指派为空
    let created = engine
        .complaints
        .create(make_complaint(
            Priority::Critical,
            Category::Technical,
            now - 3 * HOUR_MS,
        ))
        .await
        .unwrap();

    let outcome = engine.sweep.run_once().await.unwrap();
    assert_eq!(outcome.escalated, 1);

    let after = engine
        .complaints
        .find_by_id(created.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, Status::Escalated);
    assert!(after.assigned_to.is_none());
}

#[tokio::test]
async fn terminal_complaints_are_never_candidates() {
    let engine = build_engine(test_db().await);
    let now = now_millis();

    let mut resolved = make_complaint(Priority::Critical, Category::Technical, now - 48 * HOUR_MS);
    resolved.status = Status::Resolved;
    resolved.resolved_at = Some(now - HOUR_MS);
    engine.complaints.create(resolved).await.unwrap();

    let mut closed = make_complaint(Priority::Critical, Category::Safety, now - 48 * HOUR_MS);
    closed.status = Status::Closed;
    engine.complaints.create(closed).await.unwrap();

    let outcome = engine.sweep.run_once().await.unwrap();
    assert_eq!(outcome.processed, 0);
    assert_eq!(outcome.escalated, 0);
}
