//! Server State
//!
//! 持有配置、数据库、仓库和升级引擎的共享引用。
//! 所有字段都是浅拷贝 (Clone)，在 handler 和后台任务之间传递。

use std::sync::{Arc, Mutex};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

use crate::analytics::DailyAnalyticsJob;
use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::db::DbService;
use crate::db::repository::{
    AnalyticsRepository, ComplaintRepository, EscalationRuleRepository, NotificationRepository,
    StaffRepository, StatusHistoryRepository,
};
use crate::escalation::{
    AssignmentResolver, EscalationCommitter, EscalationScheduler, EscalationSweep,
};
use crate::services::email::{EmailDispatcher, EmailJob, EmailWorker};
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// # 组件
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 (SurrealDB) |
/// | complaints / history / rules / staff / notifications / analytics | 表仓库 |
/// | committer | 升级提交器（手动升级入口也走它） |
/// | sweep | 扫描编排器 |
/// | email | 邮件队列发送端 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub complaints: ComplaintRepository,
    pub history: StatusHistoryRepository,
    pub rules: EscalationRuleRepository,
    pub staff: StaffRepository,
    pub notifications: NotificationRepository,
    pub analytics: AnalyticsRepository,
    pub committer: EscalationCommitter,
    pub sweep: EscalationSweep,
    pub email: EmailDispatcher,
    /// 邮件队列接收端，spawn_background_tasks 时取走一次
    email_rx: Arc<Mutex<Option<mpsc::Receiver<EmailJob>>>>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序：工作目录结构 → 数据库 (work_dir/db) → 仓库 → 升级引擎。
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::Internal(format!("Failed to create work dir: {e}")))?;

        let db_path = config.database_dir();
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let db = db_service.db;

        let complaints = ComplaintRepository::new(db.clone());
        let history = StatusHistoryRepository::new(db.clone());
        let rules = EscalationRuleRepository::new(db.clone());
        let staff = StaffRepository::new(db.clone());
        let notifications = NotificationRepository::new(db.clone());
        let analytics = AnalyticsRepository::new(db.clone());

        let (email, email_rx) = EmailDispatcher::new(config.email.queue_size);

        let resolver = AssignmentResolver::new(rules.clone(), staff.clone(), complaints.clone());
        let committer = EscalationCommitter::new(
            complaints.clone(),
            notifications.clone(),
            resolver,
            email.clone(),
        );
        let sweep = EscalationSweep::new(complaints.clone(), history.clone(), committer.clone());

        Ok(Self {
            config: config.clone(),
            db,
            complaints,
            history,
            rules,
            staff,
            notifications,
            analytics,
            committer,
            sweep,
            email,
            email_rx: Arc::new(Mutex::new(Some(email_rx))),
        })
    }

    /// 启动后台任务：邮件 worker、升级调度器、每日统计
    ///
    /// 必须在 `Server::run()` 的监听开始前调用一次。
    pub fn spawn_background_tasks(&self, tasks: &mut BackgroundTasks) {
        // 邮件队列消费者
        let rx = self
            .email_rx
            .lock()
            .ok()
            .and_then(|mut guard| guard.take());
        match rx {
            Some(rx) => {
                let worker = EmailWorker::new(
                    self.config.email.clone(),
                    self.complaints.clone(),
                    self.staff.clone(),
                );
                tasks.spawn("email_worker", TaskKind::Worker, worker.run(rx));
            }
            None => {
                tracing::warn!("Email receiver already taken, worker not started");
            }
        }

        // 升级扫描：30 分钟间隔触发
        let scheduler = EscalationScheduler::new(
            self.sweep.clone(),
            self.config.sweep_interval(),
            tasks.shutdown_token(),
        );
        tasks.spawn("escalation_scheduler", TaskKind::Periodic, scheduler.run());

        // 每日统计：UTC 零点触发
        let analytics_job = DailyAnalyticsJob::new(
            self.complaints.clone(),
            self.analytics.clone(),
            tasks.shutdown_token(),
        );
        tasks.spawn("daily_analytics", TaskKind::Periodic, analytics_job.run());

        tasks.log_summary();
    }
}
