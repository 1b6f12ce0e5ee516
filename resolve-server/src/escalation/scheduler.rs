//! 升级扫描调度器
//!
//! 固定间隔（默认 30 分钟）触发一次扫描。注册为
//! `TaskKind::Periodic`，在 `spawn_background_tasks()` 中启动。
//!
//! 没有为进行中的扫描定义取消/超时：卡住的扫描只会推迟下一次触发，
//! 触发集重叠是安全的（冷却过滤兜底）。

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::escalation::sweep::EscalationSweep;

pub struct EscalationScheduler {
    sweep: EscalationSweep,
    interval: Duration,
    shutdown: CancellationToken,
}

impl EscalationScheduler {
    pub fn new(sweep: EscalationSweep, interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            sweep,
            interval,
            shutdown,
        }
    }

    /// 主循环：间隔触发语义，首次扫描在启动一个间隔之后
    pub async fn run(self) {
        tracing::info!(
            "Escalation scheduler started (interval: {} minutes)",
            self.interval.as_secs() / 60
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Escalation scheduler received shutdown signal");
                    return;
                }
            }

            match self.sweep.run_once().await {
                Ok(outcome) => {
                    tracing::info!(
                        processed = outcome.processed,
                        escalated = outcome.escalated,
                        timestamp = outcome.timestamp,
                        "Escalation sweep completed"
                    );
                }
                Err(e) => {
                    // 不做内部重试，等下一个周期
                    tracing::error!("Escalation sweep failed: {}", e);
                }
            }
        }
    }
}
