//! 邮件分发
//!
//! 升级提交后的邮件通知走独立队列：[`EmailDispatcher`] 在提交路径上
//! `try_send` 入队（满了丢弃并告警），[`EmailWorker`] 消费队列、
//! 重新读取投诉、解析双方地址后 POST 到 Resend 风格的 HTTP API。
//!
//! 发送失败只记日志——升级已经提交，邮件是尽力而为的边界，
//! 重试策略（如果有）属于邮件服务商侧。

use serde::Serialize;
use surrealdb::RecordId;
use tokio::sync::mpsc;

use crate::core::config::EmailConfig;
use crate::db::repository::{ComplaintRepository, StaffRepository};
use shared::models::{Complaint, Priority};

/// 一封待发的升级邮件请求（双方各自展开为一次发送）
#[derive(Debug)]
pub struct EmailJob {
    pub complaint_id: RecordId,
    pub reason: String,
    pub new_priority: Priority,
}

/// 提交路径持有的发送端
#[derive(Clone)]
pub struct EmailDispatcher {
    tx: mpsc::Sender<EmailJob>,
}

impl EmailDispatcher {
    pub fn new(queue_size: usize) -> (Self, mpsc::Receiver<EmailJob>) {
        let (tx, rx) = mpsc::channel(queue_size);
        (Self { tx }, rx)
    }

    /// 入队一个邮件任务，不阻塞、不失败
    ///
    /// 队列满时丢弃并告警——提交绝不等待邮件。
    pub fn dispatch(&self, job: EmailJob) {
        if let Err(e) = self.tx.try_send(job) {
            tracing::warn!("Email queue full, dropping escalation email: {}", e);
        }
    }
}

/// Resend 风格的请求体 `POST {api_url}/emails`
#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// 队列消费者，注册为 `TaskKind::Worker`
pub struct EmailWorker {
    config: EmailConfig,
    client: reqwest::Client,
    complaints: ComplaintRepository,
    staff: StaffRepository,
}

impl EmailWorker {
    pub fn new(
        config: EmailConfig,
        complaints: ComplaintRepository,
        staff: StaffRepository,
    ) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            complaints,
            staff,
        }
    }

    /// 运行 worker（阻塞直到通道关闭）
    pub async fn run(self, mut rx: mpsc::Receiver<EmailJob>) {
        tracing::info!("📧 Email worker started");

        while let Some(job) = rx.recv().await {
            self.handle(job).await;
        }

        tracing::info!("Email channel closed, worker stopping");
    }

    async fn handle(&self, job: EmailJob) {
        // 重新读取投诉：提交和发信之间状态可能已变
        let complaint = match self.complaints.find_by_id(&job.complaint_id).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                tracing::debug!(complaint = %job.complaint_id, "Complaint gone, skipping email");
                return;
            }
            Err(e) => {
                tracing::error!("Failed to load complaint for email: {}", e);
                return;
            }
        };

        // 提交人：intake 时留下的联系地址（匿名提交也可能填了）
        if let Some(owner_email) = complaint.contact_email.as_deref() {
            let subject = format!("🚨 Complaint Escalated - {}", complaint.title);
            let html = owner_email_body(&complaint, &job);
            self.send(owner_email, &subject, &html, &job.complaint_id)
                .await;
        }

        // 接收人：员工目录里的邮箱
        if let Some(assignee) = complaint.assigned_to.as_ref() {
            match self.staff.find_by_user_id(assignee).await {
                Ok(Some(profile)) => {
                    if let Some(email) = profile.email.as_deref() {
                        let subject =
                            format!("⚡ URGENT: Auto-Escalated Complaint - {}", complaint.title);
                        let html = assignee_email_body(&complaint, &job);
                        self.send(email, &subject, &html, &job.complaint_id).await;
                    }
                }
                Ok(None) => {
                    tracing::debug!(user = %assignee, "Assignee has no staff profile, skipping email");
                }
                Err(e) => {
                    tracing::error!("Failed to look up assignee email: {}", e);
                }
            }
        }
    }

    /// 发送一封邮件，失败只记日志
    async fn send(&self, to: &str, subject: &str, html: &str, complaint_id: &RecordId) {
        if self.config.api_key.is_empty() {
            tracing::info!(to = to, "Email delivery disabled (no API key), skipping");
            return;
        }

        let url = format!("{}/emails", self.config.api_url.trim_end_matches('/'));
        let body = SendEmailRequest {
            from: &self.config.from,
            to,
            subject,
            html,
        };

        let result = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(to = to, complaint = %complaint_id, "Escalation email sent");
            }
            Ok(resp) => {
                tracing::error!(
                    to = to,
                    status = %resp.status(),
                    "Email provider rejected escalation email"
                );
            }
            Err(e) => {
                tracing::error!(to = to, "Failed to send escalation email: {}", e);
            }
        }
    }
}

fn owner_email_body(complaint: &Complaint, job: &EmailJob) -> String {
    format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>🚨 Your Complaint Has Been Escalated</h2>
  <p>Your complaint has been automatically escalated to ensure faster resolution and priority handling.</p>
  <ul>
    <li><strong>Complaint:</strong> {title}</li>
    <li><strong>New Priority:</strong> {priority}</li>
    <li><strong>Reason:</strong> {reason}</li>
    <li><strong>Status:</strong> Escalated</li>
  </ul>
  <p>Thank you for your patience. We're committed to resolving your concern quickly.</p>
</div>"#,
        title = complaint.title,
        priority = job.new_priority,
        reason = job.reason,
    )
}

fn assignee_email_body(complaint: &Complaint, job: &EmailJob) -> String {
    format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>⚡ URGENT: Auto-Escalated Complaint</h2>
  <p>A complaint has been automatically escalated and assigned to you based on SLA violations or priority rules.</p>
  <ul>
    <li><strong>Complaint:</strong> {title}</li>
    <li><strong>Priority:</strong> {priority}</li>
    <li><strong>Category:</strong> {category}</li>
    <li><strong>Escalation Reason:</strong> {reason}</li>
  </ul>
  <p>Please review the complaint immediately and acknowledge receipt.</p>
</div>"#,
        title = complaint.title,
        priority = job.new_priority,
        category = complaint.category,
        reason = job.reason,
    )
}
