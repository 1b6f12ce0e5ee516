//! 升级引擎
//!
//! SLA 自动升级的部件：
//!
//! - [`rules`] - 纯函数规则级联（评估器）
//! - [`assignment`] - 工作量均衡指派
//! - [`committer`] - 原子升级提交 + 通知/邮件副作用
//! - [`sweep`] - 单次扫描编排（Fetching → Evaluating → Committing）
//! - [`scheduler`] - 30 分钟间隔触发器

pub mod assignment;
pub mod committer;
pub mod rules;
pub mod scheduler;
pub mod sweep;

pub use assignment::AssignmentResolver;
pub use committer::EscalationCommitter;
pub use rules::{Decision, cool_down_cutoff, evaluate};
pub use scheduler::EscalationScheduler;
pub use sweep::{EscalationSweep, SweepOutcome};
