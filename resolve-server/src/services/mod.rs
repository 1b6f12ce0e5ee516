//! 服务模块 - 邮件分发

pub mod email;

pub use email::{EmailDispatcher, EmailJob, EmailWorker};
