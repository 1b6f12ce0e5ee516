//! Logging Infrastructure
//!
//! Structured logging setup with console output and optional daily-rolling
//! file output under the work dir.

use std::path::Path;

/// Initialize the logger (console only)
pub fn init_logger() {
    init_logger_with_file(None, None::<&Path>);
}

/// Initialize the logger with optional file output
///
/// `log_level` 为空时默认 info；`log_dir` 存在时同时写入每日滚动文件。
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<impl AsRef<Path>>) {
    let level = log_level.unwrap_or("info");

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Add file output if log_dir is provided
    if let Some(dir) = log_dir {
        let log_path = dir.as_ref();
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(log_path, "resolve-server");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
