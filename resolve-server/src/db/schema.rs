//! Schema Definition
//!
//! 启动时幂等地应用表结构和索引 (IF NOT EXISTS)。
//!
//! 记录之间的引用统一存储为 "table:id" 字符串（见
//! `shared::serde_helpers`），表本身保持 SCHEMALESS 以兼容可选字段。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// 建表语句 - 每次启动执行，重复执行无副作用
const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS complaint SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS idx_complaint_status ON complaint FIELDS status;
    DEFINE INDEX IF NOT EXISTS idx_complaint_assigned ON complaint FIELDS assigned_to;
    DEFINE INDEX IF NOT EXISTS idx_complaint_created ON complaint FIELDS created_at;

    DEFINE TABLE IF NOT EXISTS status_history SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS idx_history_complaint ON status_history FIELDS complaint_id;

    DEFINE TABLE IF NOT EXISTS escalation_rule SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS idx_rule_category_priority ON escalation_rule FIELDS category, priority;

    DEFINE TABLE IF NOT EXISTS staff_profile SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS idx_staff_role ON staff_profile FIELDS role;
    DEFINE INDEX IF NOT EXISTS idx_staff_user ON staff_profile FIELDS user_id;

    DEFINE TABLE IF NOT EXISTS notification SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS idx_notification_user ON notification FIELDS user_id;

    DEFINE TABLE IF NOT EXISTS daily_analytics SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS idx_analytics_date ON daily_analytics FIELDS date UNIQUE;
"#;

/// Apply the schema to the database
pub async fn define(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query(SCHEMA).await?.check()?;
    Ok(())
}
