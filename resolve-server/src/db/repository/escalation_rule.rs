//! Escalation Rule Repository
//!
//! 升级路由规则只读查询。规则由管理端维护，这里只消费。

use super::{BaseRepository, RepoResult};
use shared::models::{Category, EscalationRule, Priority};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct EscalationRuleRepository {
    base: BaseRepository,
}

impl EscalationRuleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the active rule for a (category, priority) pair, if any
    pub async fn find_active(
        &self,
        category: Category,
        priority: Priority,
    ) -> RepoResult<Option<EscalationRule>> {
        let rules: Vec<EscalationRule> = self
            .base
            .db()
            .query(
                r#"SELECT * FROM escalation_rule
                WHERE category = $category AND priority = $priority AND is_active = true
                LIMIT 1"#,
            )
            .bind(("category", category))
            .bind(("priority", priority))
            .await?
            .take(0)?;
        Ok(rules.into_iter().next())
    }
}
