//! 升级规则级联（评估器）
//!
//! 对单个投诉的纯函数判定：给定扫描时刻 T、投诉状态和历史条数，
//! 输出是否升级、原因和新优先级。无副作用，注入时钟即可测试。
//!
//! # 级联语义
//!
//! 规则按固定顺序求值，每条规则独立返回 `Option<Decision>`：
//! 后触发的规则整体覆盖先触发的 (last writer wins)，是否升级则是
//! 所有规则的 OR。这是从规则级联刻意保留的简化语义，不要"修复"。
//!
//! 两张优先级提升表（逾期规则 vs 复杂度规则）刻意不统一。

use shared::models::{Category, Complaint, Priority};

/// 升级后的冷却窗口：4 小时内不再重复评估同一投诉
pub const COOL_DOWN_MS: i64 = 4 * 60 * 60 * 1000;

const HOUR_MS: i64 = 60 * 60 * 1000;

/// 各优先级的未决 SLA（小时）
const SLA_CRITICAL_HOURS: i64 = 2;
const SLA_HIGH_HOURS: i64 = 8;
const SLA_MEDIUM_HOURS: i64 = 24;
const SLA_LOW_HOURS: i64 = 72;

/// 敏感类别 SLA（小时）
const SLA_SENSITIVE_HOURS: i64 = 4;

/// 逾期阈值（小时）
const OVERDUE_THRESHOLD_HOURS: i64 = 12;

/// 高紧急度规则：urgency_level 下限 / 最小年龄
const URGENCY_LEVEL_THRESHOLD: i32 = 8;
const URGENCY_MIN_AGE_HOURS: i64 = 6;

/// 复杂度规则：历史条数下限 / 最小年龄
const COMPLEXITY_HISTORY_COUNT: i64 = 5;
const COMPLEXITY_MIN_AGE_HOURS: i64 = 48;

/// 单条规则的判定结果
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub reason: String,
    pub new_priority: Priority,
}

/// 冷却截止线：escalated_at 晚于该时刻的投诉不参与本次扫描
pub fn cool_down_cutoff(now: i64) -> i64 {
    now - COOL_DOWN_MS
}

/// 评估一个投诉
///
/// 返回 `Some(decision)` 表示应当升级；`None` 表示本次扫描不动它。
/// `now` 在扫描开始时捕获一次，整批复用。
pub fn evaluate(complaint: &Complaint, history_count: i64, now: i64) -> Option<Decision> {
    let evaluators: [&dyn Fn(&Complaint, i64) -> Option<Decision>; 5] = [
        &due_date_breach,
        &age_sla,
        &sensitive_category,
        &high_urgency,
        &|c, now| complexity(c, history_count, now),
    ];

    // 后面的非 None 结果覆盖前面的
    evaluators
        .iter()
        .fold(None, |acc, rule| rule(complaint, now).or(acc))
}

/// 规则 1：逾期 ≥ 12 小时
///
/// 提升表：LOW→MEDIUM, MEDIUM→HIGH, 其余→CRITICAL
fn due_date_breach(c: &Complaint, now: i64) -> Option<Decision> {
    let due_date = c.due_date?;
    if now <= due_date {
        return None;
    }

    let hours_overdue = (now - due_date) / HOUR_MS;
    if hours_overdue < OVERDUE_THRESHOLD_HOURS {
        return None;
    }

    Some(Decision {
        reason: format!("Complaint is {} hours overdue", hours_overdue),
        new_priority: match c.priority {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            _ => Priority::Critical,
        },
    })
}

/// 规则 2：按（原始）优先级的年龄 SLA，有且只有一个分支触发
fn age_sla(c: &Complaint, now: i64) -> Option<Decision> {
    let age = age_in_hours(c, now);

    match c.priority {
        Priority::Critical if age >= SLA_CRITICAL_HOURS => Some(Decision {
            reason: format!(
                "Critical complaint unresolved for {} hours (SLA: {} hours)",
                age, SLA_CRITICAL_HOURS
            ),
            new_priority: Priority::Critical,
        }),
        Priority::High if age >= SLA_HIGH_HOURS => Some(Decision {
            reason: format!(
                "High priority complaint unresolved for {} hours (SLA: {} hours)",
                age, SLA_HIGH_HOURS
            ),
            new_priority: Priority::Critical,
        }),
        Priority::Medium if age >= SLA_MEDIUM_HOURS => Some(Decision {
            reason: format!(
                "Medium priority complaint unresolved for {} hours (SLA: {} hours)",
                age, SLA_MEDIUM_HOURS
            ),
            new_priority: Priority::High,
        }),
        Priority::Low if age >= SLA_LOW_HOURS => Some(Decision {
            reason: format!(
                "Low priority complaint unresolved for {} hours (SLA: {} hours)",
                age, SLA_LOW_HOURS
            ),
            new_priority: Priority::Medium,
        }),
        _ => None,
    }
}

/// 规则 3：敏感类别 (HARASSMENT / DISCRIMINATION / SAFETY)，4 小时 SLA
///
/// 不论优先级，触发即 CRITICAL。
fn sensitive_category(c: &Complaint, now: i64) -> Option<Decision> {
    if !matches!(
        c.category,
        Category::Harassment | Category::Discrimination | Category::Safety
    ) {
        return None;
    }

    let age = age_in_hours(c, now);
    if age < SLA_SENSITIVE_HOURS {
        return None;
    }

    Some(Decision {
        reason: format!(
            "Sensitive complaint ({}) unresolved for {} hours (SLA: {} hours)",
            c.category, age, SLA_SENSITIVE_HOURS
        ),
        new_priority: Priority::Critical,
    })
}

/// 规则 4：urgency_level ≥ 8 且年龄 ≥ 6 小时
fn high_urgency(c: &Complaint, now: i64) -> Option<Decision> {
    let level = c.urgency_level?;
    if level < URGENCY_LEVEL_THRESHOLD {
        return None;
    }

    let age = age_in_hours(c, now);
    if age < URGENCY_MIN_AGE_HOURS {
        return None;
    }

    Some(Decision {
        reason: format!(
            "High urgency complaint (level {}) unresolved for {} hours",
            level, age
        ),
        new_priority: Priority::Critical,
    })
}

/// 规则 5：历史条数 ≥ 5 且年龄 ≥ 48 小时
///
/// 提升表：LOW→HIGH, 其余→CRITICAL（与规则 1 的表不同，保持原样）
fn complexity(c: &Complaint, history_count: i64, now: i64) -> Option<Decision> {
    if history_count < COMPLEXITY_HISTORY_COUNT {
        return None;
    }

    let age = age_in_hours(c, now);
    if age < COMPLEXITY_MIN_AGE_HOURS {
        return None;
    }

    Some(Decision {
        reason: format!(
            "Complex complaint with {} status changes over {} hours",
            history_count, age
        ),
        new_priority: match c.priority {
            Priority::Low => Priority::High,
            _ => Priority::Critical,
        },
    })
}

fn age_in_hours(c: &Complaint, now: i64) -> i64 {
    (now - c.created_at) / HOUR_MS
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Status;

    const T0: i64 = 1_700_000_000_000;

    fn complaint(priority: Priority, category: Category) -> Complaint {
        Complaint {
            id: None,
            title: "test".to_string(),
            description: "test".to_string(),
            category,
            subcategory: None,
            priority,
            status: Status::Submitted,
            user_id: None,
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
            created_at: T0,
            updated_at: T0,
        }
    }

    fn hours(h: i64) -> i64 {
        h * HOUR_MS
    }

    #[test]
    fn test_critical_age_sla() {
        // 场景 1：CRITICAL 无截止日期，2h01m 后扫描
        let c = complaint(Priority::Critical, Category::Technical);
        let now = T0 + hours(2) + 60_000;

        let d = evaluate(&c, 0, now).expect("should escalate");
        assert_eq!(
            d.reason,
            "Critical complaint unresolved for 2 hours (SLA: 2 hours)"
        );
        assert_eq!(d.new_priority, Priority::Critical);
    }

    #[test]
    fn test_due_date_breach_bumps_low_to_medium() {
        // 场景 2：LOW，截止 T0+14d，当前 = 截止 + 13h
        let mut c = complaint(Priority::Low, Category::Billing);
        let due = T0 + 14 * 24 * HOUR_MS;
        c.due_date = Some(due);
        let now = due + hours(13);

        // 年龄 ~349h ≥ 72h，规则 2 也触发并覆盖规则 1 的原因；
        // 单独验证规则 1 的语义
        let d = due_date_breach(&c, now).expect("rule 1 fires");
        assert_eq!(d.reason, "Complaint is 13 hours overdue");
        assert_eq!(d.new_priority, Priority::Medium);
    }

    #[test]
    fn test_due_date_under_threshold_does_not_fire() {
        let mut c = complaint(Priority::Low, Category::Billing);
        c.due_date = Some(T0);
        let now = T0 + hours(11);
        assert!(due_date_breach(&c, now).is_none());
    }

    #[test]
    fn test_sensitive_category_overrides_age_sla() {
        // 场景 3：SAFETY / MEDIUM，年龄 5h —— MEDIUM 的 24h SLA 未到，
        // 但敏感类别 4h SLA 已过
        let c = complaint(Priority::Medium, Category::Safety);
        let now = T0 + hours(5);

        let d = evaluate(&c, 0, now).expect("should escalate");
        assert_eq!(
            d.reason,
            "Sensitive complaint (SAFETY) unresolved for 5 hours (SLA: 4 hours)"
        );
        assert_eq!(d.new_priority, Priority::Critical);
    }

    #[test]
    fn test_high_urgency_rule() {
        let mut c = complaint(Priority::Low, Category::General);
        c.urgency_level = Some(9);
        let now = T0 + hours(7);

        let d = evaluate(&c, 0, now).expect("should escalate");
        assert_eq!(
            d.reason,
            "High urgency complaint (level 9) unresolved for 7 hours"
        );
        assert_eq!(d.new_priority, Priority::Critical);

        // 紧急度不够则不触发
        c.urgency_level = Some(7);
        assert!(evaluate(&c, 0, now).is_none());
    }

    #[test]
    fn test_complexity_rule_distinct_bump_table() {
        // LOW → HIGH（与规则 1 的 LOW → MEDIUM 不同）
        let c = complaint(Priority::Low, Category::General);
        let now = T0 + hours(50);

        let d = evaluate(&c, 6, now).expect("should escalate");
        assert_eq!(d.reason, "Complex complaint with 6 status changes over 50 hours");
        assert_eq!(d.new_priority, Priority::High);

        // MEDIUM → CRITICAL
        let c = complaint(Priority::Medium, Category::General);
        let d = complexity(&c, 6, now).expect("rule 5 fires");
        assert_eq!(d.new_priority, Priority::Critical);
    }

    #[test]
    fn test_later_rule_overrides_earlier() {
        // 逾期 (规则 1) 和高紧急度 (规则 4) 同时触发：
        // 规则 4 在后，原因和优先级以它为准
        let mut c = complaint(Priority::Low, Category::General);
        c.due_date = Some(T0);
        c.urgency_level = Some(10);
        let now = T0 + hours(13);

        let d = evaluate(&c, 0, now).expect("should escalate");
        assert!(d.reason.starts_with("High urgency complaint"));
        assert_eq!(d.new_priority, Priority::Critical);
    }

    #[test]
    fn test_priority_never_decreases() {
        // 规则 1 对 LOW 给 MEDIUM，不是 LOW
        let mut c = complaint(Priority::Low, Category::General);
        c.due_date = Some(T0);
        let now = T0 + hours(12);

        let d = due_date_breach(&c, now).expect("rule 1 fires");
        assert_eq!(d.new_priority, Priority::Medium);
    }

    #[test]
    fn test_fresh_complaint_not_escalated() {
        let c = complaint(Priority::Critical, Category::Technical);
        let now = T0 + hours(1);
        assert!(evaluate(&c, 0, now).is_none());
    }

    #[test]
    fn test_cool_down_cutoff() {
        assert_eq!(cool_down_cutoff(T0), T0 - hours(4));
    }
}
