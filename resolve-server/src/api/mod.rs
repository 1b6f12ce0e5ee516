//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`escalations`] - 手动升级、升级队列、历史查询

pub mod escalations;
pub mod health;

use crate::core::ServerState;
use axum::Router;

/// Build the Axum router (without state)
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(escalations::router())
}
