//! Escalation API 模块
//!
//! 手动升级入口和升级相关的只读查询。授权是外部关注点——
//! 到达这里的调用者视为已授权。

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/complaints/{id}/escalate", post(handler::manual_escalate))
        .route("/complaints/{id}/history", get(handler::history))
        .route("/escalations/pending", get(handler::pending))
}
