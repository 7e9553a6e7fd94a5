//! # DELETE /{name}
//!
//! オブジェクトの削除。

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use imgbox_types::MessageResponse;

use crate::config::GatewayState;
use crate::error::GatewayError;

/// DELETE /{name} — 無条件削除。
///
/// 存在しないキーの削除もプロバイダー側で成功扱いになる。
pub async fn handle_delete(
    State(state): State<Arc<GatewayState>>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, GatewayError> {
    state
        .storage
        .delete_object(&name)
        .await
        .map_err(GatewayError::Delete)?;

    tracing::info!(key = %name, "削除完了");
    Ok(Json(MessageResponse {
        message: "Deleted successfully".to_string(),
    }))
}
