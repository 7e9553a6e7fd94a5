//! # GET /download/{name}
//!
//! 短寿命の署名付きダウンロードURL発行。

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use imgbox_types::DownloadResponse;

use crate::config::GatewayState;
use crate::error::GatewayError;

/// GET /download/{name} — ダウンロードURL発行。
///
/// 署名はオブジェクトの存在と無関係に成功するため、先に存在確認を行い、
/// 存在しないキーには404を返す。
pub async fn handle_download(
    State(state): State<Arc<GatewayState>>,
    Path(name): Path<String>,
) -> Result<Json<DownloadResponse>, GatewayError> {
    let exists = state
        .storage
        .object_exists(&name)
        .await
        .map_err(GatewayError::Download)?;
    if !exists {
        return Err(GatewayError::NotFound(name));
    }

    let download_url = state
        .storage
        .presign_get(&name, state.download_expiry_secs)
        .await
        .map_err(GatewayError::Download)?;

    tracing::info!(key = %name, expiry_secs = state.download_expiry_secs, "ダウンロードURLを発行");
    Ok(Json(DownloadResponse { download_url }))
}
