//! # GET /images
//!
//! バケット内の全画像の一覧。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use imgbox_types::ImageEntry;

use super::signing::sign_entries;
use crate::config::GatewayState;
use crate::error::GatewayError;

/// GET /images — 全件一覧。
///
/// キーの辞書順（= アップロード時刻順）で返し、各エントリに
/// 一覧用の署名付きURLを付与する。ページングは行わない。
pub async fn handle_list_images(
    State(state): State<Arc<GatewayState>>,
) -> Result<Json<Vec<ImageEntry>>, GatewayError> {
    let objects = state
        .storage
        .list_objects()
        .await
        .map_err(GatewayError::List)?;
    let total_bytes: u64 = objects.iter().map(|o| o.size_bytes).sum();

    let entries = sign_entries(&state, objects)
        .await
        .map_err(GatewayError::List)?;

    tracing::debug!(count = entries.len(), total_bytes, "一覧を返却");
    Ok(Json(entries))
}
