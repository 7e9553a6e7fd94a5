//! # GET /search
//!
//! キーに対する大文字小文字を区別しない部分一致検索。
//! プロバイダー側の絞り込みは使わず、全件一覧をGateway内で絞り込む。

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use imgbox_types::{ImageEntry, SearchQuery};

use super::signing::sign_entries;
use crate::config::GatewayState;
use crate::error::GatewayError;

/// キーが検索文字列を含むか（大文字小文字を区別しない）。
/// `needle` は小文字化済みであること。空文字列は常に一致する。
pub(crate) fn key_matches(key: &str, needle: &str) -> bool {
    key.to_lowercase().contains(needle)
}

/// GET /search?q= — 部分一致検索。
pub async fn handle_search(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ImageEntry>>, GatewayError> {
    let needle = query.q.to_lowercase();

    let matched: Vec<_> = state
        .storage
        .list_objects()
        .await
        .map_err(GatewayError::Search)?
        .into_iter()
        .filter(|object| key_matches(&object.key, &needle))
        .collect();

    let entries = sign_entries(&state, matched)
        .await
        .map_err(GatewayError::Search)?;

    tracing::debug!(q = %query.q, count = entries.len(), "検索結果を返却");
    Ok(Json(entries))
}
