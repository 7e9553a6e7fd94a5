//! # ルーター構築
//!
//! エンドポイント、CORS、リクエストトレース、ボディサイズ上限をまとめる。

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::GatewayState;
use crate::endpoints::{
    handle_delete, handle_download, handle_list_images, handle_search, handle_upload,
};

/// CORSレイヤーを構築する。オリジン未指定の場合は全オリジンを許可する。
pub fn cors_layer(allowed_origins: Option<&[HeaderValue]>) -> CorsLayer {
    let origin = match allowed_origins {
        Some(origins) => AllowOrigin::list(origins.iter().cloned()),
        None => AllowOrigin::from(Any),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Gatewayのルーターを構築する。
pub fn build_router(
    state: Arc<GatewayState>,
    max_upload_bytes: usize,
    cors: CorsLayer,
) -> axum::Router {
    axum::Router::new()
        .route(
            "/upload",
            post(handle_upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/images", get(handle_list_images))
        .route("/search", get(handle_search))
        .route("/download/{name}", get(handle_download))
        .route("/{name}", delete(handle_delete))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
