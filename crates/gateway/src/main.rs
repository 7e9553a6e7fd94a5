//! # imgbox Gateway
//!
//! 画像ホスティング用のストレージGateway。
//! HTTPリクエストをオブジェクトストレージへの1操作に変換し、JSONで返す。
//!
//! ## 役割
//! - 画像アップロード（multipart）とバケットへの書き込み
//! - 一覧・検索（署名付きURLの一括発行）
//! - 短寿命のダウンロードURL発行
//! - 削除
//!
//! ## API エンドポイント
//! - `POST /upload` — 画像アップロード
//! - `GET /images` — 全件一覧
//! - `GET /search?q=` — キーの部分一致検索
//! - `GET /download/{name}` — ダウンロードURL発行
//! - `DELETE /{name}` — 削除

mod config;
mod endpoints;
mod error;
mod router;
mod storage;

use std::sync::Arc;

use config::{GatewayConfig, GatewayState, StorageBackend};
use storage::{MemoryObjectStorage, ObjectStorage};

/// 設定に従ってストレージバックエンドを初期化する。
fn init_storage(backend: &StorageBackend) -> anyhow::Result<Box<dyn ObjectStorage>> {
    match backend {
        #[cfg(feature = "vendor-aws")]
        StorageBackend::S3(settings) => {
            tracing::info!(
                bucket = %settings.bucket,
                region = %settings.region,
                "S3ストレージで起動します"
            );
            Ok(Box::new(storage::S3ObjectStorage::from_settings(settings)?))
        }
        #[cfg(not(feature = "vendor-aws"))]
        StorageBackend::S3(_) => {
            anyhow::bail!("S3ストレージを使うには vendor-aws フィーチャーが必要です")
        }
        StorageBackend::Memory { base_url } => {
            tracing::warn!("インメモリストレージで起動します（開発環境用、再起動で消えます）");
            Ok(Box::new(MemoryObjectStorage::new(base_url.clone())))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+Cハンドラの登録に失敗");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERMハンドラの登録に失敗");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("シャットダウンシグナルを受信しました");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .envがあれば読み込む（なくてもよい）
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    let storage = init_storage(&config.storage)?;
    let state = Arc::new(GatewayState::new(storage, config.sign_concurrency));

    let cors = router::cors_layer(config.cors_allowed_origins.as_deref());
    let app = router::build_router(state, config.max_upload_bytes, cors);

    tracing::info!(
        sign_concurrency = config.sign_concurrency,
        max_upload_bytes = config.max_upload_bytes,
        "Gatewayを {} で起動します",
        config.bind_addr
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
