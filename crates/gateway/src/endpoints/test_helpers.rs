//! # エンドポイントテスト用共通ヘルパー
//!
//! モックストレージとGatewayサーバーの起動。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tower_http::cors::CorsLayer;

use crate::config::GatewayState;
use crate::router::{build_router, cors_layer};
use crate::storage::{MemoryObjectStorage, ObjectStorage, StorageError, StoredObject};

/// テスト用のインメモリストレージのベースURL
pub const TEST_BASE_URL: &str = "memory://test-bucket";

/// 指定キーを書き込み済みのインメモリストレージでGatewayStateを構築する。
pub async fn seeded_state(keys: &[&str]) -> Arc<GatewayState> {
    let storage = MemoryObjectStorage::new(TEST_BASE_URL);
    for key in keys {
        storage
            .put_object(key, key.as_bytes(), "image/png")
            .await
            .unwrap();
    }
    Arc::new(GatewayState::new(Box::new(storage), 4))
}

/// 操作ごとに失敗を注入できるモックストレージ。
/// 一覧には `keys` を返し、その他の操作は成功する。
#[derive(Default)]
pub struct FailingStorage {
    pub keys: Vec<String>,
    pub fail_put: bool,
    pub fail_list: bool,
    pub fail_exists: bool,
    pub fail_delete: bool,
    /// このキーの署名だけ失敗させる
    pub fail_presign_key: Option<String>,
}

#[async_trait::async_trait]
impl ObjectStorage for FailingStorage {
    async fn put_object(&self, _: &str, _: &[u8], _: &str) -> Result<(), StorageError> {
        if self.fail_put {
            return Err(StorageError::Provider("connection reset".to_string()));
        }
        Ok(())
    }

    async fn list_objects(&self) -> Result<Vec<StoredObject>, StorageError> {
        if self.fail_list {
            return Err(StorageError::Status { status: 503 });
        }
        Ok(self
            .keys
            .iter()
            .map(|key| StoredObject {
                key: key.clone(),
                size_bytes: 1,
            })
            .collect())
    }

    async fn object_exists(&self, _: &str) -> Result<bool, StorageError> {
        if self.fail_exists {
            return Err(StorageError::Status { status: 403 });
        }
        Ok(true)
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError> {
        if self.fail_presign_key.as_deref() == Some(key) {
            return Err(StorageError::Presign("invalid key".to_string()));
        }
        Ok(format!("http://mock-storage/{key}?expires_in={expiry_secs}"))
    }

    async fn delete_object(&self, _: &str) -> Result<(), StorageError> {
        if self.fail_delete {
            return Err(StorageError::Provider("timeout".to_string()));
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://mock-storage/{key}")
    }
}

/// 署名の同時実行数を記録するモックストレージ。
pub struct ConcurrencyRecorder {
    pub keys: Vec<String>,
    in_flight: AtomicUsize,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl ConcurrencyRecorder {
    pub fn new(count: usize) -> Self {
        Self {
            keys: (0..count).map(|i| format!("{i:04}-img.png")).collect(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for ConcurrencyRecorder {
    async fn put_object(&self, _: &str, _: &[u8], _: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn list_objects(&self) -> Result<Vec<StoredObject>, StorageError> {
        Ok(self
            .keys
            .iter()
            .map(|key| StoredObject {
                key: key.clone(),
                size_bytes: 0,
            })
            .collect())
    }

    async fn object_exists(&self, _: &str) -> Result<bool, StorageError> {
        Ok(true)
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // 後半のキーほど早く終わるようにして、完了順と返却順がずれる状況を作る
        let delay = 20u64.saturating_sub(key[..4].parse::<u64>().unwrap_or(0));
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(format!("http://recorder/{key}?expires_in={expiry_secs}"))
    }

    async fn delete_object(&self, _: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://recorder/{key}")
    }
}

/// Gatewayを `127.0.0.1:0` で起動し、ポート番号を返す（CORSは全オリジン許可）。
pub async fn start_gateway(state: Arc<GatewayState>, max_upload_bytes: usize) -> u16 {
    start_gateway_with_cors(state, max_upload_bytes, cors_layer(None)).await
}

/// CORSレイヤーを指定してGatewayを起動し、ポート番号を返す。
pub async fn start_gateway_with_cors(
    state: Arc<GatewayState>,
    max_upload_bytes: usize,
    cors: CorsLayer,
) -> u16 {
    let app = build_router(state, max_upload_bytes, cors);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    port
}
