//! # インメモリ オブジェクトストレージ実装
//!
//! プロセス内の `BTreeMap` にオブジェクトを保持する。開発環境とテスト用。
//! キーの辞書順で一覧を返す点はS3の ListObjectsV2 と同じ。

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;

use super::{ObjectStorage, StorageError, StoredObject};

/// 保存済みオブジェクト。
struct MemoryObject {
    content: Vec<u8>,
    content_type: String,
}

/// インメモリのObjectStorage実装。
///
/// 署名付きURLは `{base_url}/{key}?expires_in={秒}&expires_at={UNIX秒}` 形式で、
/// 実際のアクセス制御は行わない。
pub struct MemoryObjectStorage {
    base_url: String,
    objects: RwLock<BTreeMap<String, MemoryObject>>,
}

impl MemoryObjectStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// 保存済みオブジェクトの内容とContent-Typeを返す。
    #[cfg(test)]
    pub async fn get(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|o| (o.content.clone(), o.content_type.clone()))
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn put_object(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects.write().await.insert(
            key.to_string(),
            MemoryObject {
                content: content.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn list_objects(&self) -> Result<Vec<StoredObject>, StorageError> {
        Ok(self
            .objects
            .read()
            .await
            .iter()
            .map(|(key, object)| StoredObject {
                key: key.clone(),
                size_bytes: object.content.len() as u64,
            })
            .collect())
    }

    async fn object_exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.objects.read().await.contains_key(key))
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| StorageError::Presign(format!("時刻取得失敗: {e}")))?
            .as_secs();
        Ok(format!(
            "{}/{key}?expires_in={expiry_secs}&expires_at={}",
            self.base_url,
            now + u64::from(expiry_secs)
        ))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }
}
