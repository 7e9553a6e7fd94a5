//! # オブジェクトストレージ
//!
//! 画像を保存するバケットの抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュール、
//! 開発・テスト用のインメモリ実装は `memory` サブモジュールを参照。

pub mod memory;
#[cfg(feature = "vendor-aws")]
pub mod s3;

pub use memory::MemoryObjectStorage;
#[cfg(feature = "vendor-aws")]
pub use self::s3::S3ObjectStorage;

/// バケット内の1オブジェクトのメタデータ（一覧取得結果）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// オブジェクトキー
    pub key: String,
    /// プロバイダーが報告するサイズ（バイト）
    pub size_bytes: u64,
}

/// ストレージ操作のエラー型。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// プロバイダーへのリクエスト自体が失敗（通信エラー、SDKエラー）
    #[error("ストレージへのリクエストに失敗: {0}")]
    Provider(String),
    /// プロバイダーが非2xxのステータスを返した
    #[error("ストレージがエラーを返しました: HTTP {status}")]
    Status { status: u16 },
    /// 署名付きURLの生成に失敗
    #[error("署名付きURL生成失敗: {0}")]
    Presign(String),
}

/// オブジェクトストレージの抽象インターフェース。
///
/// Gateway運用者はS3互換ストレージ（AWS S3, MinIO, Cloudflare R2等）を
/// 実装として選択できる。各メソッドはプロバイダーへの1往復に対応し、
/// 実装側で状態をキャッシュしてはならない（バケットが唯一の正）。
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// オブジェクトを書き込む。同じキーが存在する場合は上書きされる。
    async fn put_object(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// バケット全体のオブジェクトをキーの辞書順で返す。
    async fn list_objects(&self) -> Result<Vec<StoredObject>, StorageError>;

    /// オブジェクトが存在するかを確認する。
    async fn object_exists(&self, key: &str) -> Result<bool, StorageError>;

    /// 読み取り用の署名付きURL（GET）を生成する。
    /// 署名はオブジェクトの存在とは無関係に生成される。
    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError>;

    /// オブジェクトを削除する。存在しないキーの削除も成功として扱う。
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    /// オブジェクトの署名なしURLを組み立てる（プロバイダーへの問い合わせなし）。
    fn public_url(&self, key: &str) -> String;
}

#[async_trait::async_trait]
impl<T: ObjectStorage + ?Sized> ObjectStorage for std::sync::Arc<T> {
    async fn put_object(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        (**self).put_object(key, content, content_type).await
    }

    async fn list_objects(&self) -> Result<Vec<StoredObject>, StorageError> {
        (**self).list_objects().await
    }

    async fn object_exists(&self, key: &str) -> Result<bool, StorageError> {
        (**self).object_exists(key).await
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError> {
        (**self).presign_get(key, expiry_secs).await
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete_object(key).await
    }

    fn public_url(&self, key: &str) -> String {
        (**self).public_url(key)
    }
}
