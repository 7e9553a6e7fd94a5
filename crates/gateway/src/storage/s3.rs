//! # S3互換オブジェクトストレージ実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用する実装。

use super::{ObjectStorage, StorageError, StoredObject};
use crate::config::S3Settings;

/// S3互換ストレージによるObjectStorage実装。
pub struct S3ObjectStorage {
    bucket: s3::Bucket,
    /// 署名なしURLのベース（末尾スラッシュなし）。
    /// 例: `https://my-bucket.s3.ap-northeast-1.amazonaws.com`
    public_base_url: String,
}

impl S3ObjectStorage {
    /// S3互換バケットからObjectStorageを構築する。
    pub fn new(bucket: s3::Bucket, public_base_url: String) -> Self {
        Self {
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 設定からバケットを初期化する。
    ///
    /// `endpoint` が指定された場合はカスタムリージョン + パススタイル、
    /// それ以外はAWSリージョン名 + 仮想ホストスタイルでアクセスする。
    pub fn from_settings(settings: &S3Settings) -> anyhow::Result<Self> {
        let credentials = s3::creds::Credentials::new(
            Some(settings.access_key.as_str()),
            Some(settings.secret_key.as_str()),
            None,
            None,
            None,
        )?;

        let (bucket, public_base_url) = match &settings.endpoint {
            Some(endpoint) => {
                tracing::info!(s3_endpoint = %endpoint, "S3互換エンドポイントを設定");
                let region = s3::Region::Custom {
                    region: settings.region.clone(),
                    endpoint: endpoint.clone(),
                };
                let bucket =
                    s3::Bucket::new(&settings.bucket, region, credentials)?.with_path_style();
                let base = format!("{}/{}", endpoint.trim_end_matches('/'), settings.bucket);
                (bucket, base)
            }
            None => {
                let region: s3::Region = settings.region.parse()?;
                let bucket = s3::Bucket::new(&settings.bucket, region, credentials)?;
                let base = format!(
                    "https://{}.s3.{}.amazonaws.com",
                    settings.bucket, settings.region
                );
                (bucket, base)
            }
        };

        Ok(Self::new(*bucket, public_base_url))
    }
}

fn provider_error(e: s3::error::S3Error) -> StorageError {
    StorageError::Provider(e.to_string())
}

fn check_status(status: u16) -> Result<(), StorageError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(StorageError::Status { status })
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put_object(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, content, content_type)
            .await
            .map_err(provider_error)?;
        check_status(response.status_code())
    }

    async fn list_objects(&self) -> Result<Vec<StoredObject>, StorageError> {
        // rust-s3 が continuation token を辿って全ページを返す
        let pages = self
            .bucket
            .list(String::new(), None)
            .await
            .map_err(provider_error)?;

        Ok(pages
            .into_iter()
            .flat_map(|page| page.contents)
            .map(|object| StoredObject {
                key: object.key,
                size_bytes: object.size,
            })
            .collect())
    }

    /// HEADで存在確認する。
    ///
    /// AWS S3は `s3:ListBucket` 権限がない場合、存在しないキーに404ではなく403を返す。
    /// その場合はエラー扱いになるため、404を区別するには同権限が必要。
    async fn object_exists(&self, key: &str) -> Result<bool, StorageError> {
        let (_, status) = self.bucket.head_object(key).await.map_err(provider_error)?;
        match status {
            200..=299 => Ok(true),
            404 => Ok(false),
            status => Err(StorageError::Status { status }),
        }
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError> {
        self.bucket
            .presign_get(key, expiry_secs, None)
            .await
            .map_err(|e| StorageError::Presign(e.to_string()))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        let response = self.bucket.delete_object(key).await.map_err(provider_error)?;
        check_status(response.status_code())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}
