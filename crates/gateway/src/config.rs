//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。
//! 設定は起動時に一度だけ読み込まれ、プロセス終了まで変更されない。

use axum::http::HeaderValue;

use crate::storage::ObjectStorage;

/// 一覧・検索で発行する署名付きURLの有効期限（秒）
pub const LIST_URL_EXPIRY_SECS: u32 = 3600;
/// 明示的なダウンロードで発行する署名付きURLの有効期限（秒）
pub const DOWNLOAD_URL_EXPIRY_SECS: u32 = 60;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_SIGN_CONCURRENCY: usize = 32;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024; // 10MB
const DEFAULT_MEMORY_BASE_URL: &str = "memory://imgbox";

/// ストレージバックエンドの選択。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// S3互換ストレージ（本番用）
    S3(S3Settings),
    /// インメモリ（開発環境用、再起動で消える）
    Memory { base_url: String },
}

/// S3互換バケットへの接続設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// MinIO, Cloudflare R2 等のS3互換エンドポイント。Noneの場合はAWS S3。
    pub endpoint: Option<String>,
}

/// 起動時に読み込むGateway設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// 待ち受けアドレス
    pub bind_addr: String,
    pub storage: StorageBackend,
    /// 一覧・検索時の署名付きURL生成の同時実行数上限
    pub sign_concurrency: usize,
    /// /upload のリクエストボディ上限（バイト）
    pub max_upload_bytes: usize,
    /// CORSで許可するオリジン。Noneの場合は全オリジンを許可する。
    pub cors_allowed_origins: Option<Vec<HeaderValue>>,
}

impl GatewayConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 変数名から値を引く関数を使って構築する。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| anyhow::anyhow!("{name}が設定されていません"))
        };

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let storage = match var("STORAGE_BACKEND").as_deref().unwrap_or("s3") {
            "s3" => StorageBackend::S3(S3Settings {
                region: required("AWS_REGION")?,
                access_key: required("AWS_ACCESS_KEY_ID")?,
                secret_key: required("AWS_SECRET_ACCESS_KEY")?,
                bucket: required("AWS_BUCKET")?,
                endpoint: var("S3_ENDPOINT"),
            }),
            "memory" => StorageBackend::Memory {
                base_url: var("MEMORY_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_MEMORY_BASE_URL.to_string()),
            },
            other => anyhow::bail!("STORAGE_BACKENDが不正です: {other}（s3 または memory）"),
        };

        let sign_concurrency = match var("SIGN_CONCURRENCY") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|e| anyhow::anyhow!("SIGN_CONCURRENCYが不正です: {v} ({e})"))?,
            None => DEFAULT_SIGN_CONCURRENCY,
        };
        if sign_concurrency == 0 {
            anyhow::bail!("SIGN_CONCURRENCYは1以上である必要があります");
        }

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|e| anyhow::anyhow!("MAX_UPLOAD_BYTESが不正です: {v} ({e})"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(|o| {
                        HeaderValue::from_str(o)
                            .map_err(|e| anyhow::anyhow!("CORS_ALLOWED_ORIGINSが不正です: {o} ({e})"))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(Self {
            bind_addr,
            storage,
            sign_concurrency,
            max_upload_bytes,
            cors_allowed_origins,
        })
    }
}

/// Gatewayの共有状態。リクエスト間で共有されるが、変更されることはない。
pub struct GatewayState {
    /// オブジェクトストレージ（S3互換等、トレイトで抽象化）
    pub storage: Box<dyn ObjectStorage>,
    /// 一覧・検索時の署名付きURLの有効期限（秒）
    pub list_expiry_secs: u32,
    /// ダウンロード用署名付きURLの有効期限（秒）
    pub download_expiry_secs: u32,
    /// 署名付きURL生成の同時実行数上限
    pub sign_concurrency: usize,
}

impl GatewayState {
    pub fn new(storage: Box<dyn ObjectStorage>, sign_concurrency: usize) -> Self {
        Self {
            storage,
            list_expiry_secs: LIST_URL_EXPIRY_SECS,
            download_expiry_secs: DOWNLOAD_URL_EXPIRY_SECS,
            sign_concurrency: sign_concurrency.max(1),
        }
    }
}
