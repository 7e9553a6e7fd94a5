//! # imgbox 共有型定義
//!
//! GatewayのHTTP APIで送受信するJSONボディをRust構造体として提供する。
//!
//! ## フィールド名の規則
//! - ブラウザ側クライアントとの互換性のため、JSON上のフィールド名は
//!   既存のフロントエンドが期待する名前（`filename`, `downloadUrl` 等）に合わせる。

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// POST /upload
// ---------------------------------------------------------------------------

/// アップロード成功時のレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// 割り当てられたオブジェクトキー（`<epoch millis>-<元ファイル名>`）
    pub filename: String,
    /// バケット上のオブジェクトURL（署名なし）。
    /// 非公開バケットではこのURLで直接アクセスできないため、
    /// 確実なアクセスには `/download/{name}` を使用する。
    pub url: String,
}

// ---------------------------------------------------------------------------
// GET /images, GET /search
// ---------------------------------------------------------------------------

/// 一覧・検索結果の1エントリ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// オブジェクトキー
    pub name: String,
    /// 署名付きダウンロードURL（GET）
    pub url: String,
}

/// GET /search のクエリパラメータ。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// 検索文字列。省略時は空文字列（全件一致）。
    #[serde(default)]
    pub q: String,
}

// ---------------------------------------------------------------------------
// GET /download/{name}
// ---------------------------------------------------------------------------

/// ダウンロードURL発行のレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResponse {
    /// 短寿命の署名付きダウンロードURL
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
}

// ---------------------------------------------------------------------------
// DELETE /{name}、エラー応答
// ---------------------------------------------------------------------------

/// メッセージのみを返すレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// エラーレスポンスのボディ。
///
/// `message` は利用者向けの汎用メッセージで、ストレージ側の原因は含まない。
/// `error` は機械判読用のエラー種別（例: `"not_found"`, `"signing_failed"`）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub error: String,
}
