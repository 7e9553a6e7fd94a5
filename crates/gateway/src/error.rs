//! # Gateway エラー型
//!
//! ハンドラ境界で使うエラー型。ストレージ側の原因はログにのみ出力し、
//! クライアントには汎用メッセージと固定のHTTPステータス、エラー種別だけを返す。

use axum::http::StatusCode;
use axum::Json;
use imgbox_types::ErrorBody;

use crate::storage::StorageError;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 不正なリクエスト（ファイル未指定、multipartのパース失敗）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// リクエストボディが上限を超えた
    #[error("ペイロードサイズが上限を超えています: {0}")]
    PayloadTooLarge(String),
    /// アップロード時のストレージ書き込み失敗
    #[error("アップロードに失敗: {0}")]
    Upload(#[source] StorageError),
    /// 一覧取得または署名付きURL生成の失敗
    #[error("一覧取得に失敗: {0}")]
    List(#[source] StorageError),
    /// 検索時の一覧取得または署名付きURL生成の失敗
    #[error("検索に失敗: {0}")]
    Search(#[source] StorageError),
    /// オブジェクトが存在しない
    #[error("オブジェクトが見つかりません: {0}")]
    NotFound(String),
    /// ダウンロード用URLの発行に失敗（存在確認または署名）
    #[error("ダウンロードURL発行に失敗: {0}")]
    Download(#[source] StorageError),
    /// 削除に失敗
    #[error("削除に失敗: {0}")]
    Delete(#[source] StorageError),
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTPステータス。既存クライアントとの互換性のため、
    /// ダウンロード・削除のストレージ失敗は404として返す。
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Upload(_)
            | GatewayError::List(_)
            | GatewayError::Search(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::NotFound(_) | GatewayError::Download(_) | GatewayError::Delete(_) => {
                StatusCode::NOT_FOUND
            }
        }
    }

    /// 機械判読用のエラー種別。
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::BadRequest(_) => "bad_request",
            GatewayError::PayloadTooLarge(_) => "payload_too_large",
            GatewayError::Upload(_) => "upload_failed",
            GatewayError::List(_) => "list_failed",
            GatewayError::Search(_) => "search_failed",
            GatewayError::NotFound(_) => "not_found",
            GatewayError::Download(_) => "signing_failed",
            GatewayError::Delete(_) => "delete_failed",
            GatewayError::Internal(_) => "internal",
        }
    }

    /// クライアントに返すメッセージ。ストレージ側の原因は含めない。
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::BadRequest(message) | GatewayError::PayloadTooLarge(message) => {
                message.clone()
            }
            GatewayError::Upload(_) => "Failed to upload file".to_string(),
            GatewayError::List(_) => "Failed to list images".to_string(),
            GatewayError::Search(_) => "Search failed".to_string(),
            GatewayError::NotFound(_) | GatewayError::Download(_) | GatewayError::Delete(_) => {
                "File not found".to_string()
            }
            GatewayError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "リクエスト処理に失敗");
        } else {
            tracing::warn!(kind = self.kind(), error = %self, "リクエストを拒否");
        }

        let body = ErrorBody {
            message: self.public_message(),
            error: self.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn test_provider_cause_is_not_exposed() {
        let err = GatewayError::Upload(StorageError::Provider(
            "dns error: s3.internal.example".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to upload file");
        assert!(err.to_string().contains("dns error"));
    }

    #[test]
    fn test_download_and_delete_failures_keep_404() {
        let signing = GatewayError::Download(StorageError::Presign("bad key".to_string()));
        let delete = GatewayError::Delete(StorageError::Status { status: 503 });
        let missing = GatewayError::NotFound("1-cat.png".to_string());

        for err in [&signing, &delete, &missing] {
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
            assert_eq!(err.public_message(), "File not found");
        }
        assert_eq!(signing.kind(), "signing_failed");
        assert_eq!(delete.kind(), "delete_failed");
        assert_eq!(missing.kind(), "not_found");
    }

    #[test]
    fn test_into_response_status() {
        let response = GatewayError::BadRequest("No file uploaded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = GatewayError::Search(StorageError::Status { status: 500 }).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
