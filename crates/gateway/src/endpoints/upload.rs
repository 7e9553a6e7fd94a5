//! # POST /upload
//!
//! multipart/form-data で受け取った画像をバケットに書き込む。

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use imgbox_types::UploadResponse;

use crate::config::GatewayState;
use crate::error::GatewayError;

/// 画像ファイルを受け取るmultipartフィールド名
pub const IMAGE_FIELD: &str = "image";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const NO_FILE_MESSAGE: &str = "No file uploaded";

/// 1リクエスト分のアップロード内容。
struct UploadedFile {
    original_name: String,
    content_type: String,
    bytes: Bytes,
}

/// オブジェクトキーを生成する: `<epoch millis>-<元ファイル名>`。
/// ファイル名は加工しない（パス区切り文字等もそのままキーに入る）。
pub(crate) fn object_key(epoch_millis: u128, original_name: &str) -> String {
    format!("{epoch_millis}-{original_name}")
}

fn multipart_error(e: MultipartError) -> GatewayError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge(e.body_text())
    } else {
        GatewayError::BadRequest(e.body_text())
    }
}

/// `image` フィールドのファイルを読み出す。
///
/// ファイル名を持たないフィールドはテキストフィールドとして読み飛ばす。
/// ファイルが2つ以上、または `image` 以外の名前のファイルはエラー。
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, GatewayError> {
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(original_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            continue;
        };

        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != IMAGE_FIELD || file.is_some() {
            return Err(GatewayError::BadRequest(format!(
                "Unexpected file field: {field_name}"
            )));
        }

        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        file = Some(UploadedFile {
            original_name,
            content_type,
            bytes,
        });
    }

    Ok(file)
}

/// POST /upload — 画像アップロード。
///
/// 返却する `url` は署名なしのオブジェクトURLで、アクセス可能性は保証しない。
pub async fn handle_upload(
    State(state): State<Arc<GatewayState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, GatewayError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "multipartとして解釈できないリクエスト");
        GatewayError::BadRequest(NO_FILE_MESSAGE.to_string())
    })?;

    let file = read_image_field(&mut multipart)
        .await?
        .ok_or_else(|| GatewayError::BadRequest(NO_FILE_MESSAGE.to_string()))?;

    let epoch_millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| GatewayError::Internal(format!("時刻取得失敗: {e}")))?
        .as_millis();
    let key = object_key(epoch_millis, &file.original_name);

    state
        .storage
        .put_object(&key, &file.bytes, &file.content_type)
        .await
        .map_err(GatewayError::Upload)?;

    tracing::info!(
        key = %key,
        content_type = %file.content_type,
        size_bytes = file.bytes.len(),
        "アップロード完了"
    );

    Ok(Json(UploadResponse {
        url: state.storage.public_url(&key),
        filename: key,
    }))
}
