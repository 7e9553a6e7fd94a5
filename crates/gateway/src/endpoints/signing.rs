//! # 署名付きURLの一括生成
//!
//! 一覧・検索で共有する。オブジェクトごとの署名を上限付きで並行実行し、
//! 一覧の順序を保ったまま全件そろってから返す。

use futures::stream::{self, StreamExt, TryStreamExt};
use imgbox_types::ImageEntry;

use crate::config::GatewayState;
use crate::storage::{StorageError, StoredObject};

/// 各オブジェクトに一覧用の署名付きURLを付与する。
///
/// 1件でも署名に失敗した場合は全体を失敗として返す。
pub(crate) async fn sign_entries(
    state: &GatewayState,
    objects: Vec<StoredObject>,
) -> Result<Vec<ImageEntry>, StorageError> {
    let expiry_secs = state.list_expiry_secs;

    stream::iter(objects)
        .map(|object| async move {
            let url = state.storage.presign_get(&object.key, expiry_secs).await?;
            Ok::<_, StorageError>(ImageEntry {
                name: object.key,
                url,
            })
        })
        .buffered(state.sign_concurrency)
        .try_collect()
        .await
}
