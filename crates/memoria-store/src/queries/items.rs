//! Folder item loading.

use memoria_core::{Error, FolderItem, FolderRef, ItemId, Result, UserId};

use crate::paths;
use crate::store::DocumentStore;

/// Load every item of `folder`, in store order.
///
/// Personal folders are read from under the user, community folders from
/// the global `community` tree. The whole collection is loaded in one call.
pub async fn list_items(
    store: &dyn DocumentStore,
    user_id: &UserId,
    folder: &FolderRef,
) -> Result<Vec<FolderItem>> {
    let collection = paths::items(user_id, folder);
    let docs = store.list(&collection).await?;
    tracing::debug!(collection = %collection, count = docs.len(), "loaded folder items");

    docs.into_iter()
        .map(|doc| {
            let id: ItemId = doc
                .id
                .parse()
                .map_err(|e: Error| Error::Internal(format!("{collection}: {e}")))?;
            FolderItem::from_document(id, doc.data)
        })
        .collect()
}
