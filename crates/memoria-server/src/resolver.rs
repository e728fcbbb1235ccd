//! Active-item resolution.
//!
//! Given a user's `activeFolder` pointer, load the folder's items, bring the
//! cursor back in range (past the end wraps to the first item, below zero
//! wraps to the last), persist any correction, and return the item at the
//! final position.
//!
//! Resolution is best effort: store failures are logged and reported as
//! [`Resolution::Unavailable`], never propagated. Only the user-level cursor
//! is consulted; a personal folder's own cursor is written but never read.

use memoria_core::{ActiveFolder, ActiveItem, CursorUpdate, Error, FolderId, Result, UserId};
use memoria_store::queries::{cursors, items};
use memoria_store::DocumentStore;

/// Outcome of resolving a user's active item.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// An item was found (the cursor may have been corrected on the way).
    Active(ActiveItem),
    /// There is no pointer, or the pointer has no cursor.
    NoSelection,
    /// The active folder has no items. Nothing was written.
    EmptyFolder { folder_id: FolderId },
    /// A store read or write failed; the error has been logged.
    Unavailable,
}

impl Resolution {
    /// Collapse to the item, if any.
    pub fn into_active(self) -> Option<ActiveItem> {
        match self {
            Resolution::Active(item) => Some(item),
            _ => None,
        }
    }
}

/// Bring `index` into `0..len`.
///
/// Returns the index to use and whether it differs from the input. `None`
/// when `len` is zero.
pub fn wrap_index(index: i64, len: usize) -> Option<(usize, bool)> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    if index < 0 {
        Some((last, true))
    } else if index as u64 > last as u64 {
        Some((0, true))
    } else {
        Some((index as usize, false))
    }
}

/// Resolve the active item, with every outcome spelled out.
pub async fn resolve(
    store: &dyn DocumentStore,
    user_id: &UserId,
    pointer: Option<&ActiveFolder>,
) -> Resolution {
    let Some(pointer) = pointer else {
        tracing::debug!(user = %user_id, "no active folder");
        return Resolution::NoSelection;
    };
    let Some(index) = pointer.active_folder_item_idx else {
        tracing::debug!(user = %user_id, folder = %pointer.folder_id, "active folder has no cursor");
        return Resolution::NoSelection;
    };

    match try_resolve(store, user_id, pointer, index).await {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::error!(
                user = %user_id,
                folder = %pointer.folder_id,
                error = %e,
                "failed to resolve active item"
            );
            Resolution::Unavailable
        }
    }
}

/// Resolve the active item, or `None` when there is nothing to show for any
/// reason.
pub async fn resolve_active_item(
    store: &dyn DocumentStore,
    user_id: &UserId,
    pointer: Option<&ActiveFolder>,
) -> Option<ActiveItem> {
    resolve(store, user_id, pointer).await.into_active()
}

async fn try_resolve(
    store: &dyn DocumentStore,
    user_id: &UserId,
    pointer: &ActiveFolder,
    index: i64,
) -> Result<Resolution> {
    let folder = pointer.folder_ref();
    let items = items::list_items(store, user_id, &folder).await?;
    let item_count = items.len();

    let Some((resolved, corrected)) = wrap_index(index, item_count) else {
        return Ok(Resolution::EmptyFolder {
            folder_id: folder.folder_id,
        });
    };

    if corrected {
        tracing::info!(
            user = %user_id,
            folder = %folder.folder_id,
            category = %folder.category,
            from = index,
            to = resolved,
            "cursor out of range, wrapping"
        );
        cursors::set_or_shift_index(
            store,
            user_id,
            &folder.folder_id,
            folder.category,
            CursorUpdate::SetTo(resolved as i64),
        )
        .await?;
    }

    let item = items
        .into_iter()
        .nth(resolved)
        .ok_or_else(|| Error::Internal(format!("index {resolved} vanished from {item_count} items")))?;

    Ok(Resolution::Active(ActiveItem {
        item,
        category: folder.category,
        index: resolved as i64,
        item_count,
        folder_id: folder.folder_id,
    }))
}
