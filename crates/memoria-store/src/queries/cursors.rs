//! Cursor updates.
//!
//! A personal folder has two copies of the cursor: one inside the user's
//! `activeFolder` pointer and one on the folder document. Both are written in
//! the same atomic batch. Community folders only have the user-level copy.
//! Resolution reads the user-level copy; the folder copy is bookkeeping.

use memoria_core::{CursorUpdate, FolderCategory, FolderId, Result, UserId};

use crate::paths::{self, FOLDER_CURSOR_FIELD, USER_CURSOR_FIELD};
use crate::store::{DocumentStore, FieldOp, FieldWrite};

impl From<CursorUpdate> for FieldOp {
    fn from(update: CursorUpdate) -> Self {
        match update {
            CursorUpdate::Shift(delta) => FieldOp::Increment(delta),
            CursorUpdate::SetTo(value) => FieldOp::Set(value),
        }
    }
}

/// The writes a cursor update expands to.
pub fn cursor_writes(
    user_id: &UserId,
    folder_id: &FolderId,
    category: FolderCategory,
    update: CursorUpdate,
) -> Vec<FieldWrite> {
    let op = FieldOp::from(update);
    let mut writes = vec![FieldWrite::new(paths::user(user_id), USER_CURSOR_FIELD, op)];
    if category == FolderCategory::Personal {
        writes.push(FieldWrite::new(
            paths::personal_folder(user_id, folder_id),
            FOLDER_CURSOR_FIELD,
            op,
        ));
    }
    writes
}

/// Apply `update` to the user's cursor and, for personal folders, to the
/// folder's cursor.
///
/// Fails with `Error::NotFound` if the user or folder document is missing;
/// in that case neither cursor changes.
pub async fn set_or_shift_index(
    store: &dyn DocumentStore,
    user_id: &UserId,
    folder_id: &FolderId,
    category: FolderCategory,
    update: CursorUpdate,
) -> Result<()> {
    tracing::debug!(
        user = %user_id,
        folder = %folder_id,
        %category,
        ?update,
        "updating cursor"
    );
    store
        .apply(cursor_writes(user_id, folder_id, category, update))
        .await
}
