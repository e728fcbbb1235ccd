//! Document path layout.
//!
//! ```text
//! users/{userId}                                  activeFolder pointer
//! users/{userId}/folders/{folderId}               personal folder cursor
//! users/{userId}/folders/{folderId}/items/{id}    personal items
//! community/{folderId}/items/{id}                 community items
//! ```

use memoria_core::{Error, FolderCategory, FolderId, FolderRef, Result, UserId};

/// Dotted field holding the user-level cursor.
pub const USER_CURSOR_FIELD: &str = "activeFolder.activeFolderItemIdx";

/// Field holding a personal folder's own cursor.
pub const FOLDER_CURSOR_FIELD: &str = "activeFolderItemIdx";

pub fn user(user_id: &UserId) -> String {
    format!("users/{user_id}")
}

pub fn personal_folder(user_id: &UserId, folder_id: &FolderId) -> String {
    format!("users/{user_id}/folders/{folder_id}")
}

/// The `items` collection a folder reference points at.
pub fn items(user_id: &UserId, folder: &FolderRef) -> String {
    match folder.category {
        FolderCategory::Personal => {
            format!("users/{user_id}/folders/{}/items", folder.folder_id)
        }
        FolderCategory::Community => format!("community/{}/items", folder.folder_id),
    }
}

/// Split a document path into `(collection, id)`.
///
/// Document paths have an even number of non-empty segments; anything else
/// is rejected.
pub fn split_document(path: &str) -> Result<(&str, &str)> {
    let segments = path.split('/').count();
    if segments < 2 || segments % 2 != 0 || path.split('/').any(str::is_empty) {
        return Err(Error::Validation(format!("not a document path: '{path}'")));
    }
    path.rsplit_once('/')
        .ok_or_else(|| Error::Validation(format!("not a document path: '{path}'")))
}
