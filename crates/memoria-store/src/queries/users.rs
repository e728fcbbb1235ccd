//! User document reads.

use serde_json::Value;

use memoria_core::{ActiveFolder, ActiveFolderDoc, Error, Result, UserId};

use crate::paths;
use crate::store::DocumentStore;

/// Fetch the raw user document.
pub async fn get_user(store: &dyn DocumentStore, user_id: &UserId) -> Result<Option<Value>> {
    store.get(&paths::user(user_id)).await
}

/// Fetch the user's active-folder pointer.
///
/// Returns `None` when the user does not exist or has no `activeFolder`.
/// A pointer naming an unknown category fails with
/// [`Error::InvalidReference`].
pub async fn get_active_folder(
    store: &dyn DocumentStore,
    user_id: &UserId,
) -> Result<Option<ActiveFolder>> {
    let Some(mut user) = get_user(store, user_id).await? else {
        tracing::debug!(user = %user_id, "user document not found");
        return Ok(None);
    };

    let pointer = match user.get_mut("activeFolder").map(Value::take) {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };

    let doc: ActiveFolderDoc = serde_json::from_value(pointer).map_err(|e| {
        Error::InvalidReference(format!("activeFolder of user {user_id} is malformed: {e}"))
    })?;
    ActiveFolder::try_from(doc).map(Some)
}
