//! Domain model: the user's active-folder pointer, folder items, and the
//! resolved active item handed back to callers.
//!
//! Field names on the wire follow the document layout (`activeFolder`,
//! `folderCategory`, `activeFolderItemIdx`, `secure_url`), so the serde
//! attributes here are the schema of the stored documents.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, FolderId, ItemId, Result};

// ---------------------------------------------------------------------------
// FolderCategory
// ---------------------------------------------------------------------------

/// Which collection tree a folder lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderCategory {
    /// Owned by one user: `users/{userId}/folders/{folderId}`.
    Personal,
    /// Shared by everyone: `community/{folderId}`.
    Community,
}

impl FolderCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FolderCategory::Personal => "personal",
            FolderCategory::Community => "community",
        }
    }
}

impl fmt::Display for FolderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FolderCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "personal" => Ok(FolderCategory::Personal),
            "community" => Ok(FolderCategory::Community),
            other => Err(Error::InvalidReference(format!(
                "unknown folder category '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Active folder pointer
// ---------------------------------------------------------------------------

/// The `activeFolder` record embedded in a user document, as stored.
///
/// Kept loose on purpose: the category is a free string and the index may be
/// absent. [`ActiveFolder::try_from`] turns it into the checked form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFolderDoc {
    pub folder_id: Option<String>,
    pub folder_category: Option<String>,
    pub active_folder_item_idx: Option<i64>,
}

/// A user's pointer to the folder and position they are currently viewing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFolder {
    pub folder_id: FolderId,
    pub folder_category: FolderCategory,
    /// `None` means the pointer exists but no position was ever selected.
    pub active_folder_item_idx: Option<i64>,
}

impl ActiveFolder {
    /// The folder this pointer refers to, without the cursor.
    pub fn folder_ref(&self) -> FolderRef {
        FolderRef {
            folder_id: self.folder_id.clone(),
            category: self.folder_category,
        }
    }
}

impl TryFrom<ActiveFolderDoc> for ActiveFolder {
    type Error = Error;

    fn try_from(doc: ActiveFolderDoc) -> Result<Self> {
        let folder_id = doc
            .folder_id
            .ok_or_else(|| Error::InvalidReference("active folder has no folderId".into()))?
            .parse()
            .map_err(|e: Error| Error::InvalidReference(e.to_string()))?;
        let folder_category = doc
            .folder_category
            .ok_or_else(|| Error::InvalidReference("active folder has no folderCategory".into()))?
            .parse()?;
        Ok(Self {
            folder_id,
            folder_category,
            active_folder_item_idx: doc.active_folder_item_idx,
        })
    }
}

/// A folder address: id plus the category that decides its collection path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderRef {
    pub folder_id: FolderId,
    pub category: FolderCategory,
}

// ---------------------------------------------------------------------------
// Cursor updates
// ---------------------------------------------------------------------------

/// A change to a cursor: relative or absolute, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CursorUpdate {
    Shift(i64),
    SetTo(i64),
}

impl CursorUpdate {
    /// Build an update from two optional inputs. `set_to` wins when both are
    /// present.
    pub fn from_parts(delta: Option<i64>, set_to: Option<i64>) -> Result<Self> {
        match (delta, set_to) {
            (_, Some(value)) => Ok(CursorUpdate::SetTo(value)),
            (Some(delta), None) => Ok(CursorUpdate::Shift(delta)),
            (None, None) => Err(Error::Validation(
                "cursor update needs either delta or setTo".into(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Folder items
// ---------------------------------------------------------------------------

/// Decode a field as `T`, or `None` when it has any other shape. One badly
/// typed item must not make its folder unreadable.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Image reference stored on an item. Both fields are optional in storage;
/// the caption transformer rejects an image missing either one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default, deserialize_with = "lenient")]
    pub secure_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub height: Option<f64>,
}

/// One entry of a folder's `items` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderItem {
    pub id: ItemId,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<ImageRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Any other fields on the document, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FolderItem {
    /// Build an item from its document id and stored body.
    pub fn from_document(id: ItemId, data: serde_json::Value) -> Result<Self> {
        let mut data = match data {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(Error::Internal(format!(
                    "item {id} is not an object: {other}"
                )))
            }
        };
        data.insert("id".into(), serde_json::Value::String(id.to_string()));
        serde_json::from_value(serde_json::Value::Object(data))
            .map_err(|e| Error::Internal(format!("item {id} failed to decode: {e}")))
    }
}

// ---------------------------------------------------------------------------
// ActiveItem
// ---------------------------------------------------------------------------

/// The item a user is currently viewing, with everything a caller needs to
/// render it and to issue later cursor shifts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveItem {
    pub item: FolderItem,
    pub category: FolderCategory,
    /// The index actually used, after wrap-around.
    pub index: i64,
    pub item_count: usize,
    pub folder_id: FolderId,
}
