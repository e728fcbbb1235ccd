//! Typed ID wrappers providing compile-time safety for document identifiers.
//!
//! Document ids are opaque strings assigned by whoever created the document,
//! so each ID type is a newtype over `String` rather than a UUID. Wrapping
//! them prevents passing a `FolderId` where a `UserId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Generate a newtype ID wrapper over `String`.
///
/// The macro produces a struct with:
/// - `as_str()` borrowing the inner value
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Serialize`, `Deserialize`
/// - `Display` writing the raw id
/// - `FromStr` rejecting empty ids and ids containing `/` (they would
///   escape their collection when joined into a document path)
macro_rules! typed_id {
    ($($(#[doc = $doc:expr])* $name:ident => $entity:literal),+ $(,)?) => {
        $(
            $(#[doc = $doc])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(String);

            impl $name {
                /// Borrow the raw id.
                #[must_use]
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl FromStr for $name {
                type Err = Error;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    validate_segment($entity, s).map(|()| Self(s.to_string()))
                }
            }

            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }
        )+
    };
}

fn validate_segment(entity: &str, s: &str) -> crate::Result<()> {
    if s.is_empty() {
        return Err(Error::Validation(format!("{entity} id must not be empty")));
    }
    if s.contains('/') {
        return Err(Error::Validation(format!(
            "{entity} id must not contain '/': {s}"
        )));
    }
    Ok(())
}

typed_id! {
    /// Identifier of a user document (`users/{id}`).
    UserId => "user",
    /// Identifier of a personal or community folder document.
    FolderId => "folder",
    /// Identifier of an item inside a folder's `items` collection.
    ItemId => "item",
}
