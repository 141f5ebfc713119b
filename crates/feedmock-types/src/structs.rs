//! Record structs served over REST and the live feed.
//!
//! The same serde type is used for the REST representation and the
//! `WebSocket` frame of a record, so both encodings of one photo are
//! byte-for-byte identical.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AnimalKind, Sex};
use crate::ids::AnimalId;

// ---------------------------------------------------------------------------
// Picshare
// ---------------------------------------------------------------------------

/// A single photo in a picshare feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Photo {
    /// Fixture-assigned photo number.
    pub id: u32,
    /// Absolute image URL.
    pub url: String,
    /// Caption shown under the photo.
    pub caption: String,
    /// Whether the viewing account has liked the photo.
    pub liked: bool,
    /// Comment bodies in posting order.
    pub comments: Vec<String>,
    /// Owner of the photo.
    pub username: String,
}

/// The signed-in picshare account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Account {
    /// Display name.
    pub name: String,
    /// Handle, also used as the photo owner key.
    pub username: String,
    /// Free-form profile text.
    pub bio: String,
    /// Absolute avatar image URL.
    pub avatar_url: String,
}

// ---------------------------------------------------------------------------
// Animals
// ---------------------------------------------------------------------------

/// A synthetic animal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Animal {
    /// Dog or cat.
    #[serde(rename = "type")]
    pub kind: AnimalKind,
    /// Identifier unique within any generated batch.
    pub id: AnimalId,
    /// Name drawn from the kind's name pool.
    pub name: String,
    /// Breed drawn from the kind's breed pool.
    pub breed: String,
    /// Male or female.
    pub sex: Sex,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn account_uses_camel_case_avatar() {
        let account = Account {
            name: String::from("Jeremy"),
            username: String::from("jfairbank"),
            bio: String::from("Elm fan"),
            avatar_url: String::from("https://example.com/avatar.png"),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["avatarUrl"], "https://example.com/avatar.png");
        assert!(json.get("avatar_url").is_none());
    }

    #[test]
    fn animal_kind_is_serialized_as_type() {
        let animal = Animal {
            kind: AnimalKind::Dog,
            id: AnimalId::new(),
            name: String::from("Tucker"),
            breed: String::from("Beagle"),
            sex: Sex::Male,
        };
        let json = serde_json::to_value(&animal).unwrap();
        assert_eq!(json["type"], "dog");
        assert_eq!(json["sex"], "Male");
        assert!(json["id"].as_str().is_some_and(|id| !id.is_empty()));
    }
}
