//! Enumeration types shared by the generator and the HTTP layer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The category of a generated animal.
///
/// Serialized in lowercase (`"dog"`, `"cat"`) to match what the
/// front-end decoders expect in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AnimalKind {
    /// A dog, named from the dog name pool.
    Dog,
    /// A cat, named from the cat name pool.
    Cat,
}

impl AnimalKind {
    /// Every kind, in the order unique batches enumerate them.
    pub const ALL: [Self; 2] = [Self::Dog, Self::Cat];
}

impl core::fmt::Display for AnimalKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Dog => write!(f, "dog"),
            Self::Cat => write!(f, "cat"),
        }
    }
}

/// Sex of a generated animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Sex {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Sex {
    /// The full sex pool the generator samples from.
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];
}

impl core::fmt::Display for Sex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&AnimalKind::Cat).unwrap();
        assert_eq!(json, "\"cat\"");
    }

    #[test]
    fn sex_serializes_capitalized() {
        let json = serde_json::to_string(&Sex::Female).unwrap();
        assert_eq!(json, "\"Female\"");
    }
}
