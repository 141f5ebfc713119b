//! Fixture data: the photo feeds, the account, and the animal pools.
//!
//! Fixtures are loaded once at startup, either from the copies compiled
//! into the binary or from a directory holding files of the same names,
//! and are never mutated afterwards. Everything else borrows them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use feedmock_types::{Account, AnimalKind, Photo};
use serde::Deserialize;
use tracing::info;

/// File name of the picshare fixture.
pub const PICSHARE_FILE: &str = "picshare.json";
/// File name of the dog name pool.
pub const DOG_NAMES_FILE: &str = "dog-names.json";
/// File name of the cat name pool.
pub const CAT_NAMES_FILE: &str = "cat-names.json";
/// File name of the dog breed pool.
pub const DOG_BREEDS_FILE: &str = "dog-breeds.json";
/// File name of the cat breed pool.
pub const CAT_BREEDS_FILE: &str = "cat-breeds.json";

const EMBEDDED_PICSHARE: &str = include_str!("../fixtures/picshare.json");
const EMBEDDED_DOG_NAMES: &str = include_str!("../fixtures/dog-names.json");
const EMBEDDED_CAT_NAMES: &str = include_str!("../fixtures/cat-names.json");
const EMBEDDED_DOG_BREEDS: &str = include_str!("../fixtures/dog-breeds.json");
const EMBEDDED_CAT_BREEDS: &str = include_str!("../fixtures/cat-breeds.json");

/// Errors that can occur while loading fixtures.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// A fixture file could not be read.
    #[error("failed to read fixture {}: {source}", path.display())]
    Io {
        /// Path of the file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A fixture file is not valid JSON of the expected shape.
    #[error("failed to parse fixture {name}: {source}")]
    Json {
        /// Fixture file name.
        name: &'static str,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A pool that must have entries is empty.
    #[error("fixture pool {0} is empty")]
    EmptyPool(&'static str),

    /// A name pool lists the same name twice.
    #[error("fixture pool {pool} lists {name:?} more than once")]
    DuplicateName {
        /// Fixture file name.
        pool: &'static str,
        /// The repeated name.
        name: String,
    },
}

/// The picshare fixture file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PicshareFixture {
    /// The signed-in account.
    pub account: Account,
    /// Photos returned by `GET /feed`.
    pub feed: Vec<Photo>,
    /// Item pool streamed over the live feed.
    #[serde(rename = "wsFeed")]
    pub ws_feed: Vec<Photo>,
    /// Deliberately malformed photos, kept as raw JSON.
    #[serde(rename = "badfeed")]
    pub bad_feed: Vec<serde_json::Value>,
}

/// All fixture data, immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixtures {
    /// Photo feeds and account.
    pub picshare: PicshareFixture,
    /// Dog name pool.
    pub dog_names: Vec<String>,
    /// Cat name pool.
    pub cat_names: Vec<String>,
    /// Dog breed pool.
    pub dog_breeds: Vec<String>,
    /// Cat breed pool.
    pub cat_breeds: Vec<String>,
}

impl Fixtures {
    /// Load the fixtures compiled into the binary.
    pub fn embedded() -> Result<Self, FixtureError> {
        Self::from_sources(
            EMBEDDED_PICSHARE,
            EMBEDDED_DOG_NAMES,
            EMBEDDED_CAT_NAMES,
            EMBEDDED_DOG_BREEDS,
            EMBEDDED_CAT_BREEDS,
        )
    }

    /// Load fixtures from `dir`, which must contain all five files.
    pub fn from_dir(dir: &Path) -> Result<Self, FixtureError> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| FixtureError::Io { path, source })
        };

        let fixtures = Self::from_sources(
            &read(PICSHARE_FILE)?,
            &read(DOG_NAMES_FILE)?,
            &read(CAT_NAMES_FILE)?,
            &read(DOG_BREEDS_FILE)?,
            &read(CAT_BREEDS_FILE)?,
        )?;
        info!(dir = %dir.display(), "fixtures loaded from directory");
        Ok(fixtures)
    }

    fn from_sources(
        picshare: &str,
        dog_names: &str,
        cat_names: &str,
        dog_breeds: &str,
        cat_breeds: &str,
    ) -> Result<Self, FixtureError> {
        let fixtures = Self {
            picshare: parse(PICSHARE_FILE, picshare)?,
            dog_names: parse(DOG_NAMES_FILE, dog_names)?,
            cat_names: parse(CAT_NAMES_FILE, cat_names)?,
            dog_breeds: parse(DOG_BREEDS_FILE, dog_breeds)?,
            cat_breeds: parse(CAT_BREEDS_FILE, cat_breeds)?,
        };
        fixtures.validate()?;
        Ok(fixtures)
    }

    /// Check that every sampled pool is non-empty and name pools hold
    /// no duplicates.
    pub fn validate(&self) -> Result<(), FixtureError> {
        for (pool, values) in [
            (DOG_NAMES_FILE, &self.dog_names),
            (CAT_NAMES_FILE, &self.cat_names),
            (DOG_BREEDS_FILE, &self.dog_breeds),
            (CAT_BREEDS_FILE, &self.cat_breeds),
        ] {
            if values.is_empty() {
                return Err(FixtureError::EmptyPool(pool));
            }
        }

        for (pool, names) in [(DOG_NAMES_FILE, &self.dog_names), (CAT_NAMES_FILE, &self.cat_names)] {
            let mut seen = BTreeSet::new();
            if let Some(name) = names.iter().find(|name| !seen.insert(name.as_str())) {
                return Err(FixtureError::DuplicateName {
                    pool,
                    name: name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Name pool for `kind`.
    pub fn names(&self, kind: AnimalKind) -> &[String] {
        match kind {
            AnimalKind::Dog => &self.dog_names,
            AnimalKind::Cat => &self.cat_names,
        }
    }

    /// Breed pool for `kind`.
    pub fn breeds(&self, kind: AnimalKind) -> &[String] {
        match kind {
            AnimalKind::Dog => &self.dog_breeds,
            AnimalKind::Cat => &self.cat_breeds,
        }
    }

    /// Photos owned by `username`, from the static feed followed by the
    /// live feed pool, in fixture order.
    pub fn user_feed(&self, username: &str) -> Vec<&Photo> {
        self.picshare
            .feed
            .iter()
            .chain(&self.picshare.ws_feed)
            .filter(|photo| photo.username == username)
            .collect()
    }

    /// Size of a unique batch: every dog name plus every cat name.
    pub fn unique_batch_len(&self) -> usize {
        self.dog_names.len().saturating_add(self.cat_names.len())
    }
}

fn parse<T: serde::de::DeserializeOwned>(name: &'static str, raw: &str) -> Result<T, FixtureError> {
    serde_json::from_str(raw).map_err(|source| FixtureError::Json { name, source })
}
