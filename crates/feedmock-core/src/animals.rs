//! Synthetic animal records.
//!
//! [`AnimalGenerator`] composes independent [`UniqueSampler`]s (kind,
//! name, breed, sex) over the fixture pools. Single draws cycle through
//! each pool without immediate repeats; a unique batch enumerates every
//! name of every kind exactly once.

use feedmock_types::{Animal, AnimalId, AnimalKind, Sex};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::error::FeedError;
use crate::fixtures::Fixtures;
use crate::sampler::UniqueSampler;

/// Generator of synthetic animals backed by borrowed fixture pools.
#[derive(Debug)]
pub struct AnimalGenerator<'a> {
    fixtures: &'a Fixtures,
    kinds: UniqueSampler<'static, AnimalKind>,
    sexes: UniqueSampler<'static, Sex>,
    dog_names: UniqueSampler<'a, String>,
    cat_names: UniqueSampler<'a, String>,
    dog_breeds: UniqueSampler<'a, String>,
    cat_breeds: UniqueSampler<'a, String>,
    rng: SmallRng,
}

impl<'a> AnimalGenerator<'a> {
    /// Create a generator seeded from the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidArgument`] if any pool is empty.
    pub fn new(fixtures: &'a Fixtures) -> Result<Self, FeedError> {
        Self::with_rng(fixtures, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Create a generator driven by `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidArgument`] if any pool is empty.
    pub fn with_rng(fixtures: &'a Fixtures, rng: SmallRng) -> Result<Self, FeedError> {
        Ok(Self {
            fixtures,
            kinds: UniqueSampler::new(&AnimalKind::ALL)?,
            sexes: UniqueSampler::new(&Sex::ALL)?,
            dog_names: UniqueSampler::new(&fixtures.dog_names)?,
            cat_names: UniqueSampler::new(&fixtures.cat_names)?,
            dog_breeds: UniqueSampler::new(&fixtures.dog_breeds)?,
            cat_breeds: UniqueSampler::new(&fixtures.cat_breeds)?,
            rng,
        })
    }

    /// One random animal. Kinds alternate between consecutive calls.
    pub fn random(&mut self) -> Animal {
        let kind = *self.kinds.draw(&mut self.rng);
        let name = match kind {
            AnimalKind::Dog => self.dog_names.draw(&mut self.rng),
            AnimalKind::Cat => self.cat_names.draw(&mut self.rng),
        };
        self.build(kind, name)
    }

    /// `len` random animals. Only the ids are guaranteed unique.
    pub fn random_list(&mut self, len: usize) -> Vec<Animal> {
        (0..len).map(|_| self.random()).collect()
    }

    /// Every dog name and every cat name exactly once, each paired with a
    /// random breed and sex. Names are visited in random order per kind.
    pub fn all_unique(&mut self) -> Result<Vec<Animal>, FeedError> {
        let fixtures = self.fixtures;
        let mut animals = Vec::with_capacity(fixtures.unique_batch_len());

        for kind in AnimalKind::ALL {
            for name in UniqueSampler::exhaust(fixtures.names(kind), &mut self.rng)? {
                animals.push(self.build(kind, name));
            }
        }

        Ok(animals)
    }

    fn build(&mut self, kind: AnimalKind, name: &str) -> Animal {
        let breed = match kind {
            AnimalKind::Dog => self.dog_breeds.draw(&mut self.rng),
            AnimalKind::Cat => self.cat_breeds.draw(&mut self.rng),
        };
        Animal {
            kind,
            id: AnimalId::new(),
            name: name.to_owned(),
            breed: breed.clone(),
            sex: *self.sexes.draw(&mut self.rng),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn generator(fixtures: &Fixtures, seed: u64) -> AnimalGenerator<'_> {
        AnimalGenerator::with_rng(fixtures, SmallRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn random_list_has_requested_len_and_unique_ids() {
        let fixtures = Fixtures::embedded().unwrap();
        let animals = generator(&fixtures, 1).random_list(300);

        assert_eq!(animals.len(), 300);
        let ids: BTreeSet<AnimalId> = animals.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 300);
    }

    #[test]
    fn random_animals_use_their_kinds_pools() {
        let fixtures = Fixtures::embedded().unwrap();
        for animal in generator(&fixtures, 2).random_list(200) {
            assert!(fixtures.names(animal.kind).contains(&animal.name));
            assert!(fixtures.breeds(animal.kind).contains(&animal.breed));
        }
    }

    #[test]
    fn consecutive_kinds_and_sexes_alternate() {
        let fixtures = Fixtures::embedded().unwrap();
        let animals = generator(&fixtures, 3).random_list(50);
        for pair in animals.windows(2) {
            if let [a, b] = pair {
                assert_ne!(a.kind, b.kind);
            }
        }
    }

    #[test]
    fn unique_batch_covers_every_name_once() {
        let fixtures = Fixtures::embedded().unwrap();
        let animals = generator(&fixtures, 4).all_unique().unwrap();

        assert_eq!(animals.len(), fixtures.dog_names.len() + fixtures.cat_names.len());
        assert_eq!(animals.len(), fixtures.unique_batch_len());

        let pairs: BTreeSet<(AnimalKind, &str)> =
            animals.iter().map(|a| (a.kind, a.name.as_str())).collect();
        assert_eq!(pairs.len(), animals.len());

        let ids: BTreeSet<AnimalId> = animals.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), animals.len());
    }

    #[test]
    fn unique_batch_lists_dogs_before_cats() {
        let fixtures = Fixtures::embedded().unwrap();
        let animals = generator(&fixtures, 5).all_unique().unwrap();
        let dogs = fixtures.dog_names.len();

        assert!(animals.iter().take(dogs).all(|a| a.kind == AnimalKind::Dog));
        assert!(animals.iter().skip(dogs).all(|a| a.kind == AnimalKind::Cat));
    }

    #[test]
    fn empty_breed_pool_fails_construction() {
        let mut fixtures = Fixtures::embedded().unwrap();
        fixtures.cat_breeds.clear();
        let err = AnimalGenerator::with_rng(&fixtures, SmallRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, FeedError::InvalidArgument(_)));
    }
}
