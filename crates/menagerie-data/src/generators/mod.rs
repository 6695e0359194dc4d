//! Dataset generation.
//!
//! Person `i` gets id `i`, a name and an address, then a random number of pets
//! and occupations. The per-person call order on the [`FakeSource`] is fixed:
//! `name`, `address`, one `first_name` per pet, then `job` and `company` per
//! occupation. Counts and species come from the generator rng, so a scripted
//! source plus a seeded rng gives a fully deterministic dataset.

pub mod occupation;
pub mod person;
pub mod pet;

use menagerie::models::Dataset;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::info;

pub use occupation::generate_occupations;
pub use person::generate_person;
pub use pet::generate_pets;

use crate::config::GenerateConfig;
use crate::sources::{FakeSource, FakerSource};

/// Offset between the structural seed and the fake-data seed.
const FAKER_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Invalid range for {name}: min {min} is greater than max {max}")]
    InvalidRange {
        name: &'static str,
        min: usize,
        max: usize,
    },
}

/// Generates datasets shaped by a [`GenerateConfig`].
#[derive(Debug, Clone, Default)]
pub struct DatasetGenerator {
    config: GenerateConfig,
}

impl DatasetGenerator {
    /// Rejects inverted ranges up front.
    pub fn new(config: GenerateConfig) -> Result<Self, GenerateError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Generates `record_count` persons with their pets and occupations.
    pub fn generate(&self, source: &mut impl FakeSource, rng: &mut impl Rng) -> Dataset {
        let (min_pets, max_pets) = self.config.pets_per_person;
        let (min_jobs, max_jobs) = self.config.occupations_per_person;
        let mut dataset = Dataset::default();

        for index in 0..self.config.record_count {
            let person = generate_person(index, source);
            let person_id = person.person_id;

            let pet_count = rng.gen_range(min_pets..=max_pets);
            dataset
                .pets
                .extend(generate_pets(person_id, pet_count, source, rng));

            let occupation_count = rng.gen_range(min_jobs..=max_jobs);
            dataset
                .occupations
                .extend(generate_occupations(person_id, occupation_count, source));

            dataset.persons.push(person);
        }

        info!(
            persons = dataset.persons.len(),
            pets = dataset.pets.len(),
            occupations = dataset.occupations.len(),
            "Generated dataset"
        );
        dataset
    }

    /// Generates with the default fake-data source, seeded from the config when set.
    pub fn generate_default(&self) -> Dataset {
        match self.config.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut source = FakerSource::seeded(seed.wrapping_add(FAKER_SEED_OFFSET));
                self.generate(&mut source, &mut rng)
            }
            None => {
                let mut rng = StdRng::from_entropy();
                let mut source = FakerSource::from_entropy();
                self.generate(&mut source, &mut rng)
            }
        }
    }
}

/// `count` persons with the default pet and occupation ranges.
pub fn generate(count: usize, seed: Option<u64>) -> Dataset {
    let generator = DatasetGenerator {
        config: GenerateConfig {
            seed,
            ..GenerateConfig::with_count(count)
        },
    };
    generator.generate_default()
}
