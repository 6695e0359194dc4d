//! Fake-data sources for the text fields of generated records.
//!
//! The generator only asks a [`FakeSource`] for strings; structural choices
//! (counts, species) come from its own rng. [`FakerSource`] is the production
//! source built on the `fake` crate.

use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::job::en::Title;
use fake::faker::name::en::{FirstName, Name};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplier of realistic text values.
pub trait FakeSource {
    fn name(&mut self) -> String;
    fn address(&mut self) -> String;
    fn first_name(&mut self) -> String;
    fn job(&mut self) -> String;
    fn company(&mut self) -> String;
}

/// English-locale fake data drawn from `rng`.
#[derive(Debug, Clone)]
pub struct FakerSource<R: Rng> {
    rng: R,
}

impl<R: Rng> FakerSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl FakerSource<StdRng> {
    /// Reproducible source for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> FakeSource for FakerSource<R> {
    fn name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    /// Street address, city, state and zip joined with ", ".
    fn address(&mut self) -> String {
        let number: String = BuildingNumber().fake_with_rng(&mut self.rng);
        let street: String = StreetName().fake_with_rng(&mut self.rng);
        let city: String = CityName().fake_with_rng(&mut self.rng);
        let state: String = StateAbbr().fake_with_rng(&mut self.rng);
        let zip: String = ZipCode().fake_with_rng(&mut self.rng);
        format!("{number} {street}, {city}, {state} {zip}")
    }

    fn first_name(&mut self) -> String {
        FirstName().fake_with_rng(&mut self.rng)
    }

    fn job(&mut self) -> String {
        Title().fake_with_rng(&mut self.rng)
    }

    fn company(&mut self) -> String {
        CompanyName().fake_with_rng(&mut self.rng)
    }
}
