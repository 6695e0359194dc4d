//! Aggregate views derived from a persisted dataset.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::models::{Occupation, Person, Pet, Species};

/// Pets owned by one person. Persons without pets report zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetCount {
    pub person_id: i64,
    pub full_name: String,
    pub pet_count: usize,
}

/// How often a value occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency<T> {
    pub value: T,
    pub count: usize,
}

/// Occupation and pet counts for one person id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonActivity {
    pub person_id: i64,
    pub occupation_count: usize,
    pub pet_count: usize,
}

fn count_by<K: Eq + Hash>(keys: impl Iterator<Item = K>) -> HashMap<K, usize> {
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Counts values, most frequent first. Ties keep first-seen order.
fn ranked<T: Eq + Hash + Clone>(values: impl Iterator<Item = T>) -> Vec<Frequency<T>> {
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut frequencies: Vec<Frequency<T>> = Vec::new();

    for value in values {
        match index.get(&value).copied() {
            Some(i) => frequencies[i].count += 1,
            None => {
                index.insert(value.clone(), frequencies.len());
                frequencies.push(Frequency { value, count: 1 });
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));
    frequencies
}

/// Left join of persons with their pet counts, in person order.
pub fn pets_per_person(persons: &[Person], pets: &[Pet]) -> Vec<PetCount> {
    let counts = count_by(pets.iter().map(|pet| pet.owner_id));

    persons
        .iter()
        .map(|person| PetCount {
            person_id: person.person_id,
            full_name: person.full_name.clone(),
            pet_count: counts.get(&person.person_id).copied().unwrap_or(0),
        })
        .collect()
}

/// Frequency of each species among the pets.
pub fn species_distribution(pets: &[Pet]) -> Vec<Frequency<Species>> {
    ranked(pets.iter().map(|pet| pet.species))
}

/// Outer join of per-person pet and occupation counts, ordered by person id.
///
/// Only ids that own a pet or hold an occupation appear; a missing side counts as zero.
pub fn pets_vs_occupations(pets: &[Pet], occupations: &[Occupation]) -> Vec<PersonActivity> {
    let mut joined: BTreeMap<i64, PersonActivity> = BTreeMap::new();

    for pet in pets {
        joined
            .entry(pet.owner_id)
            .or_insert_with(|| PersonActivity::empty(pet.owner_id))
            .pet_count += 1;
    }
    for occupation in occupations {
        joined
            .entry(occupation.person_id)
            .or_insert_with(|| PersonActivity::empty(occupation.person_id))
            .occupation_count += 1;
    }

    joined.into_values().collect()
}

impl PersonActivity {
    fn empty(person_id: i64) -> Self {
        Self {
            person_id,
            occupation_count: 0,
            pet_count: 0,
        }
    }
}

/// The `limit` most common pet names.
pub fn popular_pet_names(pets: &[Pet], limit: usize) -> Vec<Frequency<String>> {
    let mut names = ranked(pets.iter().map(|pet| pet.pet_name.clone()));
    names.truncate(limit);
    names
}
