//! Record model for the menagerie dataset.
//!
//! Three flat entities linked by person id:
//! - [`Person`]: keyed by a dense integer id
//! - [`Pet`]: owned by a person through `owner_id`
//! - [`Occupation`]: held by a person through `person_id`
//!
//! Every entity maps to an order-preserving [`Record`] and back through the
//! [`Entity`] trait. Decoding is typed per field: integer fields accept integer,
//! integral float and integer-looking text values, text fields accept text.

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::errors::MalformedRecordError;

/// The three logical tables of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Persons,
    Pets,
    Occupations,
}

impl Table {
    /// All tables, parents before children.
    pub const ALL: [Table; 3] = [Table::Persons, Table::Pets, Table::Occupations];

    /// Sheet and relational table name.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Table::Persons => "Persons",
            Table::Pets => "Pets",
            Table::Occupations => "Occupations",
        }
    }

    /// File stem used by the one-artifact-per-table formats.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Table::Persons => "persons",
            Table::Pets => "pets",
            Table::Occupations => "occupations",
        }
    }

    pub fn entity_name(&self) -> &'static str {
        match self {
            Table::Persons => Person::ENTITY,
            Table::Pets => Pet::ENTITY,
            Table::Occupations => Occupation::ENTITY,
        }
    }

    /// Field names in declared order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Table::Persons => Person::FIELDS,
            Table::Pets => Pet::FIELDS,
            Table::Occupations => Occupation::FIELDS,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// A single field value as it travels through a format.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Returns the value as an integer if it represents one exactly.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            FieldValue::Float(v) => integral_float(*v),
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_float))
            }
        }
    }

    /// Canonical text form of the value.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Integer(v) => v.to_string(),
            FieldValue::Float(v) => v.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

fn integral_float(v: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Integer(v) => serializer.serialize_i64(*v),
            FieldValue::Float(v) => serializer.serialize_f64(*v),
            FieldValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Flat, order-preserving key/value view of an entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, keeping insertion order.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Looks up a field by name. The first occurrence wins.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn require(
        &self,
        entity: &'static str,
        field: &'static str,
    ) -> Result<&FieldValue, MalformedRecordError> {
        self.get(field)
            .ok_or(MalformedRecordError::MissingField { entity, field })
    }

    fn integer(
        &self,
        entity: &'static str,
        field: &'static str,
    ) -> Result<i64, MalformedRecordError> {
        let value = self.require(entity, field)?;
        value
            .as_integer()
            .ok_or_else(|| MalformedRecordError::InvalidInteger {
                entity,
                field,
                value: value.to_text(),
            })
    }

    fn text(
        &self,
        entity: &'static str,
        field: &'static str,
    ) -> Result<String, MalformedRecordError> {
        self.require(entity, field).map(FieldValue::to_text)
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Shared contract of the three entity types.
pub trait Entity: Sized {
    const ENTITY: &'static str;
    const TABLE: Table;
    /// Field names in declared order; `to_record` emits exactly these.
    const FIELDS: &'static [&'static str];

    fn to_record(&self) -> Record;

    fn from_record(record: &Record) -> Result<Self, MalformedRecordError>;
}

/// Pet species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rabbit,
}

impl Species {
    pub const ALL: [Species; 4] = [Species::Dog, Species::Cat, Species::Bird, Species::Rabbit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "Dog",
            Species::Cat => "Cat",
            Species::Bird => "Bird",
            Species::Rabbit => "Rabbit",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = MalformedRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|species| species.as_str() == s)
            .ok_or_else(|| MalformedRecordError::UnknownSpecies(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub person_id: i64,
    pub full_name: String,
    pub address: String,
}

impl Entity for Person {
    const ENTITY: &'static str = "Person";
    const TABLE: Table = Table::Persons;
    const FIELDS: &'static [&'static str] = &["person_id", "full_name", "address"];

    fn to_record(&self) -> Record {
        Record::new()
            .with("person_id", self.person_id)
            .with("full_name", self.full_name.as_str())
            .with("address", self.address.as_str())
    }

    fn from_record(record: &Record) -> Result<Self, MalformedRecordError> {
        Ok(Self {
            person_id: record.integer(Self::ENTITY, "person_id")?,
            full_name: record.text(Self::ENTITY, "full_name")?,
            address: record.text(Self::ENTITY, "address")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pet {
    /// Composite `{owner_index}_{pet_index}` key.
    pub pet_id: String,
    pub owner_id: i64,
    pub pet_name: String,
    pub species: Species,
}

impl Entity for Pet {
    const ENTITY: &'static str = "Pet";
    const TABLE: Table = Table::Pets;
    const FIELDS: &'static [&'static str] = &["pet_id", "owner_id", "pet_name", "species"];

    fn to_record(&self) -> Record {
        Record::new()
            .with("pet_id", self.pet_id.as_str())
            .with("owner_id", self.owner_id)
            .with("pet_name", self.pet_name.as_str())
            .with("species", self.species.as_str())
    }

    fn from_record(record: &Record) -> Result<Self, MalformedRecordError> {
        Ok(Self {
            pet_id: record.text(Self::ENTITY, "pet_id")?,
            owner_id: record.integer(Self::ENTITY, "owner_id")?,
            pet_name: record.text(Self::ENTITY, "pet_name")?,
            species: record.text(Self::ENTITY, "species")?.parse()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupation {
    /// Composite `{person_index}_{occupation_index}` key.
    pub occupation_id: String,
    pub person_id: i64,
    pub occupation: String,
    pub company: String,
}

impl Entity for Occupation {
    const ENTITY: &'static str = "Occupation";
    const TABLE: Table = Table::Occupations;
    const FIELDS: &'static [&'static str] =
        &["occupation_id", "person_id", "occupation", "company"];

    fn to_record(&self) -> Record {
        Record::new()
            .with("occupation_id", self.occupation_id.as_str())
            .with("person_id", self.person_id)
            .with("occupation", self.occupation.as_str())
            .with("company", self.company.as_str())
    }

    fn from_record(record: &Record) -> Result<Self, MalformedRecordError> {
        Ok(Self {
            occupation_id: record.text(Self::ENTITY, "occupation_id")?,
            person_id: record.integer(Self::ENTITY, "person_id")?,
            occupation: record.text(Self::ENTITY, "occupation")?,
            company: record.text(Self::ENTITY, "company")?,
        })
    }
}

/// The three collections of one generated or imported batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    pub persons: Vec<Person>,
    pub pets: Vec<Pet>,
    pub occupations: Vec<Occupation>,
}

impl Dataset {
    pub fn new(persons: Vec<Person>, pets: Vec<Pet>, occupations: Vec<Occupation>) -> Self {
        Self {
            persons,
            pets,
            occupations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty() && self.pets.is_empty() && self.occupations.is_empty()
    }

    /// Row count of one table.
    pub fn len(&self, table: Table) -> usize {
        match table {
            Table::Persons => self.persons.len(),
            Table::Pets => self.pets.len(),
            Table::Occupations => self.occupations.len(),
        }
    }

    /// Records of one table, in collection order.
    pub fn records(&self, table: Table) -> Vec<Record> {
        match table {
            Table::Persons => self.persons.iter().map(Entity::to_record).collect(),
            Table::Pets => self.pets.iter().map(Entity::to_record).collect(),
            Table::Occupations => self.occupations.iter().map(Entity::to_record).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pet() -> Pet {
        Pet {
            pet_id: "3_1".to_string(),
            owner_id: 3,
            pet_name: "Biscuit".to_string(),
            species: Species::Rabbit,
        }
    }

    #[test]
    fn test_record_preserves_declared_order() {
        let record = sample_pet().to_record();
        let names: Vec<&str> = record.names().collect();
        assert_eq!(names, Pet::FIELDS);

        let occupation = Occupation {
            occupation_id: "0_0".to_string(),
            person_id: 0,
            occupation: "Florist".to_string(),
            company: "Bloom & Sons".to_string(),
        };
        let record = occupation.to_record();
        let names: Vec<&str> = record.names().collect();
        assert_eq!(names, Occupation::FIELDS);
    }

    #[test]
    fn test_round_trip_through_record() {
        let person = Person {
            person_id: 7,
            full_name: "Zoë Müller".to_string(),
            address: "12 Rue de l'Église, Lyon".to_string(),
        };
        assert_eq!(Person::from_record(&person.to_record()).unwrap(), person);

        let pet = sample_pet();
        assert_eq!(Pet::from_record(&pet.to_record()).unwrap(), pet);
    }

    #[test]
    fn test_integer_fields_accept_text_and_floats() {
        let record = Record::new()
            .with("person_id", " 42 ")
            .with("full_name", "Ada")
            .with("address", "Somewhere");
        assert_eq!(Person::from_record(&record).unwrap().person_id, 42);

        let record = Record::new()
            .with("pet_id", "1_0")
            .with("owner_id", 1.0)
            .with("pet_name", "Rex")
            .with("species", "Dog");
        assert_eq!(Pet::from_record(&record).unwrap().owner_id, 1);

        let record = Record::new()
            .with("occupation_id", "2_1")
            .with("person_id", "2.0")
            .with("occupation", "Baker")
            .with("company", "Crumbs");
        assert_eq!(Occupation::from_record(&record).unwrap().person_id, 2);
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let record = Record::new().with("person_id", 1_i64).with("full_name", "Ada");
        assert_eq!(
            Person::from_record(&record),
            Err(MalformedRecordError::MissingField {
                entity: "Person",
                field: "address",
            })
        );
    }

    #[test]
    fn test_non_integer_is_malformed() {
        let record = Record::new()
            .with("pet_id", "1_0")
            .with("owner_id", "one")
            .with("pet_name", "Rex")
            .with("species", "Dog");
        assert!(matches!(
            Pet::from_record(&record),
            Err(MalformedRecordError::InvalidInteger { field: "owner_id", .. })
        ));

        let record = Record::new()
            .with("pet_id", "1_0")
            .with("owner_id", 1.5)
            .with("pet_name", "Rex")
            .with("species", "Dog");
        assert!(Pet::from_record(&record).is_err());
    }

    #[test]
    fn test_unknown_species_is_malformed() {
        let record = Record::new()
            .with("pet_id", "1_0")
            .with("owner_id", 1_i64)
            .with("pet_name", "Nemo")
            .with("species", "Fish");
        assert_eq!(
            Pet::from_record(&record),
            Err(MalformedRecordError::UnknownSpecies("Fish".to_string()))
        );
    }

    #[test]
    fn test_text_fields_accept_numbers() {
        let record = Record::new()
            .with("person_id", 5_i64)
            .with("full_name", 1234_i64)
            .with("address", 10.5);
        let person = Person::from_record(&record).unwrap();
        assert_eq!(person.full_name, "1234");
        assert_eq!(person.address, "10.5");
    }

    #[test]
    fn test_dataset_records_per_table() {
        let dataset = Dataset::new(Vec::new(), vec![sample_pet()], Vec::new());
        assert_eq!(dataset.len(Table::Pets), 1);
        assert!(dataset.records(Table::Persons).is_empty());
        assert_eq!(dataset.records(Table::Pets)[0].get("owner_id"), Some(&FieldValue::Integer(3)));
        assert!(!dataset.is_empty());
    }
}
