//! Format adapters for persisting a [`Dataset`].
//!
//! Each adapter writes the three tables (Persons, Pets, Occupations) and reads
//! them back through the record model:
//! - [`DelimitedFormat`]: one delimited text file per table (CSV, TSV)
//! - [`JsonFormat`]: one JSON array per table
//! - [`XlsxFormat`]: one workbook with a sheet per table
//!
//! Imports check that every artifact exists before reading any of them, so a
//! missing table never produces a partially filled dataset.

mod delimited;
mod json;
mod xlsx;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use delimited::DelimitedFormat;
pub use json::JsonFormat;
pub use xlsx::{WORKBOOK_FILE, XlsxFormat};

use crate::errors::{FormatError, MalformedRecordError};
use crate::models::{Dataset, Entity, Record, Table};

/// Symmetric export/import pair for one on-disk representation.
pub trait FormatAdapter {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Writes the dataset into `destination`, creating the directory if needed.
    /// Returns the artifacts written.
    fn export(&self, dataset: &Dataset, destination: &Path) -> Result<Vec<PathBuf>, FormatError>;

    /// Reads a dataset previously written to `source`.
    fn import(&self, source: &Path) -> Result<Dataset, FormatError>;
}

/// Supported formats, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Tsv,
    Json,
    Xlsx,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Csv, Format::Tsv, Format::Json, Format::Xlsx];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Tsv => "tsv",
            Format::Json => "json",
            Format::Xlsx => "xlsx",
        }
    }

    pub fn adapter(&self) -> Box<dyn FormatAdapter> {
        match self {
            Format::Csv => Box::new(DelimitedFormat::csv()),
            Format::Tsv => Box::new(DelimitedFormat::tsv()),
            Format::Json => Box::new(JsonFormat),
            Format::Xlsx => Box::new(XlsxFormat),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Format::ALL
            .into_iter()
            .find(|format| format.as_str() == lowered)
            .ok_or_else(|| FormatError::UnknownFormat(s.to_string()))
    }
}

/// Fails with `MissingArtifact` on the first table whose artifact is absent.
pub(crate) fn require_artifacts(artifacts: &[(Table, PathBuf)]) -> Result<(), FormatError> {
    match artifacts.iter().find(|(_, path)| !path.is_file()) {
        Some((table, path)) => Err(FormatError::MissingArtifact {
            table: *table,
            path: path.clone(),
        }),
        None => Ok(()),
    }
}

/// Checks that a table header names every declared field.
pub(crate) fn check_header<'a>(
    table: Table,
    header: impl IntoIterator<Item = &'a str>,
) -> Result<(), FormatError> {
    let header: Vec<&str> = header.into_iter().collect();
    match table.fields().iter().find(|field| !header.contains(*field)) {
        Some(field) => Err(FormatError::MalformedHeader {
            table,
            source: MalformedRecordError::MissingField {
                entity: table.entity_name(),
                field: *field,
            },
        }),
        None => Ok(()),
    }
}

fn decode_rows<E: Entity>(records: &[Record]) -> Result<Vec<E>, FormatError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            E::from_record(record).map_err(|source| FormatError::Malformed {
                table: E::TABLE,
                row: index + 1,
                source,
            })
        })
        .collect()
}

/// Rebuilds a dataset from raw table records, keeping row order.
pub(crate) fn decode_dataset(
    persons: &[Record],
    pets: &[Record],
    occupations: &[Record],
) -> Result<Dataset, FormatError> {
    Ok(Dataset::new(
        decode_rows(persons)?,
        decode_rows(pets)?,
        decode_rows(occupations)?,
    ))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{Dataset, Occupation, Person, Pet, Species};

    /// Small dataset with values that stress quoting and encoding.
    pub fn tricky_dataset() -> Dataset {
        Dataset::new(
            vec![
                Person {
                    person_id: 0,
                    full_name: "Zoë \"Zed\" Okafor".to_string(),
                    address: "1 Quay St, Apt 3\nDublin".to_string(),
                },
                Person {
                    person_id: 1,
                    full_name: "Søren Ågård".to_string(),
                    address: "Tab\tSeparated Way, Aarhus".to_string(),
                },
            ],
            vec![
                Pet {
                    pet_id: "0_0".to_string(),
                    owner_id: 0,
                    pet_name: "Mochi".to_string(),
                    species: Species::Cat,
                },
                Pet {
                    pet_id: "0_1".to_string(),
                    owner_id: 0,
                    pet_name: "Kiwi, Jr.".to_string(),
                    species: Species::Bird,
                },
                Pet {
                    pet_id: "1_0".to_string(),
                    owner_id: 1,
                    pet_name: "Bjørn".to_string(),
                    species: Species::Dog,
                },
            ],
            vec![
                Occupation {
                    occupation_id: "0_0".to_string(),
                    person_id: 0,
                    occupation: "Ship's carpenter".to_string(),
                    company: "Harbour & Co".to_string(),
                },
                Occupation {
                    occupation_id: "1_0".to_string(),
                    person_id: 1,
                    occupation: "Baker".to_string(),
                    company: "Rugbrød ApS".to_string(),
                },
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<Format>().unwrap(), Format::Csv);
        assert_eq!(" xlsx ".parse::<Format>().unwrap(), Format::Xlsx);
        assert!(matches!(
            "parquet".parse::<Format>(),
            Err(FormatError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_check_header_reports_missing_field() {
        let err = check_header(Table::Pets, ["pet_id", "owner_id", "species"]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::MalformedHeader {
                table: Table::Pets,
                source: MalformedRecordError::MissingField {
                    field: "pet_name",
                    ..
                },
            }
        ));
        assert!(check_header(Table::Persons, ["address", "full_name", "person_id"]).is_ok());
    }

    #[test]
    fn test_decode_reports_row_number() {
        let good = crate::models::Record::new()
            .with("person_id", 0_i64)
            .with("full_name", "Ada")
            .with("address", "Here");
        let bad = crate::models::Record::new()
            .with("person_id", "zero")
            .with("full_name", "Bob")
            .with("address", "There");

        let err = decode_dataset(&[good, bad], &[], &[]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::Malformed {
                table: Table::Persons,
                row: 2,
                ..
            }
        ));
    }
}
