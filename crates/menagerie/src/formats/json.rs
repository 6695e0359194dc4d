use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::info;

use super::{FormatAdapter, decode_dataset, require_artifacts};
use crate::errors::{FormatError, MalformedRecordError};
use crate::models::{Dataset, FieldValue, Record, Table};

const INDENT: &[u8] = b"    ";

/// One JSON array of objects per table, four-space indented, UTF-8 unescaped.
///
/// Integer fields are written as JSON numbers; on import both numbers and
/// numeric strings are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl JsonFormat {
    pub fn artifact_path(&self, dir: &Path, table: Table) -> PathBuf {
        dir.join(format!("{}.json", table.file_stem()))
    }

    fn write_table(&self, path: &Path, records: &[Record]) -> Result<(), FormatError> {
        let writer = BufWriter::new(File::create(path)?);
        let mut serializer =
            serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
        records.serialize(&mut serializer)?;

        let mut writer = serializer.into_inner();
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn read_table(&self, path: &Path, table: Table) -> Result<Vec<Record>, FormatError> {
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Err(FormatError::EmptyArtifact {
                table,
                path: path.to_path_buf(),
            });
        }

        let rows: Vec<Map<String, Value>> = serde_json::from_str(&contents)?;
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| {
                object_to_record(table, row).map_err(|source| FormatError::Malformed {
                    table,
                    row: index + 1,
                    source,
                })
            })
            .collect()
    }
}

fn object_to_record(table: Table, row: Map<String, Value>) -> Result<Record, MalformedRecordError> {
    row.into_iter()
        .map(|(field, value)| {
            let value = match value {
                Value::String(s) => FieldValue::Text(s),
                Value::Number(n) => match n.as_i64() {
                    Some(v) => FieldValue::Integer(v),
                    None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
                },
                other => {
                    return Err(MalformedRecordError::UnsupportedValue {
                        entity: table.entity_name(),
                        field,
                        kind: json_kind(&other),
                    });
                }
            };
            Ok((field, value))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl FormatAdapter for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn export(&self, dataset: &Dataset, destination: &Path) -> Result<Vec<PathBuf>, FormatError> {
        std::fs::create_dir_all(destination)?;

        let mut written = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            let path = self.artifact_path(destination, table);
            self.write_table(&path, &dataset.records(table))?;
            info!(
                table = %table,
                rows = dataset.len(table),
                path = %path.display(),
                "Exported json table"
            );
            written.push(path);
        }

        Ok(written)
    }

    fn import(&self, source: &Path) -> Result<Dataset, FormatError> {
        let artifacts: Vec<(Table, PathBuf)> = Table::ALL
            .into_iter()
            .map(|table| (table, self.artifact_path(source, table)))
            .collect();
        require_artifacts(&artifacts)?;

        let persons = self.read_table(&artifacts[0].1, Table::Persons)?;
        let pets = self.read_table(&artifacts[1].1, Table::Pets)?;
        let occupations = self.read_table(&artifacts[2].1, Table::Occupations)?;

        let dataset = decode_dataset(&persons, &pets, &occupations)?;
        info!(
            persons = dataset.persons.len(),
            pets = dataset.pets.len(),
            occupations = dataset.occupations.len(),
            "Imported json dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::test_support::tricky_dataset;

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = tricky_dataset();

        JsonFormat.export(&dataset, dir.path()).unwrap();
        assert_eq!(JsonFormat.import(dir.path()).unwrap(), dataset);
    }

    #[test]
    fn test_json_layout() {
        let dir = tempfile::tempdir().unwrap();
        JsonFormat.export(&tricky_dataset(), dir.path()).unwrap();

        let persons = std::fs::read_to_string(dir.path().join("persons.json")).unwrap();
        // non-ASCII stays literal
        assert!(persons.contains("Søren Ågård"));
        assert!(persons.starts_with("[\n    {\n        \"person_id\": 0,"));

        let pets = std::fs::read_to_string(dir.path().join("pets.json")).unwrap();
        let first = pets.find("\"pet_id\"").unwrap();
        let second = pets.find("\"owner_id\"").unwrap();
        let third = pets.find("\"pet_name\"").unwrap();
        let fourth = pets.find("\"species\"").unwrap();
        assert!(first < second && second < third && third < fourth);
    }

    #[test]
    fn test_integer_fields_as_strings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("persons.json"),
            r#"[{"person_id": "4", "full_name": "Ada", "address": "Here"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("pets.json"), "[]").unwrap();
        std::fs::write(dir.path().join("occupations.json"), "[]").unwrap();

        let dataset = JsonFormat.import(dir.path()).unwrap();
        assert_eq!(dataset.persons[0].person_id, 4);
    }

    #[test]
    fn test_null_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("persons.json"),
            r#"[{"person_id": null, "full_name": "Ada", "address": "Here"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("pets.json"), "[]").unwrap();
        std::fs::write(dir.path().join("occupations.json"), "[]").unwrap();

        let err = JsonFormat.import(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            FormatError::Malformed {
                table: Table::Persons,
                row: 1,
                source: MalformedRecordError::UnsupportedValue { kind: "null", .. },
            }
        ));
    }

    #[test]
    fn test_missing_and_empty_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        JsonFormat.export(&tricky_dataset(), dir.path()).unwrap();

        std::fs::write(dir.path().join("pets.json"), "  \n").unwrap();
        assert!(matches!(
            JsonFormat.import(dir.path()),
            Err(FormatError::EmptyArtifact {
                table: Table::Pets,
                ..
            })
        ));

        std::fs::remove_file(dir.path().join("persons.json")).unwrap();
        assert!(matches!(
            JsonFormat.import(dir.path()),
            Err(FormatError::MissingArtifact {
                table: Table::Persons,
                ..
            })
        ));
    }
}
