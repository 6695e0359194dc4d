use std::path::{Path, PathBuf};

use tracing::info;

use super::{FormatAdapter, check_header, decode_dataset, require_artifacts};
use crate::errors::FormatError;
use crate::models::{Dataset, FieldValue, Record, Table};

/// One delimited text file per table, header row first, every field written as text.
#[derive(Debug, Clone, Copy)]
pub struct DelimitedFormat {
    delimiter: u8,
    extension: &'static str,
}

impl DelimitedFormat {
    pub const fn new(delimiter: u8, extension: &'static str) -> Self {
        Self {
            delimiter,
            extension,
        }
    }

    /// Comma separated, `.csv` artifacts.
    pub const fn csv() -> Self {
        Self::new(b',', "csv")
    }

    /// Tab separated, `.tsv` artifacts.
    pub const fn tsv() -> Self {
        Self::new(b'\t', "tsv")
    }

    pub fn artifact_path(&self, dir: &Path, table: Table) -> PathBuf {
        dir.join(format!("{}.{}", table.file_stem(), self.extension))
    }

    fn write_table(
        &self,
        path: &Path,
        table: Table,
        records: &[Record],
    ) -> Result<(), FormatError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(path)?;

        writer.write_record(table.fields())?;
        for record in records {
            writer.write_record(record.iter().map(|(_, value)| value.to_text()))?;
        }

        writer.flush()?;
        Ok(())
    }

    fn read_table(&self, path: &Path, table: Table) -> Result<Vec<Record>, FormatError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_path(path)?;

        let header = reader.headers()?.clone();
        if header.is_empty() || (header.len() == 1 && header[0].is_empty()) {
            return Err(FormatError::EmptyArtifact {
                table,
                path: path.to_path_buf(),
            });
        }
        check_header(table, header.iter())?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(
                header
                    .iter()
                    .zip(row.iter())
                    .map(|(name, value)| (name, FieldValue::Text(value.to_string())))
                    .collect(),
            );
        }

        Ok(records)
    }
}

impl Default for DelimitedFormat {
    fn default() -> Self {
        Self::csv()
    }
}

impl FormatAdapter for DelimitedFormat {
    fn name(&self) -> &'static str {
        self.extension
    }

    fn export(&self, dataset: &Dataset, destination: &Path) -> Result<Vec<PathBuf>, FormatError> {
        std::fs::create_dir_all(destination)?;

        let mut written = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            let path = self.artifact_path(destination, table);
            self.write_table(&path, table, &dataset.records(table))?;
            info!(
                table = %table,
                rows = dataset.len(table),
                path = %path.display(),
                "Exported {} table", self.extension
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
            "Imported {} dataset", self.extension
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::test_support::tricky_dataset;

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = tricky_dataset();

        let format = DelimitedFormat::csv();
        let written = format.export(&dataset, dir.path()).unwrap();
        assert_eq!(written.len(), 3);
        assert!(dir.path().join("persons.csv").is_file());

        assert_eq!(format.import(dir.path()).unwrap(), dataset);
    }

    #[test]
    fn test_tsv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = tricky_dataset();

        let format = DelimitedFormat::tsv();
        format.export(&dataset, dir.path()).unwrap();
        assert!(dir.path().join("occupations.tsv").is_file());

        assert_eq!(format.import(dir.path()).unwrap(), dataset);
    }

    #[test]
    fn test_header_follows_declared_order() {
        let dir = tempfile::tempdir().unwrap();
        DelimitedFormat::csv()
            .export(&tricky_dataset(), dir.path())
            .unwrap();

        let pets = std::fs::read_to_string(dir.path().join("pets.csv")).unwrap();
        assert_eq!(pets.lines().next(), Some("pet_id,owner_id,pet_name,species"));
        let occupations = std::fs::read_to_string(dir.path().join("occupations.csv")).unwrap();
        assert_eq!(
            occupations.lines().next(),
            Some("occupation_id,person_id,occupation,company")
        );
    }

    #[test]
    fn test_missing_pets_file() {
        let dir = tempfile::tempdir().unwrap();
        let format = DelimitedFormat::csv();
        format.export(&tricky_dataset(), dir.path()).unwrap();
        std::fs::remove_file(dir.path().join("pets.csv")).unwrap();

        let err = format.import(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            FormatError::MissingArtifact {
                table: Table::Pets,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_file_is_empty_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let format = DelimitedFormat::csv();
        format.export(&tricky_dataset(), dir.path()).unwrap();
        std::fs::write(dir.path().join("occupations.csv"), "").unwrap();

        let err = format.import(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            FormatError::EmptyArtifact {
                table: Table::Occupations,
                ..
            }
        ));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let format = DelimitedFormat::csv();
        format.export(&Dataset::default(), dir.path()).unwrap();

        let dataset = format.import(dir.path()).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_columns_may_be_reordered_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("persons.csv"),
            "address,person_id,full_name\nMain St,0,Ada\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("pets.csv"), "pet_id,owner_id,pet_name,species\n").unwrap();
        std::fs::write(
            dir.path().join("occupations.csv"),
            "occupation_id,person_id,occupation,company\n",
        )
        .unwrap();

        let dataset = DelimitedFormat::csv().import(dir.path()).unwrap();
        assert_eq!(dataset.persons[0].person_id, 0);
        assert_eq!(dataset.persons[0].full_name, "Ada");
        assert_eq!(dataset.persons[0].address, "Main St");
    }
}
