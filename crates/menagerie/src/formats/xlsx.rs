use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::info;

use super::{FormatAdapter, check_header, decode_dataset};
use crate::errors::FormatError;
use crate::models::{Dataset, FieldValue, Record, Table};

/// File name of the workbook artifact.
pub const WORKBOOK_FILE: &str = "dataset.xlsx";

/// Single workbook with one sheet per table.
///
/// Integer fields are stored as numeric cells and come back as floats, which the
/// record model accepts when they are integral.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxFormat;

impl XlsxFormat {
    pub fn artifact_path(&self, dir: &Path) -> PathBuf {
        dir.join(WORKBOOK_FILE)
    }
}

fn write_sheet(
    worksheet: &mut Worksheet,
    table: Table,
    records: &[Record],
) -> Result<(), FormatError> {
    worksheet.set_name(table.sheet_name())?;

    for (col, field) in table.fields().iter().enumerate() {
        worksheet.write_string(0, col as u16, *field)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, (_, value)) in record.iter().enumerate() {
            let col = col as u16;
            match value {
                FieldValue::Integer(v) => worksheet.write_number(row, col, *v as f64)?,
                FieldValue::Float(v) => worksheet.write_number(row, col, *v)?,
                FieldValue::Text(s) => worksheet.write_string(row, col, s.as_str())?,
            };
        }
    }

    Ok(())
}

fn cell_to_value(cell: &Data) -> FieldValue {
    match cell {
        Data::Int(v) => FieldValue::Integer(*v),
        Data::Float(v) => FieldValue::Float(*v),
        Data::String(s) => FieldValue::Text(s.clone()),
        Data::Empty => FieldValue::Text(String::new()),
        other => FieldValue::Text(other.to_string()),
    }
}

fn read_sheet(
    workbook: &mut Xlsx<std::io::BufReader<std::fs::File>>,
    table: Table,
    path: &Path,
) -> Result<Vec<Record>, FormatError> {
    let range = workbook.worksheet_range(table.sheet_name())?;
    let mut rows = range.rows();

    let header: Vec<String> = match rows.next() {
        Some(cells) if cells.iter().any(|cell| *cell != Data::Empty) => {
            cells.iter().map(|cell| cell_to_value(cell).to_text()).collect()
        }
        _ => {
            return Err(FormatError::EmptyArtifact {
                table,
                path: path.to_path_buf(),
            });
        }
    };
    check_header(table, header.iter().map(String::as_str))?;

    Ok(rows
        .filter(|cells| cells.iter().any(|cell| *cell != Data::Empty))
        .map(|cells| {
            header
                .iter()
                .zip(cells.iter())
                .map(|(name, cell)| (name.as_str(), cell_to_value(cell)))
                .collect()
        })
        .collect())
}

impl FormatAdapter for XlsxFormat {
    fn name(&self) -> &'static str {
        "xlsx"
    }

    fn export(&self, dataset: &Dataset, destination: &Path) -> Result<Vec<PathBuf>, FormatError> {
        std::fs::create_dir_all(destination)?;

        let mut workbook = Workbook::new();
        for table in Table::ALL {
            write_sheet(workbook.add_worksheet(), table, &dataset.records(table))?;
        }

        let path = self.artifact_path(destination);
        workbook.save(&path)?;
        info!(
            persons = dataset.persons.len(),
            pets = dataset.pets.len(),
            occupations = dataset.occupations.len(),
            path = %path.display(),
            "Exported xlsx workbook"
        );

        Ok(vec![path])
    }

    /// A missing workbook is reported against the Persons table, the first
    /// sheet the import needs.
    fn import(&self, source: &Path) -> Result<Dataset, FormatError> {
        let path = self.artifact_path(source);
        if !path.is_file() {
            return Err(FormatError::MissingArtifact {
                table: Table::Persons,
                path,
            });
        }

        let mut workbook: Xlsx<_> = open_workbook(&path)?;
        let sheet_names = workbook.sheet_names();
        if let Some(table) = Table::ALL
            .into_iter()
            .find(|table| !sheet_names.iter().any(|name| name == table.sheet_name()))
        {
            return Err(FormatError::MissingArtifact { table, path });
        }

        let persons = read_sheet(&mut workbook, Table::Persons, &path)?;
        let pets = read_sheet(&mut workbook, Table::Pets, &path)?;
        let occupations = read_sheet(&mut workbook, Table::Occupations, &path)?;

        let dataset = decode_dataset(&persons, &pets, &occupations)?;
        info!(
            persons = dataset.persons.len(),
            pets = dataset.pets.len(),
            occupations = dataset.occupations.len(),
            "Imported xlsx dataset"
        );
        Ok(dataset)
    }
}
