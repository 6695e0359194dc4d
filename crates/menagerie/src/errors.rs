use std::path::PathBuf;

use thiserror::Error;

use crate::models::Table;

/// A record could not be turned back into an entity.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedRecordError {
    #[error("{entity} record is missing field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity}.{field} is not an integer: {value:?}")]
    InvalidInteger {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Unknown species: {0:?}")]
    UnknownSpecies(String),

    #[error("{entity}.{field} holds an unsupported {kind} value")]
    UnsupportedValue {
        entity: &'static str,
        field: String,
        kind: &'static str,
    },
}

/// Errors raised by the format adapters.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Missing artifact for {table}: {}", .path.display())]
    MissingArtifact { table: Table, path: PathBuf },

    #[error("Artifact for {table} has no header: {}", .path.display())]
    EmptyArtifact { table: Table, path: PathBuf },

    #[error("{table} header: {source}")]
    MalformedHeader {
        table: Table,
        #[source]
        source: MalformedRecordError,
    },

    #[error("{table} row {row}: {source}")]
    Malformed {
        table: Table,
        row: usize,
        #[source]
        source: MalformedRecordError,
    },

    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),
}

/// Failure to render a single chart. Never fatal to the report as a whole.
#[derive(Error, Debug)]
pub enum ChartRenderError {
    #[error("No data to plot")]
    NoData,

    #[error("Embedded font could not be parsed")]
    Font,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Environment configuration could not be parsed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}
