//! Record model, file formats and reporting for the Persons/Pets/Occupations dataset.

pub mod config;
pub mod errors;
pub mod formats;
pub mod models;
pub mod reporting;

pub use errors::{ChartRenderError, ConfigError, FormatError, MalformedRecordError};
pub use formats::{DelimitedFormat, Format, FormatAdapter, JsonFormat, XlsxFormat};
pub use models::{Dataset, Entity, FieldValue, Occupation, Person, Pet, Record, Species, Table};

/// Installs the fmt subscriber, `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
