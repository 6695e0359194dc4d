//! Generates a dataset and writes it as CSV, JSON and XLSX.
//!
//! Run with:
//! ```
//! MENAGERIE_RECORDS=100 cargo run -p menagerie-data --bin export
//! ```

use anyhow::Context;
use menagerie::config::out_dir_from_env;
use menagerie::formats::Format;
use menagerie_data::config::GenerateConfig;
use menagerie_data::generators::DatasetGenerator;
use tracing::info;

const EXPORT_FORMATS: [Format; 3] = [Format::Csv, Format::Json, Format::Xlsx];

fn main() -> anyhow::Result<()> {
    menagerie::init_logging();

    let generator = DatasetGenerator::new(GenerateConfig::from_env()?)?;
    let dataset = generator.generate_default();
    let out_dir = out_dir_from_env();

    for format in EXPORT_FORMATS {
        let written = format
            .adapter()
            .export(&dataset, &out_dir)
            .with_context(|| format!("Failed to export {format}"))?;
        info!(format = %format, files = written.len(), "Export finished");
    }

    info!(dir = %out_dir.display(), "Dataset exported");
    Ok(())
}
