//! Generates a dataset and loads it into PostgreSQL.
//!
//! Run with:
//! ```
//! DATABASE_URL=postgres://... cargo run -p menagerie-data --bin seed
//! ```

use menagerie_data::config::GenerateConfig;
use menagerie_data::db::{ConnectionSettings, Seeder, connect};
use menagerie_data::generators::DatasetGenerator;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    menagerie::init_logging();

    let generator = DatasetGenerator::new(GenerateConfig::from_env()?)?;
    let dataset = generator.generate_default();

    let settings = ConnectionSettings::from_env()?;
    let seeder = Seeder::new(connect(&settings).await?);

    // insertion is still attempted so the driver reports what is actually wrong
    match seeder.create_schema().await {
        Ok(report) => info!(
            dropped = report.dropped.len(),
            missing = report.missing.len(),
            "Schema ready"
        ),
        Err(err) => warn!(error = %err, "Schema creation failed, continuing with inserts"),
    }

    let report = seeder.insert_all(&dataset).await.inspect_err(|err| {
        error!(error = %err, "Seeding failed");
    })?;

    info!("Seed completed!");
    info!("  Persons: {}", report.persons);
    info!("  Pets: {}", report.pets);
    info!("  Occupations: {}", report.occupations);

    Ok(())
}
