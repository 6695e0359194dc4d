//! Fake Persons/Pets/Occupations datasets and their PostgreSQL seeding.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use menagerie_data::prelude::*;
//!
//! let generator = DatasetGenerator::new(GenerateConfig::with_count(100).with_seed(12345))?;
//! let dataset = generator.generate_default();
//!
//! let pool = connect(&ConnectionSettings::from_env()?).await?;
//! let seeder = Seeder::new(pool);
//! seeder.create_schema().await?;
//! seeder.insert_all(&dataset).await?;
//! ```

pub mod config;
pub mod db;
pub mod generators;
pub mod sources;

pub use menagerie::models::{Dataset, Occupation, Person, Pet, Species};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::GenerateConfig;
    pub use crate::db::{
        ConnectionSettings, InsertReport, RelationalError, SchemaReport, Seeder, connect,
        create_schema, insert_all,
    };
    pub use crate::generators::{DatasetGenerator, GenerateError, generate};
    pub use crate::sources::{FakeSource, FakerSource};
    pub use crate::{Dataset, Occupation, Person, Pet, Species};
}
