//! Dataset insertion.

use menagerie::models::{Dataset, Occupation, Person, Pet, Table};
use sqlx::PgPool;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use tracing::info;

use super::{RelationalError, SchemaReport, create_schema};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// A row type with a fixed INSERT statement.
trait InsertRow {
    const TABLE: Table;
    const INSERT: &'static str;

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

impl InsertRow for Person {
    const TABLE: Table = Table::Persons;
    const INSERT: &'static str =
        "INSERT INTO Persons (person_id, full_name, address) VALUES ($1, $2, $3)";

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.person_id)
            .bind(&self.full_name)
            .bind(&self.address)
    }
}

impl InsertRow for Pet {
    const TABLE: Table = Table::Pets;
    const INSERT: &'static str =
        "INSERT INTO Pets (pet_id, owner_id, pet_name, species) VALUES ($1, $2, $3, $4)";

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.pet_id)
            .bind(self.owner_id)
            .bind(&self.pet_name)
            .bind(self.species.as_str())
    }
}

impl InsertRow for Occupation {
    const TABLE: Table = Table::Occupations;
    const INSERT: &'static str = r#"
        INSERT INTO Occupations (occupation_id, person_id, occupation, company)
        VALUES ($1, $2, $3, $4)
        "#;

    fn bind<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.occupation_id)
            .bind(self.person_id)
            .bind(&self.occupation)
            .bind(&self.company)
    }
}

/// Rows committed per table by [`insert_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub persons: usize,
    pub pets: usize,
    pub occupations: usize,
}

/// Database seeder for a generated dataset.
pub struct Seeder {
    pool: PgPool,
}

impl Seeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Drops and recreates the tables.
    pub async fn create_schema(&self) -> Result<SchemaReport, RelationalError> {
        create_schema(&self.pool).await
    }

    /// Inserts Persons, Pets and Occupations in that order, one transaction each.
    ///
    /// A failing table is rolled back and the remaining tables are skipped.
    /// Tables committed before the failure stay in place.
    pub async fn insert_all(&self, dataset: &Dataset) -> Result<InsertReport, RelationalError> {
        Ok(InsertReport {
            persons: self.insert_table(&dataset.persons).await?,
            pets: self.insert_table(&dataset.pets).await?,
            occupations: self.insert_table(&dataset.occupations).await?,
        })
    }

    async fn insert_table<T: InsertRow>(&self, rows: &[T]) -> Result<usize, RelationalError> {
        let table = T::TABLE;
        info!("Seeding {} {}...", rows.len(), table);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(RelationalError::write(table))?;

        for row in rows {
            row.bind(sqlx::query(T::INSERT))
                .execute(&mut *tx)
                .await
                .map_err(RelationalError::write(table))?;
        }

        tx.commit().await.map_err(RelationalError::write(table))?;

        info!(table = %table, rows = rows.len(), "Seeded table");
        Ok(rows.len())
    }
}

/// Inserts `dataset` through a [`Seeder`] on `pool`.
pub async fn insert_all(pool: &PgPool, dataset: &Dataset) -> Result<InsertReport, RelationalError> {
    Seeder::new(pool.clone()).insert_all(dataset).await
}
