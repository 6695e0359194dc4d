use menagerie::models::Table;
use sqlx::PgPool;
use tracing::{debug, info};

use super::RelationalError;

/// Undefined table, the expected outcome of dropping a table that was never created.
const UNDEFINED_TABLE: &str = "42P01";

/// Dependents first so foreign keys never block a drop.
const DROP_ORDER: [Table; 3] = [Table::Occupations, Table::Pets, Table::Persons];

/// What [`create_schema`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Tables that existed and were dropped.
    pub dropped: Vec<Table>,
    /// Tables that did not exist yet.
    pub missing: Vec<Table>,
    pub created: Vec<Table>,
}

fn create_statement(table: Table) -> &'static str {
    match table {
        Table::Persons => {
            r#"
            CREATE TABLE Persons (
                person_id BIGINT PRIMARY KEY,
                full_name VARCHAR(100),
                address VARCHAR(255)
            )
            "#
        }
        Table::Pets => {
            r#"
            CREATE TABLE Pets (
                pet_id VARCHAR(50) PRIMARY KEY,
                owner_id BIGINT REFERENCES Persons(person_id),
                pet_name VARCHAR(100),
                species VARCHAR(50)
            )
            "#
        }
        Table::Occupations => {
            r#"
            CREATE TABLE Occupations (
                occupation_id VARCHAR(50) PRIMARY KEY,
                person_id BIGINT REFERENCES Persons(person_id),
                occupation VARCHAR(100),
                company VARCHAR(100)
            )
            "#
        }
    }
}

fn is_undefined_table(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == UNDEFINED_TABLE)
}

/// Drops and recreates Persons, Pets and Occupations.
///
/// Dropping a table that does not exist is expected and only logged. Any other
/// failure aborts the step with the table it happened on.
pub async fn create_schema(pool: &PgPool) -> Result<SchemaReport, RelationalError> {
    let mut report = SchemaReport::default();

    for table in DROP_ORDER {
        let statement = format!("DROP TABLE {} CASCADE", table.sheet_name());
        match sqlx::query(&statement).execute(pool).await {
            Ok(_) => report.dropped.push(table),
            Err(err) if is_undefined_table(&err) => {
                debug!(table = %table, "Table does not exist, nothing to drop");
                report.missing.push(table);
            }
            Err(err) => return Err(RelationalError::write(table)(err)),
        }
    }

    for table in Table::ALL {
        sqlx::query(create_statement(table))
            .execute(pool)
            .await
            .map_err(RelationalError::write(table))?;
        report.created.push(table);
    }

    info!(
        dropped = report.dropped.len(),
        created = report.created.len(),
        "Schema created"
    );
    Ok(report)
}
