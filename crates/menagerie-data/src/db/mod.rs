//! PostgreSQL persistence of a generated dataset.
//!
//! [`connect`] opens a pool from [`ConnectionSettings`], [`create_schema`]
//! recreates the three tables and [`Seeder`] inserts a dataset one table per
//! transaction.

mod connection;
mod schema;
mod seeder;

use menagerie::models::Table;
use thiserror::Error;

pub use connection::{ConnectionSettings, DEFAULT_PORT, connect};
pub use schema::{SchemaReport, create_schema};
pub use seeder::{InsertReport, Seeder, insert_all};

#[derive(Debug, Error)]
pub enum RelationalError {
    #[error("Connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Missing connection setting {0}")]
    MissingSetting(&'static str),

    #[error("Invalid connection setting {name}: {value:?}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("Write to {table} failed: {message}")]
    Write { table: Table, message: String },
}

impl RelationalError {
    /// Wraps a driver error raised while writing `table`, keeping the driver message.
    pub(crate) fn write(table: Table) -> impl FnOnce(sqlx::Error) -> Self {
        move |err| RelationalError::Write {
            table,
            message: driver_message(&err),
        }
    }
}

fn driver_message(err: &sqlx::Error) -> String {
    match err.as_database_error() {
        Some(db_err) => db_err.message().to_string(),
        None => err.to_string(),
    }
}
