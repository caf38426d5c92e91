//! Scoped population of the `employees` table
//!
//! [`FixtureSession::enter`] creates the table, generates the roster and
//! inserts it inside one transaction. The session is only handed back once
//! the commit succeeded, and it holds the connection's only mutable borrow
//! for as long as it lives, so the rows cannot be observed before entry and
//! share the connection's lifetime afterwards.

use super::employee::Employee;
use super::generator::generate;
use crate::error::{HarnessError, Result};
use rand::Rng;
use sqlx::{Connection, Sqlite, SqliteConnection, Transaction};
use tracing::{debug, info, warn};

/// Idempotent schema for the fixture table
pub const CREATE_TABLE: &str = r#"
create table if not exists employees(
    name text
    ,salary real
)
"#;

const INSERT_EMPLOYEE: &str = "insert into employees (name, salary) values (?, ?)";

const SELECT_EMPLOYEES: &str = "select name, salary from employees order by rowid";

/// A populated fixture bound to its connection
#[derive(Debug)]
pub struct FixtureSession<'c> {
    conn: &'c mut SqliteConnection,
    employees: Vec<Employee>,
}

impl<'c> FixtureSession<'c> {
    /// Create the schema and insert one employee per name.
    ///
    /// On failure the transaction is rolled back and no session is returned.
    pub async fn enter<S, R>(conn: &'c mut SqliteConnection, names: &[S], rng: &mut R) -> Result<Self>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let employees = generate(names, rng);

        let mut tx = conn
            .begin()
            .await
            .map_err(HarnessError::SchemaOrInsertFailure)?;

        if let Err(err) = populate(&mut tx, &employees).await {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after failed fixture insert failed: {}", rollback_err);
            }
            return Err(HarnessError::SchemaOrInsertFailure(err));
        }

        tx.commit()
            .await
            .map_err(HarnessError::SchemaOrInsertFailure)?;

        info!("Inserted {} fixture employees", employees.len());
        Ok(Self { conn, employees })
    }

    /// The records that were generated and inserted, in insertion order
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn connection(&mut self) -> &mut SqliteConnection {
        self.conn
    }

    /// Read the table back in insertion order
    pub async fn fetch_stored(&mut self) -> Result<Vec<Employee>> {
        let rows: Vec<(String, f64)> = sqlx::query_as(SELECT_EMPLOYEES)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(name, salary)| Employee::new(name, salary))
            .collect())
    }
}

async fn populate(
    tx: &mut Transaction<'_, Sqlite>,
    employees: &[Employee],
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(CREATE_TABLE).execute(&mut **tx).await?;

    for employee in employees {
        sqlx::query(INSERT_EMPLOYEE)
            .bind(employee.name())
            .bind(employee.salary())
            .execute(&mut **tx)
            .await?;
    }

    debug!("Fixture statements executed, committing");
    Ok(())
}
