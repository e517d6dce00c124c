//! PostgreSQL binding (feature `postgres`)

use postgres::types::ToSql;
use postgres::{Client, NoTls};

use crate::connection::{ConnectionSource, SqlValue, Statement, StockConnection, StockRow};
use crate::dialect::SqlDialect;
use crate::errors::{from_postgres, wrong_connection, Result};

/// PostgreSQL connection capability
pub struct PostgresConnection {
    client: Client,
}

impl PostgresConnection {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect with a libpq-style connection string
    ///
    /// # Errors
    ///
    /// `Persistence` if the server cannot be reached.
    pub fn connect(params: &str) -> Result<Self> {
        Client::connect(params, NoTls)
            .map(Self::new)
            .map_err(from_postgres)
    }

    pub fn native(&mut self) -> &mut Client {
        &mut self.client
    }
}

fn bind(params: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    params
        .iter()
        .map(|value| match value {
            SqlValue::Integer(v) => v as &(dyn ToSql + Sync),
            SqlValue::Text(v) => v as &(dyn ToSql + Sync),
        })
        .collect()
}

impl StockConnection for PostgresConnection {
    fn dialect() -> SqlDialect {
        SqlDialect::postgres()
    }

    fn open(source: ConnectionSource) -> Result<Option<Self>> {
        match source {
            ConnectionSource::None => Ok(None),
            ConnectionSource::Locator(params) => Self::connect(&params).map(Some),
            ConnectionSource::Postgres(client) => Ok(Some(Self::new(client))),
            other => Err(wrong_connection("postgres", other.kind())),
        }
    }

    fn fetch_rows(&mut self, sql: &str) -> Result<Vec<StockRow>> {
        let rows = self.client.query(sql, &[]).map_err(from_postgres)?;
        rows.iter()
            .map(|row| {
                let pk: i64 = row.try_get(0).map_err(from_postgres)?;
                let name: String = row.try_get(1).map_err(from_postgres)?;
                let count: i64 = row.try_get(2).map_err(from_postgres)?;
                StockRow::from_columns(pk, name, count)
            })
            .collect()
    }

    fn run_transaction(&mut self, statements: &[Statement]) -> Result<()> {
        let mut tx = self.client.transaction().map_err(from_postgres)?;
        for statement in statements {
            tx.execute(statement.sql.as_str(), &bind(&statement.params))
                .map_err(from_postgres)?;
        }
        tx.commit().map_err(from_postgres)
    }
}
