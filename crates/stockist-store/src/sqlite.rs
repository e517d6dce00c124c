//! SQLite binding

use rusqlite::types::{ToSql, ToSqlOutput};
use rusqlite::{params_from_iter, Connection};

use crate::connection::{ConnectionSource, SqlValue, Statement, StockConnection, StockRow};
use crate::db;
use crate::dialect::SqlDialect;
use crate::errors::{from_rusqlite, wrong_connection, Result};

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlValue::Integer(value) => value.to_sql(),
            SqlValue::Text(value) => value.to_sql(),
        }
    }
}

/// SQLite connection capability
#[derive(Debug)]
pub struct SqliteConnection {
    conn: Connection,
}

impl SqliteConnection {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrow the native connection
    pub fn native(&self) -> &Connection {
        &self.conn
    }

    pub fn into_native(self) -> Connection {
        self.conn
    }
}

impl StockConnection for SqliteConnection {
    fn dialect() -> SqlDialect {
        SqlDialect::sqlite()
    }

    fn open(source: ConnectionSource) -> Result<Option<Self>> {
        match source {
            ConnectionSource::None => Ok(None),
            ConnectionSource::Locator(path) if path == ":memory:" => {
                Ok(Some(Self::new(db::open_in_memory()?)))
            }
            ConnectionSource::Locator(path) => Ok(Some(Self::new(db::open(path)?))),
            ConnectionSource::Sqlite(conn) => Ok(Some(Self::new(conn))),
            #[allow(unreachable_patterns)]
            other => Err(wrong_connection("sqlite", other.kind())),
        }
    }

    fn fetch_rows(&mut self, sql: &str) -> Result<Vec<StockRow>> {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let raw: Vec<(i64, String, i64)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        raw.into_iter()
            .map(|(pk, name, count)| StockRow::from_columns(pk, name, count))
            .collect()
    }

    fn run_transaction(&mut self, statements: &[Statement]) -> Result<()> {
        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        for statement in statements {
            let mut prepared = tx.prepare_cached(&statement.sql).map_err(from_rusqlite)?;
            prepared
                .execute(params_from_iter(statement.params.iter()))
                .map_err(from_rusqlite)?;
        }
        tx.commit().map_err(from_rusqlite)
    }
}
