//! Connection capability
//!
//! The persistence algorithm needs only two things from a backend: fetch
//! every stock row, and run a list of statements as one transaction.
//! [`StockConnection`] is that capability; the SQLite and PostgreSQL
//! bindings implement it.

use std::fmt;

use stockist_core::{StockCount, StockId, StockRecord};

use crate::dialect::SqlDialect;
use crate::errors::{corrupt_row, Result};

/// The persisted 3-tuple mirroring one stock record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRow {
    pub pk: StockId,
    pub name: String,
    pub count: StockCount,
}

impl StockRow {
    /// Validate raw column values read from a store
    ///
    /// # Errors
    ///
    /// Returns `CorruptRow` for a key outside the stock id range or a blank name.
    pub fn from_columns(pk: i64, name: String, count: i64) -> Result<Self> {
        let pk = StockId::try_from(pk)
            .map_err(|_| corrupt_row(format!("primary key {} is not a valid stock id", pk)))?;
        if name.trim().is_empty() {
            return Err(corrupt_row(format!("row {} has an empty name", pk)));
        }
        Ok(Self { pk, name, count })
    }

    pub fn to_params(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::from_stock_id(self.pk),
            SqlValue::Text(self.name.clone()),
            SqlValue::Integer(self.count),
        ]
    }

    /// Rebuild the in-memory record; the item comes from the unique name
    ///
    /// # Errors
    ///
    /// Returns `CorruptRow` if the name does not yield a valid item.
    pub fn into_record(self) -> Result<StockRecord> {
        let pk = self.pk;
        StockRecord::from_persisted(pk, self.name, self.count)
            .map_err(|err| corrupt_row(format!("row {}: {}", pk, err)))
    }
}

impl From<&StockRecord> for StockRow {
    fn from(record: &StockRecord) -> Self {
        Self {
            pk: record.stock_id,
            name: record.unique_name.clone(),
            count: record.count,
        }
    }
}

/// A bound parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
}

impl SqlValue {
    pub fn from_stock_id(stock_id: StockId) -> Self {
        SqlValue::Integer(i64::from(stock_id))
    }
}

/// One SQL statement with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// A statement without parameters
    pub fn plain(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// Where a backend connection comes from
///
/// `None` means no store: every store operation fails with `NoConnection`
/// until one is attached. A native connection for another backend is
/// rejected with `InvalidValue`.
pub enum ConnectionSource {
    None,
    /// File path (SQLite) or connection string (PostgreSQL)
    Locator(String),
    Sqlite(rusqlite::Connection),
    #[cfg(feature = "postgres")]
    Postgres(postgres::Client),
}

impl ConnectionSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectionSource::None => "none",
            ConnectionSource::Locator(_) => "locator",
            ConnectionSource::Sqlite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            ConnectionSource::Postgres(_) => "postgres",
        }
    }
}

impl fmt::Debug for ConnectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionSource::Locator(locator) => {
                f.debug_tuple("Locator").field(locator).finish()
            }
            other => write!(f, "ConnectionSource({})", other.kind()),
        }
    }
}

impl From<&str> for ConnectionSource {
    fn from(locator: &str) -> Self {
        ConnectionSource::Locator(locator.to_string())
    }
}

impl From<String> for ConnectionSource {
    fn from(locator: String) -> Self {
        ConnectionSource::Locator(locator)
    }
}

impl From<Option<String>> for ConnectionSource {
    fn from(locator: Option<String>) -> Self {
        locator.map_or(ConnectionSource::None, ConnectionSource::Locator)
    }
}

impl From<rusqlite::Connection> for ConnectionSource {
    fn from(conn: rusqlite::Connection) -> Self {
        ConnectionSource::Sqlite(conn)
    }
}

#[cfg(feature = "postgres")]
impl From<postgres::Client> for ConnectionSource {
    fn from(client: postgres::Client) -> Self {
        ConnectionSource::Postgres(client)
    }
}

/// Capability a backend supplies to the persistence adapter
pub trait StockConnection: Sized {
    /// The dialect this backend speaks by default
    fn dialect() -> SqlDialect;

    /// Build a connection from a source; `Ok(None)` for [`ConnectionSource::None`]
    ///
    /// # Errors
    ///
    /// - `InvalidValue` for a native connection of another backend
    /// - `Persistence` if the driver cannot connect
    fn open(source: ConnectionSource) -> Result<Option<Self>>;

    /// Run a query returning `(pk, name, count)` rows
    ///
    /// # Errors
    ///
    /// `Persistence` on driver failure, `CorruptRow` for rows that do not map.
    fn fetch_rows(&mut self, sql: &str) -> Result<Vec<StockRow>>;

    /// Run all statements in one transaction and commit
    ///
    /// On error nothing is committed.
    ///
    /// # Errors
    ///
    /// `Persistence` on driver failure.
    fn run_transaction(&mut self, statements: &[Statement]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockist_core::errors::StockError;

    #[test]
    fn test_negative_key_is_corrupt() {
        assert!(matches!(
            StockRow::from_columns(-1, "x_#0".to_string(), 0),
            Err(StockError::CorruptRow { .. })
        ));
    }

    #[test]
    fn test_blank_row_built_directly_is_corrupt() {
        let row = StockRow {
            pk: 3,
            name: " ".to_string(),
            count: 1,
        };
        assert!(matches!(
            row.into_record(),
            Err(StockError::CorruptRow { .. })
        ));
    }

    #[test]
    fn test_optional_locator() {
        assert!(matches!(
            ConnectionSource::from(None::<String>),
            ConnectionSource::None
        ));
        assert_eq!(ConnectionSource::from("a.db").kind(), "locator");
    }
}
