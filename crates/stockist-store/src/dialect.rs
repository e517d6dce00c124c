//! SQL dialects
//!
//! A dialect is a plain value: the table name, the placeholder style and
//! the statement templates one backend understands. The persistence
//! algorithm in [`crate::DatabaseStockist`] is written once against this
//! value. The mirror templates (insert, update, delete) are optional; a
//! dialect without one answers `NotImplemented` when a mirrored write
//! needs it.

use stockist_core::errors::StockError;
use stockist_core::{StockCount, StockId};

use crate::connection::{SqlValue, Statement, StockRow};
use crate::errors::Result;

/// Default stock table name
pub const STOCK_TABLE: &str = "stock";

/// Parameter placeholder syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?` (SQLite)
    QuestionMark,
    /// `$1`, `$2`, ... (PostgreSQL)
    Numbered,
}

impl Placeholder {
    /// Render the placeholder for the 1-based parameter `index`
    pub fn render(&self, index: usize) -> String {
        match self {
            Placeholder::QuestionMark => "?".to_string(),
            Placeholder::Numbered => format!("${}", index),
        }
    }
}

/// Mirror statements a dialect may or may not supply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorStatement {
    Insert,
    Update,
    Delete,
}

impl MirrorStatement {
    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorStatement::Insert => "insert",
            MirrorStatement::Update => "update",
            MirrorStatement::Delete => "delete",
        }
    }
}

/// SQL dialect value object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlDialect {
    name: String,
    table: String,
    placeholder: Placeholder,
    integer_type: &'static str,
    insert: Option<String>,
    update: Option<String>,
    delete: Option<String>,
}

impl SqlDialect {
    /// SQLite: `?` placeholders, `INTEGER` keys
    pub fn sqlite() -> Self {
        Self::complete("sqlite", STOCK_TABLE, Placeholder::QuestionMark, "INTEGER")
    }

    /// PostgreSQL: `$n` placeholders, `BIGINT` keys and counts
    pub fn postgres() -> Self {
        Self::complete("postgres", STOCK_TABLE, Placeholder::Numbered, "BIGINT")
    }

    /// A dialect that can manage the schema but mirrors no mutations
    pub fn schema_only(name: impl Into<String>, placeholder: Placeholder) -> Self {
        Self {
            name: name.into(),
            table: STOCK_TABLE.to_string(),
            placeholder,
            integer_type: "INTEGER",
            insert: None,
            update: None,
            delete: None,
        }
    }

    fn complete(
        name: &str,
        table: &str,
        placeholder: Placeholder,
        integer_type: &'static str,
    ) -> Self {
        let mut dialect = Self {
            name: name.to_string(),
            table: table.to_string(),
            placeholder,
            integer_type,
            insert: None,
            update: None,
            delete: None,
        };
        dialect.render_mirror_templates();
        dialect
    }

    fn render_mirror_templates(&mut self) {
        let p = |i| self.placeholder.render(i);
        let insert = format!(
            "INSERT INTO {} (pk, name, count) VALUES ({}, {}, {})",
            self.table,
            p(1),
            p(2),
            p(3)
        );
        let update = format!("UPDATE {} SET count = {} WHERE pk = {}", self.table, p(1), p(2));
        let delete = format!("DELETE FROM {} WHERE pk = {}", self.table, p(1));
        self.insert = Some(insert);
        self.update = Some(update);
        self.delete = Some(delete);
    }

    /// Use another table name, re-rendering any templates present
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        let had = (
            self.insert.is_some(),
            self.update.is_some(),
            self.delete.is_some(),
        );
        self.table = table.into();
        self.render_mirror_templates();
        if !had.0 {
            self.insert = None;
        }
        if !had.1 {
            self.update = None;
        }
        if !had.2 {
            self.delete = None;
        }
        self
    }

    /// Drop one mirror template
    pub fn without(mut self, statement: MirrorStatement) -> Self {
        match statement {
            MirrorStatement::Insert => self.insert = None,
            MirrorStatement::Update => self.update = None,
            MirrorStatement::Delete => self.delete = None,
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    /// Whether every mirror template is present
    pub fn mirrors_all(&self) -> bool {
        self.insert.is_some() && self.update.is_some() && self.delete.is_some()
    }

    // ===== Schema statements =====

    pub fn create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (pk {int}, name TEXT, count {int})",
            self.table,
            int = self.integer_type
        )
    }

    pub fn drop_table_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.table)
    }

    pub fn select_all_sql(&self) -> String {
        format!("SELECT pk, name, count FROM {} ORDER BY pk", self.table)
    }

    // ===== Mirror statements =====

    /// Template for a mirror statement
    ///
    /// # Errors
    ///
    /// Returns `NotImplemented` if this dialect does not supply it.
    pub fn template(&self, statement: MirrorStatement) -> Result<&str> {
        let template = match statement {
            MirrorStatement::Insert => &self.insert,
            MirrorStatement::Update => &self.update,
            MirrorStatement::Delete => &self.delete,
        };
        template
            .as_deref()
            .ok_or_else(|| StockError::NotImplemented {
                statement: statement.as_str().to_string(),
                dialect: self.name.clone(),
            })
    }

    /// # Errors
    ///
    /// Returns `NotImplemented` without an insert template.
    pub fn insert(&self, row: &StockRow) -> Result<Statement> {
        Ok(Statement::new(
            self.template(MirrorStatement::Insert)?,
            row.to_params(),
        ))
    }

    /// # Errors
    ///
    /// Returns `NotImplemented` without an update template.
    pub fn update_count(&self, stock_id: StockId, count: StockCount) -> Result<Statement> {
        Ok(Statement::new(
            self.template(MirrorStatement::Update)?,
            vec![SqlValue::Integer(count), SqlValue::from_stock_id(stock_id)],
        ))
    }

    /// # Errors
    ///
    /// Returns `NotImplemented` without a delete template.
    pub fn delete(&self, stock_id: StockId) -> Result<Statement> {
        Ok(Statement::new(
            self.template(MirrorStatement::Delete)?,
            vec![SqlValue::from_stock_id(stock_id)],
        ))
    }

    // ===== Export =====

    /// Render a self-contained SQL script recreating the table with `rows`
    pub fn export_script(&self, rows: &[StockRow]) -> String {
        let mut script = String::from("BEGIN TRANSACTION;\n");
        script.push_str(&self.drop_table_sql());
        script.push_str(";\n");
        script.push_str(&self.create_table_sql());
        script.push_str(";\n");
        for row in rows {
            script.push_str(&format!(
                "INSERT INTO {} (pk, name, count) VALUES ({}, {}, {});\n",
                self.table,
                row.pk,
                quote_literal(&row.name),
                row.count
            ));
        }
        script.push_str("COMMIT;");
        script
    }
}

fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
