use thiserror::Error;

use crate::model::StockId;

/// Result type alias using StockError
pub type Result<T> = std::result::Result<T, StockError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that front ends and tests can
/// match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Ledger
    InvalidItem,
    DuplicateId,
    NotFound,
    Locked,
    InvalidValue,

    // Store
    NoConnection,
    /// The active SQL dialect has no template for the requested statement
    NotImplemented,
    Persistence,
    CorruptRow,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidItem => "ERR_INVALID_ITEM",
            ExErrorKind::DuplicateId => "ERR_DUPLICATE_ID",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Locked => "ERR_LOCKED",
            ExErrorKind::InvalidValue => "ERR_INVALID_VALUE",
            ExErrorKind::NoConnection => "ERR_NO_CONNECTION",
            ExErrorKind::NotImplemented => "ERR_NOT_IMPLEMENTED",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::CorruptRow => "ERR_CORRUPT_ROW",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the context needed for structured logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    stock_id: Option<StockId>,
    item: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            stock_id: None,
            item: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add stock id context
    pub fn with_stock_id(mut self, stock_id: StockId) -> Self {
        self.stock_id = Some(stock_id);
        self
    }

    /// Add item name context
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn stock_id(&self) -> Option<StockId> {
        self.stock_id
    }

    pub fn item(&self) -> Option<&str> {
        self.item.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(stock_id) = self.stock_id {
            write!(f, " (stock_id: {})", stock_id)?;
        }
        if let Some(item) = &self.item {
            write!(f, " (item: {})", item)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for ledger and store operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StockError {
    /// An item name was required but none (or an empty one) was given
    #[error("Invalid item: {reason}")]
    InvalidItem { reason: String },

    /// A specific stock id was requested but is already in use
    #[error("Stock ID already in use: {stock_id}")]
    DuplicateId { stock_id: StockId },

    /// No record exists for the given stock id
    #[error("Stock ID not found: {stock_id}")]
    NotFound { stock_id: StockId },

    /// No record exists for the given item name
    #[error("Item not found: {item}")]
    ItemNotFound { item: String },

    /// A mutating operation was attempted while the stock list is locked
    #[error("Stock list is locked (operation '{op}')")]
    Locked { op: String },

    /// A setter received a value of the wrong shape
    #[error("Invalid value: {reason}")]
    InvalidValue { reason: String },

    /// A store operation was attempted with no backing connection attached
    #[error("No database connection!")]
    NoConnection,

    /// The SQL dialect in use supplies no template for this statement
    #[error("No '{statement}' statement available for dialect '{dialect}'")]
    NotImplemented { statement: String, dialect: String },

    /// The database driver reported a failure
    #[error("Persistence error in '{op}': {message}")]
    Persistence { op: String, message: String },

    /// A stored row could not be mapped back into a stock record
    #[error("Corrupt stock row: {reason}")]
    CorruptRow { reason: String },
}

impl StockError {
    pub(crate) fn locked(op: &str) -> Self {
        StockError::Locked { op: op.to_string() }
    }

    /// Shorthand for the canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        ExError::from(self.clone()).kind()
    }
}

/// Conversion from StockError to the structured ExError
impl From<StockError> for ExError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::InvalidItem { reason } => {
                ExError::new(ExErrorKind::InvalidItem).with_message(reason)
            }
            StockError::DuplicateId { stock_id } => ExError::new(ExErrorKind::DuplicateId)
                .with_stock_id(stock_id)
                .with_message("Stock ID already in use"),
            StockError::NotFound { stock_id } => ExError::new(ExErrorKind::NotFound)
                .with_stock_id(stock_id)
                .with_message("Stock ID not found"),
            StockError::ItemNotFound { item } => ExError::new(ExErrorKind::NotFound)
                .with_item(item)
                .with_message("Item not found"),
            StockError::Locked { op } => ExError::new(ExErrorKind::Locked)
                .with_op(op)
                .with_message("Stock list is locked"),
            StockError::InvalidValue { reason } => {
                ExError::new(ExErrorKind::InvalidValue).with_message(reason)
            }
            StockError::NoConnection => {
                ExError::new(ExErrorKind::NoConnection).with_message("No database connection")
            }
            StockError::NotImplemented { statement, dialect } => {
                ExError::new(ExErrorKind::NotImplemented)
                    .with_op(statement)
                    .with_message(format!("Dialect '{}' has no template", dialect))
            }
            StockError::Persistence { op, message } => ExError::new(ExErrorKind::Persistence)
                .with_op(op)
                .with_message(message),
            StockError::CorruptRow { reason } => {
                ExError::new(ExErrorKind::CorruptRow).with_message(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_and_context() {
        let err: ExError = StockError::NotFound { stock_id: 42 }.into();
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_NOT_FOUND]"));
        assert!(rendered.contains("(stock_id: 42)"));
    }

    #[test]
    fn test_locked_carries_operation() {
        let err: ExError = StockError::locked("new_stock_item").into();
        assert_eq!(err.kind(), ExErrorKind::Locked);
        assert_eq!(err.op(), Some("new_stock_item"));
    }
}
