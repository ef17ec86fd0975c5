use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Error reported by the hosted store. The message is surfaced to API
/// callers unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Collections this service reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Projects,
    KpiTargets,
    Experiments,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Projects => "projects",
            Table::KpiTargets => "kpi_targets",
            Table::Experiments => "experiments",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub descending: bool,
}

impl Order {
    pub fn desc(column: &'static str) -> Self {
        Self { column, descending: true }
    }

    pub fn asc(column: &'static str) -> Self {
        Self { column, descending: false }
    }
}

/// Table-scoped access to the hosted database.
///
/// Integrity rules (foreign keys, column types, uniqueness) belong to the
/// store; implementations pass rows through without interpreting them.
#[async_trait]
pub trait Store: Send + Sync {
    /// All columns of every row in `table`, sorted by `order`.
    async fn select_all(&self, table: Table, order: Order) -> Result<Vec<Value>, StoreError>;

    /// Insert one row and return it as the store recorded it.
    async fn insert_one(&self, table: Table, row: Map<String, Value>) -> Result<Value, StoreError>;
}
