//! Field rules for the rows this service creates.
//!
//! A "required" field must be truthy, while a "defined" field only needs its
//! key to be present. Types, ranges and references are left to the store.

use serde_json::{Map, Value};

use crate::database::Table;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present and not `null`, `false`, `0` or `""`.
    Required,
    /// Key present, any value (including `null` and `0`).
    Defined,
    /// Forwarded when present.
    Optional,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
}

const fn field(name: &'static str, rule: Rule) -> Field {
    Field { name, rule }
}

/// Columns accepted for one insert, plus the message used when a required
/// column is missing.
#[derive(Debug)]
pub struct Entity {
    pub table: Table,
    pub fields: &'static [Field],
    pub missing_message: &'static str,
}

pub const PROJECT: Entity = Entity {
    table: Table::Projects,
    fields: &[field("name", Rule::Required), field("description", Rule::Optional)],
    missing_message: "name is required",
};

pub const KPI_TARGET: Entity = Entity {
    table: Table::KpiTargets,
    fields: &[
        field("project_id", Rule::Required),
        field("type", Rule::Required),
        field("metric", Rule::Required),
        field("target_value", Rule::Defined),
        field("due_date", Rule::Optional),
    ],
    missing_message: "project_id, type, metric, target_value required",
};

pub const EXPERIMENT: Entity = Entity {
    table: Table::Experiments,
    fields: &[
        field("project_id", Rule::Required),
        field("hypothesis", Rule::Required),
        field("method", Rule::Optional),
        field("result_metric", Rule::Optional),
        field("result_value", Rule::Optional),
        field("notes", Rule::Optional),
    ],
    missing_message: "project_id and hypothesis are required",
};

impl Entity {
    /// Check the body against the rules and keep only the known columns.
    pub fn build_row(&self, body: &Map<String, Value>) -> Result<Map<String, Value>, ApiError> {
        let mut row = Map::new();

        for f in self.fields {
            let value = body.get(f.name);
            let ok = match f.rule {
                Rule::Required => value.map(is_truthy).unwrap_or(false),
                Rule::Defined => value.is_some(),
                Rule::Optional => true,
            };
            if !ok {
                return Err(ApiError::bad_request(self.missing_message));
            }
            if let Some(v) = value {
                row.insert(f.name.to_string(), v.clone());
            }
        }

        Ok(row)
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
