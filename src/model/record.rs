//! Material records and the tabular result shape built from them.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::RetrievalError;

use super::fields::{column_label, IDENTIFIER_FIELD};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl From<&Value> for PropertyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(*b),
            Value::Number(n) => PropertyValue::Number(n.clone()),
            Value::String(s) => PropertyValue::Text(s.clone()),
            Value::Array(items) if items.iter().all(is_scalar) => PropertyValue::Text(
                items
                    .iter()
                    .map(scalar_text)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Value::Object(map) => match map.get("symbol").and_then(Value::as_str) {
                Some(symbol) => PropertyValue::Text(symbol.to_string()),
                None => PropertyValue::Text(value.to_string()),
            },
            Value::Array(_) => PropertyValue::Text(value.to_string()),
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::from(&value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => f.write_str("N/A"),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

/// A raw record as returned by a provider. Always carries `material_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct MaterialRecord {
    fields: Map<String, Value>,
}

impl MaterialRecord {
    pub fn from_value(value: Value) -> Result<Self, RetrievalError> {
        match value {
            Value::Object(fields) => Self::try_from(fields),
            other => Err(RetrievalError::InvalidResponse(format!(
                "expected a record object, got {}",
                type_name(&other)
            ))),
        }
    }

    pub fn id(&self) -> &str {
        self.fields
            .get(IDENTIFIER_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Top-level field by exact name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Resolve a property path such as `band_gap` or `symmetry.number`.
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.fields.get(path) {
            return Some(value);
        }

        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Restrict the record to `columns`, filling anything absent with null.
    pub fn project(&self, columns: &[String]) -> ResultRow {
        let cells = columns
            .iter()
            .map(|column| {
                let value = self
                    .resolve(column)
                    .map(PropertyValue::from)
                    .unwrap_or(PropertyValue::Null);
                (column.clone(), value)
            })
            .collect();
        ResultRow { cells }
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

impl TryFrom<Map<String, Value>> for MaterialRecord {
    type Error = RetrievalError;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let numeric_id = match fields.get(IDENTIFIER_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => None,
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => {
                return Err(RetrievalError::InvalidResponse(format!(
                    "record without '{}'",
                    IDENTIFIER_FIELD
                )))
            }
        };
        // Identifier column is always textual.
        if let Some(id) = numeric_id {
            fields.insert(IDENTIFIER_FIELD.to_string(), Value::String(id));
        }
        Ok(Self { fields })
    }
}

impl From<MaterialRecord> for Map<String, Value> {
    fn from(record: MaterialRecord) -> Self {
        record.fields
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One shaped row: a value for every column, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    cells: Vec<(String, PropertyValue)>,
}

impl ResultRow {
    pub fn get(&self, column: &str) -> Option<&PropertyValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &PropertyValue> {
        self.cells.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered, column-aligned search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultSet {
    /// Shape `records` onto `columns`, preserving record order.
    ///
    /// `columns` should already start with the identifier; it is inserted if absent.
    pub fn shape(columns: Vec<String>, records: &[MaterialRecord]) -> Self {
        let mut columns = columns;
        if !columns.iter().any(|c| c == IDENTIFIER_FIELD) {
            columns.insert(0, IDENTIFIER_FIELD.to_string());
        }
        let rows = records.iter().map(|r| r.project(&columns)).collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Display labels, parallel to [`columns`](Self::columns).
    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| column_label(c)).collect()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
