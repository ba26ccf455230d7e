use crate::core::errors::BfxResult;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Maps one positional wire array onto one named-field record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordBuilder {
    pub name: &'static str,
    /// `(index, field)` pairs; indices the protocol reserves are simply absent
    pub fields: &'static [(usize, &'static str)],
}

impl RecordBuilder {
    pub const fn new(name: &'static str, fields: &'static [(usize, &'static str)]) -> Self {
        Self { name, fields }
    }

    /// Build one record from one row. Objects are already named and pass through.
    pub fn build(&self, row: &Value) -> Value {
        let Some(items) = row.as_array() else {
            return row.clone();
        };

        let record: Map<String, Value> = self
            .fields
            .iter()
            .filter_map(|(index, field)| {
                items
                    .get(*index)
                    .map(|value| ((*field).to_string(), value.clone()))
            })
            .collect();

        Value::Object(record)
    }

    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields
            .iter()
            .find(|(_, name)| *name == field)
            .map(|(index, _)| *index)
    }
}

pub type TransformFn = dyn Fn(Value) -> BfxResult<Value> + Send + Sync;

/// How an endpoint wants its payload reshaped
#[derive(Clone, Default)]
pub enum Transformer {
    #[default]
    None,
    Record(RecordBuilder),
    Function(Arc<TransformFn>),
}

impl Transformer {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Value) -> BfxResult<Value> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }
}

impl From<RecordBuilder> for Transformer {
    fn from(builder: RecordBuilder) -> Self {
        Self::Record(builder)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "Transformer::None"),
            Self::Record(builder) => write!(f, "Transformer::Record({})", builder.name),
            Self::Function(_) => write!(f, "Transformer::Function"),
        }
    }
}

/// Row-vs-single-row record materialisation
pub fn build_records(data: Value, builder: &RecordBuilder) -> Value {
    match data {
        Value::Null => Value::Array(Vec::new()),
        Value::Array(rows) if rows.is_empty() => Value::Array(Vec::new()),
        Value::Array(rows) if rows.first().is_some_and(Value::is_array) => {
            Value::Array(rows.iter().map(|row| builder.build(row)).collect())
        }
        single => builder.build(&single),
    }
}

/// Apply a transformer to parsed response data.
///
/// Precedence: a disabled flag returns `data` untouched; a record builder
/// materialises rows; a function gets the data verbatim; no transformer
/// passes through.
pub fn transform(data: Value, transformer: &Transformer, enabled: bool) -> BfxResult<Value> {
    if !enabled {
        return Ok(data);
    }

    match transformer {
        Transformer::Record(builder) => Ok(build_records(data, builder)),
        Transformer::Function(f) => f(data),
        Transformer::None => Ok(data),
    }
}
