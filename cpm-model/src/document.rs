//! Typed reads over a generic nested document.
//!
//! The decoder only needs three capabilities from a document value: look up
//! a key, view the value as a sequence, and view it as a number that is
//! either integer- or floating-point-encoded. Anything implementing
//! [`Document`] can be decoded; `serde_json::Value` is supported out of the box.

use crate::error::ModelError;
use serde_json::Value;

/// A numeric leaf, tagged with the encoding it had in the source document.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(x) => x,
        }
    }
}

/// A nested document of mappings, sequences and numeric leaves.
pub trait Document: Sized {
    /// Value stored under `key`, or `None` when absent or when `self` is not a mapping.
    fn get(&self, key: &str) -> Option<&Self>;

    fn as_sequence(&self) -> Option<&[Self]>;

    fn as_numeric(&self) -> Option<Numeric>;

    /// Short description of the value's kind, used in error messages.
    fn kind(&self) -> &'static str;
}

impl Document for Value {
    fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    fn as_numeric(&self) -> Option<Numeric> {
        let Value::Number(number) = self else {
            return None;
        };
        if let Some(i) = number.as_i64() {
            Some(Numeric::Int(i as i128))
        } else if let Some(u) = number.as_u64() {
            Some(Numeric::Int(u as i128))
        } else {
            number.as_f64().map(Numeric::Float)
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_f64() => "floating-point number",
            Value::Number(_) => "integer",
            Value::String(_) => "string",
            Value::Array(_) => "sequence",
            Value::Object(_) => "mapping",
        }
    }
}

fn require<'a, D: Document>(doc: &'a D, key: &str, location: &str) -> Result<&'a D, ModelError> {
    doc.get(key)
        .ok_or_else(|| ModelError::malformed(key, format!("is missing from {}", location)))
}

/// Read an integer-encoded field that fits in an `i32`.
///
/// Floating-point encodings are rejected even when they hold a whole number.
pub fn read_int<D: Document>(doc: &D, key: &str, location: &str) -> Result<i32, ModelError> {
    let value = require(doc, key, location)?;
    match value.as_numeric() {
        Some(Numeric::Int(i)) => i32::try_from(i).map_err(|_| {
            ModelError::malformed(key, format!("at {} is out of range: {}", location, i))
        }),
        _ => Err(ModelError::malformed(
            key,
            format!("at {} must be an integer, found {}", location, value.kind()),
        )),
    }
}

/// Read a numeric field given either as an integer or as a floating-point number.
pub fn read_number<D: Document>(doc: &D, key: &str, location: &str) -> Result<f64, ModelError> {
    let value = require(doc, key, location)?;
    value.as_numeric().map(Numeric::as_f64).ok_or_else(|| {
        ModelError::malformed(
            key,
            format!("at {} must be numeric, found {}", location, value.kind()),
        )
    })
}

pub fn read_sequence<'a, D: Document>(
    doc: &'a D,
    key: &str,
    location: &str,
) -> Result<&'a [D], ModelError> {
    let value = require(doc, key, location)?;
    value.as_sequence().ok_or_else(|| {
        ModelError::malformed(
            key,
            format!("at {} must be a sequence, found {}", location, value.kind()),
        )
    })
}
