use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The physical quantity carried by a segment's value.
///
/// The two variants share the whole document layout and differ only in the
/// key holding the segment level: `"p"` for active power and `"q"` for
/// reactive power.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Active,
    Reactive,
}

impl Quantity {
    /// Document key supplying `Segment::value`.
    pub fn key(self) -> &'static str {
        match self {
            Quantity::Active => "p",
            Quantity::Reactive => "q",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Active => write!(f, "active"),
            Quantity::Reactive => write!(f, "reactive"),
        }
    }
}

impl FromStr for Quantity {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "p" => Ok(Quantity::Active),
            "reactive" | "q" => Ok(Quantity::Reactive),
            _ => Err(ModelError::UnknownQuantity(s.to_string())),
        }
    }
}
