//! Decoder and data model for appliance consumption pattern documents.
//!
//! A consumption model describes an appliance's electrical demand as a
//! two-level run-length encoding: an ordered list of patterns, each one an
//! ordered list of constant-level segments replayed `n` times.
//!
//! ```rust
//! use cpm_model::{Model, Quantity};
//!
//! let text = r#"{"n": 1, "params": [{"n": 2, "values": [{"p": 140, "d": 10, "s": 0.0}]}]}"#;
//! let model = Model::from_json_str(text, Quantity::Active).unwrap();
//! assert_eq!(model.pattern_count(), 1);
//! assert_eq!(model.pattern_duration(0).unwrap(), 10);
//! assert_eq!(model.total_duration(), 20);
//! ```

pub mod document;
pub mod error;
pub mod model;
pub mod quantity;

pub use document::{Document, Numeric};
pub use error::ModelError;
pub use model::{Model, Pattern, Segment};
pub use quantity::Quantity;

/// Embedded sample document for the active-power variant.
pub static ACTIVE_SAMPLE: &str = include_str!("../../fixtures/appliance-active.json");

/// Embedded sample document for the reactive-power variant.
pub static REACTIVE_SAMPLE: &str = include_str!("../../fixtures/appliance-reactive.json");
