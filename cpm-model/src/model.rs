use crate::{
    document::{read_int, read_number, read_sequence, Document},
    error::ModelError,
    quantity::Quantity,
};
use log::{debug, info};
use serde::Serialize;
use std::fmt;

/// One constant-level piece of the waveform (a "triplet").
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Segment {
    /// Active or reactive power level, depending on the model's [`Quantity`].
    pub value: f64,
    /// Length in the model's time unit (minutes).
    pub duration: i32,
    /// Dispersion around `value`. Stored only.
    pub noise: f64,
}

/// An ordered run of segments traversed `repeat_count` times.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Pattern {
    segments: Vec<Segment>,
    repeat_count: i32,
    duration: i32,
}

impl Pattern {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn repeat_count(&self) -> i32 {
        self.repeat_count
    }

    /// Length of one traversal; not multiplied by `repeat_count`.
    pub fn duration(&self) -> i32 {
        self.duration
    }
}

/// A fully decoded consumption model for one appliance and one quantity.
///
/// Built once by [`Model::decode`] and read-only afterwards.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Model {
    quantity: Quantity,
    outer_repeat_count: i32,
    total_duration: i32,
    patterns: Vec<Pattern>,
}

impl Model {
    /// Decode a model from a nested document.
    ///
    /// `total_duration` accumulates `repeat_count * duration` per segment.
    /// The top-level `"n"` is kept as `outer_repeat_count` and does not
    /// scale `total_duration`. Negative counts and durations are accepted
    /// as given.
    pub fn decode<D: Document>(document: &D, quantity: Quantity) -> Result<Model, ModelError> {
        let key = quantity.key();
        let outer_repeat_count = read_int(document, "n", "document")?;
        let params = read_sequence(document, "params", "document")?;

        let mut patterns = Vec::with_capacity(params.len());
        let mut total_duration: i32 = 0;
        for (i, param) in params.iter().enumerate() {
            let location = format!("params[{}]", i);
            let repeat_count = read_int(param, "n", &location)?;
            let values = read_sequence(param, "values", &location)?;

            let mut segments = Vec::with_capacity(values.len());
            let mut duration: i32 = 0;
            for (j, triplet) in values.iter().enumerate() {
                let location = format!("params[{}].values[{}]", i, j);
                let segment = Segment {
                    value: read_number(triplet, key, &location)?,
                    duration: read_int(triplet, "d", &location)?,
                    noise: read_number(triplet, "s", &location)?,
                };
                duration = duration
                    .checked_add(segment.duration)
                    .ok_or(ModelError::DurationOverflow { pattern: i })?;
                total_duration = repeat_count
                    .checked_mul(segment.duration)
                    .and_then(|d| total_duration.checked_add(d))
                    .ok_or(ModelError::DurationOverflow { pattern: i })?;
                segments.push(segment);
            }
            debug!(
                "decoded pattern {}: {} segments, duration {}, repeated {} times",
                i,
                segments.len(),
                duration,
                repeat_count
            );
            patterns.push(Pattern {
                segments,
                repeat_count,
                duration,
            });
        }

        Ok(Model {
            quantity,
            outer_repeat_count,
            total_duration,
            patterns,
        })
    }

    /// Parse JSON text and decode it.
    pub fn from_json_str(text: &str, quantity: Quantity) -> Result<Model, ModelError> {
        let document: serde_json::Value = serde_json::from_str(text)?;
        Model::decode(&document, quantity)
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn total_duration(&self) -> i32 {
        self.total_duration
    }

    pub fn outer_repeat_count(&self) -> i32 {
        self.outer_repeat_count
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn repeat_count(&self, i: usize) -> Result<i32, ModelError> {
        self.get(i).map(Pattern::repeat_count)
    }

    pub fn pattern_duration(&self, i: usize) -> Result<i32, ModelError> {
        self.get(i).map(Pattern::duration)
    }

    /// Segments of pattern `i` in playback order.
    pub fn pattern(&self, i: usize) -> Result<&[Segment], ModelError> {
        self.get(i).map(Pattern::segments)
    }

    fn get(&self, i: usize) -> Result<&Pattern, ModelError> {
        self.patterns.get(i).ok_or(ModelError::IndexOutOfRange {
            index: i,
            bound: self.patterns.len(),
        })
    }

    /// Write the diagnostic dump to the log at `info` level.
    pub fn log_status(&self) {
        for line in self.to_string().lines() {
            info!("{}", line);
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repeat_counts: Vec<i32> = self.patterns.iter().map(Pattern::repeat_count).collect();
        let durations: Vec<i32> = self.patterns.iter().map(Pattern::duration).collect();
        writeln!(f, "Quantity: {}", self.quantity)?;
        writeln!(f, "Outer repeat count: {}", self.outer_repeat_count)?;
        writeln!(f, "Total duration: {}", self.total_duration)?;
        writeln!(f, "Number of patterns: {}", self.patterns.len())?;
        writeln!(f, "Pattern repeat counts: {:?}", repeat_counts)?;
        write!(f, "Pattern durations: {:?}", durations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ACTIVE_SAMPLE, REACTIVE_SAMPLE};
    use serde_json::json;

    fn assert_derived_fields(model: &Model) {
        assert_eq!(model.pattern_count(), model.patterns().len());
        let mut total = 0;
        for i in 0..model.pattern_count() {
            let sum: i32 = model.pattern(i).unwrap().iter().map(|s| s.duration).sum();
            assert_eq!(model.pattern_duration(i).unwrap(), sum);
            total += model.repeat_count(i).unwrap() * sum;
        }
        assert_eq!(model.total_duration(), total);
    }

    #[test]
    fn test_active_sample() {
        let model = Model::from_json_str(ACTIVE_SAMPLE, Quantity::Active).unwrap();
        assert_eq!(model.quantity(), Quantity::Active);
        assert_eq!(model.pattern_count(), 2);
        assert_eq!(model.pattern_duration(0).unwrap(), 111);
        assert_eq!(model.pattern_duration(1).unwrap(), 111);
        assert_eq!(model.total_duration(), 222);
        assert_eq!(model.pattern(0).unwrap()[0].value, 140.0);
        assert_eq!(model.pattern(1).unwrap()[2].value, 5.0);
        assert_derived_fields(&model);
    }

    #[test]
    fn test_reactive_sample_matches_active() {
        let active = Model::from_json_str(ACTIVE_SAMPLE, Quantity::Active).unwrap();
        let reactive = Model::from_json_str(REACTIVE_SAMPLE, Quantity::Reactive).unwrap();
        assert_eq!(reactive.pattern_count(), 2);
        assert_eq!(reactive.total_duration(), 222);
        assert_eq!(reactive.patterns(), active.patterns());
        assert_derived_fields(&reactive);
    }

    #[test]
    fn test_wrong_quantity_key() {
        let err = Model::from_json_str(ACTIVE_SAMPLE, Quantity::Reactive).unwrap_err();
        assert!(matches!(
            err,
            ModelError::MalformedDocument { ref field, .. } if field == "q"
        ));
    }

    #[test]
    fn test_pattern_repeat_multiplies_total() {
        let doc = json!({"n": 1, "params": [{"n": 2, "values": [{"p": 3.5, "d": 10, "s": 0.1}]}]});
        let model = Model::decode(&doc, Quantity::Active).unwrap();
        assert_eq!(model.pattern_duration(0).unwrap(), 10);
        assert_eq!(model.repeat_count(0).unwrap(), 2);
        assert_eq!(model.total_duration(), 20);
        assert_eq!(model.pattern(0).unwrap()[0].noise, 0.1);
    }

    #[test]
    fn test_outer_repeat_count_does_not_scale_total() {
        // The top-level count is exposed but not folded into the total.
        let doc = json!({"n": 5, "params": [{"n": 1, "values": [{"p": 1, "d": 10, "s": 0}]}]});
        let model = Model::decode(&doc, Quantity::Active).unwrap();
        assert_eq!(model.outer_repeat_count(), 5);
        assert_eq!(model.total_duration(), 10);
    }

    #[test]
    fn test_empty_params() {
        let doc = json!({"n": 0, "params": []});
        let model = Model::decode(&doc, Quantity::Active).unwrap();
        assert_eq!(model.pattern_count(), 0);
        assert_eq!(model.total_duration(), 0);
        assert!(matches!(
            model.pattern(0),
            Err(ModelError::IndexOutOfRange { index: 0, bound: 0 })
        ));
    }

    #[test]
    fn test_empty_values() {
        let doc = json!({"n": 0, "params": [{"n": 4, "values": []}]});
        let model = Model::decode(&doc, Quantity::Active).unwrap();
        assert_eq!(model.pattern_count(), 1);
        assert_eq!(model.pattern_duration(0).unwrap(), 0);
        assert!(model.pattern(0).unwrap().is_empty());
        assert_eq!(model.total_duration(), 0);
    }

    #[test]
    fn test_integer_and_float_values_agree() {
        let as_int = json!({"n": 0, "params": [{"n": 1, "values": [{"p": 140, "d": 20, "s": 0}]}]});
        let as_float =
            json!({"n": 0, "params": [{"n": 1, "values": [{"p": 140.0, "d": 20, "s": 0.0}]}]});
        let a = Model::decode(&as_int, Quantity::Active).unwrap();
        let b = Model::decode(&as_float, Quantity::Active).unwrap();
        assert_eq!(a.pattern(0).unwrap()[0].value, 140.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_duration() {
        let doc = json!({"n": 0, "params": [{"n": 1, "values": [
            {"p": 1.0, "d": 5, "s": 0.0},
            {"p": 2.0, "s": 0.0}
        ]}]});
        match Model::decode(&doc, Quantity::Active) {
            Err(ModelError::MalformedDocument { field, reason }) => {
                assert_eq!(field, "d");
                assert!(reason.contains("params[0].values[1]"));
            }
            other => panic!("expected malformed document, got {:?}", other),
        }
    }

    #[test]
    fn test_shape_errors() {
        let cases = [
            (json!({"params": []}), "n"),
            (json!({"n": 1.0, "params": []}), "n"),
            (json!({"n": 0}), "params"),
            (json!({"n": 0, "params": null}), "params"),
            (json!({"n": 0, "params": [{"values": []}]}), "n"),
            (json!({"n": 0, "params": [{"n": 1}]}), "values"),
            (json!({"n": 0, "params": [{"n": 1, "values": 3}]}), "values"),
            (json!({"n": 0, "params": [{"n": 1, "values": [{"p": 1, "d": 2.5, "s": 0}]}]}), "d"),
            (json!({"n": 0, "params": [{"n": 1, "values": [{"p": "1", "d": 2, "s": 0}]}]}), "p"),
            (json!({"n": 0, "params": [{"n": 1, "values": [{"p": 1, "d": 2}]}]}), "s"),
        ];
        for (doc, expected) in cases {
            match Model::decode(&doc, Quantity::Active) {
                Err(ModelError::MalformedDocument { field, .. }) => assert_eq!(field, expected),
                other => panic!("{}: expected malformed `{}`, got {:?}", doc, expected, other),
            }
        }
    }

    #[test]
    fn test_negative_values_are_kept() {
        let doc = json!({"n": -1, "params": [{"n": -2, "values": [{"p": -5, "d": -3, "s": 0}]}]});
        let model = Model::decode(&doc, Quantity::Active).unwrap();
        assert_eq!(model.outer_repeat_count(), -1);
        assert_eq!(model.pattern_duration(0).unwrap(), -3);
        assert_eq!(model.total_duration(), 6);
        assert_derived_fields(&model);
    }

    #[test]
    fn test_duration_overflow() {
        let doc = json!({"n": 0, "params": [
            {"n": 1, "values": [{"p": 1, "d": 1, "s": 0}]},
            {"n": 2, "values": [{"p": 1, "d": i32::MAX, "s": 0}]}
        ]});
        assert!(matches!(
            Model::decode(&doc, Quantity::Active),
            Err(ModelError::DurationOverflow { pattern: 1 })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Model::from_json_str("{\"n\": ", Quantity::Active),
            Err(ModelError::Json(_))
        ));
    }

    #[test]
    fn test_decode_is_deterministic() {
        let a = Model::from_json_str(ACTIVE_SAMPLE, Quantity::Active).unwrap();
        let b = Model::from_json_str(ACTIVE_SAMPLE, Quantity::Active).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_status_dump() {
        let model = Model::from_json_str(ACTIVE_SAMPLE, Quantity::Active).unwrap();
        let expected = "Quantity: active\n\
                        Outer repeat count: 0\n\
                        Total duration: 222\n\
                        Number of patterns: 2\n\
                        Pattern repeat counts: [1, 1]\n\
                        Pattern durations: [111, 111]";
        assert_eq!(model.to_string(), expected);
    }

    #[test]
    fn test_index_out_of_range() {
        let model = Model::from_json_str(ACTIVE_SAMPLE, Quantity::Active).unwrap();
        assert!(model.repeat_count(1).is_ok());
        assert!(matches!(
            model.repeat_count(2),
            Err(ModelError::IndexOutOfRange { index: 2, bound: 2 })
        ));
        assert!(model.pattern_duration(7).is_err());
    }

    #[test]
    fn test_serialize() {
        let doc = json!({"n": 1, "params": [{"n": 2, "values": [{"q": 3, "d": 4, "s": 0.5}]}]});
        let model = Model::decode(&doc, Quantity::Reactive).unwrap();
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(
            value,
            json!({
                "quantity": "reactive",
                "outer_repeat_count": 1,
                "total_duration": 8,
                "patterns": [{
                    "segments": [{"value": 3.0, "duration": 4, "noise": 0.5}],
                    "repeat_count": 2,
                    "duration": 4
                }]
            })
        );
    }
}
