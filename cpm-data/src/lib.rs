//! Playback and summaries of decoded consumption models.
//!
//! This crate turns the compact pattern structure of a [`Model`] into the
//! flat series that charting and simulation code work with.

use cpm_model::Model;

/// Replay of a model's patterns as segments and as per-minute series.
pub mod playback {
    use super::Model;
    use chrono::{NaiveDateTime, TimeDelta};
    use cpm_model::Segment;
    use log::warn;
    use serde::Serialize;
    use std::iter;

    /// A single timestamped sample of a series.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct TimedValue {
        pub timestamp: NaiveDateTime,
        pub value: f64,
    }

    /// Segments of one cycle in playback order.
    ///
    /// Each pattern's segments are yielded `repeat_count` times before moving
    /// on to the next pattern. Non-positive repeat counts yield nothing.
    pub fn cycle_segments(model: &Model) -> impl Iterator<Item = &Segment> + '_ {
        model.patterns().iter().flat_map(|pattern| {
            let times = pattern.repeat_count().max(0) as usize;
            iter::repeat(pattern.segments()).take(times).flatten()
        })
    }

    /// One cycle as a series with one sample per time unit.
    ///
    /// A segment of duration `d` contributes `d` copies of its value;
    /// non-positive durations contribute nothing.
    pub fn cycle_series(model: &Model) -> Vec<f64> {
        let mut series = Vec::new();
        for segment in cycle_segments(model) {
            let samples = segment.duration.max(0) as usize;
            series.extend(iter::repeat(segment.value).take(samples));
        }
        series
    }

    /// The cycle series repeated `cycles` times.
    pub fn expand_series(model: &Model, cycles: i32) -> Vec<f64> {
        if cycles <= 0 {
            warn!("expanding {} cycles yields an empty series", cycles);
            return Vec::new();
        }
        cycle_series(model).repeat(cycles as usize)
    }

    /// The full series, using the model's outer repeat count as the cycle count.
    pub fn model_series(model: &Model) -> Vec<f64> {
        expand_series(model, model.outer_repeat_count())
    }

    /// Attach timestamps to a series, `step_minutes` apart starting at `start`.
    ///
    /// Stops early if a timestamp would fall outside the representable range.
    pub fn timed_series(series: &[f64], start: NaiveDateTime, step_minutes: i64) -> Vec<TimedValue> {
        series
            .iter()
            .enumerate()
            .map_while(|(i, &value)| {
                let offset = TimeDelta::try_minutes(step_minutes.checked_mul(i as i64)?)?;
                let timestamp = start.checked_add_signed(offset)?;
                Some(TimedValue { timestamp, value })
            })
            .collect()
    }

}

/// Aggregate figures over one cycle of a model.
pub mod summary {
    use super::Model;

    /// Sum of `value * duration` over one cycle, honoring pattern repeat counts.
    ///
    /// For the active variant with minutes as the time unit this is energy in
    /// watt-minutes.
    pub fn cycle_energy(model: &Model) -> f64 {
        model
            .patterns()
            .iter()
            .map(|pattern| {
                let per_traversal: f64 = pattern
                    .segments()
                    .iter()
                    .map(|s| s.value * s.duration as f64)
                    .sum();
                pattern.repeat_count() as f64 * per_traversal
            })
            .sum()
    }

    /// Highest segment level in the model, or `None` when it has no segments.
    pub fn peak_value(model: &Model) -> Option<f64> {
        model
            .patterns()
            .iter()
            .flat_map(|pattern| pattern.segments())
            .map(|s| s.value)
            .fold(None, |peak: Option<f64>, v| Some(peak.map_or(v, |p| p.max(v))))
    }

}
