//! Expansion of a model into a timestamped per-minute CSV series.

use anyhow::Context;
use chrono::NaiveDateTime;
use cpm_data::playback::{self, TimedValue};
use cpm_model::Model;
use log::{info, warn};
use std::io::Write;

/// Format of `--start` and of the timestamp column: "YYYY-MM-DD HH:MM"
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const DEFAULT_START: &str = "2000-01-01 00:00";

/// Expand `model` and write the series to `output`.
///
/// `cycles` overrides the model's outer repeat count.
pub fn run_expand(
    model: &Model,
    output: &str,
    start: &str,
    cycles: Option<i32>,
) -> anyhow::Result<()> {
    let start = NaiveDateTime::parse_from_str(start, TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid start timestamp {:?}, expected YYYY-MM-DD HH:MM", start))?;
    let cycles = cycles.unwrap_or_else(|| model.outer_repeat_count());
    let series = playback::expand_series(model, cycles);
    if series.is_empty() {
        warn!("Expansion of {} cycles produced no samples", cycles);
    }
    let timed = playback::timed_series(&series, start, 1);

    let file = std::fs::File::create(output)
        .with_context(|| format!("failed to create output file {}", output))?;
    write_series(file, &timed)?;
    info!("Wrote {} samples ({} cycles) to {}", timed.len(), cycles, output);
    Ok(())
}

/// Write `timestamp,value` rows, with a header, to `writer`.
pub fn write_series<W: Write>(writer: W, series: &[TimedValue]) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["timestamp", "value"])?;
    for sample in series {
        wtr.write_record([
            sample.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            sample.value.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
