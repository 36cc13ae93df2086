//! Human-readable and JSON dumps of a decoded model.

use cpm_data::summary;
use cpm_model::Model;

/// Print the diagnostic summary followed by per-cycle figures.
pub fn run_status(model: &Model) -> anyhow::Result<()> {
    model.log_status();
    println!("{}", status_report(model));
    Ok(())
}

pub fn run_inspect(model: &Model, pretty: bool) -> anyhow::Result<()> {
    println!("{}", inspect_report(model, pretty)?);
    Ok(())
}

pub fn status_report(model: &Model) -> String {
    let peak = summary::peak_value(model)
        .map(|p| p.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "{}\nCycle energy: {}\nPeak value: {}",
        model,
        summary::cycle_energy(model),
        peak
    )
}

pub fn inspect_report(model: &Model, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(model)?
    } else {
        serde_json::to_string(model)?
    };
    Ok(json)
}
