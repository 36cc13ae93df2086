//! Command implementations for the CPM CLI.
//!
//! Provides subcommands for decoding a consumption model document, dumping
//! its structure, and expanding it into a timestamped CSV series.

use anyhow::Context;
use clap::Subcommand;
use cpm_model::{Model, Quantity};
use log::info;

pub mod expand;
pub mod report;

#[derive(Subcommand)]
pub enum Command {
    /// Print the diagnostic summary of a model document
    Status {
        /// Path to the model document (JSON)
        #[arg(short = 'm', long)]
        model: String,

        /// Quantity carried by the segments: active (p) or reactive (q)
        #[arg(short = 'q', long, default_value = "active")]
        quantity: Quantity,
    },

    /// Print a decoded model document as JSON
    Inspect {
        /// Path to the model document (JSON)
        #[arg(short = 'm', long)]
        model: String,

        /// Quantity carried by the segments: active (p) or reactive (q)
        #[arg(short = 'q', long, default_value = "active")]
        quantity: Quantity,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Expand a model into a per-minute `timestamp,value` CSV
    Expand {
        /// Path to the model document (JSON)
        #[arg(short = 'm', long)]
        model: String,

        /// Quantity carried by the segments: active (p) or reactive (q)
        #[arg(short = 'q', long, default_value = "active")]
        quantity: Quantity,

        /// Output path for the series CSV
        #[arg(short = 'o', long)]
        output: String,

        /// Timestamp of the first sample, "YYYY-MM-DD HH:MM"
        #[arg(long, default_value = expand::DEFAULT_START)]
        start: String,

        /// Number of cycles to replay (defaults to the model's outer repeat count)
        #[arg(long)]
        cycles: Option<i32>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Status { model, quantity } => {
            let model = load_model(&model, quantity)?;
            report::run_status(&model)
        }
        Command::Inspect {
            model,
            quantity,
            pretty,
        } => {
            let model = load_model(&model, quantity)?;
            report::run_inspect(&model, pretty)
        }
        Command::Expand {
            model,
            quantity,
            output,
            start,
            cycles,
        } => {
            let model = load_model(&model, quantity)?;
            expand::run_expand(&model, &output, &start, cycles)
        }
    }
}

/// Read and decode a model document from disk.
pub fn load_model(path: &str, quantity: Quantity) -> anyhow::Result<Model> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model document {}", path))?;
    let model = Model::from_json_str(&text, quantity)
        .with_context(|| format!("failed to decode {} model from {}", quantity, path))?;
    info!(
        "Loaded {} model from {}: {} patterns, total duration {}",
        quantity,
        path,
        model.pattern_count(),
        model.total_duration()
    );
    Ok(model)
}
