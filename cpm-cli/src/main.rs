//! CPM CLI - Command line tool for appliance consumption models.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "cpm-cli",
    version,
    about = "Appliance consumption pattern model toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: cpm_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("starting cpm-cli");
    cpm_cmd::run(cli.command)
}
