use clap::Parser;
use colored::*;
use eyre::Result;

use gwscan_base::settings::Settings;
use gwscan_cli::cli::args::Args;
use gwscan_cli::cli::cmd::ExecuteCliCmd;

fn main() -> Result<()> {
    color_eyre::install()?;

    if let Err(err) = run() {
        println!("{}", "Failed".red().underline());
        eprintln!("{}", format!("{err:?}").red());
        std::process::exit(1);
    }

    Ok(())
}

fn run() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load("cli")?;
    settings.tracing.start_tracing()?;
    args.command.execute(&settings)
}
