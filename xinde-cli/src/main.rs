mod cli;
mod commands;
mod config;
mod error;

use clap::error::ErrorKind;
use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use error::Result;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            // Wrong arguments print the usage and are not treated as a failure
            _ => {
                let _ = e.print();
                return;
            }
        },
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red(), error::error_chain(&e));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::SignUrl { url, app_secret } => commands::sign_url(&url, &app_secret, cli.json),
        Commands::CreateTaskDemo {
            app_id,
            app_secret,
            name,
            id_number,
        } => commands::create_task_demo(
            cli.base_url,
            &app_id,
            &app_secret,
            &name,
            &id_number,
            cli.json,
        ),
        Commands::GetTaskStatus {
            task_id,
            app_id,
            app_secret,
        } => commands::get_task_status(cli.base_url, &task_id, &app_id, &app_secret, cli.json),
        Commands::Config { command } => commands::handle_config_command(command, cli.json),
    }
}
