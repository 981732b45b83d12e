use std::process::ExitCode;

use aa_app::{cli, pipeline};
use clap::Parser;

fn main() -> ExitCode {
    // 1. Parser CLI (--help → 0, argument invalide → 1)
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // 2. Config : défauts < fichier TOML < CLI
    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Erreur : {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // 3. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_filter(config.verbose))
        .init();
    log::debug!("Configuration : {config:?}");

    // 4. Pipeline
    match pipeline::run(&config) {
        Ok(report) => {
            log::debug!("{report:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Erreur : {e:#}");
            ExitCode::FAILURE
        }
    }
}
