use std::path::PathBuf;
use std::process::ExitCode;

use aa_core::coverage::DEFAULT_TABLE_PATH;
use clap::Parser;

/// charcov — generates character coverage values for the specified font file.
#[derive(Parser, Debug)]
#[command(name = "charcov", version, about, long_about = None)]
struct Cli {
    /// Police à mesurer (TTF/OTF).
    #[arg(short = 'f', long, default_value = "/System/Library/Fonts/SFNSMono.ttf")]
    font: PathBuf,

    /// Table de couverture produite.
    #[arg(short = 'o', long, default_value = DEFAULT_TABLE_PATH)]
    output: PathBuf,

    /// Logging verbeux (niveau info).
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
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

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        })
        .init();

    match aa_charcov::build_table_file(&cli.font, &cli.output) {
        Ok(_) => {
            println!("Results written to {}", cli.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Erreur : {e}");
            ExitCode::FAILURE
        }
    }
}
