use clap::Parser;
use folder_cleaner::cli::{Cli, run_cli};

fn main() {
    let cli = Cli::parse();
    cli.setup_logging();

    match run_cli(&cli) {
        Ok(outcome) if outcome.is_failure() => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
