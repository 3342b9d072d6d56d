use std::io;

use clap::Parser;
use notetask::cli::commands::Cli;
use notetask::cli::handlers;
use notetask::io::config_io::load_config;
use notetask::io::logging::{init_file_logging, init_stderr_logging};

fn main() {
    let cli = Cli::parse();

    let Some(dir) = cli.dir.as_deref() else {
        eprintln!("error: no workspace directory; pass --dir or set NOTEDOWN_DIR");
        std::process::exit(1);
    };
    let config = match load_config(dir, cli.date) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        None => {
            // No subcommand → launch TUI; the terminal is taken, so log to a file
            init_file_logging(&config.log_file(), &config.file.log.level);
            notetask::tui::run(&config)
        }
        Some(command) => {
            init_stderr_logging();
            handlers::dispatch(command, &config, cli.json, &mut io::stdout().lock())
        }
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
