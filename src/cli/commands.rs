use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nt",
    about = concat!("nt v", env!("CARGO_PKG_VERSION"), " - an agenda for your markdown notes"),
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Workspace directory
    #[arg(short = 'C', long = "dir", env = "NOTEDOWN_DIR", global = true)]
    pub dir: Option<PathBuf>,

    /// Use this date (YYYY-MM-DD) as today
    #[arg(long, env = "TEST_DATE", global = true, hide = true)]
    pub date: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show open work due by today and what was finished today
    Agenda,
    /// List projects, open then closed
    Projects,
}
