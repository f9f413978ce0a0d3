use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use env_logger::{Builder, Env};
use log::LevelFilter;

use crate::export::EXPORT_FILE_NAME;

pub const DEFAULT_DATA_PATH: &str = "heart.csv";
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const LOG_ENV: &str = "HEART_LOG";

#[derive(Parser, Debug)]
#[command(author, version, about = "Heart failure dashboard over a patient CSV", long_about = None)]
#[command(propagate_version = true, args_conflicts_with_subcommands = true)]
pub struct DashboardArgs {
    #[arg(short, long, env = "HEART_DATA", default_value = DEFAULT_DATA_PATH, global = true, help = "Patient CSV to load")]
    pub data: PathBuf,
    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Verbose level")]
    pub verbose: u8,
    /// Used when no subcommand is given
    #[command(flatten)]
    pub serve: ServeArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ServeArgs {
    #[arg(short, long, env = "HEART_BIND", default_value = DEFAULT_BIND, help = "Address to listen on")]
    pub bind: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the dashboard over HTTP
    Serve(ServeArgs),
    /// Render one menu page as HTML
    Render {
        #[arg(long, default_value = "Homepage", help = "Menu label or slug")]
        option: String,
        #[arg(short, long, help = "Write to this file instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Write the CSV export
    Export {
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },
    /// Print row counts of every derived view as JSON
    Summary,
}

impl DashboardArgs {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_else(|| Command::Serve(self.serve.clone()))
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Logs this crate at the `-v` level; `HEART_LOG` can override per module.
pub fn init_logging(level: LevelFilter) {
    let env = Env::new().filter(LOG_ENV);
    let _ = Builder::new()
        .filter(Some("heart_dashboard"), level)
        .parse_env(env)
        .try_init();
}
