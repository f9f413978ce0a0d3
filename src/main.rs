use std::time::Instant;

use clap::Parser;
use log::{debug, error, info};
use polars::frame::DataFrame;
use sysinfo::{get_current_pid, ProcessExt, System, SystemExt};

use heart_dashboard::config::{init_logging, Command, DashboardArgs, ServeArgs};
use heart_dashboard::export::to_csv_bytes;
use heart_dashboard::{load_patients, render, server, Result, Selection, ViewSummary};

/// Resident memory of this process in bytes, or 0 when it cannot be read.
fn monitor_memory() -> u64 {
    let Ok(pid) = get_current_pid() else {
        return 0;
    };
    let mut sys = System::new();
    sys.refresh_process(pid);
    sys.process(pid).map(|p| p.memory()).unwrap_or(0)
}

async fn run(args: DashboardArgs, df: DataFrame) -> Result<()> {
    match args.command() {
        Command::Serve(ServeArgs { bind }) => {
            let listener = server::bind(&bind)?;
            // tiny_http blocks on recv
            tokio::task::spawn_blocking(move || server::serve(listener, df))
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        }
        Command::Render { option, output } => {
            let chosen = Selection::parse(&option).resolve();
            let html = render(&df, chosen)?.to_html();
            match output {
                Some(path) => {
                    tokio::fs::write(&path, html).await?;
                    info!("wrote {} page to {}", chosen.label(), path.display());
                }
                None => println!("{html}"),
            }
        }
        Command::Export { output } => {
            let bytes = to_csv_bytes(&df)?;
            tokio::fs::write(&output, bytes).await?;
            info!("exported {} rows to {}", df.height(), output.display());
        }
        Command::Summary => {
            let summary = ViewSummary::from_table(&df)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = DashboardArgs::parse();
    init_logging(args.log_level());
    debug!("Arguments {:#?}", args);

    let start_time = Instant::now();
    let start_memory = monitor_memory();

    let df = match load_patients(&args.data).await {
        Ok(df) => df,
        Err(err) => {
            error!("could not load {}: {err}", args.data.display());
            std::process::exit(1);
        }
    };

    let end_memory = monitor_memory();
    info!(
        "loaded {} patients in {:?}, memory used: {} bytes",
        df.height(),
        start_time.elapsed(),
        end_memory.saturating_sub(start_memory)
    );

    if let Err(err) = run(args, df).await {
        error!("{err}");
        std::process::exit(1);
    }
}
