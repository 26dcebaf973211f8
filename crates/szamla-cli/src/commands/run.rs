//! Run command - poll the inbox on a schedule and process new invoices.

use std::path::Path;
use std::time::Duration;

use chrono::{Local, Timelike};
use clap::Args;
use console::style;
use tracing::{error, info};

use szamla_pipeline::{within_working_hours, Pipeline, PipelineConfig};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Override the check interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Ignore the working-hours window
    #[arg(long)]
    ignore_hours: bool,
}

pub async fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = PipelineConfig::load(config_path.map(Path::new))?;
    let interval = Duration::from_secs(args.interval.unwrap_or(config.schedule.interval_secs));

    let pipeline = Pipeline::from_config(&config).await?;

    println!("{} Invoice automation started", style("✓").green());
    info!("checking every {}s", interval.as_secs());

    loop {
        let now = Local::now();

        if args.ignore_hours || within_working_hours(now.hour(), &config.schedule) {
            info!("[{}] checking for new invoices", now.format("%Y-%m-%d %H:%M"));

            match pipeline.run_once().await {
                Ok(summary) if summary.mails_seen > 0 => {
                    println!(
                        "{} {} mail(s), {} document(s) processed, {} failure(s)",
                        style("ℹ").blue(),
                        summary.mails_seen,
                        summary.documents_processed,
                        summary.failures
                    );
                }
                Ok(_) => {}
                // A failed cycle never stops the loop; the next interval
                // retries from scratch.
                Err(e) => error!("cycle failed: {}", e),
            }
        } else {
            info!(
                "outside working hours ({}-{}); sleeping",
                config.schedule.start_hour, config.schedule.end_hour
            );
        }

        if args.once {
            break;
        }
        tokio::time::sleep(interval).await;
    }

    Ok(())
}
