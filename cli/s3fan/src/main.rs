//! s3fan CLI
//!
//! Fast parallel listing for S3 buckets with high object counts.

use clap::Parser;
use sf_cli_common::init_logging;

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let count_only = cli.count_only();

    init_logging(cli.log_level())?;

    let summary = run::execute(cli).await?;

    if count_only {
        println!("item count={}", summary.objects_emitted);
    }

    tracing::debug!(
        objects = summary.objects_emitted,
        bytes = %summary.bytes_display(),
        partitions = summary.partitions,
        "done"
    );

    Ok(())
}
