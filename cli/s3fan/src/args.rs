//! CLI argument definitions for s3fan.

use clap::{Parser, Subcommand, ValueEnum};
use sf_cli_common::LogLevel;

/// Fast S3 operations for buckets with high object counts.
///
/// Replaces certain S3 listings with parallel versions that partition the
/// bucket's key space and drain the partitions concurrently.
///
/// ## Examples
///
/// List a bucket:
///   s3fan list-objects --bucket my-bucket
///
/// Against an on-prem store:
///   s3fan --endpoint-url https://store.internal:9000 --no-verify-ssl \
///       list-objects --bucket archive --prefix-count 800
#[derive(Parser, Debug)]
#[command(name = "s3fan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Connection ===
    /// Override the default endpoint URL
    #[arg(long, global = true, env = "S3FAN_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Use a specific profile from the credential file
    #[arg(long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// The region to use; overrides config/env settings
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub no_verify_ssl: bool,

    // === Output ===
    /// The formatting style for command output
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub output: OutputArg,

    // === Logging ===
    /// Turn on progress output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Turn on debug output; suppresses per-object lines and prints a
    /// final count instead
    #[arg(long, global = true, hide = true)]
    pub debug: bool,

    /// Turn on trace output
    #[arg(long, global = true, hide = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every object in a bucket via parallel prefix partitioning
    ListObjects(ListObjectsArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListObjectsArgs {
    /// Bucket name to list (required)
    #[arg(long)]
    pub bucket: String,

    /// Partitioner target: stop splitting the key space once this many
    /// prefixes have been processed
    #[arg(long, default_value = "500")]
    pub prefix_count: usize,
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// One tab-separated line per object
    Text,
    /// One JSON document per line
    Json,
}

impl Cli {
    /// The log level implied by the verbosity flags; trace wins over debug
    /// wins over verbose.
    pub fn log_level(&self) -> LogLevel {
        if self.trace {
            LogLevel::Trace
        } else if self.debug {
            LogLevel::Debug
        } else if self.verbose {
            LogLevel::Verbose
        } else {
            LogLevel::Warn
        }
    }

    /// Debug and trace both switch the sink to counting.
    pub fn count_only(&self) -> bool {
        self.debug || self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_objects() {
        let cli = Cli::try_parse_from([
            "s3fan",
            "--verbose",
            "list-objects",
            "--bucket",
            "my-bucket",
            "--prefix-count",
            "800",
        ])
        .unwrap();

        assert_eq!(cli.log_level(), LogLevel::Verbose);
        assert!(!cli.count_only());
        let Command::ListObjects(args) = cli.command;
        assert_eq!(args.bucket, "my-bucket");
        assert_eq!(args.prefix_count, 800);
    }

    #[test]
    fn test_bucket_is_required() {
        let result = Cli::try_parse_from(["s3fan", "list-objects"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_implies_count_only() {
        let cli =
            Cli::try_parse_from(["s3fan", "--debug", "list-objects", "--bucket", "b"]).unwrap();
        assert_eq!(cli.log_level(), LogLevel::Debug);
        assert!(cli.count_only());
    }

    #[test]
    fn test_trace_outranks_debug() {
        let cli = Cli::try_parse_from([
            "s3fan",
            "--debug",
            "--trace",
            "list-objects",
            "--bucket",
            "b",
        ])
        .unwrap();
        assert_eq!(cli.log_level(), LogLevel::Trace);
    }
}
