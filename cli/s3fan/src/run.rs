//! Main execution logic for the s3fan CLI.

use anyhow::{Context, Result};
use sf_lister::s3::{create_client, HttpSettings, S3Config};
use sf_lister::{ObjectStore, SdkStore, SinkMode, Traversal, TraversalConfig, TraversalSummary};
use tracing::{debug, warn};

use crate::args::{Cli, Command, ListObjectsArgs, OutputArg};

/// Execute the parsed command line.
pub async fn execute(cli: Cli) -> Result<TraversalSummary> {
    match &cli.command {
        Command::ListObjects(args) => list_objects(&cli, args).await,
    }
}

async fn list_objects(cli: &Cli, args: &ListObjectsArgs) -> Result<TraversalSummary> {
    let mut s3_config = S3Config::new().with_http(HttpSettings {
        insecure_tls: cli.no_verify_ssl,
        ..HttpSettings::default()
    });

    if let Some(endpoint) = &cli.endpoint_url {
        s3_config = s3_config.with_endpoint(endpoint);
    }
    if let Some(profile) = &cli.profile {
        s3_config = s3_config.with_profile(profile);
    }
    if let Some(region) = &cli.region {
        s3_config = s3_config.with_region(region);
    }

    let client = create_client(&s3_config).await.context("session creation")?;
    let store = SdkStore::new(client);

    // One region lookup up front; listing against the wrong region costs a
    // redirect on every request.
    let store = match store.bucket_region(&args.bucket).await {
        Ok(Some(region)) if Some(&region) != cli.region.as_ref() => {
            debug!(bucket = %args.bucket, region = %region, "rebinding client to bucket region");
            let rebound = create_client(&s3_config.with_region(region))
                .await
                .context("session creation")?;
            SdkStore::new(rebound)
        }
        Ok(_) => store,
        Err(e) if e.is_fatal() => {
            return Err(e).context("bucket location");
        }
        Err(e) => {
            warn!(bucket = %args.bucket, error = %e, "bucket location lookup failed, keeping configured region");
            store
        }
    };

    let mode = if cli.count_only() {
        SinkMode::Count
    } else {
        match cli.output {
            OutputArg::Text => SinkMode::Text,
            OutputArg::Json => SinkMode::Json,
        }
    };

    let config = TraversalConfig::new().with_target_partitions(args.prefix_count);
    let traversal = Traversal::new(store, &args.bucket, config, mode);

    traversal.run().await.context("listing objects")
}
