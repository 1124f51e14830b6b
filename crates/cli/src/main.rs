mod cli;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use inventory_core::{Config, load_dataset, load_env_file};
use inventory_store::{InventoryStore, replies_to_json, reply_to_json, scenario};

use crate::cli::CliArgs;
use crate::output::Output;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only results.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let out = Output::new(args.compact);

    load_env_file(&args.env_file);
    let mut config = match args.profile.as_deref() {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    if let Some(path) = args.data {
        config.dataset.path = path;
    }
    config.log_summary();

    let dataset = load_dataset(&config.dataset.path)
        .with_context(|| format!("failed to load dataset {}", config.dataset.path.display()))?;

    // Connector
    let mut store = InventoryStore::connect(&config.redis)
        .await
        .context("failed to connect to redis")?;
    store.ping().await.context("redis did not answer PING")?;

    if args.reset
        && store
            .drop_index_if_exists()
            .await
            .context("failed to drop index")?
    {
        info!(index = %store.index_name(), "previous index dropped");
    }

    // Loader
    out.section("create", true);
    let count = scenario::create(&mut store, &dataset)
        .await
        .context("failed to load documents and create index")?;
    out.json(&count)?;
    scenario::wait_for_index(&mut store, count)
        .await
        .context("failed waiting for index")?;

    // Query runner
    out.section("read", false);
    for (name, result) in scenario::run_reads(&mut store).await.context("search failed")? {
        out.label(name);
        out.json(&result)?;
    }

    // Mutator
    out.section("update", false);
    out.label("update_1");
    out.json(&replies_to_json(&scenario::update_1(&mut store).await.context(failed("update_1"))?))?;
    out.label("update_2");
    out.json(&reply_to_json(&scenario::update_2(&mut store).await.context(failed("update_2"))?))?;
    out.label("update_3");
    out.json(&reply_to_json(&scenario::update_3(&mut store).await.context(failed("update_3"))?))?;
    out.label("update_4");
    out.json(&reply_to_json(&scenario::update_4(&mut store).await.context(failed("update_4"))?))?;

    out.section("delete", false);
    out.json(&reply_to_json(&scenario::delete(&mut store).await.context(failed("delete"))?))?;

    info!("walkthrough complete");
    Ok(())
}

fn failed(step: &str) -> String {
    format!("{} failed", step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_store::StoreError;

    #[test]
    fn test_step_context_wraps_store_error() {
        let err: Result<(), StoreError> = Err(StoreError::UnexpectedReply {
            command: "JSON.NUMINCRBY".to_string(),
            detail: "nil".to_string(),
        });
        let err = err.context(failed("update_1")).unwrap_err();

        assert_eq!(err.to_string(), "update_1 failed");
        let chain = format!("{:#}", err);
        assert!(chain.starts_with("update_1 failed: "), "unexpected chain: {}", chain);
        assert!(chain.contains("JSON.NUMINCRBY"), "unexpected chain: {}", chain);
    }
}
