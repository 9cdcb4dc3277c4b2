//! Handle `granary harvest`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use granary_config::GranaryConfig;
use granary_registry::{
    CrateRecord, HarvestOptions, Harvester, RegistryClient, RetryPolicy, TaxonomyRegistry,
};
use granary_store::{epoch_now, Datastore, RunMeta};

use crate::cli::{GlobalFlags, HarvestArgs};
use crate::git;
use crate::progress::Progress;

pub async fn handle(
    args: &HarvestArgs,
    config: &GranaryConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let options = HarvestOptions {
        per_page: args.per_page.unwrap_or(config.harvest.per_page),
        sort: args
            .sort
            .clone()
            .unwrap_or_else(|| config.harvest.sort.clone()),
        page_delay: args
            .page_delay
            .map_or_else(|| config.harvest.page_delay(), Duration::from_secs_f64),
        detail_delay: args
            .detail_delay
            .map_or_else(|| config.harvest.detail_delay(), Duration::from_secs_f64),
        enrich: config.harvest.enrich && !args.no_enrich,
    };
    let policy = RetryPolicy {
        max_attempts: args.max_attempts.unwrap_or(config.fetch.max_attempts),
        backoff: args
            .backoff
            .map_or_else(|| config.fetch.backoff(), Duration::from_secs_f64),
        timeout: config.fetch.timeout(),
    };

    let root = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));
    let store = Datastore::new(root);
    store
        .create_dirs()
        .with_context(|| format!("failed to create output directory {}", store.root().display()))?;

    let harvester = Harvester::new(RegistryClient::new(policy), options);
    let mut taxonomy = TaxonomyRegistry::new();

    let started = epoch_now();
    let mut writer = store
        .record_writer()
        .context("failed to open crates.txt for writing")?;

    let mut run = harvester
        .begin(&mut taxonomy)
        .await
        .context("failed to determine catalog size (meta.total)")?;
    tracing::info!(
        total = run.total(),
        pages = run.page_count(),
        "starting harvest"
    );

    let bar = Progress::bar(u64::from(run.page_count()), "harvesting pages", !flags.quiet);
    let mut sink = |record: CrateRecord| writer.write(&record);
    while let Some(outcome) = run.next_page(&mut sink).await? {
        bar.inc(1);
        if outcome.failed {
            bar.set_message(&format!("page {} failed; continuing", outcome.page));
        }
    }
    let report = run.finish();
    writer.finish().context("failed to flush crates.txt")?;
    bar.finish_ok("harvest complete");

    store
        .write_taxonomy(&taxonomy)
        .context("failed to write taxonomy files")?;
    store
        .write_run_meta(RunMeta {
            start: started,
            end: epoch_now(),
        })
        .context("failed to write time.json")?;

    if !report.failed_pages.is_empty() {
        tracing::warn!(
            pages = ?report.failed_pages,
            "some pages failed after retries; their items are missing from this run"
        );
    }
    if !flags.quiet {
        println!(
            "harvested {} of {} crates across {} pages into {}",
            report.yielded,
            report.total,
            report.page_count,
            store.root().display()
        );
    }

    if args.commit || config.output.auto_commit {
        git::commit_snapshot(store.root(), &config.output.commit_message).await?;
    }
    Ok(())
}
