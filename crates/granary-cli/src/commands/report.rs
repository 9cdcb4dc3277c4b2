//! Handle `granary report`.

use std::path::PathBuf;

use anyhow::Context;

use granary_config::GranaryConfig;
use granary_rank::{Leaderboards, TaxonomyRow};
use granary_registry::CrateRecord;
use granary_store::Datastore;

use crate::cli::{GlobalFlags, ReportArgs};
use crate::render;

const SITE: &str = "https://crates.io";

pub fn handle(
    args: &ReportArgs,
    config: &GranaryConfig,
    _flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let root = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));
    let store = Datastore::new(root);

    let crates = store
        .read_crates()
        .with_context(|| format!("failed to read {}", store.crates_path().display()))?;
    let categories = taxonomy_rows(store.read_categories()?);
    let keywords = taxonomy_rows(store.read_keywords()?);

    let size = args.size.unwrap_or(config.report.size);
    let mut boards = Leaderboards::new(crates, categories, keywords, size);

    let new_crates = crate_cells(&boards.new_crates());
    let most_downloaded = crate_cells(&boards.most_downloaded());
    let just_updated = crate_cells(&boards.just_updated());
    let most_recent_downloads = crate_cells(&boards.most_recent_downloads());
    let popular_keywords = taxonomy_cells(&boards.popular_keywords(), "keywords");
    let popular_categories = taxonomy_cells(&boards.popular_categories(), "categories");

    let table = render::render_markdown(
        &[
            "New Crates",
            "Most Downloaded",
            "Just Updated",
            "Most Recent Downloads",
            "Popular Keywords",
            "Popular Categories",
        ],
        &[
            new_crates,
            most_downloaded,
            just_updated,
            most_recent_downloads,
            popular_keywords,
            popular_categories,
        ],
    );

    match &args.out {
        Some(path) => std::fs::write(path, format!("{table}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{table}"),
    }
    Ok(())
}

fn taxonomy_rows(
    entries: std::collections::BTreeMap<String, granary_registry::TaxonomyEntry>,
) -> Vec<TaxonomyRow> {
    entries
        .into_iter()
        .map(|(id, entry)| TaxonomyRow { id, entry })
        .collect()
}

fn crate_cells(records: &[&CrateRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            let name = record.name.as_deref().unwrap_or("?");
            let version = record.version_newest.as_deref().unwrap_or("?");
            format!("[`{name} = \"{version}\"`]({SITE}/crates/{name})")
        })
        .collect()
}

fn taxonomy_cells(rows: &[&TaxonomyRow], route: &str) -> Vec<String> {
    rows.iter()
        .map(|row| {
            let name = row.entry.name.as_deref().unwrap_or(&row.id);
            let count = row.entry.count.unwrap_or(0);
            let date = row
                .entry
                .timestamp
                .and_then(format_date)
                .unwrap_or_else(|| "?".to_owned());
            format!(
                "[`{name} ({count} crates) @ {date}`]({SITE}/{route}/{id})",
                id = row.id
            )
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn format_date(timestamp: f64) -> Option<String> {
    chrono::DateTime::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.format("%Y/%m/%d").to_string())
}
