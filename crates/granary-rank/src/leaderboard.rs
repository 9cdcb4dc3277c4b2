//! Named, memoized leaderboard projections over one harvest.

use std::collections::HashMap;

use granary_registry::{CrateRecord, TaxonomyEntry};

use crate::top_indices;

/// One taxonomy entry with its id, as loaded from the taxonomy files.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyRow {
    pub id: String,
    pub entry: TaxonomyEntry,
}

/// Ranked views over a completed harvest, one instance per run.
///
/// Each named projection is computed once per `(projection, n)` and cached.
/// The cache is keyed by projection identity only, so the owned collections
/// must not change after construction; build a fresh `Leaderboards` when the
/// underlying files change.
pub struct Leaderboards {
    crates: Vec<CrateRecord>,
    categories: Vec<TaxonomyRow>,
    keywords: Vec<TaxonomyRow>,
    size: usize,
    cache: HashMap<(&'static str, usize), Vec<usize>>,
}

impl Leaderboards {
    #[must_use]
    pub fn new(
        crates: Vec<CrateRecord>,
        categories: Vec<TaxonomyRow>,
        keywords: Vec<TaxonomyRow>,
        size: usize,
    ) -> Self {
        Self {
            crates,
            categories,
            keywords,
            size,
            cache: HashMap::new(),
        }
    }

    /// Most recently created crates.
    pub fn new_crates(&mut self) -> Vec<&CrateRecord> {
        self.ranked_crates("new_crates", |record| record.created_at)
    }

    /// Most downloaded crates, all time.
    pub fn most_downloaded(&mut self) -> Vec<&CrateRecord> {
        self.ranked_crates("most_downloaded", |record| record.downloads_all)
    }

    /// Most recently updated crates.
    pub fn just_updated(&mut self) -> Vec<&CrateRecord> {
        self.ranked_crates("just_updated", |record| record.updated_at)
    }

    /// Most downloaded crates over the recent window.
    pub fn most_recent_downloads(&mut self) -> Vec<&CrateRecord> {
        self.ranked_crates("most_recent_downloads", |record| record.downloads_recent)
    }

    /// Categories referenced by the most crates.
    pub fn popular_categories(&mut self) -> Vec<&TaxonomyRow> {
        let order = self.ranked_order("popular_categories", Collection::Categories);
        order.iter().map(|&index| &self.categories[index]).collect()
    }

    /// Keywords referenced by the most crates.
    pub fn popular_keywords(&mut self) -> Vec<&TaxonomyRow> {
        let order = self.ranked_order("popular_keywords", Collection::Keywords);
        order.iter().map(|&index| &self.keywords[index]).collect()
    }

    fn ranked_crates<K, F>(&mut self, name: &'static str, key: F) -> Vec<&CrateRecord>
    where
        K: PartialOrd,
        F: Fn(&CrateRecord) -> K,
    {
        let cache_key = (name, self.size);
        if !self.cache.contains_key(&cache_key) {
            let order = top_indices(&self.crates, self.size, key);
            self.cache.insert(cache_key, order);
        }
        self.cache[&cache_key]
            .iter()
            .map(|&index| &self.crates[index])
            .collect()
    }

    fn ranked_order(&mut self, name: &'static str, collection: Collection) -> Vec<usize> {
        let cache_key = (name, self.size);
        if !self.cache.contains_key(&cache_key) {
            let rows = match collection {
                Collection::Categories => &self.categories,
                Collection::Keywords => &self.keywords,
            };
            let order = top_indices(rows, self.size, |row| row.entry.count);
            self.cache.insert(cache_key, order);
        }
        self.cache[&cache_key].clone()
    }
}

#[derive(Clone, Copy)]
enum Collection {
    Categories,
    Keywords,
}
