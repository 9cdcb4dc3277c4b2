//! # granary-store
//!
//! Flat-file persistence for one harvest run. The file names are part of the
//! external interface:
//!
//! - `crates.txt`: one compact JSON record per line, in harvest order.
//! - `categories.txt` / `keywords.txt`: one `"<id>\t{name,count,timestamp}"`
//!   line per taxonomy entry, sorted by id ascending for reproducible diffs.
//! - `time.json`: `{"start": <epoch secs>, "end": <epoch secs>}`.

mod error;
mod meta;

pub use error::StoreError;
pub use meta::{epoch_now, RunMeta};

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_jsonlines::JsonLinesWriter;

use granary_registry::{CrateRecord, TaxonomyEntry, TaxonomyKind, TaxonomyRegistry};

/// One output directory holding the materialized files of a harvest run.
#[derive(Debug, Clone)]
pub struct Datastore {
    root: PathBuf,
}

impl Datastore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the output directory (and parents) if missing.
    ///
    /// # Errors
    ///
    /// Propagates the filesystem error.
    pub fn create_dirs(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    #[must_use]
    pub fn crates_path(&self) -> PathBuf {
        self.root.join("crates.txt")
    }

    #[must_use]
    pub fn categories_path(&self) -> PathBuf {
        self.root.join("categories.txt")
    }

    #[must_use]
    pub fn keywords_path(&self) -> PathBuf {
        self.root.join("keywords.txt")
    }

    #[must_use]
    pub fn meta_path(&self) -> PathBuf {
        self.root.join("time.json")
    }

    /// Open `crates.txt` for writing (truncating any previous run).
    ///
    /// # Errors
    ///
    /// Propagates the filesystem error.
    pub fn record_writer(&self) -> Result<RecordWriter, StoreError> {
        let file = File::create(self.crates_path())?;
        Ok(RecordWriter {
            inner: JsonLinesWriter::new(BufWriter::new(file)),
        })
    }

    /// Read `crates.txt` back in file (harvest) order.
    ///
    /// # Errors
    ///
    /// Propagates filesystem and JSON decode errors.
    pub fn read_crates(&self) -> Result<Vec<CrateRecord>, StoreError> {
        let records = serde_jsonlines::json_lines(self.crates_path())?
            .collect::<io::Result<Vec<CrateRecord>>>()?;
        Ok(records)
    }

    /// Write both taxonomy snapshots, sorted by id.
    ///
    /// # Errors
    ///
    /// Propagates filesystem and JSON encode errors.
    pub fn write_taxonomy(&self, registry: &TaxonomyRegistry) -> Result<(), StoreError> {
        write_taxonomy_file(&self.categories_path(), registry.snapshot(TaxonomyKind::Category))?;
        write_taxonomy_file(&self.keywords_path(), registry.snapshot(TaxonomyKind::Keyword))?;
        Ok(())
    }

    /// Read `categories.txt`.
    ///
    /// # Errors
    ///
    /// Propagates filesystem errors; malformed lines surface as
    /// [`StoreError::MalformedLine`].
    pub fn read_categories(&self) -> Result<BTreeMap<String, TaxonomyEntry>, StoreError> {
        read_taxonomy_file(&self.categories_path())
    }

    /// Read `keywords.txt`.
    ///
    /// # Errors
    ///
    /// Propagates filesystem errors; malformed lines surface as
    /// [`StoreError::MalformedLine`].
    pub fn read_keywords(&self) -> Result<BTreeMap<String, TaxonomyEntry>, StoreError> {
        read_taxonomy_file(&self.keywords_path())
    }

    /// Write `time.json`.
    ///
    /// # Errors
    ///
    /// Propagates filesystem and JSON encode errors.
    pub fn write_run_meta(&self, meta: RunMeta) -> Result<(), StoreError> {
        let file = File::create(self.meta_path())?;
        serde_json::to_writer(BufWriter::new(file), &meta)?;
        Ok(())
    }

    /// Read `time.json`.
    ///
    /// # Errors
    ///
    /// Propagates filesystem and JSON decode errors.
    pub fn read_run_meta(&self) -> Result<RunMeta, StoreError> {
        let file = File::open(self.meta_path())?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Streaming line-delimited JSON writer for harvest records.
pub struct RecordWriter {
    inner: JsonLinesWriter<BufWriter<File>>,
}

impl RecordWriter {
    /// Append one record as one compact JSON line.
    ///
    /// # Errors
    ///
    /// Propagates the underlying write error. Returns `io::Result` so it can
    /// serve directly as the harvester's sink.
    pub fn write(&mut self, record: &CrateRecord) -> io::Result<()> {
        self.inner.write(record)
    }

    /// Flush buffered lines to disk.
    ///
    /// # Errors
    ///
    /// Propagates the underlying flush error.
    pub fn finish(mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn write_taxonomy_file<'a>(
    path: &Path,
    entries: impl Iterator<Item = (&'a str, &'a TaxonomyEntry)>,
) -> Result<(), StoreError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for (id, entry) in entries {
        let json = serde_json::to_string(entry)?;
        writeln!(writer, "{id}\t{json}")?;
    }
    writer.flush()?;
    Ok(())
}

fn read_taxonomy_file(path: &Path) -> Result<BTreeMap<String, TaxonomyEntry>, StoreError> {
    let file = File::open(path)?;
    let mut entries = BTreeMap::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let malformed = || StoreError::MalformedLine {
            path: path.to_path_buf(),
            line: index + 1,
        };
        let (id, json) = line.split_once('\t').ok_or_else(malformed)?;
        let entry: TaxonomyEntry = serde_json::from_str(json).map_err(|_| malformed())?;
        entries.insert(id.to_owned(), entry);
    }
    Ok(entries)
}
