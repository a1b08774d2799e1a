use crate::errors::{HarvestError, HarvestResult};
use crate::results::Review;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Names a collection inside a database
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionKey {
    pub database: String,
    pub collection: String,
}

impl CollectionKey {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// Document store the collected reviews are handed to
pub trait DocumentStore {
    fn collection_exists(&self, key: &CollectionKey) -> HarvestResult<bool>;

    /// Create the collection; creating an existing collection is a no-op
    fn create_collection(&mut self, key: &CollectionKey) -> HarvestResult<()>;

    /// Append records to an existing collection, returning how many were written
    fn insert_many(&mut self, key: &CollectionKey, records: &[Review]) -> HarvestResult<usize>;

    /// Every record in the collection, in insertion order
    fn find_all(&self, key: &CollectionKey) -> HarvestResult<Vec<Review>>;

    /// Remove the collection, returning whether it existed
    fn drop_collection(&mut self, key: &CollectionKey) -> HarvestResult<bool>;
}

/// Document store keeping one JSON-lines file per collection under a root directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn collection_path(&self, key: &CollectionKey) -> HarvestResult<PathBuf> {
        for name in [&key.database, &key.collection] {
            if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(HarvestError::Store(format!("invalid collection key: {key}")));
            }
        }
        Ok(self
            .root
            .join(&key.database)
            .join(format!("{}.jsonl", key.collection)))
    }
}

impl DocumentStore for JsonFileStore {
    fn collection_exists(&self, key: &CollectionKey) -> HarvestResult<bool> {
        Ok(self.collection_path(key)?.is_file())
    }

    fn create_collection(&mut self, key: &CollectionKey) -> HarvestResult<()> {
        let path = self.collection_path(key)?;
        if path.is_file() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        File::create(&path)?;
        ::log::info!("Created collection {} at {}", key, path.display());
        Ok(())
    }

    fn insert_many(&mut self, key: &CollectionKey, records: &[Review]) -> HarvestResult<usize> {
        let path = self.collection_path(key)?;
        if !path.is_file() {
            return Err(HarvestError::Store(format!("collection {key} does not exist")));
        }

        let file = OpenOptions::new().append(true).open(&path)?;
        let mut writer = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        ::log::debug!("Inserted {} records into {}", records.len(), key);
        Ok(records.len())
    }

    fn find_all(&self, key: &CollectionKey) -> HarvestResult<Vec<Review>> {
        let path = self.collection_path(key)?;
        if !path.is_file() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }

    fn drop_collection(&mut self, key: &CollectionKey) -> HarvestResult<bool> {
        let path = self.collection_path(key)?;
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }
}

/// Drop exact duplicate reviews, keeping the first occurrence.
///
/// Ratings compare by bit pattern, so a missing rating never equals a present one.
pub fn dedup_reviews(reviews: &[Review]) -> Vec<Review> {
    let mut seen = HashSet::new();
    reviews
        .iter()
        .filter(|review| seen.insert(review_key(*review)))
        .cloned()
        .collect()
}

type ReviewKey<'a> = (
    Option<&'a str>,
    Option<u32>,
    Option<&'a str>,
    Option<&'a str>,
    &'a str,
);

fn review_key(review: &Review) -> ReviewKey<'_> {
    (
        review.title.as_deref(),
        review.rating.map(f32::to_bits),
        review.body.as_deref(),
        review.size.as_deref(),
        review.product_ref.as_str(),
    )
}

/// Hand a run's reviews to the store: dedup, ensure the collection, bulk insert.
///
/// Returns the number of records inserted. A failure part-way through may leave
/// some records inserted.
pub fn persist_reviews<D: DocumentStore>(
    store: &mut D,
    key: &CollectionKey,
    reviews: &[Review],
) -> HarvestResult<usize> {
    let unique = dedup_reviews(reviews);
    if unique.len() < reviews.len() {
        ::log::info!(
            "Dropped {} duplicate reviews before storing",
            reviews.len() - unique.len()
        );
    }

    if !store.collection_exists(key)? {
        store.create_collection(key)?;
    }
    if unique.is_empty() {
        return Ok(0);
    }
    store.insert_many(key, &unique)
}

/// Write reviews as CSV rows with the column layout downstream analysis expects
pub fn write_csv<P: AsRef<Path>>(path: P, reviews: &[Review]) -> HarvestResult<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record(["review_title", "ratings", "review_comment", "size", "asin"])?;

    for review in reviews {
        let rating = review
            .rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "no ratings".to_string());
        writer.write_record([
            review.title.as_deref().unwrap_or("no title"),
            rating.as_str(),
            review.body.as_deref().unwrap_or("no review"),
            review.size.as_deref().unwrap_or("no size"),
            review.product_ref.as_str(),
        ])?;
    }

    writer.flush()?;
    ::log::info!("Wrote {} reviews to {}", reviews.len(), path.as_ref().display());
    Ok(())
}
