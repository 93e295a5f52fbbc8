//! Statistics engine
//!
//! Computes a [`StatsSnapshot`] from the current store contents on every call:
//! - Totals and average ratings per media type
//! - Half-point rating distribution
//! - Yearly breakdown by watched year
//! - Most recent watched date

use chrono::NaiveDateTime;
use serde::Serialize;
use crate::Result;
use crate::media::MediaType;
use crate::storage::{MediaStore, YearSummary};

/// A value tracked separately for movies and dramas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerType<T> {
    pub movie: T,
    pub drama: T,
}

impl<T: Copy> PerType<T> {
    pub fn get(&self, media_type: MediaType) -> T {
        match media_type {
            MediaType::Movie => self.movie,
            MediaType::Drama => self.drama,
        }
    }
}

/// Number of entries whose rating falls in `[lower, lower + 0.5)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingBucket {
    pub lower: f64,
    pub count: usize,
}

impl RatingBucket {
    pub fn label(&self) -> String {
        format!("{:.1}", self.lower)
    }
}

/// Aggregate view over every stored entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_entries: usize,
    pub total_by_type: PerType<usize>,
    pub average_rating_by_type: PerType<f64>,
    pub average_rating_overall: f64,
    /// Ascending by lower bound; empty buckets included
    pub rating_distribution: Vec<RatingBucket>,
    /// Newest year first
    pub yearly_breakdown: Vec<YearSummary>,
    pub last_watched: Option<NaiveDateTime>,
}

impl StatsSnapshot {
    pub fn total(&self) -> usize {
        self.total_entries
    }

    /// Share of all entries held by a bucket, in percent
    pub fn percentage(&self, bucket: &RatingBucket) -> f64 {
        match self.total() {
            0 => 0.0,
            total => bucket.count as f64 / total as f64 * 100.0,
        }
    }

    pub fn bucket(&self, label: &str) -> Option<&RatingBucket> {
        self.rating_distribution.iter().find(|b| b.label() == label)
    }
}

/// Stats engine over a borrowed store
pub struct StatsEngine<'a> {
    store: &'a MediaStore,
}

impl<'a> StatsEngine<'a> {
    /// Create a new stats engine
    pub fn new(store: &'a MediaStore) -> Self {
        Self { store }
    }

    /// Compute a fresh snapshot
    pub fn compute(&self) -> Result<StatsSnapshot> {
        let total_by_type = PerType {
            movie: self.store.count_by_type(MediaType::Movie)?,
            drama: self.store.count_by_type(MediaType::Drama)?,
        };
        let average_rating_by_type = PerType {
            movie: self.store.average_rating(Some(MediaType::Movie))?,
            drama: self.store.average_rating(Some(MediaType::Drama))?,
        };

        let snapshot = StatsSnapshot {
            total_entries: self.store.count()?,
            total_by_type,
            average_rating_by_type,
            average_rating_overall: self.store.average_rating(None)?,
            rating_distribution: rating_distribution(
                &self.store.ratings()?,
                self.store.rating_scale(),
            ),
            yearly_breakdown: self.store.year_summaries()?,
            last_watched: self.store.last_watched()?,
        };

        tracing::debug!(total = snapshot.total(), "computed stats snapshot");
        Ok(snapshot)
    }
}

/// Bucket ratings into half-point bins from 0.0 up to `scale - 0.5`.
///
/// A rating equal to the scale lands in the top bin.
pub fn rating_distribution(ratings: &[f64], scale: f64) -> Vec<RatingBucket> {
    let bins = ((scale * 2.0).ceil() as usize).max(1);
    let mut counts = vec![0usize; bins];

    for &rating in ratings {
        let index = ((rating.max(0.0) * 2.0).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| RatingBucket {
            lower: i as f64 / 2.0,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::NewEntry;
    use chrono::NaiveDate;

    fn store() -> MediaStore {
        MediaStore::open_in_memory(5.0).unwrap()
    }

    fn add(store: &MediaStore, media_type: MediaType, rating: f64, year: i32) {
        let watched = NaiveDate::from_ymd_opt(year, 7, 1)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        store
            .insert_watched_at(&NewEntry::new("Title", media_type, rating, ""), watched)
            .unwrap();
    }

    #[test]
    fn test_empty_store_is_all_zero() {
        let store = store();
        let stats = StatsEngine::new(&store).compute().unwrap();

        assert_eq!(stats.total(), 0);
        assert_eq!(stats.total_by_type, PerType { movie: 0, drama: 0 });
        assert_eq!(stats.average_rating_overall, 0.0);
        assert_eq!(stats.average_rating_by_type.get(MediaType::Movie), 0.0);
        assert_eq!(stats.average_rating_by_type.get(MediaType::Drama), 0.0);
        assert!(stats.rating_distribution.iter().all(|b| b.count == 0));
        assert!(stats.yearly_breakdown.is_empty());
        assert_eq!(stats.last_watched, None);
        assert_eq!(stats.percentage(&stats.rating_distribution[0]), 0.0);
    }

    #[test]
    fn test_zero_ratings_excluded_from_averages() {
        let store = store();
        add(&store, MediaType::Movie, 0.0, 2024);
        add(&store, MediaType::Movie, 3.0, 2024);
        add(&store, MediaType::Drama, 5.0, 2024);

        let stats = StatsEngine::new(&store).compute().unwrap();
        assert_eq!(stats.average_rating_overall, 4.0);
        assert_eq!(stats.average_rating_by_type.movie, 3.0);
        assert_eq!(stats.average_rating_by_type.drama, 5.0);
        assert_eq!(stats.total_by_type, PerType { movie: 2, drama: 1 });
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn test_only_zero_ratings_average_to_zero() {
        let store = store();
        add(&store, MediaType::Drama, 0.0, 2023);
        let stats = StatsEngine::new(&store).compute().unwrap();
        assert_eq!(stats.average_rating_overall, 0.0);
        assert_eq!(stats.yearly_breakdown[0].average_rating, 0.0);
    }

    #[test]
    fn test_distribution_bucket_edges() {
        let buckets = rating_distribution(&[4.5, 4.49, 4.7, 5.0, 0.0, 0.3], 5.0);
        assert_eq!(buckets.len(), 10);

        let count = |label: &str| {
            buckets
                .iter()
                .find(|b| b.label() == label)
                .map(|b| b.count)
                .unwrap()
        };
        assert_eq!(count("4.5"), 3);
        assert_eq!(count("4.0"), 1);
        assert_eq!(count("0.0"), 2);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 6);
    }

    #[test]
    fn test_distribution_follows_scale() {
        let buckets = rating_distribution(&[3.0], 3.0);
        assert_eq!(buckets.len(), 6);
        assert_eq!(buckets.last().unwrap().label(), "2.5");
        assert_eq!(buckets.last().unwrap().count, 1);
    }

    #[test]
    fn test_yearly_breakdown_and_last_watched() {
        let store = store();
        add(&store, MediaType::Movie, 4.0, 2022);
        add(&store, MediaType::Drama, 2.0, 2022);
        add(&store, MediaType::Drama, 0.0, 2022);
        add(&store, MediaType::Movie, 5.0, 2024);

        let stats = StatsEngine::new(&store).compute().unwrap();
        assert_eq!(
            stats.yearly_breakdown,
            vec![
                YearSummary { year: 2024, movies: 1, dramas: 0, average_rating: 5.0 },
                YearSummary { year: 2022, movies: 1, dramas: 2, average_rating: 3.0 },
            ]
        );
        assert_eq!(
            stats.last_watched,
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap().and_hms_opt(21, 0, 0)
        );
        assert_eq!(stats.bucket("4.0").map(|b| b.count), Some(1));
        let top = stats.bucket("4.5").unwrap();
        assert_eq!(top.count, 1);
        assert_eq!(stats.percentage(top), 25.0);
        assert!(stats.bucket("5.0").is_none());
    }

    #[test]
    fn test_snapshot_reflects_current_contents() {
        let store = store();
        add(&store, MediaType::Movie, 3.0, 2024);
        let engine = StatsEngine::new(&store);
        assert_eq!(engine.compute().unwrap().total(), 1);

        store.delete_all().unwrap();
        assert_eq!(engine.compute().unwrap().total(), 0);
    }
}
