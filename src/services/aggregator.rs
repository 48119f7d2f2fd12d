//! Derived statistics over fetched driver collections

use std::collections::HashMap;

use crate::types::{RaceResult, SeasonScoped, StandingEntry};

/// Aggregator for computing display statistics
pub struct Aggregator;

impl Aggregator {
    /// Career points: sum of `points` across all standing entries.
    /// Defined as 0 for an empty collection.
    pub fn total_points(standings: &[StandingEntry]) -> f64 {
        standings.iter().map(|s| s.points).sum()
    }

    /// Restrict a collection to one season. `None` is the identity: same
    /// elements, same order. Never mutates the underlying collection.
    pub fn filter_by_season<T: SeasonScoped>(items: &[T], season: Option<u32>) -> Vec<&T> {
        match season {
            None => items.iter().collect(),
            Some(id) => items.iter().filter(|item| item.season_id() == id).collect(),
        }
    }

    /// Points scored per season, in the given season order. Seasons without
    /// a classified result report 0.
    pub fn points_by_season(results: &[RaceResult], season_order: &[u32]) -> Vec<(u32, f64)> {
        let mut totals: HashMap<u32, f64> = HashMap::new();
        for result in results {
            *totals.entry(result.season_id).or_insert(0.0) += result.points;
        }

        season_order
            .iter()
            .map(|&id| (id, totals.get(&id).copied().unwrap_or(0.0)))
            .collect()
    }
}
