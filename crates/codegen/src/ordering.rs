//! # Dependency Ordering
//!
//! Orders DataPoints so that every DataPoint comes after the DataPoints it
//! `belongsTo`. Used for seeder calls and migration timestamps.
//!
//! The sort is a repeated stable scan: each pass moves every remaining
//! DataPoint whose dependencies are all placed, in original order. A pass
//! that places nothing means a cycle; the remaining DataPoints are appended
//! in original order and the sort stops.

use datapoints_ir::DataPoint;
use std::collections::HashSet;

/// Result of ordering a DataPoint collection
#[derive(Debug, Clone)]
pub struct DependencyOrder<'a> {
    /// Every DataPoint exactly once, dependencies first
    pub ordered: Vec<&'a DataPoint>,
    /// DataPoints appended by the cycle fallback, in original order
    pub unresolved: Vec<&'a DataPoint>,
}

impl<'a> DependencyOrder<'a> {
    pub fn has_cycle(&self) -> bool {
        !self.unresolved.is_empty()
    }

    /// Position of `data_point` in the ordered output
    ///
    /// Matches by identity, so DataPoints sharing a name keep distinct ranks.
    pub fn rank_of(&self, data_point: &DataPoint) -> Option<usize> {
        self.ordered
            .iter()
            .position(|placed| std::ptr::eq(*placed, data_point))
    }
}

/// Order DataPoints by their `belongsTo` edges
///
/// Edges to entities outside the collection and self-references are ignored:
/// neither can be satisfied by reordering.
pub fn order_by_dependencies(data_points: &[DataPoint]) -> DependencyOrder<'_> {
    let present: HashSet<String> = data_points.iter().map(|dp| dp.model_name()).collect();

    let deps: Vec<Vec<String>> = data_points
        .iter()
        .map(|dp| {
            let own = dp.model_name();
            dp.dependencies()
                .into_iter()
                .filter(|d| *d != own && present.contains(d))
                .collect()
        })
        .collect();

    let mut placed: HashSet<String> = HashSet::new();
    let mut ordered: Vec<&DataPoint> = Vec::with_capacity(data_points.len());
    let mut remaining: Vec<usize> = (0..data_points.len()).collect();

    while !remaining.is_empty() {
        let before = remaining.len();
        let mut still_waiting = Vec::with_capacity(before);

        for i in remaining {
            if deps[i].iter().all(|d| placed.contains(d)) {
                placed.insert(data_points[i].model_name());
                ordered.push(&data_points[i]);
            } else {
                still_waiting.push(i);
            }
        }

        remaining = still_waiting;

        if remaining.len() == before {
            let unresolved: Vec<&DataPoint> = remaining.iter().map(|&i| &data_points[i]).collect();
            tracing::warn!(
                data_points = ?unresolved.iter().map(|dp| dp.name()).collect::<Vec<_>>(),
                "circular belongsTo dependency; appending in original order"
            );
            ordered.extend(unresolved.iter().copied());
            return DependencyOrder {
                ordered,
                unresolved,
            };
        }
    }

    DependencyOrder {
        ordered,
        unresolved: Vec::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================
