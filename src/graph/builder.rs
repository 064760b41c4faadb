//! Converts relationship records into an immutable [`GraphSnapshot`].

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::types::{Relationship, StudentId, Weight};

use super::snapshot::{Edge, GraphSnapshot};

/// Tally of what happened to each relationship record during a build.
///
/// Every input record lands in exactly one counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Records that became an edge in the snapshot.
    pub accepted: usize,
    /// Records whose status is not ACCEPTED.
    pub not_accepted: usize,
    /// Malformed records naming a student outside the valid set.
    pub unknown_vertex: usize,
    /// Malformed records with a zero weight.
    pub invalid_weight: usize,
    /// Records whose follower and followee are the same student.
    pub self_loops: usize,
    /// Parallel records folded into a cheaper edge for the same ordered pair.
    pub duplicates_collapsed: usize,
}

impl BuildReport {
    /// Malformed records (unknown vertex or invalid weight).
    pub fn malformed(&self) -> usize {
        self.unknown_vertex + self.invalid_weight
    }

    /// Every record that did not become its own edge.
    pub fn skipped(&self) -> usize {
        self.not_accepted
            + self.malformed()
            + self.self_loops
            + self.duplicates_collapsed
    }

    /// Total records seen.
    pub fn total(&self) -> usize {
        self.accepted + self.skipped()
    }
}

/// Fluent builder for constructing a GraphSnapshot.
///
/// Holds no state beyond its inputs; `build` is a pure function of the
/// student set and the relationship multiset.
#[derive(Debug, Default, Clone)]
pub struct GraphBuilder {
    students: Vec<StudentId>,
    relationships: Vec<Relationship>,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder seeded with the valid student set.
    pub fn with_students<I>(students: I) -> Self
    where
        I: IntoIterator<Item = StudentId>,
    {
        Self {
            students: students.into_iter().collect(),
            relationships: Vec::new(),
        }
    }

    /// Register one valid student.
    pub fn add_student(&mut self, id: StudentId) -> &mut Self {
        self.students.push(id);
        self
    }

    /// Register several valid students.
    pub fn add_students<I>(&mut self, ids: I) -> &mut Self
    where
        I: IntoIterator<Item = StudentId>,
    {
        self.students.extend(ids);
        self
    }

    /// Add a relationship record in any status.
    pub fn add_relationship(&mut self, relationship: Relationship) -> &mut Self {
        self.relationships.push(relationship);
        self
    }

    /// Add several relationship records.
    pub fn add_relationships<I>(&mut self, relationships: I) -> &mut Self
    where
        I: IntoIterator<Item = Relationship>,
    {
        self.relationships.extend(relationships);
        self
    }

    /// Add an accepted follow edge.
    pub fn link(&mut self, follower: StudentId, followee: StudentId, weight: Weight) -> &mut Self {
        self.add_relationship(Relationship::accepted(follower, followee, weight))
    }

    /// Build the snapshot and the report of skipped records.
    pub fn build(self) -> (GraphSnapshot, BuildReport) {
        build_snapshot(&self.students, &self.relationships)
    }
}

/// Build a snapshot from the valid student set and the relationship records.
///
/// Malformed records are skipped and counted, never fatal. Parallel edges
/// between the same ordered pair collapse to the minimum weight.
pub fn build_snapshot(
    students: &[StudentId],
    relationships: &[Relationship],
) -> (GraphSnapshot, BuildReport) {
    let valid: HashSet<StudentId> = students.iter().copied().collect();
    let mut report = BuildReport::default();
    let mut cheapest: HashMap<(StudentId, StudentId), Weight> = HashMap::new();

    for rel in relationships {
        if !rel.status.is_traversable() {
            report.not_accepted += 1;
            continue;
        }
        if !valid.contains(&rel.follower_id) || !valid.contains(&rel.followee_id) {
            log::debug!(
                "skipping relationship {} -> {}: unknown student",
                rel.follower_id,
                rel.followee_id
            );
            report.unknown_vertex += 1;
            continue;
        }
        if rel.validate().is_err() {
            log::debug!(
                "skipping relationship {} -> {}: zero weight",
                rel.follower_id,
                rel.followee_id
            );
            report.invalid_weight += 1;
            continue;
        }
        if rel.is_self_loop() {
            report.self_loops += 1;
            continue;
        }

        let key = (rel.follower_id, rel.followee_id);
        match cheapest.get_mut(&key) {
            Some(existing) => {
                *existing = (*existing).min(rel.weight);
                report.duplicates_collapsed += 1;
            }
            None => {
                cheapest.insert(key, rel.weight);
            }
        }
    }

    let edges: Vec<Edge> = cheapest
        .into_iter()
        .map(|((source, target), weight)| Edge::new(source, target, weight))
        .collect();
    report.accepted = edges.len();

    let snapshot = GraphSnapshot::from_parts(valid.into_iter().collect(), edges);

    if report.malformed() > 0 {
        log::info!(
            "built snapshot with {} vertices, {} edges; skipped {} malformed of {} records",
            snapshot.vertex_count(),
            snapshot.edge_count(),
            report.malformed(),
            report.total()
        );
    } else {
        log::debug!(
            "built snapshot with {} vertices, {} edges",
            snapshot.vertex_count(),
            snapshot.edge_count()
        );
    }

    (snapshot, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RelationshipStatus;

    #[test]
    fn test_every_record_counted_once() {
        let rels = vec![
            Relationship::accepted(1, 2, 3),
            Relationship::accepted(1, 2, 1),
            Relationship::accepted(2, 2, 1),
            Relationship::accepted(2, 9, 1),
            Relationship::accepted(2, 3, 0),
            Relationship::new(3, 1, RelationshipStatus::Blocked, 1),
        ];
        let (snapshot, report) = build_snapshot(&[1, 2, 3], &rels);

        assert_eq!(report.total(), rels.len());
        assert_eq!(report.accepted, 1);
        assert_eq!(report.duplicates_collapsed, 1);
        assert_eq!(report.self_loops, 1);
        assert_eq!(report.unknown_vertex, 1);
        assert_eq!(report.invalid_weight, 1);
        assert_eq!(report.not_accepted, 1);
        assert_eq!(snapshot.edge_weight(1, 2), Some(1));
    }
}
