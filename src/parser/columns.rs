//! Column clustering of the runs on a single line.

use crate::model::{ColumnCluster, TextRun};

/// Group a line's runs into x-aligned clusters.
///
/// Greedy: each run joins the first cluster holding any member within
/// `tolerance` of its x, or starts a new one. Clusters come back ordered by
/// their leftmost x.
pub fn cluster_columns(items: &[TextRun], tolerance: f32) -> Vec<ColumnCluster<'_>> {
    let mut groups: Vec<Vec<&TextRun>> = Vec::new();

    for run in items {
        let existing = groups
            .iter_mut()
            .find(|group| group.iter().any(|m| (m.x - run.x).abs() < tolerance));
        match existing {
            Some(group) => group.push(run),
            None => groups.push(vec![run]),
        }
    }

    let mut clusters: Vec<ColumnCluster<'_>> = groups
        .into_iter()
        .filter(|g| !g.is_empty())
        .map(ColumnCluster::new)
        .collect();
    clusters.sort_by(|a, b| a.x().total_cmp(&b.x()));
    clusters
}
