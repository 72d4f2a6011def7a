//! Renders a grown plant for the terminal.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;
use sprout_core::PlantId;
use sprout_world::{
    query::{self, CollectionCounts},
    EntityGraph, GrowBranch, GrowFlower, GrowLeaf, GrowLeafCluster, GrowPetal, GrowPlant,
};

/// Plant subtree flattened into per-kind lists.
#[derive(Debug, Serialize)]
struct PlantReport<'a> {
    counts: CollectionCounts,
    plant: &'a GrowPlant,
    branches: Vec<&'a GrowBranch>,
    leaf_clusters: Vec<&'a GrowLeafCluster>,
    flowers: Vec<&'a GrowFlower>,
    leaves: Vec<&'a GrowLeaf>,
    petals: Vec<&'a GrowPetal>,
}

impl<'a> PlantReport<'a> {
    fn collect(graph: &'a EntityGraph, plant: PlantId) -> Option<Self> {
        let stored = query::plant(graph, plant)?;
        let leaf_clusters = query::leaf_clusters_of(graph, plant);
        let flowers = query::flowers_of(graph, plant);
        let leaves = leaf_clusters
            .iter()
            .flat_map(|cluster| query::leaves_of(graph, cluster.id))
            .collect();
        let petals = flowers
            .iter()
            .flat_map(|flower| query::petals_of(graph, flower.id))
            .collect();

        Some(Self {
            counts: query::counts(graph),
            plant: stored,
            branches: query::branches_of(graph, plant),
            leaf_clusters,
            flowers,
            leaves,
            petals,
        })
    }
}

/// Serializes the plant's subtree as pretty-printed JSON.
pub(crate) fn json(graph: &EntityGraph, plant: PlantId) -> Result<String> {
    let report = PlantReport::collect(graph, plant).context("plant is not in the graph")?;
    serde_json::to_string_pretty(&report).context("failed to serialize plant report")
}

/// One line per branch, indented by order, after a header with the totals.
pub(crate) fn summary(graph: &EntityGraph, plant: PlantId) -> String {
    let Some(report) = PlantReport::collect(graph, plant) else {
        return format!("plant {} is not in the graph", plant.get());
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}x{}): {} branches, {} leaf clusters ({} leaves), {} flowers ({} petals)",
        report.plant.name.as_deref().unwrap_or("unnamed plant"),
        report.plant.width,
        report.plant.height,
        report.branches.len(),
        report.leaf_clusters.len(),
        report.leaves.len(),
        report.flowers.len(),
        report.petals.len(),
    );

    for stored in &report.branches {
        let branch = &stored.branch;
        let ending = match branch.termination {
            Some(termination) => format!(" -> {termination:?}"),
            None => String::new(),
        };
        let _ = writeln!(
            out,
            "{:indent$}#{} order {} angle {:.1} length {:.1}{ending}",
            "",
            stored.id.get(),
            branch.order,
            branch.options.angle,
            branch.branch_height,
            indent = 2 * branch.order as usize,
        );
    }
    out
}
