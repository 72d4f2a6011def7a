#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative entity graph holding every generated plant part.
//!
//! The graph is a set of id-indexed collections where each non-root entity is
//! listed by exactly one parent. Mutations go through [`apply`] (or the
//! matching [`EntityGraph`] methods) and report what changed as [`Event`]
//! values; [`query`] offers read-only access.

mod reconcile;
mod records;
mod registry;

use rand::Rng;
use sprout_core::{
    BranchId, BranchOptions, Command, Coordinate, EditError, EntityId, EntityOptions, Event,
    FlowerId, FlowerOptions, LeafClusterId, LeafClusterOptions, LeafId, LeafOptions, PetalId,
    PartialPlantOptions, PetalOptions, PlantId, PlantOptions, PlantRecord, RegrowError, Rotation,
};
use sprout_system_branching::{
    grow_plant_blueprint, shape_branch, ClusterBlueprint, GrowthTuning, PlantBlueprint,
};
use sprout_system_clusters::{grow_leaves, grow_petals, reshape_leaf, reshape_petal};
use sprout_system_options::{merge_options, resolve_plant_options};

pub use records::{GrowBranch, GrowFlower, GrowLeaf, GrowLeafCluster, GrowPetal, GrowPlant};

use reconcile::reconcile_children;
use registry::Registry;

/// Zoom factor a freshly grown plant is presented at.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Represents the authoritative store of generated plants.
#[derive(Clone, Debug)]
pub struct EntityGraph {
    plants: Registry<PlantId, GrowPlant>,
    branches: Registry<BranchId, GrowBranch>,
    leaf_clusters: Registry<LeafClusterId, GrowLeafCluster>,
    flowers: Registry<FlowerId, GrowFlower>,
    leaves: Registry<LeafId, GrowLeaf>,
    petals: Registry<PetalId, GrowPetal>,
    tuning: GrowthTuning,
}

impl Default for EntityGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityGraph {
    /// Creates an empty graph growing plants with the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(GrowthTuning::default())
    }

    /// Creates an empty graph growing plants with the provided tuning.
    #[must_use]
    pub fn with_tuning(tuning: GrowthTuning) -> Self {
        Self {
            plants: Registry::new(),
            branches: Registry::new(),
            leaf_clusters: Registry::new(),
            flowers: Registry::new(),
            leaves: Registry::new(),
            petals: Registry::new(),
            tuning,
        }
    }

    /// Grows a brand new plant from a species record.
    pub fn grow_plant<R>(
        &mut self,
        record: &PlantRecord,
        vary_colors: bool,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> PlantId
    where
        R: Rng + ?Sized,
    {
        let options = resolve_plant_options(record, vary_colors);
        let blueprint = grow_plant_blueprint(&options, &self.tuning, rng);
        let plant = self.insert_plant(options, blueprint, out_events);

        if let Some(stored) = self.plants.get_mut(plant) {
            stored.name = record.display_name().map(str::to_owned);
            stored.species = record.species_id();
        }

        tracing::debug!(
            plant = plant.get(),
            name = record.display_name().unwrap_or("unnamed"),
            "grew plant from record"
        );
        plant
    }

    /// Inserts a plant together with an already generated skeleton.
    pub fn insert_plant(
        &mut self,
        options: PlantOptions,
        blueprint: PlantBlueprint,
        out_events: &mut Vec<Event>,
    ) -> PlantId {
        let plant = self.plants.insert_with(|id| GrowPlant {
            id,
            name: None,
            species: None,
            zoom: DEFAULT_ZOOM,
            position: Coordinate::ORIGIN,
            rotation: Rotation::NONE,
            height: blueprint.height,
            width: blueprint.width,
            branches: Vec::new(),
            leaf_clusters: Vec::new(),
            flowers: Vec::new(),
            options,
        });
        out_events.push(Event::EntityAdded {
            entity: EntityId::Plant(plant),
        });

        self.attach_blueprint(plant, blueprint, out_events);
        out_events.push(Event::PlantGrown { plant });
        plant
    }

    /// Merges `edit` over a plant's stored options and regrows its subtree.
    ///
    /// Unusable values in `edit` keep the stored value. The plant keeps its
    /// id, name, position, rotation and zoom.
    pub fn regrow_plant<R>(
        &mut self,
        plant: PlantId,
        edit: &PartialPlantOptions,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<PlantId, RegrowError>
    where
        R: Rng + ?Sized,
    {
        let Some(stored) = self.plants.get(plant) else {
            return Err(RegrowError::MissingPlant);
        };

        let options = merge_options(&stored.options, edit);
        self.regrow_subtree(plant, options, rng, out_events);
        tracing::debug!(plant = plant.get(), "regrew plant from edited options");
        Ok(plant)
    }

    /// Replaces an entity's options and regenerates whatever depends on them.
    ///
    /// Targeting an entity that no longer exists is a silent no-op.
    pub fn set_entity_options<R>(
        &mut self,
        entity: EntityId,
        options: EntityOptions,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) -> Result<(), EditError>
    where
        R: Rng + ?Sized,
    {
        match (entity, options) {
            (EntityId::Plant(plant), EntityOptions::Plant(options)) => {
                self.set_plant_options(plant, options, rng, out_events);
            }
            (EntityId::Branch(branch), EntityOptions::Branch(options)) => {
                self.reshape_branch(branch, options, None, out_events);
            }
            (EntityId::LeafCluster(cluster), EntityOptions::LeafCluster(options)) => {
                self.regenerate_leaf_cluster(cluster, options, rng, out_events);
            }
            (EntityId::Flower(flower), EntityOptions::Flower(options)) => {
                self.regenerate_flower(flower, options, rng, out_events);
            }
            (EntityId::Leaf(leaf), EntityOptions::Leaf(options)) => {
                self.set_leaf_options(leaf, options, out_events);
            }
            (EntityId::Petal(petal), EntityOptions::Petal(options)) => {
                self.set_petal_options(petal, options, out_events);
            }
            _ => return Err(EditError::OptionsMismatch),
        }
        Ok(())
    }

    /// Moves an entity; cluster placement is derived and cannot be set.
    pub fn set_position(
        &mut self,
        entity: EntityId,
        position: Coordinate,
        out_events: &mut Vec<Event>,
    ) -> Result<(), EditError> {
        match entity {
            EntityId::Plant(plant) => {
                if let Some(stored) = self.plants.get_mut(plant) {
                    stored.position = position;
                    out_events.push(Event::EntityUpdated { entity });
                }
            }
            EntityId::Branch(branch) => {
                if let Some(stored) = self.branches.get(branch) {
                    let options = BranchOptions {
                        start_point: position,
                        ..stored.branch.options
                    };
                    self.reshape_branch(branch, options, None, out_events);
                }
            }
            EntityId::LeafCluster(_) | EntityId::Flower(_) => {
                return Err(EditError::DerivedPlacement);
            }
            EntityId::Leaf(leaf) => {
                if let Some(stored) = self.leaves.get_mut(leaf) {
                    stored.leaf.position = position;
                    out_events.push(Event::EntityUpdated { entity });
                }
            }
            EntityId::Petal(petal) => {
                if let Some(stored) = self.petals.get_mut(petal) {
                    stored.petal.position = position;
                    out_events.push(Event::EntityUpdated { entity });
                }
            }
        }
        Ok(())
    }

    /// Rotates an entity; a branch's tilt follows `rotation.z`.
    pub fn set_rotation(
        &mut self,
        entity: EntityId,
        rotation: Rotation,
        out_events: &mut Vec<Event>,
    ) -> Result<(), EditError> {
        match entity {
            EntityId::Plant(plant) => {
                if let Some(stored) = self.plants.get_mut(plant) {
                    stored.rotation = rotation;
                    out_events.push(Event::EntityUpdated { entity });
                }
            }
            EntityId::Branch(branch) => {
                if let Some(stored) = self.branches.get(branch) {
                    let options = BranchOptions {
                        angle: rotation.z,
                        ..stored.branch.options
                    };
                    self.reshape_branch(branch, options, Some(rotation), out_events);
                }
            }
            EntityId::LeafCluster(_) | EntityId::Flower(_) => {
                return Err(EditError::DerivedPlacement);
            }
            EntityId::Leaf(leaf) => {
                if let Some(stored) = self.leaves.get_mut(leaf) {
                    stored.leaf.rotation = rotation;
                    out_events.push(Event::EntityUpdated { entity });
                }
            }
            EntityId::Petal(petal) => {
                if let Some(stored) = self.petals.get_mut(petal) {
                    stored.petal.rotation = rotation;
                    out_events.push(Event::EntityUpdated { entity });
                }
            }
        }
        Ok(())
    }

    /// Deletes an entity together with everything it owns.
    ///
    /// Deleting an entity that no longer exists is a silent no-op.
    pub fn delete_entity(&mut self, entity: EntityId, out_events: &mut Vec<Event>) {
        match entity {
            EntityId::Plant(plant) => self.delete_plant(plant, out_events),
            EntityId::Branch(branch) => self.delete_branch(branch, out_events),
            EntityId::LeafCluster(cluster) => {
                if let Some(removed) = self.remove_leaf_cluster(cluster, out_events) {
                    self.detach_cluster(removed.plant, removed.branch, out_events);
                    if let Some(plant) = self.plants.get_mut(removed.plant) {
                        plant.leaf_clusters.retain(|id| *id != cluster);
                    }
                }
            }
            EntityId::Flower(flower) => {
                if let Some(removed) = self.remove_flower(flower, out_events) {
                    self.detach_cluster(removed.plant, removed.branch, out_events);
                    if let Some(plant) = self.plants.get_mut(removed.plant) {
                        plant.flowers.retain(|id| *id != flower);
                    }
                }
            }
            EntityId::Leaf(leaf) => {
                if let Some(removed) = self.leaves.remove(leaf) {
                    out_events.push(Event::EntityRemoved { entity });
                    if let Some(cluster) = self.leaf_clusters.get_mut(removed.cluster) {
                        cluster.leaves.retain(|id| *id != leaf);
                    }
                }
            }
            EntityId::Petal(petal) => {
                if let Some(removed) = self.petals.remove(petal) {
                    out_events.push(Event::EntityRemoved { entity });
                    if let Some(flower) = self.flowers.get_mut(removed.flower) {
                        flower.petals.retain(|id| *id != petal);
                    }
                }
            }
        }
    }

    fn attach_blueprint(
        &mut self,
        plant: PlantId,
        blueprint: PlantBlueprint,
        out_events: &mut Vec<Event>,
    ) {
        let mut branches = Vec::with_capacity(blueprint.branches.len());
        let mut leaf_clusters = Vec::new();
        let mut flowers = Vec::new();

        for entry in blueprint.branches {
            let branch = self.branches.insert_with(|id| GrowBranch {
                id,
                plant,
                branch: entry.branch,
            });
            out_events.push(Event::EntityAdded {
                entity: EntityId::Branch(branch),
            });
            branches.push(branch);

            match entry.cluster {
                Some(ClusterBlueprint::LeafCluster(grown)) => {
                    let cluster = self.leaf_clusters.insert_with(|id| GrowLeafCluster {
                        id,
                        plant,
                        branch,
                        leaves: Vec::new(),
                        cluster: grown.cluster,
                    });
                    out_events.push(Event::EntityAdded {
                        entity: EntityId::LeafCluster(cluster),
                    });
                    let leaves =
                        reconcile_children(&mut self.leaves, cluster, &[], grown.leaves, out_events);
                    if let Some(stored) = self.leaf_clusters.get_mut(cluster) {
                        stored.leaves = leaves;
                    }
                    leaf_clusters.push(cluster);
                }
                Some(ClusterBlueprint::Flower(grown)) => {
                    let flower = self.flowers.insert_with(|id| GrowFlower {
                        id,
                        plant,
                        branch,
                        petals: Vec::new(),
                        flower: grown.flower,
                    });
                    out_events.push(Event::EntityAdded {
                        entity: EntityId::Flower(flower),
                    });
                    let petals =
                        reconcile_children(&mut self.petals, flower, &[], grown.petals, out_events);
                    if let Some(stored) = self.flowers.get_mut(flower) {
                        stored.petals = petals;
                    }
                    flowers.push(flower);
                }
                None => {}
            }
        }

        tracing::debug!(
            plant = plant.get(),
            branches = branches.len(),
            leaf_clusters = leaf_clusters.len(),
            flowers = flowers.len(),
            "attached plant skeleton"
        );

        if let Some(stored) = self.plants.get_mut(plant) {
            stored.branches = branches;
            stored.leaf_clusters = leaf_clusters;
            stored.flowers = flowers;
        }
    }

    /// Removes every branch, cluster and cluster child a plant owns.
    fn clear_subtree(&mut self, plant: PlantId, out_events: &mut Vec<Event>) {
        let Some(stored) = self.plants.get_mut(plant) else {
            return;
        };
        let branches = std::mem::take(&mut stored.branches);
        let leaf_clusters = std::mem::take(&mut stored.leaf_clusters);
        let flowers = std::mem::take(&mut stored.flowers);

        for cluster in leaf_clusters {
            let _ = self.remove_leaf_cluster(cluster, out_events);
        }
        for flower in flowers {
            let _ = self.remove_flower(flower, out_events);
        }
        for branch in branches {
            if self.branches.remove(branch).is_some() {
                out_events.push(Event::EntityRemoved {
                    entity: EntityId::Branch(branch),
                });
            }
        }
    }

    fn delete_plant(&mut self, plant: PlantId, out_events: &mut Vec<Event>) {
        if !self.plants.contains(plant) {
            return;
        }
        self.clear_subtree(plant, out_events);
        let _ = self.plants.remove(plant);
        out_events.push(Event::EntityRemoved {
            entity: EntityId::Plant(plant),
        });
        tracing::debug!(plant = plant.get(), "deleted plant");
    }

    fn delete_branch(&mut self, branch: BranchId, out_events: &mut Vec<Event>) {
        let Some(removed) = self.branches.remove(branch) else {
            return;
        };

        match self.cluster_of(removed.plant, branch) {
            Some(EntityId::LeafCluster(cluster)) => {
                let _ = self.remove_leaf_cluster(cluster, out_events);
                if let Some(plant) = self.plants.get_mut(removed.plant) {
                    plant.leaf_clusters.retain(|id| *id != cluster);
                }
            }
            Some(EntityId::Flower(flower)) => {
                let _ = self.remove_flower(flower, out_events);
                if let Some(plant) = self.plants.get_mut(removed.plant) {
                    plant.flowers.retain(|id| *id != flower);
                }
            }
            _ => {}
        }

        out_events.push(Event::EntityRemoved {
            entity: EntityId::Branch(branch),
        });
        if let Some(plant) = self.plants.get_mut(removed.plant) {
            plant.branches.retain(|id| *id != branch);
        }
    }

    /// Removes a leaf cluster and its leaves without touching parent lists.
    fn remove_leaf_cluster(
        &mut self,
        cluster: LeafClusterId,
        out_events: &mut Vec<Event>,
    ) -> Option<GrowLeafCluster> {
        let removed = self.leaf_clusters.remove(cluster)?;
        for &leaf in &removed.leaves {
            if self.leaves.remove(leaf).is_some() {
                out_events.push(Event::EntityRemoved {
                    entity: EntityId::Leaf(leaf),
                });
            }
        }
        out_events.push(Event::EntityRemoved {
            entity: EntityId::LeafCluster(cluster),
        });
        Some(removed)
    }

    /// Removes a flower and its petals without touching parent lists.
    fn remove_flower(
        &mut self,
        flower: FlowerId,
        out_events: &mut Vec<Event>,
    ) -> Option<GrowFlower> {
        let removed = self.flowers.remove(flower)?;
        for &petal in &removed.petals {
            if self.petals.remove(petal).is_some() {
                out_events.push(Event::EntityRemoved {
                    entity: EntityId::Petal(petal),
                });
            }
        }
        out_events.push(Event::EntityRemoved {
            entity: EntityId::Flower(flower),
        });
        Some(removed)
    }

    /// Clears the termination of a branch whose cluster was deleted.
    fn detach_cluster(&mut self, plant: PlantId, branch: BranchId, out_events: &mut Vec<Event>) {
        let Some(stored) = self.branches.get_mut(branch) else {
            return;
        };
        if stored.plant != plant {
            return;
        }
        stored.branch.termination = None;
        out_events.push(Event::EntityUpdated {
            entity: EntityId::Branch(branch),
        });
    }

    /// Cluster anchored to `branch`, looked up through the owning plant.
    fn cluster_of(&self, plant: PlantId, branch: BranchId) -> Option<EntityId> {
        let stored = self.plants.get(plant)?;
        stored
            .leaf_clusters
            .iter()
            .copied()
            .find(|&id| {
                self.leaf_clusters
                    .get(id)
                    .is_some_and(|cluster| cluster.branch == branch)
            })
            .map(EntityId::LeafCluster)
            .or_else(|| {
                stored
                    .flowers
                    .iter()
                    .copied()
                    .find(|&id| {
                        self.flowers
                            .get(id)
                            .is_some_and(|flower| flower.branch == branch)
                    })
                    .map(EntityId::Flower)
            })
    }

    /// Replaces the subtree of a live plant with one grown from `options`.
    fn regrow_subtree<R>(
        &mut self,
        plant: PlantId,
        options: PlantOptions,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) where
        R: Rng + ?Sized,
    {
        let blueprint = grow_plant_blueprint(&options, &self.tuning, rng);
        self.clear_subtree(plant, out_events);

        if let Some(stored) = self.plants.get_mut(plant) {
            stored.height = blueprint.height;
            stored.width = blueprint.width;
            stored.options = options;
        }
        out_events.push(Event::EntityUpdated {
            entity: EntityId::Plant(plant),
        });

        self.attach_blueprint(plant, blueprint, out_events);
        out_events.push(Event::PlantGrown { plant });
    }

    fn set_plant_options<R>(
        &mut self,
        plant: PlantId,
        options: PlantOptions,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) where
        R: Rng + ?Sized,
    {
        let Some(stored) = self.plants.get_mut(plant) else {
            return;
        };

        let options = merge_options(&stored.options, &PartialPlantOptions::from(options));
        if stored.options.structural_change(&options) {
            self.regrow_subtree(plant, options, rng, out_events);
            tracing::debug!(plant = plant.get(), "regrew plant after structural edit");
            return;
        }

        let recolor = stored.options.palette_change(&options);
        stored.options = options;
        out_events.push(Event::EntityUpdated {
            entity: EntityId::Plant(plant),
        });
        if !recolor {
            return;
        }

        let leaf_clusters = stored.leaf_clusters.clone();
        let flowers = stored.flowers.clone();
        let leaf_colors = stored.options.leaf_colors.clone();
        let flower_colors = stored.options.flower_colors.clone();

        for cluster in leaf_clusters {
            if let Some(current) = self.leaf_clusters.get(cluster) {
                let options = LeafClusterOptions {
                    colors: leaf_colors.clone(),
                    ..current.cluster.options.clone()
                };
                self.regenerate_leaf_cluster(cluster, options, rng, out_events);
            }
        }
        for flower in flowers {
            if let Some(current) = self.flowers.get(flower) {
                let options = FlowerOptions {
                    colors: flower_colors.clone(),
                    ..current.flower.options.clone()
                };
                self.regenerate_flower(flower, options, rng, out_events);
            }
        }
        tracing::debug!(plant = plant.get(), "recolored plant clusters");
    }

    /// Recomputes a branch's geometry and re-anchors its terminal cluster.
    fn reshape_branch(
        &mut self,
        branch: BranchId,
        options: BranchOptions,
        rotation: Option<Rotation>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(stored) = self.branches.get_mut(branch) else {
            return;
        };
        let current = &stored.branch;
        let mut reshaped = shape_branch(
            current.order,
            current.base_index,
            &options,
            current.termination,
        );
        if let Some(rotation) = rotation {
            reshaped.rotation = rotation;
        }
        let anchor = reshaped.anchor();
        let plant = stored.plant;
        stored.branch = reshaped;
        out_events.push(Event::EntityUpdated {
            entity: EntityId::Branch(branch),
        });

        match self.cluster_of(plant, branch) {
            Some(EntityId::LeafCluster(cluster)) => {
                if let Some(stored) = self.leaf_clusters.get_mut(cluster) {
                    stored.cluster.anchor = anchor;
                    out_events.push(Event::EntityUpdated {
                        entity: EntityId::LeafCluster(cluster),
                    });
                }
            }
            Some(EntityId::Flower(flower)) => {
                if let Some(stored) = self.flowers.get_mut(flower) {
                    stored.flower.anchor = anchor;
                    out_events.push(Event::EntityUpdated {
                        entity: EntityId::Flower(flower),
                    });
                }
            }
            _ => {}
        }
    }

    fn regenerate_leaf_cluster<R>(
        &mut self,
        cluster: LeafClusterId,
        options: LeafClusterOptions,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) where
        R: Rng + ?Sized,
    {
        let Some(stored) = self.leaf_clusters.get(cluster) else {
            return;
        };
        let bodies = grow_leaves(stored.cluster.order, stored.cluster.z_index, &options, rng);
        let existing = stored.leaves.clone();
        let leaves = reconcile_children(&mut self.leaves, cluster, &existing, bodies, out_events);

        if let Some(stored) = self.leaf_clusters.get_mut(cluster) {
            let (top, bottom) = options.texture.leaf_size();
            stored.cluster.height = top + bottom;
            stored.cluster.width = top + bottom;
            stored.cluster.options = options;
            stored.leaves = leaves;
            out_events.push(Event::EntityUpdated {
                entity: EntityId::LeafCluster(cluster),
            });
        }
    }

    fn regenerate_flower<R>(
        &mut self,
        flower: FlowerId,
        options: FlowerOptions,
        rng: &mut R,
        out_events: &mut Vec<Event>,
    ) where
        R: Rng + ?Sized,
    {
        let Some(stored) = self.flowers.get(flower) else {
            return;
        };
        let bodies = grow_petals(stored.flower.order, stored.flower.z_index, &options, rng);
        let existing = stored.petals.clone();
        let petals = reconcile_children(&mut self.petals, flower, &existing, bodies, out_events);

        if let Some(stored) = self.flowers.get_mut(flower) {
            stored.flower.options = options;
            stored.petals = petals;
            out_events.push(Event::EntityUpdated {
                entity: EntityId::Flower(flower),
            });
        }
    }

    fn set_leaf_options(&mut self, leaf: LeafId, options: LeafOptions, out_events: &mut Vec<Event>) {
        if let Some(stored) = self.leaves.get_mut(leaf) {
            stored.leaf = reshape_leaf(&stored.leaf, options);
            out_events.push(Event::EntityUpdated {
                entity: EntityId::Leaf(leaf),
            });
        }
    }

    fn set_petal_options(
        &mut self,
        petal: PetalId,
        options: PetalOptions,
        out_events: &mut Vec<Event>,
    ) {
        if let Some(stored) = self.petals.get_mut(petal) {
            stored.petal = reshape_petal(&stored.petal, options);
            out_events.push(Event::EntityUpdated {
                entity: EntityId::Petal(petal),
            });
        }
    }
}

/// Applies the provided command to the graph, reporting outcomes as events.
pub fn apply<R>(
    graph: &mut EntityGraph,
    command: Command,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) where
    R: Rng + ?Sized,
{
    match command {
        Command::GrowPlant {
            record,
            vary_colors,
        } => {
            let _ = graph.grow_plant(&record, vary_colors, rng, out_events);
        }
        Command::RegrowPlant { plant, edit } => {
            if let Err(reason) = graph.regrow_plant(plant, &edit, rng, out_events) {
                tracing::debug!(plant = plant.get(), %reason, "regrow rejected");
                out_events.push(Event::RegrowRejected { plant, reason });
            }
        }
        Command::SetEntityOptions { entity, options } => {
            if let Err(reason) = graph.set_entity_options(entity, options, rng, out_events) {
                out_events.push(Event::EditRejected { entity, reason });
            }
        }
        Command::SetPosition { entity, position } => {
            if let Err(reason) = graph.set_position(entity, position, out_events) {
                out_events.push(Event::EditRejected { entity, reason });
            }
        }
        Command::SetRotation { entity, rotation } => {
            if let Err(reason) = graph.set_rotation(entity, rotation, out_events) {
                out_events.push(Event::EditRejected { entity, reason });
            }
        }
        Command::DeleteEntity { entity } => graph.delete_entity(entity, out_events),
    }
}

/// Query functions that provide read-only access to the graph.
pub mod query {
    use serde::Serialize;
    use sprout_core::{BranchId, EntityId, FlowerId, LeafClusterId, LeafId, PetalId, PlantId};
    use sprout_system_branching::GrowthTuning;

    use super::{
        EntityGraph, GrowBranch, GrowFlower, GrowLeaf, GrowLeafCluster, GrowPetal, GrowPlant,
    };

    /// Number of live entities in each collection.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct CollectionCounts {
        /// Live plants.
        pub plants: usize,
        /// Live branches.
        pub branches: usize,
        /// Live leaf clusters.
        pub leaf_clusters: usize,
        /// Live flowers.
        pub flowers: usize,
        /// Live leaves.
        pub leaves: usize,
        /// Live petals.
        pub petals: usize,
    }

    /// Looks up a plant.
    #[must_use]
    pub fn plant(graph: &EntityGraph, id: PlantId) -> Option<&GrowPlant> {
        graph.plants.get(id)
    }

    /// Looks up a branch.
    #[must_use]
    pub fn branch(graph: &EntityGraph, id: BranchId) -> Option<&GrowBranch> {
        graph.branches.get(id)
    }

    /// Looks up a leaf cluster.
    #[must_use]
    pub fn leaf_cluster(graph: &EntityGraph, id: LeafClusterId) -> Option<&GrowLeafCluster> {
        graph.leaf_clusters.get(id)
    }

    /// Looks up a flower.
    #[must_use]
    pub fn flower(graph: &EntityGraph, id: FlowerId) -> Option<&GrowFlower> {
        graph.flowers.get(id)
    }

    /// Looks up a leaf.
    #[must_use]
    pub fn leaf(graph: &EntityGraph, id: LeafId) -> Option<&GrowLeaf> {
        graph.leaves.get(id)
    }

    /// Looks up a petal.
    #[must_use]
    pub fn petal(graph: &EntityGraph, id: PetalId) -> Option<&GrowPetal> {
        graph.petals.get(id)
    }

    /// Every plant in identifier order.
    pub fn plants(graph: &EntityGraph) -> impl Iterator<Item = &GrowPlant> {
        graph.plants.values()
    }

    /// Branches owned by `plant`, in generation order.
    #[must_use]
    pub fn branches_of(graph: &EntityGraph, plant: PlantId) -> Vec<&GrowBranch> {
        graph.plants.get(plant).map_or_else(Vec::new, |stored| {
            stored
                .branches
                .iter()
                .filter_map(|&id| graph.branches.get(id))
                .collect()
        })
    }

    /// Leaf clusters owned by `plant`, in generation order.
    #[must_use]
    pub fn leaf_clusters_of(graph: &EntityGraph, plant: PlantId) -> Vec<&GrowLeafCluster> {
        graph.plants.get(plant).map_or_else(Vec::new, |stored| {
            stored
                .leaf_clusters
                .iter()
                .filter_map(|&id| graph.leaf_clusters.get(id))
                .collect()
        })
    }

    /// Flowers owned by `plant`, in generation order.
    #[must_use]
    pub fn flowers_of(graph: &EntityGraph, plant: PlantId) -> Vec<&GrowFlower> {
        graph.plants.get(plant).map_or_else(Vec::new, |stored| {
            stored
                .flowers
                .iter()
                .filter_map(|&id| graph.flowers.get(id))
                .collect()
        })
    }

    /// Leaves arranged by `cluster`, in arrangement order.
    #[must_use]
    pub fn leaves_of(graph: &EntityGraph, cluster: LeafClusterId) -> Vec<&GrowLeaf> {
        graph.leaf_clusters.get(cluster).map_or_else(Vec::new, |stored| {
            stored
                .leaves
                .iter()
                .filter_map(|&id| graph.leaves.get(id))
                .collect()
        })
    }

    /// Petals arranged by `flower`, in arrangement order.
    #[must_use]
    pub fn petals_of(graph: &EntityGraph, flower: FlowerId) -> Vec<&GrowPetal> {
        graph.flowers.get(flower).map_or_else(Vec::new, |stored| {
            stored
                .petals
                .iter()
                .filter_map(|&id| graph.petals.get(id))
                .collect()
        })
    }

    /// Terminal cluster anchored to `branch`, if any.
    #[must_use]
    pub fn cluster_of(graph: &EntityGraph, branch: BranchId) -> Option<EntityId> {
        let stored = graph.branches.get(branch)?;
        stored
            .branch
            .termination
            .and_then(|_| graph.cluster_of(stored.plant, branch))
    }

    /// Entity whose child list names `entity`; plants have none.
    #[must_use]
    pub fn parent_of(graph: &EntityGraph, entity: EntityId) -> Option<EntityId> {
        match entity {
            EntityId::Plant(_) => None,
            EntityId::Branch(id) => graph
                .branches
                .get(id)
                .map(|stored| EntityId::Plant(stored.plant)),
            EntityId::LeafCluster(id) => graph
                .leaf_clusters
                .get(id)
                .map(|stored| EntityId::Plant(stored.plant)),
            EntityId::Flower(id) => graph
                .flowers
                .get(id)
                .map(|stored| EntityId::Plant(stored.plant)),
            EntityId::Leaf(id) => graph
                .leaves
                .get(id)
                .map(|stored| EntityId::LeafCluster(stored.cluster)),
            EntityId::Petal(id) => graph
                .petals
                .get(id)
                .map(|stored| EntityId::Flower(stored.flower)),
        }
    }

    /// Reports whether `entity` is live.
    #[must_use]
    pub fn contains(graph: &EntityGraph, entity: EntityId) -> bool {
        match entity {
            EntityId::Plant(id) => graph.plants.contains(id),
            EntityId::Branch(id) => graph.branches.contains(id),
            EntityId::LeafCluster(id) => graph.leaf_clusters.contains(id),
            EntityId::Flower(id) => graph.flowers.contains(id),
            EntityId::Leaf(id) => graph.leaves.contains(id),
            EntityId::Petal(id) => graph.petals.contains(id),
        }
    }

    /// Number of live entities in each collection.
    #[must_use]
    pub fn counts(graph: &EntityGraph) -> CollectionCounts {
        CollectionCounts {
            plants: graph.plants.len(),
            branches: graph.branches.len(),
            leaf_clusters: graph.leaf_clusters.len(),
            flowers: graph.flowers.len(),
            leaves: graph.leaves.len(),
            petals: graph.petals.len(),
        }
    }

    /// Tuning plants are grown with.
    #[must_use]
    pub fn tuning(graph: &EntityGraph) -> &GrowthTuning {
        &graph.tuning
    }
}
