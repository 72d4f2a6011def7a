//! Stored entities: generated bodies wrapped with identifiers and parent links.

use serde::{Deserialize, Serialize};
use sprout_core::{
    Branch, BranchId, Coordinate, EntityId, Flower, FlowerId, Leaf, LeafCluster, LeafClusterId,
    LeafId, Petal, PetalId, PlantId, PlantOptions, Rotation,
};

/// Root of a generated subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowPlant {
    /// Identifier of the plant.
    pub id: PlantId,
    /// Display name taken from the species record.
    pub name: Option<String>,
    /// Species the plant was grown from.
    pub species: Option<u32>,
    /// Scale applied when presenting the plant.
    pub zoom: f64,
    /// Placement of the plant's origin.
    pub position: Coordinate,
    /// Rotation of the whole plant.
    pub rotation: Rotation,
    /// Height of the plant's container.
    pub height: f64,
    /// Width of the plant's container.
    pub width: f64,
    /// Owned branches in generation order.
    pub branches: Vec<BranchId>,
    /// Owned leaf clusters in generation order.
    pub leaf_clusters: Vec<LeafClusterId>,
    /// Owned flowers in generation order.
    pub flowers: Vec<FlowerId>,
    /// Options the subtree was grown from.
    pub options: PlantOptions,
}

/// Stored branch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowBranch {
    /// Identifier of the branch.
    pub id: BranchId,
    /// Plant owning the branch.
    pub plant: PlantId,
    /// Branch geometry and options.
    pub branch: Branch,
}

/// Stored leaf cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowLeafCluster {
    /// Identifier of the cluster.
    pub id: LeafClusterId,
    /// Plant owning the cluster.
    pub plant: PlantId,
    /// Branch the cluster is anchored to.
    pub branch: BranchId,
    /// Owned leaves in arrangement order.
    pub leaves: Vec<LeafId>,
    /// Cluster placement and options.
    pub cluster: LeafCluster,
}

/// Stored flower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowFlower {
    /// Identifier of the flower.
    pub id: FlowerId,
    /// Plant owning the flower.
    pub plant: PlantId,
    /// Branch the flower is anchored to.
    pub branch: BranchId,
    /// Owned petals in arrangement order.
    pub petals: Vec<PetalId>,
    /// Flower placement and options.
    pub flower: Flower,
}

/// Stored leaf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowLeaf {
    /// Identifier of the leaf.
    pub id: LeafId,
    /// Cluster owning the leaf.
    pub cluster: LeafClusterId,
    /// Leaf geometry and options.
    pub leaf: Leaf,
}

/// Stored petal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowPetal {
    /// Identifier of the petal.
    pub id: PetalId,
    /// Flower owning the petal.
    pub flower: FlowerId,
    /// Petal geometry and options.
    pub petal: Petal,
}

/// Stored cluster children regenerated by index.
pub(crate) trait ClusterChild {
    type Id: Copy;
    type Parent: Copy;
    type Body;

    fn create(id: Self::Id, parent: Self::Parent, body: Self::Body) -> Self;
    fn replace_body(&mut self, body: Self::Body);
    fn entity(id: Self::Id) -> EntityId;
}

impl ClusterChild for GrowLeaf {
    type Id = LeafId;
    type Parent = LeafClusterId;
    type Body = Leaf;

    fn create(id: LeafId, cluster: LeafClusterId, leaf: Leaf) -> Self {
        Self { id, cluster, leaf }
    }

    fn replace_body(&mut self, leaf: Leaf) {
        self.leaf = leaf;
    }

    fn entity(id: LeafId) -> EntityId {
        EntityId::Leaf(id)
    }
}

impl ClusterChild for GrowPetal {
    type Id = PetalId;
    type Parent = FlowerId;
    type Body = Petal;

    fn create(id: PetalId, flower: FlowerId, petal: Petal) -> Self {
        Self { id, flower, petal }
    }

    fn replace_body(&mut self, petal: Petal) {
        self.petal = petal;
    }

    fn entity(id: PetalId) -> EntityId {
        EntityId::Petal(id)
    }
}
