//! Geometry and option payloads of generated plant parts.
//!
//! These bodies carry no identifiers: generation produces them first and the
//! entity graph wraps them with ids and parent links on insertion.

use serde::{Deserialize, Serialize};

use crate::{
    Anchor, BoundingOffset, BranchOptions, Color, Coordinate, FlowerOptions, LeafClusterOptions,
    LeafOptions, PetalOptions, Rotation,
};

/// Terminal cluster a branch ends in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// The branch ends in a leaf cluster.
    LeafCluster,
    /// The branch ends in a flower.
    Flower,
}

/// Generated branch geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Recursion depth, 1 for base branches.
    pub order: u32,
    /// Index of the base branch this branch descends from.
    pub base_index: u32,
    /// Rendering tier inherited from the base branch.
    pub z_index: i32,
    /// Point the branch grows from.
    pub start_point: Coordinate,
    /// Point the branch reaches.
    pub end_point: Coordinate,
    /// Tilt of the branch; `z` mirrors the branch angle.
    pub rotation: Rotation,
    /// Upper-left corner of the rendered bounding box.
    pub position: Coordinate,
    /// Height of the rendered bounding box.
    pub height: f64,
    /// Width of the rendered bounding box.
    pub width: f64,
    /// Unrotated branch length.
    pub branch_height: f64,
    /// Unrotated branch thickness.
    pub branch_width: f64,
    /// Offset-corrected position of the branch inside its bounding box.
    pub branch_position: Coordinate,
    /// Correction for the drift introduced by pivoting around the base.
    pub offset: BoundingOffset,
    /// Terminal cluster, `None` for branches that split further.
    pub termination: Option<Termination>,
    /// Options the geometry was computed from.
    pub options: BranchOptions,
}

impl Branch {
    /// Reports whether the branch ends in a leaf cluster.
    #[must_use]
    pub fn has_leaf(&self) -> bool {
        self.termination == Some(Termination::LeafCluster)
    }

    /// Reports whether the branch ends in a flower.
    #[must_use]
    pub fn has_flower(&self) -> bool {
        self.termination == Some(Termination::Flower)
    }

    /// Placement a terminal cluster inherits from this branch.
    #[must_use]
    pub fn anchor(&self) -> Anchor {
        Anchor {
            position: self.end_point,
            rotation: self.rotation,
            offset: self.offset,
        }
    }
}

/// Generated leaf cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafCluster {
    /// Recursion depth the cluster was grown at.
    pub order: u32,
    /// Rendering tier, one above the anchoring branch.
    pub z_index: i32,
    /// Placement inherited from the anchoring branch.
    pub anchor: Anchor,
    /// Height of the cluster.
    pub height: f64,
    /// Width of the cluster.
    pub width: f64,
    /// Options the cluster's leaves were arranged from.
    pub options: LeafClusterOptions,
}

/// Generated flower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flower {
    /// Recursion depth the flower was grown at.
    pub order: u32,
    /// Rendering tier, one above the anchoring branch.
    pub z_index: i32,
    /// Placement inherited from the anchoring branch.
    pub anchor: Anchor,
    /// Height of the flower.
    pub height: f64,
    /// Width of the flower.
    pub width: f64,
    /// Options the flower's petals were arranged from.
    pub options: FlowerOptions,
}

/// Generated leaf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    /// Order of the owning cluster.
    pub order: u32,
    /// Rendering tier of the owning cluster.
    pub z_index: i32,
    /// Position relative to the cluster anchor.
    pub position: Coordinate,
    /// Rotation around the cluster anchor.
    pub rotation: Rotation,
    /// Total leaf height.
    pub height: f64,
    /// Leaf width.
    pub width: f64,
    /// Rendering primitives.
    pub shapes: Vec<GrowShape>,
    /// Options the leaf was shaped from.
    pub options: LeafOptions,
}

/// Generated petal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Petal {
    /// Order of the owning flower.
    pub order: u32,
    /// Rendering tier of the owning flower.
    pub z_index: i32,
    /// Position relative to the flower anchor.
    pub position: Coordinate,
    /// Rotation around the flower anchor.
    pub rotation: Rotation,
    /// Petal height.
    pub height: f64,
    /// Petal width.
    pub width: f64,
    /// Rendering primitives.
    pub shapes: Vec<GrowShape>,
    /// Options the petal was shaped from.
    pub options: PetalOptions,
}

/// One edge of a [`GrowBorder`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorderSide {
    /// Thickness of the edge.
    pub size: f64,
    /// Whether the edge is painted; hidden edges only shape the neighbours.
    pub show: bool,
}

impl BorderSide {
    /// A painted edge of the given thickness.
    #[must_use]
    pub const fn shown(size: f64) -> Self {
        Self { size, show: true }
    }

    /// A transparent edge of the given thickness.
    #[must_use]
    pub const fn hidden(size: f64) -> Self {
        Self { size, show: false }
    }
}

/// Border description of a shape; absent edges are not drawn at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowBorder {
    /// Upper edge.
    pub top: Option<BorderSide>,
    /// Right edge.
    pub right: Option<BorderSide>,
    /// Lower edge.
    pub bottom: Option<BorderSide>,
    /// Left edge.
    pub left: Option<BorderSide>,
}

/// Rendering primitive: a bordered box in a single color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowShape {
    /// Fill color of the painted edges.
    pub color: Color,
    /// Position relative to the owning leaf or petal.
    pub position: Coordinate,
    /// Rotation relative to the owning leaf or petal.
    pub rotation: Rotation,
    /// Border description.
    pub border: GrowBorder,
}
