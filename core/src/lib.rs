#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sprout plant generator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative entity graph, and the pure generation systems. Adapters
//! submit [`Command`] values describing desired mutations, the graph executes
//! them via its `apply` entry point, and then broadcasts [`Event`] values so
//! observers can react. Generation systems consume option snapshots and
//! return plain entity bodies; they never touch the graph themselves.

use serde::{Deserialize, Serialize};

mod color;
mod entities;
mod options;
mod record;

pub use color::{Color, ColorParseError};
pub use entities::{
    BorderSide, Branch, Flower, GrowBorder, GrowShape, Leaf, LeafCluster, Petal, Termination,
};
pub use options::{
    BranchOptions, EntityOptions, FlowerOptions, LeafClusterOptions, LeafOptions, LeafTexture,
    PartialPlantOptions, PetalOptions, PlantOptions, UnknownTexture, DEFAULT_BRANCH_WIDTH,
    DEFAULT_FLOWER_AREA, DEFAULT_FLOWER_CENTER, DEFAULT_FLOWER_COLORS, DEFAULT_FLOWER_SIDES,
    DEFAULT_FLOWER_SPACING, DEFAULT_LEAF_BOTTOM_HEIGHT, DEFAULT_LEAF_COLORS, DEFAULT_LEAF_DENSITY,
    DEFAULT_LEAF_TOP_HEIGHT, DEFAULT_ORIENTATION, DEFAULT_PLANT_HEIGHT, DEFAULT_PLANT_SPREAD,
    FLOWER_HEIGHT,
};
pub use record::{
    FlowerTraits, FoliageTraits, GrowthTraits, MainSpecies, Measurement, PlantRecord,
    Specifications,
};

/// Commands that express all permissible entity-graph mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Grows a brand new plant from a species record.
    GrowPlant {
        /// Species record the options are resolved from.
        record: Box<PlantRecord>,
        /// Expands each base color into lighter and darker variants.
        vary_colors: bool,
    },
    /// Discards an existing plant's subtree and regrows it from new options.
    RegrowPlant {
        /// Plant whose subtree is replaced.
        plant: PlantId,
        /// Edit merged over the plant's stored options before regrowing.
        edit: PartialPlantOptions,
    },
    /// Replaces an entity's options, regenerating whatever depends on them.
    SetEntityOptions {
        /// Entity receiving the options.
        entity: EntityId,
        /// Options payload; its kind must match the entity kind.
        options: EntityOptions,
    },
    /// Moves an entity.
    SetPosition {
        /// Entity being moved.
        entity: EntityId,
        /// New position.
        position: Coordinate,
    },
    /// Rotates an entity.
    SetRotation {
        /// Entity being rotated.
        entity: EntityId,
        /// New rotation.
        rotation: Rotation,
    },
    /// Deletes an entity together with everything it owns.
    DeleteEntity {
        /// Entity being deleted.
        entity: EntityId,
    },
}

/// Events broadcast by the entity graph after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// An entity was inserted into the graph.
    EntityAdded {
        /// Identifier allocated to the entity.
        entity: EntityId,
    },
    /// An existing entity's fields were replaced in place.
    EntityUpdated {
        /// Identifier of the updated entity.
        entity: EntityId,
    },
    /// An entity was removed from the graph.
    EntityRemoved {
        /// Identifier the entity had.
        entity: EntityId,
    },
    /// A plant finished growing, either freshly or through a regrow.
    PlantGrown {
        /// Plant that finished growing.
        plant: PlantId,
    },
    /// A regrow request could not be honoured.
    RegrowRejected {
        /// Plant named in the request.
        plant: PlantId,
        /// Specific reason the regrow failed.
        reason: RegrowError,
    },
    /// An edit request could not be honoured.
    EditRejected {
        /// Entity named in the request.
        entity: EntityId,
        /// Specific reason the edit failed.
        reason: EditError,
    },
}

/// Reasons a regrow request may be rejected by the entity graph.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum RegrowError {
    /// No plant with the requested identifier exists.
    #[error("original plant did not exist")]
    MissingPlant,
}

/// Reasons an edit request may be rejected by the entity graph.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum EditError {
    /// Cluster placement is derived from the anchoring branch.
    #[error("cluster placement is derived from its branch")]
    DerivedPlacement,
    /// The options payload targets a different entity kind.
    #[error("options do not match the entity kind")]
    OptionsMismatch,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to a plant.
    PlantId
);
entity_id!(
    /// Unique identifier assigned to a branch.
    BranchId
);
entity_id!(
    /// Unique identifier assigned to a leaf cluster.
    LeafClusterId
);
entity_id!(
    /// Unique identifier assigned to a flower.
    FlowerId
);
entity_id!(
    /// Unique identifier assigned to a leaf.
    LeafId
);
entity_id!(
    /// Unique identifier assigned to a petal.
    PetalId
);

/// Identifier of any entity stored in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityId {
    /// A plant.
    Plant(PlantId),
    /// A branch.
    Branch(BranchId),
    /// A leaf cluster.
    LeafCluster(LeafClusterId),
    /// A flower.
    Flower(FlowerId),
    /// A leaf.
    Leaf(LeafId),
    /// A petal.
    Petal(PetalId),
}

impl EntityId {
    /// Kind of entity the identifier refers to.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Plant(_) => EntityKind::Plant,
            Self::Branch(_) => EntityKind::Branch,
            Self::LeafCluster(_) => EntityKind::LeafCluster,
            Self::Flower(_) => EntityKind::Flower,
            Self::Leaf(_) => EntityKind::Leaf,
            Self::Petal(_) => EntityKind::Petal,
        }
    }
}

/// Kinds of entities stored in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Root of a generated subtree.
    Plant,
    /// Segment of the branch structure.
    Branch,
    /// Terminal group of leaves.
    LeafCluster,
    /// Terminal group of petals.
    Flower,
    /// Single leaf inside a cluster.
    Leaf,
    /// Single petal inside a flower.
    Petal,
}

/// Point in the abstract 2-D layout space; `y` grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Coordinate {
    /// The layout origin.
    pub const ORIGIN: Coordinate = Coordinate::new(0.0, 0.0);

    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Coordinate) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Rotation in degrees around each axis plus a depth translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Rotation around the horizontal axis.
    pub x: f64,
    /// Rotation around the vertical axis.
    pub y: f64,
    /// In-plane tilt.
    pub z: f64,
    /// Depth translation.
    pub translate: f64,
}

impl Rotation {
    /// No rotation at all.
    pub const NONE: Rotation = Rotation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        translate: 0.0,
    };

    /// In-plane tilt of `degrees` with no other component.
    #[must_use]
    pub const fn tilt(degrees: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: degrees,
            translate: 0.0,
        }
    }
}

/// Correction applied to a rotated branch's unrotated bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingOffset {
    /// Vertical drift caused by pivoting around the base.
    pub top: f64,
    /// Horizontal drift caused by pivoting around the base.
    pub left: f64,
}

/// Placement a terminal cluster inherits from its branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// End point of the anchoring branch.
    pub position: Coordinate,
    /// Rotation of the anchoring branch.
    pub rotation: Rotation,
    /// Bounding offset of the anchoring branch.
    pub offset: BoundingOffset,
}
