//! Option snapshots that parameterise generation of every entity kind.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Color, Coordinate};

/// Plant height used when the source record does not provide one.
pub const DEFAULT_PLANT_HEIGHT: f64 = 200.0;
/// Plant spread used when the source record does not provide one.
pub const DEFAULT_PLANT_SPREAD: f64 = 200.0;
/// Leaf density used for every resolved plant.
pub const DEFAULT_LEAF_DENSITY: u32 = 5;
/// Orientation recorded when the source record does not provide one.
pub const DEFAULT_ORIENTATION: &str = "ERECT";

/// Height of the upper blade of a default leaf.
pub const DEFAULT_LEAF_TOP_HEIGHT: f64 = 30.0;
/// Height of the lower blade of a default leaf.
pub const DEFAULT_LEAF_BOTTOM_HEIGHT: f64 = 45.0;

/// Height of a petal, and of the flower cluster that holds it.
pub const FLOWER_HEIGHT: f64 = 15.0;
/// Gap between neighbouring petals; negative values overlap them.
pub const DEFAULT_FLOWER_SPACING: f64 = -2.0;
/// Number of petals in a default flower.
pub const DEFAULT_FLOWER_SIDES: u32 = 9;
/// Angular spread of a default flower in degrees.
pub const DEFAULT_FLOWER_AREA: f64 = 360.0;
/// Center color of a default flower.
pub const DEFAULT_FLOWER_CENTER: Color = Color::from_rgb(255, 0, 0);

/// Unrotated width of a freshly generated branch.
pub const DEFAULT_BRANCH_WIDTH: f64 = 5.0;

/// Leaf palette applied when the source record has no foliage colors.
pub const DEFAULT_LEAF_COLORS: [Color; 5] = [
    Color::from_rgb(0, 128, 0),
    Color::from_rgb(0, 255, 0),
    Color::from_rgb(128, 0, 128),
    Color::from_rgb(0, 255, 255),
    Color::from_rgb(0, 0, 255),
];

/// Flower palette applied when the source record has no flower colors.
pub const DEFAULT_FLOWER_COLORS: [Color; 3] = [
    Color::from_rgb(255, 165, 0),
    Color::from_rgb(255, 0, 255),
    Color::from_rgb(255, 255, 0),
];

/// Foliage texture, which selects the leaf-cluster arrangement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafTexture {
    /// Many narrow leaves per cluster.
    Fine,
    /// The default arrangement.
    #[default]
    Medium,
    /// Few broad leaves per cluster.
    Coarse,
}

impl LeafTexture {
    /// Every texture, in declaration order.
    pub const ALL: [LeafTexture; 3] = [Self::Fine, Self::Medium, Self::Coarse];

    /// Top and bottom blade heights of the default leaf for this texture.
    #[must_use]
    pub const fn leaf_size(self) -> (f64, f64) {
        match self {
            Self::Fine | Self::Medium | Self::Coarse => {
                (DEFAULT_LEAF_TOP_HEIGHT, DEFAULT_LEAF_BOTTOM_HEIGHT)
            }
        }
    }

    /// Spacing, leaf count and angular area of a default cluster for this texture.
    #[must_use]
    pub const fn cluster_spread(self) -> (f64, u32, f64) {
        match self {
            Self::Fine => (15.0, 5, 90.0),
            Self::Medium => (15.0, 4, 90.0),
            Self::Coarse => (25.0, 3, 90.0),
        }
    }
}

impl fmt::Display for LeafTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fine => "fine",
            Self::Medium => "medium",
            Self::Coarse => "coarse",
        };
        f.write_str(name)
    }
}

/// Error returned when a texture name is not one of `fine`, `medium`, `coarse`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown leaf texture `{0}`")]
pub struct UnknownTexture(pub String);

impl FromStr for LeafTexture {
    type Err = UnknownTexture;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fine" => Ok(Self::Fine),
            "medium" => Ok(Self::Medium),
            "coarse" => Ok(Self::Coarse),
            _ => Err(UnknownTexture(value.to_owned())),
        }
    }
}

/// Complete, defaulted parameters a plant is generated from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantOptions {
    /// Requested plant height.
    pub height: f64,
    /// Requested total horizontal spread.
    pub spread: f64,
    /// Palette leaves pick from.
    pub leaf_colors: Vec<Color>,
    /// Palette petals pick from.
    pub flower_colors: Vec<Color>,
    /// Foliage texture.
    pub leaf_texture: LeafTexture,
    /// Leaf density carried from the source; not yet consumed by generation.
    pub leaf_density: u32,
    /// Free-form growth orientation reported by the species data.
    pub orientation: String,
}

impl Default for PlantOptions {
    fn default() -> Self {
        Self {
            height: DEFAULT_PLANT_HEIGHT,
            spread: DEFAULT_PLANT_SPREAD,
            leaf_colors: DEFAULT_LEAF_COLORS.to_vec(),
            flower_colors: DEFAULT_FLOWER_COLORS.to_vec(),
            leaf_texture: LeafTexture::default(),
            leaf_density: DEFAULT_LEAF_DENSITY,
            orientation: DEFAULT_ORIENTATION.to_owned(),
        }
    }
}

impl PlantOptions {
    /// Reports whether moving to `other` changes the branch structure.
    ///
    /// Height, spread and texture all feed the bounds, so any of them
    /// changing requires the whole subtree to be regrown.
    #[must_use]
    pub fn structural_change(&self, other: &PlantOptions) -> bool {
        self.height != other.height
            || self.spread != other.spread
            || self.leaf_texture != other.leaf_texture
    }

    /// Reports whether moving to `other` changes either palette.
    #[must_use]
    pub fn palette_change(&self, other: &PlantOptions) -> bool {
        self.leaf_colors != other.leaf_colors || self.flower_colors != other.flower_colors
    }
}

/// Partial edit applied over an existing [`PlantOptions`] value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialPlantOptions {
    /// Replacement height.
    pub height: Option<f64>,
    /// Replacement spread.
    pub spread: Option<f64>,
    /// Replacement leaf palette.
    pub leaf_colors: Option<Vec<Color>>,
    /// Replacement flower palette.
    pub flower_colors: Option<Vec<Color>>,
    /// Replacement texture.
    pub leaf_texture: Option<LeafTexture>,
    /// Replacement leaf density.
    pub leaf_density: Option<u32>,
    /// Replacement orientation.
    pub orientation: Option<String>,
}

impl From<PlantOptions> for PartialPlantOptions {
    fn from(options: PlantOptions) -> Self {
        Self {
            height: Some(options.height),
            spread: Some(options.spread),
            leaf_colors: Some(options.leaf_colors),
            flower_colors: Some(options.flower_colors),
            leaf_texture: Some(options.leaf_texture),
            leaf_density: Some(options.leaf_density),
            orientation: Some(options.orientation),
        }
    }
}

/// Inputs that determine a single branch's geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchOptions {
    /// Point the branch grows from.
    pub start_point: Coordinate,
    /// Unrotated branch length.
    pub height: f64,
    /// Unrotated branch thickness.
    pub width: f64,
    /// Tilt in degrees; 0 points straight up the plant.
    pub angle: f64,
    /// Rendering tier; larger values draw above smaller ones.
    pub z_index: i32,
}

impl Default for BranchOptions {
    fn default() -> Self {
        Self {
            start_point: Coordinate::ORIGIN,
            height: 0.0,
            width: DEFAULT_BRANCH_WIDTH,
            angle: 0.0,
            z_index: 0,
        }
    }
}

/// Parameters of a leaf cluster and the leaves it arranges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafClusterOptions {
    /// Palette leaves pick from.
    pub colors: Vec<Color>,
    /// Texture selecting the leaf size.
    pub texture: LeafTexture,
    /// Gap subtracted from each leaf's width.
    pub spacing: f64,
    /// Requested number of leaves.
    pub sides: u32,
    /// Angular spread of the cluster in degrees.
    pub area: f64,
}

impl LeafClusterOptions {
    /// Derives the cluster options of every leaf cluster grown for `plant`.
    #[must_use]
    pub fn for_plant(plant: &PlantOptions) -> Self {
        let (spacing, sides, area) = plant.leaf_texture.cluster_spread();
        Self {
            colors: plant.leaf_colors.clone(),
            texture: plant.leaf_texture,
            spacing,
            sides,
            area,
        }
    }
}

/// Parameters of a flower and the petals it arranges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowerOptions {
    /// Palette petals pick from.
    pub colors: Vec<Color>,
    /// Gap subtracted from each petal's width.
    pub spacing: f64,
    /// Requested number of petals.
    pub sides: u32,
    /// Angular spread of the flower in degrees.
    pub area: f64,
    /// Color pinned to the center of every petal.
    pub center_color: Color,
}

impl FlowerOptions {
    /// Derives the options of every flower grown for `plant`.
    #[must_use]
    pub fn for_plant(plant: &PlantOptions) -> Self {
        Self {
            colors: plant.flower_colors.clone(),
            spacing: DEFAULT_FLOWER_SPACING,
            sides: DEFAULT_FLOWER_SIDES,
            area: DEFAULT_FLOWER_AREA,
            center_color: DEFAULT_FLOWER_CENTER,
        }
    }
}

/// Parameters of a single leaf.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafOptions {
    /// Color pinned to the leaf; `None` picks from the cluster palette.
    pub color: Option<Color>,
    /// Height of the upper blade.
    pub top_height: f64,
    /// Height of the lower blade.
    pub bottom_height: f64,
    /// Gap subtracted from the leaf's width.
    pub spacing: f64,
    /// Number of leaves sharing the cluster.
    pub sides: u32,
    /// Angular spread of the owning cluster in degrees.
    pub area: f64,
}

/// Parameters of a single petal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PetalOptions {
    /// Color pinned to the petal; `None` picks from the flower palette.
    pub color: Option<Color>,
    /// Petal height.
    pub height: f64,
    /// Gap subtracted from the petal's width.
    pub spacing: f64,
    /// Number of petals sharing the flower.
    pub sides: u32,
    /// Angular spread of the owning flower in degrees.
    pub area: f64,
    /// Color of the petal's center dot.
    pub center_color: Color,
}

/// Options payload targeting one entity kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EntityOptions {
    /// New options for a plant.
    Plant(PlantOptions),
    /// New options for a branch.
    Branch(BranchOptions),
    /// New options for a leaf cluster.
    LeafCluster(LeafClusterOptions),
    /// New options for a flower.
    Flower(FlowerOptions),
    /// New options for a leaf.
    Leaf(LeafOptions),
    /// New options for a petal.
    Petal(PetalOptions),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_parses_known_names() {
        assert_eq!(" Coarse ".parse::<LeafTexture>(), Ok(LeafTexture::Coarse));
        assert!("leathery".parse::<LeafTexture>().is_err());
        for texture in LeafTexture::ALL {
            assert_eq!(texture.to_string().parse::<LeafTexture>(), Ok(texture));
        }
    }

    #[test]
    fn structural_change_ignores_palette_and_density() {
        let base = PlantOptions::default();
        let recolored = PlantOptions {
            leaf_colors: vec![Color::from_rgb(1, 1, 1)],
            leaf_density: 9,
            ..base.clone()
        };
        assert!(!base.structural_change(&recolored));
        assert!(base.palette_change(&recolored));

        let taller = PlantOptions {
            height: 420.0,
            ..base.clone()
        };
        assert!(base.structural_change(&taller));
        assert!(!base.palette_change(&taller));
    }

    #[test]
    fn cluster_options_follow_plant_texture() {
        let plant = PlantOptions {
            leaf_texture: LeafTexture::Fine,
            ..PlantOptions::default()
        };
        let cluster = LeafClusterOptions::for_plant(&plant);
        assert_eq!(cluster.sides, 5);
        assert_eq!(cluster.texture, LeafTexture::Fine);
        assert_eq!(cluster.colors, plant.leaf_colors);
    }
}
