//! Species record consumed from the plant-data service.
//!
//! Every field is optional: the service reports `null` for unknown traits and
//! omits whole sections for sparsely documented species. Accessors flatten the
//! nested payload into the handful of traits generation cares about.

use serde::{Deserialize, Serialize};

/// Species record as delivered by the plant-data service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantRecord {
    /// Identifier of the listing entry.
    pub id: Option<u32>,
    /// Common name of the listing entry.
    pub common_name: Option<String>,
    /// Identifier of the species the listing points at.
    pub main_species_id: Option<u32>,
    /// Detailed species traits.
    pub main_species: MainSpecies,
}

/// Detailed traits of the species behind a [`PlantRecord`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainSpecies {
    /// Common name of the species.
    pub common_name: Option<String>,
    /// Flower traits.
    pub flower: FlowerTraits,
    /// Foliage traits.
    pub foliage: FoliageTraits,
    /// Physical specifications.
    pub specifications: Specifications,
    /// Growth traits.
    pub growth: GrowthTraits,
}

/// Flower traits reported for a species.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerTraits {
    /// Flower color names.
    pub color: Option<Vec<String>>,
}

/// Foliage traits reported for a species.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoliageTraits {
    /// Texture name such as `fine`, `medium` or `coarse`.
    pub texture: Option<String>,
    /// Foliage color names.
    pub color: Option<Vec<String>>,
}

/// Physical specifications reported for a species.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specifications {
    /// Free-form shape and orientation description.
    pub shape_and_orientation: Option<String>,
    /// Average adult height.
    pub average_height: Measurement,
}

/// Growth traits reported for a species.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthTraits {
    /// Horizontal spread.
    pub spread: Measurement,
}

/// Length measured in centimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurement {
    /// Value in centimetres, when known.
    pub cm: Option<f64>,
}

impl PlantRecord {
    /// Name shown for plants grown from this record.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.main_species
            .common_name
            .as_deref()
            .or(self.common_name.as_deref())
    }

    /// Reference back to the species the record describes.
    #[must_use]
    pub fn species_id(&self) -> Option<u32> {
        self.main_species_id.or(self.id)
    }

    /// Growth orientation, if reported.
    #[must_use]
    pub fn orientation(&self) -> Option<&str> {
        self.main_species
            .specifications
            .shape_and_orientation
            .as_deref()
    }

    /// Average height in centimetres, if reported.
    #[must_use]
    pub fn average_height(&self) -> Option<f64> {
        self.main_species.specifications.average_height.cm
    }

    /// Spread in centimetres, if reported.
    #[must_use]
    pub fn spread(&self) -> Option<f64> {
        self.main_species.growth.spread.cm
    }

    /// Flower color names, if reported.
    #[must_use]
    pub fn flower_colors(&self) -> Option<&[String]> {
        self.main_species.flower.color.as_deref()
    }

    /// Foliage color names, if reported.
    #[must_use]
    pub fn foliage_colors(&self) -> Option<&[String]> {
        self.main_species.foliage.color.as_deref()
    }

    /// Foliage texture name, if reported.
    #[must_use]
    pub fn foliage_texture(&self) -> Option<&str> {
        self.main_species.foliage.texture.as_deref()
    }
}
