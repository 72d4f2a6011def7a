#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Option resolution turning sparse species records into complete plant options.
//!
//! Resolution is total: every field the record leaves out, reports as `null`
//! or fills with an unusable value falls back to a fixed default.

use sprout_core::{
    Color, LeafTexture, PartialPlantOptions, PlantOptions, PlantRecord, DEFAULT_FLOWER_COLORS,
    DEFAULT_LEAF_COLORS, DEFAULT_LEAF_DENSITY, DEFAULT_ORIENTATION, DEFAULT_PLANT_HEIGHT,
    DEFAULT_PLANT_SPREAD,
};

/// Amount added to or subtracted from every channel when varying a palette.
pub const COLOR_VARIATION_DELTA: i16 = 30;

/// Highest channel value a varied color may reach, keeping it off pure white.
pub const COLOR_VARIATION_CEILING: u8 = 220;

/// Resolves the complete options a plant grown from `record` uses.
///
/// When `vary_colors` is set both palettes are expanded with [`vary_palette`].
#[must_use]
pub fn resolve_plant_options(record: &PlantRecord, vary_colors: bool) -> PlantOptions {
    let height = usable_length(record.average_height()).unwrap_or(DEFAULT_PLANT_HEIGHT);
    let spread = usable_length(record.spread()).unwrap_or(DEFAULT_PLANT_SPREAD);

    let mut leaf_colors = resolve_palette(record.foliage_colors(), &DEFAULT_LEAF_COLORS);
    let mut flower_colors = resolve_palette(record.flower_colors(), &DEFAULT_FLOWER_COLORS);
    if vary_colors {
        leaf_colors = vary_palette(&leaf_colors);
        flower_colors = vary_palette(&flower_colors);
    }

    let leaf_texture = record
        .foliage_texture()
        .and_then(|name| match name.parse::<LeafTexture>() {
            Ok(texture) => Some(texture),
            Err(error) => {
                tracing::debug!(%error, "falling back to default leaf texture");
                None
            }
        })
        .unwrap_or_default();

    let orientation = record
        .orientation()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_ORIENTATION)
        .to_owned();

    let options = PlantOptions {
        height,
        spread,
        leaf_colors,
        flower_colors,
        leaf_texture,
        leaf_density: DEFAULT_LEAF_DENSITY,
        orientation,
    };

    tracing::debug!(
        species = ?record.species_id(),
        height = options.height,
        spread = options.spread,
        texture = %options.leaf_texture,
        leaf_colors = options.leaf_colors.len(),
        flower_colors = options.flower_colors.len(),
        "resolved plant options"
    );

    options
}

/// Overlays a partial edit onto existing options.
///
/// Unusable replacement values (zero or non-finite lengths, empty palettes,
/// blank orientation) leave the existing value in place.
#[must_use]
pub fn merge_options(existing: &PlantOptions, partial: &PartialPlantOptions) -> PlantOptions {
    PlantOptions {
        height: usable_length(partial.height).unwrap_or(existing.height),
        spread: usable_length(partial.spread).unwrap_or(existing.spread),
        leaf_colors: partial
            .leaf_colors
            .clone()
            .filter(|colors| !colors.is_empty())
            .unwrap_or_else(|| existing.leaf_colors.clone()),
        flower_colors: partial
            .flower_colors
            .clone()
            .filter(|colors| !colors.is_empty())
            .unwrap_or_else(|| existing.flower_colors.clone()),
        leaf_texture: partial.leaf_texture.unwrap_or(existing.leaf_texture),
        leaf_density: partial.leaf_density.unwrap_or(existing.leaf_density),
        orientation: partial
            .orientation
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(|| existing.orientation.clone(), str::to_owned),
    }
}

/// Expands each base color into a lighter, an unchanged and a darker variant.
#[must_use]
pub fn vary_palette(colors: &[Color]) -> Vec<Color> {
    colors
        .iter()
        .flat_map(|&color| {
            [
                color.shifted(COLOR_VARIATION_DELTA, COLOR_VARIATION_CEILING),
                color,
                color.shifted(-COLOR_VARIATION_DELTA, COLOR_VARIATION_CEILING),
            ]
        })
        .collect()
}

fn usable_length(value: Option<f64>) -> Option<f64> {
    value.filter(|length| length.is_finite() && *length != 0.0)
}

fn resolve_palette(names: Option<&[String]>, fallback: &[Color]) -> Vec<Color> {
    let parsed: Vec<Color> = names
        .unwrap_or_default()
        .iter()
        .filter_map(|name| match name.parse::<Color>() {
            Ok(color) => Some(color),
            Err(error) => {
                tracing::debug!(%error, "dropping unparseable palette color");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        fallback.to_vec()
    } else {
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::{FoliageTraits, MainSpecies, Measurement};

    fn record_with(height: Option<f64>, flowers: Option<Vec<&str>>) -> PlantRecord {
        let mut record = PlantRecord::default();
        record.main_species.specifications.average_height = Measurement { cm: height };
        record.main_species.flower.color =
            flowers.map(|names| names.into_iter().map(str::to_owned).collect());
        record
    }

    #[test]
    fn empty_record_resolves_to_defaults() {
        let options = resolve_plant_options(&PlantRecord::default(), false);
        assert_eq!(options, PlantOptions::default());
    }

    #[test]
    fn zero_and_non_finite_lengths_count_as_missing() {
        for height in [Some(0.0), Some(f64::NAN), Some(f64::INFINITY), None] {
            let options = resolve_plant_options(&record_with(height, None), false);
            assert_eq!(options.height, DEFAULT_PLANT_HEIGHT);
        }

        let options = resolve_plant_options(&record_with(Some(420.0), None), false);
        assert_eq!(options.height, 420.0);
    }

    #[test]
    fn unparseable_colors_are_dropped() {
        let record = record_with(None, Some(vec!["Red", "not-a-color", "#0000ff"]));
        let options = resolve_plant_options(&record, false);
        assert_eq!(
            options.flower_colors,
            vec![Color::from_rgb(255, 0, 0), Color::from_rgb(0, 0, 255)]
        );
    }

    #[test]
    fn fully_unparseable_palette_falls_back_to_default() {
        let record = record_with(None, Some(vec!["sparkly", ""]));
        let options = resolve_plant_options(&record, false);
        assert_eq!(options.flower_colors, DEFAULT_FLOWER_COLORS.to_vec());
    }

    #[test]
    fn texture_and_orientation_come_from_record() {
        let mut record = PlantRecord {
            main_species: MainSpecies {
                foliage: FoliageTraits {
                    texture: Some("Coarse".to_owned()),
                    color: None,
                },
                ..MainSpecies::default()
            },
            ..PlantRecord::default()
        };
        record.main_species.specifications.shape_and_orientation = Some("Spreading".to_owned());

        let options = resolve_plant_options(&record, false);
        assert_eq!(options.leaf_texture, LeafTexture::Coarse);
        assert_eq!(options.orientation, "Spreading");
    }

    #[test]
    fn unknown_texture_falls_back_to_medium() {
        let mut record = PlantRecord::default();
        record.main_species.foliage.texture = Some("velvety".to_owned());
        let options = resolve_plant_options(&record, false);
        assert_eq!(options.leaf_texture, LeafTexture::Medium);
    }

    #[test]
    fn varied_palette_triples_each_color() {
        let palette = vary_palette(&[Color::from_rgb(200, 100, 10)]);
        assert_eq!(
            palette,
            vec![
                Color::from_rgb(220, 130, 40),
                Color::from_rgb(200, 100, 10),
                Color::from_rgb(170, 70, 0),
            ]
        );

        let options = resolve_plant_options(&PlantRecord::default(), true);
        assert_eq!(options.leaf_colors.len(), DEFAULT_LEAF_COLORS.len() * 3);
        assert_eq!(options.flower_colors.len(), DEFAULT_FLOWER_COLORS.len() * 3);
    }

    #[test]
    fn merge_keeps_existing_values_for_unusable_replacements() {
        let existing = PlantOptions::default();
        let partial = PartialPlantOptions {
            height: Some(0.0),
            spread: Some(350.0),
            leaf_colors: Some(Vec::new()),
            leaf_texture: Some(LeafTexture::Fine),
            orientation: Some("  ".to_owned()),
            ..PartialPlantOptions::default()
        };

        let merged = merge_options(&existing, &partial);
        assert_eq!(merged.height, existing.height);
        assert_eq!(merged.spread, 350.0);
        assert_eq!(merged.leaf_colors, existing.leaf_colors);
        assert_eq!(merged.leaf_texture, LeafTexture::Fine);
        assert_eq!(merged.orientation, existing.orientation);
        assert!(existing.structural_change(&merged));
    }
}
