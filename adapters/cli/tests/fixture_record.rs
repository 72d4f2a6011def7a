use sprout_core::{Color, LeafTexture, PlantRecord};
use sprout_system_options::resolve_plant_options;

const LAVENDER: &str = include_str!("../fixtures/lavender.json");

#[test]
fn fixture_record_resolves_to_lavender_options() {
    let record: PlantRecord = serde_json::from_str(LAVENDER).expect("fixture parses");
    assert_eq!(record.display_name(), Some("English lavender"));

    let options = resolve_plant_options(&record, false);
    assert_eq!(options.height, 60.0);
    assert_eq!(options.spread, 90.0);
    assert_eq!(options.leaf_texture, LeafTexture::Fine);
    assert_eq!(
        options.flower_colors,
        vec![
            Color::from_rgb(128, 0, 128),
            Color::from_rgb(0xb5, 0x7e, 0xdc)
        ]
    );
    assert_eq!(options.leaf_colors.len(), 2);
}

#[test]
fn sparse_records_still_parse() {
    let record: PlantRecord =
        serde_json::from_str(r#"{ "main_species": { "growth": {} } }"#).expect("sparse parses");
    assert_eq!(record.display_name(), None);
    assert_eq!(record.spread(), None);
}
