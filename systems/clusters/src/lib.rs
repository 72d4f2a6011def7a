#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Radial arrangement of the leaves and petals that make up a cluster.
//!
//! The same functions run when a branch first terminates and whenever an
//! existing cluster is edited, so they only read their inputs and the
//! injected random source.

use rand::{seq::SliceRandom, Rng};
use sprout_core::{
    Anchor, BorderSide, Color, Coordinate, Flower, FlowerOptions, GrowBorder, GrowShape, Leaf,
    LeafCluster, LeafClusterOptions, LeafOptions, Petal, PetalOptions, Rotation,
    DEFAULT_FLOWER_COLORS, DEFAULT_LEAF_COLORS, FLOWER_HEIGHT,
};

/// Fewest shapes a cluster is ever arranged with.
pub const MIN_CLUSTER_SIDES: u32 = 3;

/// Widest angular spread a cluster may cover, in degrees.
pub const MAX_CLUSTER_AREA: f64 = 360.0;

/// Thickness of the dot drawn at the center of every petal.
pub const PETAL_CENTER_SIZE: f64 = 5.0;

/// A leaf cluster together with the leaves it arranges.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafClusterBlueprint {
    /// The cluster itself.
    pub cluster: LeafCluster,
    /// Leaves in arrangement order.
    pub leaves: Vec<Leaf>,
}

/// A flower together with the petals it arranges.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowerBlueprint {
    /// The flower itself.
    pub flower: Flower,
    /// Petals in arrangement order.
    pub petals: Vec<Petal>,
}

/// Number of shapes a cluster configured with `sides` actually holds.
#[must_use]
pub fn cluster_sides(sides: u32) -> u32 {
    sides.max(MIN_CLUSTER_SIDES)
}

/// Width of one wedge when `sides` wedges of the given `height` share a circle.
///
/// Never narrower than a single unit, however large `spacing` is.
#[must_use]
pub fn leaf_width(height: f64, sides: u32, spacing: f64) -> f64 {
    let sides = f64::from(cluster_sides(sides));
    let width = (2.0 * height * (std::f64::consts::PI / (2.0 * sides)).tan()).round() - spacing;
    if width.is_finite() {
        width.max(1.0)
    } else {
        1.0
    }
}

/// Grows a leaf cluster anchored at the end of a terminating branch.
pub fn grow_leaf_cluster<R>(
    anchor: Anchor,
    order: u32,
    z_index: i32,
    options: &LeafClusterOptions,
    rng: &mut R,
) -> LeafClusterBlueprint
where
    R: Rng + ?Sized,
{
    let (top, bottom) = options.texture.leaf_size();
    let leaves = grow_leaves(order, z_index, options, rng);
    tracing::trace!(order, z_index, leaves = leaves.len(), "grew leaf cluster");

    LeafClusterBlueprint {
        cluster: LeafCluster {
            order,
            z_index,
            anchor,
            height: top + bottom,
            width: top + bottom,
            options: options.clone(),
        },
        leaves,
    }
}

/// Arranges the leaves of a cluster described by `options`.
pub fn grow_leaves<R>(
    order: u32,
    z_index: i32,
    options: &LeafClusterOptions,
    rng: &mut R,
) -> Vec<Leaf>
where
    R: Rng + ?Sized,
{
    let sides = cluster_sides(options.sides);
    let (top_height, bottom_height) = options.texture.leaf_size();

    arrangement(sides, options.area)
        .map(|rotation| {
            let color = pick_color(&options.colors, &DEFAULT_LEAF_COLORS, rng);
            let leaf_options = LeafOptions {
                color: Some(color),
                top_height,
                bottom_height,
                spacing: options.spacing,
                sides,
                area: options.area,
            };
            shape_leaf(order, z_index, rotation, leaf_options, color)
        })
        .collect()
}

/// Grows a flower anchored at the end of a terminating branch.
pub fn grow_flower<R>(
    anchor: Anchor,
    order: u32,
    z_index: i32,
    options: &FlowerOptions,
    rng: &mut R,
) -> FlowerBlueprint
where
    R: Rng + ?Sized,
{
    let petals = grow_petals(order, z_index, options, rng);
    tracing::trace!(order, z_index, petals = petals.len(), "grew flower");

    FlowerBlueprint {
        flower: Flower {
            order,
            z_index,
            anchor,
            height: FLOWER_HEIGHT,
            width: FLOWER_HEIGHT,
            options: options.clone(),
        },
        petals,
    }
}

/// Arranges the petals of a flower described by `options`.
pub fn grow_petals<R>(
    order: u32,
    z_index: i32,
    options: &FlowerOptions,
    rng: &mut R,
) -> Vec<Petal>
where
    R: Rng + ?Sized,
{
    let sides = cluster_sides(options.sides);

    arrangement(sides, options.area)
        .map(|rotation| {
            let color = pick_color(&options.colors, &DEFAULT_FLOWER_COLORS, rng);
            let petal_options = PetalOptions {
                color: Some(color),
                height: FLOWER_HEIGHT,
                spacing: options.spacing,
                sides,
                area: options.area,
                center_color: options.center_color,
            };
            shape_petal(order, z_index, rotation, petal_options, color)
        })
        .collect()
}

/// Recomputes a single leaf's size and shapes from edited options.
///
/// The leaf keeps its rotation; without a pinned color it keeps its current one.
#[must_use]
pub fn reshape_leaf(leaf: &Leaf, options: LeafOptions) -> Leaf {
    let color = options
        .color
        .or(leaf.options.color)
        .or_else(|| leaf.shapes.first().map(|shape| shape.color))
        .unwrap_or(DEFAULT_LEAF_COLORS[0]);
    shape_leaf(leaf.order, leaf.z_index, leaf.rotation, options, color)
}

/// Recomputes a single petal's size and shapes from edited options.
///
/// The petal keeps its rotation; without a pinned color it keeps its current one.
#[must_use]
pub fn reshape_petal(petal: &Petal, options: PetalOptions) -> Petal {
    let color = options
        .color
        .or(petal.options.color)
        .or_else(|| petal.shapes.first().map(|shape| shape.color))
        .unwrap_or(DEFAULT_FLOWER_COLORS[0]);
    shape_petal(petal.order, petal.z_index, petal.rotation, options, color)
}

/// Rotations of `sides` shapes fanned evenly across `area`, centered on 0°.
fn arrangement(sides: u32, area: f64) -> impl Iterator<Item = Rotation> {
    let area = if area.is_nan() {
        0.0
    } else {
        area.clamp(0.0, MAX_CLUSTER_AREA)
    };
    let angle_increment = area / f64::from(sides - 1);
    let center = f64::from(sides - 1) / 2.0;

    (0..sides).map(move |index| Rotation::tilt(angle_increment * (f64::from(index) - center)))
}

fn pick_color<R>(palette: &[Color], fallback: &[Color], rng: &mut R) -> Color
where
    R: Rng + ?Sized,
{
    let palette = if palette.is_empty() { fallback } else { palette };
    palette
        .choose(rng)
        .copied()
        .unwrap_or(DEFAULT_LEAF_COLORS[0])
}

fn shape_leaf(
    order: u32,
    z_index: i32,
    rotation: Rotation,
    options: LeafOptions,
    color: Color,
) -> Leaf {
    let top_height = options.top_height.max(0.0);
    let bottom_height = options.bottom_height.max(0.0);
    let width = leaf_width(bottom_height, options.sides, options.spacing);
    let height = top_height + bottom_height;

    let sides = GrowBorder {
        left: Some(BorderSide::hidden(width / 2.0)),
        right: Some(BorderSide::hidden(width / 2.0)),
        ..GrowBorder::default()
    };
    let upper = GrowShape {
        color,
        position: Coordinate::ORIGIN,
        rotation: Rotation::NONE,
        border: GrowBorder {
            bottom: Some(BorderSide::shown(top_height)),
            ..sides
        },
    };
    let lower = GrowShape {
        color,
        position: Coordinate::new(0.0, top_height - 1.0),
        rotation: Rotation::NONE,
        border: GrowBorder {
            top: Some(BorderSide::shown(bottom_height)),
            ..sides
        },
    };

    Leaf {
        order,
        z_index,
        position: Coordinate::new(height / 2.0 - width / 2.0, 0.0),
        rotation,
        height,
        width,
        shapes: vec![upper, lower],
        options,
    }
}

fn shape_petal(
    order: u32,
    z_index: i32,
    rotation: Rotation,
    options: PetalOptions,
    color: Color,
) -> Petal {
    let height = options.height.max(0.0);
    let width = leaf_width(height, options.sides, options.spacing);

    let blade = GrowShape {
        color,
        position: Coordinate::ORIGIN,
        rotation: Rotation::NONE,
        border: GrowBorder {
            left: Some(BorderSide::hidden(width / 2.0)),
            right: Some(BorderSide::hidden(width / 2.0)),
            bottom: Some(BorderSide::shown(height)),
            top: None,
        },
    };
    let dot = BorderSide::shown(PETAL_CENTER_SIZE);
    let center = GrowShape {
        color: options.center_color,
        position: Coordinate::new(0.0, -PETAL_CENTER_SIZE),
        rotation: Rotation::NONE,
        border: GrowBorder {
            top: Some(dot),
            right: Some(dot),
            bottom: Some(dot),
            left: Some(dot),
        },
    };

    Petal {
        order,
        z_index,
        position: Coordinate::new(height / 2.0 - width / 2.0, 0.0),
        rotation,
        height,
        width,
        shapes: vec![blade, center],
        options,
    }
}
