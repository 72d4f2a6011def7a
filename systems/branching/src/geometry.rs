//! Trigonometric layout of a single branch.
//!
//! Branches pivot around their bottom-center, so the unrotated box that
//! contains them drifts as they tilt; the offsets computed here undo that drift.

use sprout_core::{BoundingOffset, Branch, BranchOptions, Coordinate, Rotation, Termination};

/// Converts degrees to radians.
#[must_use]
pub fn radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Point reached by a branch of `length` leaving `start` at `angle` degrees.
///
/// 0° points along the growth axis, so sine feeds `x` and cosine feeds `y`.
#[must_use]
pub fn branch_end_point(start: Coordinate, length: f64, angle: f64) -> Coordinate {
    let angle = radians(angle);
    Coordinate::new(
        start.x + length * angle.sin(),
        start.y + length * angle.cos(),
    )
}

/// Correction for the drift a branch of `width` picks up when tilted by `angle`.
#[must_use]
pub fn bounding_offset(width: f64, angle: f64) -> BoundingOffset {
    let half_width = width / 2.0;
    BoundingOffset {
        top: half_width * (1.0 - radians(angle).cos()),
        left: (half_width * radians(90.0 - angle).cos()).abs(),
    }
}

/// Lays out a branch described by `options`.
#[must_use]
pub fn shape_branch(
    order: u32,
    base_index: u32,
    options: &BranchOptions,
    termination: Option<Termination>,
) -> Branch {
    let start = options.start_point;
    let end = branch_end_point(start, options.height, options.angle);
    let offset = bounding_offset(options.width, options.angle);

    let sideways = end.x - start.x;
    let left = if options.angle < 0.0 {
        -offset.left - sideways
    } else {
        -offset.left
    };
    let top = end.y.abs() - start.y - options.height + offset.top / 2.0;

    Branch {
        order,
        base_index,
        z_index: options.z_index,
        start_point: start,
        end_point: end,
        rotation: Rotation::tilt(options.angle),
        position: Coordinate::new(start.x.min(end.x), start.y),
        height: end.y - start.y + offset.top,
        width: sideways.abs() + offset.left / 2.0,
        branch_height: options.height,
        branch_width: options.width,
        branch_position: Coordinate::new(left, top),
        offset,
        termination,
        options: *options,
    }
}
