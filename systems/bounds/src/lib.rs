#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generation bounds derived from plant options.
//!
//! Every output is clamped into a range the branch generator can work with,
//! so absurd, negative or non-finite input never escapes this crate.

use sprout_core::PlantOptions;

/// Spread at or below which a plant grows a single trunk.
pub const SINGLE_TRUNK_SPREAD: f64 = 30.0;

/// Upper bound on the number of base branches.
pub const MAX_BASE_BRANCHES: u32 = 5;

/// Vertical span the height budget is divided into when counting base branches.
pub const HEIGHT_PER_BASE_BRANCH: f64 = 100.0;

/// Outermost base-branch angle in degrees.
pub const BASE_ANGLE_SPREAD: f64 = 45.0;

/// Clamp range of the total height budget.
pub const HEIGHT_RANGE: (f64, f64) = (1.0, 800.0);

/// Clamp range of the budget available on each side of the trunk.
pub const SIDE_SPREAD_RANGE: (f64, f64) = (0.0, 450.0);

/// Clamp range of a base branch's length.
pub const BRANCH_HEIGHT_RANGE: (f64, f64) = (50.0, 150.0);

/// Bounds a single plant is grown within.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchBounds {
    /// Number of base branches growing from the plant's origin.
    pub total_base_branches: u32,
    /// Index of the centered base branch.
    pub mid_branch: u32,
    /// Magnitude of the outermost base-branch angle.
    pub angle_max: f64,
    /// Angle between neighbouring base branches.
    pub angle_increment: f64,
    /// Total height budget.
    pub max_height: f64,
    /// Width budget on each side of the trunk.
    pub max_side_spread: f64,
    /// Length of every base branch.
    pub max_branch_height: f64,
    /// Height reserved so a branch can still end in a cluster.
    pub growth_increment: f64,
}

impl BranchBounds {
    /// Derives the bounds for a plant grown from `options`.
    #[must_use]
    pub fn from_options(options: &PlantOptions) -> Self {
        let total_base_branches = base_branch_count(options.height, options.spread);
        let mid_branch = total_base_branches / 2;

        let (angle_max, angle_increment) = if total_base_branches > 1 {
            (
                BASE_ANGLE_SPREAD,
                BASE_ANGLE_SPREAD * 2.0 / f64::from(total_base_branches - 1),
            )
        } else {
            (0.0, 0.0)
        };

        let max_height = clamp_finite(options.height, HEIGHT_RANGE);
        let max_side_spread = clamp_finite(options.spread / 2.0, SIDE_SPREAD_RANGE);
        let max_branch_height = clamp_finite(max_height / 4.0, BRANCH_HEIGHT_RANGE);

        let (top, bottom) = options.leaf_texture.leaf_size();

        Self {
            total_base_branches,
            mid_branch,
            angle_max,
            angle_increment,
            max_height,
            max_side_spread,
            max_branch_height,
            growth_increment: top + bottom,
        }
    }

    /// Starting angle of base branch `index`.
    #[must_use]
    pub fn base_angle(&self, index: u32) -> f64 {
        -self.angle_max + f64::from(index) * self.angle_increment
    }

    /// Distance of base branch `index` from the centered branch.
    #[must_use]
    pub fn distance_from_mid(&self, index: u32) -> u32 {
        self.mid_branch.abs_diff(index)
    }

    /// Height budget of base branch `index`; outer branches receive less.
    #[must_use]
    pub fn height_budget(&self, index: u32) -> f64 {
        self.max_height / f64::from(self.distance_from_mid(index) + 1)
    }

    /// Rendering tier of base branch `index`; the center branch draws on top.
    #[must_use]
    pub fn z_index(&self, index: u32) -> i32 {
        let tiers =
            i64::from(self.total_base_branches / 2) - i64::from(self.distance_from_mid(index));
        i32::try_from((tiers + 1) * 10).unwrap_or(0)
    }
}

fn base_branch_count(height: f64, spread: f64) -> u32 {
    if spread.is_nan() || spread <= SINGLE_TRUNK_SPREAD {
        return 1;
    }

    let raw = if height.is_finite() {
        (height / HEIGHT_PER_BASE_BRANCH).ceil()
    } else if height > 0.0 {
        f64::from(MAX_BASE_BRANCHES)
    } else {
        1.0
    };
    let count = raw.clamp(1.0, f64::from(MAX_BASE_BRANCHES)) as u32;

    if count % 2 == 0 {
        count + 1
    } else {
        count
    }
}

fn clamp_finite(value: f64, (lower, upper): (f64, f64)) -> f64 {
    if value.is_nan() {
        lower
    } else {
        value.clamp(lower, upper)
    }
}
