use serde::{Deserialize, Serialize};

/// Knobs controlling how branches diverge and when they stop splitting.
///
/// The termination weights are empirical; they shape the silhouette rather
/// than model anything physical.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthTuning {
    /// Degrees every child turns away from its parent before jitter.
    pub angle_step: f64,
    /// Largest random extra turn, in degrees, added to each child.
    pub max_jitter: f64,
    /// Child angles never tilt further than this many degrees.
    pub angle_limit: f64,
    /// Shortest child branch.
    pub min_branch_length: f64,
    /// Share of the termination chance driven by spent height budget.
    pub height_weight: f64,
    /// Share of the termination chance driven by spent width budget.
    pub width_weight: f64,
    /// Share of the termination chance driven by recursion depth.
    pub order_weight: f64,
    /// Multiplier for children pointing away from the plant's center line.
    pub outward_bias: f64,
    /// Multiplier for children pointing back toward the center line.
    pub inward_bias: f64,
    /// Multiplier for children of a perfectly upright parent.
    pub center_bias: f64,
    /// Chance that a terminating child ends in a flower rather than leaves.
    pub flower_chance: f64,
}

impl Default for GrowthTuning {
    fn default() -> Self {
        Self {
            angle_step: 20.0,
            max_jitter: 15.0,
            angle_limit: 80.0,
            min_branch_length: 50.0,
            height_weight: 0.5,
            width_weight: 0.2,
            order_weight: 0.3,
            outward_bias: 1.0,
            inward_bias: 0.5,
            center_bias: 0.75,
            flower_chance: 0.2,
        }
    }
}

/// Side of the parent a child branch grows on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl GrowthTuning {
    /// Chance that a child on `side` of a parent tilted by `parent_angle` terminates.
    ///
    /// `spent_height` and `spent_width` are the fractions of the base branch's
    /// budgets already consumed; both are clamped to `[0, 1]`.
    pub(crate) fn termination_chance(
        &self,
        side: Side,
        parent_angle: f64,
        order: u32,
        spent_height: f64,
        spent_width: f64,
    ) -> f64 {
        let depth = 1.0 - 1.0 / f64::from(order.max(1));
        let weighted = self.height_weight * unit(spent_height)
            + self.width_weight * unit(spent_width)
            + self.order_weight * depth;
        let total_weight = self.height_weight + self.width_weight + self.order_weight;
        let base = if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        };

        let bias = match (side, parent_angle) {
            (_, angle) if angle == 0.0 => self.center_bias,
            (Side::Left, angle) if angle < 0.0 => self.outward_bias,
            (Side::Right, angle) if angle > 0.0 => self.outward_bias,
            _ => self.inward_bias,
        };

        unit(base * bias)
    }

    /// Angle of a child on `side`, turned by the step plus `jitter` and bounded.
    pub(crate) fn child_angle(&self, side: Side, parent_angle: f64, jitter: f64) -> f64 {
        let turn = self.angle_step + jitter;
        let limit = self.angle_limit.abs();
        match side {
            Side::Left => (parent_angle - turn).max(-limit),
            Side::Right => (parent_angle + turn).min(limit),
        }
    }
}

/// Clamps to `[0, 1]`, mapping NaN to 0 so the value is always a valid probability.
fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outward_children_terminate_more_often() {
        let tuning = GrowthTuning::default();
        let outward = tuning.termination_chance(Side::Left, -30.0, 3, 0.5, 0.5);
        let inward = tuning.termination_chance(Side::Right, -30.0, 3, 0.5, 0.5);
        assert!(outward > inward);
    }

    #[test]
    fn chance_rises_with_spent_budget_and_depth() {
        let tuning = GrowthTuning::default();
        let fresh = tuning.termination_chance(Side::Left, -10.0, 1, 0.1, 0.0);
        let spent = tuning.termination_chance(Side::Left, -10.0, 1, 0.9, 0.6);
        let deep = tuning.termination_chance(Side::Left, -10.0, 6, 0.1, 0.0);
        assert!(spent > fresh);
        assert!(deep > fresh);
    }

    #[test]
    fn chance_is_a_probability_for_any_input() {
        let tuning = GrowthTuning {
            outward_bias: 40.0,
            height_weight: f64::NAN,
            ..GrowthTuning::default()
        };
        for spent in [-5.0, 0.0, 0.5, 7.0, f64::NAN, f64::INFINITY] {
            let chance = tuning.termination_chance(Side::Right, 12.0, 4, spent, spent);
            assert!((0.0..=1.0).contains(&chance));
        }
    }

    #[test]
    fn child_angles_are_bounded() {
        let tuning = GrowthTuning::default();
        assert_eq!(tuning.child_angle(Side::Left, -70.0, 15.0), -80.0);
        assert_eq!(tuning.child_angle(Side::Right, 70.0, 0.0), 80.0);
        assert_eq!(tuning.child_angle(Side::Right, -45.0, 5.0), -20.0);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let tuning: GrowthTuning = toml::from_str("flower_chance = 0.5\nmax_jitter = 0.0\n")
            .expect("tuning parses");
        assert_eq!(tuning.flower_chance, 0.5);
        assert_eq!(tuning.max_jitter, 0.0);
        assert_eq!(tuning.angle_step, GrowthTuning::default().angle_step);
    }
}
