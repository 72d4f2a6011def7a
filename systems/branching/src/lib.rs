#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Recursive branch generation producing a plant's skeleton.
//!
//! Every base branch splits into two children until its height budget runs
//! out or a probabilistic check ends it early. Branches that stop
//! splitting end in a leaf cluster or a flower. The result is a plain
//! [`PlantBlueprint`]; inserting it into an entity graph is the caller's job.

pub mod geometry;
mod tuning;

use rand::Rng;
use sprout_core::{
    Branch, BranchOptions, Coordinate, FlowerOptions, LeafClusterOptions, PlantOptions,
    Termination, DEFAULT_BRANCH_WIDTH,
};
use sprout_system_bounds::BranchBounds;
use sprout_system_clusters::{
    grow_flower, grow_leaf_cluster, FlowerBlueprint, LeafClusterBlueprint,
};

pub use geometry::shape_branch;
pub use tuning::GrowthTuning;

use tuning::Side;

/// Complete skeleton grown for a single plant.
#[derive(Clone, Debug, PartialEq)]
pub struct PlantBlueprint {
    /// Bounds the skeleton was grown within.
    pub bounds: BranchBounds,
    /// Height of the plant's container.
    pub height: f64,
    /// Width of the plant's container.
    pub width: f64,
    /// Branches in post-order, each followed by the cluster it ends in.
    pub branches: Vec<BranchBlueprint>,
}

impl PlantBlueprint {
    /// Number of branches ending in a flower.
    #[must_use]
    pub fn flower_count(&self) -> usize {
        self.branches
            .iter()
            .filter(|entry| entry.branch.has_flower())
            .count()
    }

    /// Number of branches ending in a leaf cluster.
    #[must_use]
    pub fn leaf_cluster_count(&self) -> usize {
        self.branches
            .iter()
            .filter(|entry| entry.branch.has_leaf())
            .count()
    }
}

/// A generated branch and the terminal cluster it carries, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct BranchBlueprint {
    /// The branch itself.
    pub branch: Branch,
    /// Cluster grown at the branch's end point.
    pub cluster: Option<ClusterBlueprint>,
}

/// Terminal cluster grown at the end of a branch.
#[derive(Clone, Debug, PartialEq)]
pub enum ClusterBlueprint {
    /// A leaf cluster with its leaves.
    LeafCluster(LeafClusterBlueprint),
    /// A flower with its petals.
    Flower(FlowerBlueprint),
}

/// Grows the skeleton of a plant described by `options`.
pub fn grow_plant_blueprint<R>(
    options: &PlantOptions,
    tuning: &GrowthTuning,
    rng: &mut R,
) -> PlantBlueprint
where
    R: Rng + ?Sized,
{
    let bounds = BranchBounds::from_options(options);
    let mut growth = Growth {
        bounds,
        tuning,
        leaf_options: LeafClusterOptions::for_plant(options),
        flower_options: FlowerOptions::for_plant(options),
        jitter: bounds.total_base_branches > 1,
        branches: Vec::new(),
    };

    for index in 0..bounds.total_base_branches {
        let budget = Budget {
            base_index: index,
            initial_height: bounds.height_budget(index),
            initial_width: bounds.max_side_spread,
        };
        let branch_options = BranchOptions {
            start_point: Coordinate::ORIGIN,
            height: bounds.max_branch_height,
            width: DEFAULT_BRANCH_WIDTH,
            angle: bounds.base_angle(index),
            z_index: bounds.z_index(index),
        };
        growth.branch_out(1, budget, budget.full(), None, branch_options, rng);
    }

    growth.ensure_flower(rng);

    let blueprint = PlantBlueprint {
        bounds,
        height: bounds.max_height,
        width: bounds.max_side_spread * 2.0,
        branches: growth.branches,
    };

    tracing::debug!(
        base_branches = bounds.total_base_branches,
        branches = blueprint.branches.len(),
        leaf_clusters = blueprint.leaf_cluster_count(),
        flowers = blueprint.flower_count(),
        "grew plant blueprint"
    );

    blueprint
}

/// Budgets a base branch started with, shared by all of its descendants.
#[derive(Clone, Copy, Debug)]
struct Budget {
    base_index: u32,
    initial_height: f64,
    initial_width: f64,
}

impl Budget {
    fn full(&self) -> Remaining {
        Remaining {
            height: self.initial_height,
            width: self.initial_width,
        }
    }

    fn spent_height(&self, left: Remaining) -> f64 {
        spent(left.height, self.initial_height)
    }

    fn spent_width(&self, left: Remaining) -> f64 {
        spent(left.width, self.initial_width)
    }
}

/// Budgets still available below a branch.
#[derive(Clone, Copy, Debug)]
struct Remaining {
    height: f64,
    width: f64,
}

fn spent(left: f64, initial: f64) -> f64 {
    if initial > 0.0 {
        1.0 - left / initial
    } else {
        1.0
    }
}

struct Growth<'a> {
    bounds: BranchBounds,
    tuning: &'a GrowthTuning,
    leaf_options: LeafClusterOptions,
    flower_options: FlowerOptions,
    jitter: bool,
    branches: Vec<BranchBlueprint>,
}

impl Growth<'_> {
    fn branch_out<R>(
        &mut self,
        order: u32,
        budget: Budget,
        left: Remaining,
        forced: Option<Termination>,
        options: BranchOptions,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        let branch = shape_branch(order, budget.base_index, &options, forced);

        if let Some(termination) = forced {
            let cluster = self.grow_cluster(&branch, termination, rng);
            self.branches.push(BranchBlueprint {
                branch,
                cluster: Some(cluster),
            });
            return;
        }

        let child_length = (branch.branch_height / f64::from(order))
            .max(self.tuning.min_branch_length)
            .max(1.0);
        let left = Remaining {
            height: left.height - branch.height - self.bounds.growth_increment,
            width: left.width - branch.width,
        };
        let child_order = order + 1;

        let exhausted = left.height <= child_length;
        let (left_forced, right_forced) = if exhausted {
            (
                Some(self.pick_termination(rng)),
                Some(self.pick_termination(rng)),
            )
        } else {
            (
                self.maybe_terminate(Side::Left, &branch, child_order, budget, left, rng),
                self.maybe_terminate(Side::Right, &branch, child_order, budget, left, rng),
            )
        };

        for (side, child_forced) in [(Side::Left, left_forced), (Side::Right, right_forced)] {
            let jitter = self.jitter(rng);
            let child_options = BranchOptions {
                start_point: branch.end_point,
                height: child_length,
                angle: self.tuning.child_angle(side, options.angle, jitter),
                ..options
            };
            self.branch_out(child_order, budget, left, child_forced, child_options, rng);
        }

        self.branches.push(BranchBlueprint {
            branch,
            cluster: None,
        });
    }

    fn maybe_terminate<R>(
        &self,
        side: Side,
        parent: &Branch,
        order: u32,
        budget: Budget,
        left: Remaining,
        rng: &mut R,
    ) -> Option<Termination>
    where
        R: Rng + ?Sized,
    {
        let chance = self.tuning.termination_chance(
            side,
            parent.options.angle,
            order,
            budget.spent_height(left),
            budget.spent_width(left),
        );
        if rng.gen_bool(chance) {
            Some(self.pick_termination(rng))
        } else {
            None
        }
    }

    fn pick_termination<R>(&self, rng: &mut R) -> Termination
    where
        R: Rng + ?Sized,
    {
        let chance = self.tuning.flower_chance;
        let chance = if chance.is_nan() {
            0.0
        } else {
            chance.clamp(0.0, 1.0)
        };
        if rng.gen_bool(chance) {
            Termination::Flower
        } else {
            Termination::LeafCluster
        }
    }

    fn jitter<R>(&self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        let max_jitter = self.tuning.max_jitter;
        if self.jitter && max_jitter.is_finite() && max_jitter > 0.0 {
            rng.gen_range(0.0..=max_jitter)
        } else {
            0.0
        }
    }

    fn grow_cluster<R>(
        &self,
        branch: &Branch,
        termination: Termination,
        rng: &mut R,
    ) -> ClusterBlueprint
    where
        R: Rng + ?Sized,
    {
        let order = branch.order + 1;
        let z_index = branch.z_index + 1;
        match termination {
            Termination::LeafCluster => ClusterBlueprint::LeafCluster(grow_leaf_cluster(
                branch.anchor(),
                order,
                z_index,
                &self.leaf_options,
                rng,
            )),
            Termination::Flower => ClusterBlueprint::Flower(grow_flower(
                branch.anchor(),
                order,
                z_index,
                &self.flower_options,
                rng,
            )),
        }
    }

    /// Converts a random leaf cluster into a flower when none grew naturally.
    fn ensure_flower<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if self.branches.iter().any(|entry| entry.branch.has_flower()) {
            return;
        }

        let candidates: Vec<usize> = self
            .branches
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.branch.has_leaf())
            .map(|(index, _)| index)
            .collect();
        if candidates.is_empty() {
            return;
        }

        let chosen = candidates[rng.gen_range(0..candidates.len())];
        let cluster = self.grow_cluster(&self.branches[chosen].branch, Termination::Flower, rng);
        let entry = &mut self.branches[chosen];
        entry.branch.termination = Some(Termination::Flower);
        entry.cluster = Some(cluster);
        tracing::trace!(branch = chosen, "converted leaf cluster into guaranteed flower");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn post_order_places_base_branch_after_descendants() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let blueprint =
            grow_plant_blueprint(&PlantOptions::default(), &GrowthTuning::default(), &mut rng);

        let last = blueprint.branches.last().expect("branches grew");
        assert_eq!(last.branch.order, 1);
        assert_eq!(
            last.branch.base_index,
            blueprint.bounds.total_base_branches - 1
        );
        assert!(last.cluster.is_none());
    }

    #[test]
    fn terminal_branches_carry_matching_clusters() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let blueprint =
            grow_plant_blueprint(&PlantOptions::default(), &GrowthTuning::default(), &mut rng);

        for entry in &blueprint.branches {
            match (&entry.branch.termination, &entry.cluster) {
                (None, None) => {}
                (Some(Termination::LeafCluster), Some(ClusterBlueprint::LeafCluster(cluster))) => {
                    assert_eq!(cluster.cluster.anchor, entry.branch.anchor());
                    assert_eq!(cluster.cluster.z_index, entry.branch.z_index + 1);
                }
                (Some(Termination::Flower), Some(ClusterBlueprint::Flower(flower))) => {
                    assert_eq!(flower.flower.anchor, entry.branch.anchor());
                    assert_eq!(flower.flower.order, entry.branch.order + 1);
                }
                other => panic!("termination and cluster disagree: {other:?}"),
            }
        }
    }

    #[test]
    fn zero_flower_chance_still_grows_one_flower() {
        let tuning = GrowthTuning {
            flower_chance: 0.0,
            ..GrowthTuning::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let blueprint = grow_plant_blueprint(&PlantOptions::default(), &tuning, &mut rng);
        assert_eq!(blueprint.flower_count(), 1);

        let converted = blueprint
            .branches
            .iter()
            .find(|entry| entry.branch.has_flower())
            .expect("one branch carries the flower");
        assert_eq!(converted.branch.termination, Some(Termination::Flower));
        match &converted.cluster {
            Some(ClusterBlueprint::Flower(flower)) => {
                assert_eq!(flower.flower.anchor, converted.branch.anchor());
                assert_eq!(flower.flower.z_index, converted.branch.z_index + 1);
            }
            other => panic!("converted branch carries {other:?}"),
        }
    }

    #[test]
    fn container_matches_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let options = PlantOptions {
            height: 5_000.0,
            spread: 10.0,
            ..PlantOptions::default()
        };
        let blueprint = grow_plant_blueprint(&options, &GrowthTuning::default(), &mut rng);
        assert_eq!(blueprint.height, 800.0);
        assert_eq!(blueprint.width, 10.0);
    }
}
