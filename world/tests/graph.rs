use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sprout_core::{
    BranchOptions, Command, Coordinate, EditError, EntityId, EntityOptions, Event, FlowerOptions,
    LeafClusterOptions, PartialPlantOptions, PlantId, PlantOptions, PlantRecord, RegrowError,
    Rotation, Termination,
};
use sprout_system_bounds::BranchBounds;
use sprout_system_branching::{shape_branch, BranchBlueprint, ClusterBlueprint, PlantBlueprint};
use sprout_system_clusters::{grow_flower, grow_leaf_cluster};
use sprout_world::{self as world, query, EntityGraph};

/// Five branches: two ending in three-leaf clusters, one in a five-petal flower.
fn hand_built_blueprint(options: &PlantOptions) -> PlantBlueprint {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let leaf_options = LeafClusterOptions {
        sides: 3,
        ..LeafClusterOptions::for_plant(options)
    };
    let flower_options = FlowerOptions {
        sides: 5,
        ..FlowerOptions::for_plant(options)
    };

    let terminations = [
        None,
        Some(Termination::LeafCluster),
        None,
        Some(Termination::LeafCluster),
        Some(Termination::Flower),
    ];
    let branches = terminations
        .iter()
        .enumerate()
        .map(|(index, &termination)| {
            let branch_options = BranchOptions {
                height: 50.0,
                angle: -40.0 + 20.0 * index as f64,
                ..BranchOptions::default()
            };
            let branch = shape_branch(1, index as u32, &branch_options, termination);
            let cluster = match termination {
                Some(Termination::LeafCluster) => Some(ClusterBlueprint::LeafCluster(
                    grow_leaf_cluster(branch.anchor(), 2, 1, &leaf_options, &mut rng),
                )),
                Some(Termination::Flower) => Some(ClusterBlueprint::Flower(grow_flower(
                    branch.anchor(),
                    2,
                    1,
                    &flower_options,
                    &mut rng,
                ))),
                None => None,
            };
            BranchBlueprint { branch, cluster }
        })
        .collect();

    PlantBlueprint {
        bounds: BranchBounds::from_options(options),
        height: options.height,
        width: options.spread * 2.0,
        branches,
    }
}

/// Grows the default plant from the first seed at or after `seed` that yields leaves.
fn grown_graph(seed: u64) -> (EntityGraph, PlantId, ChaCha8Rng) {
    (seed..seed + 256)
        .find_map(|candidate| {
            let mut graph = EntityGraph::new();
            let mut rng = ChaCha8Rng::seed_from_u64(candidate);
            let mut events = Vec::new();
            let plant = graph.grow_plant(&PlantRecord::default(), false, &mut rng, &mut events);
            (!query::leaf_clusters_of(&graph, plant).is_empty()).then_some((graph, plant, rng))
        })
        .expect("some seed grows a leaf cluster")
}

fn assert_tree_invariant(graph: &EntityGraph) {
    let mut branches = 0;
    let mut leaf_clusters = 0;
    let mut flowers = 0;
    let mut leaves = 0;
    let mut petals = 0;

    for plant in query::plants(graph) {
        for branch in query::branches_of(graph, plant.id) {
            assert_eq!(branch.plant, plant.id);
            branches += 1;
        }
        for cluster in query::leaf_clusters_of(graph, plant.id) {
            assert_eq!(cluster.plant, plant.id);
            let anchor = query::branch(graph, cluster.branch).expect("cluster branch is live");
            assert_eq!(anchor.branch.termination, Some(Termination::LeafCluster));
            leaf_clusters += 1;
            for leaf in query::leaves_of(graph, cluster.id) {
                assert_eq!(leaf.cluster, cluster.id);
                leaves += 1;
            }
        }
        for flower in query::flowers_of(graph, plant.id) {
            assert_eq!(flower.plant, plant.id);
            let anchor = query::branch(graph, flower.branch).expect("flower branch is live");
            assert_eq!(anchor.branch.termination, Some(Termination::Flower));
            flowers += 1;
            for petal in query::petals_of(graph, flower.id) {
                assert_eq!(petal.flower, flower.id);
                petals += 1;
            }
        }
    }

    let counts = query::counts(graph);
    assert_eq!(counts.branches, branches, "orphaned branch");
    assert_eq!(counts.leaf_clusters, leaf_clusters, "orphaned leaf cluster");
    assert_eq!(counts.flowers, flowers, "orphaned flower");
    assert_eq!(counts.leaves, leaves, "orphaned leaf");
    assert_eq!(counts.petals, petals, "orphaned petal");
}

#[test]
fn grown_plants_form_a_tree() {
    for seed in 0..16 {
        let (graph, plant, _) = grown_graph(seed);
        assert_tree_invariant(&graph);
        assert!(!query::flowers_of(&graph, plant).is_empty());
    }
}

#[test]
fn deleting_a_plant_cascades_through_its_subtree() {
    let options = PlantOptions::default();
    let blueprint = hand_built_blueprint(&options);
    let mut graph = EntityGraph::new();
    let mut events = Vec::new();
    let plant = graph.insert_plant(options, blueprint, &mut events);

    let before = query::counts(&graph);
    assert_eq!(
        (
            before.branches,
            before.leaf_clusters,
            before.leaves,
            before.flowers,
            before.petals
        ),
        (5, 2, 6, 1, 5)
    );

    events.clear();
    world::apply(
        &mut graph,
        Command::DeleteEntity {
            entity: EntityId::Plant(plant),
        },
        &mut ChaCha8Rng::seed_from_u64(0),
        &mut events,
    );

    let after = query::counts(&graph);
    assert_eq!(after, Default::default());
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::EntityRemoved { .. }))
            .count(),
        1 + 5 + 2 + 6 + 1 + 5
    );
}

#[test]
fn deleting_a_leaf_cluster_removes_its_leaves_first() {
    let options = PlantOptions::default();
    let mut graph = EntityGraph::new();
    let mut events = Vec::new();
    let plant = graph.insert_plant(options.clone(), hand_built_blueprint(&options), &mut events);
    let cluster = query::leaf_clusters_of(&graph, plant)[0].clone();

    events.clear();
    graph.delete_entity(EntityId::LeafCluster(cluster.id), &mut events);

    let cluster_removed = events
        .iter()
        .position(|event| {
            *event
                == Event::EntityRemoved {
                    entity: EntityId::LeafCluster(cluster.id),
                }
        })
        .expect("cluster removal reported");
    for leaf in &cluster.leaves {
        let leaf_removed = events
            .iter()
            .position(|event| {
                *event
                    == Event::EntityRemoved {
                        entity: EntityId::Leaf(*leaf),
                    }
            })
            .expect("leaf removal reported");
        assert!(leaf_removed < cluster_removed);
    }
    assert_eq!(query::cluster_of(&graph, cluster.branch), None);
    assert_tree_invariant(&graph);
}

#[test]
fn deleting_a_branch_takes_its_cluster_along() {
    let (mut graph, plant, _) = grown_graph(11);
    let flower = query::flowers_of(&graph, plant)[0].clone();
    let mut events = Vec::new();

    graph.delete_entity(EntityId::Branch(flower.branch), &mut events);

    assert!(!query::contains(&graph, EntityId::Flower(flower.id)));
    let stored = query::plant(&graph, plant).expect("plant survives");
    assert!(!stored.branches.contains(&flower.branch));
    assert!(!stored.flowers.contains(&flower.id));
    assert_tree_invariant(&graph);
}

#[test]
fn reapplying_cluster_options_keeps_ids_and_geometry() {
    let (mut graph, plant, mut rng) = grown_graph(4);
    let cluster = query::leaf_clusters_of(&graph, plant)
        .first()
        .map(|cluster| (*cluster).clone())
        .expect("default plant grows leaves");
    let single_color = LeafClusterOptions {
        colors: vec![cluster.cluster.options.colors[0]],
        ..cluster.cluster.options.clone()
    };

    let mut events = Vec::new();
    let edit = EntityOptions::LeafCluster(single_color);
    graph
        .set_entity_options(
            EntityId::LeafCluster(cluster.id),
            edit.clone(),
            &mut rng,
            &mut events,
        )
        .expect("cluster options apply");
    let first: Vec<_> = query::leaves_of(&graph, cluster.id)
        .into_iter()
        .cloned()
        .collect();

    graph
        .set_entity_options(
            EntityId::LeafCluster(cluster.id),
            edit,
            &mut rng,
            &mut events,
        )
        .expect("cluster options apply");
    let second: Vec<_> = query::leaves_of(&graph, cluster.id)
        .into_iter()
        .cloned()
        .collect();

    assert_eq!(first, second);
    assert_eq!(
        first.iter().map(|leaf| leaf.id).collect::<Vec<_>>(),
        cluster.leaves
    );
}

#[test]
fn growing_a_cluster_keeps_existing_leaf_ids() {
    let (mut graph, plant, mut rng) = grown_graph(8);
    let cluster = query::leaf_clusters_of(&graph, plant)[0].clone();
    let denser = LeafClusterOptions {
        sides: cluster.leaves.len() as u32 + 2,
        ..cluster.cluster.options.clone()
    };
    let mut events = Vec::new();

    graph
        .set_entity_options(
            EntityId::LeafCluster(cluster.id),
            EntityOptions::LeafCluster(denser),
            &mut rng,
            &mut events,
        )
        .expect("cluster options apply");

    let leaves = &query::leaf_cluster(&graph, cluster.id)
        .expect("cluster survives")
        .leaves;
    assert_eq!(leaves.len(), cluster.leaves.len() + 2);
    assert_eq!(&leaves[..cluster.leaves.len()], cluster.leaves.as_slice());
    assert_tree_invariant(&graph);
}

#[test]
fn stale_edits_leave_the_graph_untouched() {
    let (mut graph, plant, mut rng) = grown_graph(2);
    let mut events = Vec::new();
    graph.delete_entity(EntityId::Plant(plant), &mut events);
    events.clear();

    world::apply(
        &mut graph,
        Command::SetPosition {
            entity: EntityId::Plant(plant),
            position: Coordinate::new(10.0, 10.0),
        },
        &mut rng,
        &mut events,
    );
    world::apply(
        &mut graph,
        Command::DeleteEntity {
            entity: EntityId::Plant(plant),
        },
        &mut rng,
        &mut events,
    );

    assert!(events.is_empty());
    assert_eq!(query::counts(&graph), Default::default());
}

#[test]
fn regrowing_a_missing_plant_is_rejected() {
    let mut graph = EntityGraph::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut events = Vec::new();
    let missing = PlantId::new(7);

    assert_eq!(
        graph.regrow_plant(
            missing,
            &PartialPlantOptions::default(),
            &mut rng,
            &mut events
        ),
        Err(RegrowError::MissingPlant)
    );

    world::apply(
        &mut graph,
        Command::RegrowPlant {
            plant: missing,
            edit: PartialPlantOptions::default(),
        },
        &mut rng,
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::RegrowRejected {
            plant: missing,
            reason: RegrowError::MissingPlant,
        }]
    );
}

#[test]
fn partial_edit_keeps_stored_values_it_cannot_use() {
    let (mut graph, plant, mut rng) = grown_graph(14);
    let before = query::plant(&graph, plant).expect("plant").clone();
    let mut events = Vec::new();

    world::apply(
        &mut graph,
        Command::RegrowPlant {
            plant,
            edit: PartialPlantOptions {
                height: Some(0.0),
                spread: Some(300.0),
                leaf_colors: Some(Vec::new()),
                ..PartialPlantOptions::default()
            },
        },
        &mut rng,
        &mut events,
    );

    let after = query::plant(&graph, plant).expect("plant keeps its id");
    assert_eq!(after.options.height, before.options.height);
    assert_eq!(after.options.spread, 300.0);
    assert_eq!(after.options.leaf_colors, before.options.leaf_colors);
    assert_eq!(after.height, before.height);
    assert_eq!(after.width, 300.0);
    assert_eq!(query::counts(&graph).plants, 1);

    for branch in &before.branches {
        assert!(events.contains(&Event::EntityRemoved {
            entity: EntityId::Branch(*branch),
        }));
    }
    assert!(events.contains(&Event::PlantGrown { plant }));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::RegrowRejected { .. })));
    assert_tree_invariant(&graph);
}

#[test]
fn non_finite_plant_options_fall_back_to_stored_values() {
    let (mut graph, plant, mut rng) = grown_graph(15);
    let before = query::plant(&graph, plant).expect("plant").clone();
    let mut events = Vec::new();

    graph
        .set_entity_options(
            EntityId::Plant(plant),
            EntityOptions::Plant(PlantOptions {
                height: f64::NAN,
                flower_colors: Vec::new(),
                ..before.options.clone()
            }),
            &mut rng,
            &mut events,
        )
        .expect("plant options apply");

    let after = query::plant(&graph, plant).expect("plant");
    assert_eq!(after.options, before.options);
    assert_eq!(after.branches, before.branches);
    assert!(!events.contains(&Event::PlantGrown { plant }));
}

#[test]
fn structural_edit_regrows_under_the_same_identity() {
    let (mut graph, plant, mut rng) = grown_graph(6);
    let mut events = Vec::new();
    graph
        .set_position(
            EntityId::Plant(plant),
            Coordinate::new(120.0, 40.0),
            &mut events,
        )
        .expect("plants move");
    graph
        .set_rotation(EntityId::Plant(plant), Rotation::tilt(5.0), &mut events)
        .expect("plants rotate");
    let before = query::plant(&graph, plant).expect("plant").clone();

    let taller = PlantOptions {
        height: 520.0,
        spread: 260.0,
        ..before.options.clone()
    };
    graph
        .set_entity_options(
            EntityId::Plant(plant),
            EntityOptions::Plant(taller),
            &mut rng,
            &mut events,
        )
        .expect("plant options apply");

    let after = query::plant(&graph, plant).expect("plant keeps its id");
    assert_eq!(after.position, before.position);
    assert_eq!(after.rotation, before.rotation);
    assert_eq!(after.name, before.name);
    assert_eq!(after.height, 520.0);
    assert_eq!(after.width, 260.0);
    assert!(events.contains(&Event::PlantGrown { plant }));
    assert_eq!(query::counts(&graph).plants, 1);
    assert_tree_invariant(&graph);
}

#[test]
fn derived_cluster_placement_is_rejected() {
    let (mut graph, plant, mut rng) = grown_graph(9);
    let cluster = query::leaf_clusters_of(&graph, plant)[0].id;
    let mut events = Vec::new();

    world::apply(
        &mut graph,
        Command::SetRotation {
            entity: EntityId::LeafCluster(cluster),
            rotation: Rotation::tilt(30.0),
        },
        &mut rng,
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::EditRejected {
            entity: EntityId::LeafCluster(cluster),
            reason: EditError::DerivedPlacement,
        }]
    );
}

#[test]
fn leaf_edits_patch_in_place() {
    let (mut graph, plant, mut rng) = grown_graph(12);
    let cluster = query::leaf_clusters_of(&graph, plant)[0].id;
    let leaf = query::leaves_of(&graph, cluster)[0].clone();
    let mut events = Vec::new();

    let options = sprout_core::LeafOptions {
        top_height: leaf.leaf.options.top_height * 2.0,
        ..leaf.leaf.options
    };
    graph
        .set_entity_options(
            EntityId::Leaf(leaf.id),
            EntityOptions::Leaf(options),
            &mut rng,
            &mut events,
        )
        .expect("leaf options apply");

    let patched = query::leaf(&graph, leaf.id).expect("leaf keeps its id");
    assert_eq!(patched.leaf.rotation, leaf.leaf.rotation);
    assert_eq!(patched.leaf.options.top_height, options.top_height);
    assert_eq!(
        query::parent_of(&graph, EntityId::Leaf(leaf.id)),
        Some(EntityId::LeafCluster(cluster))
    );
    assert_eq!(
        events,
        vec![Event::EntityUpdated {
            entity: EntityId::Leaf(leaf.id),
        }]
    );
}
