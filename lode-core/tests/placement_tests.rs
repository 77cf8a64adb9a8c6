// lode-core/tests/placement_tests.rs
use lode_core::{generate_structure, get_reachable_positions, place_entities, repair, valid_positions};
use lode_rules::{sample_corpus, train, LevelGrid, Pos, Tile, TrainingOptions, TransitionTable};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::OnceLock;

fn sample_table() -> &'static TransitionTable {
    static TABLE: OnceLock<TransitionTable> = OnceLock::new();
    TABLE.get_or_init(|| train(&sample_corpus(), &TrainingOptions::default()))
}

#[test]
fn test_entities_only_replace_empty_cells() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut structure = generate_structure(sample_table(), 28, 16, &mut rng);
    repair(&mut structure, &mut rng);
    let level = place_entities(&structure, 6, 3, &mut rng);

    for (pos, &tile) in level.cells() {
        if tile.is_entity() {
            assert_eq!(structure.tile_at(pos), Some(Tile::Empty), "entity at {pos}");
        } else {
            assert_eq!(structure.tile_at(pos), Some(tile));
        }
    }
    assert!(level.count(Tile::Spawn) <= 1);
}

#[test]
fn test_structure_without_open_cells_gets_no_entities() {
    let structure: LevelGrid = "BBB\nBBB".parse().unwrap();
    assert!(valid_positions(&structure).is_empty());
    let level = place_entities(&structure, 3, 1, &mut StdRng::seed_from_u64(0));
    assert_eq!(level, structure);
}

#[test]
fn test_gold_placed_before_enemies() {
    // Three reachable cells besides the spawn: gold takes two, enemies the last.
    let structure: LevelGrid = "....\nBBBB".parse().unwrap();
    let level = place_entities(&structure, 2, 5, &mut StdRng::seed_from_u64(4));
    assert_eq!(level.count(Tile::Gold), 2);
    assert_eq!(level.count(Tile::Enemy), 1);
    assert_eq!(level.find_first(Tile::Spawn), Some(Pos::new(0, 0)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_placed_gold_is_reachable_from_spawn(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut structure = generate_structure(sample_table(), 14, 10, &mut rng);
        repair(&mut structure, &mut rng);
        let level = place_entities(&structure, 6, 3, &mut rng);

        if let Some(spawn) = level.find_first(Tile::Spawn) {
            let reachable = get_reachable_positions(&level, spawn.x, spawn.y);
            for gold in level.positions_of(Tile::Gold) {
                prop_assert!(reachable.contains(&gold), "gold at {} unreachable", gold);
            }
            for enemy in level.positions_of(Tile::Enemy) {
                prop_assert!(reachable.contains(&enemy));
            }
        } else {
            prop_assert_eq!(level.count(Tile::Gold), 0);
        }
    }
}
