// lode-core/tests/structure_tests.rs
use lode_core::{generate_structure, repair};
use lode_rules::{sample_corpus, train, LevelGrid, Tile, TrainingOptions};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn floor_only_table() -> lode_rules::TransitionTable {
    let corpus: LevelGrid = "...\n...\nBBB".parse().unwrap();
    train(&[corpus], &TrainingOptions { mirror: false })
}

#[test]
fn test_floor_only_corpus_generates_only_empty_and_solid() {
    let table = floor_only_table();
    for (width, height) in [(3, 3), (1, 3), (7, 3), (28, 16), (5, 9)] {
        for seed in 0..8 {
            let grid = generate_structure(&table, width, height, &mut StdRng::seed_from_u64(seed));
            assert_eq!((grid.width, grid.height), (width, height));
            assert!(grid
                .row(height - 1)
                .iter()
                .all(|&t| t == Tile::Solid));
            assert!(grid
                .cells()
                .all(|(_, &t)| t == Tile::Empty || t == Tile::Solid));
        }
    }
}

#[test]
fn test_same_seed_same_structure() {
    let table = train(&sample_corpus(), &TrainingOptions::default());
    let a = generate_structure(&table, 28, 16, &mut StdRng::seed_from_u64(99));
    let b = generate_structure(&table, 28, 16, &mut StdRng::seed_from_u64(99));
    assert_eq!(a, b);
}

#[test]
fn test_repair_keeps_floor() {
    let table = train(&sample_corpus(), &TrainingOptions::default());
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..10 {
        let mut grid = generate_structure(&table, 28, 16, &mut rng);
        repair(&mut grid, &mut rng);
        assert!(grid.row(15).iter().all(|&t| t == Tile::Solid));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_bottom_row_is_always_solid(
        seed in any::<u64>(),
        width in 1usize..32,
        height in 1usize..20,
    ) {
        let table = train(&sample_corpus(), &TrainingOptions::default());
        let grid = generate_structure(&table, width, height, &mut StdRng::seed_from_u64(seed));
        prop_assert!(grid.row(height - 1).iter().all(|&t| t == Tile::Solid));
        prop_assert!(grid.cells().all(|(_, t)| !t.is_entity()));
    }
}
