use lode_rules::{sample_corpus, train, ContextKey, LevelGrid, Tile, TrainingOptions};
use proptest::prelude::*;

#[test]
fn training_twice_gives_identical_tables() {
    let corpus = sample_corpus();
    let options = TrainingOptions::default();
    assert_eq!(train(&corpus, &options), train(&corpus, &options));
}

#[test]
fn distributions_sum_to_one() {
    let table = train(&sample_corpus(), &TrainingOptions::default());
    assert!(!table.is_empty());
    for (_, distribution) in table.sorted_entries() {
        let total: f64 = distribution.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(distribution.iter().all(|(t, _)| !t.is_entity()));
    }
}

#[test]
fn floor_only_corpus_learns_empty_and_solid() {
    let level: LevelGrid = "...\n...\nBBB".parse().unwrap();
    let table = train(&[level], &TrainingOptions { mirror: false });
    for (_, distribution) in table.sorted_entries() {
        assert!(distribution
            .iter()
            .all(|(t, _)| matches!(t, Tile::Empty | Tile::Solid)));
    }
    // Left column: row 1 is Empty and row 2 is Solid under the same context.
    let key = ContextKey::new(Some(Tile::Empty), None, None);
    assert_eq!(
        table.distribution(&key).unwrap(),
        &[(Tile::Empty, 0.5), (Tile::Solid, 0.5)]
    );
}

fn level_strategy() -> impl Strategy<Value = LevelGrid> {
    (1usize..6, 1usize..6).prop_flat_map(|(w, h)| {
        proptest::collection::vec(proptest::sample::select(Tile::ALL.to_vec()), w * h).prop_map(
            move |tiles| {
                let rows = tiles.chunks(w).map(<[Tile]>::to_vec).collect();
                LevelGrid::from_rows(rows).unwrap()
            },
        )
    })
}

proptest! {
    #[test]
    fn training_is_deterministic(corpus in proptest::collection::vec(level_strategy(), 0..4)) {
        let options = TrainingOptions::default();
        prop_assert_eq!(train(&corpus, &options), train(&corpus, &options));
    }
}
