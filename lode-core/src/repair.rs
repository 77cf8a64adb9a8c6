//! Local clean-up of sampled terrain.

use lode_rules::{LevelGrid, Pos, Tile};
use log::debug;
use rand::Rng;

/// Chance that a ladder hanging over empty space is extended downward rather
/// than removed.
pub const LADDER_EXTEND_PROBABILITY: f64 = 0.7;

/// What a repair pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub ladders_extended: usize,
    pub ladders_removed: usize,
    pub ropes_replaced: usize,
}

/// Fixes floating ladders and ropes resting on solid ground, in place.
///
/// Every ladder above the last two rows with empty space below is either
/// extended one cell down or removed. Every rope directly above a brick or
/// solid block becomes Empty or Ladder with equal odds. Decisions are taken
/// against the grid as it was before the pass, so cells changed here are not
/// re-examined, and running the pass again may change the result further.
pub fn repair<R: Rng + ?Sized>(grid: &mut LevelGrid, rng: &mut R) -> RepairReport {
    let before = grid.clone();
    let mut report = RepairReport::default();

    for y in 0..grid.height.saturating_sub(2) {
        for x in 0..grid.width {
            if before.tile(x, y) != Some(Tile::Ladder) || before.tile(x, y + 1) != Some(Tile::Empty)
            {
                continue;
            }
            if rng.gen::<f64>() < LADDER_EXTEND_PROBABILITY {
                grid.set(Pos::new(x, y + 1), Tile::Ladder);
                report.ladders_extended += 1;
            } else {
                grid.set(Pos::new(x, y), Tile::Empty);
                report.ladders_removed += 1;
            }
        }
    }

    for y in 0..grid.height.saturating_sub(1) {
        for x in 0..grid.width {
            let on_ground = matches!(before.tile(x, y + 1), Some(Tile::Brick | Tile::Solid));
            if before.tile(x, y) != Some(Tile::Rope) || !on_ground {
                continue;
            }
            let replacement = if rng.gen::<f64>() < 0.5 {
                Tile::Empty
            } else {
                Tile::Ladder
            };
            grid.set(Pos::new(x, y), replacement);
            report.ropes_replaced += 1;
        }
    }

    debug!("Repair pass: {report:?}");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn floating_ladder_is_extended_or_removed() {
        for seed in 0..32 {
            let mut grid: LevelGrid = "#..\n...\n...\nBBB".parse().unwrap();
            let report = repair(&mut grid, &mut StdRng::seed_from_u64(seed));
            assert_eq!(report.ladders_extended + report.ladders_removed, 1);
            if report.ladders_extended == 1 {
                assert_eq!(grid.to_string(), "#..\n#..\n...\nBBB");
            } else {
                assert_eq!(grid.to_string(), "...\n...\n...\nBBB");
            }
        }
    }

    #[test]
    fn extension_is_not_reexamined() {
        let mut grid: LevelGrid = "#\n.\n.\n.\nB".parse().unwrap();
        let report = repair(&mut grid, &mut StdRng::seed_from_u64(3));
        assert_eq!(report.ladders_extended + report.ladders_removed, 1);
        // At most one extra ladder cell per pass.
        assert!(grid.count(Tile::Ladder) <= 2);
    }

    #[test]
    fn ladders_in_last_two_rows_are_left_alone() {
        let mut grid: LevelGrid = "...\n#..\n...".parse().unwrap();
        let report = repair(&mut grid, &mut StdRng::seed_from_u64(9));
        assert_eq!(report, RepairReport::default());
        assert_eq!(grid.to_string(), "...\n#..\n...");
    }

    #[test]
    fn rope_on_ground_is_replaced() {
        let mut grid: LevelGrid = "--.\nbB.".parse().unwrap();
        let report = repair(&mut grid, &mut StdRng::seed_from_u64(5));
        assert_eq!(report.ropes_replaced, 2);
        assert!(grid.row(0)[..2]
            .iter()
            .all(|&t| t == Tile::Empty || t == Tile::Ladder));
    }

    #[test]
    fn seeded_repair_is_reproducible() {
        let source: LevelGrid = "#.#.#\n.....\n--#--\nbbbbb\nBBBBB".parse().unwrap();
        let mut a = source.clone();
        let mut b = source;
        repair(&mut a, &mut StdRng::seed_from_u64(42));
        repair(&mut b, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
