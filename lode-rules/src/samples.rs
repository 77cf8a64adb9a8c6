//! Built-in training corpus, used when no corpus file is supplied.

use crate::grid::LevelGrid;

const TOWER: &str = r"
............................
....G.......#.........G.....
bbbbbbb#bbbbbb.....#bbbbbbbb
.......#.....#-----#........
.......#.....#.....#........
..E....#.....#.....#...E....
bbbbbbbbbb#bbbbbbbb#bbbb#bbb
..........#.........#...#...
..........#...G.....#...#...
..G.......#bbbbbbbbb#...#...
bbbbb#bbbbb.........#bbbbbbb
.....#--------------#.......
.....#..............#...G...
.....#.....M........#bbbbbbb
....bbbbbbbbbbb#bbbbbbb.....
BBBBBBBBBBBBBBBBBBBBBBBBBBBB
";

const CISTERN: &str = r"
#...........................
#.....G..............G......
#bbbbbbbbb#.....bbbbbbbbb#..
#.........#-----.........#..
#.........#..............#..
#....E....#......E.......#..
bbbbbb#bbbbbbbbbbbbb#bbbbbbb
......#.............#.......
......#....G........#.......
......#bbbbbbbbb....#.......
......#........#----#....G..
......#........#....#bbbbbbb
bbb#bbbbbbb....#....#.......
...#.......M...#....#.......
...#bbbbbbbbbbbbbbbbbbbbb#..
BBBBBBBBBBBBBBBBBBBBBBBBBBBB
";

const BRIDGES: &str = r"
..............#.............
..G...........#.........G...
BBBBBB#bbbbbbb#bbbbbb#BBBBBB
......#.......#......#......
......#-------#------#......
......#.......#......#......
bbbbbbbbb#....#....#bbbbbbbb
.........#....#....#........
...G.....#....#....#.....G..
bbbbbbb..#bbbbbbbbb#..bbbbbb
.......#.#.........#.#......
.......#.#...E.....#.#......
.......#bbbbbbb#bbbbbb......
...E...#.......#........M...
bbbbbbbbbbbbbbb#bbbbbbbbbbbb
BBBBBBBBBBBBBBBBBBBBBBBBBBBB
";

/// Text of every embedded level, in corpus order.
pub const SAMPLE_LEVELS: [&str; 3] = [TOWER, CISTERN, BRIDGES];

/// Parses the embedded levels.
///
/// The levels are compile-time constants covered by the tests below, so a
/// parse failure here would be a programming error; such levels are skipped
/// with a warning rather than aborting.
pub fn sample_corpus() -> Vec<LevelGrid> {
    SAMPLE_LEVELS
        .iter()
        .enumerate()
        .filter_map(|(i, text)| match text.parse::<LevelGrid>() {
            Ok(level) => Some(level),
            Err(e) => {
                log::warn!("Skipping embedded sample level {i}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{LEVEL_HEIGHT, LEVEL_WIDTH};
    use crate::types::Tile;

    #[test]
    fn every_sample_parses_at_canonical_size() {
        let corpus = sample_corpus();
        assert_eq!(corpus.len(), SAMPLE_LEVELS.len());
        for level in &corpus {
            assert_eq!(level.width, LEVEL_WIDTH);
            assert_eq!(level.height, LEVEL_HEIGHT);
            assert_eq!(level.count(Tile::Spawn), 1);
            assert!(level.count(Tile::Gold) > 0);
        }
    }
}
