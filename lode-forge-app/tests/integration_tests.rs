use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::fs;
use std::process::Command; // Run programs
use tempfile::tempdir; // Create temporary directories for testing

// A small corpus with a ladder exit and a brick floor to dig through.
const TINY_CORPUS: &str = "\
; tiny training corpus
#.......
#..G....
#bbbb.b.
#.......
#M...G..
BBBBBBBB

........
..#..G..
bb#bbbbb
..#.....
M.#...G.
BBBBBBBB
";

fn lode_forge() -> Command {
    let mut cmd = Command::cargo_bin("lode-forge").expect("binary builds");
    cmd.env("RUST_LOG", "info");
    cmd
}

fn read_levels(path: &std::path::Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .expect("output readable")
        .split("\n\n")
        .map(|block| {
            block
                .lines()
                .filter(|l| !l.is_empty())
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .filter(|rows| !rows.is_empty())
        .collect()
}

#[test]
fn test_generate_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let output_file = tmp_dir.path().join("level.txt");

    lode_forge()
        .args(["--seed", "3", "--max-attempts", "5", "--output-path"])
        .arg(&output_file)
        .assert()
        .success()
        .stderr(predicate::str::contains("Generation finished"));

    let levels = read_levels(&output_file);
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0].len(), 16);
    assert!(levels[0].iter().all(|row| row.chars().count() == 28));
    assert_eq!(levels[0][15], "B".repeat(28));
    Ok(())
}

#[test]
fn test_same_seed_same_output() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let first = tmp_dir.path().join("a.txt");
    let second = tmp_dir.path().join("b.txt");
    for path in [&first, &second] {
        lode_forge()
            .args(["--seed", "42", "--max-attempts", "3", "--output-path"])
            .arg(path)
            .assert()
            .success();
    }
    assert_eq!(fs::read_to_string(first)?, fs::read_to_string(second)?);
    Ok(())
}

#[test]
fn test_batch_with_corpus_and_size() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let corpus = tmp_dir.path().join("corpus.txt");
    fs::write(&corpus, TINY_CORPUS)?;
    let output_file = tmp_dir.path().join("batch.txt");

    lode_forge()
        .arg("--corpus")
        .arg(&corpus)
        .args([
            "--width", "8", "--height", "6", "--gold", "2", "--enemies", "1", "--count", "3",
            "--seed", "9", "--max-attempts", "4", "--output-path",
        ])
        .arg(&output_file)
        .assert()
        .success();

    let levels = read_levels(&output_file);
    assert_eq!(levels.len(), 3);
    for level in levels {
        assert_eq!(level.len(), 6);
        assert!(level.iter().all(|row| row.len() == 8));
    }
    Ok(())
}

#[test]
fn test_levels_printed_without_output_path() {
    lode_forge()
        .args(["--width", "10", "--height", "5", "--seed", "1", "--max-attempts", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BBBBBBBBBB"));
}

#[test]
fn test_save_then_reuse_model() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let model = tmp_dir.path().join("model.json");
    let output_file = tmp_dir.path().join("level.txt");

    lode_forge()
        .args(["--seed", "5", "--max-attempts", "1", "--save-model"])
        .arg(&model)
        .arg("--output-path")
        .arg(&output_file)
        .assert()
        .success();
    assert!(model.exists(), "Model file was not created");
    assert!(fs::read_to_string(&model)?.contains("\"version\""));

    lode_forge()
        .arg("--model")
        .arg(&model)
        .args(["--seed", "5", "--max-attempts", "1", "--output-path"])
        .arg(&output_file)
        .assert()
        .success()
        .stderr(predicate::str::contains("Loading model"));
    Ok(())
}

#[test]
fn test_validate_good_level() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let level = tmp_dir.path().join("good.txt");
    fs::write(
        &level,
        "...#....\n...#....\n...#....\n...#....\n.M.#.G..\nBBBBBBBB\n",
    )?;

    lode_forge()
        .arg("--validate")
        .arg(&level)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": true"))
        .stdout(predicate::str::contains("\"solvable\": true"));
    Ok(())
}

#[test]
fn test_validate_bad_level_fails() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let level = tmp_dir.path().join("bad.txt");
    fs::write(&level, "#.....\n#M....\nBBBBBB\n...G..\nBBBBBB\n")?;

    lode_forge()
        .arg("--validate")
        .arg(&level)
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"valid\": false"))
        .stderr(predicate::str::contains("Level failed validation"))
        .stderr(predicate::str::contains("(3, 3)"));
    Ok(())
}

#[test]
fn test_config_file_is_applied() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let config = tmp_dir.path().join("lode.toml");
    fs::write(&config, "width = 12\nheight = 7\nmax_attempts = 2\nseed = 4\n")?;
    let output_file = tmp_dir.path().join("level.txt");

    lode_forge()
        .arg("--config-file")
        .arg(&config)
        .arg("--output-path")
        .arg(&output_file)
        .assert()
        .success();

    let levels = read_levels(&output_file);
    assert_eq!(levels[0].len(), 7);
    assert!(levels[0].iter().all(|row| row.len() == 12));
    Ok(())
}

#[test]
fn test_invalid_dimensions_rejected() {
    lode_forge()
        .args(["--height", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("height must be at least 2"));
}
