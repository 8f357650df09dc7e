//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `familia` command isolated in `dir`: its own data directory, cwd and
/// home, with no config overrides leaking in from the environment.
fn familia(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("familia").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("FAMILIA_DATA_DIR")
        .env_remove("FAMILIA_CHAT_ENDPOINT")
        .env_remove("FAMILIA_CHAT_MODEL")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    familia(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Family Spanish vocabulary trainer"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    familia(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("familia"));
}

#[test]
fn init_creates_config_and_seeds_content() {
    let dir = TempDir::new().unwrap();

    familia(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created familia.toml"))
        .stdout(predicate::str::contains("Seeded built-in vocabulary"))
        .stdout(predicate::str::contains("Seeded built-in phrases"));

    assert!(dir.path().join("familia.toml").exists());
    assert!(dir.path().join("data/vocabularyData.json").exists());
    assert!(dir.path().join("data/phrasesData.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();
    familia(dir.path()).arg("init").assert().success();

    familia(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("Existing vocabulary kept"));
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    familia(dir.path())
        .args(["--config", "nope.toml", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn fresh_stats_are_zero() {
    let dir = TempDir::new().unwrap();
    familia(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stars:         0"))
        .stdout(predicate::str::contains("Words:         0"));
}

#[test]
fn record_accumulates() {
    let dir = TempDir::new().unwrap();

    familia(dir.path())
        .args(["record", "stars", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 today"));
    familia(dir.path())
        .args(["record", "stars", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 today"));
    familia(dir.path())
        .args(["record", "grade", "4/5"])
        .assert()
        .success();
    familia(dir.path())
        .args(["record", "grade", "3/5"])
        .assert()
        .success();

    familia(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stars:         5"))
        .stdout(predicate::str::contains("Quizzes taken: 2"))
        .stdout(predicate::str::contains("Daily grade:   70%"));
}

#[test]
fn bad_grade_is_rejected() {
    let dir = TempDir::new().unwrap();
    familia(dir.path())
        .args(["record", "grade", "four of five"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn check_toggles() {
    let dir = TempDir::new().unwrap();

    familia(dir.path())
        .args(["check", "Colors_0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked Colors_0 as known (1 word(s) today)"));

    familia(dir.path())
        .args(["check", "Colors_0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unmarked Colors_0 (0 word(s) today)"));
}

#[test]
fn categories_and_show() {
    let dir = TempDir::new().unwrap();

    familia(dir.path())
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Family Members"));

    familia(dir.path())
        .args(["categories", "--kind", "phrases"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bedtime"));

    familia(dir.path())
        .args(["show", "Colors"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rojo"))
        .stdout(predicate::str::contains("Colors_0"));
}

#[test]
fn show_unknown_category() {
    let dir = TempDir::new().unwrap();
    familia(dir.path())
        .args(["show", "Dinosaurs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown vocabulary category: Dinosaurs"));
}

#[test]
fn export_to_stdout() {
    let dir = TempDir::new().unwrap();
    familia(dir.path())
        .args(["export", "Colors"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "English,Spanish,Pronunciation\n\"Red\",\"Rojo\",\"ROH-hoh\"\n",
        ));
}

#[test]
fn export_to_directory_uses_file_name() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();

    familia(dir.path())
        .args(["export", "Bedtime", "--kind", "phrases", "--output"])
        .arg(&out)
        .assert()
        .success();

    let text = std::fs::read_to_string(out.join("Bedtime.csv")).unwrap();
    assert!(text.contains("\"Te quiero\""));
}

#[test]
fn import_replaces_category() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("pets.csv");
    std::fs::write(
        &csv_path,
        "English,Spanish,Pronunciation\n\"Dog\",\"Perro\",\"PEH-rroh\"\nCat,Gato\n\"broken,\"row\"\n",
    )
    .unwrap();

    familia(dir.path())
        .args(["import", "Pets"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 row(s) into Pets (1 line(s) skipped)"));

    familia(dir.path())
        .args(["show", "Pets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Perro"))
        .stdout(predicate::str::contains("Gato"));
}

#[test]
fn import_without_rows_fails() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("empty.csv");
    std::fs::write(&csv_path, "English,Spanish,Pronunciation\n").unwrap();

    familia(dir.path())
        .args(["import", "Colors"])
        .arg(&csv_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid CSV format"));

    familia(dir.path())
        .args(["show", "Colors"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rojo"));
}

#[test]
fn quiz_records_a_grade() {
    let dir = TempDir::new().unwrap();

    familia(dir.path())
        .args(["quiz", "--count", "3", "--seed", "42"])
        .write_stdin("1\n2\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1/3"))
        .stdout(predicate::str::contains("What does"))
        .stdout(predicate::str::contains("Score:"));

    familia(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quizzes taken: 1"))
        .stdout(predicate::str::contains("Words:         3"));
}

#[test]
fn quiz_cut_short_records_nothing() {
    let dir = TempDir::new().unwrap();

    familia(dir.path())
        .args(["quiz", "--kind", "phrases", "--count", "3"])
        .write_stdin("1\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing recorded"));

    familia(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quizzes taken: 0"));
}

#[test]
fn flashcards_score_known_cards() {
    let dir = TempDir::new().unwrap();

    familia(dir.path())
        .args(["flashcards", "--count", "3", "--seed", "7"])
        .write_stdin("y\nn\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 2/3  Stars earned: 2"))
        .stdout(predicate::str::contains("To review:"));
}

#[test]
fn word_of_day() {
    let dir = TempDir::new().unwrap();
    familia(dir.path())
        .arg("word-of-day")
        .assert()
        .success()
        .stdout(predicate::str::contains("Word of the day:"));
}

#[test]
fn theme_roundtrip() {
    let dir = TempDir::new().unwrap();

    familia(dir.path())
        .arg("theme")
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: light"));
    familia(dir.path())
        .args(["theme", "dark"])
        .assert()
        .success();
    familia(dir.path())
        .arg("theme")
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"));
    familia(dir.path())
        .args(["theme", "purple"])
        .assert()
        .failure();
}

#[test]
fn legacy_theme_string_is_read() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("theme.json"), "\"dark\"").unwrap();

    familia(dir.path())
        .arg("theme")
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"));
    assert_eq!(std::fs::read_to_string(data.join("theme.json")).unwrap(), "true");
}

#[test]
fn theme_save_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    // A directory where the theme blob belongs makes every write fail.
    std::fs::create_dir_all(dir.path().join("data/theme.json")).unwrap();

    familia(dir.path())
        .args(["theme", "dark"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Theme:").not())
        .stderr(predicate::str::contains("failed to save theme"));
}

#[test]
fn chat_config_save_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("data/chatModelName.json")).unwrap();

    familia(dir.path())
        .args(["chat", "config", "--model", "mistral"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to save chat settings"));
}

#[test]
fn chat_config_persists() {
    let dir = TempDir::new().unwrap();

    familia(dir.path())
        .args(["chat", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:11434/api/generate"))
        .stdout(predicate::str::contains("llama2"));

    familia(dir.path())
        .args(["chat", "config", "--model", "mistral"])
        .assert()
        .success();

    familia(dir.path())
        .args(["chat", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Model:    mistral"));
}

#[test]
fn chat_send_unreachable_endpoint() {
    let dir = TempDir::new().unwrap();
    familia(dir.path())
        .env("FAMILIA_CHAT_ENDPOINT", "http://127.0.0.1:1/api/generate")
        .args(["chat", "send", "hola"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("chat request to http://127.0.0.1:1/api/generate failed"));
}

#[test]
fn repair_normalizes_corrupted_history() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("dailyStats.json"),
        r#"{"2024-01-01":{"stars":"lots","words":2,"checkedWords":["a","b","a"]}}"#,
    )
    .unwrap();

    familia(dir.path())
        .arg("repair")
        .assert()
        .success()
        .stdout(predicate::str::contains("Repaired 1 day(s)"));

    familia(dir.path())
        .arg("repair")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to repair"));

    familia(dir.path())
        .args(["stats", "--date", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stars:         0"))
        .stdout(predicate::str::contains("Checked words: 2"));

    familia(dir.path())
        .args(["stats", "--history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-01"));
}

#[test]
fn stats_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    familia(dir.path())
        .args(["stats", "--date", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}
