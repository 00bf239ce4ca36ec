use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("stitchtrack").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress tracker for craft patterns"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("stitchtrack").unwrap();
    cmd.arg("serve").arg("--help").assert().success().stdout(predicate::str::contains("port"));
}

#[test]
fn test_import_then_stats() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = dir.path().join("test.db");
    let import = dir.path().join("pattern.json");
    std::fs::write(
        &import,
        r#"{
            "title": "Test shawl",
            "designer": {"id": "designer-1", "name": "Ana"},
            "steps": [
                {"description": "Cast on 40 stitches", "stitch_count": 40},
                {"description": "Knit 10 rows"}
            ],
            "materials": [{"name": "Wool", "quantity": "2 skeins"}]
        }"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("stitchtrack").unwrap();
    cmd.arg("--db")
        .arg(&db)
        .arg("import")
        .arg(&import)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported pattern"));

    let mut cmd = Command::cargo_bin("stitchtrack").unwrap();
    cmd.arg("--db")
        .arg(&db)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pattern_count\": 1"));
}
