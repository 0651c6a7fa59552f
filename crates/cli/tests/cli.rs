use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn popsynth() -> Command {
    Command::cargo_bin("popsynth").unwrap()
}

#[test]
fn test_init_writes_configuration() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("run.json");

    popsynth()
        .arg("init")
        .arg("--output")
        .arg(&config_path)
        .arg("--mode")
        .arg("single")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration written to"));

    let text = fs::read_to_string(&config_path).unwrap();
    assert!(text.contains("\"mode\": \"single\""));
    assert!(text.contains("\"metallicity\": 0.0142"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp = tempdir().unwrap();
    let config_path = temp.path().join("run.json");
    fs::write(&config_path, "{}").unwrap();

    popsynth()
        .arg("init")
        .arg("--output")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    popsynth()
        .arg("init")
        .arg("--output")
        .arg(&config_path)
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn test_single_star_sweep_prints_status_lines() {
    popsynth()
        .args(["single", "--seed", "5", "--mass-min", "1", "--mass-max", "3", "--mass-steps", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "0: RandomSeed = 5, Initial Mass = 1, Metallicity = 0.0142",
        ))
        .stdout(predicate::str::contains("1: RandomSeed = 6, Initial Mass = 2,"))
        .stdout(predicate::str::contains("Simulation completed"))
        .stdout(predicate::str::contains("Wall-clock time = 00:00:"));
}

#[test]
fn test_quiet_run_prints_nothing() {
    popsynth()
        .args(["single", "--quiet", "--seed", "1", "--mass-steps", "3"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_individual_binary_from_period() {
    popsynth()
        .args([
            "binary", "--seed", "2", "-n", "1", "--mass-1", "30", "--mass-2", "25", "--period",
            "200000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "0: Double compact object formed: (Main_Sequence_>_0.7 -> Black_Hole) + (Main_Sequence_>_0.7 -> Black_Hole)",
        ));
}

#[test]
fn test_binary_grid_writes_output_files() {
    let temp = tempdir().unwrap();
    let grid = temp.path().join("grid.csv");
    fs::write(
        &grid,
        "MASS_1,MASS_2,METALLICITY_1,METALLICITY_2,SEPARATION,ECCENTRICITY\n\
         30,25,0.0142,0.0142,1000,0\n\
         1,0.8,0.0142,0.0142,10,0\n",
    )
    .unwrap();
    let out = temp.path().join("out");

    popsynth()
        .arg("binary")
        .arg("--grid")
        .arg(&grid)
        .arg("--output-dir")
        .arg(&out)
        .arg("--seed")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("1: Allowed time exceeded"));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(out.join("detailed").join("0.csv").exists());
    assert!(out.join("detailed").join("1.csv").exists());
}

#[test]
fn test_missing_grid_fails() {
    popsynth()
        .args(["binary", "--grid", "/no/such/grid.csv", "--seed", "1"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("An error occurred"))
        .stderr(predicate::str::contains("Error opening grid file"));
}

#[test]
fn test_invalid_configuration_is_rejected() {
    popsynth()
        .args(["single", "--metallicity", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("metallicity must be in (0, 1)"));
}

#[test]
fn test_validate_grid_reports_rows_and_warnings() {
    let temp = tempdir().unwrap();
    let grid = temp.path().join("stars.csv");
    fs::write(&grid, "MASS,METALLICITY\n1.0,0.02\n2.0,,\n").unwrap();

    popsynth()
        .arg("validate-grid")
        .arg(&grid)
        .arg("--schema")
        .arg("single")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows: 2"))
        .stdout(predicate::str::contains("Using default metallicity 0.0142 at line 3"))
        .stdout(predicate::str::contains("Grid file is valid"));
}

#[test]
fn test_validate_grid_rejects_bad_header() {
    let temp = tempdir().unwrap();
    let grid = temp.path().join("binaries.csv");
    fs::write(&grid, "MASS_1,MASS_1,ECCENTRICITY\n1,2,0\n").unwrap();

    popsynth()
        .arg("validate-grid")
        .arg(&grid)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate column MASS_1"));
}

#[test]
fn test_grid_warnings_follow_their_status_line() {
    let temp = tempdir().unwrap();
    let grid = temp.path().join("stars.csv");
    fs::write(&grid, "MASS,METALLICITY\n1.0,,\n2.0,0.02\n").unwrap();

    let assert = popsynth()
        .arg("single")
        .arg("--grid")
        .arg(&grid)
        .arg("--seed")
        .arg("1")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    let first = lines.iter().position(|l| l.starts_with("0: ")).unwrap();
    assert_eq!(lines[first + 1], "    ⚠ Using default metallicity 0.0142 at line 2");
    assert!(lines[first + 2].starts_with("1: "));
}
