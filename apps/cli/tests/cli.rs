use assert_cmd::Command;
use predicates::prelude::*;

fn ctiprd() -> Command {
    Command::cargo_bin("ctiprd").expect("Failed to locate ctiprd binary")
}

#[test]
fn manifest_show_prints_current_revision() {
    ctiprd()
        .args(["manifest", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pybind11/2.10.0").and(predicate::str::contains("header_only")));
}

#[test]
fn manifest_resolve_initial_has_no_steps() {
    ctiprd()
        .args(["manifest", "resolve", "--revision", "initial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("catch2 = \"2.13.7\"").and(predicate::str::contains("header_only").not()));
}

#[test]
fn manifest_check_rejects_broken_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[package]\nname = \"x\"\nversion = \"1\"\nrequires = [\"spdlog\"]\ngenerators = [\"txt\"]\n")
        .unwrap();

    ctiprd()
        .args(["-q", "manifest", "check", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid requirement"));
}

#[test]
fn systems_lists_presets() {
    ctiprd()
        .arg("systems")
        .assert()
        .success()
        .stdout(predicate::str::contains("lotka_volterra_2d").and(predicate::str::contains("michaelis_menten")));
}

#[test]
fn simulate_writes_trajectory() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("traj.json");
    let config = dir.path().join("sim.toml");
    std::fs::write(
        &config,
        "[simulation]\nsystem = \"lotka_volterra\"\nrecord_every = 2\nrecord = [\"counts\"]\n\n\
         [simulation.initial]\nprey = 40\npredator = 10\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();

    ctiprd()
        .args(["simulate", "--steps", "4", "--dt", "0.001", "--workers", "2", "--config"])
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("predator=10 prey=40"));

    let json = std::fs::read_to_string(&output).unwrap();
    assert!(json.contains("\"system\":\"lotka_volterra\""));
    assert!(json.contains("\"fields\":[\"counts\"]"));
}

#[test]
fn simulate_unknown_system_fails() {
    ctiprd()
        .args(["-q", "simulate", "brusselator", "--steps", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown system preset"));
}

fn lotka_volterra_config(dir: &std::path::Path, extra: &str) -> std::path::PathBuf {
    let config = dir.join("sim.toml");
    std::fs::write(
        &config,
        format!(
            "[simulation]\nsystem = \"lotka_volterra\"\nsteps = 2\ndt = 0.001\nrecord_every = 2\nrecord = [\"counts\"]\n\n\
             [simulation.initial]\nprey = 40\npredator = 10\n\n{extra}"
        ),
    )
    .unwrap();
    config
}

#[test]
fn environment_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = lotka_volterra_config(dir.path(), "[logging]\nlevel = \"warn\"\n");
    let output = dir.path().join("traj.json");

    ctiprd()
        .env("CTIPRD__SIMULATION__STEPS", "6")
        .args(["simulate", "--workers", "2", "--config"])
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("t=0.0060").and(predicate::str::contains("(4 frames)")));

    let json = std::fs::read_to_string(&output).unwrap();
    assert!(json.contains("\"step\":6"));
}

#[test]
fn worker_threads_come_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let config = lotka_volterra_config(dir.path(), "[logging]\nlevel = \"info\"\n");

    ctiprd()
        .env("CTIPRD_WORKER_THREADS", "3")
        .env_remove("RUST_LOG")
        .args(["simulate", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("Simulation started").and(predicate::str::contains("workers=3")));

    ctiprd()
        .env("CTIPRD_WORKER_THREADS", "3")
        .env("CTIPRD__POOL__WORKER_THREADS", "5")
        .env_remove("RUST_LOG")
        .args(["simulate", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("workers=5"));
}
