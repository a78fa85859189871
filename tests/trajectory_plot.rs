use assert_cmd::Command;
use std::fs::{self, File};
use std::io::Write;
use two_body_orbits::export::telemetry::{self, Record};

#[test]
fn trajectory_plot_renders_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("telemetry.csv");
    let png_path = dir.path().join("orbit.png");

    let mut file = File::create(&csv_path).expect("csv create");
    telemetry::write_header(&mut file).unwrap();
    for i in 0..32 {
        let phi = i as f64 * 0.2;
        let position = [5.0 * phi.cos(), 0.0, 5.0 * phi.sin()];
        let velocity = [-10.0 * phi.sin(), 0.0, 10.0 * phi.cos()];
        Record {
            tick: i + 1,
            elapsed: phi,
            substeps: 110,
            energy_error: 1e-10,
            max_energy_error: 1e-10,
            integrator_converged: true,
            propagator_converged: true,
            propagator_iterations: 3,
            integrator_position: position,
            integrator_velocity: velocity,
            propagator_position: [position[0] * 1.01, 0.0, position[2] * 1.01],
            propagator_velocity: velocity,
            divergence: 0.05,
            angular_momentum_divergence: 1e-9,
        }
        .write_to(&mut file)
        .unwrap();
    }
    file.flush().unwrap();

    Command::cargo_bin("trajectory_plot")
        .expect("trajectory_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            png_path.to_str().unwrap(),
            "--width",
            "400",
            "--height",
            "400",
        ])
        .assert()
        .success();

    let metadata = fs::metadata(png_path).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

#[test]
fn trajectory_plot_rejects_csv_without_positions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("other.csv");
    fs::write(&csv_path, "a,b\n1,2\n").expect("write csv");

    Command::cargo_bin("trajectory_plot")
        .expect("trajectory_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            dir.path().join("x.png").to_str().unwrap(),
        ])
        .assert()
        .failure();
}
