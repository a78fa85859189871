use std::fs;
use two_body_orbits::config::{
    ConfigError, PropagatorChoice, StepperChoice, find_orbit, load_orbits,
};

#[test]
fn scenario_directory_loads_in_file_order() {
    let orbits = load_orbits("configs/orbits").expect("orbit directory");
    let names: Vec<&str> = orbits.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["bound-ellipse", "escape", "near-circular"]);

    let escape = find_orbit(&orbits, "ESCAPE").expect("escape orbit");
    assert_eq!(escape.g, 1.0);
    assert_eq!(escape.trajectory_segments, 128);
    assert_eq!(escape.propagator, PropagatorChoice::Goodyear);
    assert_eq!(escape.integrator.stepper, StepperChoice::Verlet);
    assert_eq!(escape.integrator.tolerance, 1e-8);
    assert_eq!(escape.integrator.max_substeps, 200);
    assert_eq!(escape.integrator.seed_factor, 1.1);
    assert_eq!(escape.time_scale, 0.02);

    let circular = find_orbit(&orbits, "near-circular").expect("near-circular orbit");
    assert_eq!(circular.propagator, PropagatorChoice::Danby);
    assert_eq!(circular.integrator.stepper, StepperChoice::Yoshida);
}

#[test]
fn yaml_catalog_matches_toml_record() {
    let yaml = load_orbits("configs/orbits.yaml").expect("yaml catalog");
    assert_eq!(yaml.len(), 2);
    let leo = find_orbit(&yaml, "leo").expect("LEO");
    assert_eq!(leo.m1, 398_600.4415);
    assert_eq!(leo.integrator.stepper, StepperChoice::Yoshida);
    assert_eq!(leo.integrator.max_substeps, 200);

    let toml = load_orbits("configs/orbits/bound_ellipse.toml").expect("toml record");
    assert_eq!(toml.len(), 1);
    let from_yaml = find_orbit(&yaml, "bound-ellipse").expect("bound-ellipse");
    assert_eq!(&toml[0], from_yaml);
}

#[test]
fn invalid_records_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");

    let cap = dir.path().join("cap.toml");
    fs::write(
        &cap,
        "name = \"cap\"\nm1 = 1.0\nm2 = 1.0\nposition = [1.0, 0.0, 0.0]\nvelocity = [0.0, 1.0, 0.0]\n\n[integrator]\nmax_substeps = 500\n",
    )
    .expect("write cap");
    match load_orbits(&cap) {
        Err(ConfigError::Invalid { name, reason }) => {
            assert_eq!(name, "cap");
            assert!(reason.contains("max_substeps"));
        }
        other => panic!("expected invalid record, got {other:?}"),
    }

    let origin = dir.path().join("origin.yaml");
    fs::write(
        &origin,
        "- name: origin\n  m1: 1.0\n  m2: 1.0\n  position: [0.0, 0.0, 0.0]\n  velocity: [0.0, 1.0, 0.0]\n",
    )
    .expect("write origin");
    assert!(matches!(
        load_orbits(&origin),
        Err(ConfigError::Invalid { .. })
    ));

    let massless = dir.path().join("massless.yaml");
    fs::write(
        &massless,
        "- name: massless\n  m1: 0.0\n  m2: 1.0\n  position: [1.0, 0.0, 0.0]\n  velocity: [0.0, 1.0, 0.0]\n",
    )
    .expect("write massless");
    assert!(matches!(
        load_orbits(&massless),
        Err(ConfigError::Invalid { .. })
    ));

    let broken = dir.path().join("broken.yaml");
    fs::write(&broken, "- name: [unterminated\n").expect("write broken");
    assert!(matches!(load_orbits(&broken), Err(ConfigError::Parse(_))));

    let bad_toml = dir.path().join("bad.toml");
    fs::write(&bad_toml, "name = \"bad\"\nm1 = \n").expect("write bad toml");
    assert!(matches!(load_orbits(&bad_toml), Err(ConfigError::Toml(_))));

    assert!(matches!(
        load_orbits(dir.path().join("missing.yaml")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn unknown_solver_names_fail_to_parse() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rk4.toml");
    fs::write(
        &path,
        "name = \"rk4\"\nm1 = 1.0\nm2 = 1.0\nposition = [1.0, 0.0, 0.0]\nvelocity = [0.0, 1.0, 0.0]\n\n[integrator]\nstepper = \"rk4\"\n",
    )
    .expect("write");
    assert!(matches!(load_orbits(&path), Err(ConfigError::Toml(_))));
}
