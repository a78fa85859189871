use approx::assert_relative_eq;
use two_body_orbits::physics::conserved::angular_momentum_drift;
use two_body_orbits::physics::{
    EnergyBaseline, PhysicalParameters, PhysicsError, State, angular_momentum, energy,
};

fn scenario() -> (PhysicalParameters, State) {
    let params = PhysicalParameters::new(1000.0, 1.0, 1.0).expect("params");
    let state = State::new([5.0, 0.0, 0.0], [0.0, 0.0, 10.0]);
    (params, state)
}

#[test]
fn energy_combines_kinetic_and_potential_terms() {
    let (params, state) = scenario();
    // 0.5 * 1 * 100 - 1000 / 5
    let e = energy(&state, &params).expect("energy");
    assert_relative_eq!(e, -150.0, max_relative = 1e-15);
}

#[test]
fn angular_momentum_is_position_cross_velocity() {
    let (_, state) = scenario();
    let h = angular_momentum(&state);
    assert_eq!(h, [0.0, -50.0, 0.0]);

    let shifted = State::new([0.0, 0.0, 5.0], [-10.0, 0.0, 0.0]);
    assert!(angular_momentum_drift(&state, &shifted) < 1e-12);
}

#[test]
fn energy_rejects_singular_and_non_finite_positions() {
    let (params, _) = scenario();
    let origin = State::new([0.0; 3], [1.0, 0.0, 0.0]);
    assert_eq!(
        energy(&origin, &params),
        Err(PhysicsError::SingularPosition)
    );

    let nan = State::new([f64::NAN, 1.0, 0.0], [1.0, 0.0, 0.0]);
    assert!(matches!(
        energy(&nan, &params),
        Err(PhysicsError::NonFinite { .. })
    ));
}

#[test]
fn baseline_reports_absolute_drift() {
    let (params, state) = scenario();
    let baseline = EnergyBaseline::capture(&state, &params).expect("baseline");
    assert_eq!(baseline.error(&state, &params).expect("error"), 0.0);

    let faster = State::new(state.position, [0.0, 0.0, 11.0]);
    // 0.5 * (121 - 100)
    assert_relative_eq!(
        baseline.error(&faster, &params).expect("error"),
        10.5,
        max_relative = 1e-12
    );
}

#[test]
fn parameters_reject_non_physical_inputs() {
    assert!(matches!(
        PhysicalParameters::new(0.0, 1.0, 1.0),
        Err(PhysicsError::InvalidMass { name: "m1", .. })
    ));
    assert!(matches!(
        PhysicalParameters::new(1.0, f64::INFINITY, 1.0),
        Err(PhysicsError::InvalidMass { name: "m2", .. })
    ));
    assert!(matches!(
        PhysicalParameters::new(1.0, 1.0, -6.674e-11),
        Err(PhysicsError::InvalidGravitationalConstant(_))
    ));

    let params = PhysicalParameters::with_default_g(1000.0, 1.0).expect("params");
    assert_eq!(params.g(), 1.0);
    assert_relative_eq!(params.reduced_mass(), 1000.0 / 1001.0);
    assert_relative_eq!(params.gamma(), 1000.0);
    assert_relative_eq!(params.gravitational_parameter(), 1000.0);
}
