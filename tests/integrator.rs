use approx::assert_relative_eq;
use two_body_orbits::integrator::{
    AdaptiveIntegrator, CentralField, FixedSeed, IntegratorError, SpeedSquaredSeed, Stepper,
    StepperKind, SubstepSeed, VelocityVerlet, Yoshida4,
};
use two_body_orbits::physics::{EnergyBaseline, PhysicalParameters, PhysicsError, State};

const FRAME: f64 = 1.0 / 60.0;

fn scenario() -> (PhysicalParameters, State, EnergyBaseline) {
    let params = PhysicalParameters::new(1000.0, 1.0, 1.0).expect("params");
    let state = State::new([5.0, 0.0, 0.0], [0.0, 0.0, 10.0]);
    let baseline = EnergyBaseline::capture(&state, &params).expect("baseline");
    (params, state, baseline)
}

fn run_scenario(stepper: StepperKind) -> (f64, usize) {
    let (params, mut state, baseline) = scenario();
    let integrator = AdaptiveIntegrator::new(stepper, 1e-8).expect("integrator");
    let mut max_error: f64 = 0.0;
    let mut capped = 0;
    for _ in 0..100 {
        let advance = integrator
            .advance(&state, &params, 0.05 * FRAME, &baseline)
            .expect("advance");
        if advance.converged {
            assert!(advance.energy_error <= 1e-8);
        } else {
            capped += 1;
            assert_eq!(advance.substeps, 200);
        }
        assert!(advance.substeps >= 1 && advance.substeps <= 200);
        max_error = max_error.max(advance.energy_error);
        state = advance.state;
    }
    (max_error, capped)
}

#[test]
fn verlet_keeps_scenario_energy_under_tolerance() {
    let (max_error, capped) = run_scenario(StepperKind::Verlet);
    assert_eq!(capped, 0);
    assert!(max_error < 1e-8, "max error {max_error:e}");
}

#[test]
fn yoshida_keeps_scenario_energy_under_tolerance() {
    let (max_error, capped) = run_scenario(StepperKind::Yoshida);
    assert_eq!(capped, 0);
    assert!(max_error < 1e-9, "max error {max_error:e}");
}

#[test]
fn substeps_never_decrease_as_tolerance_tightens() {
    let (params, state, baseline) = scenario();
    for seed in [
        Box::new(FixedSeed(1)) as Box<dyn SubstepSeed>,
        Box::new(SpeedSquaredSeed::default()),
    ] {
        let mut integrator = AdaptiveIntegrator::default().with_seed(seed);
        let mut previous = 0;
        for tolerance in [1e-4, 1e-6, 1e-8, 1e-9, 1e-10, 1e-12] {
            integrator = integrator.with_tolerance(tolerance).expect("tolerance");
            let advance = integrator
                .advance(&state, &params, 0.01, &baseline)
                .expect("advance");
            assert!(
                advance.substeps >= previous,
                "tolerance {tolerance:e} used {} substeps after {previous}",
                advance.substeps
            );
            previous = advance.substeps;
        }
    }
}

#[test]
fn fixed_seed_searches_upward_from_one() {
    let (params, state, baseline) = scenario();
    let integrator = AdaptiveIntegrator::default()
        .with_seed(Box::new(FixedSeed(1)))
        .with_tolerance(1e-4)
        .expect("tolerance");
    let advance = integrator
        .advance(&state, &params, 0.01, &baseline)
        .expect("advance");
    assert_eq!(advance.substeps, 1);
    assert!(advance.converged);
}

#[test]
fn coarse_verlet_hits_the_ceiling_but_yoshida_converges() {
    let (params, state, baseline) = scenario();

    let verlet = AdaptiveIntegrator::new(StepperKind::Verlet, 1e-8).expect("verlet");
    let capped = verlet
        .advance(&state, &params, 0.1, &baseline)
        .expect("advance");
    assert!(!capped.converged);
    assert_eq!(capped.substeps, 200);
    assert!(capped.energy_error > 1e-8);
    assert!(capped.state.position.iter().all(|c| c.is_finite()));

    let yoshida = AdaptiveIntegrator::new(StepperKind::Yoshida, 1e-8).expect("yoshida");
    let advance = yoshida
        .advance(&state, &params, 0.1, &baseline)
        .expect("advance");
    assert!(advance.converged);
    assert_eq!(advance.substeps, 110);
}

#[test]
fn lower_ceiling_is_respected() {
    let (params, state, baseline) = scenario();
    let integrator = AdaptiveIntegrator::default()
        .with_max_substeps(20)
        .expect("ceiling");
    let advance = integrator
        .advance(&state, &params, 0.05, &baseline)
        .expect("advance");
    // The 110 seed is clamped to the ceiling.
    assert_eq!(advance.substeps, 20);
    assert!(!advance.converged);
}

#[test]
fn zero_interval_leaves_state_untouched() {
    let (params, state, baseline) = scenario();
    let advance = AdaptiveIntegrator::default()
        .advance(&state, &params, 0.0, &baseline)
        .expect("advance");
    assert_eq!(advance.state, state);
    assert_eq!(advance.substeps, 0);
    assert!(advance.converged);
}

#[test]
fn invalid_settings_and_inputs_are_rejected() {
    assert!(matches!(
        AdaptiveIntegrator::default().with_tolerance(0.0),
        Err(IntegratorError::InvalidTolerance(_))
    ));
    assert!(matches!(
        AdaptiveIntegrator::default().with_max_substeps(0),
        Err(IntegratorError::InvalidSubstepCap(0))
    ));
    assert!(matches!(
        AdaptiveIntegrator::default().with_max_substeps(201),
        Err(IntegratorError::InvalidSubstepCap(201))
    ));

    let (params, state, baseline) = scenario();
    let integrator = AdaptiveIntegrator::default();
    assert!(matches!(
        integrator.advance(&state, &params, f64::INFINITY, &baseline),
        Err(IntegratorError::NonFiniteTimeStep(_))
    ));
    let origin = State::new([0.0; 3], state.velocity);
    assert!(matches!(
        integrator.advance(&origin, &params, 0.01, &baseline),
        Err(IntegratorError::Physics(PhysicsError::SingularPosition))
    ));
}

#[test]
fn central_field_points_at_the_primary() {
    let field = CentralField::new(1000.0);
    let accel = field.acceleration(&[5.0, 0.0, 0.0]).expect("acceleration");
    assert_relative_eq!(accel[0], -40.0);
    assert_eq!(accel[1], 0.0);
    assert_eq!(accel[2], 0.0);
    assert_eq!(
        field.acceleration(&[0.0; 3]),
        Err(PhysicsError::SingularPosition)
    );
}

#[test]
fn kernels_report_their_order() {
    assert_eq!(VelocityVerlet.order(), 2);
    assert_eq!(Yoshida4::default().order(), 4);
    assert_eq!(StepperKind::Yoshida.kernel().name(), "yoshida");
    assert_eq!(StepperKind::default().label(), "verlet");

    // A single Yoshida step conserves energy far better than Verlet at the same size.
    let (params, state, baseline) = scenario();
    let field = CentralField::from_parameters(&params);
    let mut verlet_state = state;
    let mut yoshida_state = state;
    VelocityVerlet
        .step(&mut verlet_state, &field, 0.005)
        .expect("verlet step");
    Yoshida4::default()
        .step(&mut yoshida_state, &field, 0.005)
        .expect("yoshida step");
    let verlet_error = baseline.error(&verlet_state, &params).expect("error");
    let yoshida_error = baseline.error(&yoshida_state, &params).expect("error");
    assert!(yoshida_error < verlet_error);
}
