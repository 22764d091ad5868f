use std::f32::consts::PI;

use beamlink::budget::{self, Stage};
use beamlink::error::LinkError;
use beamlink::geometry;
use beamlink::settings::{self, Settings, WAVELENGTH};

// Tolerance for comparing stage powers
const TOL: f32 = 1e-3;

fn reference_settings() -> Settings {
    Settings {
        distance: 5.0,
        beam_waist: 0.05,
        receiver_radius: 0.3,
        beam_offset: 0.01,
        pointing_error: 1e-8,
        num_lasers: 1,
        input_power_kw: 0.4,
    }
}

#[test]
fn end_to_end_reference_case() {
    let s = reference_settings();
    let budget = budget::evaluate(&s).unwrap();
    let powers = budget.powers();

    assert_eq!(budget.stages.len(), 10);

    // Transmitter stages
    assert!((powers[0] - 400.0).abs() < TOL, "driver: {}", powers[0]);
    assert!((powers[1] - 120.0).abs() < TOL, "laser: {}", powers[1]);
    assert!((powers[2] - 116.4).abs() < TOL, "optics: {}", powers[2]);

    // Pointing loss is negligible at 1e-8 rad over 5 m
    assert!((powers[3] - powers[2]).abs() < 1e-2);
    // Atmospheric stage is a stub
    assert_eq!(powers[4], powers[3]);

    // The receiver is much larger than the beam, so both aperture stages
    // are close to lossless
    let w = geometry::beam_radius_at(s.distance, s.beam_waist, WAVELENGTH);
    assert!((w - s.beam_waist).abs() < 1e-5, "negligible divergence: {}", w);
    assert!(powers[6] > 116.0, "after collection: {}", powers[6]);

    // Receiver stages
    let after_receiver_optics = powers[6] * 0.99_f32.powi(4);
    assert!((powers[7] - after_receiver_optics).abs() < TOL);
    let pv = after_receiver_optics * PI * 0.09 * 0.60;
    assert!((powers[8] - pv).abs() < TOL);
    assert!((powers[9] - pv * 0.90).abs() < TOL);

    // Headline metrics, measured against the wall-plug draw
    assert!((budget.required_driver_input - 400.0 / 0.95).abs() < TOL);
    let eff = budget.total_efficiency();
    assert!(eff.is_finite() && eff > 0.0 && eff < 100.0, "eff: {}", eff);
    assert!((budget.final_output() - powers[9]).abs() < f32::EPSILON);
}

#[test]
fn powers_non_increasing_until_photovoltaic_area() {
    let mut s = reference_settings();
    s.beam_offset = 0.2;
    s.pointing_error = 5e-7;
    let budget = budget::evaluate(&s).unwrap();
    let powers = budget.powers();

    for i in 1..=7 {
        assert!(
            powers[i] <= powers[i - 1],
            "stage {}: {} > {}",
            i,
            powers[i],
            powers[i - 1]
        );
    }
    // The photovoltaic stage applies the receiver area and may raise the
    // numeric value; conditioning can only lower it again
    assert!(powers[9] <= powers[8]);
}

#[test]
fn doubling_lasers_doubles_downstream_power() {
    let mut s = reference_settings();
    let single = budget::evaluate(&s).unwrap();
    s.num_lasers = 2;
    let double = budget::evaluate(&s).unwrap();

    assert_eq!(single.powers()[0], double.powers()[0]);
    for (a, b) in single.powers()[1..].iter().zip(double.powers()[1..].iter()) {
        assert_eq!(2.0 * a, *b);
    }
}

#[test]
fn zero_offset_makes_aperture_stages_agree() {
    let mut s = reference_settings();
    s.beam_offset = 0.0;
    assert_eq!(
        Stage::GeometricLoss.gain(&s),
        Stage::Collection.gain(&s)
    );
}

#[test]
fn evaluation_is_deterministic() {
    let s = reference_settings();
    let first = budget::evaluate(&s).unwrap();
    let second = budget::evaluate(&s).unwrap();
    assert_eq!(first, second);
}

#[test]
fn degenerate_parameters_fail_before_the_chain() {
    let mut s = reference_settings();
    s.beam_waist = 0.0;
    assert!(matches!(
        budget::evaluate(&s).unwrap_err(),
        LinkError::InvalidParameter {
            name: "beam_waist",
            ..
        }
    ));

    let mut s = reference_settings();
    s.beam_offset = -0.1;
    assert!(matches!(
        budget::evaluate(&s).unwrap_err(),
        LinkError::InvalidParameter {
            name: "beam_offset",
            ..
        }
    ));

    let mut s = reference_settings();
    s.num_lasers = 0;
    assert!(matches!(
        budget::evaluate(&s).unwrap_err(),
        LinkError::InvalidParameter {
            name: "num_lasers",
            ..
        }
    ));

    let mut s = reference_settings();
    s.input_power_kw = f32::NAN;
    assert!(budget::evaluate(&s).is_err());
}

#[test]
fn default_config_matches_reference_parameters() {
    let config = settings::load_default_config().unwrap();
    assert_eq!(config, reference_settings());
}
