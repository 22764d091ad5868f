use beamlink::{self, budget::Budget, settings::Settings};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Gaussian beam radius at a given axial distance.
#[pyfunction]
fn beam_radius_at(distance: f32, waist: f32, wavelength: f32) -> PyResult<f32> {
    Ok(beamlink::geometry::beam_radius_at(
        distance, waist, wavelength,
    ))
}

/// Fraction of beam power captured by an offset circular aperture.
#[pyfunction]
fn overlap_efficiency(receiver_radius: f32, beam_radius: f32, offset: f32) -> PyResult<f32> {
    Ok(beamlink::geometry::overlap_efficiency(
        receiver_radius,
        beam_radius,
        offset,
    ))
}

/// Fraction of beam power captured by a centred circular aperture.
#[pyfunction]
fn collection_efficiency(receiver_radius: f32, beam_radius: f32) -> PyResult<f32> {
    Ok(beamlink::geometry::collection_efficiency(
        receiver_radius,
        beam_radius,
    ))
}

/// Evaluate the full stage chain for one parameter set.
#[pyfunction]
fn evaluate(settings: &Settings) -> PyResult<Budget> {
    beamlink::budget::evaluate(settings).map_err(|err| PyValueError::new_err(err.to_string()))
}

/// A Python module implemented in Rust.
#[pymodule]
fn beamlink_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(beam_radius_at, m)?)?;
    m.add_function(wrap_pyfunction!(overlap_efficiency, m)?)?;
    m.add_function(wrap_pyfunction!(collection_efficiency, m)?)?;
    m.add_function(wrap_pyfunction!(evaluate, m)?)?;
    m.add_class::<Settings>()?;
    m.add_class::<Budget>()?;
    Ok(())
}
