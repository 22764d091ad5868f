//! Sampled beam envelope along the propagation axis.
//!
//! The presentation layer draws the beam as an envelope around a drifting
//! centerline, closed off by the receiver cross-section at the receiver
//! plane. This module produces those samples; it performs no drawing.

use ndarray::Array1;
use std::f32::consts::PI;

use crate::geometry;
use crate::settings::{Settings, ENVELOPE_SAMPLES, RECEIVER_OUTLINE_SAMPLES, WAVELENGTH};


/// Beam envelope samples plus the receiver outline at the receiver plane.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamEnvelope {
    /// Axial sample positions, 0 to the link distance.
    pub z: Array1<f32>,
    /// Beam centre at each sample; the receiver-plane offset applied
    /// progressively along the link.
    pub centerline: Array1<f32>,
    /// Upper envelope, centerline + beam radius.
    pub upper: Array1<f32>,
    /// Lower envelope, centerline - beam radius.
    pub lower: Array1<f32>,
    /// Receiver cross-section outline at z = distance.
    pub receiver: Vec<(f32, f32)>,
}

/// Samples the beam envelope over the full link.
pub fn trace(settings: &Settings) -> BeamEnvelope {
    let z = Array1::linspace(0.0, settings.distance, ENVELOPE_SAMPLES);
    let radius = z.mapv(|zi| geometry::beam_radius_at(zi, settings.beam_waist, WAVELENGTH));
    let centerline = z.mapv(|zi| settings.beam_offset * zi / settings.distance);
    let upper = &centerline + &radius;
    let lower = &centerline - &radius;
    let receiver = receiver_outline(settings);

    BeamEnvelope {
        z,
        centerline,
        upper,
        lower,
        receiver,
    }
}

/// Generate the receiver cross-section outline at the receiver plane.
/// Drawn as a narrow ellipse so the circle reads side-on in the z-y plane.
fn receiver_outline(settings: &Settings) -> Vec<(f32, f32)> {
    let theta = Array1::linspace(0.0, 2.0 * PI, RECEIVER_OUTLINE_SAMPLES);
    theta
        .iter()
        .map(|t| {
            (
                settings.distance + 0.01 * t.cos(),
                settings.receiver_radius * t.sin(),
            )
        })
        .collect()
}
