//! Gaussian beam propagation and circular-aperture collection geometry.
//!
//! This module implements the pure geometric relations of the link: the
//! divergence of a Gaussian beam with propagation distance, and the
//! fraction of beam power captured by a circular receiver aperture, both
//! centred and laterally offset. These are closed-form expressions with no
//! side effects; the stage chain composes them into the power budget.
//!
//! The implementation provides:
//! - Beam radius evolution from waist and wavelength
//! - Offset-aware aperture overlap with a modified Bessel factor
//! - Centred aperture collection as the zero-offset limit
//! - Pointing walk-off loss from a static angular error
//! - Numerical stability for arbitrarily aggressive offsets
//!
//! # Mathematical Foundation
//!
//! The overlap of an offset Gaussian beam with a circular aperture of
//! radius R at lateral offset d is
//!
//! ```text
//! eta = 1 - exp(-2 d^2 / w^2) * exp(-2 R^2 / w^2) * I0(4 R d / w^2)
//! ```
//!
//! The three factors are folded into a single bounded product before
//! evaluation: the combined exponent is `-2 (d - R)^2 / w^2`, which is
//! never positive, so the expression cannot overflow even where I0 on its
//! own would.

use std::f32::consts::PI;

use crate::bessel;


/// Gaussian beam 1/e^2 radius at axial distance `distance` from the waist.
///
/// **Context**: A focused Gaussian beam spreads with propagation distance
/// at a rate set by the wavelength and the waist; the radius at the
/// receiver plane determines how much of the beam a finite aperture can
/// collect.
///
/// **How it Works**: Applies the standard divergence relation
/// `w(z) = w0 * sqrt(1 + (lambda z / (pi w0^2))^2)`. The result is never
/// below the waist. The relation is undefined for a zero waist; callers
/// validate `waist > 0` before evaluating.
pub fn beam_radius_at(distance: f32, waist: f32, wavelength: f32) -> f32 {
    let spread = wavelength * distance / (PI * waist * waist);
    waist * (1.0 + spread * spread).sqrt()
}

/// Fraction of total beam power captured by a circular aperture of radius
/// `receiver_radius` whose centre sits at lateral `offset` from the beam
/// axis, given the local beam radius.
///
/// **Context**: A beam that walks off the receiver centre loses power past
/// the aperture edge. The loss has a closed form involving the modified
/// Bessel function I0, which grows exponentially and would overflow long
/// before the accompanying decay terms shrink the product.
///
/// **How it Works**: Folds the two Gaussian decay factors and the Bessel
/// growth into `exp(-2 (d - R)^2 / w^2) * i0e(4 R d / w^2)`, whose
/// exponent is never positive, then floors the efficiency at zero to
/// absorb floating-point cancellation near total loss. At zero offset the
/// expression reduces exactly to [`collection_efficiency`].
pub fn overlap_efficiency(receiver_radius: f32, beam_radius: f32, offset: f32) -> f32 {
    let w2 = beam_radius * beam_radius;
    let walk = offset - receiver_radius;
    let damp = (-2.0 * walk * walk / w2).exp();
    let eta = 1.0 - damp * bessel::i0e(4.0 * receiver_radius * offset / w2);
    eta.max(0.0)
}

/// Fraction of total beam power falling inside a centred circular aperture.
///
/// **Context**: Even a perfectly centred beam loses the power carried in
/// its Gaussian tails beyond the aperture edge; this is the collection
/// loss of a finite receiver.
///
/// **How it Works**: Integrates the Gaussian profile over the aperture,
/// giving `1 - exp(-2 R^2 / w^2)`.
pub fn collection_efficiency(receiver_radius: f32, beam_radius: f32) -> f32 {
    let w2 = beam_radius * beam_radius;
    1.0 - (-2.0 * receiver_radius * receiver_radius / w2).exp()
}

/// Power fraction surviving a static pointing error over the link distance.
///
/// **How it Works**: A pointing error of `pointing_error` radians walks the
/// beam centre off axis by `pointing_error * distance` at the receiver;
/// the surviving fraction is the Gaussian factor
/// `exp(-2 (delta / w0)^2)` of that walk-off against the waist.
pub fn pointing_efficiency(pointing_error: f32, distance: f32, waist: f32) -> f32 {
    let walk_off = pointing_error * distance / waist;
    (-2.0 * walk_off * walk_off).exp()
}
