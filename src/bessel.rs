//! Modified Bessel function of the first kind, order zero.
//!
//! This module supplies the I0 evaluations needed by the offset-beam
//! aperture overlap integral. I0 grows like `exp(x)/sqrt(2*pi*x)`, so any
//! expression that multiplies it by a decaying exponential must fold the
//! exponentials together before evaluating; the exponentially scaled form
//! `i0e` keeps every intermediate bounded and is the one the overlap
//! formula uses.
//!
//! The implementation provides:
//! - Plain I0 for small and moderate arguments
//! - Exponentially scaled I0 that never overflows
//! - Continuity across the branch point of the two approximations
//! - Accuracy adequate for single precision throughout
//!
//! # Mathematical Foundation
//!
//! Polynomial approximations 9.8.1 and 9.8.2 from Abramowitz & Stegun,
//! with absolute error below 2e-7 on the small branch and relative error
//! below 2e-7 on the large branch.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_argument() {
        assert_eq!(i0(0.0), 1.0);
        assert_eq!(i0e(0.0), 1.0);
    }

    #[test]
    fn tabulated_values() {
        // Abramowitz & Stegun table 9.8
        assert!((i0(1.0) - 1.2660658).abs() < 1e-5);
        assert!((i0(2.0) - 2.2795853).abs() < 1e-5);
        assert!((i0(5.0) - 27.239872).abs() / 27.239872 < 1e-4);
        assert!((i0e(10.0) - 0.12783334).abs() < 1e-5);
    }

    #[test]
    fn branch_continuity() {
        let below = i0e(3.75 - 1e-4);
        let above = i0e(3.75 + 1e-4);
        assert!((below - above).abs() / below < 1e-4);
    }

    #[test]
    fn scaled_matches_plain() {
        for &x in &[0.5, 1.0, 2.0, 3.0, 10.0, 30.0] {
            let rel = (i0e(x) - (-x).exp() * i0(x)).abs() / i0e(x);
            assert!(rel < 1e-4, "x: {}, rel: {}", x, rel);
        }
    }

    #[test]
    fn large_argument_asymptote() {
        // i0e(x) -> 1/sqrt(2*pi*x) as x -> inf
        let x = 1000.0_f32;
        let asymptote = 1.0 / (2.0 * std::f32::consts::PI * x).sqrt();
        assert!((i0e(x) - asymptote).abs() / asymptote < 1e-3);
    }

    #[test]
    fn scaled_form_stays_bounded() {
        // Aggressive offset/beam-radius ratios produce arguments this large
        for &x in &[100.0, 4800.0, 4.0e7] {
            let val = i0e(x);
            assert!(val.is_finite() && val > 0.0 && val <= 1.0, "x: {}", x);
        }
    }

    #[test]
    fn scaled_is_monotone_decreasing() {
        let mut prev = i0e(0.0);
        for i in 1..100 {
            let val = i0e(i as f32 * 0.5);
            assert!(val < prev);
            prev = val;
        }
    }
}

/// Small-argument polynomial, valid for 0 <= ax < 3.75.
fn i0_small(ax: f32) -> f32 {
    let t = ax / 3.75;
    let t2 = t * t;
    1.0 + t2
        * (3.5156229
            + t2 * (3.0899424
                + t2 * (1.2067492 + t2 * (0.2659732 + t2 * (0.0360768 + t2 * 0.0045813)))))
}

/// Exponentially scaled modified Bessel function, `exp(-|x|) * I0(x)`.
///
/// **Context**: The aperture overlap formula multiplies I0 by exponential
/// decay terms whose combined exponent is always non-positive. Evaluating
/// I0 on its own overflows long before the product does, so the scaled
/// form is evaluated instead and the caller folds the residual exponent
/// into its own decay term.
///
/// **How it Works**: Below the branch point the small-argument polynomial
/// is scaled by `exp(-ax)`; above it, the large-argument polynomial already
/// absorbs the exponential and only a `1/sqrt(ax)` factor remains. The
/// result lies in (0, 1] for every finite argument.
pub fn i0e(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 3.75 {
        (-ax).exp() * i0_small(ax)
    } else {
        let t = 3.75 / ax;
        let poly = 0.39894228
            + t * (0.01328592
                + t * (0.00225319
                    + t * (-0.00157565
                        + t * (0.00916281
                            + t * (-0.02057706
                                + t * (0.02635537 + t * (-0.01647633 + t * 0.00392377)))))));
        poly / ax.sqrt()
    }
}

/// Modified Bessel function of the first kind, order zero.
///
/// **Context**: Appears in the closed-form overlap integral of an offset
/// Gaussian beam over a circular aperture. Grows exponentially, so this
/// plain form overflows single precision for arguments beyond roughly 88;
/// use [`i0e`] whenever a decaying exponential multiplies the result.
///
/// **How it Works**: Uses the small-argument polynomial directly below the
/// branch point, and rescales the bounded form above it.
pub fn i0(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 3.75 {
        i0_small(ax)
    } else {
        ax.exp() * i0e(x)
    }
}
