//! Drawing utilities for the interactive beam-envelope view.
//!
//! This module maps envelope samples to screen coordinates and renders
//! them with the graphics library: the beam envelope as polylines around
//! the drifting centerline, and the receiver cross-section closing off the
//! link at the receiver plane. It exists for interactive inspection only;
//! nothing in the core depends on it.

use macroquad::prelude::*;
use ndarray::Array1;

use crate::envelope::BeamEnvelope;

const SCALE: f32 = 100.0; // modify this depending on window size
const OFFSET_X: f32 = 60.0;
const OFFSET_Y: f32 = 300.0;

/// Renders the beam envelope and the receiver outline.
///
/// **How it Works**: Draws the upper and lower envelope and the beam
/// centerline as polylines, then closes the receiver outline on itself.
/// All coordinates pass through the same screen mapping.
pub fn draw_envelope(envelope: &BeamEnvelope) {
    draw_polyline(&envelope.z, &envelope.upper, BLUE);
    draw_polyline(&envelope.z, &envelope.lower, BLUE);
    draw_polyline(&envelope.z, &envelope.centerline, GRAY);

    // Receiver cross-section, closed on itself
    for i in 0..envelope.receiver.len() {
        let (x1, y1) = to_screen(envelope.receiver[i]);
        let (x2, y2) = to_screen(envelope.receiver[(i + 1) % envelope.receiver.len()]);
        draw_line(x1, y1, x2, y2, 2.0, GREEN);
    }
}

/// Draws line segments between consecutive samples.
fn draw_polyline(x: &Array1<f32>, y: &Array1<f32>, color: Color) {
    for i in 1..x.len() {
        let (x1, y1) = to_screen((x[i - 1], y[i - 1]));
        let (x2, y2) = to_screen((x[i], y[i]));
        draw_line(x1, y1, x2, y2, 2.0, color);
    }
}

/// Converts link coordinates (z along the beam, height above axis) to
/// screen pixels. The vertical axis flips because screen y grows
/// downward.
fn to_screen((x, y): (f32, f32)) -> (f32, f32) {
    (x * SCALE + OFFSET_X, -y * SCALE + OFFSET_Y)
}
