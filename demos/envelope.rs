use beamlink::{envelope, helpers, settings};
use macroquad::prelude::*;

#[macroquad::main("BEAMLINK - Beam Envelope")]
async fn main() {
    let settings = settings::load_default_config().unwrap();
    let envelope = envelope::trace(&settings);

    loop {
        clear_background(BLACK);
        helpers::draw_envelope(&envelope);
        next_frame().await
    }
}
