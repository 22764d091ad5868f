use beamlink::settings::{self};
use beamlink::{budget, envelope, output};

fn main() {
    let settings = settings::load_config().unwrap();
    let budget = budget::evaluate(&settings).unwrap();

    println!("{}", budget);

    let envelope = envelope::trace(&settings);
    output::writeup(&budget).unwrap();
    output::write_json(&budget, &envelope).unwrap();
}
