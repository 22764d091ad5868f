use std::io::Write;
use std::{fs::File, io::BufWriter};

use anyhow::Result;
use serde_json::json;

use crate::budget::Budget;
use crate::envelope::BeamEnvelope;


/// Write the stage powers to a file against the stage labels
pub fn writeup(budget: &Budget) -> Result<()> {
    let file = File::create("power_stages")?;
    let mut writer = BufWriter::new(file);

    for entry in &budget.stages {
        writeln!(writer, "{}\t{}", entry.stage.label(), entry.power)?;
    }
    writeln!(writer, "Wall-plug draw\t{}", budget.required_driver_input)?;
    writeln!(writer, "Total efficiency\t{}", budget.total_efficiency())?;

    Ok(())
}

/// Budget in the shape the presentation layer charts: parallel label and
/// power arrays in emission order, plus the headline metrics.
pub fn budget_json(budget: &Budget) -> serde_json::Value {
    json!({
        "labels": budget.labels(),
        "powers": budget.powers(),
        "final_output": budget.final_output(),
        "total_efficiency": budget.total_efficiency(),
    })
}

/// Envelope samples for the beam-propagation view.
pub fn envelope_json(envelope: &BeamEnvelope) -> serde_json::Value {
    json!({
        "z": envelope.z.to_vec(),
        "centerline": envelope.centerline.to_vec(),
        "upper": envelope.upper.to_vec(),
        "lower": envelope.lower.to_vec(),
        "receiver": envelope.receiver,
    })
}

/// Write the full evaluation to `link_budget.json` for the presentation
/// layer.
pub fn write_json(budget: &Budget, envelope: &BeamEnvelope) -> Result<()> {
    let file = File::create("link_budget.json")?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(
        writer,
        &json!({
            "budget": budget_json(budget),
            "envelope": envelope_json(envelope),
        }),
    )?;

    Ok(())
}
