//! Circuits command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use qknn_core::QknnConfig;
use qknn_ir::Circuit;

use super::common::{
    ExperimentArgs, OutputFormat, fit_model, load_dataset, print_header, print_json,
    source_name, spinner,
};

/// Structure and contrasts of one swap-test circuit.
#[derive(Debug, Serialize)]
pub struct CircuitSummary {
    name: String,
    num_qubits: usize,
    num_clbits: usize,
    depth: usize,
    ops: BTreeMap<&'static str, usize>,
    contrasts: Vec<f64>,
}

impl CircuitSummary {
    fn new(circuit: &Circuit, contrasts: Vec<f64>) -> Self {
        Self {
            name: circuit.name().to_string(),
            num_qubits: circuit.num_qubits(),
            num_clbits: circuit.num_clbits(),
            depth: circuit.depth(),
            ops: circuit.count_ops(),
            contrasts,
        }
    }
}

/// Execute the circuits command.
pub fn execute(config: QknnConfig, args: &ExperimentArgs, format: OutputFormat) -> Result<()> {
    let config = args.apply(config)?;
    let table = format == OutputFormat::Table;

    if table {
        print_header(&config, &source_name(&config, args.synthetic));
    }

    let dataset = load_dataset(&config, args.synthetic)?;
    let qknn = fit_model(&config, &dataset)?;
    let circuits = qknn.get_circuits().context("Failed to build circuits")?;

    let progress = table.then(|| spinner(format!("Executing {} circuits...", circuits.len())));
    let contrasts = qknn
        .get_contrasts(&circuits)
        .context("Failed to compute contrasts")?;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    let summaries: Vec<CircuitSummary> = circuits
        .iter()
        .zip(contrasts)
        .map(|(circuit, c)| CircuitSummary::new(circuit, c))
        .collect();

    match format {
        OutputFormat::Table => print_table(&summaries),
        OutputFormat::Json => print_json(&summaries)?,
    }
    Ok(())
}

fn print_table(summaries: &[CircuitSummary]) {
    for summary in summaries {
        println!(
            "\n{} {} ({} qubits, {} clbits, depth {})",
            style("■").cyan(),
            style(&summary.name).bold(),
            summary.num_qubits,
            summary.num_clbits,
            summary.depth
        );
        let ops: Vec<String> = summary
            .ops
            .iter()
            .map(|(name, count)| format!("{name}: {count}"))
            .collect();
        println!("  Ops: {}", ops.join(", "));

        let contrasts: Vec<String> = summary
            .contrasts
            .iter()
            .map(|c| format!("{c:>6.3}"))
            .collect();
        println!("  Contrasts: {}", contrasts.join(" "));
    }
}
