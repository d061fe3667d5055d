//! Run command implementation.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use qknn_core::{Evaluation, QknnConfig};

use super::common::{
    ExperimentArgs, OutputFormat, fit_model, format_labels, load_dataset, print_header,
    print_json, source_name, spinner,
};

#[derive(Serialize)]
struct RunReport<'a> {
    backend: &'a str,
    shots: u32,
    n_neighbors: usize,
    #[serde(flatten)]
    evaluation: &'a Evaluation,
}

/// Execute the run command.
pub fn execute(config: QknnConfig, args: &ExperimentArgs, format: OutputFormat) -> Result<()> {
    let config = args.apply(config)?;
    let table = format == OutputFormat::Table;

    if table {
        print_header(&config, &source_name(&config, args.synthetic));
    }

    let dataset = load_dataset(&config, args.synthetic)?;
    if table {
        println!(
            "  Loaded: {} samples, {} features",
            dataset.len(),
            dataset.n_features()
        );
    }

    let qknn = fit_model(&config, &dataset)?;

    let progress = table.then(|| {
        spinner(format!(
            "Classifying {} test samples...",
            config.encoding.n_test_points
        ))
    });
    let evaluation = qknn.evaluate().context("Classification failed")?;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    match format {
        OutputFormat::Table => {
            println!("{}", evaluation.summary());
            println!(
                "  {} {}",
                style("labels:     ").dim(),
                format_labels(&evaluation.test_labels)
            );
            println!(
                "  {} {}",
                style("predictions:").dim(),
                format_labels(&evaluation.predictions)
            );
        }
        OutputFormat::Json => print_json(&RunReport {
            backend: &config.backend.name,
            shots: config.backend.shots,
            n_neighbors: config.model.n_neighbors,
            evaluation: &evaluation,
        })?,
    }

    Ok(())
}
