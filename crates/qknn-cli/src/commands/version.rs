//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum k-nearest-neighbours classification",
        style("qknn").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qknn-ir           Circuit intermediate representation");
    println!("  qknn-hal          Backend abstraction layer");
    println!("  qknn-adapter-sim  Local statevector simulators");
    println!("  qknn-core         Datasets, encoding and the QkNN classifier");
    println!("  qknn-cli          Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
