//! Backends command implementation.

use anyhow::Result;
use console::style;

use qknn_adapter_sim::default_registry;
use qknn_hal::BackendConfig;

/// Execute the backends command.
pub fn execute() -> Result<()> {
    println!("{} Available backends:\n", style("qknn").cyan().bold());

    let registry = default_registry();
    for name in registry.names() {
        let backend = registry.create(BackendConfig::new(name))?;
        let caps = backend.capabilities();

        println!(
            "  {} {} {}",
            style("●").green(),
            style(name).bold(),
            if caps.is_simulator { "(local)" } else { "" }
        );
        println!("    Qubits: {}", caps.num_qubits);
        println!("    Max shots: {}", caps.max_shots);
        println!("    Gates: {}", caps.gate_set.join(", "));
        println!("    Features: {}", caps.features.join(", "));
        println!();
    }

    Ok(())
}
