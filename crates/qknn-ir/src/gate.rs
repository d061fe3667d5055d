//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Fixed (parameter-free) gates used by the swap-test circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    /// Pauli-X gate.
    X,
    /// Hadamard gate.
    H,
    /// Controlled-X (CNOT) gate.
    CX,
    /// SWAP gate.
    Swap,
    /// Fredkin gate (controlled SWAP).
    CSwap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::H => "h",
            StandardGate::CX => "cx",
            StandardGate::Swap => "swap",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::X | StandardGate::H => 1,
            StandardGate::CX | StandardGate::Swap => 2,
            StandardGate::CSwap => 3,
        }
    }
}
