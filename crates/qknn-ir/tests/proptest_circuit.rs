//! Property tests for circuit bookkeeping.

use proptest::prelude::*;
use qknn_ir::{Circuit, QubitId};

/// A random gate on a circuit of `width` qubits: (kind, q0, q1, q2).
fn gate_strategy(width: u32) -> impl Strategy<Value = (u8, u32, u32, u32)> {
    (0u8..4, 0..width, 0..width, 0..width)
}

fn build(width: u32, gates: &[(u8, u32, u32, u32)]) -> Circuit {
    let mut circuit = Circuit::with_size("prop", width, 0);
    for &(kind, a, b, c) in gates {
        // Invalid operand combinations are rejected by the builder; skip them.
        let _ = match kind {
            0 => circuit.h(QubitId(a)).map(|_| ()),
            1 => circuit.x(QubitId(a)).map(|_| ()),
            2 => circuit.cx(QubitId(a), QubitId(b)).map(|_| ()),
            _ => circuit.cswap(QubitId(a), QubitId(b), QubitId(c)).map(|_| ()),
        };
    }
    circuit
}

proptest! {
    #[test]
    fn depth_never_exceeds_op_count(gates in prop::collection::vec(gate_strategy(4), 0..40)) {
        let circuit = build(4, &gates);
        prop_assert!(circuit.depth() <= circuit.num_ops());
    }

    #[test]
    fn op_counts_sum_to_num_ops(gates in prop::collection::vec(gate_strategy(5), 0..40)) {
        let circuit = build(5, &gates);
        let total: usize = circuit.count_ops().values().sum();
        prop_assert_eq!(total, circuit.num_ops());
    }

    #[test]
    fn rejected_instructions_leave_circuit_unchanged(a in 0u32..3) {
        let mut circuit = Circuit::with_size("prop", 3, 0);
        circuit.h(QubitId(a)).unwrap();
        let before = circuit.instructions().len();
        prop_assert!(circuit.cx(QubitId(a), QubitId(a)).is_err());
        prop_assert_eq!(circuit.instructions().len(), before);
    }
}
