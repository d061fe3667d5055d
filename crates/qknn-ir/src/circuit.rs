//! High-level circuit builder API.

use std::collections::BTreeMap;
use std::fmt;

use num_complex::Complex64;

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// Tolerance on the squared norm of an initialization vector.
const NORM_TOLERANCE: f64 = 1e-8;

/// A quantum circuit.
///
/// Instructions are kept in program order; every instruction is validated
/// against the circuit's bits when it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit.
    clbits: Vec<Clbit>,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            instructions: vec![],
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    fn next_qubit_id(&self) -> QubitId {
        QubitId(self.qubits.len() as u32)
    }

    fn next_clbit_id(&self) -> ClbitId {
        ClbitId(self.clbits.len() as u32)
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = self.next_qubit_id();
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        (0..size)
            .map(|i| {
                let id = self.next_qubit_id();
                self.qubits.push(Qubit::with_register(id, &name, i));
                id
            })
            .collect()
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = self.next_clbit_id();
        self.clbits.push(Clbit::new(id));
        id
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        (0..size)
            .map(|i| {
                let id = self.next_clbit_id();
                self.clbits.push(Clbit::with_register(id, &name, i));
                id
            })
            .collect()
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::H, [qubit]))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::X, [qubit]))
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CX, [control, target]))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::Swap, [q1, q2]))
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CSwap, [control, t1, t2]))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Prepare `qubits` in the state given by complex amplitudes.
    pub fn initialize(
        &mut self,
        amplitudes: impl IntoIterator<Item = Complex64>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::initialize(amplitudes, qubits))
    }

    /// Prepare `qubits` in the state given by real amplitudes.
    pub fn initialize_real(
        &mut self,
        amplitudes: &[f64],
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.initialize(
            amplitudes.iter().map(|&a| Complex64::new(a, 0.0)),
            qubits,
        )
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure([qubit], [clbit]))
    }

    /// Measure each qubit into the classical bit at the same position.
    pub fn measure_register(
        &mut self,
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubits, clbits))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.apply(Instruction::barrier(qubits))
    }

    /// Validate an instruction and append it.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let op_name = || Some(instruction.name().to_string());

        for (pos, qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 as usize >= self.qubits.len() {
                return Err(IrError::QubitNotFound {
                    qubit: *qubit,
                    op_name: op_name(),
                });
            }
            if instruction.qubits[..pos].contains(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit: *qubit,
                    op_name: op_name(),
                });
            }
        }
        for clbit in &instruction.clbits {
            if clbit.0 as usize >= self.clbits.len() {
                return Err(IrError::ClbitNotFound {
                    clbit: *clbit,
                    op_name: op_name(),
                });
            }
        }

        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let got = instruction.qubits.len() as u32;
                if got != gate.num_qubits() {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected: gate.num_qubits(),
                        got,
                    });
                }
            }
            InstructionKind::Initialize { amplitudes } => {
                let num_qubits = instruction.qubits.len();
                let expected = 1usize << num_qubits;
                if amplitudes.len() != expected {
                    return Err(IrError::AmplitudeCount {
                        num_qubits,
                        expected,
                        got: amplitudes.len(),
                    });
                }
                let norm_sq: f64 = amplitudes.iter().map(Complex64::norm_sqr).sum();
                if (norm_sq - 1.0).abs() > NORM_TOLERANCE {
                    return Err(IrError::NotNormalized(norm_sq));
                }
            }
            InstructionKind::Measure => {
                if instruction.qubits.len() != instruction.clbits.len() {
                    return Err(IrError::MeasureArity {
                        qubits: instruction.qubits.len(),
                        clbits: instruction.clbits.len(),
                    });
                }
            }
            InstructionKind::Barrier => {}
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of operations, barriers excluded.
    pub fn num_ops(&self) -> usize {
        self.instructions.iter().filter(|i| !i.is_barrier()).count()
    }

    /// Operation counts keyed by instruction name, barriers excluded.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for inst in self.instructions.iter().filter(|i| !i.is_barrier()) {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Get the circuit depth.
    ///
    /// Each non-barrier instruction occupies one layer on all of its qubit and
    /// classical-bit wires. Barriers align their wires without adding a layer.
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.qubits.len()];
        let mut clbit_level = vec![0usize; self.clbits.len()];

        for inst in &self.instructions {
            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_level[q.0 as usize])
                .chain(inst.clbits.iter().map(|c| clbit_level[c.0 as usize]))
                .max()
                .unwrap_or(0);
            let level = if inst.is_barrier() { start } else { start + 1 };
            for q in &inst.qubits {
                qubit_level[q.0 as usize] = level;
            }
            for c in &inst.clbits {
                clbit_level[c.0 as usize] = level;
            }
        }

        qubit_level
            .into_iter()
            .chain(clbit_level)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "circuit {} ({} qubits, {} clbits)",
            self.name,
            self.qubits.len(),
            self.clbits.len()
        )?;
        for inst in &self.instructions {
            let qubits: Vec<String> = inst
                .qubits
                .iter()
                .map(|q| self.qubits[q.0 as usize].to_string())
                .collect();
            match &inst.kind {
                InstructionKind::Initialize { amplitudes } => {
                    write!(f, "  initialize[{}] {}", amplitudes.len(), qubits.join(", "))?;
                }
                InstructionKind::Measure => {
                    let clbits: Vec<String> = inst
                        .clbits
                        .iter()
                        .map(|c| self.clbits[c.0 as usize].to_string())
                        .collect();
                    write!(
                        f,
                        "  measure {} -> {}",
                        qubits.join(", "),
                        clbits.join(", ")
                    )?;
                }
                _ => write!(f, "  {} {}", inst.name(), qubits.join(", "))?,
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
