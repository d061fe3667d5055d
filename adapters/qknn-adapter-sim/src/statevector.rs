//! Statevector simulation engine.

use std::collections::BTreeMap;

use num_complex::Complex64;

use qknn_hal::{HalError, HalResult};
use qknn_ir::{ClbitId, Instruction, InstructionKind, QubitId, StandardGate};

/// Probability mass below which a register counts as being in |0...0⟩.
const ZERO_TOLERANCE: f64 = 1e-10;

/// A statevector representing a quantum state.
///
/// Basis index bit `q` holds the value of qubit `q`.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The state amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply a unitary or state-preparation instruction.
    ///
    /// Measurements and barriers leave the state untouched; the caller reads
    /// measured qubits from the final state.
    pub fn apply(&mut self, instruction: &Instruction) -> HalResult<()> {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.0 as usize).collect();
        match &instruction.kind {
            InstructionKind::Gate(gate) => self.apply_gate(*gate, &qubits),
            InstructionKind::Initialize { amplitudes } => self.initialize(&qubits, amplitudes)?,
            InstructionKind::Measure | InstructionKind::Barrier => {}
        }
        Ok(())
    }

    fn apply_gate(&mut self, gate: StandardGate, qubits: &[usize]) {
        match gate {
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            StandardGate::CSwap => self.apply_cswap(qubits[0], qubits[1], qubits[2]),
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        self.swap_where(0, q1, q2);
    }

    fn apply_cswap(&mut self, control: usize, t1: usize, t2: usize) {
        self.swap_where(1 << control, t1, t2);
    }

    /// Exchange qubits `t1` and `t2` on every basis state that has all bits
    /// of `condition` set.
    fn swap_where(&mut self, condition: usize, t1: usize, t2: usize) {
        let t1_mask = 1 << t1;
        let t2_mask = 1 << t2;
        for i in 0..self.amplitudes.len() {
            if i & condition == condition && (i & t1_mask != 0) && (i & t2_mask == 0) {
                let j = (i & !t1_mask) | t2_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Prepare `qubits` (currently |0...0⟩) in the state `target`.
    ///
    /// Bit `k` of a target index addresses `qubits[k]`.
    fn initialize(&mut self, qubits: &[usize], target: &[Complex64]) -> HalResult<()> {
        let mask = qubits.iter().fold(0usize, |m, q| m | (1 << q));

        let stray: f64 = self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();
        if stray > ZERO_TOLERANCE {
            return Err(HalError::Unsupported(
                "initialize on a register that is not in |0...0⟩".into(),
            ));
        }

        // Basis offset contributed by each target index.
        let offsets: Vec<usize> = (0..target.len())
            .map(|j| {
                qubits
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| (j >> k) & 1 == 1)
                    .fold(0usize, |acc, (_, q)| acc | (1 << q))
            })
            .collect();

        let mut next = vec![Complex64::new(0.0, 0.0); self.amplitudes.len()];
        for (i, &amp) in self.amplitudes.iter().enumerate() {
            if i & mask != 0 || amp.norm_sqr() == 0.0 {
                continue;
            }
            for (offset, &t) in offsets.iter().zip(target) {
                next[i | offset] = amp * t;
            }
        }
        self.amplitudes = next;
        Ok(())
    }

    /// Outcome distribution of the measured classical bits.
    ///
    /// `measured` pairs each measured qubit with its classical bit. Bitstrings
    /// have `num_clbits` characters, clbit 0 first; unmeasured clbits read 0.
    pub fn marginal_probabilities(
        &self,
        measured: &[(QubitId, ClbitId)],
        num_clbits: usize,
    ) -> BTreeMap<String, f64> {
        let mut probs = BTreeMap::new();
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let p = amp.norm_sqr();
            if p == 0.0 {
                continue;
            }
            let mut bits = vec![b'0'; num_clbits];
            for (q, c) in measured {
                if (i >> q.0) & 1 == 1 {
                    bits[c.0 as usize] = b'1';
                }
            }
            let key = String::from_utf8_lossy(&bits).into_owned();
            *probs.entry(key).or_insert(0.0) += p;
        }
        probs
    }
}
