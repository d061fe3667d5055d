//! Swap-test circuits, contrasts and the neighbour vote.
//!
//! Each test state gets one circuit over four registers:
//!
//! | Register | Size | Holds |
//! |----------|------|-------|
//! | `control_qubit` | 1 | swap-test ancilla |
//! | `state_to_classify_reg` | n | the test state |
//! | `train_states_reg` | n | training states, entangled with their index |
//! | `comp_basis_reg` | m | training index |
//!
//! Classical bits are `meas_control` (clbit 0) followed by `meas_comp_basis`,
//! so outcome `"1" + "01"` reads control 1 at training index 2.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use ndarray::{ArrayView1, ArrayView2};

use qknn_hal::ExecutionResult;
use qknn_ir::Circuit;

use crate::dataset::Label;
use crate::encoding;
use crate::error::{QknnError, QknnResult};

/// Width of the index register for `n_train` training states.
pub fn index_register_size(n_train: usize) -> u32 {
    (n_train.max(2) - 1).ilog2() + 1
}

/// Amplitudes of `(1/sqrt(M)) * sum_i |i>|phi_i>` over
/// `train_states_reg (x) comp_basis_reg`, train register in the low bits.
///
/// Indices without a training state keep zero amplitude.
pub fn oracle_amplitudes(train: ArrayView2<'_, f64>) -> Vec<f64> {
    let (n_train, width) = train.dim();
    let index_size = 1usize << index_register_size(n_train);
    let scale = (n_train as f64).sqrt().recip();

    let mut amplitudes = vec![0.0; width * index_size];
    for (i, state) in train.rows().into_iter().enumerate() {
        for (a, &value) in state.iter().enumerate() {
            amplitudes[i * width + a] = scale * value;
        }
    }
    amplitudes
}

/// Build the swap-test circuit comparing `state` with every row of `train`.
pub fn construct_circuit(
    name: impl Into<String>,
    state: ArrayView1<'_, f64>,
    train: ArrayView2<'_, f64>,
) -> QknnResult<Circuit> {
    let width = train.ncols();
    if state.len() != width {
        return Err(QknnError::DimensionMismatch {
            expected: width,
            got: state.len(),
        });
    }
    let n = encoding::num_qubits(width);
    let m = index_register_size(train.nrows());

    let mut circuit = Circuit::new(name);
    let control = circuit.add_qreg("control_qubit", 1);
    let to_classify = circuit.add_qreg("state_to_classify_reg", n);
    let train_states = circuit.add_qreg("train_states_reg", n);
    let comp_basis = circuit.add_qreg("comp_basis_reg", m);
    let meas_control = circuit.add_creg("meas_control", 1);
    let meas_comp_basis = circuit.add_creg("meas_comp_basis", m);

    let state: Vec<f64> = state.to_vec();
    circuit.initialize_real(&state, to_classify.iter().copied())?;
    circuit.initialize_real(
        &oracle_amplitudes(train),
        train_states.iter().chain(&comp_basis).copied(),
    )?;
    circuit.barrier_all()?;

    circuit.h(control[0])?;
    for (a, b) in to_classify.iter().zip(&train_states) {
        circuit.cswap(control[0], *a, *b)?;
    }
    circuit.h(control[0])?;
    circuit.barrier_all()?;

    circuit.measure(control[0], meas_control[0])?;
    circuit.measure_register(comp_basis, meas_comp_basis)?;
    Ok(circuit)
}

/// Contrast per training index from one circuit's result.
///
/// `(n0 - n1) / (n0 + n1)` over the outcomes at each index, or 0 when an
/// index never occurred. Exact probabilities are used when present.
pub fn contrasts(result: &ExecutionResult, n_train: usize) -> QknnResult<Vec<f64>> {
    let m = index_register_size(n_train) as usize;
    let mut zeros = vec![0.0; n_train];
    let mut ones = vec![0.0; n_train];

    for (bits, weight) in result.weights() {
        let bytes = bits.as_bytes();
        if bytes.len() != m + 1 || !bytes.iter().all(|b| matches!(b, b'0' | b'1')) {
            return Err(QknnError::MalformedResult(format!(
                "outcome '{bits}' does not match {} measured bits",
                m + 1
            )));
        }
        let index = bytes[1..]
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'1')
            .fold(0usize, |acc, (k, _)| acc | (1 << k));
        if index >= n_train {
            continue;
        }
        if bytes[0] == b'0' {
            zeros[index] += weight;
        } else {
            ones[index] += weight;
        }
    }

    Ok(zeros
        .iter()
        .zip(&ones)
        .map(|(n0, n1)| {
            let total = n0 + n1;
            if total == 0.0 { 0.0 } else { (n0 - n1) / total }
        })
        .collect())
}

/// Label of the `k` training states with the highest contrast.
///
/// Ties in contrast favour the lower training index; ties in votes favour
/// the smaller label. Returns `None` when no training state is eligible.
pub fn majority_vote(contrasts: &[f64], labels: &[Label], k: usize) -> Option<Label> {
    let mut order: Vec<usize> = (0..contrasts.len().min(labels.len())).collect();
    order.sort_by(|&a, &b| {
        contrasts[b]
            .partial_cmp(&contrasts[a])
            .unwrap_or(Ordering::Equal)
    });

    let mut votes: BTreeMap<Label, usize> = BTreeMap::new();
    for &i in order.iter().take(k) {
        *votes.entry(labels[i]).or_insert(0) += 1;
    }

    votes
        .into_iter()
        .fold(None, |best: Option<(Label, usize)>, (label, count)| match best {
            Some((_, top)) if top >= count => best,
            _ => Some((label, count)),
        })
        .map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use qknn_hal::Counts;

    #[test]
    fn test_index_register_size() {
        assert_eq!(index_register_size(1), 1);
        assert_eq!(index_register_size(2), 1);
        assert_eq!(index_register_size(3), 2);
        assert_eq!(index_register_size(4), 2);
        assert_eq!(index_register_size(5), 3);
        assert_eq!(index_register_size(8), 3);
        assert_eq!(index_register_size(9), 4);
    }

    #[test]
    fn test_oracle_layout() {
        let train = array![[1.0, 0.0], [0.0, 1.0], [0.6, 0.8]];
        let amps = oracle_amplitudes(train.view());
        assert_eq!(amps.len(), 8);

        let s = 3f64.sqrt().recip();
        assert!((amps[0] - s).abs() < 1e-12);
        assert!((amps[3] - s).abs() < 1e-12);
        assert!((amps[4] - 0.6 * s).abs() < 1e-12);
        assert!((amps[5] - 0.8 * s).abs() < 1e-12);
        assert_eq!(&amps[6..], &[0.0, 0.0]);

        let norm: f64 = amps.iter().map(|a| a * a).sum();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_circuit_layout() {
        let train = array![
            [0.5, 0.5, 0.5, 0.5],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0]
        ];
        let state = array![0.0, 0.0, 1.0, 0.0];
        let circuit = construct_circuit("qknn_0", state.view(), train.view()).unwrap();

        // 1 control + 2 + 2 + 2 index qubits.
        assert_eq!(circuit.num_qubits(), 7);
        assert_eq!(circuit.num_clbits(), 3);
        let ops = circuit.count_ops();
        assert_eq!(ops["cswap"], 2);
        assert_eq!(ops["h"], 2);
        assert_eq!(ops["initialize"], 2);
        assert_eq!(ops["measure"], 2);
    }

    #[test]
    fn test_circuit_dimension_mismatch() {
        let train = array![[1.0, 0.0]];
        let state = array![1.0, 0.0, 0.0, 0.0];
        let err = construct_circuit("c", state.view(), train.view()).unwrap_err();
        assert!(matches!(
            err,
            QknnError::DimensionMismatch {
                expected: 2,
                got: 4
            }
        ));
    }

    #[test]
    fn test_contrasts_from_counts() {
        // m = 2 for three training states; "1" + "10" is control 1, index 1.
        let counts: Counts = [
            ("000".to_string(), 30),
            ("100".to_string(), 10),
            ("010".to_string(), 20),
            ("110".to_string(), 20),
        ]
        .into_iter()
        .collect();
        let result = ExecutionResult::new(counts, 80);

        let c = contrasts(&result, 3).unwrap();
        assert_eq!(c.len(), 3);
        assert!((c[0] - 0.5).abs() < 1e-12);
        assert!(c[1].abs() < 1e-12);
        assert_eq!(c[2], 0.0);
    }

    #[test]
    fn test_contrasts_reject_malformed() {
        let counts: Counts = [("01".to_string(), 5)].into_iter().collect();
        let result = ExecutionResult::new(counts, 5);
        assert!(matches!(
            contrasts(&result, 3),
            Err(QknnError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_majority_vote() {
        let labels = [0, 1, 1, 0];
        assert_eq!(majority_vote(&[0.9, 0.8, 0.7, 0.1], &labels, 3), Some(1));
        assert_eq!(majority_vote(&[0.9, 0.1, 0.2, 0.8], &labels, 1), Some(0));
    }

    #[test]
    fn test_majority_vote_ties() {
        // Equal contrasts keep index order: indices 0 and 1 are chosen.
        assert_eq!(majority_vote(&[0.5, 0.5, 0.5], &[1, 0, 1], 2), Some(0));
        // Two labels with one vote each: smallest label wins.
        assert_eq!(majority_vote(&[0.9, 0.8], &[1, 0], 2), Some(0));
        assert_eq!(majority_vote(&[], &[], 3), None);
    }
}
