//! Amplitude encoding of classical feature vectors.
//!
//! A row of length `2^n` divided by its L2 norm is the amplitude vector of
//! an `n`-qubit state.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{QknnError, QknnResult};

/// Norm tolerance for treating a row as already encoded.
pub const NORM_TOLERANCE: f64 = 1e-8;

/// Normalise every row of `data` to unit L2 norm.
pub fn encode(data: ArrayView2<'_, f64>) -> QknnResult<Array2<f64>> {
    let (rows, width) = data.dim();
    if rows == 0 || width == 0 {
        return Err(QknnError::Encoding("cannot encode an empty matrix".into()));
    }
    if !width.is_power_of_two() {
        return Err(QknnError::Encoding(format!(
            "row width {width} is not a power of two"
        )));
    }

    let mut encoded = data.to_owned();
    for (i, mut row) in encoded.axis_iter_mut(Axis(0)).enumerate() {
        let norm = l2_norm(row.view());
        if norm == 0.0 || !norm.is_finite() {
            return Err(QknnError::Encoding(format!(
                "row {i} has norm {norm} and cannot be normalised"
            )));
        }
        row.mapv_inplace(|v| v / norm);
    }
    Ok(encoded)
}

/// Number of qubits holding a row of `width` amplitudes.
pub fn num_qubits(width: usize) -> u32 {
    width.trailing_zeros()
}

/// Whether a row has unit norm.
pub fn is_normalized(row: ArrayView1<'_, f64>) -> bool {
    (l2_norm(row) - 1.0).abs() < NORM_TOLERANCE
}

fn l2_norm(row: ArrayView1<'_, f64>) -> f64 {
    row.dot(&row).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rows_become_unit_vectors() {
        let data = array![[3.0, 4.0], [1.0, 1.0]];
        let encoded = encode(data.view()).unwrap();

        assert!((encoded[[0, 0]] - 0.6).abs() < 1e-12);
        assert!((encoded[[0, 1]] - 0.8).abs() < 1e-12);
        for row in encoded.rows() {
            assert!(is_normalized(row));
        }
    }

    #[test]
    fn test_width_must_be_power_of_two() {
        let data = array![[1.0, 2.0, 3.0]];
        assert!(matches!(encode(data.view()), Err(QknnError::Encoding(_))));
    }

    #[test]
    fn test_zero_row_rejected() {
        let data = array![[1.0, 0.0], [0.0, 0.0]];
        let err = encode(data.view()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_empty_rejected() {
        let data = Array2::<f64>::zeros((0, 4));
        assert!(encode(data.view()).is_err());
    }

    #[test]
    fn test_num_qubits() {
        assert_eq!(num_qubits(1), 0);
        assert_eq!(num_qubits(4), 2);
        assert_eq!(num_qubits(8), 3);
    }
}
