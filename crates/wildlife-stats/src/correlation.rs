//! Pearson correlation between equally sized columns.

use serde::Serialize;

/// Pearson correlation coefficient of two paired samples.
///
/// Returns `NaN` when the samples differ in length, hold fewer than two
/// pairs, or either sample is constant.
///
/// # Examples
///
/// ```
/// # use wildlife_stats::correlation::pearson;
/// let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
/// assert!((r - 1.0).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return f64::NAN;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Symmetric matrix of pairwise Pearson coefficients between named columns.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major coefficients, `labels.len()` rows of `labels.len()` values.
    pub coefficients: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Builds the matrix from `(label, column)` pairs.
    ///
    /// The diagonal is 1.0 for any non-constant column and `NaN` otherwise.
    #[must_use]
    pub fn from_columns<S>(columns: &[(S, Vec<f64>)]) -> Self
    where
        S: AsRef<str>,
    {
        let labels = columns
            .iter()
            .map(|(label, _)| label.as_ref().to_owned())
            .collect();
        let coefficients = columns
            .iter()
            .map(|(_, xs)| columns.iter().map(|(_, ys)| pearson(xs, ys)).collect())
            .collect();
        Self {
            labels,
            coefficients,
        }
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.coefficients.get(row)?.get(col).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_negative() {
        let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[8.0, 6.0, 4.0, 2.0]);
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_is_nan() {
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[1.0], &[1.0]).is_nan());
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let columns = vec![
            ("a", vec![1.0, 2.0, 3.0, 5.0]),
            ("b", vec![2.0, 1.0, 4.0, 3.0]),
            ("c", vec![9.0, 7.0, 4.0, 1.0]),
        ];
        let matrix = CorrelationMatrix::from_columns(&columns);
        assert_eq!(matrix.labels, vec!["a", "b", "c"]);
        for i in 0..3 {
            assert!((matrix.get(i, i).unwrap() - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert_eq!(
                    matrix.get(i, j).unwrap().to_bits(),
                    matrix.get(j, i).unwrap().to_bits()
                );
            }
        }
    }
}
