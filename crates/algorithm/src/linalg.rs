//! Dense solvers for readout training

use crate::{Result, TsError};
use ndarray::{Array1, Array2};

/// Attempts made by [`ridge`] before giving up on an ill-conditioned system.
const MAX_JITTER_ATTEMPTS: usize = 6;

/// Solve `a * x = b` for a symmetric positive definite `a` (Cholesky).
pub(crate) fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n {
        return Err(TsError::NumericalError(format!(
            "Cannot solve {}x{} system with right-hand side of length {}",
            a.nrows(),
            a.ncols(),
            b.len()
        )));
    }

    let mut l = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let mut diag = a[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if diag <= 0.0 || !diag.is_finite() {
            return Err(TsError::NumericalError(
                "Matrix is not positive definite".to_string(),
            ));
        }
        let d = diag.sqrt();
        l[[j, j]] = d;
        for i in (j + 1)..n {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = sum / d;
        }
    }

    // L y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * y[k];
        }
        y[i] = sum / l[[i, i]];
    }

    // L^T x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]] * x[k];
        }
        x[i] = sum / l[[i, i]];
    }

    Ok(x)
}

/// Ridge-regularized least squares: minimizes `|X w - y|^2 + lambda |w|^2`.
///
/// Works in the dual (rows x rows) space when there are fewer samples than
/// features, which is the usual shape of a reservoir readout. The penalty is
/// scaled by the mean diagonal of the Gram matrix and grown tenfold whenever
/// the factorization breaks down.
pub(crate) fn ridge(x: &Array2<f64>, y: &Array1<f64>, lambda: f64) -> Result<Array1<f64>> {
    let (rows, cols) = x.dim();
    if rows != y.len() {
        return Err(TsError::NumericalError(format!(
            "Design matrix has {} rows but target has {} values",
            rows,
            y.len()
        )));
    }

    let dual = rows <= cols;
    let gram = if dual { x.dot(&x.t()) } else { x.t().dot(x) };
    let rhs = if dual { y.clone() } else { x.t().dot(y) };

    let size = gram.nrows();
    let scale = (gram.diag().sum() / size.max(1) as f64).max(1.0);
    let mut penalty = lambda * scale;

    for _ in 0..MAX_JITTER_ATTEMPTS {
        let mut system = gram.clone();
        for i in 0..size {
            system[[i, i]] += penalty;
        }
        match cholesky_solve(&system, &rhs) {
            Ok(solution) if dual => return Ok(x.t().dot(&solution)),
            Ok(solution) => return Ok(solution),
            Err(_) => penalty *= 10.0,
        }
    }

    Err(TsError::ConvergenceFailure {
        iterations: MAX_JITTER_ATTEMPTS,
    })
}
