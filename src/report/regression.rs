//! Ordinary least-squares fit of one variable against another, with the
//! correlation, two-sided p-value and standard errors reported alongside it.

use statrs::distribution::{ContinuousCDF, StudentsT};
use thiserror::Error;

// Keeps the t statistic finite when |r| == 1.
const TINY: f64 = 1.0e-20;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegressionError {
    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("Need at least 2 points for a linear fit, got {0}")]
    InsufficientData(usize),

    #[error("All {0} x values are identical, the slope is undefined")]
    ZeroVariance(usize),
}

/// Result of a simple linear regression `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient.
    pub r_value: f64,
    /// Two-sided p-value for the null hypothesis of zero slope (Student t, n - 2 df).
    pub p_value: f64,
    /// Standard error of the slope.
    pub std_err: f64,
    /// Standard error of the intercept.
    pub intercept_std_err: f64,
    /// Number of points the fit was computed over.
    pub n: usize,
}

impl LinearFit {
    /// Coefficient of determination.
    pub fn r_squared(&self) -> f64 {
        self.r_value * self.r_value
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn fitted(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|x| self.predict(*x)).collect()
    }

    /// The fitted line with both coefficients rounded to 2 decimals,
    /// e.g. `y = -0.47x + 31.20`.
    pub fn equation(&self) -> String {
        let slope = round_to_cents(self.slope);
        let intercept = round_to_cents(self.intercept);
        let sign = if intercept < 0.0 { '-' } else { '+' };
        format!("y = {:.2}x {} {:.2}", slope, sign, intercept.abs())
    }
}

// Adding 0.0 turns a rounded -0.0 into 0.0 so it never prints as "-0.00".
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

/// Fits `y` against `x` by ordinary least squares.
///
/// Follows the usual `linregress` conventions: when `y` is constant the
/// correlation is reported as `0`, and for exactly two points the standard
/// errors are `0` and the p-value is `0` (or `1` when both y values match).
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearFit, RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(RegressionError::InsufficientData(n));
    }

    let n_f = n as f64;
    let x_mean = x.iter().sum::<f64>() / n_f;
    let y_mean = y.iter().sum::<f64>() / n_f;

    // Population (biased) moments.
    let (mut ssxm, mut ssym, mut ssxym) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ssxm += dx * dx;
        ssym += dy * dy;
        ssxym += dx * dy;
    }
    ssxm /= n_f;
    ssym /= n_f;
    ssxym /= n_f;

    if ssxm == 0.0 {
        return Err(RegressionError::ZeroVariance(n));
    }

    let r_value = if ssym == 0.0 {
        0.0
    } else {
        (ssxym / (ssxm * ssym).sqrt()).clamp(-1.0, 1.0)
    };

    let slope = ssxym / ssxm;
    let intercept = y_mean - slope * x_mean;

    let (p_value, std_err, intercept_std_err) = if n == 2 {
        let p = if y[0] == y[1] { 1.0 } else { 0.0 };
        (p, 0.0, 0.0)
    } else {
        let df = (n - 2) as f64;
        let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
        let p = student_t_two_sided_p(t, df);
        let std_err = ((1.0 - r_value * r_value) * ssym / ssxm / df).sqrt();
        let intercept_std_err = std_err * (ssxm + x_mean * x_mean).sqrt();
        (p, std_err, intercept_std_err)
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_value,
        p_value,
        std_err,
        intercept_std_err,
        n,
    })
}

/// `P(|T| >= |t|)` for a Student t distribution with `df` degrees of freedom.
fn student_t_two_sided_p(t: f64, df: f64) -> f64 {
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        // Only reachable with df <= 0, which callers rule out.
        Err(_) => f64::NAN,
    }
}
