//! Descriptive statistics and distribution helpers shared by the engine.
//!
//! Everything here is allocation-light and NaN-free: empty or degenerate
//! inputs come back as `None` rather than propagating undefined values
//! into downstream edge calculations.

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Median; `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// The last `window` values (all of them when fewer exist).
pub fn trailing(values: &[f64], window: usize) -> &[f64] {
    let start = values.len().saturating_sub(window);
    &values[start..]
}

/// Trailing-window means per position, window including the current value,
/// shrinking at the start of the series.
pub fn rolling_means(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Standard normal cumulative distribution function.
///
/// Abramowitz & Stegun approximation (formula 7.1.26), accurate to ~1e-7.
pub fn normal_cdf(z: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if z < 0.0 { -1.0 } else { 1.0 };
    let x = z.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + P * x);
    let poly = t * (A1 + t * (A2 + t * (A3 + t * (A4 + t * A5))));
    let erf = 1.0 - poly * (-x * x).exp();

    0.5 * (1.0 + sign * erf)
}

/// Two-sample equal-variance Student's t test.
#[derive(Debug, Clone, Copy)]
pub struct TwoSampleTest {
    pub t_stat: f64,
    /// Two-tailed p-value (normal approximation to the t distribution).
    pub p_value: f64,
}

/// Pooled-variance t test of `a` against `b`.
///
/// Returns `None` when either sample is empty or no degrees of freedom
/// remain. Identical constant samples yield p = 1; distinct constant
/// samples yield p = 0.
pub fn two_sample_t_test(a: &[f64], b: &[f64]) -> Option<TwoSampleTest> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let df = n_a + n_b - 2.0;
    if df < 1.0 {
        return None;
    }

    let mean_a = mean(a)?;
    let mean_b = mean(b)?;
    let ss_a: f64 = a.iter().map(|v| (v - mean_a).powi(2)).sum();
    let ss_b: f64 = b.iter().map(|v| (v - mean_b).powi(2)).sum();
    let pooled_var = (ss_a + ss_b) / df;
    let std_err = (pooled_var * (1.0 / n_a + 1.0 / n_b)).sqrt();

    if std_err <= f64::EPSILON {
        // Degenerate spread: all observations equal within each sample.
        let p_value = if (mean_a - mean_b).abs() <= f64::EPSILON {
            1.0
        } else {
            0.0
        };
        return Some(TwoSampleTest {
            t_stat: 0.0,
            p_value,
        });
    }

    let t_stat = (mean_a - mean_b) / std_err;
    let p_value = (2.0 * (1.0 - normal_cdf(t_stat.abs()))).clamp(0.0, 1.0);

    Some(TwoSampleTest { t_stat, p_value })
}
