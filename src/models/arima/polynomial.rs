//! Lag-polynomial helpers for seasonal ARIMA models.
//!
//! A polynomial `a(B) = a_0 + a_1 B + a_2 B^2 + ...` is stored as its
//! coefficient vector `[a_0, a_1, a_2, ...]`, where `B` is the backshift
//! operator. Differencing and seasonal factors become plain polynomial
//! products, so a SARIMA model reduces to `a(B) y_t = m(B) e_t`.

/// Multiply two lag polynomials.
pub fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return vec![];
    }

    let mut result = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &y) in b.iter().enumerate() {
            result[i + j] += x * y;
        }
    }
    result
}

/// Autoregressive factor `1 - c_1 B^step - c_2 B^{2 step} - ...`.
///
/// `step` is 1 for the non-seasonal factor and the seasonal period for the
/// seasonal one.
pub fn ar_polynomial(coefficients: &[f64], step: usize) -> Vec<f64> {
    lag_polynomial(coefficients, step, -1.0)
}

/// Moving-average factor `1 + c_1 B^step + c_2 B^{2 step} + ...`.
pub fn ma_polynomial(coefficients: &[f64], step: usize) -> Vec<f64> {
    lag_polynomial(coefficients, step, 1.0)
}

fn lag_polynomial(coefficients: &[f64], step: usize, sign: f64) -> Vec<f64> {
    let step = step.max(1);
    let mut poly = vec![0.0; coefficients.len() * step + 1];
    poly[0] = 1.0;
    for (i, &c) in coefficients.iter().enumerate() {
        poly[(i + 1) * step] = sign * c;
    }
    poly
}

/// Differencing operator `(1 - B^step)^order`.
///
/// # Example
/// ```
/// use utility_forecast::models::arima::differencing_polynomial;
///
/// // (1 - B)^2 = 1 - 2B + B^2
/// assert_eq!(differencing_polynomial(2, 1), vec![1.0, -2.0, 1.0]);
/// ```
pub fn differencing_polynomial(order: usize, step: usize) -> Vec<f64> {
    let factor = ar_polynomial(&[1.0], step);
    (0..order).fold(vec![1.0], |acc, _| poly_mul(&acc, &factor))
}

/// MA(∞) weights of `a(B) y_t = m(B) e_t`, the coefficients of `m(B) / a(B)`.
///
/// `psi_0 = 1` and `psi_j = m_j - Σ_{i=1..j} a_i psi_{j-i}`, with `a_0` and
/// `m_0` assumed to be 1. Unit roots in `a(B)` make the weights accumulate,
/// which widens the forecast variance of differenced models.
pub fn psi_weights(ar: &[f64], ma: &[f64], count: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(count);
    for j in 0..count {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let m_j = ma.get(j).copied().unwrap_or(0.0);
        let feedback: f64 = (1..=j)
            .filter_map(|i| ar.get(i).map(|a_i| a_i * psi[j - i]))
            .sum();
        psi.push(m_j - feedback);
    }
    psi
}
