//! Legendre polynomial evaluation.
//!
//! Only what the Gauss-Lobatto node solver needs: P_n(x) and the pair
//! (P_n(x), P'_n(x)) from a single pass of the three-term recurrence.

/// Evaluate Legendre polynomial P_n(x) using the three-term recurrence.
///
/// (k+1) P_{k+1}(x) = (2k+1) x P_k(x) - k P_{k-1}(x)
pub fn legendre(n: usize, x: f64) -> f64 {
    legendre_pair(n, x).1
}

/// Returns (P_{n-1}(x), P_n(x)). For n = 0 the first entry is zero.
fn legendre_pair(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 1.0);
    }

    let mut p_prev = 1.0;
    let mut p_curr = x;
    for k in 1..n {
        let p_next = ((2 * k + 1) as f64 * x * p_curr - k as f64 * p_prev) / (k + 1) as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }

    (p_prev, p_curr)
}

/// Evaluate P_n(x) and P'_n(x) together.
///
/// The derivative uses P'_n(x) = n (x P_n - P_{n-1}) / (x² - 1) away from the
/// endpoints and the closed forms P'_n(±1) = (±1)^{n+1} n(n+1)/2 at them.
pub fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }

    let (p_n_minus_1, p_n) = legendre_pair(n, x);
    let endpoint = (n * (n + 1)) as f64 / 2.0;

    let dp_n = if (x - 1.0).abs() < 1e-14 {
        endpoint
    } else if (x + 1.0).abs() < 1e-14 {
        if n % 2 == 0 { -endpoint } else { endpoint }
    } else {
        n as f64 * (x * p_n - p_n_minus_1) / (x * x - 1.0)
    };

    (p_n, dp_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_degree_closed_forms() {
        let x = 0.3;
        assert!((legendre(0, x) - 1.0).abs() < 1e-14);
        assert!((legendre(1, x) - x).abs() < 1e-14);
        assert!((legendre(2, x) - (3.0 * x * x - 1.0) / 2.0).abs() < 1e-14);
        assert!((legendre(3, x) - (5.0 * x * x * x - 3.0 * x) / 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_derivative_closed_forms() {
        let x = -0.4;
        let (_, d2) = legendre_and_derivative(2, x);
        assert!((d2 - 3.0 * x).abs() < 1e-14);
        let (_, d3) = legendre_and_derivative(3, x);
        assert!((d3 - (15.0 * x * x - 3.0) / 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_endpoint_values() {
        for n in 0..=6 {
            let (p_right, dp_right) = legendre_and_derivative(n, 1.0);
            assert!((p_right - 1.0).abs() < 1e-14);
            assert!((dp_right - (n * (n + 1)) as f64 / 2.0).abs() < 1e-12);

            let (p_left, dp_left) = legendre_and_derivative(n, -1.0);
            let parity = if n % 2 == 0 { 1.0 } else { -1.0 };
            assert!((p_left - parity).abs() < 1e-14);
            assert!((dp_left + parity * (n * (n + 1)) as f64 / 2.0).abs() < 1e-12);
        }
    }
}
