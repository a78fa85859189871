//! Stumpff functions `c0..c3` by argument quartering and truncated series.

/// Reduction threshold on `|x|` before the series is evaluated.
const REDUCED_ARGUMENT: f64 = 0.1;

/// Evaluate `[c0(x), c1(x), c2(x), c3(x)]`.
pub fn stumpff(x: f64) -> [f64; 4] {
    let mut x = x;
    let mut reductions = 0u32;
    while x.abs() > REDUCED_ARGUMENT {
        reductions += 1;
        x *= 0.25;
    }

    let mut c2 = (1.0
        - x * (1.0
            - x * (1.0
                - x * (1.0 - x * (1.0 - x * (1.0 - x / 182.0) / 132.0) / 90.0) / 56.0)
                / 30.0)
            / 12.0)
        / 2.0;
    let mut c3 = (1.0
        - x * (1.0
            - x * (1.0
                - x * (1.0 - x * (1.0 - x * (1.0 - x / 210.0) / 156.0) / 110.0) / 72.0)
                / 42.0)
            / 20.0)
        / 6.0;
    let mut c1 = 1.0 - x * c3;
    let mut c0 = 1.0 - x * c2;

    for _ in 0..reductions {
        c3 = 0.25 * (c2 + c0 * c3);
        c2 = 0.5 * c1 * c1;
        c1 *= c0;
        c0 = 2.0 * c0 * c0 - 1.0;
    }

    [c0, c1, c2, c3]
}

#[cfg(test)]
mod tests {
    use super::stumpff;

    fn closed_form(x: f64) -> [f64; 4] {
        if x > 0.0 {
            let s = x.sqrt();
            [s.cos(), s.sin() / s, (1.0 - s.cos()) / x, (s - s.sin()) / (x * s)]
        } else {
            let s = (-x).sqrt();
            [s.cosh(), s.sinh() / s, (s.cosh() - 1.0) / -x, (s.sinh() - s) / (-x * s)]
        }
    }

    #[test]
    fn matches_trigonometric_forms_on_both_sides_of_zero() {
        for x in [2.5, 0.05, -0.07, -4.0, 30.0] {
            let series = stumpff(x);
            let exact = closed_form(x);
            for (a, b) in series.iter().zip(exact.iter()) {
                assert!((a - b).abs() < 1e-12, "x={x}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn zero_argument_gives_factorial_reciprocals() {
        assert_eq!(stumpff(0.0), [1.0, 1.0, 0.5, 1.0 / 6.0]);
    }
}
