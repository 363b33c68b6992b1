//! Two-sample location tests.
//!
//! Two-sided independent-samples t-tests with p-values from the Student t
//! distribution, evaluated through the regularized incomplete beta function:
//! `p = I_{df / (df + t^2)}(df / 2, 1 / 2)`.

use super::descriptive::{mean, sample_variance};
use serde::{Deserialize, Serialize};

/// Which variance assumption the t-test makes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignificanceTest {
    /// Pooled variance, df = n1 + n2 - 2
    #[default]
    Student,
    /// Unequal variances, Welch-Satterthwaite df
    Welch,
}

impl SignificanceTest {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignificanceTest::Student => "student",
            SignificanceTest::Welch => "welch",
        }
    }
}

/// Outcome of a two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTest {
    pub statistic: f64,
    pub df: f64,
    pub p_value: f64,
}

/// Two-sided t-test of equal means between `a` and `b`.
///
/// Returns `None` when either sample has fewer than two values. When the
/// standard error is zero both samples are constant; the p-value is then 1
/// if the means agree and 0 otherwise.
pub fn t_test(a: &[f64], b: &[f64], kind: SignificanceTest) -> Option<TTest> {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (m1, m2) = (mean(a)?, mean(b)?);
    let (v1, v2) = (sample_variance(a)?, sample_variance(b)?);

    let (se, df) = match kind {
        SignificanceTest::Student => {
            let df = n1 + n2 - 2.0;
            let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
            ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
        }
        SignificanceTest::Welch => {
            let (q1, q2) = (v1 / n1, v2 / n2);
            let se2 = q1 + q2;
            let denom = q1 * q1 / (n1 - 1.0) + q2 * q2 / (n2 - 1.0);
            let df = if denom > 0.0 {
                se2 * se2 / denom
            } else {
                n1 + n2 - 2.0
            };
            (se2.sqrt(), df)
        }
    };

    let diff = m1 - m2;
    if se == 0.0 || !se.is_finite() {
        let (statistic, p_value) = if diff == 0.0 {
            (0.0, 1.0)
        } else {
            (diff.signum() * f64::INFINITY, 0.0)
        };
        return Some(TTest {
            statistic,
            df,
            p_value,
        });
    }

    let statistic = diff / se;
    Some(TTest {
        statistic,
        df,
        p_value: student_t_two_sided(statistic, df),
    })
}

/// Two-sided tail probability of Student's t with `df` degrees of freedom.
pub fn student_t_two_sided(t: f64, df: f64) -> f64 {
    let x = df / (df + t * t);
    regularized_incomplete_beta(df / 2.0, 0.5, x).clamp(0.0, 1.0)
}

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEF: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function (Lanczos approximation).
fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let series = LANCZOS_COEF
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEF[0], |acc, (i, c)| acc + c / (x + i as f64));
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// `I_x(a, b)`, the regularized incomplete beta function.
fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Continued fraction for the incomplete beta (modified Lentz).
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 500;
    const EPS: f64 = 1e-15;
    const TINY: f64 = 1e-300;

    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };

    let (qab, qap, qam) = (a + b, a + 1.0, a - 1.0);
    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_ln_gamma_known_values() {
        assert!(approx(ln_gamma(1.0), 0.0, 1e-12));
        assert!(approx(ln_gamma(5.0), 24f64.ln(), 1e-12));
        assert!(approx(ln_gamma(0.5), std::f64::consts::PI.sqrt().ln(), 1e-12));
    }

    #[test]
    fn test_student_t_tail() {
        assert!(approx(student_t_two_sided(5.0, 8.0), 0.001_052_825_8, 1e-9));
        assert!(approx(student_t_two_sided(1.0, 3.0), 0.391_002_218_6, 1e-9));
        assert!(approx(student_t_two_sided(2.306_004, 8.0), 0.05, 1e-6));
        assert_eq!(student_t_two_sided(0.0, 10.0), 1.0);
    }

    #[test]
    fn test_student_t_test() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [6.0, 7.0, 8.0, 9.0, 10.0];
        let result = t_test(&a, &b, SignificanceTest::Student).unwrap();
        assert!(approx(result.statistic, -5.0, 1e-12));
        assert_eq!(result.df, 8.0);
        assert!(approx(result.p_value, 0.001_052_825_8, 1e-9));
    }

    #[test]
    fn test_welch_t_test() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0];
        let result = t_test(&a, &b, SignificanceTest::Welch).unwrap();
        assert!(approx(result.statistic, -2.376_354_103, 1e-8));
        assert!(approx(result.df, 6.972_255_73, 1e-6));
        assert!(approx(result.p_value, 0.049_284_338, 1e-6));
    }

    #[test]
    fn test_t_test_needs_two_values() {
        assert!(t_test(&[1.0], &[1.0, 2.0], SignificanceTest::Student).is_none());
    }

    #[test]
    fn test_t_test_constant_samples() {
        let same = t_test(&[4.0; 12], &[4.0; 12], SignificanceTest::Student).unwrap();
        assert_eq!(same.p_value, 1.0);

        let different = t_test(&[4.0; 12], &[9.0; 12], SignificanceTest::Welch).unwrap();
        assert_eq!(different.p_value, 0.0);
        assert!(different.statistic.is_infinite());
    }

    #[test]
    fn test_significance_test_serde() {
        let kind: SignificanceTest = serde_json::from_str("\"welch\"").unwrap();
        assert_eq!(kind, SignificanceTest::Welch);
        assert_eq!(SignificanceTest::default().as_str(), "student");
    }
}
