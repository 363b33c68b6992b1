//! Statistical primitives
//!
//! Pure functions over `f64` slices. Nothing in here knows about records;
//! the [`analytics`](crate::analytics) module maps record sets onto these.
//!
//! - [`descriptive`]: the fixed-shape [`BasicStats`] aggregate and the
//!   moments and quantiles it is built from
//! - [`inference`]: two-sample t-tests and the special functions behind
//!   their p-values
//! - [`correlation`]: Pearson correlation

pub mod correlation;
pub mod descriptive;
pub mod inference;

pub use correlation::pearson;
pub use descriptive::{kurtosis, mean, quantile, sample_variance, skewness, BasicStats};
pub use inference::{t_test, SignificanceTest, TTest};

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(14.4567, 2), 14.46);
        assert_eq!(round_to(-3.14159, 3), -3.142);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(34.482758, 1), 34.5);
        assert!(round_to(f64::NAN, 2).is_nan());
    }
}
