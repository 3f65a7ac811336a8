//! Special functions needed by the density evaluators.
//!
//! `ln_gamma` comes from libm; the modified Bessel function I0 uses the
//! Abramowitz & Stegun 9.8.1 / 9.8.2 polynomial approximations (absolute
//! error below 2e-7 over each branch), which is plenty for weight vectors
//! that only feed an outer-product accumulation.

/// Natural log of the gamma function.
#[inline]
pub fn ln_gamma(x: f64) -> f64 {
    libm::lgamma(x)
}

/// Natural log of the beta function B(a, b).
#[inline]
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Modified Bessel function of the first kind, order zero.
pub fn bessel_i0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 3.75 {
        // A&S 9.8.1, polynomial in t^2 = (x/3.75)^2.
        let t = x / 3.75;
        let t2 = t * t;
        1.0 + t2
            * (3.515_622_9
                + t2 * (3.089_942_4
                    + t2 * (1.206_749_2
                        + t2 * (0.265_973_2 + t2 * (0.036_076_8 + t2 * 0.004_581_3)))))
    } else {
        // A&S 9.8.2, exp(ax)/sqrt(ax) times a polynomial in 3.75/ax.
        let t = 3.75 / ax;
        let poly = 0.398_942_28
            + t * (0.013_285_92
                + t * (0.002_253_19
                    + t * (-0.001_575_65
                        + t * (0.009_162_81
                            + t * (-0.020_577_06
                                + t * (0.026_355_37 + t * (-0.016_476_33 + t * 0.003_923_77)))))));
        poly * ax.exp() / ax.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i0_at_zero_is_one() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn i0_matches_reference_values() {
        // Reference values from A&S Table 9.8.
        for (x, want) in [
            (0.5, 1.063_483_4),
            (1.0, 1.266_065_9),
            (2.0, 2.279_585_3),
            (3.75, 9.118_945_5),
            (5.0, 27.239_872),
            (10.0, 2_815.716_6),
        ] {
            let got = bessel_i0(x);
            assert!(
                (got / want - 1.0).abs() < 1e-4,
                "I0({x}) = {got}, want {want}"
            );
        }
    }

    #[test]
    fn i0_is_even() {
        for x in [0.3, 1.7, 4.2, 9.0] {
            assert!((bessel_i0(x) - bessel_i0(-x)).abs() < 1e-12);
        }
    }

    #[test]
    fn ln_beta_matches_small_integers() {
        // B(2, 3) = 1/12, B(1, 1) = 1.
        assert!((ln_beta(2.0, 3.0) - (1.0f64 / 12.0).ln()).abs() < 1e-12);
        assert!(ln_beta(1.0, 1.0).abs() < 1e-12);
    }
}
