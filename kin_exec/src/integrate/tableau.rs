//! Butcher tableaux for embedded explicit Runge-Kutta pairs

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Coefficients of an embedded explicit Runge-Kutta pair with the first-same-as-last property.
#[derive(Debug)]
pub struct ButcherTableau {
    /// Order of the propagated solution
    pub order: u32,

    /// Order of the embedded error estimator
    pub error_order: u32,

    /// Stage time fractions, one per stage
    pub c: &'static [f64],

    /// Stage coefficients, row `s` has `s` entries
    pub a: &'static [&'static [f64]],

    /// Solution weights, one per stage
    pub b: &'static [f64],

    /// Error estimate weights, one per stage plus one for the derivative at the new point
    pub e: &'static [f64],
}

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Bogacki-Shampine 3(2).
pub const RK23: ButcherTableau = ButcherTableau {
    order: 3,
    error_order: 2,
    c: &[0.0, 1.0 / 2.0, 3.0 / 4.0],
    a: &[&[], &[1.0 / 2.0], &[0.0, 3.0 / 4.0]],
    b: &[2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0],
    e: &[5.0 / 72.0, -1.0 / 12.0, -1.0 / 9.0, 1.0 / 8.0],
};

/// Dormand-Prince 5(4).
pub const RK45: ButcherTableau = ButcherTableau {
    order: 5,
    error_order: 4,
    c: &[0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0],
    a: &[
        &[],
        &[1.0 / 5.0],
        &[3.0 / 40.0, 9.0 / 40.0],
        &[44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0],
        &[19372.0 / 6561.0, -25360.0 / 2187.0, 64448.0 / 6561.0, -212.0 / 729.0],
        &[9017.0 / 3168.0, -355.0 / 33.0, 46732.0 / 5247.0, 49.0 / 176.0, -5103.0 / 18656.0],
    ],
    b: &[35.0 / 384.0, 0.0, 500.0 / 1113.0, 125.0 / 192.0, -2187.0 / 6784.0, 11.0 / 84.0],
    e: &[
        -71.0 / 57600.0,
        0.0,
        71.0 / 16695.0,
        -71.0 / 1920.0,
        17253.0 / 339200.0,
        -22.0 / 525.0,
        1.0 / 40.0,
    ],
};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ButcherTableau {
    /// Number of derivative evaluations per step, excluding the FSAL evaluation.
    pub fn num_stages(&self) -> usize {
        self.c.len()
    }

    /// Exponent used when scaling the step from an error norm.
    pub fn error_exponent(&self) -> f64 {
        -1.0 / (self.error_order as f64 + 1.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn check_consistent(tab: &ButcherTableau) {
        let n = tab.num_stages();
        assert_eq!(tab.a.len(), n);
        assert_eq!(tab.b.len(), n);
        assert_eq!(tab.e.len(), n + 1);

        // Weights sum to one and each row of A sums to its stage time
        assert!((tab.b.iter().sum::<f64>() - 1.0).abs() < 1e-13);
        for (row, c) in tab.a.iter().zip(tab.c.iter()) {
            assert!((row.iter().sum::<f64>() - c).abs() < 1e-13);
        }

        // The error weights are a difference of two consistent solutions
        assert!(tab.e.iter().sum::<f64>().abs() < 1e-13);
    }

    #[test]
    fn test_tableaux() {
        check_consistent(&RK23);
        check_consistent(&RK45);

        assert_eq!(RK23.error_exponent(), -1.0 / 3.0);
        assert_eq!(RK45.error_exponent(), -0.2);
    }
}
