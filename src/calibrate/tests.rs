// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;
use crate::source::{SyntheticSource, Tone};

#[test]
fn test_y_factor() {
    let result = y_factor(2.0, 1.0, 300.0, 10.0).unwrap();
    assert_abs_diff_eq!(result.y, 0.5);
    assert_abs_diff_eq!(result.t_sys, 280.0, epsilon = 1e-10);

    // A 100 K receiver looking at 300 K and 77 K loads.
    let t_sys = 100.0;
    let result = y_factor(300.0 + t_sys, 77.0 + t_sys, 300.0, 77.0).unwrap();
    assert_abs_diff_eq!(result.t_sys, t_sys, epsilon = 1e-10);
}

#[test]
fn test_equal_powers_are_a_domain_error() {
    for p in [1e-3, 1.0, 12345.0] {
        assert_eq!(
            y_factor(p, p, 300.0, 300.0),
            Err(DomainError::IndistinguishableLoads { y: 1.0 })
        );
    }
}

#[test]
fn test_bad_inputs() {
    assert!(matches!(
        y_factor(0.0, 1.0, 300.0, 77.0),
        Err(DomainError::BadCalibrationInput { .. })
    ));
    assert!(matches!(
        y_factor(1.0, f64::NAN, 300.0, 77.0),
        Err(DomainError::BadCalibrationInput { .. })
    ));
    assert!(matches!(
        y_factor(1.0, 0.5, f64::INFINITY, 77.0),
        Err(DomainError::BadCalibrationInput { .. })
    ));
}

#[test]
fn test_y_factor_from_sources() {
    // Tone power is A²; the hot load is twice as bright as the cold one.
    let mut hot = SyntheticSource::new(vec![Tone::new(1e9 + 8e3, 2f64.sqrt())]);
    hot.configure(64e3, 1e9, 35.0).unwrap();
    let mut cold = SyntheticSource::new(vec![Tone::new(1e9 + 8e3, 1.0)]);
    cold.configure(64e3, 1e9, 35.0).unwrap();

    let result = y_factor_from_sources(
        &mut hot,
        &mut cold,
        1024,
        0.1,
        LimitPolicy::FixedBudget,
        300.0,
        10.0,
    )
    .unwrap();
    assert_abs_diff_eq!(result.y, 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(result.t_sys, 280.0, epsilon = 1e-6);
    assert!(!hot.is_closed());
    assert!(!cold.is_closed());
}

#[test]
fn test_y_factor_from_equal_sources() {
    let mut hot = SyntheticSource::new(vec![Tone::new(1e9 + 8e3, 1.0)]);
    hot.configure(64e3, 1e9, 35.0).unwrap();
    let mut cold = SyntheticSource::new(vec![Tone::new(1e9 + 8e3, 1.0)]);
    cold.configure(64e3, 1e9, 35.0).unwrap();

    let result = y_factor_from_sources(
        &mut hot,
        &mut cold,
        1024,
        0.1,
        LimitPolicy::FixedBudget,
        300.0,
        10.0,
    );
    assert!(matches!(
        result,
        Err(RadiometerError::Domain(
            DomainError::IndistinguishableLoads { .. }
        ))
    ));
}
