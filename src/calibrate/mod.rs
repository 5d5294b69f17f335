// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Y-factor calibration.

Two total-power measurements, one of a hot load and one of a cold load with
known physical temperatures, give the receiver's system temperature:

`Y = p_cold / p_hot` and `t_sys = (t_cold - Y t_hot) / (Y - 1)`.
 */

#[cfg(test)]
mod tests;

use log::{debug, info};

use crate::{
    error::{DomainError, RadiometerError},
    source::SampleSource,
    total_power::{integrate, LimitPolicy},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationResult {
    /// The system temperature \[K\].
    pub t_sys: f64,

    /// `p_cold / p_hot`
    pub y: f64,
}

/// Estimate the system temperature from hot- and cold-load powers (in the same
/// arbitrary units) and the loads' temperatures \[K\].
///
/// Equal powers (`Y == 1`) can't be solved and are reported as a
/// [`DomainError`], as are non-finite inputs or a zero hot-load power.
pub fn y_factor(
    p_hot: f64,
    p_cold: f64,
    t_hot: f64,
    t_cold: f64,
) -> Result<CalibrationResult, DomainError> {
    let finite = [p_hot, p_cold, t_hot, t_cold].iter().all(|x| x.is_finite());
    if !finite || p_hot == 0.0 {
        return Err(DomainError::BadCalibrationInput {
            p_hot,
            p_cold,
            t_hot,
            t_cold,
        });
    }

    let y = p_cold / p_hot;
    if (y - 1.0).abs() < f64::EPSILON {
        return Err(DomainError::IndistinguishableLoads { y });
    }
    let t_sys = (t_cold - y * t_hot) / (y - 1.0);
    debug!("Y = {y}");
    info!("T_sys estimate for cold load temp {t_cold:.2}K and hot load temp {t_hot:.2}K is {t_sys:.2}K");

    Ok(CalibrationResult { t_sys, y })
}

/// Integrate the total power of a hot-load capture and a cold-load capture,
/// then [`y_factor`] them. Neither source is closed here.
#[allow(clippy::too_many_arguments)]
pub fn y_factor_from_sources<H, C>(
    hot: &mut H,
    cold: &mut C,
    block_size: usize,
    t_int: f64,
    policy: LimitPolicy,
    t_hot: f64,
    t_cold: f64,
) -> Result<CalibrationResult, RadiometerError>
where
    H: SampleSource + ?Sized,
    C: SampleSource + ?Sized,
{
    info!("Measuring the hot load");
    let p_hot = integrate(hot, block_size, t_int, policy)?.average_power;
    info!("Measuring the cold load");
    let p_cold = integrate(cold, block_size, t_int, policy)?.average_power;
    Ok(y_factor(p_hot, p_cold, t_hot, t_cold)?)
}
