// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::info;

use super::{ObserveError, SourceParams};
use crate::{
    calibrate::{y_factor, y_factor_from_sources, CalibrationResult},
    error::RadiometerError,
    source::with_owned_source,
    total_power::LimitPolicy,
};

/// Where the hot- and cold-load powers come from.
pub(crate) enum LoadPower {
    /// Already measured.
    Given { p_hot: f64, p_cold: f64 },

    /// Integrate captures of each load.
    Measured {
        hot: SourceParams,
        cold: SourceParams,
        block_size: usize,
        t_int: f64,
        policy: LimitPolicy,
    },
}

pub(crate) struct YFactorParams {
    pub(crate) power: LoadPower,
    pub(crate) t_hot: f64,
    pub(crate) t_cold: f64,
}

impl YFactorParams {
    pub(crate) fn run(&self) -> Result<CalibrationResult, ObserveError> {
        let result = match &self.power {
            LoadPower::Given { p_hot, p_cold } => {
                y_factor(*p_hot, *p_cold, self.t_hot, self.t_cold)
                    .map_err(RadiometerError::from)?
            }

            LoadPower::Measured {
                hot,
                cold,
                block_size,
                t_int,
                policy,
            } => {
                let hot = hot.open()?;
                with_owned_source(hot, |hot| -> Result<CalibrationResult, ObserveError> {
                    let cold = cold.open()?;
                    with_owned_source(cold, |cold| {
                        y_factor_from_sources(
                            hot,
                            cold,
                            *block_size,
                            *t_int,
                            *policy,
                            self.t_hot,
                            self.t_cold,
                        )
                        .map_err(ObserveError::from)
                    })
                })?
            }
        };

        info!("Y = {:.6}", result.y);
        info!("T_sys = {:.2} K", result.t_sys);
        Ok(result)
    }
}
