// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::info;

use super::{ObserveError, SourceParams};
use crate::{
    source::with_owned_source,
    total_power::{integrate, integrate_async, LimitPolicy, TotalPower},
};

pub(crate) struct TotalPowerParams {
    pub(crate) source: SourceParams,
    pub(crate) block_size: usize,
    pub(crate) t_int: f64,
    pub(crate) policy: LimitPolicy,

    /// Read blocks on a separate thread.
    pub(crate) use_async: bool,
}

impl TotalPowerParams {
    pub(crate) fn run(&self) -> Result<TotalPower, ObserveError> {
        let source = self.source.open()?;
        let result = with_owned_source(source, |source| {
            if self.use_async {
                integrate_async(source, self.block_size, self.t_int, self.policy)
            } else {
                integrate(source, self.block_size, self.t_int, self.policy)
            }
        })?;

        info!("Average power: {:e}", result.average_power);
        info!("  over {} blocks", result.block_count);
        Ok(result)
    }
}
