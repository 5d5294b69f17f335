// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::info;

use super::{ObserveError, SourceParams};
use crate::{
    dicke::{dicke_switch, DickeSeries},
    io::{write_dicke_differences, write_dicke_series},
    source::with_owned_source,
};

pub(crate) struct DickeParams {
    pub(crate) source: SourceParams,
    pub(crate) block_size: usize,
    pub(crate) t: f64,

    /// The digital output switching the noise source.
    pub(crate) noise_source_bit: u8,

    /// Where to write every block's power.
    pub(crate) output: Option<PathBuf>,

    /// Where to write the noise-off minus noise-on differences.
    pub(crate) output_differences: Option<PathBuf>,
}

impl DickeParams {
    pub(crate) fn run(&self) -> Result<DickeSeries, ObserveError> {
        let source = self.source.open()?;
        let series = with_owned_source(source, |source| {
            dicke_switch(source, self.block_size, self.t, self.noise_source_bit)
        })?;
        let differences = series.differences();
        info!(
            "Recorded {} blocks, giving {} differences",
            series.len(),
            differences.len()
        );

        if let Some(output) = &self.output {
            write_dicke_series(output, &series)?;
            info!("Wrote the time series to {}", output.display());
        }
        if let Some(output) = &self.output_differences {
            write_dicke_differences(output, &differences)?;
            info!("Wrote the differences to {}", output.display());
        }
        Ok(series)
    }
}
