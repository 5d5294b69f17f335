// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::info;

use super::ObserveError;
use crate::{
    error::RadiometerError,
    fold::{fold_spectra, FoldedSpectrum},
    io::{read_spectrum, write_spectrum},
};

/// Fold two previously saved linear spectra.
pub(crate) struct FoldParams {
    pub(crate) on: PathBuf,
    pub(crate) off: PathBuf,
    pub(crate) output: Option<PathBuf>,
}

impl FoldParams {
    pub(crate) fn run(&self) -> Result<FoldedSpectrum, ObserveError> {
        let on = read_spectrum(&self.on)?;
        let off = read_spectrum(&self.off)?;
        let folded = fold_spectra(&on, &off).map_err(RadiometerError::from)?;
        info!(
            "Folded with a throw of {} bins; {} bins remain",
            folded.bin_throw,
            folded.power.len()
        );

        if let Some(output) = &self.output {
            write_spectrum(output, folded.freqs.view(), folded.power.view())?;
            info!("Wrote the folded spectrum to {}", output.display());
        }
        Ok(folded)
    }
}
