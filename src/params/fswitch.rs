// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::info;

use super::{ObserveError, SourceParams};
use crate::{
    error::RadiometerError,
    fold::{fold_spectra, FoldedSpectrum},
    fswitch::{acquire, FswitchSettings},
    io::write_spectrum,
    source::with_owned_source,
};

pub(crate) struct FswitchParams {
    pub(crate) source: SourceParams,
    pub(crate) settings: FswitchSettings,

    /// Where to write the folded spectrum.
    pub(crate) output: Option<PathBuf>,

    /// Where to write the unfolded ON spectrum.
    pub(crate) output_on: Option<PathBuf>,

    /// Where to write the unfolded OFF spectrum.
    pub(crate) output_off: Option<PathBuf>,
}

impl FswitchParams {
    pub(crate) fn run(&self) -> Result<FoldedSpectrum, ObserveError> {
        self.settings
            .validate(self.source.rate)
            .map_err(RadiometerError::from)?;
        let source = self.source.open()?;
        let (on, off) = with_owned_source(source, |source| acquire(source, &self.settings))?;

        for (spectrum, output) in [(&on, &self.output_on), (&off, &self.output_off)] {
            if let Some(output) = output {
                write_spectrum(output, spectrum.freqs(), spectrum.power())?;
                info!("Wrote a spectrum to {}", output.display());
            }
        }

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
