// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::info;

use super::{ObserveError, SourceParams};
use crate::{
    io::write_spectrum,
    source::with_owned_source,
    spectrum::{accumulate, SpectrumEstimate, SpectrumSettings},
};

pub(crate) struct SpectrumParams {
    pub(crate) source: SourceParams,
    pub(crate) settings: SpectrumSettings,
    pub(crate) output: Option<PathBuf>,
}

impl SpectrumParams {
    pub(crate) fn run(&self) -> Result<SpectrumEstimate, ObserveError> {
        let source = self.source.open()?;
        let spectrum = with_owned_source(source, |source| accumulate(source, &self.settings))?;

        let peak = spectrum
            .power
            .iter()
            .zip(spectrum.freqs.iter())
            .max_by(|(a, _), (b, _)| a.total_cmp(b));
        if let Some((p, f)) = peak {
            info!("Peak of {p:.2} dB at {:.6} MHz", f / 1e6);
        }
        if let Some(output) = &self.output {
            write_spectrum(output, spectrum.freqs(), spectrum.power())?;
            info!("Wrote the spectrum to {}", output.display());
        }
        Ok(spectrum)
    }
}
