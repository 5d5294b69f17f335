// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::{debug, warn};

use crate::source::{IqFileSource, IqFormat, SampleSource, SourceError, SyntheticSource, Tone};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SourceKind {
    IqFile {
        path: PathBuf,
        format: IqFormat,
        looping: bool,
    },

    Synthetic {
        tones: Vec<Tone>,

        /// A tone that's only present while this digital output is high,
        /// standing in for a noise source.
        switched: Option<(u8, Tone)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SourceParams {
    pub(crate) kind: SourceKind,
    pub(crate) rate: f64,
    pub(crate) center_freq: f64,
    pub(crate) gain: f64,
}

impl SourceParams {
    /// Open and configure the source. If configuring fails, the source is
    /// closed again before returning.
    pub(crate) fn open(&self) -> Result<Box<dyn SampleSource + Send>, SourceError> {
        let mut source: Box<dyn SampleSource + Send> = match &self.kind {
            SourceKind::IqFile {
                path,
                format,
                looping,
            } => Box::new(IqFileSource::open(path, *format, *looping)?),

            SourceKind::Synthetic { tones, switched } => {
                let mut source = SyntheticSource::new(tones.clone());
                if let Some((bit, tone)) = switched {
                    source = source.with_switched_tone(*bit, *tone);
                }
                Box::new(source)
            }
        };

        if let Err(e) = source.configure(self.rate, self.center_freq, self.gain) {
            if let Err(close_err) = source.close() {
                warn!("Couldn't close the sample source after failing to configure it: {close_err}");
            }
            return Err(e);
        }
        debug!("  sample rate: {} MHz", self.rate / 1e6);
        debug!("  center frequency {} MHz", self.center_freq / 1e6);
        debug!("  gain: {} dB", self.gain);

        Ok(source)
    }
}
