// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Anything that goes wrong while talking to a [`super::SampleSource`].
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Asked the sample source for {requested} samples, but got {got}")]
    ShortBlock { requested: usize, got: usize },

    #[error("The IQ file '{file}' ran out of samples after {samples_read} samples")]
    EndOfFile { file: String, samples_read: u64 },

    #[error("The sample source has already been closed")]
    Closed,

    #[error("The sample source rejected its configuration: {0}")]
    Configure(String),

    #[error("Couldn't retune the sample source to {freq} Hz: {reason}")]
    Retune { freq: f64, reason: String },

    #[error("Couldn't set digital output {bit}: {reason}")]
    DigitalOutput { bit: u8, reason: String },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
