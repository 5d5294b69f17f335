// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors shared by the observing modes.
//!
//! Configuration errors are always raised before the sample source is touched.
//! Acquisition errors come from the source itself. Domain errors mean the
//! numbers were fine to acquire but can't be reduced to a meaningful result.

use thiserror::Error;

use crate::source::SourceError;

#[derive(Error, Debug)]
pub enum RadiometerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Acquisition(#[from] SourceError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("The block size must be at least 1 sample")]
    ZeroBlockSize,

    #[error("The integration time must be a positive, finite number of seconds; got {0}")]
    BadIntegrationTime(f64),

    #[error("The sample rate must be a positive, finite number of Hz; got {0}")]
    BadSampleRate(f64),

    #[error("The {what} must be a finite number of Hz; got {freq}")]
    BadFrequency { what: &'static str, freq: f64 },

    #[error("At least 2 frequency bins are required to form a spectrum; got {0}")]
    TooFewBins(usize),

    #[error("A block of {block_size} samples is shorter than the {nperseg}-sample periodogram segment")]
    BlockShorterThanSegment { block_size: usize, nperseg: usize },

    #[error("{t_int} s of samples at {rate} Hz doesn't fill a single block of {block_size} samples")]
    IntegrationShorterThanBlock {
        t_int: f64,
        rate: f64,
        block_size: usize,
    },

    #[error("The switching frequency must be a positive, finite number of Hz; got {0}")]
    BadSwitchFreq(f64),

    #[error("At t_int={t_int} s, frequency switching at fswitch={fswitch} Hz leaves no time to dwell on each frequency. Please choose a longer integration time (at least {min_t_int} s) or a higher switching frequency")]
    IntegrationShorterThanSwitchCycle {
        t_int: f64,
        fswitch: f64,
        min_t_int: f64,
    },

    #[error("A dwell of {samples_per_dwell} samples can't hold a single block of {block_size} samples; lower the block size or the switching frequency")]
    DwellShorterThanBlock {
        samples_per_dwell: usize,
        block_size: usize,
    },

    #[error("Fold inputs must all have the same length; got {freqs_on} ON frequencies, {freqs_off} OFF frequencies, {p_on} ON powers and {p_off} OFF powers")]
    FoldLengthMismatch {
        freqs_on: usize,
        freqs_off: usize,
        p_on: usize,
        p_off: usize,
    },

    #[error("The {which} frequency grid isn't uniformly spaced")]
    NonUniformGrid { which: &'static str },

    #[error("The ON and OFF frequency grids have different spacings ({on} Hz vs {off} Hz)")]
    MismatchedGrids { on: f64, off: f64 },

    #[error("The ON centre frequency {fc} Hz isn't within the OFF spectrum ({off_min} Hz to {off_max} Hz)")]
    CentreOutsideOff { fc: f64, off_min: f64, off_max: f64 },

    #[error("Shifting the ON centre frequency by the frequency throw of {fthrow} Hz doesn't land on a bin of the ON spectrum")]
    ThrowOffGrid { fthrow: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No sample blocks were collected, so there is nothing to average")]
    NoBlocks,

    #[error("The hot and cold load measurements are indistinguishable (Y = {y}); no system temperature can be derived")]
    IndistinguishableLoads { y: f64 },

    #[error("Calibration inputs must be finite, and the hot-load power non-zero; got p_hot={p_hot}, p_cold={p_cold}, t_hot={t_hot}, t_cold={t_cold}")]
    BadCalibrationInput {
        p_hot: f64,
        p_cold: f64,
        t_hot: f64,
        t_cold: f64,
    },
}

/// Check the integration time common to every observing mode.
pub(crate) fn check_t_int(t_int: f64) -> Result<(), ConfigError> {
    if t_int.is_finite() && t_int > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::BadIntegrationTime(t_int))
    }
}

/// Check a sample rate reported by (or requested of) a source.
pub(crate) fn check_rate(rate: f64) -> Result<(), ConfigError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::BadSampleRate(rate))
    }
}

pub(crate) fn check_freq(what: &'static str, freq: f64) -> Result<(), ConfigError> {
    if freq.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::BadFrequency { what, freq })
    }
}
