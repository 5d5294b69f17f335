// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all rtlobs-related errors. This should be the *only* error
//! enum that is publicly visible.

use thiserror::Error;

use super::common::{ArgsError, SourceArgsError};
use crate::{
    error::{ConfigError, DomainError, RadiometerError},
    io::{FileWriteError, SpectrumFileError},
    params::ObserveError,
    source::SourceError,
};

/// The *only* publicly visible error from rtlobs.
#[derive(Error, Debug)]
pub enum RtlobsError {
    /// Parameters that don't make sense together. Nothing was acquired.
    #[error("{0}")]
    Config(String),

    /// The sample source failed.
    #[error("{0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv) and maybe disabling progress bars.")]
    Acquisition(String),

    /// Samples were acquired, but can't be reduced to a result.
    #[error("{0}")]
    Domain(String),

    /// An error related to spectrum files.
    #[error("{0}\n\nSpectrum files have 5 header lines followed by 'frequency power' rows.")]
    SpectrumFile(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files are TOML or JSON, using the same argument names as the command line (e.g. block_size = 1024).")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

// Binary sub-command errors.

impl From<SourceArgsError> for RtlobsError {
    fn from(e: SourceArgsError) -> Self {
        let s = e.to_string();
        match e {
            SourceArgsError::NoSource
            | SourceArgsError::BothSources
            | SourceArgsError::BadIqFormat(_)
            | SourceArgsError::OddToneValues(_) => Self::Config(s),
            SourceArgsError::IqFileDoesNotExist(_) => Self::Generic(s),
        }
    }
}

impl From<ArgsError> for RtlobsError {
    fn from(e: ArgsError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<ObserveError> for RtlobsError {
    fn from(e: ObserveError) -> Self {
        match e {
            ObserveError::Radiometer(e) => Self::from(e),
            ObserveError::Source(e) => Self::from(e),
            ObserveError::SpectrumFile(e) => Self::from(e),
            ObserveError::FileWrite(e) => Self::from(e),
            ObserveError::IO(e) => Self::from(e),
        }
    }
}

// Library code errors.

impl From<RadiometerError> for RtlobsError {
    fn from(e: RadiometerError) -> Self {
        match e {
            RadiometerError::Config(e) => Self::from(e),
            RadiometerError::Acquisition(e) => Self::from(e),
            RadiometerError::Domain(e) => Self::from(e),
        }
    }
}

impl From<ConfigError> for RtlobsError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<DomainError> for RtlobsError {
    fn from(e: DomainError) -> Self {
        Self::Domain(e.to_string())
    }
}

impl From<SourceError> for RtlobsError {
    fn from(e: SourceError) -> Self {
        Self::Acquisition(e.to_string())
    }
}

impl From<SpectrumFileError> for RtlobsError {
    fn from(e: SpectrumFileError) -> Self {
        let s = e.to_string();
        match e {
            SpectrumFileError::LengthMismatch { .. }
            | SpectrumFileError::Malformed { .. }
            | SpectrumFileError::Empty(_) => Self::SpectrumFile(s),
            SpectrumFileError::IO(e) => Self::from(e),
        }
    }
}

impl From<FileWriteError> for RtlobsError {
    fn from(e: FileWriteError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<std::io::Error> for RtlobsError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
