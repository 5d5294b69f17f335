// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters for each observing mode.
//!
//! The code here is kind of "mirroring" the code within the `cli` module; the
//! idea is that `cli` is unparsed, user-facing code, whereas parameters have
//! been parsed and are ready to be used directly. Each set of parameters can
//! `run`, which opens the sample source it needs, observes, closes the source
//! and reports or writes the result.

mod dicke;
mod fold;
mod fswitch;
mod source;
mod spectrum;
mod total_power;
mod y_factor;

pub(crate) use dicke::DickeParams;
pub(crate) use fold::FoldParams;
pub(crate) use fswitch::FswitchParams;
pub(crate) use source::{SourceKind, SourceParams};
pub(crate) use spectrum::SpectrumParams;
pub(crate) use total_power::TotalPowerParams;
pub(crate) use y_factor::{LoadPower, YFactorParams};

use thiserror::Error;

use crate::{
    error::RadiometerError,
    io::{FileWriteError, SpectrumFileError},
    source::SourceError,
};

/// Anything that can go wrong after parameters have been parsed.
#[derive(Error, Debug)]
pub(crate) enum ObserveError {
    #[error(transparent)]
    Radiometer(#[from] RadiometerError),

    /// The source couldn't be opened or configured.
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    SpectrumFile(#[from] SpectrumFileError),

    #[error(transparent)]
    FileWrite(#[from] FileWriteError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
