// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Total-power and spectral radiometry for radio telescopes built on
software-defined-radio receivers.

Complex baseband samples are pulled from a [`SampleSource`] and reduced to
calibrated power, averaged power-spectral-density estimates, or
frequency-switched and folded spectra.
 */

pub mod calibrate;
mod cli;
pub mod constants;
pub mod dicke;
pub mod dsp;
pub mod error;
pub mod fold;
pub mod fswitch;
pub mod io;
mod misc;
mod params;
pub mod source;
pub mod spectrum;
pub mod total_power;

// Re-exports.
pub use calibrate::{y_factor, CalibrationResult};
pub use cli::{Rtlobs, RtlobsError};
pub use dsp::{c64, PeriodogramDevice};
pub use error::{ConfigError, DomainError, RadiometerError};
pub use fold::{fold, FoldedSpectrum};
pub use fswitch::{acquire, DwellPlan, FswitchSettings};
pub use source::{with_owned_source, SampleBlock, SampleSource, SourceError};
pub use spectrum::{accumulate, SpectralAccumulator, SpectrumEstimate, SpectrumSettings};
pub use total_power::{integrate, integrate_async, IntegrationLimit, LimitPolicy, TotalPower};

use crossbeam_utils::atomic::AtomicCell;

/// Should we display progress bars? By default, no; the binary turns them on
/// unless the user asks otherwise.
pub(crate) static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
