// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sources of complex baseband samples.
//!
//! A [`SampleSource`] is normally a USB radio (driven by code outside of this
//! crate); here we also provide a replayer for raw IQ captures and a
//! deterministic synthetic source. Every observing mode only ever talks to the
//! trait.

mod error;
mod iq_file;
mod synthetic;

pub use error::SourceError;
pub use iq_file::{IqFileSource, IqFormat};
pub use synthetic::{SourceEvent, SyntheticSource, Tone};

use log::{debug, warn};

use crate::c64;

/// One read's worth of samples. Its length is always the number of samples
/// requested; it's consumed by exactly one integrator or accumulator call.
pub type SampleBlock = Vec<c64>;

/// The capability an observing mode needs from a receiver.
pub trait SampleSource {
    /// Set the sample rate \[Hz\], centre frequency \[Hz\] and gain \[dB\].
    fn configure(&mut self, rate: f64, center_freq: f64, gain: f64) -> Result<(), SourceError>;

    /// The current sample rate \[Hz\].
    fn rate(&self) -> f64;

    /// The current centre frequency \[Hz\].
    fn center_freq(&self) -> f64;

    /// Block until `n` samples are available and return them.
    fn read_block(&mut self, n: usize) -> Result<SampleBlock, SourceError>;

    /// Change the centre frequency mid-stream.
    fn retune(&mut self, center_freq: f64) -> Result<(), SourceError>;

    /// Drive a digital output line, e.g. to switch a noise source.
    fn set_digital_output(&mut self, bit: u8, value: bool) -> Result<(), SourceError>;

    /// Release the underlying device. Subsequent reads fail.
    fn close(&mut self) -> Result<(), SourceError>;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn configure(&mut self, rate: f64, center_freq: f64, gain: f64) -> Result<(), SourceError> {
        (**self).configure(rate, center_freq, gain)
    }

    fn rate(&self) -> f64 {
        (**self).rate()
    }

    fn center_freq(&self) -> f64 {
        (**self).center_freq()
    }

    fn read_block(&mut self, n: usize) -> Result<SampleBlock, SourceError> {
        (**self).read_block(n)
    }

    fn retune(&mut self, center_freq: f64) -> Result<(), SourceError> {
        (**self).retune(center_freq)
    }

    fn set_digital_output(&mut self, bit: u8, value: bool) -> Result<(), SourceError> {
        (**self).set_digital_output(bit, value)
    }

    fn close(&mut self) -> Result<(), SourceError> {
        (**self).close()
    }
}

/// Read a block and make sure it's as long as was asked for; the averaging
/// denominators all assume full blocks.
pub(crate) fn read_exact_block<S: SampleSource + ?Sized>(
    source: &mut S,
    n: usize,
) -> Result<SampleBlock, SourceError> {
    let block = source.read_block(n)?;
    if block.len() != n {
        return Err(SourceError::ShortBlock {
            requested: n,
            got: block.len(),
        });
    }
    Ok(block)
}

/// Take ownership of an opened source, run `f` with it, and close it on every
/// way out of here (success, error or panic).
///
/// Observing functions are only ever handed `&mut S`; they never close the
/// source themselves, so whoever opened it should use this.
pub fn with_owned_source<S, T, E, F>(source: S, f: F) -> Result<T, E>
where
    S: SampleSource,
    F: FnOnce(&mut S) -> Result<T, E>,
{
    let mut source = scopeguard::guard(source, |mut source| match source.close() {
        Ok(()) => debug!("Closed the sample source"),
        Err(e) => warn!("Couldn't cleanly close the sample source: {e}"),
    });
    f(&mut *source)
}
