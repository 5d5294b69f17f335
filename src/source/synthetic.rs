// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A deterministic stand-in for a receiver.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::{SampleBlock, SampleSource, SourceError};
use crate::c64;

/// A complex sinusoid at an absolute (sky) frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    /// \[Hz\]
    pub freq: f64,

    /// Peak amplitude of each of I and Q.
    pub amplitude: f64,
}

impl Tone {
    pub fn new(freq: f64, amplitude: f64) -> Tone {
        Tone { freq, amplitude }
    }
}

/// Sums tones mixed down to the current centre frequency, plus an optional
/// constant DC offset (the receiver's "DC spike").
///
/// Each tone keeps its own phase across reads and retunes, so a long
/// observation looks like one continuous stream.
pub struct SyntheticSource {
    tones: Vec<Tone>,
    phases: Vec<f64>,
    dc_offset: c64,
    /// A tone only present while a digital output line is high, standing in
    /// for a switched noise source.
    switched: Option<(u8, Tone, f64)>,
    rate: f64,
    center_freq: f64,
    gain: f64,
    digital_outputs: u32,
    closed: bool,
    /// Reads succeed this many times, then fail.
    fail_after: Option<usize>,
    reads: usize,
    history: Vec<SourceEvent>,
}

/// Everything that has been asked of a [`SyntheticSource`], in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceEvent {
    Read(usize),
    Retune(f64),
    DigitalOutput { bit: u8, value: bool },
    Close,
}

impl SyntheticSource {
    pub fn new(tones: Vec<Tone>) -> SyntheticSource {
        let phases = vec![0.0; tones.len()];
        SyntheticSource {
            tones,
            phases,
            dc_offset: c64::default(),
            switched: None,
            rate: crate::constants::DEFAULT_SAMPLE_RATE,
            center_freq: crate::constants::DEFAULT_CENTER_FREQ,
            gain: crate::constants::DEFAULT_GAIN,
            digital_outputs: 0,
            closed: false,
            fail_after: None,
            reads: 0,
            history: vec![],
        }
    }

    pub fn with_dc_offset(mut self, dc_offset: c64) -> SyntheticSource {
        self.dc_offset = dc_offset;
        self
    }

    /// Add `tone` to the output only while digital output `bit` is high.
    pub fn with_switched_tone(mut self, bit: u8, tone: Tone) -> SyntheticSource {
        self.switched = Some((bit, tone, 0.0));
        self
    }

    /// Make every read after the first `reads` fail with an I/O error.
    pub fn with_read_failure_after(mut self, reads: usize) -> SyntheticSource {
        self.fail_after = Some(reads);
        self
    }

    pub fn history(&self) -> &[SourceEvent] {
        &self.history
    }

    pub fn digital_output(&self, bit: u8) -> bool {
        bit < 32 && self.digital_outputs & (1 << bit) != 0
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Add `tone` to every sample of `out` starting at `phase`, and return the
/// phase following the last sample.
fn add_tone(out: &mut [c64], tone: Tone, phase: f64, center_freq: f64, rate: f64) -> f64 {
    let step = TAU * (tone.freq - center_freq) / rate;
    for (k, s) in out.iter_mut().enumerate() {
        *s += c64::from_polar(tone.amplitude, phase + step * k as f64);
    }
    (phase + step * out.len() as f64).rem_euclid(TAU)
}

impl SampleSource for SyntheticSource {
    fn configure(&mut self, rate: f64, center_freq: f64, gain: f64) -> Result<(), SourceError> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(SourceError::Configure(format!(
                "sample rate must be positive, got {rate}"
            )));
        }
        self.rate = rate;
        self.center_freq = center_freq;
        self.gain = gain;
        Ok(())
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn center_freq(&self) -> f64 {
        self.center_freq
    }

    fn read_block(&mut self, n: usize) -> Result<SampleBlock, SourceError> {
        if self.closed {
            return Err(SourceError::Closed);
        }
        if self.fail_after.map_or(false, |max| self.reads >= max) {
            return Err(SourceError::IO(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "synthetic read failure",
            )));
        }
        self.reads += 1;
        self.history.push(SourceEvent::Read(n));

        let mut block = vec![self.dc_offset; n];
        for (tone, phase) in self.tones.iter().zip(self.phases.iter_mut()) {
            *phase = add_tone(&mut block, *tone, *phase, self.center_freq, self.rate);
        }
        if let Some((bit, tone, phase)) = self.switched.as_mut() {
            if *bit < 32 && self.digital_outputs & (1 << *bit) != 0 {
                *phase = add_tone(&mut block, *tone, *phase, self.center_freq, self.rate);
            }
        }
        Ok(block)
    }

    fn retune(&mut self, center_freq: f64) -> Result<(), SourceError> {
        if self.closed {
            return Err(SourceError::Closed);
        }
        if !center_freq.is_finite() {
            return Err(SourceError::Retune {
                freq: center_freq,
                reason: "not a finite frequency".to_string(),
            });
        }
        self.history.push(SourceEvent::Retune(center_freq));
        self.center_freq = center_freq;
        Ok(())
    }

    fn set_digital_output(&mut self, bit: u8, value: bool) -> Result<(), SourceError> {
        if bit >= 32 {
            return Err(SourceError::DigitalOutput {
                bit,
                reason: "only bits 0 to 31 exist".to_string(),
            });
        }
        self.history.push(SourceEvent::DigitalOutput { bit, value });
        if value {
            self.digital_outputs |= 1 << bit;
        } else {
            self.digital_outputs &= !(1 << bit);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), SourceError> {
        self.history.push(SourceEvent::Close);
        self.closed = true;
        Ok(())
    }
}
