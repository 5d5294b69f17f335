// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Replay raw IQ captures as though they were a live receiver.

use std::{
    fs::File,
    io::{BufReader, ErrorKind, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use super::{SampleBlock, SampleSource, SourceError};
use crate::c64;

/// On-disk sample formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize)]
pub enum IqFormat {
    /// Interleaved unsigned 8-bit I and Q, as written by `rtl_sdr`.
    #[strum(serialize = "cu8")]
    #[serde(rename = "cu8")]
    Cu8,

    /// Interleaved little-endian 32-bit float I and Q.
    #[strum(serialize = "cf32")]
    #[serde(rename = "cf32")]
    Cf32,
}

impl IqFormat {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            IqFormat::Cu8 => 2,
            IqFormat::Cf32 => 8,
        }
    }

    fn decode(self, bytes: &[u8], out: &mut Vec<c64>) {
        match self {
            IqFormat::Cu8 => out.extend(bytes.chunks_exact(2).map(|iq| {
                c64::new(
                    f64::from(iq[0]) / 127.5 - 1.0,
                    f64::from(iq[1]) / 127.5 - 1.0,
                )
            })),
            IqFormat::Cf32 => out.extend(bytes.chunks_exact(8).map(|iq| {
                c64::new(
                    f64::from(LittleEndian::read_f32(&iq[..4])),
                    f64::from(LittleEndian::read_f32(&iq[4..])),
                )
            })),
        }
    }
}

/// A [`SampleSource`] backed by a raw IQ file.
///
/// Retuning only changes the reported centre frequency; the samples are
/// whatever was captured. Digital outputs are remembered so they can be
/// inspected, but drive nothing.
pub struct IqFileSource {
    path: PathBuf,
    reader: Option<BufReader<File>>,
    format: IqFormat,
    looping: bool,
    rate: f64,
    center_freq: f64,
    gain: f64,
    digital_outputs: u32,
    samples_read: u64,
}

impl IqFileSource {
    /// Open an IQ file. With `looping`, the file is rewound whenever it runs
    /// out, otherwise running out is an error.
    pub fn open<P: AsRef<Path>>(
        path: P,
        format: IqFormat,
        looping: bool,
    ) -> Result<IqFileSource, SourceError> {
        let path = path.as_ref().to_path_buf();
        let reader = BufReader::new(File::open(&path)?);
        debug!("Opened IQ file {} ({format})", path.display());
        Ok(IqFileSource {
            path,
            reader: Some(reader),
            format,
            looping,
            rate: crate::constants::DEFAULT_SAMPLE_RATE,
            center_freq: crate::constants::DEFAULT_CENTER_FREQ,
            gain: crate::constants::DEFAULT_GAIN,
            digital_outputs: 0,
            samples_read: 0,
        })
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// The last value driven onto a digital output line.
    pub fn digital_output(&self, bit: u8) -> bool {
        bit < 32 && self.digital_outputs & (1 << bit) != 0
    }

    pub fn samples_read(&self) -> u64 {
        self.samples_read
    }
}

impl SampleSource for IqFileSource {
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
        let reader = self.reader.as_mut().ok_or(SourceError::Closed)?;
        let bytes_per_sample = self.format.bytes_per_sample();
        let mut bytes = vec![0; n * bytes_per_sample];
        let mut filled = 0;
        // How much was filled when the file was last rewound. Hitting the end
        // again without any progress means the file has no whole samples.
        let mut filled_at_rewind = None;
        while filled < bytes.len() {
            match reader.read(&mut bytes[filled..]) {
                Ok(0) => {
                    // Drop a trailing partial sample so the samples after a
                    // rewind stay aligned.
                    filled -= filled % bytes_per_sample;
                    if !self.looping || filled_at_rewind == Some(filled) {
                        return Err(SourceError::EndOfFile {
                            file: self.path.display().to_string(),
                            samples_read: self.samples_read + (filled / bytes_per_sample) as u64,
                        });
                    }
                    trace!("Rewinding {}", self.path.display());
                    reader.seek(SeekFrom::Start(0))?;
                    filled_at_rewind = Some(filled);
                }
                Ok(m) => filled += m,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let mut block = Vec::with_capacity(n);
        self.format.decode(&bytes, &mut block);
        self.samples_read += n as u64;
        Ok(block)
    }

    fn retune(&mut self, center_freq: f64) -> Result<(), SourceError> {
        if self.reader.is_none() {
            return Err(SourceError::Closed);
        }
        if !center_freq.is_finite() {
            return Err(SourceError::Retune {
                freq: center_freq,
                reason: "not a finite frequency".to_string(),
            });
        }
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
        if value {
            self.digital_outputs |= 1 << bit;
        } else {
            self.digital_outputs &= !(1 << bit);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), SourceError> {
        self.reader = None;
        Ok(())
    }
}
