// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Dicke switching.
//!
//! A calibration noise source is switched on and off between consecutive
//! blocks via one of the receiver's digital outputs. Differencing each
//! noise-off block against the noise-on block before it removes slow gain
//! drifts from the total-power time series.


use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::{
    dsp::{block_power, remove_dc_offset},
    error::{check_rate, check_t_int, ConfigError, RadiometerError},
    misc::{local_timestamp, make_block_progress_bar},
    source::{read_exact_block, SampleSource},
};

/// The total power of one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DickeSample {
    /// When the block was requested.
    pub timestamp: DateTime<Utc>,

    /// The block's summed power after DC correction.
    pub power: f64,

    /// Was the noise source on for this block?
    pub noise_on: bool,
}

/// The difference between a noise-off block and the noise-on block before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DickeDifference {
    /// Halfway between the two blocks' timestamps.
    pub timestamp: DateTime<Utc>,

    /// `p[i] - p[i-1]`
    pub power: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DickeSeries {
    pub samples: Vec<DickeSample>,
}

impl DickeSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// One difference per noise-off sample that has a predecessor.
    pub fn differences(&self) -> Vec<DickeDifference> {
        self.samples
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, s)| !s.noise_on)
            .map(|(i, s)| {
                let prev = &self.samples[i - 1];
                DickeDifference {
                    timestamp: prev.timestamp + (s.timestamp - prev.timestamp) / 2,
                    power: s.power - prev.power,
                }
            })
            .collect()
    }
}

/// The number of blocks [`dicke_switch`] reads: `floor(floor(rate * t) /
/// block_size)`, which must be at least one.
pub fn num_dicke_blocks(rate: f64, block_size: usize, t: f64) -> Result<usize, ConfigError> {
    if block_size == 0 {
        return Err(ConfigError::ZeroBlockSize);
    }
    check_t_int(t)?;
    check_rate(rate)?;
    let num_blocks = (rate * t).floor() as usize / block_size;
    if num_blocks == 0 {
        return Err(ConfigError::IntegrationShorterThanBlock {
            t_int: t,
            rate,
            block_size,
        });
    }
    Ok(num_blocks)
}

/// Record [`num_dicke_blocks`] blocks, toggling digital output `bit` before
/// each read (high first).
///
/// The output is driven low when this function returns, whether or not the
/// run succeeded. The source isn't closed.
pub fn dicke_switch<S: SampleSource + ?Sized>(
    source: &mut S,
    block_size: usize,
    t: f64,
    bit: u8,
) -> Result<DickeSeries, RadiometerError> {
    let rate = source.rate();
    let num_blocks = num_dicke_blocks(rate, block_size, t)?;
    debug!("  num samples per call: {block_size}");
    debug!("  requested integration time: {t} s");
    debug!("  => num samples to collect: {}", num_blocks * block_size);
    debug!("  => num of calls: {num_blocks}");
    debug!("  noise source on digital output {bit}");

    let mut source = scopeguard::guard(source, |source| {
        if let Err(e) = source.set_digital_output(bit, false) {
            warn!("Couldn't switch off the noise source on output {bit}: {e}");
        }
    });

    let mut series = DickeSeries {
        samples: Vec::with_capacity(num_blocks),
    };
    info!("Dicke switching began at {}", local_timestamp(Utc::now()));
    let pb = make_block_progress_bar(Some(num_blocks as u64), "Switching".to_string());
    let mut noise_on = true;
    for _ in 0..num_blocks {
        let timestamp = Utc::now();
        source.set_digital_output(bit, noise_on)?;
        let mut block = read_exact_block(&mut **source, block_size)?;
        remove_dc_offset(&mut block);
        series.samples.push(DickeSample {
            timestamp,
            power: block_power(&block),
            noise_on,
        });
        noise_on = !noise_on;
        pb.inc(1);
    }
    pb.finish();
    drop(source);
    info!("Dicke switching ended at {}", local_timestamp(Utc::now()));

    Ok(series)
}
