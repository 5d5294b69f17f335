// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Averaged power-spectral-density estimates (Bartlett's method).


use chrono::Utc;
use log::{debug, info};
use ndarray::{Array1, ArrayView1};

use crate::{
    dsp::{
        c64, centred_freqs, fftshift, hann, psd_correction, remove_dc_offset, PeriodogramBackend,
        PeriodogramDevice, PeriodogramSettings,
    },
    error::{check_rate, check_t_int, DomainError, RadiometerError},
    misc::{local_timestamp, make_block_progress_bar},
    source::{read_exact_block, SampleSource},
};

/// A spectrum; `freqs` are ascending sky frequencies \[Hz\], index-aligned
/// with `power`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumEstimate {
    pub freqs: Array1<f64>,
    pub power: Array1<f64>,
}

impl SpectrumEstimate {
    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    /// The frequency of the middle bin \[Hz\].
    pub fn centre_freq(&self) -> Option<f64> {
        self.freqs.get(self.freqs.len() / 2).copied()
    }

    pub fn freqs(&self) -> ArrayView1<f64> {
        self.freqs.view()
    }

    pub fn power(&self) -> ArrayView1<f64> {
        self.power.view()
    }
}

/// Sums the periodograms of DC-corrected blocks, then averages them.
pub struct SpectralAccumulator {
    backend: Box<dyn PeriodogramBackend + Send>,
    /// FFT order.
    sum: Array1<f64>,
    count: usize,
}

impl SpectralAccumulator {
    pub fn new(settings: PeriodogramSettings, device: PeriodogramDevice) -> SpectralAccumulator {
        SpectralAccumulator {
            backend: device.backend(settings),
            sum: Array1::zeros(settings.nfft),
            count: 0,
        }
    }

    pub fn settings(&self) -> PeriodogramSettings {
        self.backend.settings()
    }

    /// Remove the block's DC offset and add its periodogram.
    pub fn add_block(&mut self, block: &mut [c64]) {
        remove_dc_offset(block);
        self.backend.accumulate(block, self.sum.view_mut());
        self.count += 1;
    }

    /// The number of blocks added so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The mean periodogram, in ascending-frequency order, as a power
    /// spectrum.
    pub fn average(&self) -> Result<Array1<f64>, DomainError> {
        if self.count == 0 {
            return Err(DomainError::NoBlocks);
        }
        let mut shifted = self.sum.to_vec();
        fftshift(&mut shifted);
        Ok(Array1::from(shifted) / self.count as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumSettings {
    /// Samples per read.
    pub block_size: usize,

    /// The number of frequency bins.
    pub num_bins: usize,

    /// The integration time \[s\].
    pub t_int: f64,

    pub device: PeriodogramDevice,
}

/// Estimate the power spectral density of `source` over `t_int` seconds.
///
/// The returned power is `10·log10` of the density in (uncalibrated) units per
/// Hz. Configuration problems are reported before anything is read. The
/// source is borrowed and isn't closed here.
pub fn accumulate<S: SampleSource + ?Sized>(
    source: &mut S,
    settings: &SpectrumSettings,
) -> Result<SpectrumEstimate, RadiometerError> {
    let SpectrumSettings {
        block_size,
        num_bins,
        t_int,
        device,
    } = *settings;
    let periodogram = PeriodogramSettings::capped(num_bins);
    periodogram.validate(block_size)?;
    check_t_int(t_int)?;
    let rate = source.rate();
    check_rate(rate)?;
    let center_freq = source.center_freq();

    let num_samples = (rate * t_int).floor() as usize;
    let num_loops = num_samples / block_size + 1;
    debug!("  num samples per call: {block_size}");
    debug!("  requested integration time: {t_int} s");
    debug!("  => num samples to collect: {num_samples}");
    debug!("  => num of calls: {num_loops}");
    debug!(
        "  => nperseg {}, nfft {}, on {}",
        periodogram.nperseg,
        periodogram.nfft,
        device.get_device_info()
    );

    let mut acc = SpectralAccumulator::new(periodogram, device);
    let start = Utc::now();
    info!("Integration began at {}", local_timestamp(start));
    let pb = make_block_progress_bar(Some(num_loops as u64), "Integrating".to_string());
    for _ in 0..num_loops {
        let mut block = read_exact_block(source, block_size)?;
        acc.add_block(&mut block);
        pb.inc(1);
    }
    pb.finish();
    let elapsed = Utc::now() - start;
    info!(
        "Integration ended at {} after {:.3} seconds",
        local_timestamp(Utc::now()),
        elapsed.num_milliseconds() as f64 / 1e3
    );
    debug!(
        "{} spectra were measured at {} MHz, for an effective integration time of {:.2} s",
        acc.count(),
        center_freq / 1e6,
        (acc.count() * block_size) as f64 / rate
    );

    // Convert the power spectrum into a power spectral density.
    let correction = psd_correction(hann(periodogram.nperseg).view()) / rate;
    let power = (acc.average()? * correction).mapv_into(|p| 10.0 * p.log10());
    let freqs = centred_freqs(num_bins, rate, center_freq);

    Ok(SpectrumEstimate { freqs, power })
}
