// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Frequency-switched spectrum acquisition.
//!
//! The receiver alternates between the ON frequency `fc` and the OFF frequency
//! `fthrow`, dwelling on each for `1 / fswitch` seconds. Blocks from each dwell
//! go to that frequency's accumulator. The two averaged spectra are returned
//! in linear power units, ready to be [folded](crate::fold).


use chrono::Utc;
use log::{debug, info, warn};
use strum_macros::Display;

use crate::{
    constants::MAX_RECOMMENDED_SWITCH_FREQ,
    dsp::{centred_freqs, PeriodogramDevice, PeriodogramSettings},
    error::{check_freq, check_rate, check_t_int, ConfigError, DomainError, RadiometerError},
    fold::bin_throw,
    misc::{local_timestamp, make_block_progress_bar},
    source::{read_exact_block, SampleSource},
    spectrum::{SpectralAccumulator, SpectrumEstimate},
};

/// How an integration is split into dwells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellPlan {
    /// `floor(rate * t_int)`
    pub samples_total: usize,

    /// `floor(rate / fswitch)`
    pub samples_per_dwell: usize,

    /// `floor(samples_per_dwell / block_size)`
    pub blocks_per_dwell: usize,

    /// `floor(samples_total / samples_per_dwell)`; ON and OFF dwells
    /// alternate, starting with ON.
    pub num_dwells: usize,
}

impl DwellPlan {
    pub fn new(
        rate: f64,
        block_size: usize,
        t_int: f64,
        fswitch: f64,
    ) -> Result<DwellPlan, ConfigError> {
        if block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        check_t_int(t_int)?;
        check_rate(rate)?;
        if !(fswitch.is_finite() && fswitch > 0.0) {
            return Err(ConfigError::BadSwitchFreq(fswitch));
        }
        let min_t_int = 2.0 / fswitch;
        if t_int < min_t_int {
            return Err(ConfigError::IntegrationShorterThanSwitchCycle {
                t_int,
                fswitch,
                min_t_int,
            });
        }

        let samples_total = (rate * t_int).floor() as usize;
        let samples_per_dwell = (rate / fswitch).floor() as usize;
        let blocks_per_dwell = samples_per_dwell / block_size;
        if blocks_per_dwell == 0 {
            return Err(ConfigError::DwellShorterThanBlock {
                samples_per_dwell,
                block_size,
            });
        }

        Ok(DwellPlan {
            samples_total,
            samples_per_dwell,
            blocks_per_dwell,
            num_dwells: samples_total / samples_per_dwell,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DwellRole {
    #[strum(serialize = "ON")]
    On,
    #[strum(serialize = "OFF")]
    Off,
}

/// The spectrum being built up at one of the two frequencies.
pub struct DwellRecord {
    pub role: DwellRole,
    pub center_freq: f64,
    pub accumulator: SpectralAccumulator,
    pub dwell_count: usize,
}

impl DwellRecord {
    fn new(
        role: DwellRole,
        center_freq: f64,
        settings: PeriodogramSettings,
        device: PeriodogramDevice,
    ) -> DwellRecord {
        DwellRecord {
            role,
            center_freq,
            accumulator: SpectralAccumulator::new(settings, device),
            dwell_count: 0,
        }
    }

    /// Average by this record's own block count, in linear power units on
    /// ascending sky frequencies.
    pub fn into_spectrum(self, rate: f64) -> Result<SpectrumEstimate, DomainError> {
        let power = self.accumulator.average()?;
        let freqs = centred_freqs(power.len(), rate, self.center_freq);
        Ok(SpectrumEstimate { freqs, power })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FswitchSettings {
    /// Samples per read.
    pub block_size: usize,

    /// The number of frequency bins.
    pub num_bins: usize,

    /// The ON frequency \[Hz\].
    pub fc: f64,

    /// The OFF frequency \[Hz\].
    pub fthrow: f64,

    /// The integration time over both frequencies \[s\].
    pub t_int: f64,

    /// Switches per second \[Hz\].
    pub fswitch: f64,

    pub device: PeriodogramDevice,

    /// If set, this digital output is driven high during ON dwells and low
    /// during OFF dwells (and low once acquisition stops).
    pub sync_output: Option<u8>,
}

impl FswitchSettings {
    /// Check these settings against a sample rate without touching a
    /// receiver. This includes whether the ON and OFF spectra can be folded.
    pub fn validate(&self, rate: f64) -> Result<DwellPlan, ConfigError> {
        check_freq("ON frequency", self.fc)?;
        check_freq("OFF frequency", self.fthrow)?;
        let plan = DwellPlan::new(rate, self.block_size, self.t_int, self.fswitch)?;
        PeriodogramSettings::full(self.num_bins).validate(self.block_size)?;
        self.bin_throw(rate)?;
        Ok(plan)
    }

    /// The frequency throw in bins of the spectra that [`acquire`] would
    /// produce at this sample rate.
    pub fn bin_throw(&self, rate: f64) -> Result<usize, ConfigError> {
        let freqs_on = centred_freqs(self.num_bins, rate, self.fc);
        let freqs_off = centred_freqs(self.num_bins, rate, self.fthrow);
        bin_throw(freqs_on.view(), freqs_off.view())
    }
}

/// Acquire ON and OFF spectra by frequency switching. Returns `(on, off)`.
///
/// Any retune or read failure aborts the acquisition; nothing partial is
/// returned. The source is borrowed and isn't closed here.
pub fn acquire<S: SampleSource + ?Sized>(
    source: &mut S,
    settings: &FswitchSettings,
) -> Result<(SpectrumEstimate, SpectrumEstimate), RadiometerError> {
    let FswitchSettings {
        block_size,
        num_bins,
        fc,
        fthrow,
        t_int,
        fswitch,
        device,
        sync_output,
    } = *settings;
    let rate = source.rate();
    let plan = settings.validate(rate)?;
    let periodogram = PeriodogramSettings::full(num_bins);

    if fswitch > MAX_RECOMMENDED_SWITCH_FREQ {
        warn!("Switching faster than {MAX_RECOMMENDED_SWITCH_FREQ} Hz means more retunings; a greater fraction of the observation will be spent retuning, so reaching the requested integration time will take longer");
    }
    debug!("  num samples per call: {block_size}");
    debug!("  requested integration time: {t_int} s");
    debug!("  => num samples to collect: {}", plan.samples_total);
    debug!("  => est. num of calls: {}", plan.samples_total / block_size);
    debug!("  => num samples on each dwell: {}", plan.samples_per_dwell);
    debug!("  => num of calls on each dwell: {}", plan.blocks_per_dwell);
    debug!("  => num dwells total: {}", plan.num_dwells);

    let mut on = DwellRecord::new(DwellRole::On, fc, periodogram, device);
    let mut off = DwellRecord::new(DwellRole::Off, fthrow, periodogram, device);

    // Whatever happens, leave the sync output low.
    let mut source = scopeguard::guard(source, |source| {
        if let Some(bit) = sync_output {
            if let Err(e) = source.set_digital_output(bit, false) {
                warn!("Couldn't reset digital output {bit}: {e}");
            }
        }
    });

    let start = Utc::now();
    info!("Integration began at {}", local_timestamp(start));
    let pb = make_block_progress_bar(Some(plan.num_dwells as u64), "Dwelling".to_string());
    for i_dwell in 0..plan.num_dwells {
        let record = if i_dwell % 2 == 0 { &mut on } else { &mut off };
        source.retune(record.center_freq)?;
        if let Some(bit) = sync_output {
            source.set_digital_output(bit, record.role == DwellRole::On)?;
        }
        for _ in 0..plan.blocks_per_dwell {
            let mut block = read_exact_block(&mut **source, block_size)?;
            record.accumulator.add_block(&mut block);
        }
        record.dwell_count += 1;
        pb.inc(1);
    }
    pb.finish();
    drop(source);

    let elapsed = Utc::now() - start;
    info!(
        "Integration ended at {} after {:.3} seconds",
        local_timestamp(Utc::now()),
        elapsed.num_milliseconds() as f64 / 1e3
    );
    let count = on.accumulator.count() + off.accumulator.count();
    debug!("{count} spectra were measured, split between {fc} and {fthrow} Hz");
    debug!(
        "for an effective integration time of {:.2} s",
        (count * block_size) as f64 / rate
    );

    Ok((on.into_spectrum(rate)?, off.into_spectrum(rate)?))
}
