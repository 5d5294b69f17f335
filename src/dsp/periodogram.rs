// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Windowed periodograms of sample blocks (Bartlett's method).
//!
//! A block is split into non-overlapping segments of `nperseg` samples; each
//! segment is Hann-windowed, zero-padded to `nfft` points and transformed.
//! The squared magnitudes are normalised as a power spectrum (divided by
//! `(Σw)²`) and averaged over the block's segments. Results are two-sided and
//! in FFT order.

use std::sync::Arc;

use ndarray::ArrayViewMut1;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use super::{c64, hann};
use crate::{constants::MAX_NPERSEG, error::ConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodogramSettings {
    /// The number of samples in each segment (and the window length).
    pub nperseg: usize,

    /// The FFT length, i.e. the number of frequency bins.
    pub nfft: usize,
}

impl PeriodogramSettings {
    /// Segments no longer than [`MAX_NPERSEG`], transformed into `num_bins`
    /// bins.
    pub fn capped(num_bins: usize) -> PeriodogramSettings {
        PeriodogramSettings {
            nperseg: num_bins.min(MAX_NPERSEG),
            nfft: num_bins,
        }
    }

    /// Segments as long as the FFT.
    pub fn full(num_bins: usize) -> PeriodogramSettings {
        PeriodogramSettings {
            nperseg: num_bins,
            nfft: num_bins,
        }
    }

    /// Check that these settings can be used on blocks of `block_size`
    /// samples.
    pub fn validate(&self, block_size: usize) -> Result<(), ConfigError> {
        if self.nfft < 2 {
            return Err(ConfigError::TooFewBins(self.nfft));
        }
        if block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if block_size < self.nperseg {
            return Err(ConfigError::BlockShorterThanSegment {
                block_size,
                nperseg: self.nperseg,
            });
        }
        Ok(())
    }

    /// The number of whole segments in a block; trailing samples are unused.
    pub fn num_segments(&self, block_size: usize) -> usize {
        block_size / self.nperseg
    }
}

/// Something that adds the periodogram of a block to a running sum.
pub trait PeriodogramBackend {
    fn settings(&self) -> PeriodogramSettings;

    /// Add the periodogram of `block` to `acc` (FFT order, length `nfft`).
    /// `acc` is not cleared. `block` must hold at least one segment.
    fn accumulate(&mut self, block: &[c64], acc: ArrayViewMut1<f64>);
}

/// Where periodograms are computed.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum PeriodogramDevice {
    /// One thread.
    #[default]
    #[strum(serialize = "cpu")]
    #[serde(rename = "cpu")]
    Cpu,

    /// The segments of each block are transformed in parallel.
    #[strum(serialize = "cpu-parallel")]
    #[serde(rename = "cpu-parallel")]
    CpuParallel,
}

impl PeriodogramDevice {
    pub fn backend(self, settings: PeriodogramSettings) -> Box<dyn PeriodogramBackend + Send> {
        match self {
            PeriodogramDevice::Cpu => Box::new(CpuPeriodogram::new(settings)),
            PeriodogramDevice::CpuParallel => Box::new(ParallelCpuPeriodogram::new(settings)),
        }
    }

    /// A description of the device, for the user.
    pub(crate) fn get_device_info(self) -> String {
        match self {
            PeriodogramDevice::Cpu => format!("{} CPU", std::env::consts::ARCH),
            PeriodogramDevice::CpuParallel => format!(
                "{} CPU ({} threads)",
                std::env::consts::ARCH,
                rayon::current_num_threads()
            ),
        }
    }
}

/// Window, zero-pad and transform one segment, adding the squared magnitudes
/// to `out`.
fn add_segment_power(
    fft: &dyn Fft<f64>,
    window: &[f64],
    segment: &[c64],
    buffer: &mut [c64],
    scratch: &mut [c64],
    out: &mut [f64],
) {
    buffer.fill(c64::default());
    buffer
        .iter_mut()
        .zip(segment.iter().zip(window))
        .for_each(|(b, (s, w))| *b = *s * *w);
    fft.process_with_scratch(buffer, scratch);
    out.iter_mut()
        .zip(buffer.iter())
        .for_each(|(o, b)| *o += b.norm_sqr());
}

struct Plan {
    settings: PeriodogramSettings,
    window: Vec<f64>,
    /// `1 / (Σw)²`
    scale: f64,
    fft: Arc<dyn Fft<f64>>,
}

impl Plan {
    fn new(settings: PeriodogramSettings) -> Plan {
        let window = hann(settings.nperseg).to_vec();
        let sum: f64 = window.iter().sum();
        let fft = FftPlanner::new().plan_fft_forward(settings.nfft);
        Plan {
            settings,
            window,
            scale: 1.0 / (sum * sum),
            fft,
        }
    }

    fn segment_scale(&self, block_len: usize) -> f64 {
        self.scale / self.settings.num_segments(block_len) as f64
    }
}

/// A single-threaded periodogram.
pub struct CpuPeriodogram {
    plan: Plan,
    buffer: Vec<c64>,
    scratch: Vec<c64>,
    block_sum: Vec<f64>,
}

impl CpuPeriodogram {
    pub fn new(settings: PeriodogramSettings) -> CpuPeriodogram {
        let plan = Plan::new(settings);
        let scratch = vec![c64::default(); plan.fft.get_inplace_scratch_len()];
        CpuPeriodogram {
            plan,
            buffer: vec![c64::default(); settings.nfft],
            scratch,
            block_sum: vec![0.0; settings.nfft],
        }
    }
}

impl PeriodogramBackend for CpuPeriodogram {
    fn settings(&self) -> PeriodogramSettings {
        self.plan.settings
    }

    fn accumulate(&mut self, block: &[c64], mut acc: ArrayViewMut1<f64>) {
        self.block_sum.fill(0.0);
        for segment in block.chunks_exact(self.plan.settings.nperseg) {
            add_segment_power(
                self.plan.fft.as_ref(),
                &self.plan.window,
                segment,
                &mut self.buffer,
                &mut self.scratch,
                &mut self.block_sum,
            );
        }
        let scale = self.plan.segment_scale(block.len());
        acc.iter_mut()
            .zip(self.block_sum.iter())
            .for_each(|(a, s)| *a += s * scale);
    }
}

/// A periodogram whose segments are transformed on the rayon thread pool.
pub struct ParallelCpuPeriodogram {
    plan: Plan,
}

impl ParallelCpuPeriodogram {
    pub fn new(settings: PeriodogramSettings) -> ParallelCpuPeriodogram {
        ParallelCpuPeriodogram {
            plan: Plan::new(settings),
        }
    }
}

impl PeriodogramBackend for ParallelCpuPeriodogram {
    fn settings(&self) -> PeriodogramSettings {
        self.plan.settings
    }

    fn accumulate(&mut self, block: &[c64], mut acc: ArrayViewMut1<f64>) {
        let plan = &self.plan;
        let nfft = plan.settings.nfft;
        let scratch_len = plan.fft.get_inplace_scratch_len();
        let block_sum = block
            .par_chunks_exact(plan.settings.nperseg)
            .fold(
                || {
                    (
                        vec![0.0; nfft],
                        vec![c64::default(); nfft],
                        vec![c64::default(); scratch_len],
                    )
                },
                |(mut out, mut buffer, mut scratch), segment| {
                    add_segment_power(
                        plan.fft.as_ref(),
                        &plan.window,
                        segment,
                        &mut buffer,
                        &mut scratch,
                        &mut out,
                    );
                    (out, buffer, scratch)
                },
            )
            .map(|(out, _, _)| out)
            .reduce(
                || vec![0.0; nfft],
                |mut a, b| {
                    a.iter_mut().zip(b).for_each(|(a, b)| *a += b);
                    a
                },
            );
        let scale = plan.segment_scale(block.len());
        acc.iter_mut()
            .zip(block_sum)
            .for_each(|(a, s)| *a += s * scale);
    }
}
