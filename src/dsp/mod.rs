// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Signal-processing building blocks shared by every observing mode.

mod periodogram;
mod window;

pub use periodogram::{
    CpuPeriodogram, ParallelCpuPeriodogram, PeriodogramBackend, PeriodogramDevice,
    PeriodogramSettings,
};
pub use window::{hann, psd_correction};

use ndarray::Array1;

#[allow(non_camel_case_types)]
pub type c64 = num_complex::Complex<f64>;

/// Subtract the block mean from the real and imaginary parts independently.
/// This removes the receiver's DC offset (the "spike" at zero frequency).
///
/// A block of identical samples becomes all zeros.
pub fn remove_dc_offset(block: &mut [c64]) {
    if block.is_empty() {
        return;
    }
    let mean = block.iter().sum::<c64>() / block.len() as f64;
    block.iter_mut().for_each(|s| *s -= mean);
}

/// The total power of a block: sum of |I|² + |Q|², into unit impedance.
pub fn block_power(block: &[c64]) -> f64 {
    block.iter().map(|s| s.norm_sqr()).sum()
}

/// Move the zero-frequency bin of FFT-ordered data to the middle, so that bins
/// are in ascending frequency.
pub fn fftshift<T>(data: &mut [T]) {
    let n = data.len();
    data.rotate_right(n / 2);
}

/// The frequency \[Hz\] of each bin of an `n`-point FFT of data sampled at
/// `rate`, in FFT order (zero, positive frequencies, then negative ones).
pub fn fftfreq(n: usize, rate: f64) -> Array1<f64> {
    let num_positive = (n + 1) / 2;
    Array1::from_iter((0..n).map(|i| {
        let k = if i < num_positive {
            i as f64
        } else {
            i as f64 - n as f64
        };
        k * rate / n as f64
    }))
}

/// The ascending sky frequencies \[Hz\] of an `n`-bin spectrum centred on
/// `center_freq`.
pub fn centred_freqs(n: usize, rate: f64, center_freq: f64) -> Array1<f64> {
    let mut freqs = fftfreq(n, rate);
    if let Some(slice) = freqs.as_slice_mut() {
        fftshift(slice);
    }
    freqs + center_freq
}
