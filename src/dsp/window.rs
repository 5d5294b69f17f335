// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::f64::consts::TAU;

use ndarray::{Array1, ArrayView1};

/// A periodic ("DFT-even") Hann window of length `n`, as used for spectral
/// analysis. A length-1 window is a single 1.
pub fn hann(n: usize) -> Array1<f64> {
    if n == 1 {
        return Array1::ones(1);
    }
    Array1::from_iter((0..n).map(|i| 0.5 - 0.5 * (TAU * i as f64 / n as f64).cos()))
}

/// The factor that turns a periodogram normalised as a power spectrum into
/// one normalised as a power spectral density times the sample rate, i.e.
/// `(Σw)² / Σw²`. It depends only on the window.
pub fn psd_correction(window: ArrayView1<f64>) -> f64 {
    let sum = window.sum();
    let sum_sq = window.dot(&window);
    sum * sum / sum_sq
}
