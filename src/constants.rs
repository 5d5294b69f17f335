// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Powers and frequencies are kept in
double precision from the moment samples leave the [`crate::SampleSource`].
 */

/// The default receiver sample rate \[Hz\]. For complex samples this is also
/// the instantaneous bandwidth.
pub const DEFAULT_SAMPLE_RATE: f64 = 2.32e6;

/// The default centre frequency \[Hz\]; just below the 21 cm hydrogen line.
pub const DEFAULT_CENTER_FREQ: f64 = 1.4204e9;

/// The default receiver gain \[dB\].
pub const DEFAULT_GAIN: f64 = 35.0;

/// The default number of samples requested from the source per read.
pub const DEFAULT_BLOCK_SIZE: usize = 262144;

/// The default number of frequency bins in a power spectrum.
pub const DEFAULT_NUM_BINS: usize = 2048;

/// The default frequency-switching rate \[Hz\].
pub const DEFAULT_SWITCH_FREQ: f64 = 10.0;

/// Switching faster than this \[Hz\] spends a noticeable fraction of the
/// observation retuning the receiver. It's allowed, but warned about.
pub const MAX_RECOMMENDED_SWITCH_FREQ: f64 = 10.0;

/// Spectrum-mode periodograms never use segments longer than this; it matches
/// the usual default segment length of Welch-style estimators.
pub const MAX_NPERSEG: usize = 256;

/// The digital output line driving the calibration noise source (header pin
/// 31 on an RTL-SDR Blog v3).
pub const DEFAULT_NOISE_SOURCE_BIT: u8 = 4;

/// The number of header lines preceding the data rows of a spectrum file.
pub const SPECTRUM_FILE_HEADER_LINES: usize = 5;
