// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Folding of frequency-switched spectra.
//!
//! The ON spectrum is centred on the line of interest and the OFF spectrum is
//! shifted by the frequency throw. Subtracting them removes the baseline
//! common to both; shifting the difference by the throw and subtracting
//! again puts both copies of the line on top of each other. See
//! <https://aas.aanda.org/articles/aas/abs/1997/10/ds1263/ds1263.html>.
//!
//! Swapping ON and OFF only flips the sign of the result.

#[cfg(test)]
mod tests;

use itertools::Itertools;
use log::debug;
use ndarray::{s, Array1, ArrayView1};

use crate::{error::ConfigError, spectrum::SpectrumEstimate};

/// Relative tolerance used when comparing bin spacings.
const GRID_TOLERANCE: f64 = 1e-6;

/// The folded spectrum. It's `bin_throw` bins shorter than its inputs; the
/// bins the two spectra don't share are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldedSpectrum {
    pub freqs: Array1<f64>,
    pub power: Array1<f64>,

    /// The frequency throw in bins.
    pub bin_throw: usize,
}

/// The spacing of a uniform, ascending grid.
fn grid_spacing(freqs: ArrayView1<f64>, which: &'static str) -> Result<f64, ConfigError> {
    let spacing = freqs[1] - freqs[0];
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(ConfigError::NonUniformGrid { which });
    }
    let uniform = freqs
        .iter()
        .tuple_windows()
        .all(|(a, b)| ((b - a) - spacing).abs() <= GRID_TOLERANCE * spacing);
    if uniform {
        Ok(spacing)
    } else {
        Err(ConfigError::NonUniformGrid { which })
    }
}

/// The index of the first frequency within `epsilon` of `target`.
fn nearest_bin(freqs: ArrayView1<f64>, target: f64, epsilon: f64) -> Option<usize> {
    freqs.iter().position(|f| (f - target).abs() < epsilon)
}

/// The frequency throw in bins between an ON and an OFF frequency grid.
///
/// Both grids must be the same length and uniform with the same spacing, the
/// ON centre frequency must lie within the OFF grid, and the line's image at
/// `fc - fthrow` must fall on a bin of the ON grid.
pub fn bin_throw(
    freqs_on: ArrayView1<f64>,
    freqs_off: ArrayView1<f64>,
) -> Result<usize, ConfigError> {
    let n = freqs_on.len();
    if n.min(freqs_off.len()) < 2 {
        return Err(ConfigError::TooFewBins(n.min(freqs_off.len())));
    }
    let spacing_on = grid_spacing(freqs_on, "ON")?;
    let spacing_off = grid_spacing(freqs_off, "OFF")?;
    if (spacing_on - spacing_off).abs() > GRID_TOLERANCE * spacing_on {
        return Err(ConfigError::MismatchedGrids {
            on: spacing_on,
            off: spacing_off,
        });
    }

    let fc = freqs_on[n / 2];
    let (off_min, off_max) = (freqs_off[0], freqs_off[freqs_off.len() - 1]);
    if fc < off_min || fc > off_max {
        return Err(ConfigError::CentreOutsideOff {
            fc,
            off_min,
            off_max,
        });
    }

    let fthrow = (freqs_on[0] - freqs_off[0]).abs();
    let epsilon = spacing_on / 2.0;
    // The middle bin always matches itself.
    let fc_idx = nearest_bin(freqs_on, fc, epsilon).unwrap_or(n / 2);
    let fthrow_idx = nearest_bin(freqs_on, fc - fthrow, epsilon)
        .ok_or(ConfigError::ThrowOffGrid { fthrow })?;
    let bin_throw = fc_idx.abs_diff(fthrow_idx);
    debug!("Frequency throw of {fthrow} Hz is {bin_throw} bins");
    Ok(bin_throw)
}

/// Fold ON and OFF spectra, all in linear power units.
///
/// All four inputs must be the same length, and the frequency grids must
/// satisfy [`bin_throw`]. Anything else is a configuration error.
pub fn fold(
    freqs_on: ArrayView1<f64>,
    freqs_off: ArrayView1<f64>,
    p_on: ArrayView1<f64>,
    p_off: ArrayView1<f64>,
) -> Result<FoldedSpectrum, ConfigError> {
    let n = freqs_on.len();
    if freqs_off.len() != n || p_on.len() != n || p_off.len() != n {
        return Err(ConfigError::FoldLengthMismatch {
            freqs_on: n,
            freqs_off: freqs_off.len(),
            p_on: p_on.len(),
            p_off: p_off.len(),
        });
    }
    let bin_throw = bin_throw(freqs_on, freqs_off)?;

    let p_diff = &p_on - &p_off;
    let power = (&p_diff.slice(s![bin_throw..]) - &p_diff.slice(s![..n - bin_throw])) / 2.0;
    let freqs = freqs_on.slice(s![bin_throw..]).to_owned();

    Ok(FoldedSpectrum {
        freqs,
        power,
        bin_throw,
    })
}

/// [`fold`] two spectra.
pub fn fold_spectra(
    on: &SpectrumEstimate,
    off: &SpectrumEstimate,
) -> Result<FoldedSpectrum, ConfigError> {
    fold(on.freqs(), off.freqs(), on.power(), off.power())
}
