// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use ndarray::Array1;

use super::*;
use crate::dsp::centred_freqs;

const FC: f64 = 1.4204e9;
const RATE: f64 = 64e3;
const N: usize = 64;

/// ON and OFF spectra on 1 kHz bins, the OFF one 16 kHz higher. Both share a
/// rippling baseline (a function of bin, not sky frequency), and see a line
/// of height 3 at FC + 5 kHz.
fn spectra() -> (Array1<f64>, Array1<f64>, Array1<f64>, Array1<f64>) {
    let freqs_on = centred_freqs(N, RATE, FC);
    let freqs_off = centred_freqs(N, RATE, FC + 16e3);
    let baseline = Array1::from_iter((0..N).map(|i| 10.0 + (i as f64 / 3.0).sin()));
    let mut p_on = baseline.clone();
    let mut p_off = baseline;
    p_on[32 + 5] += 3.0;
    p_off[32 + 5 - 16] += 3.0;
    (freqs_on, freqs_off, p_on, p_off)
}

#[test]
fn test_fold_removes_baseline_and_stacks_the_line() {
    let (freqs_on, freqs_off, p_on, p_off) = spectra();
    let folded = fold(freqs_on.view(), freqs_off.view(), p_on.view(), p_off.view()).unwrap();

    assert_eq!(folded.bin_throw, 16);
    assert_eq!(folded.freqs.len(), N - 16);
    assert_eq!(folded.power.len(), N - 16);
    assert_abs_diff_eq!(folded.freqs, freqs_on.slice(s![16..]));

    // The line's two copies add at its own frequency; negative half-height
    // ghosts sit a throw either side of it.
    for (k, &p) in folded.power.iter().enumerate() {
        let expected = match k {
            21 => 3.0,
            5 | 37 => -1.5,
            _ => 0.0,
        };
        assert_abs_diff_eq!(p, expected, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(folded.freqs[21], FC + 5e3);
}

#[test]
fn test_fold_is_antisymmetric() {
    let (freqs_on, freqs_off, p_on, p_off) = spectra();
    let a = fold(freqs_on.view(), freqs_off.view(), p_on.view(), p_off.view()).unwrap();
    let b = fold(freqs_on.view(), freqs_off.view(), p_off.view(), p_on.view()).unwrap();
    assert_eq!(a.freqs, b.freqs);
    assert_abs_diff_eq!(a.power, -b.power, epsilon = 1e-12);

    // Identical grids: no throw, so nothing survives.
    let c = fold(freqs_on.view(), freqs_on.view(), p_on.view(), p_off.view()).unwrap();
    let d = fold(freqs_on.view(), freqs_on.view(), p_off.view(), p_on.view()).unwrap();
    assert_eq!(c.bin_throw, 0);
    assert_eq!(c.power.len(), N);
    assert_abs_diff_eq!(c.power, -d.power, epsilon = 1e-12);
    assert_abs_diff_eq!(c.power, Array1::<f64>::zeros(N), epsilon = 1e-12);
}

#[test]
fn test_fold_with_a_lower_throw() {
    // OFF below ON; the throw is still counted as a magnitude.
    let freqs_on = centred_freqs(N, RATE, FC);
    let freqs_off = centred_freqs(N, RATE, FC - 8e3);
    let p = Array1::ones(N);
    let folded = fold(freqs_on.view(), freqs_off.view(), p.view(), p.view()).unwrap();
    assert_eq!(folded.bin_throw, 8);
    assert_eq!(folded.freqs.len(), N - 8);
}

#[test]
fn test_fold_spectra() {
    let (freqs_on, freqs_off, p_on, p_off) = spectra();
    let on = SpectrumEstimate {
        freqs: freqs_on.clone(),
        power: p_on.clone(),
    };
    let off = SpectrumEstimate {
        freqs: freqs_off.clone(),
        power: p_off.clone(),
    };
    assert_eq!(
        fold_spectra(&on, &off).unwrap(),
        fold(freqs_on.view(), freqs_off.view(), p_on.view(), p_off.view()).unwrap()
    );
}

#[test]
fn test_fold_rejects_bad_inputs() {
    let (freqs_on, freqs_off, p_on, p_off) = spectra();

    let short = p_off.slice(s![1..]);
    assert_eq!(
        fold(freqs_on.view(), freqs_off.view(), p_on.view(), short),
        Err(ConfigError::FoldLengthMismatch {
            freqs_on: N,
            freqs_off: N,
            p_on: N,
            p_off: N - 1
        })
    );

    let mut bumpy = freqs_on.clone();
    bumpy[10] += 100.0;
    assert_eq!(
        fold(bumpy.view(), freqs_off.view(), p_on.view(), p_off.view()),
        Err(ConfigError::NonUniformGrid { which: "ON" })
    );
    let descending = freqs_off.slice(s![..;-1]);
    assert_eq!(
        fold(freqs_on.view(), descending, p_on.view(), p_off.view()),
        Err(ConfigError::NonUniformGrid { which: "OFF" })
    );

    let coarse = centred_freqs(N, 2.0 * RATE, FC + 16e3);
    assert!(matches!(
        fold(freqs_on.view(), coarse.view(), p_on.view(), p_off.view()),
        Err(ConfigError::MismatchedGrids { .. })
    ));

    let far = centred_freqs(N, RATE, FC + 40e3);
    assert!(matches!(
        fold(freqs_on.view(), far.view(), p_on.view(), p_off.view()),
        Err(ConfigError::CentreOutsideOff { .. })
    ));

    // A throw of a bin and a half lands exactly between two bins.
    let on = centred_freqs(8, 8.0, 0.0);
    let between = centred_freqs(8, 8.0, 1.5);
    let p = Array1::zeros(8);
    assert_eq!(
        fold(on.view(), between.view(), p.view(), p.view()),
        Err(ConfigError::ThrowOffGrid { fthrow: 1.5 })
    );

    let one = Array1::from_elem(1, FC);
    assert_eq!(
        fold(one.view(), one.view(), one.view(), one.view()),
        Err(ConfigError::TooFewBins(1))
    );
}
