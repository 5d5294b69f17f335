// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! End-to-end observations with synthetic sources.

use approx::assert_abs_diff_eq;
use tempfile::TempDir;

use rtlobs::io::read_spectrum;

use crate::{get_cmd_output, rtlobs, TONE_ARGS};

#[test]
fn test_total_power() {
    let cmd = rtlobs()
        .args(["total-power", "-t", "0.25", "-b", "1000", "--no-progress-bars"])
        .args(TONE_ARGS)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("over 16 blocks"), "{stdout}");
    assert!(stdout.contains("rtlobs total-power complete."), "{stdout}");
}

#[test]
fn test_spectrum_peak() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output = tmp_dir.path().join("spectrum.txt");

    #[rustfmt::skip]
    let cmd = rtlobs()
        .args([
            "spectrum",
            "-b", "1024",
            "-n", "64",
            "-t", "0.05",
            "-o", &output.display().to_string(),
        ])
        .args(TONE_ARGS)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");

    let spectrum = read_spectrum(&output).unwrap();
    assert_eq!(spectrum.freqs.len(), 64);
    let (i_peak, _) = spectrum
        .power
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |(i_max, max), (i, &p)| {
            if p > max {
                (i, p)
            } else {
                (i_max, max)
            }
        });
    assert_abs_diff_eq!(spectrum.freqs[i_peak], 1e9 + 5e3, epsilon = 1e-3);
}

#[test]
fn test_fast_switching_is_warned_about_once() {
    #[rustfmt::skip]
    let cmd = rtlobs()
        .args([
            "fswitch",
            "-b", "1024",
            "-n", "64",
            "-t", "0.4",
            "--fthrow", "1000016000",
            "--fswitch", "20",
        ])
        .args(TONE_ARGS)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert_eq!(stdout.matches("Switching faster than").count(), 1, "{stdout}");
}

#[test]
fn test_fswitch_then_fold() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let folded = tmp_dir.path().join("folded.txt");
    let on = tmp_dir.path().join("on.txt");
    let off = tmp_dir.path().join("off.txt");
    let refolded = tmp_dir.path().join("refolded.txt");

    #[rustfmt::skip]
    let cmd = rtlobs()
        .args([
            "fswitch",
            "-b", "1024",
            "-n", "64",
            "-t", "0.4",
            "--fthrow", "1000016000",
            "--fswitch", "10",
            "-o", &folded.display().to_string(),
            "--output-on", &on.display().to_string(),
            "--output-off", &off.display().to_string(),
        ])
        .args(TONE_ARGS)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("throw of 16 bins"), "{stdout}");

    #[rustfmt::skip]
    let cmd = rtlobs()
        .args([
            "fold",
            "--on", &on.display().to_string(),
            "--off", &off.display().to_string(),
            "-o", &refolded.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let folded = read_spectrum(&folded).unwrap();
    let refolded = read_spectrum(&refolded).unwrap();
    assert_eq!(folded.freqs.len(), 64 - 16);
    assert_eq!(folded, refolded);
}

#[test]
fn test_y_factor_with_given_powers() {
    #[rustfmt::skip]
    let cmd = rtlobs()
        .args([
            "y-factor",
            "--t-hot", "300",
            "--t-cold", "10",
            "--p-hot", "2",
            "--p-cold", "1",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("Y = 0.500000"), "{stdout}");
    assert!(stdout.contains("T_sys = 280.00 K"), "{stdout}");
}

#[test]
fn test_y_factor_with_indistinguishable_loads() {
    #[rustfmt::skip]
    let cmd = rtlobs()
        .args([
            "y-factor",
            "--t-hot", "300",
            "--t-cold", "10",
            "--p-hot", "1",
            "--p-cold", "1",
        ])
        .ok();
    assert!(cmd.is_err());
}

#[test]
fn test_dicke() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let series = tmp_dir.path().join("series.txt");
    let differences = tmp_dir.path().join("differences.txt");

    #[rustfmt::skip]
    let cmd = rtlobs()
        .args([
            "dicke",
            "-b", "1024",
            "-t", "0.1",
            "-o", &series.display().to_string(),
            "--output-differences", &differences.display().to_string(),
            "--noise-tone", "999996000", "2",
            "--tones", "1000008000", "1",
            "-r", "64000",
            "-f", "1000000000",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let series = std::fs::read_to_string(series).unwrap();
    let lines: Vec<&str> = series.lines().collect();
    // A header and 6 blocks.
    assert_eq!(lines.len(), 7);
    assert!(lines[1].ends_with(" 1"));
    assert!(lines[2].ends_with(" 0"));

    let differences = std::fs::read_to_string(differences).unwrap();
    let differences: Vec<f64> = differences
        .lines()
        .skip(1)
        .map(|l| l.split_whitespace().nth(1).unwrap().parse().unwrap())
        .collect();
    assert_eq!(differences.len(), 3);
    for d in differences {
        assert_abs_diff_eq!(d, -4096.0, epsilon = 1e-6);
    }
}
