// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs::read_to_string;

use chrono::{TimeZone, Utc};
use ndarray::Array1;
use tempfile::{NamedTempFile, TempDir};

use super::*;
use crate::{
    dicke::{DickeDifference, DickeSample, DickeSeries},
    dsp::centred_freqs,
};

#[test]
fn test_spectrum_file_round_trip() {
    let freqs = centred_freqs(2048, 2.32e6, 1.4204e9);
    let power = Array1::from_iter((0..2048).map(|i| -90.0 + (i as f64 * 0.37).sin() / 3.0));
    let file = NamedTempFile::new().unwrap();
    write_spectrum(file.path(), freqs.view(), power.view()).unwrap();

    let spectrum = read_spectrum(file.path()).unwrap();
    // Bit-exact.
    assert_eq!(spectrum.freqs, freqs);
    assert_eq!(spectrum.power, power);
}

#[test]
fn test_spectrum_file_layout() {
    let freqs = Array1::from(vec![1.0e9, 1.5e9]);
    let power = Array1::from(vec![0.25, 1e-12]);
    let file = NamedTempFile::new().unwrap();
    write_spectrum(file.path(), freqs.view(), power.view()).unwrap();

    let contents = read_to_string(file.path()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 5 + 2);
    assert!(lines[..5].iter().all(|l| l.starts_with('#')));
    assert_eq!(lines[5], "1e9 2.5e-1");
    assert_eq!(lines[6], "1.5e9 1e-12");
}

#[test]
fn test_read_spectrum_skips_comments_and_blank_lines() {
    let file = NamedTempFile::new().unwrap();
    // The header lines are skipped whatever they hold.
    std::fs::write(
        file.path(),
        "\n\n\n\nnot a comment\n# another comment\n\n1420000000 3.5\n  1420001000\t4.5  \n",
    )
    .unwrap();
    let spectrum = read_spectrum(file.path()).unwrap();
    assert_eq!(spectrum.freqs, Array1::from(vec![1420000000.0, 1420001000.0]));
    assert_eq!(spectrum.power, Array1::from(vec![3.5, 4.5]));
}

#[test]
fn test_read_spectrum_reports_bad_rows() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "#\n#\n#\n#\n#\n1 2\n3 4 5\n").unwrap();
    let result = read_spectrum(file.path());
    assert!(matches!(
        result,
        Err(SpectrumFileError::Malformed { line: 7, .. })
    ));

    std::fs::write(file.path(), "#\n#\n#\n#\n#\n1 2\n3 4\nfive 6\n").unwrap();
    let result = read_spectrum(file.path());
    match result {
        Err(SpectrumFileError::Malformed { line, reason, .. }) => {
            assert_eq!(line, 8);
            assert!(reason.contains("'five'"));
        }
        _ => panic!("expected a malformed row"),
    }

    std::fs::write(file.path(), "#\n#\n#\n#\n#\n").unwrap();
    assert!(matches!(
        read_spectrum(file.path()),
        Err(SpectrumFileError::Empty(_))
    ));
}

#[test]
fn test_write_spectrum_length_mismatch() {
    let file = NamedTempFile::new().unwrap();
    let result = write_spectrum(
        file.path(),
        Array1::<f64>::zeros(4).view(),
        Array1::<f64>::zeros(3).view(),
    );
    assert!(matches!(
        result,
        Err(SpectrumFileError::LengthMismatch { freqs: 4, power: 3 })
    ));
}

#[test]
fn test_can_write_to_file() {
    let dir = TempDir::new().unwrap();

    // Missing directories are made, and no empty file is left behind.
    let nested = dir.path().join("a").join("b").join("spectrum.txt");
    can_write_to_file(&nested).unwrap();
    assert!(nested.parent().unwrap().is_dir());
    assert!(!nested.exists());

    // Existing files are left alone.
    let existing = dir.path().join("existing.txt");
    std::fs::write(&existing, "data").unwrap();
    can_write_to_file(&existing).unwrap();
    assert_eq!(read_to_string(&existing).unwrap(), "data");

    assert!(matches!(
        can_write_to_file(dir.path()),
        Err(FileWriteError::IsADirectory(_))
    ));
}

#[test]
fn test_dicke_writers() {
    let t0 = Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap();
    let t1 = Utc.timestamp_opt(1_700_000_001, 0).unwrap();
    let series = DickeSeries {
        samples: vec![
            DickeSample {
                timestamp: t0,
                power: 5.0,
                noise_on: true,
            },
            DickeSample {
                timestamp: t1,
                power: 1.0,
                noise_on: false,
            },
        ],
    };
    let file = NamedTempFile::new().unwrap();
    write_dicke_series(file.path(), &series).unwrap();
    let contents = read_to_string(file.path()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            "# unix_seconds power noise_on",
            "1700000000.500000 5e0 1",
            "1700000001.000000 1e0 0",
        ]
    );

    let differences = series.differences();
    assert_eq!(
        differences,
        vec![DickeDifference {
            timestamp: Utc.timestamp_opt(1_700_000_000, 750_000_000).unwrap(),
            power: -4.0
        }]
    );
    write_dicke_differences(file.path(), &differences).unwrap();
    let contents = read_to_string(file.path()).unwrap();
    assert_eq!(
        contents,
        "# unix_seconds power_difference\n1700000000.750000 -4e0\n"
    );
}
