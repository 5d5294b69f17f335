// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against command-line interfaces that aren't big enough to go in their
//! own modules.

use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use tempfile::Builder;

use super::*;

#[test]
fn test_no_source_is_an_error() {
    let result = SourceArgs::default().parse(4);
    assert!(matches!(result, Err(SourceArgsError::NoSource)));
}

#[test]
fn test_iq_file_and_tones_conflict() {
    let file = Builder::new().suffix(".cu8").tempfile().unwrap();
    let result = SourceArgs {
        iq_file: Some(file.path().to_path_buf()),
        tones: Some(vec![1e9, 1.0]),
        ..Default::default()
    }
    .parse(4);
    assert!(matches!(result, Err(SourceArgsError::BothSources)));
}

#[test]
fn test_synthetic_source_args() {
    let params = SourceArgs {
        tones: Some(vec![1.42e9, 0.5, 1.43e9, -0.25]),
        noise_tone: Some(vec![1.41e9, 2.0]),
        sample_rate: Some(1e6),
        ..Default::default()
    }
    .parse(3)
    .unwrap();

    assert_abs_diff_eq!(params.rate, 1e6);
    assert_abs_diff_eq!(params.center_freq, DEFAULT_CENTER_FREQ);
    assert_abs_diff_eq!(params.gain, DEFAULT_GAIN);
    assert_eq!(
        params.kind,
        SourceKind::Synthetic {
            tones: vec![Tone::new(1.42e9, 0.5), Tone::new(1.43e9, -0.25)],
            switched: Some((3, Tone::new(1.41e9, 2.0))),
        }
    );
}

#[test]
fn test_odd_tone_values() {
    let result = SourceArgs {
        tones: Some(vec![1.42e9, 0.5, 1.43e9]),
        ..Default::default()
    }
    .parse(4);
    assert!(matches!(result, Err(SourceArgsError::OddToneValues(3))));
}

#[test]
fn test_iq_format_is_guessed_from_the_extension() {
    let file = Builder::new().suffix(".cf32").tempfile().unwrap();
    let params = SourceArgs {
        iq_file: Some(file.path().to_path_buf()),
        ..Default::default()
    }
    .parse(4)
    .unwrap();
    assert!(matches!(
        params.kind,
        SourceKind::IqFile {
            format: IqFormat::Cf32,
            looping: false,
            ..
        }
    ));

    // Unknown extensions fall back to cu8; an explicit format wins.
    let file = Builder::new().suffix(".bin").tempfile().unwrap();
    let params = SourceArgs {
        iq_file: Some(file.path().to_path_buf()),
        loop_iq_file: true,
        ..Default::default()
    }
    .parse(4)
    .unwrap();
    assert!(matches!(
        params.kind,
        SourceKind::IqFile {
            format: IqFormat::Cu8,
            looping: true,
            ..
        }
    ));
    let params = SourceArgs {
        iq_file: Some(file.path().to_path_buf()),
        iq_format: Some("CF32".to_string()),
        ..Default::default()
    }
    .parse(4)
    .unwrap();
    assert!(matches!(
        params.kind,
        SourceKind::IqFile {
            format: IqFormat::Cf32,
            ..
        }
    ));

    let result = SourceArgs {
        iq_file: Some(file.path().to_path_buf()),
        iq_format: Some("cs16".to_string()),
        ..Default::default()
    }
    .parse(4);
    assert!(matches!(result, Err(SourceArgsError::BadIqFormat(f)) if f == "cs16"));
}

#[test]
fn test_missing_iq_file() {
    let result = SourceArgs {
        iq_file: Some(PathBuf::from("/does/not/exist.cu8")),
        ..Default::default()
    }
    .parse(4);
    assert!(matches!(result, Err(SourceArgsError::IqFileDoesNotExist(_))));
}

#[test]
fn test_merge_prefers_the_first_args() {
    let cli = SourceArgs {
        sample_rate: Some(1e6),
        ..Default::default()
    };
    let file = SourceArgs {
        sample_rate: Some(2e6),
        center_freq: Some(1e9),
        loop_iq_file: true,
        ..Default::default()
    };
    let merged = cli.merge(file);
    assert_eq!(merged.sample_rate, Some(1e6));
    assert_eq!(merged.center_freq, Some(1e9));
    assert!(merged.loop_iq_file);
}

#[test]
fn test_parse_device_and_policy() {
    assert_eq!(parse_device(None).unwrap(), PeriodogramDevice::Cpu);
    assert_eq!(
        parse_device(Some("CPU-Parallel".to_string())).unwrap(),
        PeriodogramDevice::CpuParallel
    );
    assert!(matches!(
        parse_device(Some("gpu".to_string())),
        Err(ArgsError::BadDevice(_))
    ));

    assert_eq!(parse_limit_policy(None).unwrap(), LimitPolicy::FixedBudget);
    assert_eq!(
        parse_limit_policy(Some("free-running".to_string())).unwrap(),
        LimitPolicy::FreeRunning
    );
    assert!(matches!(
        parse_limit_policy(Some("forever".to_string())),
        Err(ArgsError::BadLimitPolicy(_))
    ));
}

#[test]
fn test_info_printer_aligns_fields() {
    let mut printer = InfoPrinter::new("Total-power integration");
    printer
        .quantity("Block size", 1024, "samples")
        .quantity("Integration time", 0.5, "s")
        .end_block()
        .end_block()
        .note("Reading on a separate thread")
        .end_block();
    assert_eq!(
        printer.lines(),
        vec![
            "├ Block size:       1024 samples",
            "│ Integration time: 0.5 s",
            "└ Reading on a separate thread",
        ]
    );

    let mut printer = InfoPrinter::new("Folding");
    printer.freq("Centre frequency", 1420.405e6);
    assert_eq!(printer.lines(), vec!["└ Centre frequency: 1420.405 MHz"]);
}
