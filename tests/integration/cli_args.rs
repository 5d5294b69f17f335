// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the command-line interface.

use std::io::Write;

use tempfile::TempDir;

use crate::{get_cmd_output, rtlobs, TONE_ARGS};

#[test]
fn test_rtlobs_help_is_correct() {
    let mut stdouts = vec![];

    // First with --help
    let cmd = rtlobs().arg("--help").ok();
    assert!(cmd.is_ok());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty());
    stdouts.push(stdout);

    // Then with -h
    let cmd = rtlobs().arg("-h").ok();
    assert!(cmd.is_ok());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty());
    stdouts.push(stdout);

    for stdout in stdouts {
        for sub_command in [
            "total-power",
            "spectrum",
            "fswitch",
            "fold",
            "y-factor",
            "dicke",
        ] {
            assert!(stdout.contains(sub_command), "{sub_command} missing");
        }
    }
}

#[test]
fn test_spectrum_help_is_correct() {
    let cmd = rtlobs().args(["spectrum", "--help"]).ok();
    assert!(cmd.is_ok());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty());
    assert!(stdout.contains("SAMPLE SOURCE"));
    assert!(stdout.contains("--num-bins"));
    assert!(stdout.contains("--iq-file"));
}

#[test]
fn test_dry_run() {
    #[rustfmt::skip]
    let cmd = rtlobs()
        .args(["total-power", "-t", "0.1", "-b", "1024", "--dry-run"])
        .args(TONE_ARGS)
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("Dry run -- exiting now."));
    assert!(!stdout.contains("Average power"));
}

#[test]
fn test_bad_integration_fails_a_dry_run() {
    for sub_command in ["total-power", "dicke"] {
        let cmd = rtlobs()
            .args([sub_command, "-t", "0", "--dry-run"])
            .args(TONE_ARGS)
            .ok();
        assert!(cmd.is_err(), "{sub_command} accepted a zero integration time");
        let (stdout, stderr) = get_cmd_output(cmd);
        assert!(stderr.contains("integration time"), "{stderr}");
        assert!(!stdout.contains("Dry run -- exiting now."));

        let cmd = rtlobs()
            .args([sub_command, "-t", "0.1", "-b", "0", "--dry-run"])
            .args(TONE_ARGS)
            .ok();
        assert!(cmd.is_err(), "{sub_command} accepted a zero block size");
        let (_, stderr) = get_cmd_output(cmd);
        assert!(stderr.contains("block size"), "{stderr}");
    }
}

#[test]
fn test_unfoldable_throw_fails_a_dry_run() {
    let dir = TempDir::new().unwrap();
    let on = dir.path().join("on.txt");
    #[rustfmt::skip]
    let cmd = rtlobs()
        .args(["fswitch", "-t", "2", "-b", "1024", "-n", "64", "--dry-run"])
        .args(["--fthrow", "1000100000"])
        .arg("--output-on")
        .arg(&on)
        .args(TONE_ARGS)
        .ok();
    assert!(cmd.is_err());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("isn't within the OFF spectrum"), "{stderr}");
    assert!(!stdout.contains("Dry run -- exiting now."));
    assert!(!on.exists());
}

#[test]
fn test_missing_source_is_an_error() {
    let cmd = rtlobs().args(["total-power", "-t", "0.1"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Error:"), "{stderr}");
}

#[test]
fn test_missing_integration_time_is_an_error() {
    let cmd = rtlobs().arg("total-power").args(TONE_ARGS).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("--t-int"), "{stderr}");
}

#[test]
fn test_missing_iq_file_is_an_error() {
    let cmd = rtlobs()
        .args([
            "total-power",
            "-t",
            "0.1",
            "-i",
            "/this/capture/does/not/exist.cu8",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("exist.cu8"), "{stderr}");
}

#[test]
fn test_bad_device_is_an_error() {
    let cmd = rtlobs()
        .args(["spectrum", "-t", "0.1", "--device", "abacus"])
        .args(TONE_ARGS)
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("abacus"), "{stderr}");
}

#[test]
fn test_mixed_load_inputs_are_an_error() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let hot = tmp_dir.path().join("hot.cu8");
    std::fs::write(&hot, [127u8; 64]).unwrap();

    #[rustfmt::skip]
    let cmd = rtlobs()
        .args([
            "y-factor",
            "--t-hot", "300",
            "--t-cold", "10",
            "--p-hot", "2",
            "--p-cold", "1",
            "--hot", &hot.display().to_string(),
            "--cold", &hot.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("not both"), "{stderr}");
}

#[test]
fn test_arg_file_and_save_toml() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let args_file = tmp_dir.path().join("args.toml");
    let mut f = std::fs::File::create(&args_file).unwrap();
    writeln!(
        f,
        r#"block_size = 1000
t_int = 0.25

[source]
tones = [1000008000.0, 3.0]
sample_rate = 64000.0
center_freq = 1000000000.0
"#
    )
    .unwrap();
    drop(f);

    let cmd = rtlobs()
        .args(["total-power", &args_file.display().to_string()])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("Average power:"), "{stdout}");
    assert!(stdout.contains("over 16 blocks"), "{stdout}");

    // Command-line arguments win over the file, and the merged arguments can
    // be saved.
    let saved = tmp_dir.path().join("saved.toml");
    let cmd = rtlobs()
        .args([
            "total-power",
            &args_file.display().to_string(),
            "-t",
            "0.5",
            "--dry-run",
            "--save-toml",
            &saved.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let saved = std::fs::read_to_string(saved).unwrap();
    assert!(saved.contains("t_int = 0.5"), "{saved}");
    assert!(saved.contains("block_size = 1000"), "{saved}");
}

#[test]
fn test_bad_arg_file_is_an_error() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let args_file = tmp_dir.path().join("args.toml");
    std::fs::write(&args_file, "block_size = \"many\"\n").unwrap();

    let cmd = rtlobs()
        .args(["total-power", &args_file.display().to_string()])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Argument files are TOML or JSON"), "{stderr}");
}
