// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::{
    common::{parse_device, ArgsError, InfoPrinter, SourceArgs, ARG_FILE_HELP, DEVICE_HELP},
    total_power::BLOCK_SIZE_HELP,
};
use crate::{
    constants::{DEFAULT_BLOCK_SIZE, DEFAULT_NOISE_SOURCE_BIT, DEFAULT_NUM_BINS},
    dsp::PeriodogramSettings,
    io::can_write_to_file,
    params::SpectrumParams,
    spectrum::SpectrumSettings,
    RtlobsError,
};

lazy_static::lazy_static! {
    pub(super) static ref NUM_BINS_HELP: String =
        format!("The number of frequency bins. Default: {DEFAULT_NUM_BINS}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SpectrumArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "source")]
    #[serde(default)]
    pub(super) source_args: SourceArgs,

    #[clap(short, long, help = BLOCK_SIZE_HELP.as_str(), help_heading = "INTEGRATION")]
    pub(super) block_size: Option<usize>,

    #[clap(short, long, help = NUM_BINS_HELP.as_str(), help_heading = "INTEGRATION")]
    pub(super) num_bins: Option<usize>,

    /// The integration time [seconds].
    #[clap(short, long, help_heading = "INTEGRATION")]
    pub(super) t_int: Option<f64>,

    #[clap(long, help = DEVICE_HELP.as_str(), help_heading = "INTEGRATION")]
    pub(super) device: Option<String>,

    /// Write the spectrum [dB per Hz] to this file.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

impl SpectrumArgs {
    pub(super) fn merge(self) -> Result<SpectrumArgs, RtlobsError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let SpectrumArgs {
                args_file: _,
                source_args,
                block_size,
                num_bins,
                t_int,
                device,
                output,
            } = unpack_arg_file!(arg_file);

            Ok(SpectrumArgs {
                args_file: None,
                source_args: cli_args.source_args.merge(source_args),
                block_size: cli_args.block_size.or(block_size),
                num_bins: cli_args.num_bins.or(num_bins),
                t_int: cli_args.t_int.or(t_int),
                device: cli_args.device.or(device),
                output: cli_args.output.or(output),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<SpectrumParams, RtlobsError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            source_args,
            block_size,
            num_bins,
            t_int,
            device,
            output,
        } = self;

        let source = source_args.parse(DEFAULT_NOISE_SOURCE_BIT)?;
        let t_int = t_int.ok_or(ArgsError::Missing {
            arg: "--t-int",
            what: "integration time",
        })?;
        let block_size = block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
        let num_bins = num_bins.unwrap_or(DEFAULT_NUM_BINS);
        let device = parse_device(device)?;
        let periodogram = PeriodogramSettings::capped(num_bins);
        periodogram.validate(block_size)?;
        if let Some(output) = &output {
            can_write_to_file(output)?;
        }

        let mut printer = InfoPrinter::new("Spectrum");
        printer
            .quantity("Block size", block_size, "samples")
            .quantity("Integration time", t_int, "s")
            .end_block()
            .field("Frequency bins", num_bins)
            .field(
                "Segments",
                format!(
                    "{} of {} samples per block",
                    periodogram.num_segments(block_size),
                    periodogram.nperseg
                ),
            )
            .field("Device", device.get_device_info());
        if let Some(output) = &output {
            printer.end_block().path("Writing to", output);
        }
        printer.display();

        Ok(SpectrumParams {
            source,
            settings: SpectrumSettings {
                block_size,
                num_bins,
                t_int,
                device,
            },
            output,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), RtlobsError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}
