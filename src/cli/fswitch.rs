// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::{
    common::{parse_device, ArgsError, InfoPrinter, SourceArgs, ARG_FILE_HELP, DEVICE_HELP},
    spectrum::NUM_BINS_HELP,
    total_power::BLOCK_SIZE_HELP,
};
use crate::{
    constants::{
        DEFAULT_BLOCK_SIZE, DEFAULT_NOISE_SOURCE_BIT, DEFAULT_NUM_BINS, DEFAULT_SWITCH_FREQ,
    },
    fswitch::FswitchSettings,
    io::can_write_to_file,
    params::FswitchParams,
    RtlobsError,
};

lazy_static::lazy_static! {
    static ref FSWITCH_HELP: String =
        format!("The number of frequency switches per second [Hz]. Default: {DEFAULT_SWITCH_FREQ}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct FswitchArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    // The ON frequency is the source's centre frequency.
    #[clap(flatten)]
    #[serde(rename = "source")]
    #[serde(default)]
    pub(super) source_args: SourceArgs,

    #[clap(short, long, help = BLOCK_SIZE_HELP.as_str(), help_heading = "INTEGRATION")]
    pub(super) block_size: Option<usize>,

    #[clap(short, long, help = NUM_BINS_HELP.as_str(), help_heading = "INTEGRATION")]
    pub(super) num_bins: Option<usize>,

    /// The integration time over both frequencies [seconds]. It must span at
    /// least two switching periods.
    #[clap(short, long, help_heading = "INTEGRATION")]
    pub(super) t_int: Option<f64>,

    #[clap(long, help = DEVICE_HELP.as_str(), help_heading = "INTEGRATION")]
    pub(super) device: Option<String>,

    /// The OFF frequency [Hz]. For the folded spectrum to be useful, it should
    /// be within the ON band.
    #[clap(long, help_heading = "FREQUENCY SWITCHING")]
    pub(super) fthrow: Option<f64>,

    #[clap(long, help = FSWITCH_HELP.as_str(), help_heading = "FREQUENCY SWITCHING")]
    pub(super) fswitch: Option<f64>,

    /// Drive this digital output high during ON dwells and low during OFF
    /// dwells, e.g. to synchronise external equipment.
    #[clap(long, help_heading = "FREQUENCY SWITCHING")]
    pub(super) sync_bit: Option<u8>,

    /// Write the folded spectrum to this file.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,

    /// Write the unfolded ON spectrum (linear units) to this file.
    #[clap(long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output_on: Option<PathBuf>,

    /// Write the unfolded OFF spectrum (linear units) to this file.
    #[clap(long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output_off: Option<PathBuf>,
}

impl FswitchArgs {
    pub(super) fn merge(self) -> Result<FswitchArgs, RtlobsError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let FswitchArgs {
                args_file: _,
                source_args,
                block_size,
                num_bins,
                t_int,
                device,
                fthrow,
                fswitch,
                sync_bit,
                output,
                output_on,
                output_off,
            } = unpack_arg_file!(arg_file);

            Ok(FswitchArgs {
                args_file: None,
                source_args: cli_args.source_args.merge(source_args),
                block_size: cli_args.block_size.or(block_size),
                num_bins: cli_args.num_bins.or(num_bins),
                t_int: cli_args.t_int.or(t_int),
                device: cli_args.device.or(device),
                fthrow: cli_args.fthrow.or(fthrow),
                fswitch: cli_args.fswitch.or(fswitch),
                sync_bit: cli_args.sync_bit.or(sync_bit),
                output: cli_args.output.or(output),
                output_on: cli_args.output_on.or(output_on),
                output_off: cli_args.output_off.or(output_off),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<FswitchParams, RtlobsError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            source_args,
            block_size,
            num_bins,
            t_int,
            device,
            fthrow,
            fswitch,
            sync_bit,
            output,
            output_on,
            output_off,
        } = self;

        let source = source_args.parse(DEFAULT_NOISE_SOURCE_BIT)?;
        let t_int = t_int.ok_or(ArgsError::Missing {
            arg: "--t-int",
            what: "integration time",
        })?;
        let fthrow = fthrow.ok_or(ArgsError::Missing {
            arg: "--fthrow",
            what: "OFF frequency",
        })?;
        let block_size = block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
        let num_bins = num_bins.unwrap_or(DEFAULT_NUM_BINS);
        let fswitch = fswitch.unwrap_or(DEFAULT_SWITCH_FREQ);
        let device = parse_device(device)?;

        // Catch bad combinations, including spectra that couldn't be folded,
        // before the source is used.
        let settings = FswitchSettings {
            block_size,
            num_bins,
            fc: source.center_freq,
            fthrow,
            t_int,
            fswitch,
            device,
            sync_output: sync_bit,
        };
        let plan = settings.validate(source.rate)?;
        let bin_throw = settings.bin_throw(source.rate)?;
        for output in [&output, &output_on, &output_off].into_iter().flatten() {
            can_write_to_file(output)?;
        }

        let mut printer = InfoPrinter::new("Frequency switching");
        printer
            .freq("ON frequency", source.center_freq)
            .freq("OFF frequency", fthrow)
            .quantity("Switching at", fswitch, "Hz")
            .quantity("Throw", bin_throw, "bins")
            .end_block()
            .quantity("Block size", block_size, "samples")
            .quantity("Integration time", t_int, "s")
            .field(
                "Dwells",
                format!("{} of {} blocks", plan.num_dwells, plan.blocks_per_dwell),
            )
            .field("Frequency bins", num_bins)
            .field("Device", device.get_device_info());
        if let Some(bit) = sync_bit {
            printer
                .end_block()
                .note(format!("Digital output {bit} follows the ON dwells"));
        }
        printer.display();

        Ok(FswitchParams {
            settings,
            source,
            output,
            output_on,
            output_off,
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
