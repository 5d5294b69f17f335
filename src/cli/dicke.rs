// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::{
    common::{ArgsError, InfoPrinter, SourceArgs, ARG_FILE_HELP},
    total_power::BLOCK_SIZE_HELP,
};
use crate::{
    constants::{DEFAULT_BLOCK_SIZE, DEFAULT_NOISE_SOURCE_BIT},
    dicke::num_dicke_blocks,
    io::can_write_to_file,
    params::DickeParams,
    RtlobsError,
};

lazy_static::lazy_static! {
    static ref NOISE_BIT_HELP: String =
        format!("The digital output that switches the noise source. Default: {DEFAULT_NOISE_SOURCE_BIT}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct DickeArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "source")]
    #[serde(default)]
    pub(super) source_args: SourceArgs,

    #[clap(short, long, help = BLOCK_SIZE_HELP.as_str(), help_heading = "SWITCHING")]
    pub(super) block_size: Option<usize>,

    /// How long to switch for [seconds].
    #[clap(short, long, help_heading = "SWITCHING")]
    pub(super) t_int: Option<f64>,

    #[clap(long, help = NOISE_BIT_HELP.as_str(), help_heading = "SWITCHING")]
    pub(super) noise_bit: Option<u8>,

    /// Write every block's timestamp, power and noise-source state to this
    /// file.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,

    /// Write the noise-off minus noise-on power differences to this file.
    #[clap(long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output_differences: Option<PathBuf>,
}

impl DickeArgs {
    pub(super) fn merge(self) -> Result<DickeArgs, RtlobsError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let DickeArgs {
                args_file: _,
                source_args,
                block_size,
                t_int,
                noise_bit,
                output,
                output_differences,
            } = unpack_arg_file!(arg_file);

            Ok(DickeArgs {
                args_file: None,
                source_args: cli_args.source_args.merge(source_args),
                block_size: cli_args.block_size.or(block_size),
                t_int: cli_args.t_int.or(t_int),
                noise_bit: cli_args.noise_bit.or(noise_bit),
                output: cli_args.output.or(output),
                output_differences: cli_args.output_differences.or(output_differences),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<DickeParams, RtlobsError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            source_args,
            block_size,
            t_int,
            noise_bit,
            output,
            output_differences,
        } = self;

        let noise_source_bit = noise_bit.unwrap_or(DEFAULT_NOISE_SOURCE_BIT);
        let source = source_args.parse(noise_source_bit)?;
        let t = t_int.ok_or(ArgsError::Missing {
            arg: "--t-int",
            what: "switching time",
        })?;
        let block_size = block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
        // Catch bad combinations before the source is used.
        let num_blocks = num_dicke_blocks(source.rate, block_size, t)?;
        for output in [&output, &output_differences].into_iter().flatten() {
            can_write_to_file(output)?;
        }

        let mut printer = InfoPrinter::new("Dicke switching");
        printer
            .quantity("Block size", block_size, "samples")
            .quantity("Switching time", t, "s")
            .field("Blocks", num_blocks)
            .field("Noise source", format!("digital output {noise_source_bit}"));
        if output.is_some() || output_differences.is_some() {
            printer.end_block();
        }
        if let Some(output) = &output {
            printer.path("Time series", output);
        }
        if let Some(output) = &output_differences {
            printer.path("Differences", output);
        }
        printer.display();

        Ok(DickeParams {
            source,
            block_size,
            t,
            noise_source_bit,
            output,
            output_differences,
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
