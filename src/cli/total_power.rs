// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{
    parse_limit_policy, ArgsError, InfoPrinter, SourceArgs, ARG_FILE_HELP, LIMIT_POLICY_HELP,
};
use crate::{
    constants::{DEFAULT_BLOCK_SIZE, DEFAULT_NOISE_SOURCE_BIT},
    params::TotalPowerParams,
    total_power::IntegrationLimit,
    RtlobsError,
};

lazy_static::lazy_static! {
    pub(super) static ref BLOCK_SIZE_HELP: String =
        format!("The number of samples requested from the source per read. Default: {DEFAULT_BLOCK_SIZE}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct TotalPowerArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "source")]
    #[serde(default)]
    pub(super) source_args: SourceArgs,

    #[clap(short, long, help = BLOCK_SIZE_HELP.as_str(), help_heading = "INTEGRATION")]
    pub(super) block_size: Option<usize>,

    /// The integration time [seconds].
    #[clap(short, long, help_heading = "INTEGRATION")]
    pub(super) t_int: Option<f64>,

    #[clap(long, help = LIMIT_POLICY_HELP.as_str(), help_heading = "INTEGRATION")]
    pub(super) limit_policy: Option<String>,

    /// Read blocks on a separate thread, aggregating their powers as they
    /// arrive.
    #[clap(long = "async", help_heading = "INTEGRATION")]
    #[serde(default)]
    pub(super) use_async: bool,
}

impl TotalPowerArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<TotalPowerArgs, RtlobsError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let TotalPowerArgs {
                args_file: _,
                source_args,
                block_size,
                t_int,
                limit_policy,
                use_async,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(TotalPowerArgs {
                args_file: None,
                source_args: cli_args.source_args.merge(source_args),
                block_size: cli_args.block_size.or(block_size),
                t_int: cli_args.t_int.or(t_int),
                limit_policy: cli_args.limit_policy.or(limit_policy),
                use_async: cli_args.use_async || use_async,
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<TotalPowerParams, RtlobsError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            source_args,
            block_size,
            t_int,
            limit_policy,
            use_async,
        } = self;

        let source = source_args.parse(DEFAULT_NOISE_SOURCE_BIT)?;
        let t_int = t_int.ok_or(ArgsError::Missing {
            arg: "--t-int",
            what: "integration time",
        })?;
        let block_size = block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
        let policy = parse_limit_policy(limit_policy)?;
        // Catch bad combinations before the source is used.
        let limit = IntegrationLimit::new(policy, source.rate, block_size, t_int)?;

        let mut printer = InfoPrinter::new("Total-power integration");
        printer
            .quantity("Block size", block_size, "samples")
            .quantity("Integration time", t_int, "s")
            .field("Limit policy", policy);
        if let Some(blocks) = limit.expected_blocks() {
            printer.field("Blocks", blocks);
        }
        if use_async {
            printer.end_block().note("Reading on a separate thread");
        }
        printer.display();

        Ok(TotalPowerParams {
            source,
            block_size,
            t_int,
            policy,
            use_async,
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
