// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::{
    common::{
        parse_limit_policy, ArgsError, InfoPrinter, SourceArgs, ARG_FILE_HELP, LIMIT_POLICY_HELP,
    },
    total_power::BLOCK_SIZE_HELP,
};
use crate::{
    constants::{DEFAULT_BLOCK_SIZE, DEFAULT_NOISE_SOURCE_BIT},
    params::{LoadPower, YFactorParams},
    total_power::IntegrationLimit,
    RtlobsError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct YFactorArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// The physical temperature of the hot load [K].
    #[clap(long, help_heading = "LOADS")]
    pub(super) t_hot: Option<f64>,

    /// The physical temperature of the cold load [K].
    #[clap(long, help_heading = "LOADS")]
    pub(super) t_cold: Option<f64>,

    /// The measured total power of the hot load, in the same units as
    /// --p-cold.
    #[clap(long, help_heading = "MEASURED POWERS")]
    pub(super) p_hot: Option<f64>,

    /// The measured total power of the cold load.
    #[clap(long, help_heading = "MEASURED POWERS")]
    pub(super) p_cold: Option<f64>,

    /// An IQ capture of the hot load.
    #[clap(long, parse(from_os_str), help_heading = "LOAD CAPTURES")]
    pub(super) hot: Option<PathBuf>,

    /// An IQ capture of the cold load.
    #[clap(long, parse(from_os_str), help_heading = "LOAD CAPTURES")]
    pub(super) cold: Option<PathBuf>,

    /// The sample format of both captures.
    #[clap(long, help_heading = "LOAD CAPTURES")]
    pub(super) iq_format: Option<String>,

    /// The sample rate of both captures [Hz].
    #[clap(short = 'r', long, help_heading = "LOAD CAPTURES")]
    pub(super) sample_rate: Option<f64>,

    #[clap(short, long, help = BLOCK_SIZE_HELP.as_str(), help_heading = "LOAD CAPTURES")]
    pub(super) block_size: Option<usize>,

    /// How long to integrate each capture for [seconds].
    #[clap(short, long, help_heading = "LOAD CAPTURES")]
    pub(super) t_int: Option<f64>,

    #[clap(long, help = LIMIT_POLICY_HELP.as_str(), help_heading = "LOAD CAPTURES")]
    pub(super) limit_policy: Option<String>,
}

impl YFactorArgs {
    pub(super) fn merge(self) -> Result<YFactorArgs, RtlobsError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let YFactorArgs {
                args_file: _,
                t_hot,
                t_cold,
                p_hot,
                p_cold,
                hot,
                cold,
                iq_format,
                sample_rate,
                block_size,
                t_int,
                limit_policy,
            } = unpack_arg_file!(arg_file);

            Ok(YFactorArgs {
                args_file: None,
                t_hot: cli_args.t_hot.or(t_hot),
                t_cold: cli_args.t_cold.or(t_cold),
                p_hot: cli_args.p_hot.or(p_hot),
                p_cold: cli_args.p_cold.or(p_cold),
                hot: cli_args.hot.or(hot),
                cold: cli_args.cold.or(cold),
                iq_format: cli_args.iq_format.or(iq_format),
                sample_rate: cli_args.sample_rate.or(sample_rate),
                block_size: cli_args.block_size.or(block_size),
                t_int: cli_args.t_int.or(t_int),
                limit_policy: cli_args.limit_policy.or(limit_policy),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<YFactorParams, RtlobsError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            t_hot,
            t_cold,
            p_hot,
            p_cold,
            hot,
            cold,
            iq_format,
            sample_rate,
            block_size,
            t_int,
            limit_policy,
        } = self;

        let t_hot = t_hot.ok_or(ArgsError::Missing {
            arg: "--t-hot",
            what: "hot-load temperature",
        })?;
        let t_cold = t_cold.ok_or(ArgsError::Missing {
            arg: "--t-cold",
            what: "cold-load temperature",
        })?;
        for (what, value) in [
            ("hot-load temperature", t_hot),
            ("cold-load temperature", t_cold),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ArgsError::NotPositive { what, value }.into());
            }
        }

        let mut printer = InfoPrinter::new("Y-factor calibration");
        printer
            .quantity("Hot load", t_hot, "K")
            .quantity("Cold load", t_cold, "K")
            .end_block();
        if (p_hot.is_some() || p_cold.is_some()) && (hot.is_some() || cold.is_some()) {
            return Err(ArgsError::MixedLoadInputs.into());
        }
        let power = match (p_hot, p_cold, hot, cold) {
            (Some(p_hot), Some(p_cold), _, _) => {
                printer
                    .field("Hot-load power", p_hot)
                    .field("Cold-load power", p_cold);
                printer.display();
                LoadPower::Given { p_hot, p_cold }
            }

            (_, _, Some(hot), Some(cold)) => {
                let t_int = t_int.ok_or(ArgsError::Missing {
                    arg: "--t-int",
                    what: "integration time",
                })?;
                let block_size = block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
                let policy = parse_limit_policy(limit_policy)?;
                printer
                    .path("Hot-load capture", &hot)
                    .path("Cold-load capture", &cold)
                    .quantity("Block size", block_size, "samples")
                    .quantity("Integration time", t_int, "s per load")
                    .field("Limit policy", policy);
                printer.display();

                let load = |iq_file: PathBuf| {
                    SourceArgs {
                        iq_file: Some(iq_file),
                        iq_format: iq_format.clone(),
                        sample_rate,
                        ..Default::default()
                    }
                    .parse(DEFAULT_NOISE_SOURCE_BIT)
                };
                let (hot, cold) = (load(hot)?, load(cold)?);
                // Both loads share a sample rate.
                IntegrationLimit::new(policy, hot.rate, block_size, t_int)?;
                LoadPower::Measured {
                    hot,
                    cold,
                    block_size,
                    t_int,
                    policy,
                }
            }

            _ => {
                return Err(ArgsError::Missing {
                    arg: "--p-hot and --p-cold, or --hot and --cold",
                    what: "pair of load powers",
                }
                .into())
            }
        };

        Ok(YFactorParams {
            power,
            t_hot,
            t_cold,
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
