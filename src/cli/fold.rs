// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info};

use super::common::InfoPrinter;
use crate::{io::can_write_to_file, params::FoldParams, RtlobsError};

/// Fold an ON and an OFF spectrum, both in linear power units, as written by
/// `fswitch --output-on --output-off`.
#[derive(Parser, Debug, Clone, Default)]
pub(super) struct FoldArgs {
    /// The ON spectrum file.
    #[clap(long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) on: PathBuf,

    /// The OFF spectrum file.
    #[clap(long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) off: PathBuf,

    /// Write the folded spectrum to this file.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

impl FoldArgs {
    fn parse(self) -> Result<FoldParams, RtlobsError> {
        debug!("{:#?}", self);

        let FoldArgs { on, off, output } = self;
        if let Some(output) = &output {
            can_write_to_file(output)?;
        }

        let mut printer = InfoPrinter::new("Folding");
        printer.path("ON", &on).path("OFF", &off);
        if let Some(output) = &output {
            printer.end_block().path("Writing to", output);
        }
        printer.display();

        Ok(FoldParams { on, off, output })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), RtlobsError> {
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}
