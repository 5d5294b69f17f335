// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Dicke-switched time series as text files.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use chrono::{DateTime, Utc};
use log::debug;

use crate::dicke::{DickeDifference, DickeSeries};

/// Seconds since the Unix epoch, to the microsecond.
fn unix_seconds(t: DateTime<Utc>) -> f64 {
    t.timestamp_micros() as f64 / 1e6
}

/// Write one `unix_seconds power noise_on` row per block.
pub fn write_dicke_series(path: &Path, series: &DickeSeries) -> Result<(), std::io::Error> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(f, "# unix_seconds power noise_on")?;
    for s in &series.samples {
        writeln!(
            f,
            "{:.6} {:e} {}",
            unix_seconds(s.timestamp),
            s.power,
            u8::from(s.noise_on)
        )?;
    }
    f.flush()?;
    debug!("Wrote {} samples to {}", series.len(), path.display());
    Ok(())
}

/// Write one `unix_seconds power` row per noise-off minus noise-on difference.
pub fn write_dicke_differences(
    path: &Path,
    differences: &[DickeDifference],
) -> Result<(), std::io::Error> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(f, "# unix_seconds power_difference")?;
    for d in differences {
        writeln!(f, "{:.6} {:e}", unix_seconds(d.timestamp), d.power)?;
    }
    f.flush()?;
    debug!("Wrote {} differences to {}", differences.len(), path.display());
    Ok(())
}
