// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Spectrum text files.
//!
//! These are whitespace-delimited `frequency power` rows following
//! [`SPECTRUM_FILE_HEADER_LINES`] comment lines, which is what existing
//! plotting scripts expect. Values are written with enough digits that reading
//! a file back gives exactly the numbers that were written.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use chrono::Utc;
use log::debug;
use ndarray::{Array1, ArrayView1};

use super::SpectrumFileError;
use crate::{
    constants::SPECTRUM_FILE_HEADER_LINES, misc::local_timestamp, spectrum::SpectrumEstimate,
};

/// Write a spectrum to `path`, replacing anything already there.
pub fn write_spectrum(
    path: &Path,
    freqs: ArrayView1<f64>,
    power: ArrayView1<f64>,
) -> Result<(), SpectrumFileError> {
    if freqs.len() != power.len() {
        return Err(SpectrumFileError::LengthMismatch {
            freqs: freqs.len(),
            power: power.len(),
        });
    }

    let mut f = BufWriter::new(File::create(path)?);
    let header = [
        format!("rtlobs {} spectrum", env!("CARGO_PKG_VERSION")),
        format!("written {}", local_timestamp(Utc::now())),
        format!("{} bins", freqs.len()),
        String::new(),
        "frequency [Hz] power".to_string(),
    ];
    debug_assert_eq!(header.len(), SPECTRUM_FILE_HEADER_LINES);
    for line in header {
        writeln!(f, "# {line}")?;
    }
    for (freq, p) in freqs.iter().zip(power.iter()) {
        writeln!(f, "{freq:e} {p:e}")?;
    }
    f.flush()?;
    debug!("Wrote {} spectrum rows to {}", freqs.len(), path.display());

    Ok(())
}

/// Read a spectrum written by [`write_spectrum`] (or anything else with the
/// same layout). The first [`SPECTRUM_FILE_HEADER_LINES`] lines are skipped
/// whatever they contain; after that, blank lines and lines starting with `#`
/// are ignored.
pub fn read_spectrum(path: &Path) -> Result<SpectrumEstimate, SpectrumFileError> {
    let file = path.display().to_string();
    let reader = BufReader::new(File::open(path)?);

    let mut freqs = vec![];
    let mut power = vec![];
    for (i_line, line) in reader.lines().enumerate().skip(SPECTRUM_FILE_HEADER_LINES) {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = |reason: String| SpectrumFileError::Malformed {
            file: file.clone(),
            line: i_line + 1,
            reason,
        };
        let mut columns = line.split_whitespace();
        let (freq, p) = match (columns.next(), columns.next(), columns.next()) {
            (Some(freq), Some(p), None) => (freq, p),
            _ => {
                return Err(malformed(format!(
                    "expected 2 columns, got {}",
                    line.split_whitespace().count()
                )))
            }
        };
        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|e| malformed(format!("couldn't parse '{s}' as a number: {e}")))
        };
        freqs.push(parse(freq)?);
        power.push(parse(p)?);
    }

    if freqs.is_empty() {
        return Err(SpectrumFileError::Empty(file));
    }
    debug!("Read {} spectrum rows from {file}", freqs.len());

    Ok(SpectrumEstimate {
        freqs: Array1::from(freqs),
        power: Array1::from(power),
    })
}
