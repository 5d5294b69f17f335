// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading and writing results.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpectrumFileError {
    #[error("Can't write a spectrum with {freqs} frequencies and {power} powers; they must be the same length")]
    LengthMismatch { freqs: usize, power: usize },

    #[error("{file} line {line}: {reason}")]
    Malformed {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{0} contains no spectrum rows")]
    Empty(String),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum FileWriteError {
    #[error("Cannot write to the specified file '{file}'. Do you have write permissions set?")]
    FileNotWritable { file: String },

    #[error(
        "Couldn't create directory '{}' for output files. Do you have write permissions set?",
        .0.display()
    )]
    NewDirectory(PathBuf),

    #[error("'{}' is a directory, not a file", .0.display())]
    IsADirectory(PathBuf),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
