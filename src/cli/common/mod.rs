// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. Every observing subcommand
//! needs a sample source, so the same source arguments are shared between
//! them.

mod printers;
#[cfg(test)]
mod tests;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::Warn;

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{
    constants::{DEFAULT_CENTER_FREQ, DEFAULT_GAIN, DEFAULT_SAMPLE_RATE},
    dsp::PeriodogramDevice,
    params::{SourceKind, SourceParams},
    source::{IqFormat, Tone},
    total_power::LimitPolicy,
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    static ref IQ_FORMATS: String = IqFormat::iter().join(", ");

    static ref IQ_FORMAT_HELP: String =
        format!("The sample format of the IQ capture. If not given, it's guessed from the file extension, falling back to cu8. Supported formats: {}", *IQ_FORMATS);

    static ref SAMPLE_RATE_HELP: String =
        format!("The receiver sample rate [Hz]. Default: {DEFAULT_SAMPLE_RATE}");

    static ref CENTER_FREQ_HELP: String =
        format!("The receiver centre frequency [Hz]. Default: {DEFAULT_CENTER_FREQ}");

    static ref GAIN_HELP: String =
        format!("The receiver gain [dB]. Default: {DEFAULT_GAIN}");

    pub(super) static ref PERIODOGRAM_DEVICES: String = PeriodogramDevice::iter().join(", ");

    pub(super) static ref DEVICE_HELP: String =
        format!("Where periodograms are computed. Default: {}. Valid devices are: {}", PeriodogramDevice::default(), *PERIODOGRAM_DEVICES);

    pub(super) static ref LIMIT_POLICIES: String = LimitPolicy::iter().join(", ");

    pub(super) static ref LIMIT_POLICY_HELP: String =
        format!("How the integration decides it's finished; 'fixed-budget' reads as many blocks as t_int seconds of samples fill, 'free-running' reads until t_int seconds have passed. Default: {}. Valid policies are: {}", LimitPolicy::default(), *LIMIT_POLICIES);
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(RtlobsError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(RtlobsError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(RtlobsError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Where samples come from: a raw IQ capture or generated tones.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SourceArgs {
    /// Replay this raw IQ capture as though it were a live receiver.
    #[clap(short = 'i', long, parse(from_os_str), help_heading = "SAMPLE SOURCE")]
    pub(super) iq_file: Option<PathBuf>,

    #[clap(long, help = IQ_FORMAT_HELP.as_str(), help_heading = "SAMPLE SOURCE")]
    pub(super) iq_format: Option<String>,

    /// Go back to the start of the IQ capture when it runs out, rather than
    /// failing.
    #[clap(long = "loop", help_heading = "SAMPLE SOURCE")]
    #[serde(default)]
    pub(super) loop_iq_file: bool,

    /// Generate tones rather than reading a capture. Each tone is a pair of
    /// values: its absolute frequency [Hz] and its amplitude. e.g. --tones
    /// 1420405751 0.5 1420500000 0.1
    #[clap(
        long,
        multiple_values(true),
        value_names = &["FREQ_HZ", "AMPLITUDE"],
        help_heading = "SAMPLE SOURCE"
    )]
    pub(super) tones: Option<Vec<f64>>,

    /// A generated tone that's only present while the noise-source output is
    /// high: its absolute frequency [Hz] and its amplitude.
    #[clap(
        long,
        number_of_values = 2,
        value_names = &["FREQ_HZ", "AMPLITUDE"],
        help_heading = "SAMPLE SOURCE"
    )]
    pub(super) noise_tone: Option<Vec<f64>>,

    #[clap(short = 'r', long, help = SAMPLE_RATE_HELP.as_str(), help_heading = "SAMPLE SOURCE")]
    pub(super) sample_rate: Option<f64>,

    #[clap(short = 'f', long, help = CENTER_FREQ_HELP.as_str(), help_heading = "SAMPLE SOURCE")]
    pub(super) center_freq: Option<f64>,

    #[clap(short = 'g', long, help = GAIN_HELP.as_str(), help_heading = "SAMPLE SOURCE")]
    pub(super) gain: Option<f64>,
}

impl SourceArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        SourceArgs {
            iq_file: self.iq_file.or(other.iq_file),
            iq_format: self.iq_format.or(other.iq_format),
            loop_iq_file: self.loop_iq_file || other.loop_iq_file,
            tones: self.tones.or(other.tones),
            noise_tone: self.noise_tone.or(other.noise_tone),
            sample_rate: self.sample_rate.or(other.sample_rate),
            center_freq: self.center_freq.or(other.center_freq),
            gain: self.gain.or(other.gain),
        }
    }

    /// A generated noise tone is switched by `noise_source_bit`.
    pub(super) fn parse(self, noise_source_bit: u8) -> Result<SourceParams, SourceArgsError> {
        let SourceArgs {
            iq_file,
            iq_format,
            loop_iq_file,
            tones,
            noise_tone,
            sample_rate,
            center_freq,
            gain,
        } = self;

        let mut printer = InfoPrinter::new("Sample source");
        let kind = match (iq_file, tones, noise_tone) {
            (Some(path), None, None) => {
                if !path.exists() {
                    return Err(SourceArgsError::IqFileDoesNotExist(path));
                }
                let format = match iq_format {
                    Some(f) => IqFormat::from_str(&f.to_lowercase())
                        .map_err(|_| SourceArgsError::BadIqFormat(f))?,
                    None => path
                        .extension()
                        .and_then(|e| e.to_str())
                        .and_then(|e| IqFormat::from_str(&e.to_lowercase()).ok())
                        .unwrap_or(IqFormat::Cu8),
                };
                printer.path("IQ capture", &path).field("Format", format);
                if loop_iq_file {
                    printer.note("Looping at the end of the capture");
                }
                SourceKind::IqFile {
                    path,
                    format,
                    looping: loop_iq_file,
                }
            }

            (Some(_), _, _) => return Err(SourceArgsError::BothSources),

            (None, None, None) => return Err(SourceArgsError::NoSource),

            (None, tones, noise_tone) => {
                let tones = parse_tones(tones.unwrap_or_default())?;
                let switched = match noise_tone {
                    Some(v) => match parse_tones(v)?.as_slice() {
                        [tone] => Some((noise_source_bit, *tone)),
                        _ => return Err(SourceArgsError::OddToneValues(1)),
                    },
                    None => None,
                };
                printer.note("Synthetic tones:");
                for tone in &tones {
                    printer.note(format!(
                        "  {:.6} MHz, amplitude {}",
                        tone.freq / 1e6,
                        tone.amplitude
                    ));
                }
                if let Some((bit, tone)) = switched {
                    printer.note(format!(
                        "  {:.6} MHz, amplitude {}, while output {bit} is high",
                        tone.freq / 1e6,
                        tone.amplitude
                    ));
                }
                SourceKind::Synthetic { tones, switched }
            }
        };

        let rate = sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
        let center_freq = center_freq.unwrap_or(DEFAULT_CENTER_FREQ);
        let gain = gain.unwrap_or(DEFAULT_GAIN);
        printer
            .end_block()
            .freq("Sample rate", rate)
            .freq("Centre frequency", center_freq)
            .quantity("Gain", gain, "dB");
        printer.display();

        Ok(SourceParams {
            kind,
            rate,
            center_freq,
            gain,
        })
    }
}

fn parse_tones(values: Vec<f64>) -> Result<Vec<Tone>, SourceArgsError> {
    if values.len() % 2 != 0 {
        return Err(SourceArgsError::OddToneValues(values.len()));
    }
    Ok(values
        .into_iter()
        .tuples()
        .map(|(freq, amplitude)| Tone::new(freq, amplitude))
        .collect())
}

pub(super) fn parse_device(device: Option<String>) -> Result<PeriodogramDevice, ArgsError> {
    match device {
        None => Ok(PeriodogramDevice::default()),
        Some(d) => {
            PeriodogramDevice::from_str(&d.to_lowercase()).map_err(|_| ArgsError::BadDevice(d))
        }
    }
}

pub(super) fn parse_limit_policy(policy: Option<String>) -> Result<LimitPolicy, ArgsError> {
    match policy {
        None => Ok(LimitPolicy::default()),
        Some(p) => {
            LimitPolicy::from_str(&p.to_lowercase()).map_err(|_| ArgsError::BadLimitPolicy(p))
        }
    }
}

#[derive(Error, Debug)]
pub(super) enum SourceArgsError {
    #[error("No sample source was specified; give an IQ capture (--iq-file) or tones to generate (--tones)")]
    NoSource,

    #[error("An IQ capture and generated tones can't be used together")]
    BothSources,

    #[error("The IQ capture '{}' doesn't exist", .0.display())]
    IqFileDoesNotExist(PathBuf),

    #[error("Unrecognised IQ sample format '{0}'. Supported formats: {}", *IQ_FORMATS)]
    BadIqFormat(String),

    #[error("Tones are given as pairs of frequency and amplitude, but {0} value(s) were given")]
    OddToneValues(usize),
}

#[derive(Error, Debug)]
pub(super) enum ArgsError {
    #[error("No {what} was specified ({arg})")]
    Missing {
        arg: &'static str,
        what: &'static str,
    },

    #[error("Unrecognised periodogram device '{0}'. Valid devices are: {}", *PERIODOGRAM_DEVICES)]
    BadDevice(String),

    #[error("Unrecognised integration limit policy '{0}'. Valid policies are: {}", *LIMIT_POLICIES)]
    BadLimitPolicy(String),

    #[error("The {what} must be positive and finite; got {value}")]
    NotPositive { what: &'static str, value: f64 },

    #[error("Give either load powers (--p-hot and --p-cold) or load captures (--hot and --cold), not both")]
    MixedLoadInputs,
}
