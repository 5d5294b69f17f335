// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Total-power (radiometer) integration.
//!
//! Each sample block has its DC offset removed, then its power (Σ|I|²+|Q|²)
//! is added to a running total. The result is the average power per sample.

mod callback;

pub use callback::integrate_async;

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    dsp::{block_power, c64, remove_dc_offset},
    error::{check_rate, check_t_int, ConfigError, DomainError, RadiometerError},
    misc::{local_timestamp, make_block_progress_bar},
    source::{read_exact_block, SampleSource},
};

/// How an integration decides it's finished.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum LimitPolicy {
    /// Keep reading until `t_int` seconds of wall-clock time have passed.
    #[strum(serialize = "free-running")]
    #[serde(rename = "free-running")]
    FreeRunning,

    /// Read exactly as many blocks as `t_int` seconds of samples fill.
    #[default]
    #[strum(serialize = "fixed-budget")]
    #[serde(rename = "fixed-budget")]
    FixedBudget,
}

/// A limit on an integration, checked between blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationLimit {
    WallClock(Duration),
    CallBudget(usize),
}

impl IntegrationLimit {
    pub fn new(
        policy: LimitPolicy,
        rate: f64,
        block_size: usize,
        t_int: f64,
    ) -> Result<IntegrationLimit, ConfigError> {
        if block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        check_t_int(t_int)?;
        check_rate(rate)?;

        Ok(match policy {
            LimitPolicy::FreeRunning => IntegrationLimit::WallClock(
                Duration::try_from_secs_f64(t_int)
                    .map_err(|_| ConfigError::BadIntegrationTime(t_int))?,
            ),
            LimitPolicy::FixedBudget => {
                let calls = (rate * t_int / block_size as f64).floor() as usize;
                IntegrationLimit::CallBudget(calls.max(1))
            }
        })
    }

    /// Has the integration finished? A wall-clock integration always takes at
    /// least one block.
    pub fn is_reached(&self, blocks: usize, elapsed: Duration) -> bool {
        match self {
            IntegrationLimit::WallClock(t_int) => blocks > 0 && elapsed >= *t_int,
            IntegrationLimit::CallBudget(calls) => blocks >= *calls,
        }
    }

    pub(crate) fn expected_blocks(&self) -> Option<u64> {
        match self {
            IntegrationLimit::WallClock(_) => None,
            IntegrationLimit::CallBudget(calls) => Some(*calls as u64),
        }
    }
}

/// The running state of one integration. It belongs to exactly one
/// integration and is never shared.
#[derive(Debug)]
pub struct IntegrationState {
    total_power: f64,
    block_count: usize,
    start: Instant,
    start_time: DateTime<Utc>,
}

impl IntegrationState {
    pub fn start() -> IntegrationState {
        IntegrationState {
            total_power: 0.0,
            block_count: 0,
            start: Instant::now(),
            start_time: Utc::now(),
        }
    }

    /// Remove the block's DC offset and add its power.
    pub fn add_block(&mut self, block: &mut [c64]) {
        remove_dc_offset(block);
        self.add_block_power(block_power(block));
    }

    /// Add the power of a block that has already been DC corrected.
    pub fn add_block_power(&mut self, power: f64) {
        self.total_power += power;
        self.block_count += 1;
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// `total_power / (block_size * block_count)`.
    pub fn average_power(&self, block_size: usize) -> Result<f64, DomainError> {
        if self.block_count == 0 || block_size == 0 {
            return Err(DomainError::NoBlocks);
        }
        Ok(self.total_power / (block_size * self.block_count) as f64)
    }

    fn finish(self, rate: f64, block_size: usize) -> Result<TotalPower, DomainError> {
        let elapsed = self.elapsed();
        info!(
            "Integration ended at {} after {:.3} seconds",
            local_timestamp(Utc::now()),
            elapsed.as_secs_f64()
        );
        debug!("{} calls were made to the sample source", self.block_count);
        let effective_t_int = (self.block_count * block_size) as f64 / rate;
        debug!("for an effective integration time of {effective_t_int:.2} s");

        Ok(TotalPower {
            average_power: self.average_power(block_size)?,
            block_count: self.block_count,
            elapsed,
            effective_t_int,
        })
    }
}

/// The result of a total-power integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalPower {
    /// Average power per sample, in uncalibrated units.
    pub average_power: f64,

    /// The number of blocks actually read.
    pub block_count: usize,

    /// Wall-clock time spent integrating.
    pub elapsed: Duration,

    /// The time spanned by the samples used \[s\].
    pub effective_t_int: f64,
}

fn log_plan(rate: f64, block_size: usize, t_int: f64, limit: &IntegrationLimit) {
    debug!("  num samples per call: {block_size}");
    debug!("  requested integration time: {t_int} s");
    debug!(
        "  => num samples to collect: {}",
        (rate * t_int).floor() as u64
    );
    match limit {
        IntegrationLimit::WallClock(_) => debug!("  => integrating against the wall clock"),
        IntegrationLimit::CallBudget(calls) => debug!("  => num of calls: {calls}"),
    }
}

/// Integrate the total power from `source` for `t_int` seconds, reading
/// blocks of `block_size` samples.
///
/// The source is borrowed; it isn't closed here, even on error.
pub fn integrate<S: SampleSource + ?Sized>(
    source: &mut S,
    block_size: usize,
    t_int: f64,
    policy: LimitPolicy,
) -> Result<TotalPower, RadiometerError> {
    let rate = source.rate();
    let limit = IntegrationLimit::new(policy, rate, block_size, t_int)?;
    log_plan(rate, block_size, t_int, &limit);

    let mut state = IntegrationState::start();
    info!("Integration began at {}", local_timestamp(state.start_time));
    let pb = make_block_progress_bar(limit.expected_blocks(), "Integrating".to_string());
    while !limit.is_reached(state.block_count, state.elapsed()) {
        let mut block = read_exact_block(source, block_size)?;
        state.add_block(&mut block);
        pb.inc(1);
    }
    pb.finish();

    Ok(state.finish(rate, block_size)?)
}
