// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Total-power integration with block delivery on a background thread.
//!
//! A reader thread pulls blocks from the source and, per block, removes the DC
//! offset and computes the block's power. Powers are sent in arrival order
//! over a channel to the calling thread, which is the only owner of the
//! [`IntegrationState`].

use std::thread::{self, ScopedJoinHandle};

use crossbeam_channel::bounded;
use crossbeam_utils::atomic::AtomicCell;
use log::{debug, info};
use scopeguard::defer_on_unwind;

use super::{log_plan, IntegrationLimit, IntegrationState, LimitPolicy, TotalPower};
use crate::{
    dsp::{block_power, remove_dc_offset},
    error::RadiometerError,
    misc::{local_timestamp, make_block_progress_bar},
    source::{read_exact_block, SampleSource, SourceError},
};

/// Block powers waiting to be aggregated. The reader blocks once this many
/// are queued.
const CHANNEL_CAPACITY: usize = 64;

/// Like [`super::integrate`], but reading happens on its own thread.
///
/// Delivery stops at block boundaries once the limit is reached; the last
/// block may finish after `t_int` has elapsed. A read failure stops the
/// integration and is returned once the reader thread has been joined.
pub fn integrate_async<S: SampleSource + Send + ?Sized>(
    source: &mut S,
    block_size: usize,
    t_int: f64,
    policy: LimitPolicy,
) -> Result<TotalPower, RadiometerError> {
    let rate = source.rate();
    let limit = IntegrationLimit::new(policy, rate, block_size, t_int)?;
    log_plan(rate, block_size, t_int, &limit);

    let (tx, rx) = bounded(CHANNEL_CAPACITY);
    // Use a variable to track whether any threads have an issue.
    let error = AtomicCell::new(false);

    let mut state = IntegrationState::start();
    let start = state.start;
    info!("Integration began at {}", local_timestamp(state.start_time));
    let pb = make_block_progress_bar(limit.expected_blocks(), "Integrating".to_string());

    let read_result: Result<(), SourceError> = thread::scope(|scope| {
        let reader: ScopedJoinHandle<Result<(), SourceError>> = thread::Builder::new()
            .name("read".to_string())
            .spawn_scoped(scope, || {
                // If a panic happens, update our atomic error.
                defer_on_unwind! { error.store(true); }

                let mut delivered = 0;
                while !limit.is_reached(delivered, start.elapsed()) && !error.load() {
                    let mut block = match read_exact_block(source, block_size) {
                        Ok(block) => block,
                        Err(e) => {
                            error.store(true);
                            return Err(e);
                        }
                    };
                    remove_dc_offset(&mut block);
                    match tx.send(block_power(&block)) {
                        Ok(()) => (),
                        // The aggregator has gone away; it can only do that
                        // by panicking, so stop quietly.
                        Err(_) => break,
                    }
                    delivered += 1;
                }

                drop(tx);
                debug!("Finished reading after {delivered} blocks");
                Ok(())
            })
            .expect("OS can create threads");

        // Aggregate on this thread. The channel closes when the reader is
        // done.
        for power in rx.iter() {
            state.add_block_power(power);
            pb.inc(1);
        }

        reader.join().unwrap()
    });
    read_result?;
    pb.finish();

    Ok(state.finish(rate, block_size)?)
}
