// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Miscellaneous things.

use chrono::{DateTime, Local, Utc};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::PROGRESS_BARS;

/// Make a progress bar counting sample blocks. With no known length (e.g.
/// integrating against the wall clock), a spinner is shown instead.
pub(crate) fn make_block_progress_bar(len: Option<u64>, message: String) -> ProgressBar {
    let style = match len {
        Some(_) => ProgressStyle::default_bar()
            .template("{msg:18}: [{wide_bar:.blue}] {pos:3}/{len:3} ({elapsed_precise}<{eta_precise})")
            .unwrap()
            .progress_chars("=> "),
        None => ProgressStyle::default_spinner()
            .template("{msg:18}: {spinner:.blue} {pos} blocks ({elapsed_precise})")
            .unwrap(),
    };
    ProgressBar::with_draw_target(
        len,
        if PROGRESS_BARS.load() {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(style)
    .with_position(0)
    .with_message(message)
}

/// Format a UTC time in the local time zone, e.g. "Sun, 19 Oct 2025 21:04:05".
pub(crate) fn local_timestamp(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local)
        .format("%a, %d %b %Y %H:%M:%S")
        .to_string()
}
