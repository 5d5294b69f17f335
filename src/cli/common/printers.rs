// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tree-style summaries of parsed arguments, and the warnings collected while
//! parsing them.

use std::{borrow::Cow, fmt::Display, path::Path, sync::Mutex};

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

lazy_static::lazy_static! {
    static ref PENDING_WARNINGS: Mutex<Vec<Cow<'static, str>>> = Mutex::new(vec![]);
}

#[derive(Debug, Clone, PartialEq)]
enum Row {
    /// A value with a label. Labels are aligned across the whole summary.
    Field { label: &'static str, value: String },

    /// Free text.
    Note(Cow<'static, str>),
}

/// A summary of what a subcommand is about to do. Rows are added to the
/// current block; [`InfoPrinter::end_block`] starts a new one.
pub(crate) struct InfoPrinter {
    title: &'static str,
    blocks: Vec<Vec<Row>>,
}

impl InfoPrinter {
    pub(crate) fn new(title: &'static str) -> Self {
        Self {
            title,
            blocks: vec![vec![]],
        }
    }

    fn push(&mut self, row: Row) -> &mut Self {
        // `blocks` is never empty.
        if let Some(block) = self.blocks.last_mut() {
            block.push(row);
        }
        self
    }

    pub(crate) fn field(&mut self, label: &'static str, value: impl Display) -> &mut Self {
        self.push(Row::Field {
            label,
            value: value.to_string(),
        })
    }

    /// A value followed by its unit, e.g. "1024 samples".
    pub(crate) fn quantity(
        &mut self,
        label: &'static str,
        value: impl Display,
        unit: &str,
    ) -> &mut Self {
        self.field(label, format!("{value} {unit}"))
    }

    /// A frequency given in Hz, shown in MHz.
    pub(crate) fn freq(&mut self, label: &'static str, hz: f64) -> &mut Self {
        self.quantity(label, hz / 1e6, "MHz")
    }

    pub(crate) fn path(&mut self, label: &'static str, path: &Path) -> &mut Self {
        self.field(label, path.display())
    }

    pub(crate) fn note(&mut self, line: impl Into<Cow<'static, str>>) -> &mut Self {
        self.push(Row::Note(line.into()))
    }

    pub(crate) fn end_block(&mut self) -> &mut Self {
        if self.blocks.last().map(|b| !b.is_empty()).unwrap_or(true) {
            self.blocks.push(vec![]);
        }
        self
    }

    /// The summary's lines, without the title.
    pub(super) fn lines(&self) -> Vec<String> {
        render(&self.blocks)
    }

    /// Log the summary, followed by any warnings collected so far.
    pub(crate) fn display(self) {
        log::info!("{}", console::style(self.title).bold());
        for line in self.lines() {
            log::info!("{line}");
        }
        log::info!("");
        display_warnings();
    }
}

fn render(blocks: &[Vec<Row>]) -> Vec<String> {
    let label_width = blocks
        .iter()
        .flatten()
        .filter_map(|row| match row {
            Row::Field { label, .. } => Some(label.len()),
            Row::Note(_) => None,
        })
        .max()
        .unwrap_or(0);

    let blocks: Vec<&Vec<Row>> = blocks.iter().filter(|b| !b.is_empty()).collect();
    let num_blocks = blocks.len();
    let mut lines = vec![];
    for (i_block, block) in blocks.into_iter().enumerate() {
        let num_lines = block.len();
        for (i_line, row) in block.iter().enumerate() {
            let symbol = match (i_line, i_line + 1 == num_lines, i_block + 1 == num_blocks) {
                (0, false, _) => VERTICAL_AND_RIGHT,
                (0, _, false) => VERTICAL_AND_RIGHT,
                (0, true, true) => UP_AND_RIGHT,
                _ => VERTICAL,
            };
            let text = match row {
                Row::Field { label, value } => {
                    format!("{:<w$} {value}", format!("{label}:"), w = label_width + 1)
                }
                Row::Note(note) => note.to_string(),
            };
            lines.push(format!("{symbol} {text}"));
        }
    }
    lines
}

pub(crate) trait Warn {
    fn warn(self);
}

impl Warn for String {
    fn warn(self) {
        PENDING_WARNINGS.lock().unwrap().push(self.into());
    }
}

/// Log and forget the warnings collected so far, one block each.
fn display_warnings() {
    let warnings: Vec<Vec<Row>> = PENDING_WARNINGS
        .lock()
        .unwrap()
        .drain(..)
        .map(|w| vec![Row::Note(w)])
        .collect();
    log::debug!("Displaying {} warnings", warnings.len());
    if warnings.is_empty() {
        return;
    }

    log::warn!("{}", console::style("Warnings").bold());
    for line in render(&warnings) {
        log::warn!("{line}");
    }
    log::warn!("");
}
