//! Progress reporting for the encode/decode pipelines. Purely informational.

use colored::Colorize;
use kdam::{Animation, Bar, BarExt};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::ProgressStyle;

/// Told about each file before it is processed (`report`) and after it succeeded (`finished`).
/// `index` is 1-based.
pub trait ProgressObserver {
    fn report(&mut self, index: usize, total: usize, path: &Path);

    fn finished(&mut self, _index: usize, _total: usize, _path: &Path) {}
}

/// Silent observer.
#[derive(Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn report(&mut self, _index: usize, _total: usize, _path: &Path) {}
}

/// Number of decimal digits in `n` (1 for 0).
fn digits(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// `[ 7/12] path`, index right-aligned to the width of `total`.
pub fn format_progress_line(index: usize, total: usize, path: &Path) -> String {
    format!(
        "[{:>width$}/{}] {}",
        index,
        total,
        path.display(),
        width = digits(total)
    )
}

/// One line per file on stderr, `Done.` after each, optional pause for Enter between files.
#[derive(Default)]
pub struct LineProgress {
    pause: bool,
}

impl LineProgress {
    pub fn new(pause: bool) -> Self {
        Self { pause }
    }

    fn wait_for_enter(&self) {
        eprint!("Press Enter to continue . . . ");
        let _ = io::stderr().flush();
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
    }
}

impl ProgressObserver for LineProgress {
    fn report(&mut self, index: usize, total: usize, path: &Path) {
        eprintln!("{}", format_progress_line(index, total, path));
    }

    fn finished(&mut self, index: usize, total: usize, _path: &Path) {
        eprintln!("{}", "Done.".green());
        if self.pause && index < total {
            self.wait_for_enter();
        }
    }
}

/// kdam bar sized to the total on first report.
pub struct BarProgress {
    desc: &'static str,
    bar: Option<Bar>,
}

impl BarProgress {
    pub fn new(desc: &'static str) -> Self {
        Self { desc, bar: None }
    }
}

impl ProgressObserver for BarProgress {
    fn report(&mut self, _index: usize, total: usize, _path: &Path) {
        if self.bar.is_none() {
            let mut bar = kdam::tqdm!(
                total = total,
                desc = self.desc,
                animation = Animation::Classic,
                unit = " files"
            );
            let _ = bar.refresh();
            self.bar = Some(bar);
        }
    }

    fn finished(&mut self, _index: usize, _total: usize, _path: &Path) {
        if let Some(bar) = self.bar.as_mut() {
            let _ = bar.update(1);
        }
    }
}

/// Observer for the chosen style. `desc` labels the bar.
pub fn observer_for(
    style: ProgressStyle,
    pause: bool,
    desc: &'static str,
) -> Box<dyn ProgressObserver> {
    match style {
        ProgressStyle::Lines => Box::new(LineProgress::new(pause)),
        ProgressStyle::Bar => Box::new(BarProgress::new(desc)),
        ProgressStyle::Quiet => Box::new(NoProgress),
    }
}
