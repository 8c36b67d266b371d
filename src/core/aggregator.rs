//! Live aggregation of sync status records
//!
//! Consumes the status stream in arrival order (not sync-start order) and
//! maintains running per-outcome counts plus the full record history. Two
//! rendering modes, fixed for the life of a run: an in-place summary line
//! for interactive terminals, or one structured log event per record for
//! non-interactive / verbose / debug contexts.

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use super::status::{Outcome, StatusRecord};

/// How status records are rendered, selected once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Single summary line redrawn in place, with persisted lines for
    /// clone and error events
    Interactive,
    /// One structured log event per record, no live redraw
    Verbose,
}

/// Final tally of one run.
#[derive(Debug)]
pub struct RunReport {
    pub cloned: u64,
    pub fetched: u64,
    pub up_to_date: u64,
    pub errors: u64,
    /// Every record received, started markers included, in arrival order
    pub history: Vec<StatusRecord>,
}

impl RunReport {
    /// Number of completed status records observed.
    pub fn completed(&self) -> u64 {
        self.cloned + self.fetched + self.up_to_date + self.errors
    }

    /// The failed records, for a post-run summary.
    pub fn failures(&self) -> impl Iterator<Item = &StatusRecord> {
        self.history.iter().filter(|r| r.error.is_some())
    }
}

pub struct Aggregator {
    mode: RenderMode,
    cloned: u64,
    fetched: u64,
    up_to_date: u64,
    errors: u64,
    history: Vec<StatusRecord>,
    live: Option<ProgressBar>,
}

impl Aggregator {
    pub fn new(mode: RenderMode) -> Self {
        let live = match mode {
            RenderMode::Interactive => {
                let bar = ProgressBar::new(0);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{wide_msg}")
                        .expect("static summary template is valid"),
                );
                Some(bar)
            }
            RenderMode::Verbose => None,
        };
        Self {
            mode,
            cloned: 0,
            fetched: 0,
            up_to_date: 0,
            errors: 0,
            history: Vec::new(),
            live,
        }
    }

    /// Drives the aggregation loop until the status stream closes, then
    /// returns the final report.
    pub async fn run(mut self, mut records: UnboundedReceiver<StatusRecord>) -> RunReport {
        while let Some(record) = records.recv().await {
            self.observe(record);
        }
        if let Some(bar) = &self.live {
            bar.finish_with_message(self.summary_line());
        }
        RunReport {
            cloned: self.cloned,
            fetched: self.fetched,
            up_to_date: self.up_to_date,
            errors: self.errors,
            history: self.history,
        }
    }

    fn observe(&mut self, record: StatusRecord) {
        if record.is_completed() {
            if record.error.is_some() {
                self.errors += 1;
            } else {
                match record.outcome {
                    Some(Outcome::Cloned) => self.cloned += 1,
                    Some(Outcome::Fetched) => self.fetched += 1,
                    Some(Outcome::UpToDate) => self.up_to_date += 1,
                    // Error outcomes always carry an error value
                    Some(Outcome::Error) | None => {}
                }
            }
        }

        match self.mode {
            RenderMode::Interactive => self.render_interactive(&record),
            RenderMode::Verbose => render_verbose(&record),
        }
        self.history.push(record);
    }

    fn render_interactive(&self, record: &StatusRecord) {
        let bar = self
            .live
            .as_ref()
            .expect("interactive mode always has a live bar");

        // Clones and errors stay visible above the live summary.
        if let Some(error) = &record.error {
            bar.println(format!(
                " {}  {} - {}",
                Outcome::Error.symbol(),
                record.location.display(),
                error
            ));
        } else if record.outcome == Some(Outcome::Cloned) {
            bar.println(format!(
                " {}  {}",
                Outcome::Cloned.symbol(),
                record.location.display()
            ));
        }

        bar.set_message(self.summary_line());
    }

    fn summary_line(&self) -> String {
        let mut line = String::from("summary:");
        for (count, outcome) in [
            (self.cloned, Outcome::Cloned),
            (self.fetched, Outcome::Fetched),
            (self.up_to_date, Outcome::UpToDate),
            (self.errors, Outcome::Error),
        ] {
            if count > 0 {
                line.push_str(&format!(" {} {}", count, outcome.symbol()));
            }
        }
        line
    }
}

fn render_verbose(record: &StatusRecord) {
    let path = record.location.display();
    match (&record.error, record.outcome) {
        (Some(error), _) => warn!(path = %path, error = %error, "error"),
        (None, Some(Outcome::Cloned)) => info!(path = %path, "cloned"),
        (None, Some(Outcome::Fetched)) => debug!(path = %path, "fetched"),
        (None, Some(Outcome::UpToDate)) => debug!(path = %path, "up to date"),
        (None, Some(Outcome::Error)) | (None, None) => debug!(path = %path, "started"),
    }
}
