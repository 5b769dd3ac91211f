use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use planbox_core::config::LimitsConfig;
use planbox_engine::{DateRange, RevisionMap, revise};

use super::{ensure_within, print_json};

#[derive(Args)]
pub struct ReviseCommand {
    /// First date of the current window
    #[arg(long)]
    old_start: NaiveDate,

    /// Last date of the current window
    #[arg(long)]
    old_end: NaiveDate,

    /// First date of the edited window
    #[arg(long)]
    new_start: NaiveDate,

    /// Last date of the edited window
    #[arg(long)]
    new_end: NaiveDate,
}

impl ReviseCommand {
    pub fn execute(self, limits: LimitsConfig) -> Result<()> {
        let map = self.run(limits)?;
        print_json(&map)
    }

    /// The map covers the union span of both windows, so that span is what
    /// gets bounded.
    fn run(&self, limits: LimitsConfig) -> Result<RevisionMap> {
        let old = DateRange::between(self.old_start, self.old_end)?;
        let new = DateRange::between(self.new_start, self.new_end)?;
        ensure_within(old.union_span(&new), limits.max_window_days)?;
        Ok(revise(old, new))
    }
}
