use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use planbox_core::config::LimitsConfig;
use planbox_engine::{DateRange, RuleRequest, generate};

use super::{ensure_within, print_json};

#[derive(Args)]
pub struct GenerateCommand {
    /// First date of the window (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// Last date of the window, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,

    /// Repetition option: 1 daily, 2 interval, 3 weekdays
    #[arg(long)]
    option: u8,

    /// Rule value; repeat for several weekdays
    #[arg(long = "value", value_name = "VALUE")]
    values: Vec<String>,
}

impl GenerateCommand {
    pub fn execute(self, limits: LimitsConfig) -> Result<()> {
        let dates = self.run(limits)?;
        print_json(&dates)
    }

    fn run(&self, limits: LimitsConfig) -> Result<Vec<NaiveDate>> {
        let window = DateRange::between(self.start, self.end)?;
        ensure_within(window, limits.max_window_days)?;
        let rule = RuleRequest::new(self.option, self.values.iter().map(String::as_str)).validate()?;
        let occurrences = generate(window, &rule);
        tracing::info!(%window, %rule, count = occurrences.count(), "Generated dates");
        Ok(occurrences.to_vec())
    }
}
