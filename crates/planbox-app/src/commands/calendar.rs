use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::Args;
use planbox_core::config::Settings;
use planbox_engine::{Calendar, DateRange, RuleRequest};
use planbox_service::{Checkbox, MemoryStore, Plan, PlannerService};
use serde::Deserialize;

use super::print_json;

#[derive(Args)]
pub struct CalendarCommand {
    /// JSON document describing the plans and their groups
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// First date of the search window
    #[arg(long)]
    start: NaiveDate,

    /// Last date of the search window
    #[arg(long)]
    end: NaiveDate,
}

/// Input document: `{ "plans": [{ "title", "window", "groups": [...] }] }`.
#[derive(Debug, Deserialize)]
struct PlansDocument {
    plans: Vec<PlanInput>,
}

#[derive(Debug, Deserialize)]
struct PlanInput {
    title: String,
    window: DateRange,
    #[serde(default)]
    groups: Vec<GroupInput>,
}

#[derive(Debug, Deserialize)]
struct GroupInput {
    title: String,
    rule: RuleRequest,
}

impl CalendarCommand {
    pub fn execute(self, settings: &Settings) -> Result<()> {
        let document = read_document(&self.input)?;
        let search = DateRange::between(self.start, self.end)?;
        let calendar = build(&document, search, settings)?;
        print_json(&calendar)
    }
}

fn read_document(path: &Path) -> Result<PlansDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid plans document {}", path.display()))
}

fn build(
    document: &PlansDocument,
    search: DateRange,
    settings: &Settings,
) -> Result<Calendar<Plan, Checkbox>> {
    let mut service = PlannerService::new(MemoryStore::new(), settings.limits);

    for input in &document.plans {
        // Documents may describe past plans, so each is accepted as of its own start.
        let plan = service.create_plan(input.title.as_str(), input.window, input.window.start())?;
        for group in &input.groups {
            service
                .create_group(plan.id, group.title.as_str(), &group.rule)
                .with_context(|| format!("Group `{}` of plan `{}`", group.title, input.title))?;
        }
    }
    tracing::info!(
        plans = document.plans.len(),
        checkboxes = service.store().checkbox_count(),
        "Plans loaded"
    );

    Ok(service.calendar(search)?)
}
