//! Planner use cases.
//!
//! ## Summary
//! Keeps each group's checkboxes equal to what its repetition rule selects
//! inside the plan window:
//! - group creation materializes one checkbox per generated date;
//! - a plan window edit applies the window revision incrementally;
//! - a rule edit regenerates the group from scratch.

use std::collections::HashSet;

use chrono::NaiveDate;
use planbox_core::config::LimitsConfig;
use planbox_engine::{
    Calendar, DateRange, RepetitionRule, RevisionMap, RuleRequest, build_calendar, generate,
    revise,
};
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};
use crate::model::{Checkbox, CheckboxId, Group, GroupId, Plan, PlanId};
use crate::store::{PlannerStore, StoreCalendarSource};

/// A group together with the number of checkboxes created for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializedGroup {
    pub group: Group,
    pub checkbox_count: usize,
}

/// Checkbox changes made by one plan window edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RevisionSummary {
    pub created: usize,
    pub removed: usize,
}

impl RevisionSummary {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.created == 0 && self.removed == 0
    }
}

/// Use-case service over a [`PlannerStore`].
pub struct PlannerService<S: PlannerStore> {
    store: S,
    limits: LimitsConfig,
}

impl<S: PlannerStore> PlannerService<S> {
    #[must_use]
    pub const fn new(store: S, limits: LimitsConfig) -> Self {
        Self { store, limits }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// ## Summary
    /// Creates a plan over `window`.
    ///
    /// ## Errors
    /// - [`ServiceError::PlanStartsInPast`] if the window starts before `today`.
    /// - [`ServiceError::WindowTooLong`] if the window exceeds the configured limit.
    #[tracing::instrument(skip(self, title), fields(window = %window))]
    pub fn create_plan(
        &mut self,
        title: impl Into<String>,
        window: DateRange,
        today: NaiveDate,
    ) -> ServiceResult<Plan> {
        if window.start() < today {
            return Err(ServiceError::PlanStartsInPast {
                start: window.start(),
                today,
            });
        }
        check_window(window, self.limits.max_window_days)?;

        let plan = Plan::new(title, window);
        self.store.insert_plan(plan.clone())?;
        tracing::info!(plan_id = %plan.id, "Plan created");
        Ok(plan)
    }

    /// ## Errors
    /// Returns [`ServiceError::NotFound`] if the plan does not exist.
    pub fn plan(&self, plan_id: PlanId) -> ServiceResult<Plan> {
        self.store
            .plan(plan_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("plan {plan_id}")))
    }

    /// ## Errors
    /// Returns [`ServiceError::NotFound`] if the group does not exist.
    pub fn group(&self, group_id: GroupId) -> ServiceResult<Group> {
        self.store
            .group(group_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("group {group_id}")))
    }

    /// ## Errors
    /// Returns storage errors.
    pub fn checkboxes(&self, group_id: GroupId) -> ServiceResult<Vec<Checkbox>> {
        self.store.checkboxes_for_group(group_id)
    }

    /// ## Summary
    /// Creates a group under a plan and materializes its checkboxes: one per
    /// date the rule selects inside the plan window.
    ///
    /// ## Errors
    /// - [`ServiceError::RuleValidation`] with every rule failure found.
    /// - [`ServiceError::NotFound`] if the plan does not exist.
    #[tracing::instrument(skip(self, title, request), fields(plan_id = %plan_id))]
    pub fn create_group(
        &mut self,
        plan_id: PlanId,
        title: impl Into<String>,
        request: &RuleRequest,
    ) -> ServiceResult<MaterializedGroup> {
        let rule = request.validate()?;
        let plan = self.plan(plan_id)?;

        let group = Group::new(plan.id, title, &rule);
        self.store.insert_group(group.clone())?;
        let checkbox_count = self.materialize(&group, plan.window, &rule)?;

        tracing::info!(group_id = %group.id, %rule, checkbox_count, "Group created");
        Ok(MaterializedGroup {
            group,
            checkbox_count,
        })
    }

    /// ## Summary
    /// Moves a plan to `new_window` and revises every group's checkboxes.
    ///
    /// Dates entering the plan get a checkbox when the group's rule, applied
    /// to the new window, selects them. Dates leaving the plan lose their
    /// checkboxes. Dates in both windows, and the gap between disjoint
    /// windows, are left alone. An unchanged window is a no-op.
    ///
    /// ## Errors
    /// - [`ServiceError::NotFound`] if the plan does not exist.
    /// - [`ServiceError::WindowTooLong`] if the window exceeds the configured limit.
    /// - [`ServiceError::EngineError`] if a stored rule is corrupt. Nothing
    ///   is changed in that case.
    #[tracing::instrument(skip(self), fields(new_window = %new_window))]
    pub fn update_plan_window(
        &mut self,
        plan_id: PlanId,
        new_window: DateRange,
    ) -> ServiceResult<RevisionSummary> {
        let mut plan = self.plan(plan_id)?;
        check_window(new_window, self.limits.max_window_days)?;

        let revision = revise(plan.window, new_window);
        if revision.is_empty() {
            return Ok(RevisionSummary::default());
        }

        // Every rule decodes before the store is touched.
        let groups = self
            .store
            .groups_for_plan(plan_id)?
            .into_iter()
            .map(|group| {
                let rule = group.repetition_rule()?;
                Ok((group, rule))
            })
            .collect::<ServiceResult<Vec<_>>>()?;

        let mut summary = RevisionSummary::default();
        for (group, rule) in &groups {
            let applied = self.apply_revision(group, rule, new_window, &revision)?;
            summary.created += applied.created;
            summary.removed += applied.removed;
        }

        plan.window = new_window;
        self.store.update_plan(&plan)?;
        tracing::info!(
            created = summary.created,
            removed = summary.removed,
            "Plan window revised"
        );
        Ok(summary)
    }

    /// ## Summary
    /// Replaces a group's rule and regenerates its checkboxes from the plan
    /// window. Check state of the old checkboxes is not carried over.
    ///
    /// ## Errors
    /// - [`ServiceError::RuleValidation`] with every rule failure found.
    /// - [`ServiceError::NotFound`] if the group or its plan does not exist.
    #[tracing::instrument(skip(self, request), fields(group_id = %group_id))]
    pub fn update_group_rule(
        &mut self,
        group_id: GroupId,
        request: &RuleRequest,
    ) -> ServiceResult<MaterializedGroup> {
        let rule = request.validate()?;
        let mut group = self.group(group_id)?;
        let plan = self.plan(group.plan_id)?;

        let removed = self.store.delete_checkboxes_for_group(group_id)?;
        group.rule = rule.to_storage();
        self.store.update_group(&group)?;
        let checkbox_count = self.materialize(&group, plan.window, &rule)?;

        tracing::info!(%rule, removed, checkbox_count, "Group rule replaced");
        Ok(MaterializedGroup {
            group,
            checkbox_count,
        })
    }

    /// ## Errors
    /// Returns [`ServiceError::NotFound`] if the checkbox does not exist.
    pub fn set_checked(&mut self, checkbox_id: CheckboxId, checked: bool) -> ServiceResult<Checkbox> {
        let mut checkbox = self
            .store
            .checkbox(checkbox_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("checkbox {checkbox_id}")))?;
        checkbox.checked = checked;
        self.store.update_checkbox(&checkbox)?;
        Ok(checkbox)
    }

    /// ## Summary
    /// Deletes a group and its checkboxes.
    ///
    /// ## Errors
    /// Returns [`ServiceError::NotFound`] if the group does not exist.
    #[tracing::instrument(skip(self))]
    pub fn delete_group(&mut self, group_id: GroupId) -> ServiceResult<usize> {
        let removed = self.store.delete_checkboxes_for_group(group_id)?;
        self.store.delete_group(group_id)?;
        tracing::debug!(removed, "Group deleted");
        Ok(removed)
    }

    /// ## Summary
    /// Deletes a plan with all its groups and checkboxes.
    ///
    /// ## Errors
    /// Returns [`ServiceError::NotFound`] if the plan does not exist.
    #[tracing::instrument(skip(self))]
    pub fn delete_plan(&mut self, plan_id: PlanId) -> ServiceResult<()> {
        let plan = self.plan(plan_id)?;
        for group in self.store.groups_for_plan(plan.id)? {
            self.delete_group(group.id)?;
        }
        self.store.delete_plan(plan.id)
    }

    /// ## Summary
    /// Calendar of every plan and checkbox over `search`.
    ///
    /// ## Errors
    /// - [`ServiceError::WindowTooLong`] if the search exceeds the configured limit.
    /// - Storage errors from the lookups.
    #[tracing::instrument(skip(self), fields(search = %search))]
    pub fn calendar(&self, search: DateRange) -> ServiceResult<Calendar<Plan, Checkbox>> {
        check_window(search, self.limits.max_search_days)?;
        build_calendar(search, &StoreCalendarSource::new(&self.store))
    }

    fn materialize(
        &mut self,
        group: &Group,
        window: DateRange,
        rule: &RepetitionRule,
    ) -> ServiceResult<usize> {
        let checkboxes: Vec<Checkbox> = generate(window, rule)
            .iter()
            .map(|date| Checkbox::new(group, date))
            .collect();
        let count = checkboxes.len();
        self.store.insert_checkboxes(checkboxes)?;
        Ok(count)
    }

    fn apply_revision(
        &mut self,
        group: &Group,
        rule: &RepetitionRule,
        new_window: DateRange,
        revision: &RevisionMap,
    ) -> ServiceResult<RevisionSummary> {
        let occurrences = generate(new_window, rule);
        let existing: HashSet<NaiveDate> = self
            .store
            .checkboxes_for_group(group.id)?
            .into_iter()
            .map(|checkbox| checkbox.date)
            .collect();

        let created: Vec<Checkbox> = revision
            .added()
            .filter(|date| occurrences.contains(*date) && !existing.contains(date))
            .map(|date| Checkbox::new(group, date))
            .collect();
        let mut summary = RevisionSummary {
            created: created.len(),
            removed: 0,
        };
        self.store.insert_checkboxes(created)?;

        for date in revision.removed() {
            summary.removed += self.store.delete_checkboxes_for_group_on(group.id, date)?;
        }

        tracing::debug!(
            group_id = %group.id,
            created = summary.created,
            removed = summary.removed,
            "Group revised"
        );
        Ok(summary)
    }
}

fn check_window(window: DateRange, max_days: u32) -> ServiceResult<()> {
    let days = window.len();
    if usize::try_from(max_days).is_ok_and(|max| days > max) {
        return Err(ServiceError::WindowTooLong {
            days,
            max: max_days,
        });
    }
    Ok(())
}
