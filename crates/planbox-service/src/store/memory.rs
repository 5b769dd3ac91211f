//! In-memory [`PlannerStore`].

use chrono::NaiveDate;
use planbox_core::error::CoreError;

use super::PlannerStore;
use crate::error::{ServiceError, ServiceResult};
use crate::model::{Checkbox, CheckboxId, Group, GroupId, Plan, PlanId};

/// Keeps every record in insertion-ordered vectors owned by the instance.
///
/// Nothing is shared between instances, so each test gets its own world.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    plans: Vec<Plan>,
    groups: Vec<Group>,
    checkboxes: Vec<Checkbox>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn plan_count(&self) -> usize {
        self.plans.len()
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn checkbox_count(&self) -> usize {
        self.checkboxes.len()
    }
}

fn not_found(kind: &str, id: impl std::fmt::Display) -> ServiceError {
    ServiceError::NotFound(format!("{kind} {id}"))
}

fn replace<T: Clone>(
    records: &mut [T],
    record: &T,
    same: impl Fn(&T) -> bool,
) -> Option<()> {
    let slot = records.iter_mut().find(|candidate| same(candidate))?;
    *slot = record.clone();
    Some(())
}

impl PlannerStore for MemoryStore {
    fn insert_plan(&mut self, plan: Plan) -> ServiceResult<()> {
        if self.plans.iter().any(|existing| existing.id == plan.id) {
            return Err(ServiceError::Conflict(format!("plan {} already exists", plan.id)));
        }
        self.plans.push(plan);
        Ok(())
    }

    fn plan(&self, id: PlanId) -> ServiceResult<Option<Plan>> {
        Ok(self.plans.iter().find(|plan| plan.id == id).cloned())
    }

    fn update_plan(&mut self, plan: &Plan) -> ServiceResult<()> {
        replace(&mut self.plans, plan, |existing| existing.id == plan.id)
            .ok_or_else(|| not_found("plan", plan.id))
    }

    fn delete_plan(&mut self, id: PlanId) -> ServiceResult<()> {
        let before = self.plans.len();
        self.plans.retain(|plan| plan.id != id);
        if self.plans.len() == before {
            return Err(not_found("plan", id));
        }
        Ok(())
    }

    fn plans_overlapping(&self, date: NaiveDate) -> ServiceResult<Vec<Plan>> {
        Ok(self
            .plans
            .iter()
            .filter(|plan| plan.window.contains(date))
            .cloned()
            .collect())
    }

    fn insert_group(&mut self, group: Group) -> ServiceResult<()> {
        if self.groups.iter().any(|existing| existing.id == group.id) {
            return Err(ServiceError::Conflict(format!("group {} already exists", group.id)));
        }
        if !self.plans.iter().any(|plan| plan.id == group.plan_id) {
            return Err(not_found("plan", group.plan_id));
        }
        self.groups.push(group);
        Ok(())
    }

    fn group(&self, id: GroupId) -> ServiceResult<Option<Group>> {
        Ok(self.groups.iter().find(|group| group.id == id).cloned())
    }

    fn update_group(&mut self, group: &Group) -> ServiceResult<()> {
        replace(&mut self.groups, group, |existing| existing.id == group.id)
            .ok_or_else(|| not_found("group", group.id))
    }

    fn delete_group(&mut self, id: GroupId) -> ServiceResult<()> {
        let before = self.groups.len();
        self.groups.retain(|group| group.id != id);
        if self.groups.len() == before {
            return Err(not_found("group", id));
        }
        Ok(())
    }

    fn groups_for_plan(&self, plan_id: PlanId) -> ServiceResult<Vec<Group>> {
        Ok(self
            .groups
            .iter()
            .filter(|group| group.plan_id == plan_id)
            .cloned()
            .collect())
    }

    fn insert_checkboxes(&mut self, checkboxes: Vec<Checkbox>) -> ServiceResult<()> {
        let orphaned = checkboxes.iter().any(|checkbox| {
            !self
                .groups
                .iter()
                .any(|group| group.id == checkbox.group_id && group.plan_id == checkbox.plan_id)
        });
        if orphaned {
            return Err(CoreError::InvariantViolation(
                "checkbox must belong to an existing group of its plan",
            )
            .into());
        }
        self.checkboxes.extend(checkboxes);
        Ok(())
    }

    fn checkbox(&self, id: CheckboxId) -> ServiceResult<Option<Checkbox>> {
        Ok(self
            .checkboxes
            .iter()
            .find(|checkbox| checkbox.id == id)
            .cloned())
    }

    fn update_checkbox(&mut self, checkbox: &Checkbox) -> ServiceResult<()> {
        replace(&mut self.checkboxes, checkbox, |existing| existing.id == checkbox.id)
            .ok_or_else(|| not_found("checkbox", checkbox.id))
    }

    fn checkboxes_for_group(&self, group_id: GroupId) -> ServiceResult<Vec<Checkbox>> {
        Ok(self
            .checkboxes
            .iter()
            .filter(|checkbox| checkbox.group_id == group_id)
            .cloned()
            .collect())
    }

    fn checkboxes_for_plan_on(
        &self,
        plan_id: PlanId,
        date: NaiveDate,
    ) -> ServiceResult<Vec<Checkbox>> {
        Ok(self
            .checkboxes
            .iter()
            .filter(|checkbox| checkbox.plan_id == plan_id && checkbox.date == date)
            .cloned()
            .collect())
    }

    fn delete_checkboxes_for_group_on(
        &mut self,
        group_id: GroupId,
        date: NaiveDate,
    ) -> ServiceResult<usize> {
        let before = self.checkboxes.len();
        self.checkboxes
            .retain(|checkbox| !(checkbox.group_id == group_id && checkbox.date == date));
        Ok(before - self.checkboxes.len())
    }

    fn delete_checkboxes_for_group(&mut self, group_id: GroupId) -> ServiceResult<usize> {
        let before = self.checkboxes.len();
        self.checkboxes
            .retain(|checkbox| checkbox.group_id != group_id);
        Ok(before - self.checkboxes.len())
    }
}
