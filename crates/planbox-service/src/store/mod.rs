//! Persistence seam of the planner.
//!
//! ## Summary
//! [`PlannerStore`] is what the service needs from storage. Listing methods
//! return records in insertion order, which is the order plans and
//! checkboxes appear in on the calendar.

mod memory;

use chrono::NaiveDate;
use planbox_engine::CalendarSource;

use crate::error::{ServiceError, ServiceResult};
use crate::model::{Checkbox, CheckboxId, Group, GroupId, Plan, PlanId};

pub use memory::MemoryStore;

/// Storage operations used by [`crate::service::PlannerService`].
pub trait PlannerStore {
    /// ## Errors
    /// Returns [`ServiceError::Conflict`] if the id already exists.
    fn insert_plan(&mut self, plan: Plan) -> ServiceResult<()>;
    /// ## Errors
    /// Backend failures only; a missing plan is `Ok(None)`.
    fn plan(&self, id: PlanId) -> ServiceResult<Option<Plan>>;
    /// ## Errors
    /// Returns [`ServiceError::NotFound`] if the plan does not exist.
    fn update_plan(&mut self, plan: &Plan) -> ServiceResult<()>;
    /// ## Errors
    /// Returns [`ServiceError::NotFound`] if the plan does not exist.
    fn delete_plan(&mut self, id: PlanId) -> ServiceResult<()>;
    /// ## Errors
    /// Backend failures only.
    fn plans_overlapping(&self, date: NaiveDate) -> ServiceResult<Vec<Plan>>;

    /// ## Errors
    /// Returns [`ServiceError::Conflict`] if the id already exists.
    fn insert_group(&mut self, group: Group) -> ServiceResult<()>;
    /// ## Errors
    /// Backend failures only; a missing group is `Ok(None)`.
    fn group(&self, id: GroupId) -> ServiceResult<Option<Group>>;
    /// ## Errors
    /// Returns [`ServiceError::NotFound`] if the group does not exist.
    fn update_group(&mut self, group: &Group) -> ServiceResult<()>;
    /// ## Errors
    /// Returns [`ServiceError::NotFound`] if the group does not exist.
    fn delete_group(&mut self, id: GroupId) -> ServiceResult<()>;
    /// ## Errors
    /// Backend failures only.
    fn groups_for_plan(&self, plan_id: PlanId) -> ServiceResult<Vec<Group>>;

    /// ## Errors
    /// Fails without inserting anything if a checkbox names an unknown group.
    fn insert_checkboxes(&mut self, checkboxes: Vec<Checkbox>) -> ServiceResult<()>;
    /// ## Errors
    /// Backend failures only; a missing checkbox is `Ok(None)`.
    fn checkbox(&self, id: CheckboxId) -> ServiceResult<Option<Checkbox>>;
    /// ## Errors
    /// Returns [`ServiceError::NotFound`] if the checkbox does not exist.
    fn update_checkbox(&mut self, checkbox: &Checkbox) -> ServiceResult<()>;
    /// ## Errors
    /// Backend failures only.
    fn checkboxes_for_group(&self, group_id: GroupId) -> ServiceResult<Vec<Checkbox>>;
    /// ## Errors
    /// Backend failures only.
    fn checkboxes_for_plan_on(&self, plan_id: PlanId, date: NaiveDate)
    -> ServiceResult<Vec<Checkbox>>;
    /// Returns how many checkboxes were removed.
    ///
    /// ## Errors
    /// Backend failures only.
    fn delete_checkboxes_for_group_on(
        &mut self,
        group_id: GroupId,
        date: NaiveDate,
    ) -> ServiceResult<usize>;
    /// Returns how many checkboxes were removed.
    ///
    /// ## Errors
    /// Backend failures only.
    fn delete_checkboxes_for_group(&mut self, group_id: GroupId) -> ServiceResult<usize>;
}

/// Exposes a [`PlannerStore`] to the calendar aggregator.
pub struct StoreCalendarSource<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: PlannerStore + ?Sized> StoreCalendarSource<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<S: PlannerStore + ?Sized> CalendarSource for StoreCalendarSource<'_, S> {
    type Plan = Plan;
    type Checkbox = Checkbox;
    type Error = ServiceError;

    fn plans_on(&self, date: NaiveDate) -> ServiceResult<Vec<Plan>> {
        self.store.plans_overlapping(date)
    }

    fn checkboxes_on(&self, plan: &Plan, date: NaiveDate) -> ServiceResult<Vec<Checkbox>> {
        self.store.checkboxes_for_plan_on(plan.id, date)
    }
}
