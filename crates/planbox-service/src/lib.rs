//! Planner use cases built on the planbox engine.
//!
//! Plans own groups, groups own checkboxes. The service keeps checkboxes in
//! step with each group's repetition rule as plans and rules change.

pub mod error;
pub mod model;
pub mod service;
pub mod store;

pub use error::{ServiceError, ServiceResult};
pub use model::{Checkbox, CheckboxId, Group, GroupId, Plan, PlanId};
pub use service::{MaterializedGroup, PlannerService, RevisionSummary};
pub use store::{MemoryStore, PlannerStore, StoreCalendarSource};
