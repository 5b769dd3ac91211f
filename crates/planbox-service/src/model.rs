//! Plan, group and checkbox records.

use std::fmt;

use chrono::NaiveDate;
use planbox_engine::{DateRange, EngineResult, RepetitionRule, StoredRule};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

record_id!(
    /// Identifies a [`Plan`].
    PlanId
);
record_id!(
    /// Identifies a [`Group`].
    GroupId
);
record_id!(
    /// Identifies a [`Checkbox`].
    CheckboxId
);

/// A date-bounded goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub title: String,
    pub window: DateRange,
}

impl Plan {
    #[must_use]
    pub fn new(title: impl Into<String>, window: DateRange) -> Self {
        Self {
            id: PlanId::new(),
            title: title.into(),
            window,
        }
    }
}

/// A recurring task inside a plan.
///
/// The rule is kept in its storage form, the shape it is persisted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub plan_id: PlanId,
    pub title: String,
    pub rule: StoredRule,
}

impl Group {
    #[must_use]
    pub fn new(plan_id: PlanId, title: impl Into<String>, rule: &RepetitionRule) -> Self {
        Self {
            id: GroupId::new(),
            plan_id,
            title: title.into(),
            rule: rule.to_storage(),
        }
    }

    /// ## Summary
    /// Decodes the stored rule.
    ///
    /// ## Errors
    /// Returns an error if the stored rule is corrupt.
    pub fn repetition_rule(&self) -> EngineResult<RepetitionRule> {
        self.rule.to_rule()
    }
}

/// One task instance on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkbox {
    pub id: CheckboxId,
    pub group_id: GroupId,
    pub plan_id: PlanId,
    pub date: NaiveDate,
    pub checked: bool,
}

impl Checkbox {
    /// Unchecked instance of `group` on `date`.
    #[must_use]
    pub fn new(group: &Group, date: NaiveDate) -> Self {
        Self {
            id: CheckboxId::new(),
            group_id: group.id,
            plan_id: group.plan_id,
            date,
            checked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_keeps_rule_in_storage_form() {
        let window = DateRange::day(NaiveDate::from_ymd_opt(2023, 7, 18).expect("valid date"));
        let plan = Plan::new("fitness", window);
        let rule = planbox_engine::RuleRequest::new(3, ["TUE", "MON"])
            .validate()
            .expect("valid rule");
        let group = Group::new(plan.id, "stretch", &rule);

        assert_eq!(group.rule.rep_option, 3);
        assert_eq!(group.rule.rep_value, "1100000");
        assert_eq!(group.repetition_rule().expect("decodes"), rule);
    }

    #[test]
    fn checkbox_starts_unchecked_and_inherits_owners() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 18).expect("valid date");
        let plan = Plan::new("fitness", DateRange::day(date));
        let group = Group::new(plan.id, "run", &RepetitionRule::Daily);
        let checkbox = Checkbox::new(&group, date);

        assert!(!checkbox.checked);
        assert_eq!(checkbox.group_id, group.id);
        assert_eq!(checkbox.plan_id, plan.id);
    }

    #[test]
    fn ids_serialize_as_bare_uuids() {
        let id = PlanId::from(Uuid::nil());
        assert_eq!(
            serde_json::to_string(&id).expect("serializes"),
            r#""00000000-0000-0000-0000-000000000000""#
        );
        assert_ne!(PlanId::new(), PlanId::new());
    }
}
