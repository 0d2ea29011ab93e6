use crate::data::record::define_record;
use crate::data::union::define_untagged_union;
use crate::data::{Adjustment, Discount, Price};

define_record! {
    /// A plan: the set of prices and adjustments a subscription is billed by.
    pub struct Plan {
        pub id: String,
        pub name: String,
        pub currency: String,
        /// Identifier for this plan in an external system.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub external_plan_id: Option<String>,
        pub prices: Vec<Price>,
        #[serde(default)]
        pub adjustments: Vec<Adjustment>,
        /// Plan-wide discount.
        pub discount: Option<Discount>,
    }
}

define_record! {
    /// Used in [`PlanSelector`].
    pub struct PlanIdSelector {
        pub plan_id: String,
    }
}

define_record! {
    /// Used in [`PlanSelector`].
    pub struct ExternalPlanIdSelector {
        pub external_plan_id: String,
    }
}

define_untagged_union! {
    /// Identifies a plan either by its own ID or by its external ID.
    ///
    /// There is no discriminator field; the plan ID form is tried first.
    pub enum PlanSelector {
        /// Select by [`Plan::id`].
        PlanId(PlanIdSelector),
        /// Select by [`Plan::external_plan_id`].
        ExternalPlanId(ExternalPlanIdSelector),
    }
}

impl PlanSelector {
    pub fn by_id<S: Into<String>>(plan_id: S) -> Self {
        PlanIdSelector {
            plan_id: plan_id.into(),
            ..Default::default()
        }
        .into()
    }

    pub fn by_external_id<S: Into<String>>(external_plan_id: S) -> Self {
        ExternalPlanIdSelector {
            external_plan_id: external_plan_id.into(),
            ..Default::default()
        }
        .into()
    }

    /// Whether `plan` is the one selected.
    pub fn matches(&self, plan: &Plan) -> bool {
        match self {
            Self::PlanId(s) => s.plan_id == plan.id,
            Self::ExternalPlanId(s) => {
                plan.external_plan_id.as_deref() == Some(s.external_plan_id.as_str())
            }
        }
    }
}
