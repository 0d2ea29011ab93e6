use crate::data::union::define_union;
use crate::data::{AdjustmentId, ItemId, PriceId};

define_union! {
    /// A change to the amount billed for a set of prices, attached to a plan or subscription.
    ///
    /// The `adjustment_type` field selects the variant.
    pub enum Adjustment(adjustment_type) {
        /// Reduces the billed usage quantity.
        UsageDiscount("usage_discount") => UsageDiscountAdjustment {
            pub id: AdjustmentId,
            pub applies_to_price_ids: Vec<PriceId>,
            /// Whether the adjustment applies to the invoice as a whole.
            pub is_invoice_level: bool,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub reason: Option<String>,
            /// Number of usage units to take off.
            pub usage_discount: f64,
        },
        /// Takes a fixed amount off.
        AmountDiscount("amount_discount") => AmountDiscountAdjustment {
            pub id: AdjustmentId,
            pub applies_to_price_ids: Vec<PriceId>,
            pub is_invoice_level: bool,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub reason: Option<String>,
            /// Amount to take off, as a decimal string.
            pub amount_discount: String,
        },
        /// Takes a fraction of the amount off.
        PercentageDiscount("percentage_discount") => PercentageDiscountAdjustment {
            pub id: AdjustmentId,
            pub applies_to_price_ids: Vec<PriceId>,
            pub is_invoice_level: bool,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub reason: Option<String>,
            /// Fraction to take off, between `0.0` and `1.0`.
            pub percentage_discount: f64,
        },
        /// Bills at least a given amount.
        Minimum("minimum") => MinimumAdjustment {
            pub id: AdjustmentId,
            pub applies_to_price_ids: Vec<PriceId>,
            pub is_invoice_level: bool,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub reason: Option<String>,
            /// The minimum amount, as a decimal string.
            pub minimum_amount: String,
            /// Item that any true-up is billed against.
            pub item_id: ItemId,
        },
        /// Bills at most a given amount.
        Maximum("maximum") => MaximumAdjustment {
            pub id: AdjustmentId,
            pub applies_to_price_ids: Vec<PriceId>,
            pub is_invoice_level: bool,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub reason: Option<String>,
            /// The maximum amount, as a decimal string.
            pub maximum_amount: String,
        },
    }
}

impl Adjustment {
    pub fn id(&self) -> &AdjustmentId {
        match self {
            Self::UsageDiscount(a) => &a.id,
            Self::AmountDiscount(a) => &a.id,
            Self::PercentageDiscount(a) => &a.id,
            Self::Minimum(a) => &a.id,
            Self::Maximum(a) => &a.id,
        }
    }

    pub fn applies_to_price_ids(&self) -> &[PriceId] {
        match self {
            Self::UsageDiscount(a) => &a.applies_to_price_ids,
            Self::AmountDiscount(a) => &a.applies_to_price_ids,
            Self::PercentageDiscount(a) => &a.applies_to_price_ids,
            Self::Minimum(a) => &a.applies_to_price_ids,
            Self::Maximum(a) => &a.applies_to_price_ids,
        }
    }

    pub fn is_invoice_level(&self) -> bool {
        match self {
            Self::UsageDiscount(a) => a.is_invoice_level,
            Self::AmountDiscount(a) => a.is_invoice_level,
            Self::PercentageDiscount(a) => a.is_invoice_level,
            Self::Minimum(a) => a.is_invoice_level,
            Self::Maximum(a) => a.is_invoice_level,
        }
    }

    /// Whether this adjustment lowers the amount billed.
    pub fn is_discount(&self) -> bool {
        matches!(
            self,
            Self::UsageDiscount(_) | Self::AmountDiscount(_) | Self::PercentageDiscount(_)
        )
    }
}
