//! Typed models for the billing API.
//!
//! Polymorphic fields are modelled as unions: [`Discount`], [`Adjustment`] and [`Price`] pick
//! their variant from a discriminator field, while [`PlanSelector`] tries each of its shapes in
//! turn. Enum-valued fields use [`ApiEnum`], which keeps values this client doesn't know about.
//! Every record keeps unknown fields in a flattened [`Extra`], so decoding and re-encoding a
//! payload doesn't lose anything the server sent.

mod adjustment;
mod discount;
mod enumeration;
mod ids;
mod object;
mod plan;
mod price;
mod record;
mod union;

pub use crate::data::adjustment::{
    AmountDiscountAdjustment, Adjustment, AdjustmentVisitor, MaximumAdjustment,
    MinimumAdjustment, PercentageDiscountAdjustment, UsageDiscountAdjustment,
};
pub use crate::data::discount::{
    AmountDiscount, Discount, DiscountVisitor, PercentageDiscount, TrialDiscount, UsageDiscount,
};
pub use crate::data::enumeration::{ApiEnum, KnownValue};
pub use crate::data::ids::{AdjustmentId, ItemId, PriceId};
pub use crate::data::object::JsonObject;
pub use crate::data::plan::{
    ExternalPlanIdSelector, Plan, PlanIdSelector, PlanSelector, PlanSelectorVisitor,
};
pub use crate::data::price::{
    BillingCycleConfiguration, BulkConfig, BulkPrice, BulkTier, Cadence, DurationUnit,
    MatrixConfig, MatrixPrice, MatrixValue, PackageConfig, PackagePrice, Price, PriceType,
    PriceVisitor, Tier, TieredConfig, TieredPrice, UnitConfig, UnitPrice,
};
pub use crate::data::record::{Extra, Record};
pub use crate::data::union::{
    decode_tagged, decode_untagged, Discriminated, Discriminator, TaggedEntry, TaggedUnion,
    UntaggedEntry, UntaggedUnion, VariantOf,
};
