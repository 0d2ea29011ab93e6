use crate::data::union::define_union;
use crate::data::PriceId;

define_union! {
    /// A discount applied to a price, a subscription, or a whole invoice.
    ///
    /// The `discount_type` field selects the variant.
    ///
    /// # Example
    ///
    /// ```
    /// use billing_models::data::{Discount, PercentageDiscount, TaggedUnion};
    /// use serde_json::json;
    ///
    /// let discount = Discount::decode_value(json!({
    ///     "discount_type": "percentage",
    ///     "percentage_discount": 0.15,
    /// }))
    /// .unwrap();
    ///
    /// let percentage = discount.try_pick::<PercentageDiscount>().unwrap();
    /// assert_eq!(percentage.percentage_discount, 0.15);
    /// ```
    pub enum Discount(discount_type) {
        /// A discount of a fraction of the price.
        Percentage("percentage") => PercentageDiscount {
            /// Fraction to take off, between `0.0` and `1.0`.
            pub percentage_discount: f64,
            /// Prices this discount applies to. `None` means all prices.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub applies_to_price_ids: Option<Vec<PriceId>>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub reason: Option<String>,
        },
        /// A free trial period, optionally limited to an amount or a fraction.
        Trial("trial") => TrialDiscount {
            /// Amount to take off during the trial, as a decimal string.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub trial_amount_discount: Option<String>,
            /// Fraction to take off during the trial.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub trial_percentage_discount: Option<f64>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub applies_to_price_ids: Option<Vec<PriceId>>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub reason: Option<String>,
        },
        /// A number of free usage units.
        Usage("usage") => UsageDiscount {
            /// Number of usage units to take off.
            pub usage_discount: f64,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub applies_to_price_ids: Option<Vec<PriceId>>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub reason: Option<String>,
        },
        /// A fixed amount taken off.
        Amount("amount") => AmountDiscount {
            /// Amount to take off, as a decimal string.
            pub amount_discount: String,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub applies_to_price_ids: Option<Vec<PriceId>>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub reason: Option<String>,
        },
    }
}

impl Discount {
    /// Prices the discount is limited to, if any.
    pub fn applies_to_price_ids(&self) -> Option<&[PriceId]> {
        let ids = match self {
            Self::Percentage(d) => &d.applies_to_price_ids,
            Self::Trial(d) => &d.applies_to_price_ids,
            Self::Usage(d) => &d.applies_to_price_ids,
            Self::Amount(d) => &d.applies_to_price_ids,
        };
        ids.as_deref()
    }

    pub fn reason(&self) -> Option<&str> {
        let reason = match self {
            Self::Percentage(d) => &d.reason,
            Self::Trial(d) => &d.reason,
            Self::Usage(d) => &d.reason,
            Self::Amount(d) => &d.reason,
        };
        reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DiscountVisitor, TaggedUnion};
    use crate::error::InvalidDataKind;
    use serde_json::json;
    use std::collections::HashSet;

    type Result = std::result::Result<(), Box<dyn std::error::Error>>;

    fn every_variant() -> Vec<Discount> {
        vec![
            PercentageDiscount {
                percentage_discount: 0.25,
                applies_to_price_ids: Some(vec!["price_1".into()]),
                ..Default::default()
            }
            .into(),
            TrialDiscount {
                trial_percentage_discount: Some(1.0),
                reason: Some("onboarding".into()),
                ..Default::default()
            }
            .into(),
            UsageDiscount {
                usage_discount: 1000.0,
                ..Default::default()
            }
            .into(),
            AmountDiscount {
                amount_discount: "12.50".into(),
                ..Default::default()
            }
            .into(),
        ]
    }

    #[test]
    fn registry() {
        let values: HashSet<_> = Discount::REGISTRY.iter().map(|e| e.discriminator).collect();
        assert_eq!(values.len(), Discount::REGISTRY.len());
        assert_eq!(Discount::DISCRIMINATOR_FIELD, "discount_type");
    }

    #[test]
    fn round_trip() -> Result {
        for discount in every_variant() {
            let json = serde_json::to_value(&discount)?;
            assert_eq!(json["discount_type"], json!(discount.discriminator()));
            assert_eq!(serde_json::from_value::<Discount>(json)?, discount);
        }

        Ok(())
    }

    #[test]
    fn percentage() -> Result {
        let discount = Discount::decode_value(json!({
            "discount_type": "percentage",
            "percentage_discount": 0.15,
        }))?;

        assert_eq!(
            discount,
            Discount::Percentage(PercentageDiscount {
                percentage_discount: 0.15,
                ..Default::default()
            })
        );
        assert_eq!(
            discount
                .try_pick::<PercentageDiscount>()
                .map(|d| d.percentage_discount),
            Some(0.15)
        );
        assert!(discount.try_pick::<AmountDiscount>().is_none());

        Ok(())
    }

    #[test]
    fn missing_required_field_names_variant() {
        let err = Discount::decode_value(json!({
            "discount_type": "amount",
            "percentage_discount": 0.15,
        }))
        .unwrap_err();

        assert_eq!(err.kind(), InvalidDataKind::ShapeMismatch);
        assert_eq!(err.variant(), Some("AmountDiscount"));
    }

    #[test]
    fn unknown_discount_type() {
        let err = Discount::decode_value(json!({
            "discount_type": "bogo",
            "percentage_discount": 0.15,
        }))
        .unwrap_err();

        assert_eq!(err.kind(), InvalidDataKind::UnknownVariant);
    }

    #[test]
    fn unknown_fields_survive() -> Result {
        let json = json!({
            "discount_type": "usage",
            "usage_discount": 5.0,
            "reason": "promo",
            "expires_at": "2030-01-01T00:00:00Z",
        });

        let discount = Discount::decode_value(json.clone())?;
        assert_eq!(discount.reason(), Some("promo"));
        assert_eq!(discount.encode()?, json);

        Ok(())
    }

    #[test]
    fn extra_cannot_shadow_declared_fields() -> Result {
        let mut percentage = PercentageDiscount {
            percentage_discount: 0.1,
            ..Default::default()
        };
        assert!(percentage.extra.insert("discount_type", json!("amount")).is_err());
        assert!(percentage.extra.insert("percentage_discount", json!(0.9)).is_err());

        let discount = Discount::from(percentage);
        let json = discount.encode()?;
        assert_eq!(
            json,
            json!({ "discount_type": "percentage", "percentage_discount": 0.1 })
        );
        assert_eq!(Discount::decode_value(json)?, discount);

        Ok(())
    }

    #[test]
    fn common_accessors() {
        let discounts = every_variant();
        assert_eq!(
            discounts[0].applies_to_price_ids(),
            Some(&[PriceId::from("price_1")][..])
        );
        assert_eq!(discounts[1].reason(), Some("onboarding"));
        assert_eq!(discounts[2].applies_to_price_ids(), None);
    }

    #[test]
    fn switch() {
        #[derive(Default)]
        struct Counter {
            fixed: usize,
            other: usize,
        }

        impl DiscountVisitor for Counter {
            type Output = ();

            fn visit_percentage(&mut self, _: &PercentageDiscount) {
                self.other += 1;
            }

            fn visit_trial(&mut self, _: &TrialDiscount) {
                self.other += 1;
            }

            fn visit_usage(&mut self, _: &UsageDiscount) {
                self.other += 1;
            }

            fn visit_amount(&mut self, _: &AmountDiscount) {
                self.fixed += 1;
            }
        }

        let mut counter = Counter::default();
        for discount in every_variant() {
            discount.visit(&mut counter);
        }

        assert_eq!((counter.fixed, counter.other), (1, 3));
    }
}
