use crate::data::enumeration::define_known_values;
use crate::data::record::define_record;
use crate::data::union::define_union;
use crate::data::{ApiEnum, Discount, ItemId, PriceId};

define_known_values! {
    /// Known values for [`ApiEnum<Cadence>`], how often a price is billed.
    #[derive(Default)]
    pub enum Cadence {
        /// Billed once.
        OneTime = "one_time",
        #[default]
        Monthly = "monthly",
        Quarterly = "quarterly",
        SemiAnnual = "semi_annual",
        Annual = "annual",
        /// Billed on a custom billing cycle.
        Custom = "custom",
    }
}

define_known_values! {
    /// Known values for [`ApiEnum<PriceType>`].
    #[derive(Default)]
    pub enum PriceType {
        /// Charged in proportion to reported usage.
        #[default]
        UsagePrice = "usage_price",
        /// Charged a fixed amount each period.
        FixedPrice = "fixed_price",
    }
}

define_known_values! {
    /// Known values for [`ApiEnum<DurationUnit>`].
    #[derive(Default)]
    pub enum DurationUnit {
        Day = "day",
        #[default]
        Month = "month",
    }
}

define_record! {
    /// Length of a billing period. Used in [`Price`] payloads.
    pub struct BillingCycleConfiguration {
        pub duration: u32,
        pub duration_unit: ApiEnum<DurationUnit>,
    }
}

define_record! {
    /// Used in [`UnitPrice`].
    pub struct UnitConfig {
        /// Amount per unit, as a decimal string.
        pub unit_amount: String,
    }
}

define_record! {
    /// Used in [`PackagePrice`].
    pub struct PackageConfig {
        /// Amount per package, as a decimal string.
        pub package_amount: String,
        /// Units per package. Usage is rounded up to a whole number of packages.
        pub package_size: u64,
    }
}

define_record! {
    /// Used in [`MatrixPrice`].
    pub struct MatrixConfig {
        /// Amount per unit for usage that matches no entry in `matrix_values`.
        pub default_unit_amount: String,
        /// Event property names used to look up a matrix value. At most two.
        pub dimensions: Vec<Option<String>>,
        pub matrix_values: Vec<MatrixValue>,
    }
}

define_record! {
    /// Used in [`MatrixConfig`].
    pub struct MatrixValue {
        /// One value per entry of [`MatrixConfig::dimensions`].
        pub dimension_values: Vec<Option<String>>,
        pub unit_amount: String,
    }
}

define_record! {
    /// Used in [`TieredPrice`].
    pub struct TieredConfig {
        /// Tiers in ascending order. Each unit is billed at the rate of the tier it falls in.
        pub tiers: Vec<Tier>,
    }
}

define_record! {
    /// Used in [`TieredConfig`].
    pub struct Tier {
        pub first_unit: f64,
        /// Exclusive upper bound. `None` for the last tier.
        pub last_unit: Option<f64>,
        pub unit_amount: String,
    }
}

define_record! {
    /// Used in [`BulkPrice`].
    pub struct BulkConfig {
        /// Tiers in ascending order. All units are billed at the rate of the tier the total falls in.
        pub tiers: Vec<BulkTier>,
    }
}

define_record! {
    /// Used in [`BulkConfig`].
    pub struct BulkTier {
        /// Inclusive upper bound. `None` for the last tier.
        pub maximum_units: Option<f64>,
        pub unit_amount: String,
    }
}

define_union! {
    /// A price on a plan or subscription.
    ///
    /// The `model_type` field selects the pricing model, and with it the variant.
    pub enum Price(model_type) {
        /// A fixed amount per unit.
        Unit("unit") => UnitPrice {
            pub id: PriceId,
            pub name: String,
            pub item_id: ItemId,
            pub currency: String,
            pub cadence: ApiEnum<Cadence>,
            pub price_type: ApiEnum<PriceType>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub external_price_id: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub billing_cycle_configuration: Option<BillingCycleConfiguration>,
            pub discount: Option<Discount>,
            pub unit_config: UnitConfig,
        },
        /// A fixed amount per package of units.
        Package("package") => PackagePrice {
            pub id: PriceId,
            pub name: String,
            pub item_id: ItemId,
            pub currency: String,
            pub cadence: ApiEnum<Cadence>,
            pub price_type: ApiEnum<PriceType>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub external_price_id: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub billing_cycle_configuration: Option<BillingCycleConfiguration>,
            pub discount: Option<Discount>,
            pub package_config: PackageConfig,
        },
        /// A per-unit amount looked up by event properties.
        Matrix("matrix") => MatrixPrice {
            pub id: PriceId,
            pub name: String,
            pub item_id: ItemId,
            pub currency: String,
            pub cadence: ApiEnum<Cadence>,
            pub price_type: ApiEnum<PriceType>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub external_price_id: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub billing_cycle_configuration: Option<BillingCycleConfiguration>,
            pub discount: Option<Discount>,
            pub matrix_config: MatrixConfig,
        },
        /// Graduated per-unit amounts.
        Tiered("tiered") => TieredPrice {
            pub id: PriceId,
            pub name: String,
            pub item_id: ItemId,
            pub currency: String,
            pub cadence: ApiEnum<Cadence>,
            pub price_type: ApiEnum<PriceType>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub external_price_id: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub billing_cycle_configuration: Option<BillingCycleConfiguration>,
            pub discount: Option<Discount>,
            pub tiered_config: TieredConfig,
        },
        /// A single per-unit amount chosen by total volume.
        Bulk("bulk") => BulkPrice {
            pub id: PriceId,
            pub name: String,
            pub item_id: ItemId,
            pub currency: String,
            pub cadence: ApiEnum<Cadence>,
            pub price_type: ApiEnum<PriceType>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub external_price_id: Option<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub billing_cycle_configuration: Option<BillingCycleConfiguration>,
            pub discount: Option<Discount>,
            pub bulk_config: BulkConfig,
        },
    }
}

// Fields shared by every pricing model.
macro_rules! common_field {
    ($self:ident, $field:ident) => {
        match $self {
            Price::Unit(p) => &p.$field,
            Price::Package(p) => &p.$field,
            Price::Matrix(p) => &p.$field,
            Price::Tiered(p) => &p.$field,
            Price::Bulk(p) => &p.$field,
        }
    };
}

impl Price {
    pub fn id(&self) -> &PriceId {
        common_field!(self, id)
    }

    pub fn name(&self) -> &str {
        common_field!(self, name)
    }

    pub fn item_id(&self) -> &ItemId {
        common_field!(self, item_id)
    }

    pub fn currency(&self) -> &str {
        common_field!(self, currency)
    }

    pub fn cadence(&self) -> &ApiEnum<Cadence> {
        common_field!(self, cadence)
    }

    pub fn price_type(&self) -> &ApiEnum<PriceType> {
        common_field!(self, price_type)
    }

    pub fn discount(&self) -> Option<&Discount> {
        common_field!(self, discount).as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{JsonObject, PercentageDiscount, PriceVisitor, Record, TaggedUnion};
    use crate::error::InvalidDataError;
    use serde::Serialize;
    use crate::error::InvalidDataKind;
    use serde_json::json;
    use std::collections::HashSet;

    type Result = std::result::Result<(), Box<dyn std::error::Error>>;

    fn unit_price_json() -> serde_json::Value {
        json!({
            "model_type": "unit",
            "id": "price_unit",
            "name": "API calls",
            "item_id": "item_api",
            "currency": "USD",
            "cadence": "monthly",
            "price_type": "usage_price",
            "discount": {
                "discount_type": "percentage",
                "percentage_discount": 0.15
            },
            "unit_config": { "unit_amount": "0.002" },
            "created_at": "2024-05-01T00:00:00Z"
        })
    }

    fn every_variant() -> Vec<Price> {
        vec![
            UnitPrice {
                id: "price_1".into(),
                name: "Seats".into(),
                currency: "USD".into(),
                price_type: PriceType::FixedPrice.into(),
                unit_config: UnitConfig {
                    unit_amount: "10.00".into(),
                    ..Default::default()
                },
                ..Default::default()
            }
            .into(),
            PackagePrice {
                id: "price_2".into(),
                cadence: Cadence::Annual.into(),
                package_config: PackageConfig {
                    package_amount: "5.00".into(),
                    package_size: 1000,
                    ..Default::default()
                },
                ..Default::default()
            }
            .into(),
            MatrixPrice {
                id: "price_3".into(),
                billing_cycle_configuration: Some(BillingCycleConfiguration {
                    duration: 14,
                    duration_unit: DurationUnit::Day.into(),
                    ..Default::default()
                }),
                matrix_config: MatrixConfig {
                    default_unit_amount: "1.00".into(),
                    dimensions: vec![Some("region".into()), None],
                    matrix_values: vec![MatrixValue {
                        dimension_values: vec![Some("eu".into()), None],
                        unit_amount: "1.20".into(),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                ..Default::default()
            }
            .into(),
            TieredPrice {
                id: "price_4".into(),
                discount: Some(
                    PercentageDiscount {
                        percentage_discount: 0.5,
                        ..Default::default()
                    }
                    .into(),
                ),
                tiered_config: TieredConfig {
                    tiers: vec![
                        Tier {
                            first_unit: 0.0,
                            last_unit: Some(100.0),
                            unit_amount: "1.00".into(),
                            ..Default::default()
                        },
                        Tier {
                            first_unit: 100.0,
                            last_unit: None,
                            unit_amount: "0.50".into(),
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                },
                ..Default::default()
            }
            .into(),
            BulkPrice {
                id: "price_5".into(),
                cadence: ApiEnum::from_raw("biennial"),
                bulk_config: BulkConfig {
                    tiers: vec![BulkTier {
                        maximum_units: None,
                        unit_amount: "0.10".into(),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                ..Default::default()
            }
            .into(),
        ]
    }

    #[test]
    fn registry() {
        let values: HashSet<_> = Price::REGISTRY.iter().map(|e| e.discriminator).collect();
        assert_eq!(values.len(), Price::REGISTRY.len());
    }

    // Every key a record writes must be one of its declared fields or an unknown field.
    fn assert_declared<R: Record + Serialize>(record: &R) -> std::result::Result<(), InvalidDataError> {
        let object = JsonObject::from_model(record)?;
        for (key, _) in object.iter() {
            assert!(R::FIELDS.contains(&key.as_str()), "`{}` is not declared", key);
        }
        Ok(())
    }

    #[test]
    fn declared_fields_match_encoding() -> Result {
        let price = Price::decode_value(unit_price_json())?;
        let mut unit = price.try_pick::<UnitPrice>().unwrap().clone();
        unit.extra = Default::default();
        unit.external_price_id = Some("ext_1".into());
        unit.billing_cycle_configuration = Some(Default::default());
        assert_declared(&unit)?;

        for price in every_variant() {
            match &price {
                Price::Unit(p) => assert_declared(p)?,
                Price::Package(p) => assert_declared(p)?,
                Price::Matrix(p) => assert_declared(p)?,
                Price::Tiered(p) => assert_declared(p)?,
                Price::Bulk(p) => assert_declared(p)?,
            }
        }

        assert_declared(&BillingCycleConfiguration::default())?;
        assert_declared(&MatrixConfig::default())?;
        assert_declared(&MatrixValue::default())?;
        assert_declared(&Tier::default())?;
        assert_declared(&BulkTier::default())?;

        Ok(())
    }

    #[test]
    fn config_extra_cannot_shadow_declared_fields() -> Result {
        let mut config = UnitConfig {
            unit_amount: "0.50".into(),
            ..Default::default()
        };
        assert!(config.extra.insert("unit_amount", json!("9.99")).is_err());
        config.extra.insert("rounding", json!("up"))?;

        let json = serde_json::to_value(&config)?;
        assert_eq!(json, json!({ "unit_amount": "0.50", "rounding": "up" }));
        assert_eq!(serde_json::from_value::<UnitConfig>(json)?, config);

        Ok(())
    }

    #[test]
    fn round_trip() -> Result {
        for price in every_variant() {
            let json = serde_json::to_string(&price)?;
            assert_eq!(serde_json::from_str::<Price>(&json)?, price);
        }

        Ok(())
    }

    #[test]
    fn nested_discount_and_enums() -> Result {
        let price = Price::decode_value(unit_price_json())?;

        assert_eq!(price.id(), &PriceId::from("price_unit"));
        assert_eq!(price.name(), "API calls");
        assert_eq!(price.currency(), "USD");
        assert_eq!(price.cadence().known(), Some(Cadence::Monthly));
        assert_eq!(price.price_type(), &PriceType::UsagePrice);
        assert_eq!(
            price
                .discount()
                .and_then(|d| d.try_pick::<PercentageDiscount>())
                .map(|d| d.percentage_discount),
            Some(0.15)
        );

        let unit = price.try_pick::<UnitPrice>().unwrap();
        assert_eq!(unit.unit_config.unit_amount, "0.002");
        assert_eq!(
            unit.extra.get_str("created_at"),
            Some("2024-05-01T00:00:00Z")
        );

        assert_eq!(price.encode()?, unit_price_json());

        Ok(())
    }

    #[test]
    fn null_discount() -> Result {
        let mut json = unit_price_json();
        json["discount"] = json!(null);

        let price = Price::decode_value(json.clone())?;
        assert!(price.discount().is_none());
        assert_eq!(price.encode()?, json);

        Ok(())
    }

    #[test]
    fn unknown_cadence_is_kept() -> Result {
        let mut json = unit_price_json();
        json["cadence"] = json!("biennial");

        let price = Price::decode_value(json.clone())?;
        assert_eq!(price.cadence().known(), None);
        assert_eq!(price.cadence().as_str(), "biennial");
        assert_eq!(price.encode()?, json);

        Ok(())
    }

    #[test]
    fn bad_nested_discount_fails_the_price() {
        let mut json = unit_price_json();
        json["discount"] = json!({ "discount_type": "percentage" });

        let err = Price::decode_value(json).unwrap_err();
        assert_eq!(err.kind(), InvalidDataKind::ShapeMismatch);
        assert_eq!(err.variant(), Some("UnitPrice"));
        assert!(err
            .to_string()
            .contains("Discount could not be decoded as PercentageDiscount"));
    }

    #[test]
    fn unit_config_under_tiered_discriminator() {
        let mut json = unit_price_json();
        json["model_type"] = json!("tiered");

        let err = Price::decode_value(json).unwrap_err();
        assert_eq!(err.kind(), InvalidDataKind::ShapeMismatch);
        assert_eq!(err.variant(), Some("TieredPrice"));
    }

    #[test]
    fn visit_match() {
        struct UnitAmount;

        impl PriceVisitor for UnitAmount {
            type Output = Option<String>;

            fn visit_unit(&mut self, value: &UnitPrice) -> Self::Output {
                Some(value.unit_config.unit_amount.clone())
            }

            fn visit_package(&mut self, _: &PackagePrice) -> Self::Output {
                None
            }

            fn visit_matrix(&mut self, value: &MatrixPrice) -> Self::Output {
                Some(value.matrix_config.default_unit_amount.clone())
            }

            fn visit_tiered(&mut self, _: &TieredPrice) -> Self::Output {
                None
            }

            fn visit_bulk(&mut self, value: &BulkPrice) -> Self::Output {
                value.bulk_config.tiers.first().map(|t| t.unit_amount.clone())
            }
        }

        let amounts: Vec<_> = every_variant()
            .iter()
            .map(|p| p.visit(&mut UnitAmount))
            .collect();

        assert_eq!(
            amounts,
            vec![
                Some("10.00".to_owned()),
                None,
                Some("1.00".to_owned()),
                None,
                Some("0.10".to_owned())
            ]
        );
    }
}
