//! Numeric controls: a value that is either fixed or randomly varied
//!
//! A control is resolved at the moment of use and never memoized, so every
//! call to [`NumericControl::resolve`] may produce a different number.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Direction of a variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VariationType {
    /// `value` up to `value + magnitude`
    Plus,
    /// `value - magnitude` up to `value`
    Minus,
    /// `value - magnitude` up to `value + magnitude`
    PlusMinus,
}

/// How the variation magnitude is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VariationUnit {
    /// Magnitude is a percentage of the base value
    Percent,
    /// Magnitude is an absolute amount
    Absolute,
}

impl VariationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariationType::Plus => "Plus",
            VariationType::Minus => "Minus",
            VariationType::PlusMinus => "PlusMinus",
        }
    }
}

impl VariationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariationUnit::Percent => "Percent",
            VariationUnit::Absolute => "Absolute",
        }
    }
}

impl FromStr for VariationType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Plus" => Ok(VariationType::Plus),
            "Minus" => Ok(VariationType::Minus),
            "PlusMinus" => Ok(VariationType::PlusMinus),
            other => Err(ConfigError::InvalidVariation(format!(
                "unknown variation type `{}`",
                other
            ))),
        }
    }
}

impl FromStr for VariationUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Percent" => Ok(VariationUnit::Percent),
            "Absolute" => Ok(VariationUnit::Absolute),
            other => Err(ConfigError::InvalidVariation(format!(
                "unknown variation unit `{}`",
                other
            ))),
        }
    }
}

impl TryFrom<String> for VariationType {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for VariationUnit {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<VariationType> for String {
    fn from(kind: VariationType) -> Self {
        kind.as_str().to_string()
    }
}

impl From<VariationUnit> for String {
    fn from(unit: VariationUnit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for VariationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VariationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A random variation rule applied on top of a base value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variation {
    #[serde(rename = "type")]
    pub kind: VariationType,
    pub unit: VariationUnit,
    pub value: f32,
}

impl Variation {
    /// Absolute magnitude of the variation for a given base value
    fn magnitude(&self, base: f32) -> f32 {
        match self.unit {
            VariationUnit::Absolute => self.value,
            VariationUnit::Percent => base * (self.value / 100.0),
        }
    }
}

/// A number that may be fixed or randomly varied
///
/// JSON form is either a bare number or
/// `{"value": 300, "variation": {"type": "PlusMinus", "unit": "Absolute", "value": 100}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NumericControl {
    Fixed(f32),
    Varied {
        value: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variation: Option<Variation>,
    },
}

impl NumericControl {
    pub const fn fixed(value: f32) -> Self {
        NumericControl::Fixed(value)
    }

    pub const fn varied(value: f32, kind: VariationType, unit: VariationUnit, amount: f32) -> Self {
        NumericControl::Varied {
            value,
            variation: Some(Variation {
                kind,
                unit,
                value: amount,
            }),
        }
    }

    /// `value` plus a uniform random amount up to `extra`
    pub const fn spread(value: f32, extra: f32) -> Self {
        Self::varied(value, VariationType::Plus, VariationUnit::Absolute, extra)
    }

    /// Base value, ignoring any variation
    pub fn base(&self) -> f32 {
        match *self {
            NumericControl::Fixed(value) => value,
            NumericControl::Varied { value, .. } => value,
        }
    }

    pub fn variation(&self) -> Option<&Variation> {
        match self {
            NumericControl::Fixed(_) => None,
            NumericControl::Varied { variation, .. } => variation.as_ref(),
        }
    }

    /// Resolve to a concrete number, drawing fresh randomness if varied
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let base = self.base();
        let Some(variation) = self.variation() else {
            return base;
        };

        let random: f32 = rng.random();
        let magnitude = variation.magnitude(base);
        match variation.kind {
            VariationType::Plus => base + random * magnitude,
            VariationType::Minus => base - random * magnitude,
            VariationType::PlusMinus => base + (random * 2.0 - 1.0) * magnitude,
        }
    }

    /// Closed interval that every resolution falls in, as `(low, high)`
    pub fn bounds(&self) -> (f32, f32) {
        let base = self.base();
        let Some(variation) = self.variation() else {
            return (base, base);
        };

        let magnitude = variation.magnitude(base);
        let (a, b) = match variation.kind {
            VariationType::Plus => (base, base + magnitude),
            VariationType::Minus => (base - magnitude, base),
            VariationType::PlusMinus => (base - magnitude, base + magnitude),
        };
        (a.min(b), a.max(b))
    }

    pub fn is_finite(&self) -> bool {
        self.base().is_finite() && self.variation().is_none_or(|v| v.value.is_finite())
    }
}

/// Object form of a varied control
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct VariedForm {
    value: f32,
    #[serde(default)]
    variation: Option<Variation>,
}

struct NumericControlVisitor;

impl<'de> Visitor<'de> for NumericControlVisitor {
    type Value = NumericControl;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or an object with `value` and optional `variation`")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(NumericControl::Fixed(value as f32))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(NumericControl::Fixed(value as f32))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(NumericControl::Fixed(value as f32))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        // Errors from the variation names surface with their own message
        let form = VariedForm::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Ok(NumericControl::Varied {
            value: form.value,
            variation: form.variation,
        })
    }
}

impl<'de> Deserialize<'de> for NumericControl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericControlVisitor)
    }
}

impl From<f32> for NumericControl {
    fn from(value: f32) -> Self {
        NumericControl::Fixed(value)
    }
}

impl Default for NumericControl {
    fn default() -> Self {
        NumericControl::Fixed(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_fixed_resolves_to_itself() {
        let mut rng = rng();
        assert_eq!(NumericControl::fixed(4.5).resolve(&mut rng), 4.5);
        let no_variation = NumericControl::Varied {
            value: -2.0,
            variation: None,
        };
        assert_eq!(no_variation.resolve(&mut rng), -2.0);
    }

    #[test]
    fn test_resolution_is_not_memoized() {
        let mut rng = rng();
        let control = NumericControl::spread(100.0, 50.0);
        let first = control.resolve(&mut rng);
        let differs = (0..20).any(|_| control.resolve(&mut rng) != first);
        assert!(differs);
    }

    #[test]
    fn test_percent_bounds() {
        let control =
            NumericControl::varied(200.0, VariationType::PlusMinus, VariationUnit::Percent, 10.0);
        assert_eq!(control.bounds(), (180.0, 220.0));
        let minus = NumericControl::varied(200.0, VariationType::Minus, VariationUnit::Percent, 25.0);
        assert_eq!(minus.bounds(), (150.0, 200.0));
    }

    #[test]
    fn test_json_forms() {
        let plain: NumericControl = serde_json::from_str("12.5").unwrap();
        assert_eq!(plain, NumericControl::Fixed(12.5));

        let varied: NumericControl = serde_json::from_str(
            r#"{"value": 300, "variation": {"type": "PlusMinus", "unit": "Absolute", "value": 100}}"#,
        )
        .unwrap();
        assert_eq!(
            varied,
            NumericControl::varied(300.0, VariationType::PlusMinus, VariationUnit::Absolute, 100.0)
        );

        let bare: NumericControl = serde_json::from_str(r#"{"value": 3}"#).unwrap();
        assert_eq!(bare.resolve(&mut rng()), 3.0);
    }

    #[test]
    fn test_unknown_variation_names_rejected() {
        assert!(matches!(
            "Sideways".parse::<VariationType>(),
            Err(ConfigError::InvalidVariation(_))
        ));
        assert!(matches!(
            "Furlongs".parse::<VariationUnit>(),
            Err(ConfigError::InvalidVariation(_))
        ));
        let json = r#"{"value": 1, "variation": {"type": "Sideways", "unit": "Absolute", "value": 1}}"#;
        let err = serde_json::from_str::<NumericControl>(json).unwrap_err();
        assert!(
            err.to_string().contains("unknown variation type `Sideways`"),
            "{}",
            err
        );

        let json = r#"{"value": 1, "variation": {"type": "Plus", "unit": "Furlongs", "value": 1}}"#;
        let err = serde_json::from_str::<NumericControl>(json).unwrap_err();
        assert!(err.to_string().contains("unknown variation unit `Furlongs`"));
    }

    #[test]
    fn test_misspelled_keys_rejected() {
        let typo = r#"{"value": 5, "variaton": {"type": "Plus", "unit": "Absolute", "value": 1}}"#;
        let err = serde_json::from_str::<NumericControl>(typo).unwrap_err();
        assert!(err.to_string().contains("variaton"), "{}", err);

        let inner = r#"{"value": 5, "variation": {"type": "Plus", "unit": "Absolute", "amount": 1}}"#;
        assert!(serde_json::from_str::<NumericControl>(inner).is_err());
    }

    #[test]
    fn test_rejects_other_json_types() {
        assert!(serde_json::from_str::<NumericControl>(r#""12""#).is_err());
        assert!(serde_json::from_str::<NumericControl>("[1, 2]").is_err());
        assert!(serde_json::from_str::<NumericControl>(r#"{"variation": null}"#).is_err());
    }

    fn variation_type() -> impl Strategy<Value = VariationType> {
        prop_oneof![
            Just(VariationType::Plus),
            Just(VariationType::Minus),
            Just(VariationType::PlusMinus),
        ]
    }

    fn variation_unit() -> impl Strategy<Value = VariationUnit> {
        prop_oneof![Just(VariationUnit::Percent), Just(VariationUnit::Absolute)]
    }

    proptest! {
        #[test]
        fn prop_plain_number_is_identity(value in -1.0e6f32..1.0e6, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            prop_assert_eq!(NumericControl::fixed(value).resolve(&mut rng), value);
        }

        #[test]
        fn prop_varied_within_bounds(
            value in -1000.0f32..1000.0,
            amount in 0.0f32..500.0,
            kind in variation_type(),
            unit in variation_unit(),
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let control = NumericControl::varied(value, kind, unit, amount);
            let (low, high) = control.bounds();
            let magnitude = match unit {
                VariationUnit::Absolute => amount,
                VariationUnit::Percent => (value * amount / 100.0).abs(),
            };
            prop_assert!(low >= value - magnitude - 1e-3);
            prop_assert!(high <= value + magnitude + 1e-3);
            for _ in 0..8 {
                let resolved = control.resolve(&mut rng);
                prop_assert!(resolved >= low - 1e-3 && resolved <= high + 1e-3,
                    "{} outside [{}, {}]", resolved, low, high);
            }
        }
    }
}
