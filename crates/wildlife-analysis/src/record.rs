//! Row schemas of the two input tables.
//!
//! Column names follow the field survey exports:
//!
//! ```text
//! survival table: Habitat,Survival_Time,Censoring_Status
//! factor table:   AirQuality,Temperature,DeforestationRate,SpeciesDiversity,ReproductiveRates
//! ```
//!
//! Factor fields are optional at the schema level so that an empty cell or a
//! missing column reaches the risk scorer, which rejects the row with the name
//! of the absent field instead of failing deep inside the deserializer.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use wildlife_stats::survival::DurationRecord;

/// One row of the survival table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalRow {
    #[serde(rename = "Habitat")]
    pub habitat: String,
    #[serde(rename = "Survival_Time")]
    pub survival_time: f64,
    /// `true` when the death was observed (`1`), `false` when censored (`0`).
    #[serde(
        rename = "Censoring_Status",
        serialize_with = "bool_as_digit",
        deserialize_with = "bool_like"
    )]
    pub event_occurred: bool,
}

impl SurvivalRow {
    #[must_use]
    pub fn new(habitat: impl Into<String>, survival_time: f64, event_occurred: bool) -> Self {
        Self {
            habitat: habitat.into(),
            survival_time,
            event_occurred,
        }
    }

    #[must_use]
    pub fn duration_record(&self) -> DurationRecord {
        DurationRecord {
            duration: self.survival_time,
            event_occurred: self.event_occurred,
        }
    }
}

/// One row of the environmental factor table, as read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorRow {
    #[serde(rename = "AirQuality")]
    pub air_quality: Option<f64>,
    #[serde(rename = "Temperature")]
    pub temperature: Option<f64>,
    #[serde(rename = "DeforestationRate")]
    pub deforestation_rate: Option<f64>,
    #[serde(rename = "SpeciesDiversity")]
    pub species_diversity: Option<f64>,
    #[serde(rename = "ReproductiveRates")]
    pub reproductive_rate: Option<f64>,
}

#[expect(clippy::trivially_copy_pass_by_ref, reason = "serde signature")]
fn bool_as_digit<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}

/// Accepts `1`/`0`, `1.0`/`0.0` and `true`/`false` (any case), as numbers,
/// booleans or strings.
fn bool_like<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(BoolLikeVisitor)
}

struct BoolLikeVisitor;

impl de::Visitor<'_> for BoolLikeVisitor {
    type Value = bool;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("1, 0, true or false")
    }

    fn visit_bool<E>(self, value: bool) -> Result<bool, E>
    where
        E: de::Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<bool, E>
    where
        E: de::Error,
    {
        match value {
            1 => Ok(true),
            0 => Ok(false),
            _ => Err(E::invalid_value(de::Unexpected::Unsigned(value), &self)),
        }
    }

    fn visit_i64<E>(self, value: i64) -> Result<bool, E>
    where
        E: de::Error,
    {
        match value {
            1 => Ok(true),
            0 => Ok(false),
            _ => Err(E::invalid_value(de::Unexpected::Signed(value), &self)),
        }
    }

    fn visit_f64<E>(self, value: f64) -> Result<bool, E>
    where
        E: de::Error,
    {
        match value.to_string().as_str() {
            "1" => Ok(true),
            "0" => Ok(false),
            _ => Err(E::invalid_value(de::Unexpected::Float(value), &self)),
        }
    }

    fn visit_str<E>(self, value: &str) -> Result<bool, E>
    where
        E: de::Error,
    {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "1.0" | "true" => Ok(true),
            "0" | "0.0" | "false" => Ok(false),
            _ => Err(E::invalid_value(de::Unexpected::Str(value), &self)),
        }
    }
}
