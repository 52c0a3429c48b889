use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::ops::RangeInclusive;

/// A solar-system body as stored in the `planets` collection.
///
/// `velocity` and `distance` are display strings with units, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    #[serde(deserialize_with = "deserialize_numeric_id")]
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: String,
    pub velocity: String,
    pub distance: String,
}

impl Planet {
    pub fn new(
        id: i64,
        name: &str,
        description: &str,
        image: &str,
        velocity: &str,
        distance: &str,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            image: image.to_string(),
            velocity: velocity.to_string(),
            distance: distance.to_string(),
        }
    }
}

/// The bulk loader may have written `id` as int32, int64 or an integral double.
fn deserialize_numeric_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumericId {
        Int(i64),
        Float(f64),
    }

    match NumericId::deserialize(deserializer)? {
        NumericId::Int(id) => Ok(id),
        NumericId::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
        NumericId::Float(f) => Err(serde::de::Error::custom(format!(
            "planet id must be integral, got {}",
            f
        ))),
    }
}

/// The nine canonical bodies, Sun through Neptune.
pub fn solar_system() -> Vec<Planet> {
    vec![
        Planet::new(0, "Sun", "Center of the Solar System", "", "0 km/s", "0 km"),
        Planet::new(1, "Mercury", "Closest to the Sun", "", "47.87 km/s", "57.91 million km"),
        Planet::new(2, "Venus", "Second planet from the Sun", "", "35.02 km/s", "108.2 million km"),
        Planet::new(3, "Earth", "Our home planet", "", "29.78 km/s", "149.6 million km"),
        Planet::new(4, "Mars", "The Red Planet", "", "24.07 km/s", "227.9 million km"),
        Planet::new(5, "Jupiter", "Largest planet", "", "13.07 km/s", "778.5 million km"),
        Planet::new(6, "Saturn", "Ringed planet", "", "9.69 km/s", "1.429 billion km"),
        Planet::new(7, "Uranus", "Ice giant", "", "6.81 km/s", "2.871 billion km"),
        Planet::new(8, "Neptune", "Farthest planet", "", "5.43 km/s", "4.351 billion km"),
    ]
}

/// Identifiers covered by [`solar_system`].
pub fn valid_id_range() -> RangeInclusive<i64> {
    0..=8
}

/// Coerce a request's `id` field to an integer the way the lookup endpoint
/// always has: integers, integral floats and integer strings are accepted,
/// anything else is no id at all.
pub fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
