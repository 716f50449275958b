use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

/// Normalized identifier shared by every dataset.
///
/// Producers disagree on whether IDs are numbers or strings, so both are
/// folded into the same trimmed string form: `42`, `42.0` and `" 42 "` all
/// become `"42"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    /// Builds a key from raw text. Blank input has no key.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Builds a key from any JSON scalar. Objects, arrays, booleans and
    /// null have no key.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Self::new(text),
            Value::Number(number) => Self::new(number_text(number)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn number_text(number: &serde_json::Number) -> String {
    if let Some(value) = number.as_i64() {
        return value.to_string();
    }
    if let Some(value) = number.as_u64() {
        return value.to_string();
    }
    match number.as_f64() {
        #[allow(clippy::cast_possible_truncation)]
        Some(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => (value as i64).to_string(),
        _ => number.to_string(),
    }
}

/// Field deserializers that never fail on a wrong JSON type. A field that
/// cannot be read is treated as absent.
pub mod lenient {
    use super::{number_text, Key};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Text content of a scalar; blank strings count as absent.
    pub fn text_of(value: &Value) -> Option<String> {
        match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number_text(number)),
            _ => None,
        }
    }

    pub fn key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Key>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(Key::from_value))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(text_of))
    }

    /// Chart position. Missing or unreadable positions sort first as 0.
    pub fn rank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(count_of).map_or(0, |rank| {
            u32::try_from(rank).unwrap_or(u32::MAX)
        }))
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(count_of))
    }

    fn count_of(value: &Value) -> Option<u64> {
        match value {
            Value::Number(number) => number.as_u64().or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.is_finite() && *value >= 0.0)
                    .map(|value| {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let whole = value.trunc() as u64;
                        whole
                    })
            }),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).ok_or_else(|| serde::de::Error::custom("identifier is not a scalar"))
    }
}
