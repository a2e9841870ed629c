//! Scalar setting values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The dynamic type of a stored setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// `true` / `false`.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// UTF-8 string.
    String,
}

impl ValueKind {
    /// Lowercase name used in error messages and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::String => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A scalar value held by the key-value store or captured in a preset.
///
/// The serde representation is externally tagged (`{"int": 14}`), which is
/// what [`FileStore`](crate::FileStore) writes so that `Int` and `Long` stay
/// distinct on disk. Preset payloads use the native JSON form instead, see
/// [`SettingValue::to_json`] and [`SettingValue::from_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingValue {
    /// Boolean value.
    Bool(bool),
    /// 32-bit integer value.
    Int(i32),
    /// 64-bit integer value.
    Long(i64),
    /// Floating point value.
    Float(f32),
    /// String value.
    String(String),
}

impl SettingValue {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            SettingValue::Bool(_) => ValueKind::Bool,
            SettingValue::Int(_) => ValueKind::Int,
            SettingValue::Long(_) => ValueKind::Long,
            SettingValue::Float(_) => ValueKind::Float,
            SettingValue::String(_) => ValueKind::String,
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to a native JSON scalar.
    ///
    /// Returns `None` for NaN and infinite floats, which JSON cannot encode.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value;

        match self {
            SettingValue::Bool(b) => Some(Value::Bool(*b)),
            SettingValue::Int(i) => Some(Value::from(*i)),
            SettingValue::Long(l) => Some(Value::from(*l)),
            SettingValue::Float(f) => {
                serde_json::Number::from_f64(f64::from(*f)).map(Value::Number)
            }
            SettingValue::String(s) => Some(Value::String(s.clone())),
        }
    }

    /// Decode a native JSON scalar as a value of `kind`.
    ///
    /// Integers are range-checked for `Int`; `Float` also accepts JSON
    /// integers since writers commonly drop the fractional part of `2.0`.
    /// Anything else that does not fit returns `None`.
    pub fn from_json(kind: ValueKind, json: &serde_json::Value) -> Option<Self> {
        match kind {
            ValueKind::Bool => json.as_bool().map(SettingValue::Bool),
            ValueKind::Int => json
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .map(SettingValue::Int),
            ValueKind::Long => json.as_i64().map(SettingValue::Long),
            ValueKind::Float => json.as_f64().map(|f| SettingValue::Float(f as f32)),
            ValueKind::String => json.as_str().map(|s| SettingValue::String(s.to_string())),
        }
    }

    /// Parse user text as a value of `kind`.
    ///
    /// Booleans accept `true`/`false`, `on`/`off`, `yes`/`no` and `1`/`0`.
    pub fn parse(kind: ValueKind, text: &str) -> Option<Self> {
        let trimmed = text.trim();
        match kind {
            ValueKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Some(SettingValue::Bool(true)),
                "false" | "off" | "no" | "0" => Some(SettingValue::Bool(false)),
                _ => None,
            },
            ValueKind::Int => trimmed.parse().ok().map(SettingValue::Int),
            ValueKind::Long => trimmed.parse().ok().map(SettingValue::Long),
            ValueKind::Float => trimmed
                .parse::<f32>()
                .ok()
                .filter(|f| f.is_finite())
                .map(SettingValue::Float),
            ValueKind::String => Some(SettingValue::String(text.to_string())),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Int(i) => write!(f, "{i}"),
            SettingValue::Long(l) => write!(f, "{l}"),
            SettingValue::Float(v) => write!(f, "{v}"),
            SettingValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Int(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Long(value)
    }
}

impl From<f32> for SettingValue {
    fn from(value: f32) -> Self {
        SettingValue::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}
