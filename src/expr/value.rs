//! Dynamically typed SQL values
//!
//! Every constant that reaches the compiler, every bound parameter and every
//! column of a returned row is a [`Value`]. Columns carry a [`ValueKind`] so that
//! instance values can be coerced to the declared storage type before binding.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValueError {
    #[error("Cannot convert {found} value `{value}` to {expected}")]
    Conversion {
        expected: ValueKind,
        found: &'static str,
        value: String,
    },
    #[error("Unexpected NULL for non-optional {0}")]
    UnexpectedNull(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    DateTime,
    Uuid,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::DateTime => "datetime",
            ValueKind::Uuid => "uuid",
        };
        f.write_str(name)
    }
}

/// A SQL value.
///
/// Deserializes untagged from JSON scalars and arrays; datetimes and uuids
/// arrive as text and are coerced against the column kind when bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    #[serde(skip_deserializing)]
    DateTime(NaiveDateTime),
    #[serde(skip_deserializing)]
    Uuid(Uuid),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::DateTime(_) => "datetime",
            Value::Uuid(_) => "uuid",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to the storage representation of `kind`.
    ///
    /// NULL passes through unchanged; lists never coerce.
    pub fn coerce(self, kind: ValueKind) -> Result<Value, ValueError> {
        let fail = |v: &Value| ValueError::Conversion {
            expected: kind,
            found: v.type_name(),
            value: v.to_string(),
        };

        match (kind, self) {
            (_, Value::Null) => Ok(Value::Null),
            (ValueKind::Bool, v @ Value::Bool(_)) => Ok(v),
            (ValueKind::Bool, Value::Int(i)) if i == 0 || i == 1 => Ok(Value::Bool(i == 1)),
            (ValueKind::Bool, Value::Text(s)) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(fail(&Value::Text(s))),
            },
            (ValueKind::Int, v @ Value::Int(_)) => Ok(v),
            (ValueKind::Int, Value::Bool(b)) => Ok(Value::Int(i64::from(b))),
            // 2^63 itself is out of range; non-finite values fail both bounds.
            (ValueKind::Int, Value::Float(f))
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
            {
                Ok(Value::Int(f as i64))
            }
            (ValueKind::Int, Value::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| fail(&Value::Text(s))),
            (ValueKind::Float, v @ Value::Float(_)) => Ok(v),
            (ValueKind::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
            (ValueKind::Float, Value::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| fail(&Value::Text(s))),
            (ValueKind::Text, v @ Value::Text(_)) => Ok(v),
            (ValueKind::Text, v @ (Value::Bool(_) | Value::Int(_) | Value::Float(_))) => {
                Ok(Value::Text(v.to_string()))
            }
            (ValueKind::Text, Value::Uuid(u)) => Ok(Value::Text(u.to_string())),
            (ValueKind::DateTime, v @ Value::DateTime(_)) => Ok(v),
            (ValueKind::DateTime, Value::Text(s)) => parse_datetime(&s)
                .map(Value::DateTime)
                .ok_or_else(|| fail(&Value::Text(s))),
            (ValueKind::Uuid, v @ Value::Uuid(_)) => Ok(v),
            (ValueKind::Uuid, Value::Text(s)) => Uuid::parse_str(s.trim())
                .map(Value::Uuid)
                .map_err(|_| fail(&Value::Text(s))),
            (_, other) => Err(fail(&other)),
        }
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Uuid(u) => write!(f, "{}", u),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! int_conversions {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }

            impl TryFrom<Value> for $t {
                type Error = ValueError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value.coerce(ValueKind::Int)? {
                        Value::Int(i) => <$t>::try_from(i).map_err(|_| ValueError::Conversion {
                            expected: ValueKind::Int,
                            found: "int",
                            value: i.to_string(),
                        }),
                        Value::Null => Err(ValueError::UnexpectedNull(stringify!($t))),
                        other => Err(ValueError::Conversion {
                            expected: ValueKind::Int,
                            found: other.type_name(),
                            value: other.to_string(),
                        }),
                    }
                }
            }
        )*
    };
}

int_conversions!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<Value> for bool {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.coerce(ValueKind::Bool)? {
            Value::Bool(b) => Ok(b),
            _ => Err(ValueError::UnexpectedNull("bool")),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.coerce(ValueKind::Float)? {
            Value::Float(f) => Ok(f),
            _ => Err(ValueError::UnexpectedNull("f64")),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.coerce(ValueKind::Text)? {
            Value::Text(s) => Ok(s),
            _ => Err(ValueError::UnexpectedNull("String")),
        }
    }
}

impl TryFrom<Value> for NaiveDateTime {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.coerce(ValueKind::DateTime)? {
            Value::DateTime(dt) => Ok(dt),
            _ => Err(ValueError::UnexpectedNull("NaiveDateTime")),
        }
    }
}

impl TryFrom<Value> for Uuid {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value.coerce(ValueKind::Uuid)? {
            Value::Uuid(u) => Ok(u),
            _ => Err(ValueError::UnexpectedNull("Uuid")),
        }
    }
}

/// Decode an optional value; NULL maps to `None`.
pub fn optional<T>(value: Value) -> Result<Option<T>, ValueError>
where
    T: TryFrom<Value, Error = ValueError>,
{
    if value.is_null() {
        Ok(None)
    } else {
        T::try_from(value).map(Some)
    }
}
