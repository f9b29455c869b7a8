//! Typed scalar values shared by filters, stored rows, and the SQL binder.
//!
//! Every variant is nullable so that a `NULL` keeps its column type when it
//! is bound as a query parameter.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UUID column.
    Uuid(Option<Uuid>),
    /// Text column (enumerations are stored as text too).
    Text(Option<String>),
    /// 32-bit integer column.
    Int(Option<i32>),
    /// Double precision column.
    Float(Option<f64>),
    /// Boolean column.
    Bool(Option<bool>),
    /// Calendar date column.
    Date(Option<NaiveDate>),
    /// Time-of-day column.
    Time(Option<NaiveTime>),
    /// UTC timestamp column.
    Timestamp(Option<DateTime<Utc>>),
    /// Text array column.
    TextList(Option<Vec<String>>),
}

/// Declared type of a filterable field, used to parse raw query values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Parsed as a UUID.
    Uuid,
    /// Taken verbatim.
    Text,
    /// Parsed as a 32-bit integer.
    Int,
    /// Parsed as a finite float.
    Float,
    /// `true`/`false`/`1`/`0`, case-insensitive.
    Bool,
    /// `YYYY-MM-DD`.
    Date,
    /// RFC 3339.
    Timestamp,
}

impl Value {
    /// Returns `true` when the value is SQL `NULL`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        match self {
            Self::Uuid(v) => v.is_none(),
            Self::Text(v) => v.is_none(),
            Self::Int(v) => v.is_none(),
            Self::Float(v) => v.is_none(),
            Self::Bool(v) => v.is_none(),
            Self::Date(v) => v.is_none(),
            Self::Time(v) => v.is_none(),
            Self::Timestamp(v) => v.is_none(),
            Self::TextList(v) => v.is_none(),
        }
    }

    /// Returns the text content of a non-null text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(Some(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Orders two non-null values of the same variant.
    ///
    /// Nulls and mismatched variants compare equal; callers decide where
    /// nulls go.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Uuid(Some(a)), Self::Uuid(Some(b))) => a.cmp(b),
            (Self::Text(Some(a)), Self::Text(Some(b))) => a.cmp(b),
            (Self::Int(Some(a)), Self::Int(Some(b))) => a.cmp(b),
            (Self::Float(Some(a)), Self::Float(Some(b))) => a.total_cmp(b),
            (Self::Bool(Some(a)), Self::Bool(Some(b))) => a.cmp(b),
            (Self::Date(Some(a)), Self::Date(Some(b))) => a.cmp(b),
            (Self::Time(Some(a)), Self::Time(Some(b))) => a.cmp(b),
            (Self::Timestamp(Some(a)), Self::Timestamp(Some(b))) => a.cmp(b),
            (Self::TextList(Some(a)), Self::TextList(Some(b))) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl FieldKind {
    /// Returns the typed `NULL` for this kind.
    #[must_use]
    pub const fn null(self) -> Value {
        match self {
            Self::Uuid => Value::Uuid(None),
            Self::Text => Value::Text(None),
            Self::Int => Value::Int(None),
            Self::Float => Value::Float(None),
            Self::Bool => Value::Bool(None),
            Self::Date => Value::Date(None),
            Self::Timestamp => Value::Timestamp(None),
        }
    }

    /// Parses a raw query-string value. The literal `null` yields the typed
    /// `NULL`. Returns `None` when the text does not fit the kind.
    #[must_use]
    pub fn parse(self, raw: &str) -> Option<Value> {
        if raw == "null" {
            return Some(self.null());
        }
        let value = match self {
            Self::Uuid => Value::Uuid(Some(raw.parse().ok()?)),
            Self::Text => Value::Text(Some(raw.to_string())),
            Self::Int => Value::Int(Some(raw.parse().ok()?)),
            Self::Float => {
                let v: f64 = raw.parse().ok()?;
                if !v.is_finite() {
                    return None;
                }
                Value::Float(Some(v))
            }
            Self::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Value::Bool(Some(true)),
                "false" | "0" => Value::Bool(Some(false)),
                _ => return None,
            },
            Self::Date => Value::Date(Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?)),
            Self::Timestamp => Value::Timestamp(Some(
                DateTime::parse_from_rfc3339(raw).ok()?.with_timezone(&Utc),
            )),
        };
        Some(value)
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(Some(v))
                }
            }

            impl From<Option<$ty>> for Value {
                fn from(v: Option<$ty>) -> Self {
                    Self::$variant(v)
                }
            }
        )+
    };
}

value_from! {
    Uuid => Uuid,
    String => Text,
    i32 => Int,
    f64 => Float,
    bool => Bool,
    NaiveDate => Date,
    NaiveTime => Time,
    DateTime<Utc> => Timestamp,
    Vec<String> => TextList,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(Some(v.to_string()))
    }
}

impl From<Option<&str>> for Value {
    fn from(v: Option<&str>) -> Self {
        Self::Text(v.map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_null_keeps_kind() {
        assert_eq!(FieldKind::Int.parse("null"), Some(Value::Int(None)));
        assert_eq!(FieldKind::Text.parse("null"), Some(Value::Text(None)));
    }

    #[test]
    fn parse_bool_variants() {
        assert_eq!(FieldKind::Bool.parse("TRUE"), Some(Value::Bool(Some(true))));
        assert_eq!(FieldKind::Bool.parse("0"), Some(Value::Bool(Some(false))));
        assert_eq!(FieldKind::Bool.parse("yes"), None);
    }

    #[test]
    fn parse_rejects_bad_numbers() {
        assert_eq!(FieldKind::Int.parse("12x"), None);
        assert_eq!(FieldKind::Float.parse("NaN"), None);
        assert_eq!(FieldKind::Float.parse("2.5"), Some(Value::Float(Some(2.5))));
    }

    #[test]
    fn parse_date_and_uuid() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(FieldKind::Date.parse("2024-03-01"), Some(Value::Date(date)));
        assert_eq!(FieldKind::Date.parse("03/01/2024"), None);
        assert_eq!(FieldKind::Uuid.parse("not-a-uuid"), None);
    }

    #[test]
    fn compare_same_variant() {
        let a = Value::from(1);
        let b = Value::from(2);
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(Value::from("b").compare(&Value::from("a")), Ordering::Greater);
    }

    #[test]
    fn null_detection() {
        assert!(Value::Date(None).is_null());
        assert!(!Value::from(false).is_null());
    }
}
