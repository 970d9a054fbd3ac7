//! Shape-driven decoding of a single token.
//!
//! Each field type implements [`Field`]: its static type picks the
//! [`Shape`] and the decoding branch, so no runtime type inspection is
//! needed.
//!
//! - scalars convert the token's primitive value
//! - `Option<Arc<K>>` resolves a path reference, an inline discriminated
//!   object, or null
//! - `Vec<T>`, [`Array2`](crate::Array2) and [`Array3`](crate::Array3)
//!   recurse element-wise

use crate::{DefError, DefKind, DefResult, Resources, ScalarKind, Shape};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// A type a def field can be declared as.
pub trait Field: Sized {
    /// Shape descriptor for this type.
    fn shape() -> Shape;

    /// Value used when the field is missing from the document.
    fn absent() -> Self;

    /// Decodes a present token.
    fn decode(token: &Value, resources: &mut dyn Resources) -> DefResult<Self>;
}

macro_rules! integer_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Field for $ty {
            fn shape() -> Shape {
                Shape::Scalar(ScalarKind::$kind)
            }

            fn absent() -> Self {
                0
            }

            fn decode(token: &Value, _: &mut dyn Resources) -> DefResult<Self> {
                let Value::Number(n) = token else {
                    return Err(DefError::scalar(ScalarKind::$kind, token));
                };
                n.as_i64()
                    .and_then(|v| <$ty>::try_from(v).ok())
                    .or_else(|| n.as_u64().and_then(|v| <$ty>::try_from(v).ok()))
                    .or_else(|| {
                        // Integral floats such as `5.0` or `1e3`.
                        n.as_f64()
                            .filter(|v| {
                                v.fract() == 0.0
                                    && *v >= <$ty>::MIN as f64
                                    && *v < <$ty>::MAX as f64 + 1.0
                            })
                            .map(|v| v as $ty)
                    })
                    .ok_or_else(|| DefError::scalar(ScalarKind::$kind, token))
            }
        }
    )*};
}

integer_field! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
}

impl Field for f64 {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::F64)
    }

    fn absent() -> Self {
        0.0
    }

    fn decode(token: &Value, _: &mut dyn Resources) -> DefResult<Self> {
        token
            .as_f64()
            .ok_or_else(|| DefError::scalar(ScalarKind::F64, token))
    }
}

impl Field for f32 {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::F32)
    }

    fn absent() -> Self {
        0.0
    }

    fn decode(token: &Value, _: &mut dyn Resources) -> DefResult<Self> {
        token
            .as_f64()
            .map(|v| v as f32)
            .filter(|v| v.is_finite())
            .ok_or_else(|| DefError::scalar(ScalarKind::F32, token))
    }
}

impl Field for bool {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::Bool)
    }

    fn absent() -> Self {
        false
    }

    fn decode(token: &Value, _: &mut dyn Resources) -> DefResult<Self> {
        token
            .as_bool()
            .ok_or_else(|| DefError::scalar(ScalarKind::Bool, token))
    }
}

impl Field for String {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::String)
    }

    fn absent() -> Self {
        String::new()
    }

    fn decode(token: &Value, _: &mut dyn Resources) -> DefResult<Self> {
        token
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| DefError::scalar(ScalarKind::String, token))
    }
}

impl Field for char {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::Char)
    }

    fn absent() -> Self {
        '\0'
    }

    fn decode(token: &Value, _: &mut dyn Resources) -> DefResult<Self> {
        let mut chars = token.as_str().unwrap_or_default().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DefError::scalar(ScalarKind::Char, token)),
        }
    }
}

impl Field for DateTime<Utc> {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::DateTime)
    }

    fn absent() -> Self {
        DateTime::<Utc>::default()
    }

    fn decode(token: &Value, _: &mut dyn Resources) -> DefResult<Self> {
        token
            .as_str()
            .and_then(parse_date_time)
            .ok_or_else(|| DefError::scalar(ScalarKind::DateTime, token))
    }
}

impl Field for TimeDelta {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::TimeSpan)
    }

    fn absent() -> Self {
        TimeDelta::zero()
    }

    fn decode(token: &Value, _: &mut dyn Resources) -> DefResult<Self> {
        token
            .as_str()
            .and_then(parse_time_span)
            .ok_or_else(|| DefError::scalar(ScalarKind::TimeSpan, token))
    }
}

impl Field for Uuid {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::Guid)
    }

    fn absent() -> Self {
        Uuid::nil()
    }

    fn decode(token: &Value, _: &mut dyn Resources) -> DefResult<Self> {
        token
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| DefError::scalar(ScalarKind::Guid, token))
    }
}

/// Parses an RFC 3339 timestamp. A timestamp without an offset, or a bare
/// date, is taken as UTC.
fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = text.parse::<NaiveDateTime>() {
        return Some(naive.and_utc());
    }
    text.parse::<NaiveDate>()
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

/// Parses `[-][d.]hh:mm[:ss[.fffffff]]`.
pub fn parse_time_span(text: &str) -> Option<TimeDelta> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (clock, days) = match body.split_once(':') {
        Some((head, tail)) => match head.split_once('.') {
            Some((days, hours)) => (format!("{hours}:{tail}"), days.parse::<i64>().ok()?),
            None => (body.to_owned(), 0),
        },
        // A bare integer is a day count.
        None => (String::new(), body.parse::<i64>().ok()?),
    };

    let mut total = TimeDelta::try_days(days)?;
    if !clock.is_empty() {
        let mut parts = clock.split(':');
        let hours: i64 = parts.next()?.parse().ok()?;
        let minutes: i64 = parts.next()?.parse().ok()?;
        let seconds = parts.next().unwrap_or("0");
        if parts.next().is_some() || !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
            return None;
        }

        let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
        let whole: i64 = whole.parse().ok()?;
        if !(0..=59).contains(&whole) || fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let nanos: i64 = if fraction.is_empty() {
            0
        } else {
            format!("{fraction:0<9}").parse().ok()?
        };

        total = total
            .checked_add(&TimeDelta::try_hours(hours)?)?
            .checked_add(&TimeDelta::try_minutes(minutes)?)?
            .checked_add(&TimeDelta::try_seconds(whole)?)?
            .checked_add(&TimeDelta::nanoseconds(nanos))?;
    }

    Some(if negative { -total } else { total })
}

/// A path reference, an inline discriminated object, or null.
///
/// An inline object is filled before its kind is checked, so resources it
/// references stay cached even when the cast then fails.
impl<K: DefKind + ?Sized> Field for Option<Arc<K>> {
    fn shape() -> Shape {
        Shape::Polymorphic(K::kind_name())
    }

    fn absent() -> Self {
        None
    }

    fn decode(token: &Value, resources: &mut dyn Resources) -> DefResult<Self> {
        let def = match token {
            Value::Null => return Ok(None),
            Value::String(path) => resources.load(path)?,
            Value::Object(_) => resources.instantiate(token)?,
            other => return Err(DefError::type_mismatch(Self::shape().to_string(), other)),
        };

        let found = def.def_type_name();
        K::cast(def).map(Some).ok_or_else(|| DefError::TypeMismatch {
            expected: K::kind_name().to_owned(),
            found: found.to_owned(),
        })
    }
}

impl<T: Field> Field for Vec<T> {
    fn shape() -> Shape {
        Shape::Array1(Box::new(T::shape()))
    }

    fn absent() -> Self {
        Vec::new()
    }

    fn decode(token: &Value, resources: &mut dyn Resources) -> DefResult<Self> {
        let items = expect_array::<Self>(token)?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::decode(item, resources).map_err(|e| e.in_element(format!("[{i}]"))))
            .collect()
    }
}

/// Borrows `token` as an array, or fails with the shape of `F`.
pub(crate) fn expect_array<F: Field>(token: &Value) -> DefResult<&Vec<Value>> {
    token
        .as_array()
        .ok_or_else(|| DefError::shape_mismatch(F::shape().to_string(), crate::TokenKind::of(token).to_string()))
}
