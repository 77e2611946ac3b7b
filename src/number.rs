// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

use ordered_float::OrderedFloat;
use serde::de;
use serde::de::Deserialize;
use serde::de::Deserializer;
use serde::de::Visitor;
use serde::ser::Serialize;
use serde::ser::Serializer;

/// A JSON number.
///
/// Three kinds exist to preserve 64-bit integer round-trips; a double alone
/// would lose precision beyond 2^53. The narrowest exact representation is
/// selected from the raw lexeme by [`Number::from_lexeme`].
#[derive(Debug, Clone)]
pub enum Number {
    Int64(i64),
    UInt64(u64),
    Float64(f64),
}

impl Number {
    /// Interpret a raw number lexeme produced by the tokenizer.
    ///
    /// A lexeme with a fraction or exponent becomes a double; otherwise a
    /// signed or unsigned 64-bit integer depending on the sign. Returns
    /// `None` when the integer does not fit its 64-bit kind.
    pub(crate) fn from_lexeme(lexeme: &[u8]) -> Option<Number> {
        let s = std::str::from_utf8(lexeme).ok()?;
        if lexeme.iter().any(|c| matches!(c, b'.' | b'e' | b'E')) {
            return fast_float2::parse(s).ok().map(Number::Float64);
        }
        if lexeme.first() == Some(&b'-') {
            s.parse::<i64>().ok().map(Number::Int64)
        } else {
            s.parse::<u64>().ok().map(Number::UInt64)
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int64(v) => Some(*v),
            Number::UInt64(v) => {
                if *v <= i64::MAX as u64 {
                    Some(*v as i64)
                } else {
                    None
                }
            }
            Number::Float64(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Int64(v) => {
                if *v >= 0 {
                    Some(*v as u64)
                } else {
                    None
                }
            }
            Number::UInt64(v) => Some(*v),
            Number::Float64(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int64(v) => *v as f64,
            Number::UInt64(v) => *v as f64,
            Number::Float64(v) => *v,
        }
    }
}

/// Append the shortest round-trippable decimal form of a finite double,
/// with the exponent normalized to a sign and at least two digits
/// (`1.4e-07`, `1e+300`). The decimal separator is `.` regardless of the
/// ambient locale.
pub(crate) fn write_f64(buf: &mut Vec<u8>, v: f64) {
    let mut shortest = ryu::Buffer::new();
    let s = shortest.format_finite(v);
    let Some(epos) = s.find('e') else {
        buf.extend_from_slice(s.as_bytes());
        return;
    };
    buf.extend_from_slice(&s.as_bytes()[..=epos]);
    let exponent = &s[epos + 1..];
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => (b'-', digits),
        None => (b'+', exponent),
    };
    buf.push(sign);
    if digits.len() < 2 {
        buf.push(b'0');
    }
    buf.extend_from_slice(digits.as_bytes());
}

impl Default for Number {
    #[inline]
    fn default() -> Self {
        Number::UInt64(0)
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NumberVisitor;

        impl Visitor<'_> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a number (int64, uint64, or float64)")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Number::Int64(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Number::UInt64(v))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Number::Float64(v))
            }
        }
        deserializer.deserialize_any(NumberVisitor)
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Number::Int64(v) => serializer.serialize_i64(*v),
            Number::UInt64(v) => serializer.serialize_u64(*v),
            Number::Float64(v) => serializer.serialize_f64(*v),
        }
    }
}

impl PartialEq for Number {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Int64(l), Number::Int64(r)) => l.cmp(r),
            (Number::UInt64(l), Number::UInt64(r)) => l.cmp(r),
            (Number::Int64(l), Number::UInt64(r)) => {
                if *l < 0 {
                    Ordering::Less
                } else {
                    (*l as u64).cmp(r)
                }
            }
            (Number::UInt64(l), Number::Int64(r)) => {
                if *r < 0 {
                    Ordering::Greater
                } else {
                    l.cmp(&(*r as u64))
                }
            }
            (_, _) => {
                let l = OrderedFloat(self.as_f64());
                let r = OrderedFloat(other.as_f64());
                l.cmp(&r)
            }
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Number::Int64(v) => {
                let mut buffer = itoa::Buffer::new();
                f.write_str(buffer.format(*v))
            }
            Number::UInt64(v) => {
                let mut buffer = itoa::Buffer::new();
                f.write_str(buffer.format(*v))
            }
            Number::Float64(v) => {
                if v.is_finite() {
                    let mut buf = Vec::with_capacity(24);
                    write_f64(&mut buf, *v);
                    f.write_str(std::str::from_utf8(&buf).map_err(|_| std::fmt::Error)?)
                } else {
                    let mut buffer = ryu::Buffer::new();
                    f.write_str(buffer.format(*v))
                }
            }
        }
    }
}
