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

use std::borrow::Cow;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

use rand::distr::Alphanumeric;
use rand::distr::SampleString;
use rand::rng;
use rand::Rng;
use serde::ser::Serialize;
use serde::ser::SerializeMap;
use serde::ser::SerializeSeq;
use serde::ser::Serializer;

use crate::Number;

/// An insertion-ordered JSON object.
///
/// Entries keep the order they were inserted in, and duplicate keys are
/// retained; [`get`] returns the value of the *last* entry for a key.
/// Serialization does not use this order: objects are always emitted in
/// ascending byte order of their keys for deterministic output.
///
/// [`get`]: Object::get
#[derive(Clone, Default)]
pub struct Object<'a> {
    entries: Vec<(Cow<'a, str>, Value<'a>)>,
}

impl<'a> Object<'a> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append an entry. An existing entry with the same key is kept.
    pub fn insert<K: Into<Cow<'a, str>>>(&mut self, key: K, value: Value<'a>) {
        self.entries.push((key.into(), value));
    }

    /// Look up a key; the last inserted entry wins.
    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (Cow<'a, str>, Value<'a>)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_ref())
    }

    /// Entries sorted ascending by the UTF-8 bytes of their keys. The sort
    /// is stable, so duplicate keys stay in insertion order.
    pub(crate) fn sorted(&self) -> Vec<&(Cow<'a, str>, Value<'a>)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
        entries
    }

    pub fn into_owned(self) -> Object<'static> {
        Object {
            entries: self
                .entries
                .into_iter()
                .map(|(k, v)| (Cow::Owned(k.into_owned()), v.into_owned()))
                .collect(),
        }
    }
}

impl PartialEq for Object<'_> {
    /// Objects compare as key-sorted sequences, so two objects holding the
    /// same entries in different insertion orders are equal.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.sorted()
            .into_iter()
            .zip(other.sorted())
            .all(|(l, r)| l.0 == r.0 && l.1 == r.1)
    }
}

impl Eq for Object<'_> {}

impl Debug for Object<'_> {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.debug_map().entries(self.iter().map(|(k, v)| (k, v))).finish()
    }
}

impl<'a> FromIterator<(Cow<'a, str>, Value<'a>)> for Object<'a> {
    fn from_iter<T: IntoIterator<Item = (Cow<'a, str>, Value<'a>)>>(iter: T) -> Self {
        Object {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A dynamically-typed JSON value as exchanged at the library boundary.
///
/// Beyond the JSON kinds this carries two host conveniences: `Unset`, the
/// distinguished "no value" sentinel (distinct from an explicit `Null`),
/// and `Binary`, a byte-array kind that serializes as a JSON string when
/// non-empty and as `null` when empty. The parser produces neither.
#[derive(Clone, Default)]
pub enum Value<'a> {
    #[default]
    Unset,
    Null,
    Bool(bool),
    Number(Number),
    String(Cow<'a, str>),
    Binary(Cow<'a, [u8]>),
    Array(Vec<Value<'a>>),
    Object(Object<'a>),
}

impl<'a> Value<'a> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_scalar(&self) -> bool {
        !self.is_array() && !self.is_object()
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_v))
    }

    pub fn as_object(&self) -> Option<&Object<'a>> {
        match self {
            Value::Object(ref obj) => Some(obj),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_v))
    }

    pub fn as_array(&self) -> Option<&Vec<Value<'a>>> {
        match self {
            Value::Array(ref array) => Some(array),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        self.as_str().is_some()
    }

    pub fn as_str(&self) -> Option<&Cow<'_, str>> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_v))
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(v) => Some(v.as_ref()),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_i64(&self) -> bool {
        self.as_i64().is_some()
    }

    pub fn is_u64(&self) -> bool {
        self.as_u64().is_some()
    }

    pub fn is_f64(&self) -> bool {
        self.as_f64().is_some()
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Bool(_v))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn array_length(&self) -> Option<usize> {
        match self {
            Value::Array(arr) => Some(arr.len()),
            _ => None,
        }
    }

    /// Detach the value from the input buffer it may borrow from.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Unset => Value::Unset,
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(v),
            Value::Number(n) => Value::Number(n),
            Value::String(s) => Value::String(Cow::Owned(s.into_owned())),
            Value::Binary(b) => Value::Binary(Cow::Owned(b.into_owned())),
            Value::Array(values) => {
                Value::Array(values.into_iter().map(Value::into_owned).collect())
            }
            Value::Object(object) => Value::Object(object.into_owned()),
        }
    }

    /// Generate a random value, used by round-trip tests.
    pub fn rand_value() -> Value<'static> {
        let mut rng = rng();
        match rng.random_range(0..=2) {
            0 => {
                let len = rng.random_range(0..=5);
                let mut values = Vec::with_capacity(len);
                for _ in 0..len {
                    values.push(Self::rand_scalar_value());
                }
                Value::Array(values)
            }
            1 => {
                let len = rng.random_range(0..=5);
                let mut obj = Object::new();
                for _ in 0..len {
                    let k = Alphanumeric.sample_string(&mut rng, 5);
                    let v = Self::rand_scalar_value();
                    obj.insert(k, v);
                }
                Value::Object(obj)
            }
            _ => Self::rand_scalar_value(),
        }
    }

    fn rand_scalar_value() -> Value<'static> {
        let mut rng = rng();
        match rng.random_range(0..=3) {
            0 => {
                let v = rng.random_bool(0.5);
                Value::Bool(v)
            }
            1 => {
                let s = Alphanumeric.sample_string(&mut rng, 5);
                Value::String(Cow::from(s))
            }
            2 => match rng.random_range(0..=2) {
                0 => {
                    let n: u64 = rng.random_range(0..=100000);
                    Value::Number(Number::UInt64(n))
                }
                1 => {
                    let n: i64 = rng.random_range(-100000..=100000);
                    Value::Number(Number::Int64(n))
                }
                _ => {
                    let n: f64 = rng.random_range(-4000.0..1.3e5);
                    Value::Number(Number::Float64(n))
                }
            },
            _ => Value::Null,
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unset, Value::Unset) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::String(l), Value::String(r)) => l == r,
            (Value::Binary(l), Value::Binary(r)) => l == r,
            (Value::Array(l), Value::Array(r)) => l == r,
            (Value::Object(l), Value::Object(r)) => l == r,
            (_, _) => false,
        }
    }
}

impl Eq for Value<'_> {}

impl Debug for Value<'_> {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match *self {
            Value::Unset => formatter.debug_tuple("Unset").finish(),
            Value::Null => formatter.debug_tuple("Null").finish(),
            Value::Bool(v) => formatter.debug_tuple("Bool").field(&v).finish(),
            Value::Number(ref v) => Debug::fmt(v, formatter),
            Value::String(ref v) => formatter.debug_tuple("String").field(v).finish(),
            Value::Binary(ref v) => formatter.debug_tuple("Binary").field(v).finish(),
            Value::Array(ref v) => {
                formatter.write_str("Array(")?;
                Debug::fmt(v, formatter)?;
                formatter.write_str(")")
            }
            Value::Object(ref v) => {
                formatter.write_str("Object(")?;
                Debug::fmt(v, formatter)?;
                formatter.write_str(")")
            }
        }
    }
}

impl Display for Value<'_> {
    /// Compact JSON rendering, identical to [`crate::serialize`] with
    /// `pretty_indent = 0`. Values that cannot be serialized (non-finite
    /// doubles, non-UTF-8 binary) render as a formatting error.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let bytes = crate::ser::serialize(self, 0, 0).map_err(|_| std::fmt::Error)?;
        f.write_str(std::str::from_utf8(&bytes).map_err(|_| std::fmt::Error)?)
    }
}

impl Serialize for Value<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Unset | Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Binary(b) => {
                // byte-arrays serialize as strings, exactly as the JSON
                // encoder renders them
                if b.is_empty() {
                    serializer.serialize_unit()
                } else {
                    match std::str::from_utf8(b) {
                        Ok(s) => serializer.serialize_str(s),
                        Err(_) => Err(serde::ser::Error::custom(
                            "binary value is not valid UTF-8",
                        )),
                    }
                }
            }
            Value::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Object(object) => {
                let mut map = serializer.serialize_map(Some(object.len()))?;
                for (key, value) in object.sorted().into_iter().map(|e| (&e.0, &e.1)) {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
