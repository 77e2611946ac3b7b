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

use bigjson::{parse_utf8, to_utf8, Number, Object, ParseOption, SerOption, Value};

fn roundtrip<'a>(value: &Value<'a>) -> Value<'static> {
    let bytes = to_utf8(value, true, SerOption::BareNullOk).unwrap();
    parse_utf8(&bytes, ParseOption::AcceptAnyValue)
        .unwrap()
        .into_owned()
}

/// Serialize-then-parse preserves structural equality for any value
/// without non-finite doubles and without the unset sentinel.
#[test]
fn test_compact_roundtrip_fixed_values() {
    let mut object = Object::new();
    object.insert("nested", Value::Array(vec![Value::Object(Object::new())]));
    object.insert("text", Value::from("with \"escapes\" and \n breaks"));
    object.insert("unicode", Value::from("snowman \u{2603} clef \u{1D11E}"));
    object.insert("max", Value::from(u64::MAX));
    object.insert("min", Value::from(i64::MIN));
    object.insert("pi-ish", Value::from(3.140000001f64));
    object.insert("tiny", Value::from(1.4e-7f64));

    let values = vec![
        Value::Null,
        Value::Bool(true),
        Value::from(0u64),
        Value::from(-1i64),
        Value::from(0.5f64),
        Value::from(""),
        Value::Array(vec![]),
        Value::Object(Object::new()),
        Value::Object(object),
    ];
    for value in values {
        assert_eq!(roundtrip(&value), value);
    }
}

#[test]
fn test_compact_roundtrip_random_values() {
    for _ in 0..200 {
        let value = Value::rand_value();
        assert_eq!(roundtrip(&value), value, "value {value:?}");
    }
}

/// Pretty output parses to the same value as compact output.
#[test]
fn test_pretty_equals_compact_after_parse() {
    for _ in 0..100 {
        let value = Value::rand_value();
        let compact = to_utf8(&value, true, SerOption::BareNullOk).unwrap();
        let pretty = to_utf8(&value, false, SerOption::BareNullOk).unwrap();
        let a = parse_utf8(&compact, ParseOption::AcceptAnyValue).unwrap();
        let b = parse_utf8(&pretty, ParseOption::AcceptAnyValue).unwrap();
        assert_eq!(a, b, "value {value:?}");
    }
}

/// A second serialization pass over a parsed value is byte-stable.
#[test]
fn test_reserialization_is_stable() {
    let input = br#"{"z":1,"a":{"y":[3,2,1],"x":"s"},"m":0.125}"#;
    let first = parse_utf8(input, ParseOption::RequireObject).unwrap();
    let once = to_utf8(&first, true, SerOption::BareNullOk).unwrap();
    let second = parse_utf8(&once, ParseOption::RequireObject).unwrap();
    let twice = to_utf8(&second, true, SerOption::BareNullOk).unwrap();
    assert_eq!(once, twice);
}

/// Integer kinds survive the pipeline without degrading to doubles.
#[test]
fn test_numeric_kind_preservation() {
    let value = parse_utf8(
        br#"[18446744073709551615,-9223372036854775808,9007199254740993]"#,
        ParseOption::RequireArray,
    )
    .unwrap();
    let list = value.as_array().unwrap();
    assert_eq!(list[0].as_number(), Some(&Number::UInt64(u64::MAX)));
    assert_eq!(list[1].as_number(), Some(&Number::Int64(i64::MIN)));
    // 2^53 + 1 is not representable as f64; it must stay integral
    assert_eq!(list[2].as_u64(), Some(9007199254740993));
}
