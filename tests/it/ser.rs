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

use std::io::Write;

use goldenfile::Mint;

use bigjson::{
    parse_utf8, serialize, to_utf8, Number, Object, ParseOption, SerOption, Value,
};

fn compact(value: &Value<'_>) -> String {
    String::from_utf8(to_utf8(value, true, SerOption::BareNullOk).unwrap()).unwrap()
}

/// A parsed string list re-serializes byte-identically.
#[test]
fn test_string_list_roundtrip() {
    let input = br#"["astring","anotherstring","laststring",null]"#;
    let value = parse_utf8(input, ParseOption::RequireArray).unwrap();
    assert_eq!(compact(&value).as_bytes(), input);
}

/// The host-kind showcase object serializes to the exact expected text,
/// with keys emitted in ascending byte order no matter the insertion order.
#[test]
fn test_host_kind_object() {
    let seven_item_list = Value::Array(vec![
        Value::from(1u64),
        Value::Bool(true),
        Value::Bool(false),
        Value::Number(Number::Float64(1.4e-7)),
        Value::Null,
        Value::Object(Object::new()),
        Value::Array(vec![
            Value::Number(Number::Float64(-777777.293678102)),
            Value::Null,
            Value::from(-999999999999999999i64),
        ]),
    ]);

    // deliberately scrambled insertion order
    let mut object = Object::new();
    object.insert("z_i64_min", Value::from(i64::MIN));
    object.insert("a null", Value::Unset);
    object.insert("7 item list", seven_item_list);
    object.insert("a bytearray", Value::from(&b"bytearray"[..]));
    object.insert("empty strlist", Value::Array(vec![]));
    object.insert("a null bytearray", Value::from(&b""[..]));
    object.insert("a null string", Value::from(""));
    object.insert("a string", Value::from("hello"));
    object.insert("an empty bytearray", Value::from(&b""[..]));
    object.insert("an empty string", Value::from(""));
    object.insert("another empty bytearray", Value::from(&b""[..]));
    object.insert("empty balist", Value::Array(vec![]));
    object.insert("empty vlist", Value::Array(vec![]));
    object.insert("nested map key", Value::Number(Number::Float64(3.140000001)));
    object.insert("u64_max", Value::from(u64::MAX));

    let expected = concat!(
        r#"{"7 item list":[1,true,false,1.4e-07,null,{},"#,
        r#"[-777777.293678102,null,-999999999999999999]],"#,
        r#""a bytearray":"bytearray","a null":null,"a null bytearray":null,"#,
        r#""a null string":"","a string":"hello","an empty bytearray":null,"#,
        r#""an empty string":"","another empty bytearray":null,"#,
        r#""empty balist":[],"empty strlist":[],"empty vlist":[],"#,
        r#""nested map key":3.140000001,"u64_max":18446744073709551615,"#,
        r#""z_i64_min":-9223372036854775808}"#,
    );
    assert_eq!(compact(&Value::Object(object)), expected);
}

/// Compact output is a deterministic function of the value.
#[test]
fn test_compact_determinism() {
    let mut a = Object::new();
    a.insert("one", Value::from(1u64));
    a.insert("two", Value::from(2u64));
    let mut b = Object::new();
    b.insert("two", Value::from(2u64));
    b.insert("one", Value::from(1u64));
    assert_eq!(compact(&Value::Object(a)), compact(&Value::Object(b)));
}

#[test]
fn test_float_formatting() {
    assert_eq!(compact(&Value::from(1.4e-7f64)), "1.4e-07");
    assert_eq!(compact(&Value::from(1e300f64)), "1e+300");
    assert_eq!(compact(&Value::from(2.0f64)), "2.0");
    assert_eq!(compact(&Value::from(-0.5f64)), "-0.5");
    assert_eq!(compact(&Value::from(3.140000001f64)), "3.140000001");
}

#[test]
fn test_serialize_indent_levels() {
    let value = Value::Array(vec![Value::from(1u64)]);
    // indent level shifts nested lines, not the opening token
    let bytes = serialize(&value, 2, 0).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "[\n  1\n]");
    let bytes = serialize(&value, 2, 2).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "[\n    1\n  ]");
}

#[test]
fn test_display_matches_compact_serialization() {
    let value = parse_utf8(
        br#"{"b":[1,2.5,"x"],"a":null}"#,
        ParseOption::AcceptAnyValue,
    )
    .unwrap();
    assert_eq!(format!("{value}"), compact(&value));
}

#[test]
fn test_pretty_output_golden() {
    let mut mint = Mint::new("tests/it/testdata");
    let mut golden = mint.new_goldenfile("pretty.golden").unwrap();

    let mut inner = Object::new();
    inner.insert("text", Value::from("line\nbreak"));
    inner.insert("count", Value::from(3u64));
    let mut object = Object::new();
    object.insert("list", Value::Array(vec![Value::Null, Value::Bool(true)]));
    object.insert("empty", Value::Array(vec![]));
    object.insert("inner", Value::Object(inner));

    let bytes = to_utf8(&Value::Object(object), false, SerOption::BareNullOk).unwrap();
    golden.write_all(&bytes).unwrap();
    golden.write_all(b"\n").unwrap();
}
