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
use std::fs;

use bigjson::{
    is_parser_available, parse_file, parse_utf8, parse_utf8_with_backend, Error, Number, Object,
    ParseOption, ParserBackend, Value, MAX_DEPTH,
};

fn parse(input: &[u8]) -> bigjson::Result<Value<'_>> {
    parse_utf8(input, ParseOption::AcceptAnyValue)
}

fn test_parse_err(errors: &[(&str, &'static str)]) {
    for &(s, err) in errors {
        let res = parse(s.as_bytes());
        assert!(res.is_err(), "expected error for {s:?}");
        assert_eq!(res.err().unwrap().to_string(), err, "input {s:?}");
    }
}

fn test_parse_ok(tests: Vec<(&str, Value<'_>)>) {
    for (s, val) in tests {
        assert_eq!(parse(s.as_bytes()).unwrap(), val, "input {s:?}");
    }
}

#[test]
fn test_parse_literals() {
    test_parse_ok(vec![
        ("null", Value::Null),
        (" true ", Value::Bool(true)),
        ("\tfalse\r\n", Value::Bool(false)),
    ]);

    test_parse_err(&[
        ("", "EOF while parsing a value, pos 0"),
        ("   ", "EOF while parsing a value, pos 3"),
        ("nul", "EOF while parsing a value, pos 3"),
        ("nulx", "expected ident, pos 4"),
        ("truz", "expected ident, pos 4"),
        ("fals", "EOF while parsing a value, pos 4"),
        ("NULL", "expected value, pos 1"),
    ]);
}

#[test]
fn test_parse_numbers() {
    test_parse_ok(vec![
        ("0", Value::Number(Number::UInt64(0))),
        ("1234", Value::Number(Number::UInt64(1234))),
        (
            "18446744073709551615",
            Value::Number(Number::UInt64(u64::MAX)),
        ),
        ("-2", Value::Number(Number::Int64(-2))),
        (
            "-9223372036854775808",
            Value::Number(Number::Int64(i64::MIN)),
        ),
        ("0.5", Value::Number(Number::Float64(0.5))),
        ("1.4e-07", Value::Number(Number::Float64(1.4e-7))),
        ("1E3", Value::Number(Number::Float64(1000.0))),
        // the grammar allows a signed zero with an exponent
        ("-0e5", Value::Number(Number::Float64(-0.0))),
        ("-0", Value::Number(Number::Int64(0))),
    ]);

    test_parse_err(&[
        ("01", "invalid number, pos 0"),
        ("-", "invalid number, pos 1"),
        ("1.", "invalid number, pos 2"),
        ("1e", "invalid number, pos 2"),
        ("1e+", "invalid number, pos 3"),
        ("-x", "invalid number, pos 1"),
    ]);
}

#[test]
fn test_parse_strings() {
    test_parse_ok(vec![
        (r#""""#, Value::String(Cow::Borrowed(""))),
        (r#""hello""#, Value::String(Cow::Borrowed("hello"))),
        (
            r#""a\"b\\c\/d\b\f\n\r\t""#,
            Value::String(Cow::Borrowed("a\"b\\c/d\u{8}\u{c}\n\r\t")),
        ),
        (r#""Aé""#, Value::String(Cow::Borrowed("A\u{e9}"))),
    ]);

    test_parse_err(&[
        (r#""abc"#, "EOF while parsing a value, pos 4"),
        ("\"a\nb\"", "control character while parsing string, pos 2"),
        (r#""\q""#, "invalid escaped char `q`, pos 3"),
        (r#""\u12"#, "EOF while parsing a value, pos 5"),
        (r#""\uZZZZ""#, "invalid hex char `Z`, pos 3"),
    ]);
}

/// Parsing the G clef surrogate pair yields its UTF-8 encoding.
#[test]
fn test_surrogate_pair_roundtrip() {
    let value = parse(b"\"\\uD834\\uDD1E\"").unwrap();
    match value {
        Value::String(s) => assert_eq!(s.as_bytes(), &[0xF0, 0x9D, 0x84, 0x9E]),
        other => panic!("unexpected value {other:?}"),
    }

    test_parse_err(&[
        (r#""\uD834""#, "unpaired surrogate in string, pos 8"),
        (r#""\uDD1E""#, "unpaired surrogate in string, pos 7"),
        (r#""\uD834\uD834""#, "unpaired surrogate in string, pos 13"),
    ]);
}

#[test]
fn test_parse_containers() {
    let mut object = Object::new();
    object.insert("a", Value::from(1u64));
    object.insert("b", Value::Array(vec![Value::Null, Value::Bool(false)]));
    test_parse_ok(vec![
        ("[]", Value::Array(vec![])),
        ("{}", Value::Object(Object::new())),
        (
            "[1, \"two\", 3.5, null]",
            Value::Array(vec![
                Value::from(1u64),
                Value::from("two"),
                Value::from(3.5f64),
                Value::Null,
            ]),
        ),
        (
            r#"{ "a" : 1, "b": [null, false] }"#,
            Value::Object(object),
        ),
    ]);
}

#[test]
fn test_duplicate_keys_are_retained() {
    let value = parse(br#"{"k":1,"k":2}"#).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 2);
    // last value wins on lookup, both survive the pipeline
    assert_eq!(object.get("k"), Some(&Value::from(2u64)));
}

/// Trailing commas, double commas, and misplaced colons are rejected.
#[test]
fn test_grammar_violations() {
    test_parse_err(&[
        ("[1,]", "unexpected token, pos 4"),
        ("[,1]", "expected value, pos 2"),
        ("{\"a\":1,}", "unexpected token, pos 8"),
        ("[,]", "expected value, pos 2"),
        ("[1,,2]", "expected value, pos 4"),
        ("[1 2]", "unexpected token, pos 4"),
        ("{", "EOF while parsing a value, pos 1"),
        ("[", "EOF while parsing a value, pos 1"),
        ("]", "unexpected token, pos 1"),
        ("{]", "expected object key, pos 2"),
        ("[}", "expected value, pos 2"),
        ("{\"a\" 1}", "expected `:`, pos 6"),
        ("{\"a\"::1}", "expected value, pos 6"),
        ("{1:2}", "expected object key, pos 2"),
        (":", "unexpected token, pos 1"),
        (",", "unexpected token, pos 1"),
        ("[1:2]", "unexpected token, pos 3"),
    ]);
}

/// Anything after the root value is an error.
#[test]
fn test_trailing_content_rejected() {
    test_parse_err(&[
        ("{} x", "expected value, pos 4"),
        ("{} {}", "trailing characters, pos 4"),
        ("1 2", "trailing characters, pos 3"),
        ("nulla", "expected value, pos 5"),
        ("\"a\" \"b\"", "trailing characters, pos 7"),
    ]);

    // trailing whitespace is fine
    assert!(parse(b" {} \r\n\t ").is_ok());
}

fn nested_brackets(depth: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(depth * 2);
    buf.resize(depth, b'[');
    buf.resize(depth * 2, b']');
    buf
}

/// Nesting 512 deep parses; 513 overflows the depth limit.
#[test]
fn test_depth_bound() {
    let ok = nested_brackets(MAX_DEPTH);
    assert!(parse(&ok).is_ok());

    let too_deep = nested_brackets(MAX_DEPTH + 1);
    let err = parse(&too_deep).unwrap_err();
    assert!(
        matches!(err, Error::Syntax(_, _)),
        "depth overflow must be a parse error, got {err:?}"
    );
    assert_eq!(
        err.to_string(),
        format!("nesting depth limit exceeded, pos {}", MAX_DEPTH + 1)
    );

    // mixed nesting hits the same bound
    let mut mixed = Vec::new();
    for _ in 0..=MAX_DEPTH / 2 {
        mixed.extend_from_slice(b"{\"k\":[");
    }
    assert!(parse(&mixed).is_err());
}

#[test]
fn test_parse_options() {
    assert!(parse_utf8(b"{}", ParseOption::RequireObject).is_ok());
    assert!(parse_utf8(b"[]", ParseOption::RequireArray).is_ok());
    assert!(parse_utf8(b"17", ParseOption::AcceptAnyValue).is_ok());

    let err = parse_utf8(b"[]", ParseOption::RequireObject).unwrap_err();
    assert!(matches!(err, Error::ExpectedObjectRoot));
    assert_eq!(err.to_string(), "expected object at the document root");

    let err = parse_utf8(b"{}", ParseOption::RequireArray).unwrap_err();
    assert!(matches!(err, Error::ExpectedArrayRoot));

    let err = parse_utf8(b"null", ParseOption::RequireObject).unwrap_err();
    assert!(matches!(err, Error::ExpectedObjectRoot));
}

#[test]
fn test_parser_backends() {
    assert!(is_parser_available(ParserBackend::Default));
    assert!(is_parser_available(ParserBackend::FastestAvailable));
    assert!(!is_parser_available(ParserBackend::Simd));

    let value =
        parse_utf8_with_backend(b"[1]", ParseOption::AcceptAnyValue, ParserBackend::Default)
            .unwrap();
    assert_eq!(value, Value::Array(vec![Value::from(1u64)]));

    let value = parse_utf8_with_backend(
        b"[1]",
        ParseOption::AcceptAnyValue,
        ParserBackend::FastestAvailable,
    )
    .unwrap();
    assert_eq!(value, Value::Array(vec![Value::from(1u64)]));

    let err =
        parse_utf8_with_backend(b"[1]", ParseOption::AcceptAnyValue, ParserBackend::Simd)
            .unwrap_err();
    assert!(matches!(err, Error::ParserUnavailable(ParserBackend::Simd)));
}

#[test]
fn test_parse_file() {
    let path = std::env::temp_dir().join("bigjson_it_parse_file.json");
    fs::write(&path, br#"{"nested": {"list": [1, -2, 3.5]}}"#).unwrap();
    let value = parse_file(&path, ParseOption::RequireObject).unwrap();
    fs::remove_file(&path).unwrap();

    let nested = value.as_object().unwrap().get("nested").unwrap();
    let list = nested.as_object().unwrap().get("list").unwrap();
    assert_eq!(list.array_length(), Some(3));

    let err = parse_file(&path, ParseOption::AcceptAnyValue).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_utf8_validation_of_raw_strings() {
    // stray continuation byte
    assert!(parse(&[b'"', 0x80, b'"']).is_err());
    // truncated two-byte sequence
    assert!(parse(&[b'"', 0xC3, b'"']).is_err());
    // valid multi-byte passes through untouched
    let value = parse("\"\u{2603}\"".as_bytes()).unwrap();
    assert_eq!(value, Value::String(Cow::Borrowed("\u{2603}")));
}
