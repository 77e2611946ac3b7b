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

use crate::error::Error;
use crate::error::Result;
use crate::locale;
use crate::number;
use crate::number::Number;
use crate::value::Object;
use crate::value::Value;

/// Controls how an unset root value is handled by [`to_utf8`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerOption {
    /// Refuse to serialize [`Value::Unset`] at the root.
    NoBareNull,
    /// Serialize [`Value::Unset`] at the root as `null`.
    BareNullOk,
}

// Indentation used by to_utf8 in non-compact mode.
const PRETTY_INDENT: u32 = 4;

/// Serialize a value to UTF-8 JSON text.
///
/// `compact = true` produces no whitespace between tokens; otherwise the
/// output is pretty-printed with four-space indentation.
pub fn to_utf8(value: &Value<'_>, compact: bool, opt: SerOption) -> Result<Vec<u8>> {
    if opt == SerOption::NoBareNull && value.is_unset() {
        return Err(Error::BareUnsetValue);
    }
    serialize(value, if compact { 0 } else { PRETTY_INDENT }, 0)
}

/// Low-level serialization with explicit indentation control.
///
/// `pretty_indent = 0` means compact output; otherwise each nested element
/// is prefixed with `pretty_indent * level` spaces and a newline follows
/// every `{`, `[` and `,`. There is no trailing newline after the root.
/// Object keys are emitted in ascending byte order regardless of insertion
/// order, so the output is a deterministic function of the value.
pub fn serialize(value: &Value<'_>, pretty_indent: u32, indent_level: u32) -> Result<Vec<u8>> {
    locale::ensure_numeric_locale();
    let mut buf = Vec::with_capacity(1024);
    let mut writer = Writer { buf: &mut buf };
    writer.write_value(value, pretty_indent, indent_level)?;
    Ok(buf)
}

const HEX_DIGITS: [u8; 16] = *b"0123456789abcdef";

struct Writer<'w> {
    buf: &'w mut Vec<u8>,
}

impl Writer<'_> {
    #[inline]
    fn put(&mut self, c: u8) {
        self.buf.push(c);
    }

    #[inline]
    fn put_fill(&mut self, c: u8, n: usize) {
        self.buf.resize(self.buf.len() + n, c);
    }

    #[inline]
    fn write(&mut self, s: &[u8]) {
        self.buf.extend_from_slice(s);
    }

    #[inline]
    fn indent(&mut self, pretty_indent: u32, indent_level: u32) {
        self.put_fill(b' ', (pretty_indent * indent_level) as usize);
    }

    fn write_value(
        &mut self,
        value: &Value<'_>,
        pretty_indent: u32,
        indent_level: u32,
    ) -> Result<()> {
        match value {
            Value::Unset | Value::Null => self.write(b"null"),
            Value::Bool(true) => self.write(b"true"),
            Value::Bool(false) => self.write(b"false"),
            Value::Number(n) => self.write_number(n)?,
            Value::String(s) => self.write_string(s.as_bytes()),
            Value::Binary(b) => {
                // an empty byte-array is the host's other spelling of "no value"
                if b.is_empty() {
                    self.write(b"null");
                } else {
                    self.write_string(b);
                }
            }
            Value::Array(values) => {
                self.write_array(values, pretty_indent, indent_level.max(1))?;
            }
            Value::Object(object) => {
                self.write_object(object, pretty_indent, indent_level.max(1))?;
            }
        }
        Ok(())
    }

    fn write_array(
        &mut self,
        values: &[Value<'_>],
        pretty_indent: u32,
        indent_level: u32,
    ) -> Result<()> {
        self.put(b'[');
        if pretty_indent > 0 {
            self.put(b'\n');
        }

        for (i, value) in values.iter().enumerate() {
            if pretty_indent > 0 {
                self.indent(pretty_indent, indent_level);
            }
            self.write_value(value, pretty_indent, indent_level + 1)?;
            if i + 1 != values.len() {
                self.put(b',');
            }
            if pretty_indent > 0 {
                self.put(b'\n');
            }
        }

        if pretty_indent > 0 {
            self.indent(pretty_indent, indent_level - 1);
        }
        self.put(b']');
        Ok(())
    }

    fn write_object(
        &mut self,
        object: &Object<'_>,
        pretty_indent: u32,
        indent_level: u32,
    ) -> Result<()> {
        self.put(b'{');
        if pretty_indent > 0 {
            self.put(b'\n');
        }

        let entries = object.sorted();
        let n_entries = entries.len();
        for (i, entry) in entries.into_iter().enumerate() {
            let (key, value) = entry;
            if pretty_indent > 0 {
                self.indent(pretty_indent, indent_level);
            }
            self.write_string(key.as_bytes());
            self.put(b':');
            if pretty_indent > 0 {
                self.put(b' ');
            }
            self.write_value(value, pretty_indent, indent_level + 1)?;
            if i + 1 != n_entries {
                self.put(b',');
            }
            if pretty_indent > 0 {
                self.put(b'\n');
            }
        }

        if pretty_indent > 0 {
            self.indent(pretty_indent, indent_level - 1);
        }
        self.put(b'}');
        Ok(())
    }

    /// Write a quoted string. The seven short escapes cover the common
    /// control characters; any other byte below 0x20 gets the long form
    /// with lowercase hex. Bytes at or above 0x20 are emitted verbatim,
    /// the input being valid UTF-8 already.
    fn write_string(&mut self, bytes: &[u8]) {
        self.put(b'"');
        for &c in bytes {
            match c {
                b'"' => self.write(b"\\\""),
                b'\\' => self.write(b"\\\\"),
                0x08 => self.write(b"\\b"),
                0x09 => self.write(b"\\t"),
                0x0A => self.write(b"\\n"),
                0x0C => self.write(b"\\f"),
                0x0D => self.write(b"\\r"),
                c if c < 0x20 => {
                    self.write(b"\\u00");
                    self.put(HEX_DIGITS[(c >> 4) as usize]);
                    self.put(HEX_DIGITS[(c & 0x0F) as usize]);
                }
                c => self.put(c),
            }
        }
        self.put(b'"');
    }

    fn write_number(&mut self, n: &Number) -> Result<()> {
        match n {
            Number::Int64(v) => {
                let mut buffer = itoa::Buffer::new();
                self.write(buffer.format(*v).as_bytes());
            }
            Number::UInt64(v) => {
                let mut buffer = itoa::Buffer::new();
                self.write(buffer.format(*v).as_bytes());
            }
            Number::Float64(v) => {
                if !v.is_finite() {
                    return Err(Error::NonFiniteNumber);
                }
                number::write_f64(self.buf, *v);
            }
        }
        Ok(())
    }
}
