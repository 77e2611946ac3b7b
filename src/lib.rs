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

//! `bigjson` is a hand-rolled JSON parser and serializer built for large
//! payloads: multi-megabyte RPC responses, snapshots and config blobs. It
//! replaces framework JSON facilities that impose input-size ceilings or
//! fragment the heap, and behaves identically across platforms and locales.
//!
//! ## Features
//!
//! - Full RFC 4627 string handling: escape decoding, UTF-8 validation and
//!   UTF-16 surrogate-pair collation in a single streaming filter.
//! - Lossless numeric round-trips across signed 64-bit, unsigned 64-bit and
//!   IEEE-754 double, with the narrowest exact kind selected per lexeme.
//! - Deterministic output: object keys are always serialized in ascending
//!   byte order, and doubles use shortest round-trippable formatting with a
//!   `.` separator regardless of the ambient locale.
//! - Bounded resource use: nesting depth is capped at [`MAX_DEPTH`] and the
//!   parser's intermediate tree is released as soon as a call returns.
//!
//! ## Example
//!
//! ```
//! use bigjson::{parse_utf8, to_utf8, ParseOption, SerOption};
//!
//! let value = parse_utf8(br#"{"b": [1, 2.5], "a": null}"#, ParseOption::RequireObject)?;
//! let bytes = to_utf8(&value, true, SerOption::BareNullOk)?;
//! assert_eq!(bytes, br#"{"a":null,"b":[1,2.5]}"#.to_vec());
//! # Ok::<(), bigjson::Error>(())
//! ```

#![allow(clippy::uninlined_format_args)]

mod constants;
mod error;
mod filter;
mod from;
mod locale;
mod number;
mod parser;
mod ser;
mod tokenizer;
mod value;

pub use constants::MAX_DEPTH;
pub use error::Error;
pub use error::ParseErrorCode;
pub use error::Result;
pub use locale::auto_fix_locale;
pub use locale::check_locale;
pub use locale::set_auto_fix_locale;
pub use number::Number;
pub use parser::is_parser_available;
pub use parser::parse_file;
pub use parser::parse_utf8;
pub use parser::parse_utf8_with_backend;
pub use parser::ParseOption;
pub use parser::ParserBackend;
pub use ser::serialize;
pub use ser::to_utf8;
pub use ser::SerOption;
pub use value::Object;
pub use value::Value;
