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

use std::fmt::Display;
use std::fmt::Formatter;

use crate::parser::ParserBackend;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by parsing and serialization.
///
/// Every failure propagates to the caller; nothing is retried or swallowed
/// inside the codec. `Result` return values guarantee that no partially
/// built tree is observable after a failure.
#[derive(Debug)]
pub enum Error {
    /// Malformed JSON text, with the byte offset the error was detected at.
    Syntax(ParseErrorCode, usize),
    /// The document parsed but its root is not an object as required.
    ExpectedObjectRoot,
    /// The document parsed but its root is not an array as required.
    ExpectedArrayRoot,
    /// An unset value was given at the serialization root with `NoBareNull`.
    BareUnsetValue,
    /// NaN and infinities have no JSON number representation.
    NonFiniteNumber,
    /// The requested parser backend is not compiled into this build.
    ParserUnavailable(ParserBackend),
    /// I/O failure while reading a file to parse.
    Io(std::io::Error),
    /// An internal invariant was violated. Reported rather than risking
    /// corrupt output; seeing this is a bug in the codec.
    Internal(&'static str),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(code, pos) => write!(f, "{}, pos {}", code, pos),
            Error::ExpectedObjectRoot => write!(f, "expected object at the document root"),
            Error::ExpectedArrayRoot => write!(f, "expected array at the document root"),
            Error::BareUnsetValue => {
                write!(f, "unset value cannot be serialized at the root")
            }
            Error::NonFiniteNumber => {
                write!(f, "non-finite number cannot be represented in JSON")
            }
            Error::ParserUnavailable(backend) => {
                write!(f, "parser backend {:?} is unavailable", backend)
            }
            Error::Io(err) => write!(f, "{}", err),
            Error::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error)
    }
}

/// Lexical and grammatical error kinds, rendered as the short lowercase
/// messages the integration tests assert against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorCode {
    InvalidEOF,
    ExpectedSomeIdent,
    ExpectedSomeValue,
    ExpectedObjectKey,
    ExpectedColon,
    UnexpectedToken,
    InvalidNumberValue,
    ControlCharacterWhileParsingString,
    InvalidEscaped(u8),
    InvalidHex(u8),
    InvalidUnicodeCodePoint,
    UnpairedSurrogate,
    InvalidUtf8Sequence,
    UnexpectedTrailingCharacters,
    DepthLimitExceeded,
}

impl Display for ParseErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorCode::InvalidEOF => write!(f, "EOF while parsing a value"),
            ParseErrorCode::ExpectedSomeIdent => write!(f, "expected ident"),
            ParseErrorCode::ExpectedSomeValue => write!(f, "expected value"),
            ParseErrorCode::ExpectedObjectKey => write!(f, "expected object key"),
            ParseErrorCode::ExpectedColon => write!(f, "expected `:`"),
            ParseErrorCode::UnexpectedToken => write!(f, "unexpected token"),
            ParseErrorCode::InvalidNumberValue => write!(f, "invalid number"),
            ParseErrorCode::ControlCharacterWhileParsingString => {
                write!(f, "control character while parsing string")
            }
            ParseErrorCode::InvalidEscaped(c) => {
                write!(f, "invalid escaped char `{}`", *c as char)
            }
            ParseErrorCode::InvalidHex(c) => write!(f, "invalid hex char `{}`", *c as char),
            ParseErrorCode::InvalidUnicodeCodePoint => write!(f, "invalid unicode code point"),
            ParseErrorCode::UnpairedSurrogate => write!(f, "unpaired surrogate in string"),
            ParseErrorCode::InvalidUtf8Sequence => write!(f, "invalid UTF-8 sequence in string"),
            ParseErrorCode::UnexpectedTrailingCharacters => write!(f, "trailing characters"),
            ParseErrorCode::DepthLimitExceeded => write!(f, "nesting depth limit exceeded"),
        }
    }
}
