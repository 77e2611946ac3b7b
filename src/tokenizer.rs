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

use crate::constants::*;
use crate::error::Error;
use crate::error::ParseErrorCode;
use crate::error::Result;
use crate::filter::Utf8StringFilter;

/// One lexical token.
///
/// Number lexemes are returned raw; the numeric kind is decided later when
/// the intermediate tree is converted (see `Number::from_lexeme`). String
/// tokens are fully decoded and always valid UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token<'a> {
    ObjOpen,
    ObjClose,
    ArrOpen,
    ArrClose,
    Colon,
    Comma,
    Null,
    True,
    False,
    Number(&'a [u8]),
    String(Cow<'a, str>),
}

/// Payload-free token kind, used for `last_token` grammar checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    None,
    ObjOpen,
    ObjClose,
    ArrOpen,
    ArrClose,
    Colon,
    Comma,
    Null,
    True,
    False,
    Number,
    String,
}

impl Token<'_> {
    pub(crate) fn kind(&self) -> TokenKind {
        match self {
            Token::ObjOpen => TokenKind::ObjOpen,
            Token::ObjClose => TokenKind::ObjClose,
            Token::ArrOpen => TokenKind::ArrOpen,
            Token::ArrClose => TokenKind::ArrClose,
            Token::Colon => TokenKind::Colon,
            Token::Comma => TokenKind::Comma,
            Token::Null => TokenKind::Null,
            Token::True => TokenKind::True,
            Token::False => TokenKind::False,
            Token::Number(_) => TokenKind::Number,
            Token::String(_) => TokenKind::String,
        }
    }
}

impl TokenKind {
    /// A token that can open a value: a literal, number, string, or the
    /// opening bracket of a container.
    pub(crate) fn is_value_opener(self) -> bool {
        matches!(
            self,
            TokenKind::Null
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::ObjOpen
                | TokenKind::ArrOpen
        )
    }
}

/// Byte-cursor tokenizer over a UTF-8 input buffer.
///
/// Produces one token per call to [`next_token`]; `Ok(None)` signals the end
/// of input. After a successful call the cursor sits directly past the
/// consumed token, so the next call resumes cleanly.
///
/// [`next_token`]: Tokenizer::next_token
pub(crate) struct Tokenizer<'a> {
    buf: &'a [u8],
    idx: usize,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, idx: 0 }
    }

    /// Current byte offset into the input.
    pub(crate) fn pos(&self) -> usize {
        self.idx
    }

    pub(crate) fn next_token(&mut self) -> Result<Option<Token<'a>>> {
        self.skip_whitespace();
        let Some(c) = self.peek() else {
            return Ok(None);
        };
        match c {
            b'{' => {
                self.step();
                Ok(Some(Token::ObjOpen))
            }
            b'}' => {
                self.step();
                Ok(Some(Token::ObjClose))
            }
            b'[' => {
                self.step();
                Ok(Some(Token::ArrOpen))
            }
            b']' => {
                self.step();
                Ok(Some(Token::ArrClose))
            }
            b':' => {
                self.step();
                Ok(Some(Token::Colon))
            }
            b',' => {
                self.step();
                Ok(Some(Token::Comma))
            }
            b'n' => self.keyword(b"null", Token::Null),
            b't' => self.keyword(b"true", Token::True),
            b'f' => self.keyword(b"false", Token::False),
            b'-' | b'0'..=b'9' => self.number(),
            b'"' => self.string(),
            _ => {
                self.step();
                Err(self.error(ParseErrorCode::ExpectedSomeValue))
            }
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.buf.get(self.idx).copied()
    }

    #[inline]
    fn step(&mut self) {
        self.idx += 1;
    }

    fn error(&self, code: ParseErrorCode) -> Error {
        Error::Syntax(code, self.idx)
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        // JSON whitespace is exactly space, tab, newline, carriage return.
        while let Some(c) = self.peek() {
            match c {
                0x20 | 0x09 | 0x0A | 0x0D => self.step(),
                _ => break,
            }
        }
    }

    fn keyword(&mut self, word: &'static [u8], token: Token<'a>) -> Result<Option<Token<'a>>> {
        for &w in word {
            match self.peek() {
                None => return Err(self.error(ParseErrorCode::InvalidEOF)),
                Some(c) => {
                    self.step();
                    if c != w {
                        return Err(self.error(ParseErrorCode::ExpectedSomeIdent));
                    }
                }
            }
        }
        Ok(Some(token))
    }

    #[inline]
    fn step_digits(&mut self) -> usize {
        let mut len = 0;
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            len += 1;
            self.step();
        }
        len
    }

    /// Lex a number and return the raw lexeme verbatim.
    ///
    /// Grammar: optional `-`, then `0` alone or `[1-9][0-9]*`, optional
    /// fraction `.[0-9]+`, optional exponent `[eE][+-]?[0-9]+`. A leading
    /// zero followed by another digit is rejected; `-0e5` is accepted.
    fn number(&mut self) -> Result<Option<Token<'a>>> {
        let start = self.idx;
        let negative = self.buf[self.idx] == b'-';
        let first_digit = start + usize::from(negative);

        if self.buf.get(first_digit) == Some(&b'0')
            && self
                .buf
                .get(first_digit + 1)
                .is_some_and(|c| c.is_ascii_digit())
        {
            return Err(self.error(ParseErrorCode::InvalidNumberValue));
        }

        self.step();
        if negative && !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Err(self.error(ParseErrorCode::InvalidNumberValue));
        }
        self.step_digits();

        if self.peek() == Some(b'.') {
            self.step();
            if self.step_digits() == 0 {
                return Err(self.error(ParseErrorCode::InvalidNumberValue));
            }
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.step();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.step();
            }
            if self.step_digits() == 0 {
                return Err(self.error(ParseErrorCode::InvalidNumberValue));
            }
        }

        Ok(Some(Token::Number(&self.buf[start..self.idx])))
    }

    /// Lex a string literal, the opening quote included.
    ///
    /// Strings without escapes are borrowed from the input after a single
    /// UTF-8 validation pass. Strings with escapes are decoded byte by byte
    /// through the [`Utf8StringFilter`].
    fn string(&mut self) -> Result<Option<Token<'a>>> {
        self.step(); // opening quote
        let start = self.idx;

        loop {
            match self.peek() {
                None => return Err(self.error(ParseErrorCode::InvalidEOF)),
                Some(b'"') => {
                    let data = &self.buf[start..self.idx];
                    self.step();
                    let s = std::str::from_utf8(data)
                        .map_err(|_| Error::Syntax(ParseErrorCode::InvalidUtf8Sequence, start))?;
                    return Ok(Some(Token::String(Cow::Borrowed(s))));
                }
                Some(b'\\') => break,
                Some(c) if c < 0x20 => {
                    return Err(self.error(ParseErrorCode::ControlCharacterWhileParsingString));
                }
                Some(_) => self.step(),
            }
        }

        // Escape found: replay the clean prefix through the filter, then
        // keep decoding from the backslash onwards.
        let mut filter = Utf8StringFilter::with_capacity(self.idx - start + 16);
        for (offset, &c) in self.buf[start..self.idx].iter().enumerate() {
            filter
                .push_byte(c)
                .map_err(|code| Error::Syntax(code, start + offset))?;
        }

        loop {
            let Some(c) = self.peek() else {
                return Err(self.error(ParseErrorCode::InvalidEOF));
            };
            if c < 0x20 {
                return Err(self.error(ParseErrorCode::ControlCharacterWhileParsingString));
            }
            self.step();
            match c {
                b'"' => {
                    let s = filter
                        .finish()
                        .map_err(|code| Error::Syntax(code, self.idx))?;
                    return Ok(Some(Token::String(Cow::Owned(s))));
                }
                b'\\' => self.escape(&mut filter)?,
                _ => filter
                    .push_byte(c)
                    .map_err(|code| Error::Syntax(code, self.idx))?,
            }
        }
    }

    fn escape(&mut self, filter: &mut Utf8StringFilter) -> Result<()> {
        let Some(c) = self.peek() else {
            return Err(self.error(ParseErrorCode::InvalidEOF));
        };
        self.step();
        let byte = match c {
            b'"' => QU,
            b'\\' => BS,
            b'/' => SD,
            b'b' => BB,
            b'f' => FF,
            b'n' => NN,
            b'r' => RR,
            b't' => TT,
            b'u' => {
                let unit = self.hex4()?;
                return filter
                    .push_codepoint(u32::from(unit))
                    .map_err(|code| Error::Syntax(code, self.idx));
            }
            other => return Err(self.error(ParseErrorCode::InvalidEscaped(other))),
        };
        filter
            .push_byte(byte)
            .map_err(|code| Error::Syntax(code, self.idx))
    }

    /// Decode exactly four hex digits (case-insensitive) into a UTF-16
    /// code unit.
    fn hex4(&mut self) -> Result<u16> {
        let mut unit: u16 = 0;
        for _ in 0..UNICODE_LEN {
            let Some(c) = self.peek() else {
                return Err(self.error(ParseErrorCode::InvalidEOF));
            };
            let Some(digit) = decode_hex_val(c) else {
                return Err(self.error(ParseErrorCode::InvalidHex(c)));
            };
            unit = (unit << 4) + digit;
            self.step();
        }
        Ok(unit)
    }
}

#[allow(clippy::zero_prefixed_literal)]
static HEX: [u8; 256] = {
    const __: u8 = 255; // not a hex digit
    [
        //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 0
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 1
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 2
        00, 01, 02, 03, 04, 05, 06, 07, 08, 09, __, __, __, __, __, __, // 3
        __, 10, 11, 12, 13, 14, 15, __, __, __, __, __, __, __, __, __, // 4
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 5
        __, 10, 11, 12, 13, 14, 15, __, __, __, __, __, __, __, __, __, // 6
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 7
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
    ]
};

#[inline]
fn decode_hex_val(val: u8) -> Option<u16> {
    let n = HEX[val as usize] as u16;
    if n == 255 {
        None
    } else {
        Some(n)
    }
}
