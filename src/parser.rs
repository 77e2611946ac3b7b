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
use std::path::Path;

use crate::constants::MAX_DEPTH;
use crate::error::Error;
use crate::error::ParseErrorCode;
use crate::error::Result;
use crate::locale;
use crate::number::Number;
use crate::tokenizer::Token;
use crate::tokenizer::TokenKind;
use crate::tokenizer::Tokenizer;
use crate::value::Object;
use crate::value::Value;

/// Root-type requirement checked after a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseOption {
    /// Reject any document whose root is not an object `{ ... }`.
    RequireObject,
    /// Reject any document whose root is not an array `[ ... ]`.
    RequireArray,
    /// Accept any well-formed JSON value at the root.
    #[default]
    AcceptAnyValue,
}

/// Parser backend selector.
///
/// The SIMD-accelerated backend is an external collaborator and is not
/// compiled into this crate; only the selector is part of the core surface.
/// Any backend must produce a [`Value`] indistinguishable from the default
/// parser for well-formed inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserBackend {
    /// The hand-rolled parser in this crate, always available.
    #[default]
    Default,
    /// The SIMD-accelerated parser, if present on this host.
    Simd,
    /// The SIMD backend when available, the default parser otherwise.
    FastestAvailable,
}

/// Query whether a parser backend can be used in this build.
pub fn is_parser_available(backend: ParserBackend) -> bool {
    match backend {
        ParserBackend::Default | ParserBackend::FastestAvailable => true,
        ParserBackend::Simd => false,
    }
}

/// Parse a UTF-8 buffer into a [`Value`].
///
/// Strings in the result borrow from `buf` where possible. Fails with a
/// syntax error on malformed input and with a root-type error when `opt`
/// is violated.
pub fn parse_utf8(buf: &[u8], opt: ParseOption) -> Result<Value<'_>> {
    locale::ensure_numeric_locale();
    let mut parser = Parser::new(buf);
    let value = parser.parse()?;
    check_root(&value, opt)?;
    Ok(value)
}

/// Like [`parse_utf8`], but through an explicitly selected backend.
pub fn parse_utf8_with_backend(
    buf: &[u8],
    opt: ParseOption,
    backend: ParserBackend,
) -> Result<Value<'_>> {
    if !is_parser_available(backend) {
        return Err(Error::ParserUnavailable(backend));
    }
    parse_utf8(buf, opt)
}

/// Read a whole file into memory and parse it.
pub fn parse_file<P: AsRef<Path>>(path: P, opt: ParseOption) -> Result<Value<'static>> {
    let buf = fs::read(path)?;
    let value = parse_utf8(&buf, opt)?;
    Ok(value.into_owned())
}

fn check_root(value: &Value<'_>, opt: ParseOption) -> Result<()> {
    match opt {
        ParseOption::RequireObject if !value.is_object() => Err(Error::ExpectedObjectRoot),
        ParseOption::RequireArray if !value.is_array() => Err(Error::ExpectedArrayRoot),
        _ => Ok(()),
    }
}

/// Expectation flags for the next token.
///
/// A bitfield rather than a state enum: some states compose, and
/// `NOT_VALUE` is a negative constraint orthogonal to the positive ones.
#[derive(Debug, Clone, Copy, Default)]
struct Expect(u8);

impl Expect {
    const OBJ_NAME: u8 = 1;
    const COLON: u8 = 1 << 1;
    const ARR_VALUE: u8 = 1 << 2;
    const VALUE: u8 = 1 << 3;
    const NOT_VALUE: u8 = 1 << 4;

    #[inline]
    fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    #[inline]
    fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }
}

type NodeId = u32;

/// Parser-private intermediate tree node.
///
/// Nodes live in a flat arena and refer to each other by index, so open
/// containers keep a stable address while the arena grows. Number leaves
/// hold the raw lexeme; the numeric kind is decided in the final
/// conversion walk. An object entry with a `None` value slot is pending:
/// its key has been read but its value has not arrived yet.
enum Node<'a> {
    Null,
    Bool(bool),
    Number { lexeme: &'a [u8], pos: usize },
    String(Cow<'a, str>),
    Array(Vec<NodeId>),
    Object(Vec<(Cow<'a, str>, Option<NodeId>)>),
}

struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    nodes: Vec<Node<'a>>,
    stack: Vec<NodeId>,
}

impl<'a> Parser<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self {
            tokenizer: Tokenizer::new(buf),
            nodes: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn error(&self, code: ParseErrorCode) -> Error {
        Error::Syntax(code, self.tokenizer.pos())
    }

    fn alloc(&mut self, node: Node<'a>) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Drive the tokenizer until the root value closes, then demand that
    /// nothing but whitespace follows and convert the tree.
    fn parse(&mut self) -> Result<Value<'a>> {
        let mut expect = Expect::default();
        let mut last = TokenKind::None;
        let mut root: Option<NodeId> = None;

        loop {
            let Some(token) = self.tokenizer.next_token()? else {
                return Err(self.error(ParseErrorCode::InvalidEOF));
            };
            let kind = token.kind();
            let is_value_opener = kind.is_value_opener();

            if expect.has(Expect::VALUE) {
                if !is_value_opener {
                    return Err(self.error(ParseErrorCode::ExpectedSomeValue));
                }
                expect.clear(Expect::VALUE);
            } else if expect.has(Expect::ARR_VALUE) {
                if !is_value_opener && kind != TokenKind::ArrClose {
                    return Err(self.error(ParseErrorCode::ExpectedSomeValue));
                }
                expect.clear(Expect::ARR_VALUE);
            } else if expect.has(Expect::OBJ_NAME) {
                if kind != TokenKind::ObjClose && kind != TokenKind::String {
                    return Err(self.error(ParseErrorCode::ExpectedObjectKey));
                }
            } else if expect.has(Expect::COLON) {
                if kind != TokenKind::Colon {
                    return Err(self.error(ParseErrorCode::ExpectedColon));
                }
                expect.clear(Expect::COLON);
            } else if kind == TokenKind::Colon {
                return Err(self.error(ParseErrorCode::UnexpectedToken));
            }

            if expect.has(Expect::NOT_VALUE) {
                if is_value_opener {
                    return Err(self.error(ParseErrorCode::UnexpectedToken));
                }
                expect.clear(Expect::NOT_VALUE);
            }

            match token {
                Token::ObjOpen | Token::ArrOpen => {
                    if self.stack.len() >= MAX_DEPTH {
                        return Err(self.error(ParseErrorCode::DepthLimitExceeded));
                    }
                    let node = if kind == TokenKind::ObjOpen {
                        Node::Object(Vec::new())
                    } else {
                        Node::Array(Vec::new())
                    };
                    let id = self.alloc(node);
                    if self.stack.is_empty() {
                        root = Some(id);
                    } else {
                        self.attach(id)?;
                    }
                    self.stack.push(id);
                    if kind == TokenKind::ObjOpen {
                        expect.set(Expect::OBJ_NAME);
                    } else {
                        expect.set(Expect::ARR_VALUE);
                    }
                }

                Token::ObjClose | Token::ArrClose => {
                    if last == TokenKind::Comma {
                        return Err(self.error(ParseErrorCode::UnexpectedToken));
                    }
                    let Some(&top) = self.stack.last() else {
                        return Err(self.error(ParseErrorCode::UnexpectedToken));
                    };
                    let top_matches = match &self.nodes[top as usize] {
                        Node::Object(_) => kind == TokenKind::ObjClose,
                        Node::Array(_) => kind == TokenKind::ArrClose,
                        _ => false,
                    };
                    if !top_matches {
                        return Err(self.error(ParseErrorCode::UnexpectedToken));
                    }
                    self.stack.pop();
                    expect.clear(Expect::OBJ_NAME);
                    expect.set(Expect::NOT_VALUE);
                }

                Token::Colon => {
                    let Some(&top) = self.stack.last() else {
                        return Err(self.error(ParseErrorCode::UnexpectedToken));
                    };
                    if !matches!(self.nodes[top as usize], Node::Object(_)) {
                        return Err(self.error(ParseErrorCode::UnexpectedToken));
                    }
                    expect.set(Expect::VALUE);
                }

                Token::Comma => {
                    if last == TokenKind::Comma || last == TokenKind::ArrOpen {
                        return Err(self.error(ParseErrorCode::UnexpectedToken));
                    }
                    let Some(&top) = self.stack.last() else {
                        return Err(self.error(ParseErrorCode::UnexpectedToken));
                    };
                    if matches!(self.nodes[top as usize], Node::Object(_)) {
                        expect.set(Expect::OBJ_NAME);
                    } else {
                        expect.set(Expect::ARR_VALUE);
                    }
                }

                Token::String(key) if expect.has(Expect::OBJ_NAME) => {
                    let Some(&top) = self.stack.last() else {
                        return Err(Error::Internal("object key with an empty stack"));
                    };
                    match &mut self.nodes[top as usize] {
                        Node::Object(entries) => entries.push((key, None)),
                        _ => return Err(Error::Internal("object key outside an object")),
                    }
                    expect.clear(Expect::OBJ_NAME);
                    expect.set(Expect::COLON);
                    expect.set(Expect::NOT_VALUE);
                }

                scalar @ (Token::Null
                | Token::True
                | Token::False
                | Token::Number(_)
                | Token::String(_)) => {
                    let node = match scalar {
                        Token::Null => Node::Null,
                        Token::True => Node::Bool(true),
                        Token::False => Node::Bool(false),
                        Token::Number(lexeme) => Node::Number {
                            lexeme,
                            pos: self.tokenizer.pos() - lexeme.len(),
                        },
                        Token::String(s) => Node::String(s),
                        _ => return Err(Error::Internal("scalar dispatch mismatch")),
                    };
                    let id = self.alloc(node);
                    if self.stack.is_empty() {
                        root = Some(id);
                    } else {
                        self.attach(id)?;
                    }
                    expect.set(Expect::NOT_VALUE);
                }
            }

            last = kind;
            if self.stack.is_empty() {
                break;
            }
        }

        // Nothing may follow the root value.
        if self.tokenizer.next_token()?.is_some() {
            return Err(self.error(ParseErrorCode::UnexpectedTrailingCharacters));
        }

        let root = root.ok_or(Error::Internal("parse loop ended without a root"))?;
        self.build_value(root)
    }

    /// Attach a freshly allocated node under the current stack top: fill
    /// the pending entry of an object, or append to an array.
    fn attach(&mut self, child: NodeId) -> Result<()> {
        let top = *self
            .stack
            .last()
            .ok_or(Error::Internal("attach with an empty stack"))?;
        match &mut self.nodes[top as usize] {
            Node::Object(entries) => {
                let Some(entry) = entries.last_mut() else {
                    return Err(Error::Internal("object has no pending entry"));
                };
                if entry.1.is_some() {
                    return Err(Error::Internal("pending object entry already filled"));
                }
                entry.1 = Some(child);
            }
            Node::Array(values) => values.push(child),
            _ => return Err(Error::Internal("scalar node on the container stack")),
        }
        Ok(())
    }

    /// Single conversion walk from the intermediate tree to the final
    /// [`Value`], interpreting number lexemes along the way.
    fn build_value(&mut self, id: NodeId) -> Result<Value<'a>> {
        let node = std::mem::replace(&mut self.nodes[id as usize], Node::Null);
        match node {
            Node::Null => Ok(Value::Null),
            Node::Bool(v) => Ok(Value::Bool(v)),
            Node::Number { lexeme, pos } => match Number::from_lexeme(lexeme) {
                Some(n) => Ok(Value::Number(n)),
                None => Err(Error::Syntax(ParseErrorCode::InvalidNumberValue, pos)),
            },
            Node::String(s) => Ok(Value::String(s)),
            Node::Array(ids) => {
                let mut values = Vec::with_capacity(ids.len());
                for id in ids {
                    values.push(self.build_value(id)?);
                }
                Ok(Value::Array(values))
            }
            Node::Object(entries) => {
                let mut object = Object::with_capacity(entries.len());
                for (key, value_id) in entries {
                    let value_id =
                        value_id.ok_or(Error::Internal("object entry left unfilled"))?;
                    object.insert(key, self.build_value(value_id)?);
                }
                Ok(Value::Object(object))
            }
        }
    }
}
