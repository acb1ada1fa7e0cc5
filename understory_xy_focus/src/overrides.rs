// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Manual navigation overrides.
//!
//! An element may carry an attribute mapping directions to selectors, for
//! example `{left: '#back', Down: ".list > .first"}`. When that element is the
//! navigation reference, a matching selector wins over geometric scoring.
//!
//! The attribute uses a small object-literal grammar:
//!
//! ```text
//! map    := '{' (entry (',' entry)* ','?)? '}'
//! entry  := key ':' string
//! key    := ident | string
//! ident  := [A-Za-z_$] [A-Za-z0-9_$-]*
//! string := '\'' .. '\'' | '"' .. '"'      (backslash escapes the next char)
//! ```
//!
//! Whitespace is allowed between tokens. Duplicate keys keep the last value.

use alloc::string::String;
use alloc::vec::Vec;

use crate::direction::Direction;
use crate::error::OverrideParseError;

/// A parsed override attribute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverrideMap {
    entries: Vec<(String, String)>,
}

impl OverrideMap {
    /// Parse an attribute value.
    pub fn parse(input: &str) -> Result<Self, OverrideParseError> {
        Parser { input, pos: 0 }.map()
    }

    /// Look up a raw key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Selector for `direction`, accepting `left` or `Left` style keys.
    pub fn selector(&self, direction: Direction) -> Option<&str> {
        self.get(direction.as_str())
            .or_else(|| self.get(direction.as_title_str()))
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn map(mut self) -> Result<OverrideMap, OverrideParseError> {
        let mut entries = Vec::new();
        self.skip_ws();
        self.expect('{')?;
        self.skip_ws();
        if self.eat('}') {
            return self.finish(entries);
        }
        loop {
            let key = self.key()?;
            self.skip_ws();
            self.expect(':')?;
            self.skip_ws();
            let value = self.string()?;
            entries.push((key, value));
            self.skip_ws();
            if self.eat(',') {
                self.skip_ws();
                if self.eat('}') {
                    break;
                }
                continue;
            }
            self.expect('}')?;
            break;
        }
        self.finish(entries)
    }

    fn finish(mut self, entries: Vec<(String, String)>) -> Result<OverrideMap, OverrideParseError> {
        self.skip_ws();
        if self.pos < self.input.len() {
            return Err(OverrideParseError::TrailingInput { offset: self.pos });
        }
        Ok(OverrideMap { entries })
    }

    fn key(&mut self) -> Result<String, OverrideParseError> {
        match self.peek() {
            Some('\'' | '"') => self.string(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '-') {
                        self.pos += c.len_utf8();
                    } else {
                        break;
                    }
                }
                Ok(String::from(&self.input[start..self.pos]))
            }
            Some(found) => Err(OverrideParseError::UnexpectedChar {
                found,
                offset: self.pos,
            }),
            None => Err(OverrideParseError::UnexpectedEnd),
        }
    }

    fn string(&mut self) -> Result<String, OverrideParseError> {
        let start = self.pos;
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            Some(found) => {
                return Err(OverrideParseError::UnexpectedChar {
                    found,
                    offset: self.pos,
                });
            }
            None => return Err(OverrideParseError::UnexpectedEnd),
        };
        self.pos += 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(OverrideParseError::UnterminatedString { offset: start });
            };
            self.pos += c.len_utf8();
            if c == quote {
                return Ok(out);
            }
            if c == '\\' {
                let Some(escaped) = self.peek() else {
                    return Err(OverrideParseError::UnterminatedString { offset: start });
                };
                self.pos += escaped.len_utf8();
                out.push(escaped);
            } else {
                out.push(c);
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), OverrideParseError> {
        match self.peek() {
            Some(found) if found == c => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(OverrideParseError::UnexpectedChar {
                found,
                offset: self.pos,
            }),
            None => Err(OverrideParseError::UnexpectedEnd),
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }
}
